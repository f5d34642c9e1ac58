#![allow(dead_code)]

use cpusim::core::{Slice, Time, TraceKind};
use cpusim::{RunOutcome, Scheduler, ScriptedWorkload, Simulator};

/// Initialize tracing from `RUST_LOG`.
///
/// `try_init()` is idempotent: the first call in the process succeeds and
/// later calls are silently ignored.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run `jobs` (`(arrival_time, service_time)` pairs) to completion of every job.
pub fn run_scripted<S: Scheduler>(scheduler: S, jobs: &[(Time, Time)]) -> RunOutcome {
    setup_test();
    let workload = ScriptedWorkload::from_pairs(jobs).expect("valid scripted jobs");
    Simulator::new(scheduler, workload, jobs.len())
        .with_trace(true)
        .run()
        .expect("scripted run completes")
}

pub fn completion_time(outcome: &RunOutcome, pid: usize) -> Time {
    outcome
        .completed
        .iter()
        .find(|p| p.id == pid)
        .and_then(|p| p.completion_time)
        .unwrap_or_else(|| panic!("process {pid} did not complete"))
}

pub fn start_time(outcome: &RunOutcome, pid: usize) -> Time {
    outcome
        .completed
        .iter()
        .find(|p| p.id == pid)
        .and_then(|p| p.start_time)
        .unwrap_or_else(|| panic!("process {pid} never started"))
}

/// `(pid, start, end)` for every CPU slice in the trace.
pub fn slices(outcome: &RunOutcome) -> Vec<(usize, Time, Time)> {
    outcome
        .trace
        .slices()
        .iter()
        .map(|s: &Slice| (s.pid, s.start, s.end))
        .collect()
}

pub fn ended_by(outcome: &RunOutcome) -> Vec<TraceKind> {
    outcome.trace.slices().iter().map(|s| s.ended_by).collect()
}

pub fn assert_close(actual: Time, expected: Time) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}
