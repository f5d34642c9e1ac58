use cpusim::core::TraceKind;
use cpusim::{Fcfs, Policy, SimConfig};

mod common;

/// A shorter job arriving mid-run still waits for the running one.
#[test]
fn test_fcfs_never_preempts() {
    let outcome = common::run_scripted(Fcfs, &[(0.0, 2.0), (0.5, 1.0)]);

    assert_eq!(outcome.completion_order(), vec![0, 1]);
    assert_eq!(common::completion_time(&outcome, 0), 2.0);
    assert_eq!(common::completion_time(&outcome, 1), 3.0);
    assert_eq!(common::start_time(&outcome, 1), 2.0);

    assert_eq!(common::slices(&outcome), vec![(0, 0.0, 2.0), (1, 2.0, 3.0)]);
    assert!(
        outcome
            .trace
            .events()
            .iter()
            .all(|e| !matches!(e.kind, TraceKind::Preempted { .. } | TraceKind::Switched { .. })),
        "FCFS must only dispatch and complete"
    );
    assert_eq!(outcome.total_usage, 3.0);
    assert_eq!(outcome.elapsed, 3.0);
}

/// The CPU idles between non-overlapping jobs; idle time is not usage.
#[test]
fn test_fcfs_idle_gap() {
    let outcome = common::run_scripted(Fcfs, &[(0.0, 1.0), (5.0, 1.0)]);

    assert_eq!(common::start_time(&outcome, 1), 5.0);
    assert_eq!(common::completion_time(&outcome, 1), 6.0);
    assert_eq!(outcome.total_usage, 2.0);
    assert_eq!(outcome.elapsed, 6.0);
    assert!((outcome.utilization() - 2.0 / 6.0).abs() < 1e-12);
    assert_eq!(outcome.mean_ready_len, 0.0);
}

/// Simultaneous arrivals queue in listed order.
#[test]
fn test_fcfs_simultaneous_arrivals() {
    let outcome = common::run_scripted(Fcfs, &[(0.0, 3.0), (0.0, 1.0), (0.0, 2.0)]);

    assert_eq!(outcome.completion_order(), vec![0, 1, 2]);
    assert_eq!(common::completion_time(&outcome, 2), 6.0);
    // Two waiters for 3s, one for 1s, over 6s
    assert!((outcome.mean_ready_len - 7.0 / 6.0).abs() < 1e-12);
}

/// Over a random workload, completion order matches arrival order.
#[test]
fn test_fcfs_completes_in_arrival_order() {
    common::setup_test();
    let config = SimConfig::new(Policy::Fcfs, 12.0, 0.06, 2_000).with_seed(3);
    let report = cpusim::run(&config).unwrap();
    let completed = &report.outcome.completed;

    assert_eq!(completed.len(), 2_000);
    for pair in completed.windows(2) {
        assert!(pair[0].arrival_time <= pair[1].arrival_time);
        assert!(pair[0].completion_time <= pair[1].completion_time);
    }
    for process in completed {
        // Each job runs once, start to finish
        let start = process.start_time.unwrap();
        let done = process.completion_time.unwrap();
        common::assert_close(done - start, process.service_time);
    }
}
