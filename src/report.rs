//! Run output handed to reporting layers.
//!
//! [`RunOutcome`] is what the event loop produces; [`Summary`] condenses it
//! into the aggregate figures used to compare policies across arrival rates.

use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::{Process, ProcessId, Time, Trace};
use crate::scheduler::Policy;
use crate::sim::SimConfig;

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub policy: Policy,
    pub quantum: Option<Time>,
    pub run_length: usize,
    /// Simulated time at which the last required process completed.
    pub elapsed: Time,
    /// CPU time spent running processes.
    pub total_usage: Time,
    /// Ready-queue length averaged over simulated time.
    pub mean_ready_len: f64,
    /// Completed processes in completion order.
    pub completed: Vec<Process>,
    #[serde(skip)]
    pub trace: Trace,
}

impl RunOutcome {
    pub fn utilization(&self) -> f64 {
        if self.elapsed > 0.0 {
            self.total_usage / self.elapsed
        } else {
            0.0
        }
    }

    pub fn completion_order(&self) -> Vec<ProcessId> {
        self.completed.iter().map(|p| p.id).collect()
    }
}

/// A run's outcome together with the configuration that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub config: SimConfig,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn summary(&self) -> Summary {
        Summary::of(&self.outcome)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub completed: usize,
    pub mean_turnaround: Time,
    pub mean_waiting: Time,
    pub mean_response: Time,
    /// Completed processes per second.
    pub throughput: f64,
    pub utilization: f64,
    pub mean_ready_len: f64,
}

impl Summary {
    pub fn of(outcome: &RunOutcome) -> Self {
        let processes = || outcome.completed.iter();
        let throughput = if outcome.elapsed > 0.0 {
            outcome.completed.len() as f64 / outcome.elapsed
        } else {
            0.0
        };

        Self {
            completed: outcome.completed.len(),
            mean_turnaround: avg(processes().filter_map(Process::turnaround)),
            mean_waiting: avg(processes().filter_map(Process::waiting)),
            mean_response: avg(processes().filter_map(Process::response)),
            throughput,
            utilization: outcome.utilization(),
            mean_ready_len: outcome.mean_ready_len,
        }
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProcessState;

    fn finished(id: usize, arrival: Time, service: Time, start: Time, done: Time) -> Process {
        Process {
            id,
            state: ProcessState::Completed,
            arrival_time: arrival,
            service_time: service,
            start_time: Some(start),
            used_time: service,
            completion_time: Some(done),
        }
    }

    #[test]
    fn summarizes_fcfs_pair() {
        let outcome = RunOutcome {
            policy: Policy::Fcfs,
            quantum: None,
            run_length: 2,
            elapsed: 3.0,
            total_usage: 3.0,
            mean_ready_len: 0.5,
            completed: vec![finished(0, 0.0, 2.0, 0.0, 2.0), finished(1, 0.5, 1.0, 2.0, 3.0)],
            trace: Trace::default(),
        };

        let summary = Summary::of(&outcome);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.mean_turnaround, 2.25);
        assert_eq!(summary.mean_waiting, 0.75);
        assert_eq!(summary.mean_response, 0.75);
        assert!((summary.throughput - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.utilization, 1.0);
        assert_eq!(summary.mean_ready_len, 0.5);
        assert_eq!(outcome.completion_order(), vec![0, 1]);
    }
}
