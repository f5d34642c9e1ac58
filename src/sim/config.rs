use serde::{Deserialize, Serialize};

use crate::core::Time;
use crate::error::SimError;
use crate::scheduler::Policy;

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub policy: Policy,
    /// Mean arrivals per second (lambda).
    pub arrival_rate: f64,
    /// Mean service time in seconds.
    pub mean_service_time: Time,
    /// Number of completed processes that ends the run.
    pub run_length: usize,
    /// Round-Robin time slice; ignored by other policies.
    #[serde(default)]
    pub quantum: Option<Time>,
    #[serde(default)]
    pub seed: u64,
    /// Record a transition trace in the outcome.
    #[serde(default)]
    pub trace: bool,
}

impl SimConfig {
    pub fn new(policy: Policy, arrival_rate: f64, mean_service_time: Time, run_length: usize) -> Self {
        Self {
            policy,
            arrival_rate,
            mean_service_time,
            run_length,
            quantum: None,
            seed: 0,
            trace: false,
        }
    }

    pub fn with_quantum(mut self, quantum: Time) -> Self {
        self.quantum = Some(quantum);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Reject configurations that could never run to completion.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.arrival_rate.is_finite() && self.arrival_rate > 0.0) {
            return Err(SimError::NonPositiveArrivalRate(self.arrival_rate));
        }
        if !(self.mean_service_time.is_finite() && self.mean_service_time > 0.0) {
            return Err(SimError::NonPositiveServiceTime(self.mean_service_time));
        }
        if self.run_length == 0 {
            return Err(SimError::ZeroRunLength);
        }
        match self.quantum {
            Some(q) if !(q.is_finite() && q > 0.0) => Err(SimError::NonPositiveQuantum(q)),
            None if self.policy.needs_quantum() => Err(SimError::MissingQuantum(self.policy)),
            _ => Ok(()),
        }
    }
}
