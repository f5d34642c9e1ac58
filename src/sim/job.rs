use std::collections::VecDeque;

use rand::prelude::*;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

use crate::core::Time;
use crate::error::SimError;

/// A unit of work before it enters the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub arrival_time: Time,
    pub service_time: Time,
}

impl Job {
    pub fn new(arrival_time: Time, service_time: Time) -> Self {
        Self {
            arrival_time,
            service_time,
        }
    }
}

/// Source of arriving jobs, pulled one at a time by the event loop.
pub trait Workload {
    /// The job arriving after one that arrived at `last_arrival`, or `None`
    /// once the source is exhausted.
    fn next_job(&mut self, last_arrival: Time) -> Option<Job>;
}

/// Poisson arrivals with exponentially distributed service times.
pub struct PoissonWorkload {
    rng: StdRng,
    inter_arrival: Exp<f64>,
    service: Exp<f64>,
}

impl PoissonWorkload {
    pub fn new(arrival_rate: f64, mean_service_time: Time, seed: u64) -> Result<Self, SimError> {
        if !(arrival_rate.is_finite() && arrival_rate > 0.0) {
            return Err(SimError::NonPositiveArrivalRate(arrival_rate));
        }
        if !(mean_service_time.is_finite() && mean_service_time > 0.0) {
            return Err(SimError::NonPositiveServiceTime(mean_service_time));
        }

        let inter_arrival =
            Exp::new(arrival_rate).map_err(|_| SimError::NonPositiveArrivalRate(arrival_rate))?;
        let service = Exp::new(1.0 / mean_service_time)
            .map_err(|_| SimError::NonPositiveServiceTime(mean_service_time))?;

        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            inter_arrival,
            service,
        })
    }
}

impl Workload for PoissonWorkload {
    fn next_job(&mut self, last_arrival: Time) -> Option<Job> {
        let gap = self.inter_arrival.sample(&mut self.rng);
        let service_time = self.service.sample(&mut self.rng);
        Some(Job::new(last_arrival + gap, service_time))
    }
}

/// A fixed list of jobs replayed in arrival order.
#[derive(Debug, Clone)]
pub struct ScriptedWorkload {
    jobs: VecDeque<Job>,
}

impl ScriptedWorkload {
    pub fn new(mut jobs: Vec<Job>) -> Result<Self, SimError> {
        if let Some(bad) = jobs.iter().find(|job| {
            !(job.arrival_time.is_finite() && job.arrival_time >= 0.0)
                || !(job.service_time.is_finite() && job.service_time > 0.0)
        }) {
            return Err(SimError::InvalidJob {
                arrival_time: bad.arrival_time,
                service_time: bad.service_time,
            });
        }

        // Stable: simultaneous arrivals keep their listed order
        jobs.sort_by(|a, b| a.arrival_time.total_cmp(&b.arrival_time));
        Ok(Self { jobs: jobs.into() })
    }

    /// Build from `(arrival_time, service_time)` pairs.
    pub fn from_pairs(pairs: &[(Time, Time)]) -> Result<Self, SimError> {
        Self::new(pairs.iter().map(|&(a, s)| Job::new(a, s)).collect())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl Workload for ScriptedWorkload {
    fn next_job(&mut self, last_arrival: Time) -> Option<Job> {
        let job = self.jobs.pop_front()?;
        debug_assert!(job.arrival_time >= last_arrival, "Scripted jobs out of order");
        Some(job)
    }
}
