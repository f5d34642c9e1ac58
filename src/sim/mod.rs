pub mod config;
pub mod driver;
pub mod job;

pub use config::SimConfig;
pub use driver::Simulator;
pub use job::{Job, PoissonWorkload, ScriptedWorkload, Workload};

use crate::error::SimError;
use crate::report::RunReport;
use crate::scheduler::{Fcfs, Policy, RoundRobin, Sjf};

/// Validate `config` and run one simulation over a seeded Poisson workload.
pub fn run(config: &SimConfig) -> Result<RunReport, SimError> {
    config.validate()?;

    let workload = PoissonWorkload::new(config.arrival_rate, config.mean_service_time, config.seed)?;
    let outcome = match config.policy {
        Policy::Fcfs => Simulator::new(Fcfs, workload, config.run_length)
            .with_trace(config.trace)
            .run()?,
        Policy::Sjf => Simulator::new(Sjf, workload, config.run_length)
            .with_trace(config.trace)
            .run()?,
        Policy::RoundRobin => {
            let quantum = config
                .quantum
                .ok_or(SimError::MissingQuantum(config.policy))?;
            Simulator::new(RoundRobin::new(quantum)?, workload, config.run_length)
                .with_trace(config.trace)
                .run()?
        }
    };

    Ok(RunReport {
        config: config.clone(),
        outcome,
    })
}
