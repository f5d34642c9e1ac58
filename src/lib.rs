//! cpusim - discrete-event simulator for single-CPU scheduling policies.
//!
//! Processes arrive as a Poisson stream with exponentially distributed
//! service times and are scheduled First-Come-First-Served, preemptive
//! Shortest-Job-First (shortest remaining time), or Round-Robin. Each run
//! yields per-process timing records plus CPU usage totals.
//!
//! ```rust,no_run
//! use cpusim::{Policy, SimConfig};
//!
//! let config = SimConfig::new(Policy::RoundRobin, 10.0, 0.06, 1_000)
//!     .with_quantum(0.01)
//!     .with_seed(42);
//! let report = cpusim::run(&config)?;
//! println!("{:?}", report.summary());
//! # Ok::<(), cpusim::SimError>(())
//! ```

pub mod core;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod sim;

pub use error::SimError;
pub use report::{RunOutcome, RunReport, Summary};
pub use scheduler::{Fcfs, Policy, RoundRobin, Scheduler, Sjf};
pub use sim::{Job, PoissonWorkload, ScriptedWorkload, SimConfig, Simulator, Workload, run};
