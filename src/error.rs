//! Simulation error types

use thiserror::Error;

use crate::core::{ProcessId, Time};
use crate::scheduler::Policy;

/// Errors that abort a simulation run.
///
/// Every variant is a configuration or contract violation; the event loop has
/// no transient failures and nothing is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Arrival rate must be positive and finite
    #[error("arrival rate must be positive and finite, got {0}")]
    NonPositiveArrivalRate(f64),

    /// Mean service time must be positive and finite
    #[error("mean service time must be positive and finite, got {0}")]
    NonPositiveServiceTime(f64),

    /// Quantum must be positive and finite
    #[error("time quantum must be positive and finite, got {0}")]
    NonPositiveQuantum(f64),

    /// Round-Robin configured without a quantum
    #[error("policy {0} requires a time quantum")]
    MissingQuantum(Policy),

    /// A run must complete at least one process
    #[error("run length must be at least 1")]
    ZeroRunLength,

    /// Scripted job with a negative arrival time or non-positive service time
    #[error("invalid job: arrival {arrival_time}, service {service_time}")]
    InvalidJob {
        arrival_time: Time,
        service_time: Time,
    },

    /// Policy name did not parse
    #[error("unknown scheduling policy: {0:?}")]
    UnknownPolicy(String),

    /// The policy does not handle this kind of event
    #[error("policy {policy} cannot handle {event} events")]
    UnexpectedEvent { policy: Policy, event: &'static str },

    /// A completion or switch fired while the CPU was idle
    #[error("{event} event fired with no running process")]
    NoRunningProcess { event: &'static str },

    /// A completion or switch fired for a process that is not running
    #[error("{event} event for process {expected} but process {running} is running")]
    StaleEvent {
        event: &'static str,
        expected: ProcessId,
        running: ProcessId,
    },

    /// The event queue drained before enough processes completed
    #[error("event queue drained at t={at} after {completed} of {required} completions")]
    Stalled {
        completed: usize,
        required: usize,
        at: Time,
    },
}
