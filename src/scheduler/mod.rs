pub mod fcfs;
pub mod round_robin;
pub mod sjf;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Event, EventKind, ProcessId, SimCtx, Time};
use crate::error::SimError;
pub use fcfs::Fcfs;
pub use round_robin::RoundRobin;
pub use sjf::Sjf;

/// Ready-queue key for arrival-order policies; equal keys keep insertion order.
pub const FIFO_RANK: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    #[serde(rename = "fcfs")]
    Fcfs,
    #[serde(rename = "sjf")]
    Sjf,
    #[serde(rename = "rr")]
    RoundRobin,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Fcfs, Policy::Sjf, Policy::RoundRobin];

    /// Whether a newly ready process may take the CPU from a running one.
    pub fn is_preemptive(self) -> bool {
        matches!(self, Policy::Sjf)
    }

    pub fn needs_quantum(self) -> bool {
        matches!(self, Policy::RoundRobin)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Policy::Fcfs => "FCFS",
            Policy::Sjf => "SJF",
            Policy::RoundRobin => "RR",
        })
    }
}

impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Policy::Fcfs),
            "sjf" | "srtf" => Ok(Policy::Sjf),
            "rr" | "round-robin" | "roundrobin" => Ok(Policy::RoundRobin),
            _ => Err(SimError::UnknownPolicy(s.to_string())),
        }
    }
}

/// A single-CPU scheduling discipline.
///
/// The event loop calls [`Scheduler::handle_event`] for every popped event
/// and [`Scheduler::reconcile`] straight after. All state lives in the
/// [`SimCtx`] passed in; implementations only carry their parameters.
pub trait Scheduler {
    fn policy(&self) -> Policy;

    fn quantum(&self) -> Option<Time> {
        None
    }

    /// Place a runnable process into the ready queue under this policy's ranking.
    fn insert(&mut self, ctx: &mut SimCtx, pid: ProcessId);

    fn handle_event(&mut self, ctx: &mut SimCtx, event: &Event) -> Result<(), SimError> {
        match event.kind {
            EventKind::Arrival { process } => {
                self.insert(ctx, process);
                Ok(())
            }
            EventKind::Complete { .. } => ctx.complete_running(event.kind).map(drop),
            EventKind::Switch { .. } => Err(SimError::UnexpectedEvent {
                policy: self.policy(),
                event: event.kind.name(),
            }),
        }
    }

    /// Decide whether to dispatch or preempt, and schedule the event that
    /// ends the running slice. Calling it again without an intervening state
    /// change schedules nothing.
    fn reconcile(&mut self, ctx: &mut SimCtx);
}
