//! Transition trace for a simulation run.
//!
//! Every change of the CPU's running slot is recorded with its simulated
//! timestamp, so tests and reports can reconstruct exactly which process held
//! the CPU over which interval.

use serde::Serialize;

use super::state::{ProcessId, Time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceKind {
    /// Process placed onto the CPU.
    Dispatched { pid: ProcessId },
    /// Process taken off the CPU because a shorter job arrived.
    Preempted { pid: ProcessId },
    /// Process taken off the CPU at the end of its time slice.
    Switched { pid: ProcessId },
    /// Process finished its service time.
    Completed { pid: ProcessId },
}

impl TraceKind {
    pub fn pid(&self) -> ProcessId {
        match *self {
            Self::Dispatched { pid }
            | Self::Preempted { pid }
            | Self::Switched { pid }
            | Self::Completed { pid } => pid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceEvent {
    pub time: Time,
    pub kind: TraceKind,
}

/// One uninterrupted stretch of CPU time held by a single process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Slice {
    pub pid: ProcessId,
    pub start: Time,
    pub end: Time,
    /// The transition that ended the slice.
    pub ended_by: TraceKind,
}

impl Slice {
    pub fn len(&self) -> Time {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Default)]
pub struct Trace {
    enabled: bool,
    events: Vec<TraceEvent>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn record(&mut self, time: Time, kind: TraceKind) {
        if self.enabled {
            self.events.push(TraceEvent { time, kind });
        }
    }

    /// All recorded transitions in chronological order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Number of times `pid` was placed onto the CPU.
    pub fn dispatch_count(&self, pid: ProcessId) -> usize {
        self.events
            .iter()
            .filter(|e| e.kind == TraceKind::Dispatched { pid })
            .count()
    }

    /// Pair each dispatch with the transition that ended it.
    ///
    /// A dispatch still open at the end of the trace produces no slice.
    pub fn slices(&self) -> Vec<Slice> {
        let mut slices = Vec::new();
        let mut open: Option<(ProcessId, Time)> = None;

        for event in &self.events {
            match event.kind {
                TraceKind::Dispatched { pid } => {
                    debug_assert!(open.is_none(), "Dispatch of {pid} while CPU busy");
                    open = Some((pid, event.time));
                }
                ended_by => {
                    if let Some((pid, start)) = open.take() {
                        debug_assert_eq!(pid, ended_by.pid(), "Slice ended by another process");
                        slices.push(Slice {
                            pid,
                            start,
                            end: event.time,
                            ended_by,
                        });
                    }
                }
            }
        }

        slices
    }
}
