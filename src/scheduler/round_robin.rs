use super::{FIFO_RANK, Policy, Scheduler};
use crate::core::{Event, EventKind, ProcessId, SimCtx, TIME_EPSILON, Time};
use crate::error::SimError;

/// Round-Robin with a fixed time quantum.
///
/// A dispatched process keeps the CPU until its own SWITCH or COMPLETE
/// fires; arrivals never cut a slice short.
pub struct RoundRobin {
    quantum: Time,
}

impl RoundRobin {
    pub fn new(quantum: Time) -> Result<Self, SimError> {
        if !(quantum.is_finite() && quantum > 0.0) {
            return Err(SimError::NonPositiveQuantum(quantum));
        }
        Ok(Self { quantum })
    }
}

impl Scheduler for RoundRobin {
    fn policy(&self) -> Policy {
        Policy::RoundRobin
    }

    fn quantum(&self) -> Option<Time> {
        Some(self.quantum)
    }

    fn insert(&mut self, ctx: &mut SimCtx, pid: ProcessId) {
        ctx.enqueue(pid, FIFO_RANK);
    }

    fn handle_event(&mut self, ctx: &mut SimCtx, event: &Event) -> Result<(), SimError> {
        match event.kind {
            EventKind::Arrival { process } => self.insert(ctx, process),
            EventKind::Complete { .. } => {
                ctx.complete_running(event.kind)?;
            }
            EventKind::Switch { .. } => {
                // Slice usage was credited before the event reached us
                let pid = ctx.switch_running(event.kind)?;
                if ctx.process(pid).remaining() <= TIME_EPSILON {
                    // Remaining time equalled the quantum: nothing left to requeue
                    ctx.mark_completed(pid);
                } else {
                    self.insert(ctx, pid);
                }
            }
        }
        Ok(())
    }

    fn reconcile(&mut self, ctx: &mut SimCtx) {
        if ctx.running.is_some() {
            return;
        }

        if let Some(pid) = ctx.dispatch_next() {
            let remaining = ctx.process(pid).remaining();
            if remaining < self.quantum {
                ctx.schedule_running_event(ctx.now + remaining, EventKind::Complete { process: pid });
            } else {
                ctx.schedule_running_event(ctx.now + self.quantum, EventKind::Switch { process: pid });
            }
        }
    }
}
