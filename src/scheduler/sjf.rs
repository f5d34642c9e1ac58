use super::{Policy, Scheduler};
use crate::core::{EventKind, ProcessId, SimCtx};

/// Preemptive shortest-job-first (shortest remaining time first).
///
/// The ready queue is ranked by remaining time at insertion. A waiting
/// process's remaining time cannot change, so the key stays exact until it is
/// dispatched again.
pub struct Sjf;

impl Scheduler for Sjf {
    fn policy(&self) -> Policy {
        Policy::Sjf
    }

    fn insert(&mut self, ctx: &mut SimCtx, pid: ProcessId) {
        let remaining = ctx.process(pid).remaining();
        ctx.enqueue(pid, remaining);
    }

    fn reconcile(&mut self, ctx: &mut SimCtx) {
        // Preempt only for a strictly shorter job; ties keep the CPU
        if let Some(current) = ctx.running {
            let remaining = ctx.process(current).remaining();
            let shorter_waiting = ctx
                .ready
                .peek()
                .is_some_and(|(_, shortest)| shortest < remaining);

            if shorter_waiting {
                if let Some(preempted) = ctx.preempt_running() {
                    self.insert(ctx, preempted);
                }
            }
        }

        if ctx.running.is_none() {
            ctx.dispatch_next();
        }

        // The stale completion of a preempted process was cancelled, so an
        // existing event always belongs to the current slice
        if let Some(pid) = ctx.running {
            if !ctx.has_running_event() {
                let at = ctx.now + ctx.process(pid).remaining();
                ctx.schedule_running_event(at, EventKind::Complete { process: pid });
            }
        }
    }
}
