use super::{FIFO_RANK, Policy, Scheduler};
use crate::core::{EventKind, ProcessId, SimCtx};

/// First-come-first-served: run each process to completion in arrival order.
pub struct Fcfs;

impl Scheduler for Fcfs {
    fn policy(&self) -> Policy {
        Policy::Fcfs
    }

    fn insert(&mut self, ctx: &mut SimCtx, pid: ProcessId) {
        ctx.enqueue(pid, FIFO_RANK);
    }

    fn reconcile(&mut self, ctx: &mut SimCtx) {
        if ctx.running.is_some() {
            return;
        }

        if let Some(pid) = ctx.dispatch_next() {
            let at = ctx.now + ctx.process(pid).remaining();
            ctx.schedule_running_event(at, EventKind::Complete { process: pid });
        }
    }
}
