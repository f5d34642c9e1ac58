use super::{
    event::Event,
    observer::Observer,
    state::{SimCtx, Time},
};
use crate::{error::SimError, scheduler::Scheduler};

/// A scheduling policy bound to the state it schedules.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(scheduler: S, trace: bool) -> Self {
        let observer = Observer::new(scheduler.policy().is_preemptive());
        Self {
            ctx: SimCtx::new(trace),
            scheduler,
            observer,
        }
    }

    /// Apply one popped event, then let the policy re-evaluate the CPU.
    ///
    /// The clock must already stand at `event.timestamp` and the running
    /// process must already be credited for the elapsed interval.
    pub fn process_event(&mut self, event: &Event) -> Result<(), SimError> {
        debug_assert_eq!(
            self.ctx.now, event.timestamp,
            "Clock not advanced to event time"
        );

        self.scheduler.handle_event(&mut self.ctx, event)?;
        self.scheduler.reconcile(&mut self.ctx);
        self.observer.observe(&self.ctx);
        Ok(())
    }

    pub fn now(&self) -> Time {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
