use tracing::{debug, info};

use super::job::Workload;
use crate::{
    core::{Event, EventKind, SchedCore, Time, Trace},
    error::SimError,
    report::RunOutcome,
    scheduler::Scheduler,
};

/// Event loop for one single-CPU run.
///
/// Owns the clock, the event queue (inside the core's context) and the usage
/// counters. Arrivals are chained: each ARRIVAL pulls the following job from
/// the workload, so only one future arrival is ever pending.
pub struct Simulator<S: Scheduler, W: Workload> {
    pub core: SchedCore<S>,
    workload: W,
    run_length: usize,
    usage: Time,
    // Integral of ready-queue length over simulated time
    ready_area: f64,
    last_arrival: Time,
    bootstrapped: bool,
}

impl<S: Scheduler, W: Workload> Simulator<S, W> {
    pub fn new(scheduler: S, workload: W, run_length: usize) -> Self {
        Self {
            core: SchedCore::new(scheduler, false),
            workload,
            run_length,
            usage: 0.0,
            ready_area: 0.0,
            last_arrival: 0.0,
            bootstrapped: false,
        }
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.core.ctx.trace = Trace::new(enabled);
        self
    }

    /// Seed the event queue with the first arrival. Later calls do nothing.
    pub fn bootstrap(&mut self) {
        if self.bootstrapped {
            return;
        }
        self.bootstrapped = true;
        self.last_arrival = self.core.now();
        self.schedule_next_arrival();
    }

    /// Pop and apply the earliest pending event, returning it.
    pub fn step(&mut self) -> Result<Event, SimError> {
        self.bootstrap();

        let ctx = &mut self.core.ctx;
        let event = ctx.events.pop().ok_or_else(|| SimError::Stalled {
            completed: ctx.done.len(),
            required: self.run_length,
            at: ctx.now,
        })?;

        let elapsed = event.timestamp - ctx.now;
        debug_assert!(elapsed >= 0.0, "Event {} is in the past", event.kind);

        self.ready_area += ctx.ready.len() as f64 * elapsed;
        self.usage += ctx.charge_running(elapsed);
        ctx.advance_to(event.timestamp);

        if let EventKind::Arrival { .. } = event.kind {
            self.schedule_next_arrival();
        }

        self.core.process_event(&event)?;
        Ok(event)
    }

    pub fn is_finished(&self) -> bool {
        self.core.ctx.done.len() >= self.run_length
    }

    pub fn run(mut self) -> Result<RunOutcome, SimError> {
        if self.run_length == 0 {
            return Err(SimError::ZeroRunLength);
        }

        let policy = self.core.scheduler.policy();
        info!(%policy, run_length = self.run_length, "starting run");

        self.bootstrap();
        while !self.is_finished() {
            self.step()?;
        }

        let outcome = self.into_outcome();
        info!(
            %policy,
            elapsed = outcome.elapsed,
            usage = outcome.total_usage,
            utilization = outcome.utilization(),
            "run complete"
        );
        Ok(outcome)
    }

    /// CPU time credited to processes so far.
    pub fn usage(&self) -> Time {
        self.usage
    }

    fn schedule_next_arrival(&mut self) {
        let Some(job) = self.workload.next_job(self.last_arrival) else {
            debug!(t = self.core.now(), "workload exhausted");
            return;
        };

        let ctx = &mut self.core.ctx;
        let pid = ctx.create_process(job.arrival_time, job.service_time);
        ctx.events
            .schedule(job.arrival_time, EventKind::Arrival { process: pid });
        self.last_arrival = job.arrival_time;
    }

    fn into_outcome(self) -> RunOutcome {
        let ctx = self.core.ctx;
        let elapsed = ctx.now;
        let mean_ready_len = if elapsed > 0.0 {
            self.ready_area / elapsed
        } else {
            0.0
        };

        RunOutcome {
            policy: self.core.scheduler.policy(),
            quantum: self.core.scheduler.quantum(),
            run_length: self.run_length,
            elapsed,
            total_usage: self.usage,
            mean_ready_len,
            completed: ctx.done.iter().map(|&pid| ctx.processes[pid].clone()).collect(),
            trace: ctx.trace,
        }
    }
}
