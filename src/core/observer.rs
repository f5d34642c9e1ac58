use super::state::{ProcessState, SimCtx, TIME_EPSILON};

/// Checks run-wide invariants after every processed event.
#[derive(Debug)]
pub struct Observer {
    step: u64,
    // Enforce "no ready process is strictly shorter than the running one"
    shortest_first: bool,
}

impl Observer {
    pub fn new(shortest_first: bool) -> Self {
        Self {
            step: 0,
            shortest_first,
        }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        if let Some(pid) = ctx.running {
            let process = ctx.process(pid);
            debug_assert_eq!(
                process.state,
                ProcessState::Running,
                "ctx.running process {pid} must be Running"
            );
            debug_assert!(
                !ctx.ready.contains(pid),
                "Running process {pid} must not appear in the ready queue"
            );
            debug_assert!(
                ctx.has_running_event(),
                "Running process {pid} has no COMPLETE/SWITCH event pending"
            );

            if self.shortest_first {
                if let Some((head, key)) = ctx.ready.peek() {
                    debug_assert!(
                        key >= process.remaining(),
                        "Ready process {head} ({key}) is shorter than running process {pid} ({})",
                        process.remaining()
                    );
                }
            }
        } else {
            debug_assert!(
                ctx.ready.is_empty(),
                "CPU idle with {} ready processes",
                ctx.ready.len()
            );
        }

        for (pid, _) in ctx.ready.iter() {
            let process = ctx.process(pid);
            debug_assert_eq!(
                process.state,
                ProcessState::Ready,
                "Queued process {pid} must be Ready"
            );
            debug_assert!(
                process.used_time <= process.service_time + TIME_EPSILON,
                "Queued process {pid} used {} of {}",
                process.used_time,
                process.service_time
            );
        }

        if let Some(&pid) = ctx.done.last() {
            let process = ctx.process(pid);
            if let (Some(start), Some(done)) = (process.start_time, process.completion_time) {
                debug_assert!(
                    process.arrival_time <= start && start <= done,
                    "Process {pid} timeline out of order"
                );
            }
        }
    }
}
