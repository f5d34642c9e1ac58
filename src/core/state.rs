use keyed_priority_queue::KeyedPriorityQueue;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use super::event::{EventId, EventKind, EventQueue};
use super::trace::{Trace, TraceKind};
use crate::error::SimError;

// Index into process Vec
pub type ProcessId = usize;
/// Simulated time in seconds.
pub type Time = f64;

/// Slack allowed when comparing accumulated CPU time against service time.
pub const TIME_EPSILON: Time = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessState {
    // Created, arrival event still pending
    Pending,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Process {
    pub id: ProcessId,
    pub state: ProcessState,
    pub arrival_time: Time,
    pub service_time: Time,
    pub start_time: Option<Time>,
    pub used_time: Time,
    pub completion_time: Option<Time>,
}

impl Process {
    pub fn remaining(&self) -> Time {
        (self.service_time - self.used_time).max(0.0)
    }

    pub fn turnaround(&self) -> Option<Time> {
        self.completion_time.map(|done| done - self.arrival_time)
    }

    /// Time spent waiting in the ready queue over the whole lifetime.
    pub fn waiting(&self) -> Option<Time> {
        self.turnaround().map(|t| (t - self.service_time).max(0.0))
    }

    /// Delay between arrival and first dispatch.
    pub fn response(&self) -> Option<Time> {
        self.start_time.map(|start| start - self.arrival_time)
    }
}

/// Ready-queue position: lowest key first, ties by insertion order.
#[derive(Debug, Clone, Copy)]
struct Rank {
    key: f64,
    seq: u64,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Rank's Ord
impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

/// Processes waiting for the CPU, ordered by a caller-supplied ranking key.
///
/// Policies decide the key; the queue itself only knows "smallest key first,
/// then first in". Pushing every process with the same key yields a plain FIFO.
#[derive(Debug)]
pub struct ReadyQueue {
    entries: KeyedPriorityQueue<ProcessId, Rank>,
    next_seq: u64,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self {
            entries: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, pid: ProcessId, key: f64) {
        let rank = Rank {
            key,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        let previous = self.entries.push(pid, rank);
        debug_assert!(previous.is_none(), "Process {pid} queued twice");
    }

    pub fn pop(&mut self) -> Option<ProcessId> {
        self.entries.pop().map(|(pid, _)| pid)
    }

    /// Head of the queue with its ranking key.
    pub fn peek(&self) -> Option<(ProcessId, f64)> {
        self.entries.peek().map(|(pid, rank)| (*pid, rank.key))
    }

    pub fn contains(&self, pid: ProcessId) -> bool {
        self.entries.get_priority(&pid).is_some()
    }

    /// Queued processes with their keys, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (ProcessId, f64)> + '_ {
        self.entries.iter().map(|(pid, rank)| (*pid, rank.key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ReadyQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// All mutable state of one single-CPU run.
///
/// Owned by the event loop and handed to the scheduler by `&mut` on every
/// call; the scheduler never holds onto it.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Time,
    pub processes: Vec<Process>,
    pub ready: ReadyQueue,
    pub running: Option<ProcessId>,
    // Completion order
    pub done: Vec<ProcessId>,
    pub events: EventQueue,
    pub trace: Trace,

    // COMPLETE or SWITCH event scheduled for the running process
    running_event: Option<EventId>,
}

impl SimCtx {
    pub fn new(trace: bool) -> Self {
        Self {
            now: 0.0,
            processes: Vec::new(),
            ready: ReadyQueue::new(),
            running: None,
            done: Vec::new(),
            events: EventQueue::new(),
            trace: Trace::new(trace),
            running_event: None,
        }
    }

    pub fn create_process(&mut self, arrival_time: Time, service_time: Time) -> ProcessId {
        let id = self.processes.len();
        self.processes.push(Process {
            id,
            state: ProcessState::Pending,
            arrival_time,
            service_time,
            start_time: None,
            used_time: 0.0,
            completion_time: None,
        });
        id
    }

    pub fn advance_to(&mut self, time: Time) {
        debug_assert!(time >= self.now, "Clock moved backwards: {} -> {time}", self.now);
        self.now = time;
    }

    pub fn process(&self, pid: ProcessId) -> &Process {
        &self.processes[pid]
    }

    pub fn process_mut(&mut self, pid: ProcessId) -> &mut Process {
        &mut self.processes[pid]
    }

    pub fn running_process(&self) -> Option<&Process> {
        self.running.map(|pid| self.process(pid))
    }

    /// Credit the running process with `elapsed` CPU time.
    ///
    /// The credit is capped at the process's remaining time; the capped amount
    /// is returned so the caller can add exactly the same figure to total usage.
    pub fn charge_running(&mut self, elapsed: Time) -> Time {
        let Some(pid) = self.running else {
            return 0.0;
        };
        let process = self.process_mut(pid);
        let credit = elapsed.min(process.remaining()).max(0.0);
        process.used_time += credit;
        credit
    }

    pub fn enqueue(&mut self, pid: ProcessId, key: f64) {
        let process = self.process_mut(pid);
        debug_assert!(
            process.state != ProcessState::Completed && process.state != ProcessState::Running,
            "Process {pid} must not be Running or Completed when enqueued"
        );
        process.state = ProcessState::Ready;
        self.ready.push(pid, key);
    }

    /// Pop the ready queue's head onto the idle CPU.
    pub fn dispatch_next(&mut self) -> Option<ProcessId> {
        let pid = self.ready.pop()?;
        self.set_running(pid);
        Some(pid)
    }

    pub fn set_running(&mut self, pid: ProcessId) {
        debug_assert!(
            !self.ready.contains(pid),
            "Running process {pid} must not be enqueued"
        );
        debug_assert!(self.running.is_none(), "CPU already running a process");
        debug_assert!(self.running_event.is_none(), "Idle CPU has a pending event");

        let now = self.now;
        let process = self.process_mut(pid);
        process.state = ProcessState::Running;
        process.start_time.get_or_insert(now);
        let remaining = process.remaining();

        self.running = Some(pid);
        self.trace.record(now, TraceKind::Dispatched { pid });
        debug!(t = now, pid, remaining, "dispatch");
    }

    /// Schedule the COMPLETE or SWITCH event that ends the running slice.
    pub fn schedule_running_event(&mut self, at: Time, kind: EventKind) {
        debug_assert!(at >= self.now, "Event {kind} scheduled in the past");
        debug_assert_eq!(
            self.running,
            Some(kind.process()),
            "Event {kind} scheduled for a process that is not running"
        );
        debug_assert!(self.running_event.is_none(), "Running slice already has an event");

        self.running_event = Some(self.events.schedule(at, kind));
    }

    pub fn has_running_event(&self) -> bool {
        self.running_event.is_some()
    }

    /// Take the running process off the CPU before its slice ends.
    ///
    /// Its pending COMPLETE event is cancelled; the caller must requeue it.
    pub fn preempt_running(&mut self) -> Option<ProcessId> {
        let pid = self.running.take()?;
        if let Some(id) = self.running_event.take() {
            let cancelled = self.events.cancel(id);
            debug_assert!(cancelled.is_some(), "Preempted process had no live event");
        }

        let now = self.now;
        let process = self.process_mut(pid);
        process.state = ProcessState::Ready;
        let remaining = process.remaining();

        self.trace.record(now, TraceKind::Preempted { pid });
        debug!(t = now, pid, remaining, "preempt");
        Some(pid)
    }

    /// Release the running process in response to its own COMPLETE/SWITCH event.
    fn release_running(&mut self, kind: EventKind) -> Result<ProcessId, SimError> {
        let running = self.running.ok_or(SimError::NoRunningProcess { event: kind.name() })?;
        if running != kind.process() {
            return Err(SimError::StaleEvent {
                event: kind.name(),
                expected: kind.process(),
                running,
            });
        }

        self.running = None;
        self.running_event = None;
        Ok(running)
    }

    /// Handle a COMPLETE event: the running process finishes at `now`.
    pub fn complete_running(&mut self, kind: EventKind) -> Result<ProcessId, SimError> {
        let pid = self.release_running(kind)?;
        self.mark_completed(pid);
        Ok(pid)
    }

    /// Handle a SWITCH event: the running process leaves the CPU, not yet requeued.
    pub fn switch_running(&mut self, kind: EventKind) -> Result<ProcessId, SimError> {
        let pid = self.release_running(kind)?;
        let now = self.now;
        self.process_mut(pid).state = ProcessState::Ready;

        self.trace.record(now, TraceKind::Switched { pid });
        debug!(t = now, pid, remaining = self.process(pid).remaining(), "switch");
        Ok(pid)
    }

    pub fn mark_completed(&mut self, pid: ProcessId) {
        debug_assert!(
            !self.ready.contains(pid),
            "Completing process {pid} that is still enqueued"
        );

        let now = self.now;
        let process = &mut self.processes[pid];
        debug_assert!(
            process.remaining() <= TIME_EPSILON,
            "Process {pid} completed with {} remaining",
            process.remaining()
        );

        process.state = ProcessState::Completed;
        process.completion_time = Some(now);
        self.done.push(pid);

        self.trace.record(now, TraceKind::Completed { pid });
        debug!(t = now, pid, "complete");
    }
}
