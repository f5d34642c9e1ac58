use std::cmp::Ordering;
use std::fmt;

use keyed_priority_queue::KeyedPriorityQueue;
use slotmap::{SlotMap, new_key_type};

use super::state::{ProcessId, Time};

new_key_type! {
    pub struct EventId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // Process becomes ready; the process is handed to the ready queue
    Arrival { process: ProcessId },
    // Running process has consumed its whole service time
    Complete { process: ProcessId },
    // Running process has exhausted its time slice (Round-Robin only)
    Switch { process: ProcessId },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Arrival { .. } => "ARRIVAL",
            Self::Complete { .. } => "COMPLETE",
            Self::Switch { .. } => "SWITCH",
        }
    }

    pub fn process(&self) -> ProcessId {
        match *self {
            Self::Arrival { process } | Self::Complete { process } | Self::Switch { process } => {
                process
            }
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(p{})", self.name(), self.process())
    }
}

/// A timestamped simulation event. Never mutated once scheduled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub timestamp: Time,
    pub kind: EventKind,
}

/// Heap position of an event: earliest timestamp first, then insertion order.
#[derive(Debug, Clone, Copy)]
struct Stamp {
    timestamp: Time,
    seq: u64,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Stamp's Ord
impl Ord for Stamp {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .timestamp
            .total_cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Stamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Stamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Stamp {}

/// Pending events, drained in non-decreasing timestamp order.
///
/// Events sharing a timestamp pop in the order they were scheduled. Any
/// pending event can be cancelled through the [`EventId`] returned by
/// [`EventQueue::schedule`].
#[derive(Debug)]
pub struct EventQueue {
    events: SlotMap<EventId, Event>,
    order: KeyedPriorityQueue<EventId, Stamp>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: SlotMap::with_key(),
            order: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, timestamp: Time, kind: EventKind) -> EventId {
        debug_assert!(timestamp.is_finite(), "Event {kind} has timestamp {timestamp}");

        let id = self.events.insert(Event { timestamp, kind });
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.push(id, Stamp { timestamp, seq });
        id
    }

    pub fn pop(&mut self) -> Option<Event> {
        let (id, _) = self.order.pop()?;
        let event = self.events.remove(id);
        debug_assert!(event.is_some(), "Event {id:?} missing from event table");
        event
    }

    pub fn peek(&self) -> Option<&Event> {
        let (id, _) = self.order.peek()?;
        self.events.get(*id)
    }

    /// Remove a pending event. Returns `None` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: EventId) -> Option<Event> {
        self.order.remove(&id)?;
        self.events.remove(id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.events.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_timestamp_order() {
        let mut queue = EventQueue::new();
        for (i, t) in [3.0, 0.5, 2.25, 0.0, 7.0].into_iter().enumerate() {
            queue.schedule(t, EventKind::Arrival { process: i });
        }

        let times: Vec<Time> = std::iter::from_fn(|| queue.pop())
            .map(|e| e.timestamp)
            .collect();
        assert_eq!(times, vec![0.0, 0.5, 2.25, 3.0, 7.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn equal_timestamps_pop_in_insertion_order() {
        let mut queue = EventQueue::new();
        queue.schedule(1.0, EventKind::Complete { process: 4 });
        queue.schedule(1.0, EventKind::Arrival { process: 9 });
        queue.schedule(0.5, EventKind::Arrival { process: 8 });
        queue.schedule(1.0, EventKind::Switch { process: 2 });

        let kinds: Vec<EventKind> = std::iter::from_fn(|| queue.pop()).map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Arrival { process: 8 },
                EventKind::Complete { process: 4 },
                EventKind::Arrival { process: 9 },
                EventKind::Switch { process: 2 },
            ]
        );
    }

    #[test]
    fn cancelled_event_never_fires() {
        let mut queue = EventQueue::new();
        queue.schedule(1.0, EventKind::Arrival { process: 0 });
        let stale = queue.schedule(2.0, EventKind::Complete { process: 0 });
        queue.schedule(3.0, EventKind::Arrival { process: 1 });

        let cancelled = queue.cancel(stale).expect("event was pending");
        assert_eq!(cancelled.kind, EventKind::Complete { process: 0 });
        assert!(!queue.contains(stale));
        assert!(queue.cancel(stale).is_none());
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop().map(|e| e.timestamp), Some(1.0));
        assert_eq!(queue.peek().map(|e| e.timestamp), Some(3.0));
        assert_eq!(queue.pop().map(|e| e.timestamp), Some(3.0));
        assert!(queue.pop().is_none());
    }
}
