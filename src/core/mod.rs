pub mod driver;
pub mod event;
pub mod observer;
pub mod state;
pub mod trace;

pub use driver::SchedCore;
pub use event::{Event, EventId, EventKind, EventQueue};
pub use observer::Observer;
pub use state::{Process, ProcessId, ProcessState, ReadyQueue, SimCtx, TIME_EPSILON, Time};
pub use trace::{Slice, Trace, TraceEvent, TraceKind};
