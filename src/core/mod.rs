pub mod driver;
pub mod observer;
pub mod process;
pub mod state;
pub mod timeline;

pub use driver::SchedCore;
pub use process::{Priority, Process, ProcessId};
pub use state::{ProcIdx, Ranked, ReadyQueue, RunPhase, SimCtx, Ticks};
pub use timeline::{Interval, Timeline};
