pub mod fcfs;
pub mod priority;
pub mod round_robin;
pub mod sjf;
pub mod srtf;

use crate::core::state::{ProcIdx, ReadyQueue, SimCtx, Ticks};
pub use fcfs::FcfsScheduler;
pub use priority::PriorityScheduler;
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use srtf::SrtfScheduler;

pub const DEFAULT_QUANTUM: Ticks = 2;

/// A scheduling policy: decides what the CPU runs next.
///
/// The engine calls `on_tick()` once per iteration, after moving newly
/// arrived processes into the context's arrived buffer. Each call must
/// take the arrivals into the policy's own ready structure and make
/// progress, either by dispatching or by idling to the next arrival.
pub trait Scheduler {
    fn name(&self) -> &'static str;

    /// Called at the start of every run; drop state left from a previous one.
    fn init(&mut self, _ctx: &SimCtx) {}

    fn on_tick(&mut self, ctx: &mut SimCtx);
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn init(&mut self, ctx: &SimCtx) {
        (**self).init(ctx)
    }

    fn on_tick(&mut self, ctx: &mut SimCtx) {
        (**self).on_tick(ctx)
    }
}

/// Drains the arrived buffer into `ready`, keyed by `key`.
fn enqueue_arrived<K: Ord>(
    ctx: &mut SimCtx,
    ready: &mut ReadyQueue<K>,
    key: impl Fn(&SimCtx, ProcIdx) -> K,
) {
    while let Some(proc) = ctx.pop_arrived() {
        let k = key(&*ctx, proc);
        ready.push(proc, k);
    }
}
