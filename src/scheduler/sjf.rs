use super::{ReadyQueue, Scheduler, SimCtx, Ticks, enqueue_arrived};

/// Non-preemptive; ready processes ordered by their original burst.
#[derive(Debug, Default)]
pub struct SjfScheduler {
    ready: ReadyQueue<Ticks>,
}

impl SjfScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for SjfScheduler {
    fn name(&self) -> &'static str {
        "Shortest Job First"
    }

    fn init(&mut self, _ctx: &SimCtx) {
        self.ready.clear();
    }

    fn on_tick(&mut self, ctx: &mut SimCtx) {
        if self.ready.is_empty() {
            ctx.skip_to_next_arrival();
        }
        enqueue_arrived(ctx, &mut self.ready, |ctx, proc| ctx.process(proc).burst());
        if let Some(proc) = self.ready.pop() {
            ctx.dispatch(None, Some(proc));
        }
    }
}
