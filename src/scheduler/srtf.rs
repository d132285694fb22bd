use super::{ReadyQueue, Scheduler, SimCtx, Ticks, enqueue_arrived};

/// Preemptive SJF: the process with the least remaining burst runs until it
/// finishes or the next process arrives, whichever comes first.
#[derive(Debug, Default)]
pub struct SrtfScheduler {
    ready: ReadyQueue<Ticks>,
}

impl SrtfScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for SrtfScheduler {
    fn name(&self) -> &'static str {
        "Shortest Remaining Time First"
    }

    fn init(&mut self, _ctx: &SimCtx) {
        self.ready.clear();
    }

    fn on_tick(&mut self, ctx: &mut SimCtx) {
        if self.ready.is_empty() {
            ctx.skip_to_next_arrival();
        }
        enqueue_arrived(ctx, &mut self.ready, |ctx, proc| {
            ctx.process(proc).remaining()
        });

        let Some(proc) = self.ready.pop() else {
            return;
        };
        // Remaining burst is the key, so re-key after every slice
        let slice = ctx.time_to_next_arrival();
        if !ctx.dispatch(slice, Some(proc)) {
            self.ready.push(proc, ctx.process(proc).remaining());
        }
    }
}
