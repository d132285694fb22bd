use super::{ReadyQueue, Scheduler, SimCtx, enqueue_arrived};
use crate::core::Priority;

/// Lowest priority value runs first; ties go to the earlier arrival.
///
/// The preemptive variant re-evaluates the choice whenever a new process
/// arrives, the non-preemptive one runs each process to completion.
#[derive(Debug)]
pub struct PriorityScheduler {
    ready: ReadyQueue<Priority>,
    preemptive: bool,
}

impl PriorityScheduler {
    pub fn non_preemptive() -> Self {
        Self {
            ready: ReadyQueue::new(),
            preemptive: false,
        }
    }

    pub fn preemptive() -> Self {
        Self {
            ready: ReadyQueue::new(),
            preemptive: true,
        }
    }

    pub fn is_preemptive(&self) -> bool {
        self.preemptive
    }
}

impl Scheduler for PriorityScheduler {
    fn name(&self) -> &'static str {
        if self.preemptive {
            "Priority Preemptive"
        } else {
            "Priority Non-Preemptive"
        }
    }

    fn init(&mut self, _ctx: &SimCtx) {
        self.ready.clear();
    }

    fn on_tick(&mut self, ctx: &mut SimCtx) {
        if self.ready.is_empty() {
            ctx.skip_to_next_arrival();
        }
        enqueue_arrived(ctx, &mut self.ready, |ctx, proc| {
            ctx.process(proc).priority()
        });

        let Some(proc) = self.ready.peek() else {
            return;
        };
        let slice = if self.preemptive {
            ctx.time_to_next_arrival()
        } else {
            None
        };
        // The key never changes, so an unfinished process keeps its place
        if ctx.dispatch(slice, Some(proc)) {
            self.ready.pop();
        }
    }
}
