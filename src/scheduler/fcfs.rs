use std::collections::VecDeque;

use super::{ProcIdx, Scheduler, SimCtx};

#[derive(Debug, Default)]
pub struct FcfsScheduler {
    ready: VecDeque<ProcIdx>,
}

impl FcfsScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for FcfsScheduler {
    fn name(&self) -> &'static str {
        "First Come First Serve"
    }

    fn init(&mut self, _ctx: &SimCtx) {
        self.ready.clear();
    }

    fn on_tick(&mut self, ctx: &mut SimCtx) {
        if self.ready.is_empty() {
            ctx.skip_to_next_arrival();
        }
        while let Some(proc) = ctx.pop_arrived() {
            self.ready.push_back(proc);
        }
        if let Some(proc) = self.ready.pop_front() {
            ctx.dispatch(None, Some(proc));
        }
    }
}
