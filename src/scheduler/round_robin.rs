use std::collections::VecDeque;

use super::{DEFAULT_QUANTUM, ProcIdx, Scheduler, SimCtx, Ticks};

#[derive(Debug)]
pub struct RoundRobinScheduler {
    // None when the configured quantum is 0: slices are unbounded
    quantum: Option<Ticks>,
    ready: VecDeque<ProcIdx>,
    current: Option<ProcIdx>,
}

impl RoundRobinScheduler {
    pub fn new(quantum: Ticks) -> Self {
        Self {
            quantum: (quantum > 0).then_some(quantum),
            ready: VecDeque::new(),
            current: None,
        }
    }

    pub fn quantum(&self) -> Ticks {
        self.quantum.unwrap_or(0)
    }
}

impl Default for RoundRobinScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUANTUM)
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        "Round Robin"
    }

    fn init(&mut self, _ctx: &SimCtx) {
        self.ready.clear();
        self.current = None;
    }

    fn on_tick(&mut self, ctx: &mut SimCtx) {
        if self.ready.is_empty() && self.current.is_none() {
            ctx.skip_to_next_arrival();
        }
        while let Some(proc) = ctx.pop_arrived() {
            self.ready.push_back(proc);
        }

        // Preempted process goes behind everything that arrived during its slice
        if let Some(next) = self.ready.pop_front() {
            if let Some(prev) = self.current.replace(next) {
                self.ready.push_back(prev);
            }
        }

        if let Some(proc) = self.current {
            if ctx.dispatch(self.quantum, Some(proc)) {
                self.current = None;
            }
        }
    }
}
