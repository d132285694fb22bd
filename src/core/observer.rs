use super::state::{SimCtx, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Snapshot {
    now: Ticks,
    pending: usize,
    unfinished: usize,
}

impl Snapshot {
    fn of(ctx: &SimCtx) -> Self {
        Self {
            now: ctx.now(),
            pending: ctx.pending_arrivals(),
            unfinished: ctx.unfinished_count(),
        }
    }
}

/// Checks engine invariants after every scheduler tick.
#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
    last: Option<Snapshot>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self, ctx: &SimCtx) {
        self.step = 0;
        self.last = Some(Snapshot::of(ctx));
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;
        let snapshot = Snapshot::of(ctx);

        // Every tick must move the clock, drain an arrival or finish a process,
        // otherwise the run would never terminate.
        if let Some(last) = self.last {
            assert!(
                snapshot.now > last.now
                    || snapshot.pending < last.pending
                    || snapshot.unfinished < last.unfinished,
                "Scheduler made no progress on step {} (t={}, {} pending, {} unfinished)",
                self.step,
                snapshot.now,
                snapshot.pending,
                snapshot.unfinished
            );
        }
        self.last = Some(snapshot);

        debug_assert_eq!(
            ctx.timeline_end().unwrap_or(0),
            ctx.now(),
            "Timeline must end at the current clock"
        );

        for (proc, process) in ctx.processes().iter().enumerate() {
            debug_assert_eq!(
                process.is_finished(),
                !ctx.is_unfinished(proc),
                "Process {proc} finished state disagrees with the unfinished set"
            );
            debug_assert_eq!(
                process.is_finished(),
                process.remaining() == 0,
                "Process {proc} has remaining burst {} but finished={}",
                process.remaining(),
                process.is_finished()
            );
        }
    }
}
