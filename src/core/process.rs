use super::state::Ticks;
use crate::sim::ProcessSpec;

/// Sequential identifier handed out by `insert_process`, in insertion order.
pub type ProcessId = usize;
/// Lower value means higher priority.
pub type Priority = i32;

#[derive(Debug, Clone)]
pub struct Process {
    id: ProcessId,
    spec: ProcessSpec,
    remaining: Ticks,
    completion_time: Option<Ticks>,
}

impl Process {
    /// Callers must have validated `spec` (positive burst).
    pub fn new(id: ProcessId, spec: ProcessSpec) -> Self {
        debug_assert!(spec.burst > 0, "Process {id} created with zero burst");
        Self {
            id,
            remaining: spec.burst,
            spec,
            completion_time: None,
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn arrival(&self) -> Ticks {
        self.spec.arrival
    }

    pub fn burst(&self) -> Ticks {
        self.spec.burst
    }

    pub fn priority(&self) -> Priority {
        self.spec.priority
    }

    pub fn remaining(&self) -> Ticks {
        self.remaining
    }

    pub fn completion_time(&self) -> Option<Ticks> {
        self.completion_time
    }

    pub fn is_finished(&self) -> bool {
        self.completion_time.is_some()
    }

    pub fn rewind(&mut self) {
        self.remaining = self.spec.burst;
        self.completion_time = None;
    }

    /// Runs the process for `duration` ticks starting at `now`.
    ///
    /// Returns true if this consumed the last of the remaining burst, in
    /// which case the completion time is `now + duration`. Asking for more
    /// work than remains is a bug in the caller, which must clamp first.
    #[track_caller]
    pub fn advance(&mut self, now: Ticks, duration: Ticks) -> bool {
        assert!(
            !self.is_finished(),
            "Process {} ({}) has already finished",
            self.id,
            self.name()
        );
        assert!(
            duration > 0,
            "Process {} must advance by a positive duration",
            self.id
        );
        assert!(
            duration <= self.remaining,
            "Process {} would finish before {duration} ticks ({} remaining)",
            self.id,
            self.remaining
        );

        self.remaining -= duration;
        if self.remaining == 0 {
            self.completion_time = Some(now + duration);
            return true;
        }
        false
    }

    #[track_caller]
    pub fn turnaround_time(&self) -> Ticks {
        let end = self
            .completion_time
            .unwrap_or_else(|| panic!("Process {} has not finished", self.id));
        end - self.spec.arrival
    }

    #[track_caller]
    pub fn waiting_time(&self) -> Ticks {
        self.turnaround_time() - self.spec.burst
    }
}
