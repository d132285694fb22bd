use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::{debug, trace};

use super::{
    process::{Process, ProcessId},
    timeline::Timeline,
};
use crate::{error::SpecError, sim::ProcessSpec};

pub type Ticks = u64;
/// Position in the arrival-ordered process list. Stable for the length of
/// a run, and doubles as the tie-breaking rank: a lower index arrived
/// earlier, or was inserted earlier among equal arrivals.
pub type ProcIdx = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Processes may be inserted; no results are available.
    Configuring,
    /// Inside `execute()`; only the scheduler may drive the context.
    Running,
    /// The last run completed and its results may be read.
    Finished,
}

/// Ordering key of a ready queue entry: the policy's key first, then rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked<K> {
    pub key: K,
    pub rank: ProcIdx,
}

// KeyedPriorityQueue is a max-heap, so smaller (key, rank) must compare greater
impl<K: Ord> Ord for Ranked<K> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&other.key, other.rank).cmp(&(&self.key, self.rank))
    }
}

impl<K: Ord> PartialOrd for Ranked<K> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ready list ordered by a policy key, smallest first, ties by rank.
#[derive(Debug)]
pub struct ReadyQueue<K: Ord> {
    procs: KeyedPriorityQueue<ProcIdx, Ranked<K>>,
}

impl<K: Ord> ReadyQueue<K> {
    pub fn new() -> Self {
        Self {
            procs: KeyedPriorityQueue::new(),
        }
    }

    #[track_caller]
    pub fn push(&mut self, proc: ProcIdx, key: K) {
        let prev = self.procs.push(proc, Ranked { key, rank: proc });
        assert!(prev.is_none(), "Process {proc} already present in ready queue");
    }

    pub fn pop(&mut self) -> Option<ProcIdx> {
        self.procs.pop().map(|(proc, _)| proc)
    }

    pub fn peek(&self) -> Option<ProcIdx> {
        self.procs.peek().map(|(&proc, _)| proc)
    }

    pub fn contains(&self, proc: ProcIdx) -> bool {
        self.procs.get_priority(&proc).is_some()
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    pub fn clear(&mut self) {
        self.procs = KeyedPriorityQueue::new();
    }
}

impl<K: Ord> Default for ReadyQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the engine owns: processes, queues, clock and timeline.
///
/// Schedulers receive `&mut SimCtx` in `on_tick()` and drive the run
/// through `pop_arrived`, `dispatch`, `time_to_next_arrival` and
/// `skip_to_next_arrival`. Those calls panic outside a run, and the setup
/// calls (`insert_process`, `rewind`) panic inside one.
#[derive(Debug)]
pub struct SimCtx {
    now: Ticks,
    phase: RunPhase,
    // Sorted by arrival; equal arrivals keep insertion order
    processes: Vec<Process>,
    incoming: VecDeque<ProcIdx>,
    arrived: VecDeque<ProcIdx>,
    unfinished: FxHashSet<ProcIdx>,
    timeline: Timeline,

    // Upper bounds on the clock: no run ends after latest arrival + total burst
    latest_arrival: Ticks,
    total_burst: Ticks,

    // Increment upon process insertion
    next_process_id: ProcessId,
}

impl SimCtx {
    pub fn new() -> Self {
        Self {
            now: 0,
            phase: RunPhase::Configuring,
            processes: Vec::new(),
            incoming: VecDeque::new(),
            arrived: VecDeque::new(),
            unfinished: FxHashSet::default(),
            timeline: Timeline::new(),
            latest_arrival: 0,
            total_burst: 0,
            next_process_id: 0,
        }
    }

    #[track_caller]
    pub fn insert_process(&mut self, spec: ProcessSpec) -> Result<ProcessId, SpecError> {
        self.assert_not_running("insert_process");
        spec.validate()?;

        // Makespan and summed turnaround must both stay representable
        let count = self.processes.len() as Ticks + 1;
        let latest_arrival = self.latest_arrival.max(spec.arrival);
        let total_burst = self
            .total_burst
            .checked_add(spec.burst)
            .filter(|&total| latest_arrival.checked_add(total).is_some())
            .filter(|&total| total.checked_mul(count).is_some())
            .ok_or_else(|| SpecError::TimeOverflow {
                name: spec.name.clone(),
            })?;
        self.latest_arrival = latest_arrival;
        self.total_burst = total_burst;

        let id = self.next_process_id;
        self.next_process_id += 1;

        let at = self
            .processes
            .partition_point(|p| p.arrival() <= spec.arrival);
        trace!(id, name = %spec.name, arrival = spec.arrival, burst = spec.burst, "insert process");
        self.processes.insert(at, Process::new(id, spec));

        // Results of a previous run no longer describe the process set
        self.phase = RunPhase::Configuring;
        Ok(id)
    }

    #[track_caller]
    pub fn rewind(&mut self) {
        self.assert_not_running("rewind");
        self.reset();
        self.phase = RunPhase::Configuring;
    }

    fn reset(&mut self) {
        self.now = 0;
        self.incoming.clear();
        self.arrived.clear();
        self.unfinished.clear();
        self.timeline.clear();
        for process in &mut self.processes {
            process.rewind();
        }
    }

    pub(crate) fn begin_run(&mut self) {
        self.assert_not_running("execute");
        self.reset();
        self.incoming.extend(0..self.processes.len());
        self.unfinished.extend(0..self.processes.len());
        self.phase = RunPhase::Running;
    }

    pub(crate) fn finish_run(&mut self) {
        assert!(
            self.unfinished.is_empty(),
            "Run finished with {} unfinished processes",
            self.unfinished.len()
        );
        self.phase = RunPhase::Finished;
    }

    /// Moves every process whose arrival time has been reached into the
    /// arrived buffer.
    pub(crate) fn queue_arrived(&mut self) {
        self.assert_running("queue_arrived");
        while let Some(&proc) = self.incoming.front() {
            if self.processes[proc].arrival() > self.now {
                break;
            }
            self.incoming.pop_front();
            trace!(proc, now = self.now, "arrived");
            self.arrived.push_back(proc);
        }
    }

    /// Takes the next newly arrived process, in arrival order.
    #[track_caller]
    pub fn pop_arrived(&mut self) -> Option<ProcIdx> {
        self.assert_running("pop_arrived");
        self.arrived.pop_front()
    }

    /// Ticks until the earliest pending arrival, or `None` if every process
    /// has arrived. Zero if an arrival is already due but not yet queued.
    #[track_caller]
    pub fn time_to_next_arrival(&self) -> Option<Ticks> {
        self.assert_running("time_to_next_arrival");
        self.incoming
            .front()
            .map(|&proc| self.processes[proc].arrival().saturating_sub(self.now))
    }

    /// Idles the CPU up to the next arrival when nothing has arrived yet,
    /// then queues every process arriving at that instant.
    #[track_caller]
    pub fn skip_to_next_arrival(&mut self) {
        self.assert_running("skip_to_next_arrival");
        if !self.arrived.is_empty() {
            return;
        }
        let Some(wait) = self.time_to_next_arrival() else {
            return;
        };
        if wait > 0 {
            self.dispatch(Some(wait), None);
        }
        self.queue_arrived();
    }

    /// Advances the clock by `duration`, running `process` for that long.
    ///
    /// With a process, the duration is clamped to its remaining burst, and
    /// `None` means "run to completion". Without a process the CPU idles
    /// for exactly `duration`. Returns whether the process finished.
    #[track_caller]
    pub fn dispatch(&mut self, duration: Option<Ticks>, process: Option<ProcIdx>) -> bool {
        self.assert_running("dispatch");
        let start = self.now;

        let (elapsed, finished) = match (duration, process) {
            (None, None) => panic!("dispatch() needs a duration, a process, or both"),
            (Some(0), None) => return false,
            (Some(duration), None) => (duration, false),
            (duration, Some(proc)) => {
                let target = &mut self.processes[proc];
                let remaining = target.remaining();
                let elapsed = duration.map_or(remaining, |d| d.min(remaining));
                let finished = target.advance(start, elapsed);
                if finished {
                    let removed = self.unfinished.remove(&proc);
                    assert!(removed, "Finished process {proc} missing from unfinished set");
                }
                (elapsed, finished)
            }
        };

        let occupant = process.map(|proc| self.processes[proc].id());
        self.timeline.append(occupant, start, start + elapsed);
        self.now += elapsed;

        match process {
            Some(proc) => debug!(
                name = self.processes[proc].name(),
                start,
                end = self.now,
                finished,
                "dispatch"
            ),
            None => debug!(start, end = self.now, "idle"),
        }
        finished
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn process(&self, proc: ProcIdx) -> &Process {
        &self.processes[proc]
    }

    /// All processes in arrival order.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Timeline of the last completed run.
    #[track_caller]
    pub fn timeline(&self) -> &Timeline {
        self.assert_finished("timeline");
        &self.timeline
    }

    pub(crate) fn has_unfinished(&self) -> bool {
        !self.unfinished.is_empty()
    }

    pub(crate) fn unfinished_count(&self) -> usize {
        self.unfinished.len()
    }

    pub(crate) fn is_unfinished(&self, proc: ProcIdx) -> bool {
        self.unfinished.contains(&proc)
    }

    pub(crate) fn pending_arrivals(&self) -> usize {
        self.incoming.len()
    }

    pub(crate) fn timeline_end(&self) -> Option<Ticks> {
        self.timeline.end()
    }

    #[track_caller]
    fn assert_running(&self, op: &str) {
        assert!(
            self.phase == RunPhase::Running,
            "{op}() may only be called from on_tick() during a run (phase is {:?})",
            self.phase
        );
    }

    #[track_caller]
    fn assert_not_running(&self, op: &str) {
        assert!(
            self.phase != RunPhase::Running,
            "{op}() cannot be called while a simulation is running"
        );
    }

    #[track_caller]
    pub(crate) fn assert_finished(&self, op: &str) {
        assert!(
            self.phase == RunPhase::Finished,
            "{op}() is only available after execute() completes (phase is {:?})",
            self.phase
        );
    }
}

impl Default for SimCtx {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with(specs: &[(&str, Ticks, Ticks)]) -> SimCtx {
        let mut ctx = SimCtx::new();
        for &(name, arrival, burst) in specs {
            ctx.insert_process(ProcessSpec::new(name, arrival, burst, 0))
                .unwrap();
        }
        ctx
    }

    #[test]
    fn test_insert_keeps_arrival_order_stable() {
        let ctx = ctx_with(&[("A", 5, 1), ("B", 0, 1), ("C", 5, 1), ("D", 0, 1)]);
        let order: Vec<_> = ctx.processes().iter().map(|p| p.name()).collect();
        assert_eq!(order, ["B", "D", "A", "C"]);
        let ids: Vec<_> = ctx.processes().iter().map(|p| p.id()).collect();
        assert_eq!(ids, [1, 3, 0, 2]);
    }

    #[test]
    fn test_insert_rejects_zero_burst() {
        let mut ctx = SimCtx::new();
        let err = ctx.insert_process(ProcessSpec::new("Z", 0, 0, 0));
        assert!(matches!(err, Err(SpecError::ZeroBurst { .. })));
        assert!(ctx.processes().is_empty());
    }

    #[test]
    fn test_insert_rejects_clock_overflow() {
        let mut ctx = ctx_with(&[("A", Ticks::MAX - 10, 5)]);
        let err = ctx.insert_process(ProcessSpec::new("B", 0, 10, 0));
        assert_eq!(
            err,
            Err(SpecError::TimeOverflow {
                name: "B".to_string()
            })
        );
        assert_eq!(ctx.processes().len(), 1);

        // The rejected process leaves the bound untouched
        ctx.insert_process(ProcessSpec::new("C", 0, 5, 0)).unwrap();
        assert_eq!(ctx.processes().len(), 2);
    }

    #[test]
    fn test_insert_rejects_turnaround_sum_overflow() {
        let half = Ticks::MAX / 2;
        let mut ctx = ctx_with(&[("A", 0, half)]);
        let err = ctx.insert_process(ProcessSpec::new("B", 0, 1, 0));
        assert!(matches!(err, Err(SpecError::TimeOverflow { .. })));
    }

    #[test]
    fn test_dispatch_clamps_to_remaining() {
        let mut ctx = ctx_with(&[("A", 0, 3)]);
        ctx.begin_run();
        ctx.queue_arrived();
        let a = ctx.pop_arrived().unwrap();

        assert!(!ctx.dispatch(Some(2), Some(a)));
        assert!(ctx.dispatch(Some(5), Some(a)));
        assert_eq!(ctx.now(), 3);
        assert_eq!(ctx.process(a).completion_time(), Some(3));
        assert!(!ctx.has_unfinished());
    }

    #[test]
    fn test_dispatch_idle_zero_is_noop() {
        let mut ctx = ctx_with(&[("A", 0, 1)]);
        ctx.begin_run();
        assert!(!ctx.dispatch(Some(0), None));
        assert_eq!(ctx.now(), 0);
        assert_eq!(ctx.timeline_end(), None);
    }

    #[test]
    fn test_skip_to_next_arrival() {
        let mut ctx = ctx_with(&[("A", 3, 2), ("B", 3, 1), ("C", 7, 1)]);
        ctx.begin_run();
        ctx.queue_arrived();
        assert_eq!(ctx.time_to_next_arrival(), Some(3));

        ctx.skip_to_next_arrival();
        assert_eq!(ctx.now(), 3);
        assert_eq!(ctx.pop_arrived(), Some(0));
        assert_eq!(ctx.pop_arrived(), Some(1));
        assert_eq!(ctx.pop_arrived(), None);
        assert_eq!(ctx.time_to_next_arrival(), Some(4));
    }

    #[test]
    fn test_skip_is_noop_with_arrived_processes() {
        let mut ctx = ctx_with(&[("A", 0, 2), ("B", 4, 1)]);
        ctx.begin_run();
        ctx.queue_arrived();
        ctx.skip_to_next_arrival();
        assert_eq!(ctx.now(), 0);
        assert_eq!(ctx.pending_arrivals(), 1);
    }

    #[test]
    #[should_panic(expected = "needs a duration, a process, or both")]
    fn test_dispatch_nothing() {
        let mut ctx = ctx_with(&[("A", 0, 1)]);
        ctx.begin_run();
        ctx.dispatch(None, None);
    }

    #[test]
    #[should_panic(expected = "may only be called from on_tick()")]
    fn test_dispatch_outside_run() {
        let mut ctx = ctx_with(&[("A", 0, 1)]);
        ctx.dispatch(Some(1), Some(0));
    }

    #[test]
    #[should_panic(expected = "cannot be called while a simulation is running")]
    fn test_insert_during_run() {
        let mut ctx = ctx_with(&[("A", 0, 1)]);
        ctx.begin_run();
        let _ = ctx.insert_process(ProcessSpec::new("B", 0, 1, 0));
    }

    #[test]
    #[should_panic(expected = "cannot be called while a simulation is running")]
    fn test_rewind_during_run() {
        let mut ctx = ctx_with(&[("A", 0, 1)]);
        ctx.begin_run();
        ctx.rewind();
    }

    #[test]
    fn test_phase_transitions() {
        let mut ctx = ctx_with(&[("A", 0, 1)]);
        assert_eq!(ctx.phase(), RunPhase::Configuring);

        ctx.begin_run();
        assert_eq!(ctx.phase(), RunPhase::Running);
        ctx.queue_arrived();
        let a = ctx.pop_arrived().unwrap();
        ctx.dispatch(None, Some(a));
        ctx.finish_run();
        assert_eq!(ctx.phase(), RunPhase::Finished);

        ctx.insert_process(ProcessSpec::new("B", 0, 1, 0)).unwrap();
        assert_eq!(ctx.phase(), RunPhase::Configuring);
    }

    #[test]
    #[should_panic(expected = "only available after execute()")]
    fn test_timeline_before_run() {
        ctx_with(&[("A", 0, 1)]).timeline();
    }

    #[test]
    fn test_ready_queue_orders_by_key_then_rank() {
        let mut ready = ReadyQueue::new();
        ready.push(3, 5);
        ready.push(1, 7);
        ready.push(2, 5);
        ready.push(0, 9);

        assert_eq!(ready.peek(), Some(2));
        assert!(ready.contains(3));
        assert_eq!(ready.len(), 4);
        let order: Vec<_> = std::iter::from_fn(|| ready.pop()).collect();
        assert_eq!(order, [2, 3, 1, 0]);
        assert!(ready.is_empty());
    }

    #[test]
    #[should_panic(expected = "already present in ready queue")]
    fn test_ready_queue_double_push() {
        let mut ready = ReadyQueue::new();
        ready.push(0, 1);
        ready.push(0, 2);
    }
}
