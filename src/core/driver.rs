use average::{Estimate, Mean};
use tracing::info;

use super::{
    observer::Observer,
    process::{Process, ProcessId},
    state::{SimCtx, Ticks},
    timeline::Timeline,
};
use crate::{error::SpecError, scheduler::Scheduler, sim::ProcessSpec};

/// Simulation engine: owns the process set and runs a scheduler over it.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            ctx: SimCtx::new(),
            scheduler,
            observer: Observer::new(),
        }
    }

    pub fn with_processes(
        scheduler: S,
        specs: impl IntoIterator<Item = ProcessSpec>,
    ) -> Result<Self, SpecError> {
        let mut core = Self::new(scheduler);
        for spec in specs {
            core.insert_process(spec)?;
        }
        Ok(core)
    }

    #[track_caller]
    pub fn insert_process(&mut self, spec: ProcessSpec) -> Result<ProcessId, SpecError> {
        self.ctx.insert_process(spec)
    }

    #[track_caller]
    pub fn rewind(&mut self) {
        self.ctx.rewind();
    }

    /// Runs the scheduler from t=0 until every process has finished.
    pub fn execute(&mut self) {
        self.ctx.begin_run();
        self.scheduler.init(&self.ctx);
        self.observer.reset(&self.ctx);
        info!(
            scheduler = self.scheduler.name(),
            processes = self.ctx.processes().len(),
            "simulation started"
        );

        while self.ctx.has_unfinished() {
            self.ctx.queue_arrived();
            self.scheduler.on_tick(&mut self.ctx);
            self.observer.observe(&self.ctx);
        }

        self.ctx.finish_run();
        info!(
            scheduler = self.scheduler.name(),
            steps = self.observer.steps(),
            makespan = self.ctx.now(),
            "simulation finished"
        );
    }

    pub fn name(&self) -> &'static str {
        self.scheduler.name()
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now()
    }

    /// Processes in arrival order.
    pub fn processes(&self) -> &[Process] {
        self.ctx.processes()
    }

    /// Looks a process up by the id `insert_process` returned.
    pub fn process_by_id(&self, id: ProcessId) -> Option<&Process> {
        self.ctx.processes().iter().find(|p| p.id() == id)
    }

    #[track_caller]
    pub fn timeline(&self) -> &Timeline {
        self.ctx.timeline()
    }

    /// Final clock value of the last run.
    #[track_caller]
    pub fn makespan(&self) -> Ticks {
        self.ctx.assert_finished("makespan");
        self.ctx.now()
    }

    #[track_caller]
    pub fn total_turnaround_time(&self) -> Ticks {
        self.ctx.assert_finished("total_turnaround_time");
        self.processes().iter().map(Process::turnaround_time).sum()
    }

    #[track_caller]
    pub fn average_turnaround_time(&self) -> f64 {
        self.ctx.assert_finished("average_turnaround_time");
        mean(self.processes().iter().map(Process::turnaround_time))
    }

    #[track_caller]
    pub fn total_waiting_time(&self) -> Ticks {
        self.ctx.assert_finished("total_waiting_time");
        self.processes().iter().map(Process::waiting_time).sum()
    }

    #[track_caller]
    pub fn average_waiting_time(&self) -> f64 {
        self.ctx.assert_finished("average_waiting_time");
        mean(self.processes().iter().map(Process::waiting_time))
    }

    /// Fraction of the elapsed time the CPU spent running processes.
    #[track_caller]
    pub fn cpu_utilization(&self) -> f64 {
        self.ctx.assert_finished("cpu_utilization");
        let elapsed = self.ctx.now();
        if elapsed == 0 {
            return 0.0;
        }
        let busy: Ticks = self.processes().iter().map(Process::burst).sum();
        busy as f64 / elapsed as f64
    }
}

fn mean(values: impl Iterator<Item = Ticks>) -> f64 {
    let mean: Mean = values.map(|v| v as f64).collect();
    if mean.is_empty() { 0.0 } else { mean.estimate() }
}
