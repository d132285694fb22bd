use serde::Serialize;
use std::fmt;

use super::driver::Algorithm;
use crate::{
    core::{Priority, ProcessId, SchedCore, Ticks},
    scheduler::Scheduler,
};

/// Per-process results, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRow {
    pub id: ProcessId,
    pub name: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: Priority,
    pub completion: Ticks,
    pub turnaround: Ticks,
    pub waiting: Ticks,
}

/// One timeline interval; `id` and `name` are `None` for idle spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineRow {
    pub id: Option<ProcessId>,
    pub name: Option<String>,
    pub start: Ticks,
    pub end: Ticks,
}

/// Read-only results of a finished simulation.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantum: Option<Ticks>,
    pub processes: Vec<ProcessRow>,
    pub total_turnaround: Ticks,
    pub average_turnaround: f64,
    pub total_waiting: Ticks,
    pub average_waiting: f64,
    pub cpu_utilization: f64,
    pub makespan: Ticks,
    pub timeline: Vec<TimelineRow>,
}

impl Report {
    #[track_caller]
    pub fn from_core<S: Scheduler>(core: &SchedCore<S>, algorithm: Algorithm) -> Self {
        let mut processes = core
            .processes()
            .iter()
            .map(|p| ProcessRow {
                id: p.id(),
                name: p.name().to_string(),
                arrival: p.arrival(),
                burst: p.burst(),
                priority: p.priority(),
                completion: p.turnaround_time() + p.arrival(),
                turnaround: p.turnaround_time(),
                waiting: p.waiting_time(),
            })
            .collect::<Vec<_>>();
        processes.sort_by_key(|row| row.id);

        let timeline = core
            .timeline()
            .iter()
            .map(|interval| TimelineRow {
                id: interval.occupant,
                name: interval
                    .occupant
                    .and_then(|id| core.process_by_id(id))
                    .map(|p| p.name().to_string()),
                start: interval.start,
                end: interval.end,
            })
            .collect();

        Self {
            algorithm: algorithm.to_string(),
            quantum: algorithm.quantum(),
            processes,
            total_turnaround: core.total_turnaround_time(),
            average_turnaround: core.average_turnaround_time(),
            total_waiting: core.total_waiting_time(),
            average_waiting: core.average_waiting_time(),
            cpu_utilization: core.cpu_utilization(),
            makespan: core.makespan(),
            timeline,
        }
    }

    pub fn gantt(&self) -> Gantt<'_> {
        Gantt {
            rows: &self.timeline,
        }
    }
}

const IDLE_LABEL: &str = "──";

/// Boxed Gantt strip with tick labels underneath. Consecutive slices of
/// the same process are drawn as one block.
pub struct Gantt<'a> {
    rows: &'a [TimelineRow],
}

struct Block<'a> {
    id: Option<ProcessId>,
    label: &'a str,
    start: Ticks,
    end: Ticks,
}

impl Gantt<'_> {
    // Merged by occupant id, since names need not be unique
    fn blocks(&self) -> Vec<Block<'_>> {
        let mut blocks: Vec<Block<'_>> = Vec::new();
        for row in self.rows {
            match blocks.last_mut() {
                Some(last) if last.id == row.id && last.end == row.start => last.end = row.end,
                Some(_) | None => blocks.push(Block {
                    id: row.id,
                    label: row.name.as_deref().unwrap_or(IDLE_LABEL),
                    start: row.start,
                    end: row.end,
                }),
            }
        }
        blocks
    }
}

impl fmt::Display for Gantt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocks = self.blocks();
        let Some(end) = blocks.last().map(|block| block.end) else {
            return Ok(());
        };
        let width = blocks
            .iter()
            .map(|block| block.label.chars().count() + 2)
            .max()
            .unwrap_or(0)
            .max(4);
        let bar = "─".repeat(width);
        let joined = |sep: &str| vec![bar.as_str(); blocks.len()].join(sep);

        writeln!(f, "╭{}╮", joined("┬"))?;
        for block in &blocks {
            write!(f, "│{:^width$}", block.label)?;
        }
        writeln!(f, "│")?;
        writeln!(f, "╰{}╯", joined("┴"))?;
        for block in &blocks {
            write!(f, "{:<w$}", block.start, w = width + 1)?;
        }
        writeln!(f, "{end}")
    }
}
