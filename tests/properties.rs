//! Invariants every policy must uphold on arbitrary valid workloads.

use cpu_sched_sim::{Algorithm, ProcessSpec, Report, Ticks, simulate};
use proptest::prelude::*;
use std::collections::HashMap;

fn workload() -> impl Strategy<Value = Vec<ProcessSpec>> {
    prop::collection::vec((0..30u64, 1..10u64, 0..4i32), 1..12).prop_map(|procs| {
        procs
            .into_iter()
            .enumerate()
            .map(|(i, (arrival, burst, priority))| {
                ProcessSpec::new(format!("P{}", i + 1), arrival, burst, priority)
            })
            .collect()
    })
}

fn check_report(report: &Report, specs: &[ProcessSpec]) {
    let timeline = &report.timeline;
    let by_name: HashMap<&str, &ProcessSpec> =
        specs.iter().map(|s| (s.name.as_str(), s)).collect();

    // Contiguous from 0 up to the makespan
    assert_eq!(timeline.first().map(|r| r.start), Some(0));
    assert_eq!(timeline.last().map(|r| r.end), Some(report.makespan));
    for pair in timeline.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    assert!(timeline.iter().all(|r| r.start < r.end));

    let total: Ticks = timeline.iter().map(|r| r.end - r.start).sum();
    let busy: Ticks = timeline
        .iter()
        .filter(|r| r.name.is_some())
        .map(|r| r.end - r.start)
        .sum();
    let bursts: Ticks = specs.iter().map(|s| s.burst).sum();
    assert_eq!(total, report.makespan);
    assert_eq!(busy, bursts);

    // Each process gets exactly its burst, never before it arrives
    let mut served: HashMap<&str, Ticks> = HashMap::new();
    for row in timeline {
        if let Some(name) = row.name.as_deref() {
            assert!(row.start >= by_name[name].arrival, "{name} ran early");
            *served.entry(name).or_default() += row.end - row.start;
        }
    }
    for spec in specs {
        assert_eq!(served.get(spec.name.as_str()), Some(&spec.burst));
    }

    // The CPU only idles when nothing is ready, up to the next arrival
    for row in timeline.iter().filter(|r| r.name.is_none()) {
        for row_proc in &report.processes {
            assert!(
                row_proc.arrival > row.start || row_proc.completion <= row.start,
                "{} was ready during idle span [{}, {})",
                row_proc.name,
                row.start,
                row.end
            );
        }
        assert!(specs.iter().any(|s| s.arrival == row.end));
    }

    for row in &report.processes {
        assert!(row.turnaround >= row.burst);
        assert_eq!(row.turnaround, row.completion - row.arrival);
        assert_eq!(row.waiting, row.turnaround - row.burst);
    }
    assert!(report.cpu_utilization > 0.0 && report.cpu_utilization <= 1.0);
}

proptest! {
    #[test]
    fn prop_all_policies_produce_valid_schedules(specs in workload(), quantum in 0..5u64) {
        for algorithm in Algorithm::all(quantum) {
            let report = simulate(algorithm, specs.clone()).unwrap();
            check_report(&report, &specs);
        }
    }

    #[test]
    fn prop_non_preemptive_runs_each_process_once(specs in workload()) {
        for algorithm in [Algorithm::Fcfs, Algorithm::Sjf, Algorithm::PriorityNonPreemptive] {
            let report = simulate(algorithm, specs.clone()).unwrap();
            let slices = report.timeline.iter().filter(|r| r.name.is_some()).count();
            prop_assert_eq!(slices, specs.len());
        }
    }

    #[test]
    fn prop_fcfs_completes_in_arrival_order(specs in workload()) {
        let report = simulate(Algorithm::Fcfs, specs).unwrap();
        let mut rows = report.processes.clone();
        rows.sort_by_key(|r| (r.arrival, r.id));
        for pair in rows.windows(2) {
            prop_assert!(pair[0].completion < pair[1].completion);
        }
    }

    #[test]
    fn prop_srtf_never_waits_longer_on_average_than_sjf(specs in workload()) {
        let sjf = simulate(Algorithm::Sjf, specs.clone()).unwrap();
        let srtf = simulate(Algorithm::Srtf, specs).unwrap();
        prop_assert!(srtf.average_waiting <= sjf.average_waiting + 1e-9);
    }

    #[test]
    fn prop_makespan_is_policy_independent(specs in workload(), quantum in 0..5u64) {
        let makespans: Vec<Ticks> = Algorithm::all(quantum)
            .into_iter()
            .map(|algorithm| simulate(algorithm, specs.clone()).unwrap().makespan)
            .collect();
        prop_assert!(makespans.windows(2).all(|w| w[0] == w[1]));
    }
}
