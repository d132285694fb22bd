use std::{fmt, str::FromStr};

use super::{ProcessSpec, report::Report};
use crate::{
    core::{SchedCore, Ticks},
    error::SpecError,
    scheduler::{
        DEFAULT_QUANTUM, FcfsScheduler, PriorityScheduler, RoundRobinScheduler, Scheduler,
        SjfScheduler, SrtfScheduler,
    },
};

/// Run-time choice of scheduling policy, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Fcfs,
    Sjf,
    Srtf,
    RoundRobin { quantum: Ticks },
    PriorityNonPreemptive,
    PriorityPreemptive,
}

impl Algorithm {
    /// Every policy, Round-Robin configured with `quantum`.
    pub fn all(quantum: Ticks) -> [Algorithm; 6] {
        [
            Algorithm::Fcfs,
            Algorithm::Sjf,
            Algorithm::Srtf,
            Algorithm::RoundRobin { quantum },
            Algorithm::PriorityNonPreemptive,
            Algorithm::PriorityPreemptive,
        ]
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Algorithm::Fcfs => "fcfs",
            Algorithm::Sjf => "sjf",
            Algorithm::Srtf => "srtf",
            Algorithm::RoundRobin { .. } => "rr",
            Algorithm::PriorityNonPreemptive => "pnp",
            Algorithm::PriorityPreemptive => "pp",
        }
    }

    pub fn uses_priority(&self) -> bool {
        matches!(
            self,
            Algorithm::PriorityNonPreemptive | Algorithm::PriorityPreemptive
        )
    }

    pub fn quantum(&self) -> Option<Ticks> {
        match self {
            Algorithm::RoundRobin { quantum } => Some(*quantum),
            _ => None,
        }
    }

    /// Replaces the Round-Robin quantum; other policies are unchanged.
    pub fn with_quantum(self, quantum: Ticks) -> Self {
        match self {
            Algorithm::RoundRobin { .. } => Algorithm::RoundRobin { quantum },
            other => other,
        }
    }

    pub fn build(&self) -> Box<dyn Scheduler> {
        match *self {
            Algorithm::Fcfs => Box::new(FcfsScheduler::new()),
            Algorithm::Sjf => Box::new(SjfScheduler::new()),
            Algorithm::Srtf => Box::new(SrtfScheduler::new()),
            Algorithm::RoundRobin { quantum } => Box::new(RoundRobinScheduler::new(quantum)),
            Algorithm::PriorityNonPreemptive => Box::new(PriorityScheduler::non_preemptive()),
            Algorithm::PriorityPreemptive => Box::new(PriorityScheduler::preemptive()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Fcfs => "First Come First Serve",
            Algorithm::Sjf => "Shortest Job First",
            Algorithm::Srtf => "Shortest Remaining Time First",
            Algorithm::RoundRobin { .. } => "Round Robin",
            Algorithm::PriorityNonPreemptive => "Priority Non-Preemptive",
            Algorithm::PriorityPreemptive => "Priority Preemptive",
        })
    }
}

impl FromStr for Algorithm {
    type Err = SpecError;

    /// Accepts the short names (`rr`) as well as display names
    /// (`Round Robin`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Algorithm::all(DEFAULT_QUANTUM)
            .into_iter()
            .find(|algo| {
                algo.short_name() == wanted || algo.to_string().to_ascii_lowercase() == wanted
            })
            .ok_or_else(|| SpecError::UnknownAlgorithm(s.to_string()))
    }
}

/// Runs `algorithm` over `specs` and collects the results.
pub fn simulate(
    algorithm: Algorithm,
    specs: impl IntoIterator<Item = ProcessSpec>,
) -> Result<Report, SpecError> {
    let mut core = SchedCore::with_processes(algorithm.build(), specs)?;
    if core.processes().is_empty() {
        return Err(SpecError::EmptyWorkload);
    }
    core.execute();
    Ok(Report::from_core(&core, algorithm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("fcfs".parse::<Algorithm>(), Ok(Algorithm::Fcfs));
        assert_eq!(
            "Round Robin".parse::<Algorithm>(),
            Ok(Algorithm::RoundRobin {
                quantum: DEFAULT_QUANTUM
            })
        );
        assert_eq!(
            "priority preemptive".parse::<Algorithm>(),
            Ok(Algorithm::PriorityPreemptive)
        );
        assert_eq!(
            "lottery".parse::<Algorithm>(),
            Err(SpecError::UnknownAlgorithm("lottery".to_string()))
        );
    }

    #[test]
    fn test_with_quantum() {
        assert_eq!(
            Algorithm::RoundRobin { quantum: 2 }.with_quantum(5).quantum(),
            Some(5)
        );
        assert_eq!(Algorithm::Sjf.with_quantum(5), Algorithm::Sjf);
    }

    #[test]
    fn test_simulate_rejects_empty_and_invalid() {
        assert_eq!(
            simulate(Algorithm::Fcfs, Vec::new()).unwrap_err(),
            SpecError::EmptyWorkload
        );
        assert!(matches!(
            simulate(Algorithm::Fcfs, [ProcessSpec::new("A", 0, 0, 0)]),
            Err(SpecError::ZeroBurst { .. })
        ));
    }

    #[test]
    fn test_simulate_rejects_clock_overflow() {
        assert_eq!(
            simulate(Algorithm::Fcfs, [ProcessSpec::new("A", Ticks::MAX, 1, 0)]).unwrap_err(),
            SpecError::TimeOverflow {
                name: "A".to_string()
            }
        );
        for algorithm in Algorithm::all(DEFAULT_QUANTUM) {
            let err = simulate(
                algorithm,
                [
                    ProcessSpec::new("A", Ticks::MAX - 3, 2, 0),
                    ProcessSpec::new("B", 0, 2, 0),
                ],
            )
            .unwrap_err();
            assert!(matches!(err, SpecError::TimeOverflow { .. }), "{algorithm}");
        }
    }

    #[test]
    fn test_display_matches_scheduler_name() {
        for algorithm in Algorithm::all(DEFAULT_QUANTUM) {
            assert_eq!(algorithm.to_string(), algorithm.build().name());
        }
    }
}
