use rand::prelude::*;
use serde::Serialize;
use std::str::FromStr;

use crate::{
    core::{Priority, Ticks},
    error::SpecError,
};

/// Input description of one process, before it is handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSpec {
    pub name: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: Priority,
}

impl ProcessSpec {
    pub fn new(name: impl Into<String>, arrival: Ticks, burst: Ticks, priority: Priority) -> Self {
        Self {
            name: name.into(),
            arrival,
            burst,
            priority,
        }
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if self.burst == 0 {
            return Err(SpecError::ZeroBurst {
                name: self.name.clone(),
            });
        }
        if self.arrival.checked_add(self.burst).is_none() {
            return Err(SpecError::TimeOverflow {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Zips raw arrival/burst/priority columns into specs named `P1..Pn`.
    ///
    /// Missing priorities default to 0 for every process.
    pub fn from_columns(
        arrivals: &[Ticks],
        bursts: &[Ticks],
        priorities: Option<&[Priority]>,
    ) -> Result<Vec<ProcessSpec>, SpecError> {
        if arrivals.is_empty() {
            return Err(SpecError::EmptyWorkload);
        }
        check_len("burst", arrivals.len(), bursts.len())?;
        if let Some(priorities) = priorities {
            check_len("priority", arrivals.len(), priorities.len())?;
        }

        let specs = arrivals
            .iter()
            .zip(bursts)
            .enumerate()
            .map(|(i, (&arrival, &burst))| {
                let priority = priorities.map_or(0, |p| p[i]);
                ProcessSpec::new(format!("P{}", i + 1), arrival, burst, priority)
            })
            .collect::<Vec<_>>();

        for spec in &specs {
            spec.validate()?;
        }
        Ok(specs)
    }
}

fn check_len(field: &'static str, expected: usize, found: usize) -> Result<(), SpecError> {
    if expected != found {
        return Err(SpecError::LengthMismatch {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

/// Parses a list of numbers separated by whitespace and/or commas.
pub fn parse_numbers<T: FromStr>(text: &str) -> Result<Vec<T>, SpecError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse()
                .map_err(|_| SpecError::InvalidNumber(token.to_string()))
        })
        .collect()
}

/// Parameters for a randomly generated workload.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    pub seed: u64,
    /// Number of ticks over which arrivals are sampled.
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_burst: Ticks,
    pub long_burst: Ticks,
    /// Priorities are drawn uniformly from `0..priority_levels`.
    pub priority_levels: Priority,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            ticks: 20,
            p_arrival: 0.3,
            p_short: 0.3,
            short_burst: 2,
            long_burst: 6,
            priority_levels: 4,
        }
    }
}

/// Bernoulli arrivals: every tick spawns a process with probability
/// `p_arrival`, which is short with probability `p_short`.
pub fn bernoulli_workload(config: &WorkloadConfig) -> Vec<ProcessSpec> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut specs = Vec::new();

    for t in 0..config.ticks {
        if rng.random::<f64>() < config.p_arrival {
            let burst = if rng.random::<f64>() < config.p_short {
                config.short_burst
            } else {
                config.long_burst
            };
            let priority = rng.random_range(0..config.priority_levels.max(1));

            specs.push(ProcessSpec::new(
                format!("P{}", specs.len() + 1),
                t,
                burst,
                priority,
            ));
        }
    }

    specs
}
