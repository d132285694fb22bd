use serde::Serialize;

use super::{process::ProcessId, state::Ticks};

/// One contiguous span of CPU time. `occupant` is `None` while idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub occupant: Option<ProcessId>,
    pub start: Ticks,
    pub end: Ticks,
}

impl Interval {
    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }

    pub fn is_idle(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Gap-free record of what the CPU did, in time order.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    intervals: Vec<Interval>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    pub fn append(&mut self, occupant: Option<ProcessId>, start: Ticks, end: Ticks) {
        assert!(start < end, "Interval [{start}, {end}) is empty or reversed");
        if let Some(last) = self.intervals.last() {
            assert_eq!(
                last.end, start,
                "Interval starting at {start} is not contiguous with the previous one ending at {}",
                last.end
            );
        }
        self.intervals.push(Interval {
            occupant,
            start,
            end,
        });
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// End of the last interval.
    pub fn end(&self) -> Option<Ticks> {
        self.intervals.last().map(|i| i.end)
    }

    /// Total ticks spent running processes.
    pub fn busy_time(&self) -> Ticks {
        self.intervals
            .iter()
            .filter(|i| !i.is_idle())
            .map(Interval::duration)
            .sum()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
