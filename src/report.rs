//! Cycle counts and durations statistics per shift

use crate::{
    cycles::{Cycles, Edges},
    shift::{Shift, ShiftKey, ShiftMap},
    stats::{Statistics, Value},
};
use chrono::NaiveDateTime;
use itertools::Itertools;
use std::{collections::BTreeMap, fmt};
use strum::IntoEnumIterator;

/// Cycle duration and pause statistics of a shift label
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ShiftStatistics {
    /// number of cycles
    pub count: usize,
    pub duration: Statistics,
    pub pause: Statistics,
}

/// Production cycles report
///
/// The shift statistics only account for the full shifts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CycleReport {
    /// number of cycle starts
    pub n_start: usize,
    /// number of completed cycles
    pub n_cycle: usize,
    /// number of cycle starts in each full shift instance with at least one start
    pub cycles_per_shift: BTreeMap<ShiftKey, usize>,
    /// all cycles duration statistics
    pub duration: Statistics,
    /// all cycles pause statistics
    pub pause: Statistics,
    pub shift_statistics: BTreeMap<Shift, ShiftStatistics>,
}
impl CycleReport {
    pub fn new(time: &[NaiveDateTime], edges: &Edges, cycles: &Cycles, shifts: &ShiftMap) -> Self {
        let cycles_per_shift: BTreeMap<ShiftKey, usize> = time
            .iter()
            .zip(&edges.start)
            .filter(|(_, start)| **start)
            .map(|(t, _)| ShiftKey::from(t))
            .filter(|key| shifts.is_full(key))
            .counts()
            .into_iter()
            .collect();

        let shift_statistics = cycles
            .iter()
            .filter(|c| shifts.is_full(&ShiftKey::from(c.start)))
            .into_group_map_by(|c| ShiftKey::from(c.start).shift)
            .into_iter()
            .map(|(shift, cycles)| {
                (
                    shift,
                    ShiftStatistics {
                        count: cycles.len(),
                        duration: Statistics::new(cycles.iter().map(|c| c.duration())),
                        pause: Statistics::new(cycles.iter().filter_map(|c| c.pause)),
                    },
                )
            })
            .collect();

        Self {
            n_start: edges.n_start(),
            n_cycle: cycles.len(),
            cycles_per_shift,
            duration: Statistics::new(cycles.durations()),
            pause: Statistics::new(cycles.pauses()),
            shift_statistics,
        }
    }
    /// Average number of cycles per full shift of each shift label
    pub fn average_cycles(&self) -> BTreeMap<Shift, f64> {
        self.cycles_per_shift
            .iter()
            .into_group_map_by(|(key, _)| key.shift)
            .into_iter()
            .map(|(shift, counts)| {
                let n = counts.len() as f64;
                (shift, counts.into_iter().map(|(_, &c)| c as f64).sum::<f64>() / n)
            })
            .collect()
    }
    /// Prints out the report
    pub fn summary(&self) {
        println!("{self}");
    }
    #[cfg(feature = "polars")]
    /// Returns the per shift label statistics as a polars dataframe
    pub fn to_dataframe(&self) -> polars::prelude::PolarsResult<polars::prelude::DataFrame> {
        use polars::prelude::*;
        let stats = &self.shift_statistics;
        polars::df!(
            "shift" => stats.keys().map(|s| s.to_string()).collect::<Vec<_>>(),
            "avg_cycle_duration" => stats.values().map(|s| s.duration.mean).collect::<Vec<_>>(),
            "std_cycle_duration" => stats.values().map(|s| s.duration.std).collect::<Vec<_>>(),
            "avg_pause_duration" => stats.values().map(|s| s.pause.mean).collect::<Vec<_>>(),
            "std_pause_duration" => stats.values().map(|s| s.pause.std).collect::<Vec<_>>(),
            "count" => stats.values().map(|s| s.count as u32).collect::<Vec<_>>(),
            "cv_cycle_duration" => stats.values().map(|s| s.duration.cv()).collect::<Vec<_>>(),
            "cv_pause_duration" => stats.values().map(|s| s.pause.cv()).collect::<Vec<_>>(),
        )
    }
}
impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total cycles: {}", self.n_start)?;
        writeln!(f, "Completed cycles: {}", self.n_cycle)?;

        writeln!(f, "\nCycles per full shift (individual):")?;
        writeln!(f, "  {:^10} {:<7} {:>6}", "DATE", "SHIFT", "CYCLES")?;
        for (key, count) in &self.cycles_per_shift {
            writeln!(f, "  {} {:>6}", key, count)?;
        }

        writeln!(f, "\nAverage cycles per full shift type:")?;
        let average = self.average_cycles();
        let average = Shift::iter()
            .filter_map(|shift| average.get(&shift).map(|avg| (shift, avg)));
        for (shift, avg) in average {
            writeln!(f, "  {:<7} {:>8.2}", shift, avg)?;
        }

        writeln!(f, "\nCycle duration: {}", self.duration)?;
        writeln!(f, "Pause duration: {}", self.pause)?;

        writeln!(f, "\nCycle & pause stats per full shift type:")?;
        writeln!(
            f,
            "  {:<7} {:>6} {:>12} {:>12} {:>8} {:>12} {:>12} {:>8}",
            "SHIFT", "COUNT", "AVG CYCLE", "STD CYCLE", "CV", "AVG PAUSE", "STD PAUSE", "CV"
        )?;
        let per_shift = Shift::iter()
            .filter_map(|shift| self.shift_statistics.get(&shift).map(|stats| (shift, stats)));
        for (shift, stats) in per_shift {
            writeln!(
                f,
                "  {:<7} {:>6} {:>12.2} {:>12.2} {:>8.2} {:>12.2} {:>12.2} {:>8.2}",
                shift,
                stats.count,
                Value(stats.duration.mean),
                Value(stats.duration.std),
                Value(stats.duration.cv()),
                Value(stats.pause.mean),
                Value(stats.pause.std),
                Value(stats.pause.cv()),
            )?;
        }
        Ok(())
    }
}
