use chrono::{NaiveDateTime, TimeDelta};
use std::{fmt, iter::once, ops::Deref};

/// Converts a time interval into seconds
pub fn seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + delta.subsec_nanos() as f64 * 1e-9
}

/// Rising and falling edges of the running state
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Edges {
    /// idle to running transitions
    pub start: Vec<bool>,
    /// running to idle transitions
    pub end: Vec<bool>,
}
impl Edges {
    /// Detects the edges, the state before the first sample is idle
    pub fn new(running: &[bool]) -> Self {
        let before = once(false).chain(running.iter().copied());
        let (start, end) = running
            .iter()
            .zip(before)
            .map(|(&now, before)| (now && !before, !now && before))
            .unzip();
        Self { start, end }
    }
    pub fn len(&self) -> usize {
        self.start.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Number of cycle start events, including a cycle still running at the end of the series
    pub fn n_start(&self) -> usize {
        self.start.iter().filter(|&&s| s).count()
    }
    /// Cycle id of each sample: the number of cycle starts up to and including the sample
    pub fn cycle_ids(&self) -> Vec<usize> {
        self.start
            .iter()
            .scan(0usize, |id, &s| {
                if s {
                    *id += 1;
                }
                Some(*id)
            })
            .collect()
    }
}

/// A production cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// the idle time [s] until the next cycle starts
    pub pause: Option<f64>,
}
impl Cycle {
    /// Cycle duration [s]
    pub fn duration(&self) -> f64 {
        seconds(self.end - self.start)
    }
}

/// The sequence of completed production cycles
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Cycles(Vec<Cycle>);
impl Deref for Cycles {
    type Target = Vec<Cycle>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl Cycles {
    /// Pairs the cycle starts and ends
    ///
    /// A leading end without a preceding start is dropped and
    /// the number of cycles is the smaller of the start and end counts.
    pub fn detect(time: &[NaiveDateTime], edges: &Edges) -> Self {
        let events = |flags: &[bool]| -> Vec<(usize, NaiveDateTime)> {
            flags
                .iter()
                .zip(time)
                .enumerate()
                .filter_map(|(k, (&flag, &t))| flag.then_some((k, t)))
                .collect()
        };
        let starts = events(&edges.start);
        let mut ends = events(&edges.end);
        let leading_end = matches!(
            (starts.first(), ends.first()),
            (Some((i, _)), Some((j, _))) if j < i
        );
        if leading_end {
            ends.remove(0);
        }
        let n = starts.len().min(ends.len());
        log::debug!(
            "{} cycle starts, {} cycle ends, {} cycles",
            starts.len(),
            ends.len(),
            n
        );

        let mut cycles: Vec<_> = starts[..n]
            .iter()
            .zip(&ends[..n])
            .map(|(&(_, start), &(_, end))| Cycle {
                start,
                end,
                pause: None,
            })
            .collect();
        for k in 1..cycles.len() {
            let next_start = cycles[k].start;
            let cycle = &mut cycles[k - 1];
            cycle.pause = Some(seconds(next_start - cycle.end));
        }
        Self(cycles)
    }
    /// Cycle durations [s]
    pub fn durations(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().map(|c| c.duration())
    }
    /// Pauses between cycles [s]
    pub fn pauses(&self) -> impl Iterator<Item = f64> + '_ {
        self.iter().filter_map(|c| c.pause)
    }
    #[cfg(feature = "polars")]
    /// Returns the cycles table as a polars dataframe
    pub fn to_dataframe(&self) -> polars::prelude::PolarsResult<polars::prelude::DataFrame> {
        use polars::prelude::*;
        let (start_time, end_time): (Vec<_>, Vec<_>) = self
            .iter()
            .map(|c| (c.start.to_string(), c.end.to_string()))
            .unzip();
        polars::df!(
            "start_time" => start_time,
            "end_time" => end_time,
            "duration_sec" => self.durations().collect::<Vec<f64>>(),
            "pause_sec" => self.iter().map(|c| c.pause).collect::<Vec<Option<f64>>>(),
        )
    }
}
impl fmt::Display for Cycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>6}  {:^19}  {:^19}  {:>12}  {:>12}",
            "#", "START", "END", "DURATION [s]", "PAUSE [s]"
        )?;
        for (k, cycle) in self.iter().enumerate() {
            writeln!(
                f,
                "{:>6}  {:19}  {:19}  {:>12.1}  {:>12.1}",
                k,
                cycle.start.format("%Y-%m-%d %H:%M:%S"),
                cycle.end.format("%Y-%m-%d %H:%M:%S"),
                cycle.duration(),
                crate::stats::Value(cycle.pause)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn edges() {
        let edges = Edges::new(&[true, true, false, true, false, false]);
        assert_eq!(edges.start, vec![true, false, false, true, false, false]);
        assert_eq!(edges.end, vec![false, false, true, false, true, false]);
        assert_eq!(edges.n_start(), 2);
        assert_eq!(edges.cycle_ids(), vec![1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn night_cycle() {
        let time = [at(21, 30), at(22, 5), at(22, 20), at(22, 40), at(22, 50)];
        let running = [false, true, true, false, false];
        let edges = Edges::new(&running);
        let cycles = Cycles::detect(&time, &edges);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].start, at(22, 5));
        assert_eq!(cycles[0].end, at(22, 40));
        assert_eq!(cycles[0].duration(), 2100.);
        assert_eq!(cycles[0].pause, None);
    }

    #[test]
    fn pauses() {
        let time: Vec<_> = (0..8).map(|m| at(10, m * 5)).collect();
        let running = [false, true, false, false, true, true, false, true];
        let edges = Edges::new(&running);
        let cycles = Cycles::detect(&time, &edges);
        assert_eq!(edges.n_start(), 3);
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles.durations().collect::<Vec<_>>(), vec![300., 600.]);
        assert_eq!(cycles[0].pause, Some(600.));
        assert_eq!(cycles[1].pause, None);
        assert_eq!(cycles.pauses().collect::<Vec<_>>(), vec![600.]);
    }

    #[test]
    fn no_cycles() {
        let cycles = Cycles::detect(&[], &Edges::new(&[]));
        assert!(cycles.is_empty());
        let time = [at(6, 0), at(6, 5)];
        let cycles = Cycles::detect(&time, &Edges::new(&[false, false]));
        assert!(cycles.is_empty());
        let cycles = Cycles::detect(&time, &Edges::new(&[true, true]));
        assert!(cycles.is_empty());
    }

    #[test]
    fn leading_end() {
        let time = [at(6, 0), at(6, 5), at(6, 10), at(6, 15)];
        let edges = Edges {
            start: vec![false, false, true, false],
            end: vec![false, true, false, true],
        };
        let cycles = Cycles::detect(&time, &edges);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].start, at(6, 10));
        assert_eq!(cycles[0].end, at(6, 15));
    }

    #[test]
    fn display_missing_pause() {
        let time = [at(6, 0), at(6, 5), at(6, 10)];
        let cycles = Cycles::detect(&time, &Edges::new(&[true, false, false]));
        let table = cycles.to_string();
        assert!(table.contains("2024-03-04 06:00:00"));
        assert!(table.trim_end().ends_with("NaN"));
    }

    #[cfg(feature = "polars")]
    #[test]
    fn cycles_dataframe() -> Result<(), Box<dyn std::error::Error>> {
        let time: Vec<_> = (0..8).map(|m| at(10, m * 5)).collect();
        let running = [false, true, false, false, true, true, false, true];
        let cycles = Cycles::detect(&time, &Edges::new(&running));
        let df = cycles.to_dataframe()?;
        assert_eq!(
            df.get_column_names()
                .into_iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>(),
            vec!["start_time", "end_time", "duration_sec", "pause_sec"]
        );
        assert_eq!(df.height(), 2);
        let pause = df.column("pause_sec")?.as_materialized_series().f64()?;
        assert_eq!(pause.get(0), Some(600.));
        assert_eq!(pause.get(1), None);
        assert_eq!(pause.null_count(), 1);
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_cycles_alternate(
            running in prop::collection::vec(any::<bool>(), 0..200),
            steps in prop::collection::vec(1i64..3600, 200),
        ) {
            let mut t = at(0, 0);
            let time: Vec<_> = steps[..running.len()]
                .iter()
                .map(|&s| {
                    t += TimeDelta::seconds(s);
                    t
                })
                .collect();
            let edges = Edges::new(&running);
            let cycles = Cycles::detect(&time, &edges);

            let n_end = edges.end.iter().filter(|&&e| e).count();
            prop_assert_eq!(cycles.len(), edges.n_start().min(n_end));
            prop_assert!(edges.n_start() - cycles.len() <= 1);
            for cycle in cycles.iter() {
                prop_assert!(cycle.duration() > 0.);
            }
            for pair in cycles.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
                prop_assert!(pair[0].pause.unwrap() > 0.);
            }
            prop_assert_eq!(cycles.pauses().count(), cycles.len().saturating_sub(1));
        }
    }
}
