//! Operational shifts
//!
//! The day is split into three 8 hours shifts:
//!  - morning: 06:00-14:00
//!  - day: 14:00-22:00
//!  - night: 22:00-06:00, anchored to the date the shift starts

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use itertools::{Itertools, MinMaxResult};
use std::{collections::BTreeMap, fmt, ops::Deref};
use strum_macros::EnumIter;

/// Shift label
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shift {
    Morning,
    Day,
    Night,
}
impl Shift {
    /// Shift the given hour of the day belongs to
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=13 => Shift::Morning,
            14..=21 => Shift::Day,
            _ => Shift::Night,
        }
    }
    /// Hours of the first and last readings of a fully covered shift
    pub fn boundary_hours(&self) -> (u32, u32) {
        match self {
            Shift::Morning => (6, 13),
            Shift::Day => (14, 21),
            Shift::Night => (22, 5),
        }
    }
}
impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Morning => f.pad("morning"),
            Shift::Day => f.pad("day"),
            Shift::Night => f.pad("night"),
        }
    }
}

/// A shift instance: the shift label and its anchor date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftKey {
    pub date: NaiveDate,
    pub shift: Shift,
}
impl From<NaiveDateTime> for ShiftKey {
    fn from(time: NaiveDateTime) -> Self {
        let shift = Shift::from_hour(time.hour());
        let date = match shift {
            Shift::Night if time.hour() < 6 => time.date().pred_opt().unwrap_or(time.date()),
            _ => time.date(),
        };
        Self { date, shift }
    }
}
impl From<&NaiveDateTime> for ShiftKey {
    fn from(time: &NaiveDateTime) -> Self {
        (*time).into()
    }
}
impl fmt::Display for ShiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:<7}", self.date, self.shift)
    }
}

/// Whether the readings span the whole shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    Full,
    Half,
}
impl Completeness {
    /// Compares the hours of the first and last readings of a shift to the shift boundaries
    pub fn new(shift: Shift, first: &NaiveDateTime, last: &NaiveDateTime) -> Self {
        if (first.hour(), last.hour()) == shift.boundary_hours() {
            Completeness::Full
        } else {
            Completeness::Half
        }
    }
}
impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completeness::Full => f.pad("full"),
            Completeness::Half => f.pad("half"),
        }
    }
}

/// Completeness of every shift instance found in a time series
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ShiftMap(BTreeMap<ShiftKey, Completeness>);
impl Deref for ShiftMap {
    type Target = BTreeMap<ShiftKey, Completeness>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ShiftMap {
    pub fn new(time: &[NaiveDateTime]) -> Self {
        let map: BTreeMap<_, _> = time
            .iter()
            .into_group_map_by(|&t| ShiftKey::from(t))
            .into_iter()
            .filter_map(|(key, times)| match times.into_iter().minmax() {
                MinMaxResult::NoElements => None,
                MinMaxResult::OneElement(t) => Some((key, Completeness::new(key.shift, t, t))),
                MinMaxResult::MinMax(first, last) => {
                    Some((key, Completeness::new(key.shift, first, last)))
                }
            })
            .collect();
        log::debug!(
            "{} shifts, {} full",
            map.len(),
            map.values().filter(|&&c| c == Completeness::Full).count()
        );
        Self(map)
    }
    pub fn is_full(&self, key: &ShiftKey) -> bool {
        self.get(key) == Some(&Completeness::Full)
    }
    /// Iterator over the full shift instances
    pub fn full(&self) -> impl Iterator<Item = &ShiftKey> + '_ {
        self.iter()
            .filter(|(_, c)| **c == Completeness::Full)
            .map(|(key, _)| key)
    }
}
