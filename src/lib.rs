//! # Production cycles from power consumption readings
//!
//! The equipment is running whenever its power consumption is above a threshold.
//! A production cycle starts when the equipment goes from idle to running
//! and ends when it goes back to idle.
//! Cycles are counted and their durations and pauses are compared across
//! the morning, day and night shifts.
//!
//! ```no_run
//! use power_cycles::{Analysis, AnalysisConfig, ReadingsLoader};
//!
//! let readings = ReadingsLoader::default()
//!     .data_path("data/process_data_analyst_test.csv")
//!     .load()?;
//! let analysis = Analysis::new(readings, AnalysisConfig::default());
//! println!("{}", analysis.cycles);
//! analysis.report().summary();
//! # Ok::<(), power_cycles::Error>(())
//! ```

pub mod analysis;
pub mod cycles;
mod error;
#[cfg(feature = "plot")]
pub mod plot;
pub mod readings;
pub mod report;
pub mod shift;
pub mod stats;

pub use analysis::{Analysis, AnalysisConfig, THRESHOLD};
pub use cycles::{Cycle, Cycles, Edges};
pub use error::Error;
pub use readings::{parse_timestamp, Readings, ReadingsError, ReadingsLoader, METRIC};
pub use report::{CycleReport, ShiftStatistics};
pub use shift::{Completeness, Shift, ShiftKey, ShiftMap};
pub use stats::Statistics;
