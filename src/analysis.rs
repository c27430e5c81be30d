use crate::{
    cycles::{Cycles, Edges},
    readings::Readings,
    report::CycleReport,
    shift::ShiftMap,
};
use std::time::Instant;

/// Power level above which the equipment is running
pub const THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub threshold: f64,
}
impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: THRESHOLD,
        }
    }
}
impl AnalysisConfig {
    pub fn threshold(self, threshold: f64) -> Self {
        Self { threshold }
    }
}

/// Cycles and shifts derived from the readings
#[derive(Debug, Default, Clone)]
pub struct Analysis {
    pub readings: Readings,
    pub running: Vec<bool>,
    pub edges: Edges,
    pub cycles: Cycles,
    pub shifts: ShiftMap,
}
impl Analysis {
    pub fn new(readings: Readings, config: AnalysisConfig) -> Self {
        let now = Instant::now();
        let running = readings.running(config.threshold);
        let edges = Edges::new(&running);
        let cycles = Cycles::detect(&readings.time, &edges);
        let shifts = ShiftMap::new(&readings.time);
        log::info!(
            "{} cycles over {} shifts found in {}ms",
            cycles.len(),
            shifts.len(),
            now.elapsed().as_millis()
        );
        Self {
            readings,
            running,
            edges,
            cycles,
            shifts,
        }
    }
    /// Cycle id of each reading
    pub fn cycle_ids(&self) -> Vec<usize> {
        self.edges.cycle_ids()
    }
    pub fn report(&self) -> CycleReport {
        CycleReport::new(&self.readings.time, &self.edges, &self.cycles, &self.shifts)
    }
    #[cfg(feature = "plot")]
    /// Plots the readings colored by cycle id into a SVG file
    pub fn plot<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), crate::plot::PlotError> {
        crate::plot::plot_cycles(
            path,
            &self.readings.time,
            &self.readings.value,
            &self.cycle_ids(),
        )
    }
}
