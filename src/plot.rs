//! Readings chart colored by production cycle

use crate::cycles::seconds;
use chrono::NaiveDateTime;
use itertools::Itertools;
use plotters::{drawing::DrawingAreaErrorKind, prelude::*};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("Failed to draw the chart: {0}")]
    Drawing(String),
    #[error("Mismatched lengths: {time} timestamps, {value} values and {cycle_ids} cycle ids")]
    Length {
        time: usize,
        value: usize,
        cycle_ids: usize,
    },
}
impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(value: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(value.to_string())
    }
}

/// Plots the readings `value` versus `time` into a SVG file,
/// with a different color for each cycle id
pub fn plot_cycles<P: AsRef<Path>>(
    path: P,
    time: &[NaiveDateTime],
    value: &[Option<f64>],
    cycle_ids: &[usize],
) -> Result<(), PlotError> {
    let max_value = |x: &[f64]| -> f64 { x.iter().cloned().fold(f64::NEG_INFINITY, f64::max) };
    let min_value = |x: &[f64]| -> f64 { x.iter().cloned().fold(f64::INFINITY, f64::min) };

    if value.len() != time.len() || cycle_ids.len() != time.len() {
        return Err(PlotError::Length {
            time: time.len(),
            value: value.len(),
            cycle_ids: cycle_ids.len(),
        });
    }
    let Some(&t0) = time.first() else {
        log::warn!("no readings, skipping the plot");
        return Ok(());
    };
    let hours: Vec<f64> = time.iter().map(|&t| seconds(t - t0) / 3600.).collect();
    let values: Vec<f64> = value.iter().flatten().copied().collect();
    if values.is_empty() {
        log::warn!("no readings values, skipping the plot");
        return Ok(());
    }
    let (mut y_min, mut y_max) = (min_value(&values), max_value(&values));
    if y_min == y_max {
        y_min -= 1.;
        y_max += 1.;
    }
    let x_max = max_value(&hours).max(1e-3);

    let plot = SVGBackend::new(path.as_ref(), (1024, 512)).into_drawing_area();
    plot.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&plot)
        .caption("Production Cycles", ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc(format!("Time since {} [h]", t0.format("%Y-%m-%d %H:%M")))
        .y_desc("Value")
        .draw()?;

    let cycles = cycle_ids
        .iter()
        .zip(hours.iter().zip(value))
        .chunk_by(|(id, _)| **id);
    for (id, samples) in &cycles {
        let color = colorous::TABLEAU10[id % colorous::TABLEAU10.len()];
        let rgb = RGBColor(color.r, color.g, color.b);
        chart.draw_series(LineSeries::new(
            samples.filter_map(|(_, (&h, v))| v.map(|v| (h, v))),
            &rgb,
        ))?;
    }
    plot.present()?;
    log::info!("chart written to {:?}", path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use std::error::Error;

    #[test]
    fn empty_readings() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cycles.svg");
        plot_cycles(&path, &[], &[], &[])?;
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn mismatched_lengths() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cycles.svg");
        let t0 = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let time = [t0, t0 + TimeDelta::minutes(5)];
        let err = plot_cycles(&path, &time, &[Some(1.), Some(2.)], &[0]).unwrap_err();
        assert!(matches!(
            err,
            PlotError::Length {
                time: 2,
                value: 2,
                cycle_ids: 1
            }
        ));
        assert!(plot_cycles(&path, &time, &[Some(1.)], &[0, 1]).is_err());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn cycles_chart() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cycles.svg");
        let t0 = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let time: Vec<_> = (0..6).map(|k| t0 + TimeDelta::minutes(5 * k)).collect();
        let value = vec![Some(0.2), Some(5.), None, Some(0.1), Some(4.), Some(4.)];
        plot_cycles(&path, &time, &value, &[0, 1, 1, 1, 2, 2])?;
        assert!(std::fs::read_to_string(&path)?.contains("<svg"));
        Ok(())
    }
}
