//! Value-axis range computation.
//!
//! Ticks always land on whole numbers: the chart displays values with zero
//! decimal places.

use crate::chart::series::SeriesPoint;
use serde::Serialize;

/// Default number of axis intervals requested from the renderer.
pub const DEFAULT_DESIRED_SEGMENTS: u32 = 5;

/// Vertical bounds and gridline spacing for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    /// Whole-number distance between gridlines, never below 1.
    pub step: f64,
    /// Number of intervals; the renderer draws `segments + 1` gridlines.
    pub segments: u32,
}

impl AxisRange {
    /// Range used when there is nothing to chart.
    pub const EMPTY: Self = Self {
        min: 0.0,
        max: 0.0,
        step: 1.0,
        segments: 1,
    };
}

/// Snaps the series' value range outward to multiples of a whole-number step.
///
/// `desired_segments == 0` is treated as 1.
pub fn derive_axis_range(series: &[SeriesPoint], desired_segments: u32) -> AxisRange {
    let Some((raw_min, raw_max)) = value_bounds(series) else {
        return AxisRange::EMPTY;
    };

    let desired = f64::from(desired_segments.max(1));
    let span = raw_max - raw_min;
    // Extreme finite values overflow the span; divide before subtracting.
    let per_segment = if span.is_finite() {
        span.max(0.0) / desired
    } else {
        raw_max / desired - raw_min / desired
    };
    let step = per_segment.ceil().max(1.0);
    let low_steps = (raw_min / step).floor();
    let high_steps = (raw_max / step).ceil();
    let min = (low_steps * step).max(f64::MIN);
    let max = (high_steps * step).min(f64::MAX);
    let segments = (high_steps - low_steps).round().max(1.0) as u32;

    AxisRange {
        min,
        max,
        step,
        segments,
    }
}

fn value_bounds(series: &[SeriesPoint]) -> Option<(f64, f64)> {
    let mut values = series.iter().map(|point| point.value);
    let first = values.next()?;
    Some(values.fold((first, first), |(low, high), value| {
        (low.min(value), high.max(value))
    }))
}
