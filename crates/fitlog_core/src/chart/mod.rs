//! Chart data derivation for tracker logs.
//!
//! # Responsibility
//! - Turn a `TrackerLog` into the series, labels and axis range a line chart
//!   renderer consumes.
//!
//! # Invariants
//! - Every function here is pure and total over a valid `TrackerLog`.
//! - `labels.len() == series.len()` in every `ChartData`.

pub mod axis;
pub mod series;
pub mod summary;

use crate::config::ChartConfig;
use crate::model::tracker::TrackerLog;
use axis::{derive_axis_range, AxisRange};
use serde::Serialize;
use series::{derive_labels, derive_series, SeriesPoint};

/// Everything the chart renderer needs for one tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub series: Vec<SeriesPoint>,
    pub labels: Vec<String>,
    pub axis: AxisRange,
}

impl ChartData {
    pub fn from_log(log: &TrackerLog, config: &ChartConfig) -> Self {
        let series = derive_series(log);
        let labels = derive_labels(&series, config.max_labels);
        let axis = derive_axis_range(&series, config.desired_segments);
        Self {
            series,
            labels,
            axis,
        }
    }
}
