//! Chronological series and x-axis label derivation.

use crate::model::tracker::{ObservationDate, TrackerLog};
use serde::Serialize;

/// Default cap on visible x-axis labels.
pub const DEFAULT_MAX_LABELS: usize = 6;

/// One charted observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: ObservationDate,
    pub value: f64,
}

/// Returns the log's entries sorted ascending by date.
pub fn derive_series(log: &TrackerLog) -> Vec<SeriesPoint> {
    let mut series = log
        .iter()
        .map(|(date, value)| SeriesPoint { date, value })
        .collect::<Vec<_>>();
    // `TrackerLog` already iterates in date order; keep the contract explicit
    // in case the backing map changes.
    series.sort_by_key(|point| point.date);
    series
}

/// Builds index-aligned `MM-DD` labels, blanking all but every
/// `ceil(n / max_labels)`-th one.
///
/// The output always has one entry per series point. `max_labels == 0` is
/// treated as 1.
pub fn derive_labels(series: &[SeriesPoint], max_labels: usize) -> Vec<String> {
    let label_every = label_stride(series.len(), max_labels);
    series
        .iter()
        .enumerate()
        .map(|(index, point)| {
            if index % label_every == 0 {
                short_label(&point.date)
            } else {
                String::new()
            }
        })
        .collect()
}

fn label_stride(len: usize, max_labels: usize) -> usize {
    let max_labels = max_labels.max(1);
    len.div_ceil(max_labels).max(1)
}

fn short_label(date: &ObservationDate) -> String {
    let iso = date.to_iso();
    iso[iso.len() - 5..].to_string()
}
