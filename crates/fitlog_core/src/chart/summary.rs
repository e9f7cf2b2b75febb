//! Headline numbers shown above a tracker chart.

use crate::chart::series::SeriesPoint;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackerSummary {
    pub first: Option<SeriesPoint>,
    pub latest: Option<SeriesPoint>,
    /// `latest - first`.
    pub change: Option<f64>,
    /// `goal - latest`; `None` without a goal or without observations.
    pub goal_remaining: Option<f64>,
}

/// Summarizes an ascending series against an optional goal.
pub fn summarize_series(series: &[SeriesPoint], goal: Option<f64>) -> TrackerSummary {
    let first = series.first().copied();
    let latest = series.last().copied();
    let change = first.zip(latest).map(|(first, latest)| latest.value - first.value);
    let goal_remaining = goal.zip(latest).map(|(goal, latest)| goal - latest.value);
    TrackerSummary {
        first,
        latest,
        change,
        goal_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::summarize_series;
    use crate::chart::series::SeriesPoint;
    use crate::model::tracker::ObservationDate;

    #[test]
    fn summary_tracks_change_and_goal_gap() {
        let series = vec![
            SeriesPoint {
                date: ObservationDate::parse("2024-01-01").unwrap(),
                value: 80.0,
            },
            SeriesPoint {
                date: ObservationDate::parse("2024-02-01").unwrap(),
                value: 76.5,
            },
        ];
        let summary = summarize_series(&series, Some(75.0));
        assert_eq!(summary.change, Some(-3.5));
        assert_eq!(summary.goal_remaining, Some(-1.5));
        assert_eq!(summary.latest.map(|point| point.value), Some(76.5));
    }

    #[test]
    fn empty_series_has_no_numbers() {
        let summary = summarize_series(&[], Some(75.0));
        assert_eq!(summary.first, None);
        assert_eq!(summary.change, None);
        assert_eq!(summary.goal_remaining, None);
    }
}
