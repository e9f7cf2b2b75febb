//! Chart presentation settings.

use crate::chart::axis::DEFAULT_DESIRED_SEGMENTS;
use crate::chart::series::DEFAULT_MAX_LABELS;
use serde::{Deserialize, Serialize};

/// Upper bound for both knobs; beyond this the chart is unreadable anyway.
const CHART_KNOB_MAX: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Maximum number of non-empty x-axis labels.
    pub max_labels: usize,
    /// Requested number of value-axis intervals.
    pub desired_segments: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            max_labels: DEFAULT_MAX_LABELS,
            desired_segments: DEFAULT_DESIRED_SEGMENTS,
        }
    }
}

impl ChartConfig {
    /// Builds a config from optional caller overrides.
    ///
    /// `None` and `0` fall back to defaults; values above 50 are clamped.
    pub fn from_overrides(max_labels: Option<u32>, desired_segments: Option<u32>) -> Self {
        Self {
            max_labels: normalize_knob(max_labels, DEFAULT_MAX_LABELS as u32) as usize,
            desired_segments: normalize_knob(desired_segments, DEFAULT_DESIRED_SEGMENTS),
        }
    }
}

fn normalize_knob(value: Option<u32>, default: u32) -> u32 {
    match value {
        Some(0) | None => default,
        Some(value) if value > CHART_KNOB_MAX => CHART_KNOB_MAX,
        Some(value) => value,
    }
}
