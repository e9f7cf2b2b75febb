//! Core domain logic for FitLog progress trackers.
//! This crate is the single source of truth for tracker invariants.

pub mod chart;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use chart::axis::{derive_axis_range, AxisRange};
pub use chart::series::{derive_labels, derive_series, SeriesPoint};
pub use chart::summary::TrackerSummary;
pub use chart::ChartData;
pub use config::ChartConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::tracker::{
    parse_observation_value, ObservationDate, TrackerDefinition, TrackerId, TrackerLog,
    TrackerValidationError,
};
pub use model::view_state::{ObservationDraft, TrackerViewState, ViewTransitionError};
pub use repo::kv_repo::{KeyValueStore, RepoError, RepoResult, SqliteKeyValueStore};
pub use repo::tracker_repo::{KvTrackerRepository, TrackerRepository};
pub use service::tracker_service::{TrackerError, TrackerService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
