//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose tracker use-cases to Dart via FRB.
//! - Flatten core results into plain response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Store-backed calls are not `sync`: Dart receives a future and the UI
//!   isolate never waits on SQLite.

use fitlog_core::db::open_db;
use fitlog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ChartConfig, ChartData, KvTrackerRepository, ObservationDate, SeriesPoint,
    SqliteKeyValueStore, TrackerDefinition, TrackerError, TrackerId, TrackerLog, TrackerService, TrackerSummary,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "fitlog.sqlite3";
const DB_PATH_ENV: &str = "FITLOG_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type FfiTrackerService<'conn> = TrackerService<KvTrackerRepository<SqliteKeyValueStore<'conn>>>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
/// Repeating the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the SQLite file used by every later call.
///
/// Must run before the first store-backed call; afterwards only the same
/// path is accepted. Returns an empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerActionResponse {
    pub ok: bool,
    pub message: String,
}

impl TrackerActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Tracker definition as shown in the tracker list.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerItem {
    pub tracker_id: String,
    pub name: String,
    pub unit: Option<String>,
    pub goal: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerListResponse {
    pub items: Vec<TrackerItem>,
    pub message: String,
}

/// One dated value, date in `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationItem {
    pub date: String,
    pub value: f64,
}

/// Result of a log mutation. `entries` is the confirmed stored log, ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationLogResponse {
    pub ok: bool,
    pub entries: Vec<ObservationItem>,
    pub message: String,
}

impl ObservationLogResponse {
    fn from_result(operation: &str, result: Result<TrackerLog, String>) -> Self {
        match result {
            Ok(log) => Self {
                ok: true,
                entries: log
                    .iter()
                    .map(|(date, value)| ObservationItem {
                        date: date.to_iso(),
                        value,
                    })
                    .collect(),
                message: format!("{operation} ok."),
            },
            Err(message) => Self {
                ok: false,
                entries: Vec::new(),
                message: format!("{operation} failed: {message}"),
            },
        }
    }
}

/// Chart payload for the line-chart widget.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerChartResponse {
    pub ok: bool,
    pub points: Vec<ObservationItem>,
    /// Index-aligned with `points`; blank entries hide the tick label.
    pub labels: Vec<String>,
    pub axis_min: f64,
    pub axis_max: f64,
    pub axis_step: f64,
    pub axis_segments: u32,
    pub message: String,
}

impl TrackerChartResponse {
    fn from_chart(chart: ChartData) -> Self {
        Self {
            ok: true,
            points: chart
                .series
                .iter()
                .map(|point| ObservationItem {
                    date: point.date.to_iso(),
                    value: point.value,
                })
                .collect(),
            labels: chart.labels,
            axis_min: chart.axis.min,
            axis_max: chart.axis.max,
            axis_step: chart.axis.step,
            axis_segments: chart.axis.segments,
            message: String::new(),
        }
    }

    fn failure(message: String) -> Self {
        Self::from_chart(ChartData::from_log(
            &TrackerLog::new(),
            &ChartConfig::default(),
        ))
        .with_failure(message)
    }

    fn with_failure(mut self, message: String) -> Self {
        self.ok = false;
        self.message = message;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSummaryResponse {
    pub ok: bool,
    pub first: Option<ObservationItem>,
    pub latest: Option<ObservationItem>,
    pub change: Option<f64>,
    pub goal_remaining: Option<f64>,
    pub message: String,
}

impl TrackerSummaryResponse {
    fn from_summary(summary: TrackerSummary) -> Self {
        let item = |point: SeriesPoint| ObservationItem {
            date: point.date.to_iso(),
            value: point.value,
        };
        Self {
            ok: true,
            first: summary.first.map(item),
            latest: summary.latest.map(item),
            change: summary.change,
            goal_remaining: summary.goal_remaining,
            message: String::new(),
        }
    }
}

/// Adds a tracker definition to the registry.
pub fn tracker_create(
    name: String,
    unit: Option<String>,
    goal: Option<f64>,
) -> TrackerActionResponse {
    let definition = TrackerDefinition { name, unit, goal };
    match with_tracker_service(|service| service.create_tracker(&definition)) {
        Ok(created) => {
            TrackerActionResponse::success(format!("Tracker `{}` created.", created.name))
        }
        Err(err) => TrackerActionResponse::failure(format!("tracker_create failed: {err}")),
    }
}

/// Lists tracker definitions in creation order.
pub fn tracker_list() -> TrackerListResponse {
    match with_tracker_service(|service| Ok(service.list_trackers())) {
        Ok(definitions) => {
            let items = definitions
                .into_iter()
                .filter_map(to_tracker_item)
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No trackers.".to_string()
            } else {
                format!("Found {} tracker(s).", items.len())
            };
            TrackerListResponse { items, message }
        }
        Err(err) => TrackerListResponse {
            items: Vec::new(),
            message: format!("tracker_list failed: {err}"),
        },
    }
}

/// Deletes a tracker's log and definition immediately.
///
/// The UI must have asked the user for confirmation before calling this.
pub fn tracker_delete(name: String) -> TrackerActionResponse {
    match with_tracker_service(|service| service.delete_tracker(&name)) {
        Ok(()) => TrackerActionResponse::success("Tracker deleted."),
        Err(err) => TrackerActionResponse::failure(format!("tracker_delete failed: {err}")),
    }
}

/// Records a value for one day of a tracker.
///
/// `tracker_name` is the display name; `date` is `YYYY-MM-DD`; `raw_value`
/// is the untouched text of the numeric field.
pub fn observation_record(
    tracker_name: String,
    date: String,
    raw_value: String,
) -> ObservationLogResponse {
    let result = parse_target(&tracker_name, &date).and_then(|(id, date)| {
        with_tracker_service(|service| service.record_observation(&id, date, &raw_value))
    });
    ObservationLogResponse::from_result("observation_record", result)
}

/// Removes the value for one day of a tracker. Missing days are not an error.
pub fn observation_delete(tracker_name: String, date: String) -> ObservationLogResponse {
    let result = parse_target(&tracker_name, &date).and_then(|(id, date)| {
        with_tracker_service(|service| service.delete_observation(&id, date))
    });
    ObservationLogResponse::from_result("observation_delete", result)
}

/// Derives chart payload for one tracker.
///
/// `max_labels` and `desired_segments` fall back to 6 and 5 when absent or 0.
pub fn tracker_chart(
    tracker_name: String,
    max_labels: Option<u32>,
    desired_segments: Option<u32>,
) -> TrackerChartResponse {
    let id = match TrackerId::from_name(&tracker_name) {
        Ok(id) => id,
        Err(err) => return TrackerChartResponse::failure(format!("tracker_chart failed: {err}")),
    };
    let config = ChartConfig::from_overrides(max_labels, desired_segments);
    let result = with_db(|conn| {
        let store = SqliteKeyValueStore::try_new(conn).map_err(|err| err.to_string())?;
        let service = TrackerService::with_chart_config(KvTrackerRepository::new(store), config);
        Ok(service.chart_data(&id))
    });
    match result {
        Ok(chart) => TrackerChartResponse::from_chart(chart),
        Err(err) => TrackerChartResponse::failure(format!("tracker_chart failed: {err}")),
    }
}

/// Summarizes a tracker against its goal.
pub fn tracker_summary(tracker_name: String) -> TrackerSummaryResponse {
    match with_tracker_service(|service| service.summarize(&tracker_name)) {
        Ok(summary) => TrackerSummaryResponse::from_summary(summary),
        Err(err) => TrackerSummaryResponse {
            ok: false,
            first: None,
            latest: None,
            change: None,
            goal_remaining: None,
            message: format!("tracker_summary failed: {err}"),
        },
    }
}

fn parse_target(tracker_name: &str, date: &str) -> Result<(TrackerId, ObservationDate), String> {
    let id = TrackerId::from_name(tracker_name).map_err(|err| err.to_string())?;
    let date = ObservationDate::parse(date).map_err(|err| err.to_string())?;
    Ok((id, date))
}

fn to_tracker_item(definition: TrackerDefinition) -> Option<TrackerItem> {
    match definition.id() {
        Ok(id) => Some(TrackerItem {
            tracker_id: id.to_string(),
            name: definition.name,
            unit: definition.unit,
            goal: definition.goal,
        }),
        Err(err) => {
            warn!("event=tracker_list module=ffi status=skipped error={err}");
            None
        }
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_db<T>(
    f: impl FnOnce(&Connection) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))?;
    f(&conn)
}

fn with_tracker_service<T>(
    f: impl FnOnce(&FfiTrackerService<'_>) -> Result<T, TrackerError>,
) -> Result<T, String> {
    with_db(|conn| {
        let store = SqliteKeyValueStore::try_new(conn)
            .map_err(|err| format!("store init failed: {err}"))?;
        let service = TrackerService::new(KvTrackerRepository::new(store));
        f(&service).map_err(|err| err.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::{
        configure_db_path, core_version, init_logging, observation_delete, observation_record,
        ping, tracker_chart, tracker_create, tracker_delete, tracker_list, tracker_summary,
        ObservationItem,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn configure_db_path_rejects_blank_and_switching() {
        assert!(!configure_db_path("  ".to_string()).is_empty());
        let active = super::resolve_db_path();
        assert!(configure_db_path(active.display().to_string()).is_empty());
        let error = configure_db_path("/definitely/another/fitlog.sqlite3".to_string());
        assert!(error.contains("refusing to switch"));
    }

    #[test]
    fn record_then_chart_round_trip() {
        let name = unique_token("Body Weight");
        assert!(tracker_create(name.clone(), Some("kg".to_string()), Some(70.0)).ok);

        let first = observation_record(name.clone(), "2024-01-05".to_string(), "72.5".to_string());
        assert!(first.ok, "{}", first.message);
        let second = observation_record(name.clone(), "2024-01-05".to_string(), "72".to_string());
        assert_eq!(second.entries.len(), 1);
        assert_eq!(second.entries[0].value, 72.0);

        let chart = tracker_chart(name.clone(), None, None);
        assert!(chart.ok, "{}", chart.message);
        assert_eq!(chart.labels, vec!["01-05"]);
        assert_eq!(chart.axis_min, 72.0);
        assert_eq!(chart.axis_max, 72.0);
        assert_eq!(chart.axis_segments, 1);

        let earlier = observation_record(name.clone(), "2024-01-01".to_string(), "74".to_string());
        assert!(earlier.ok, "{}", earlier.message);

        let summary = tracker_summary(name.clone());
        assert!(summary.ok, "{}", summary.message);
        assert_eq!(
            summary.first,
            Some(ObservationItem {
                date: "2024-01-01".to_string(),
                value: 74.0,
            })
        );
        assert_eq!(summary.latest.map(|item| item.date), Some("2024-01-05".to_string()));
        assert_eq!(summary.change, Some(-2.0));
        assert_eq!(summary.goal_remaining, Some(-2.0));

        let listed = tracker_list();
        assert!(listed.items.iter().any(|item| item.name == name));
    }

    #[test]
    fn blank_value_is_rejected_without_entries() {
        let name = unique_token("Creatine");
        let response = observation_record(name, "2024-01-05".to_string(), "   ".to_string());
        assert!(!response.ok);
        assert!(response.entries.is_empty());
        assert!(response.message.contains("value cannot be empty"));
    }

    #[test]
    fn delete_paths_succeed_for_missing_data() {
        let name = unique_token("Steps");
        let response = observation_delete(name.clone(), "2024-01-05".to_string());
        assert!(response.ok, "{}", response.message);
        assert!(response.entries.is_empty());

        assert!(tracker_delete(name.clone()).ok);
        let chart = tracker_chart(name, Some(0), Some(0));
        assert!(chart.points.is_empty());
        assert_eq!(chart.axis_step, 1.0);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix} {nanos}")
    }
}
