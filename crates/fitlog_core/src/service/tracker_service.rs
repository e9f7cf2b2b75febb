//! Metric tracker use-case service.
//!
//! # Responsibility
//! - Validate and record dated observations per tracker.
//! - Delete single observations and whole trackers.
//! - Maintain the tracker registry and derive chart data.
//!
//! # Invariants
//! - Validation runs before any store access; rejected input never mutates.
//! - Mutations read the whole log, change it, and write it back. A returned
//!   log always reflects a confirmed write.
//! - Only display reads (`load_log`, `list_trackers`) degrade to empty on
//!   store failure. Mutations refuse to build on an unreadable document.

use crate::chart::series::derive_series;
use crate::chart::summary::{summarize_series, TrackerSummary};
use crate::chart::ChartData;
use crate::config::ChartConfig;
use crate::model::tracker::{
    parse_observation_value, ObservationDate, TrackerDefinition, TrackerId, TrackerLog,
    TrackerValidationError,
};
use crate::model::view_state::ObservationDraft;
use crate::repo::kv_repo::RepoError;
use crate::repo::tracker_repo::TrackerRepository;
use log::{info, warn};
use thiserror::Error;

/// Service error for tracker use-cases.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Input was rejected; nothing was read or written.
    #[error("{0}")]
    Validation(#[from] TrackerValidationError),
    /// An existing document could not be read, so it was not modified.
    #[error("failed to read stored tracker data: {0}")]
    StoreRead(RepoError),
    /// The store rejected a write or delete.
    #[error("failed to save tracker data: {0}")]
    StoreWrite(RepoError),
    #[error("a tracker named `{0}` already exists")]
    DuplicateTracker(String),
    #[error("tracker not found: `{0}`")]
    TrackerNotFound(String),
}

/// Metric tracker facade over a tracker repository.
pub struct TrackerService<R: TrackerRepository> {
    repo: R,
    chart_config: ChartConfig,
}

impl<R: TrackerRepository> TrackerService<R> {
    /// Creates a service with default chart settings.
    pub fn new(repo: R) -> Self {
        Self::with_chart_config(repo, ChartConfig::default())
    }

    pub fn with_chart_config(repo: R, chart_config: ChartConfig) -> Self {
        Self { repo, chart_config }
    }

    pub fn chart_config(&self) -> &ChartConfig {
        &self.chart_config
    }

    /// Records `raw_value` for `date`, replacing any value already stored
    /// for that day.
    ///
    /// # Errors
    /// - `Validation` for blank, non-numeric or non-finite input.
    /// - `StoreRead` when the existing log cannot be decoded.
    /// - `StoreWrite` when the updated log cannot be saved.
    pub fn record_observation(
        &self,
        id: &TrackerId,
        date: ObservationDate,
        raw_value: &str,
    ) -> Result<TrackerLog, TrackerError> {
        let value = parse_observation_value(raw_value)?;
        let mut log = self.read_log_for_update(id)?;
        let replaced = log.upsert(date, value)?.is_some();
        self.repo
            .save_log(id, &log)
            .map_err(TrackerError::StoreWrite)?;

        info!(
            "event=observation_record module=service status=ok tracker={} date={} replaced={} entries={}",
            id,
            date,
            replaced,
            log.len()
        );
        Ok(log)
    }

    /// Records the contents of a submitted entry form.
    pub fn record_draft(
        &self,
        id: &TrackerId,
        draft: &ObservationDraft,
    ) -> Result<TrackerLog, TrackerError> {
        let date = ObservationDate::parse(&draft.date)?;
        self.record_observation(id, date, &draft.raw_value)
    }

    /// Removes the value stored for `date`. Missing dates are not an error.
    pub fn delete_observation(
        &self,
        id: &TrackerId,
        date: ObservationDate,
    ) -> Result<TrackerLog, TrackerError> {
        let stored = self.repo.load_log(id).map_err(TrackerError::StoreRead)?;
        let existed = stored.is_some();
        let mut log = stored.unwrap_or_default();
        let removed = log.remove(&date).is_some();
        // A tracker that was never recorded stays absent from the store.
        if existed {
            self.repo
                .save_log(id, &log)
                .map_err(TrackerError::StoreWrite)?;
        }

        info!(
            "event=observation_delete module=service status=ok tracker={} date={} removed={}",
            id, date, removed
        );
        Ok(log)
    }

    /// Deletes a tracker's whole log and its registry definition.
    ///
    /// Executes immediately; confirmation belongs to the caller.
    pub fn delete_tracker(&self, name: &str) -> Result<(), TrackerError> {
        let id = TrackerId::from_name(name)?;
        let display_name = name.trim();

        // Registry must be readable before anything is removed.
        let mut definitions = self
            .repo
            .load_registry()
            .map_err(TrackerError::StoreRead)?;

        self.repo
            .delete_log(&id)
            .map_err(TrackerError::StoreWrite)?;

        let before = definitions.len();
        definitions.retain(|definition| definition.name != display_name);
        if definitions.len() != before {
            self.repo
                .save_registry(&definitions)
                .map_err(TrackerError::StoreWrite)?;
        }

        info!(
            "event=tracker_delete module=service status=ok tracker={} registry_removed={}",
            id,
            before - definitions.len()
        );
        Ok(())
    }

    /// Appends a new tracker definition to the registry.
    pub fn create_tracker(
        &self,
        definition: &TrackerDefinition,
    ) -> Result<TrackerDefinition, TrackerError> {
        let definition = definition.normalized()?;
        let id = definition.id()?;

        let mut definitions = self
            .repo
            .load_registry()
            .map_err(TrackerError::StoreRead)?;
        if definitions
            .iter()
            .any(|existing| existing.id().ok().as_ref() == Some(&id))
        {
            return Err(TrackerError::DuplicateTracker(definition.name));
        }

        definitions.push(definition.clone());
        self.repo
            .save_registry(&definitions)
            .map_err(TrackerError::StoreWrite)?;

        info!(
            "event=tracker_create module=service status=ok tracker={} total={}",
            id,
            definitions.len()
        );
        Ok(definition)
    }

    /// Lists tracker definitions in creation order.
    ///
    /// An unreadable registry is logged and presented as empty.
    pub fn list_trackers(&self) -> Vec<TrackerDefinition> {
        match self.repo.load_registry() {
            Ok(definitions) => definitions,
            Err(err) => {
                warn!(
                    "event=registry_load_fallback module=service status=degraded error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    /// Loads a tracker's log for display.
    ///
    /// Missing logs are empty. Unreadable logs are logged and presented as
    /// empty so the user can keep logging.
    pub fn load_log(&self, id: &TrackerId) -> TrackerLog {
        match self.repo.load_log(id) {
            Ok(log) => log.unwrap_or_default(),
            Err(err) => {
                warn!(
                    "event=log_load_fallback module=service status=degraded tracker={} error={}",
                    id, err
                );
                TrackerLog::new()
            }
        }
    }

    /// Derives series, labels and axis range for one tracker.
    pub fn chart_data(&self, id: &TrackerId) -> ChartData {
        ChartData::from_log(&self.load_log(id), &self.chart_config)
    }

    /// Summarizes a registered tracker against its goal.
    pub fn summarize(&self, name: &str) -> Result<TrackerSummary, TrackerError> {
        let id = TrackerId::from_name(name)?;
        let definition = self
            .list_trackers()
            .into_iter()
            .find(|definition| definition.id().ok().as_ref() == Some(&id))
            .ok_or_else(|| TrackerError::TrackerNotFound(name.trim().to_string()))?;

        let series = derive_series(&self.load_log(&id));
        Ok(summarize_series(&series, definition.goal))
    }

    fn read_log_for_update(&self, id: &TrackerId) -> Result<TrackerLog, TrackerError> {
        self.repo
            .load_log(id)
            .map(Option::unwrap_or_default)
            .map_err(TrackerError::StoreRead)
    }
}
