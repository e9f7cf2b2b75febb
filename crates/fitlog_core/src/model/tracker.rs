//! Tracker domain model.
//!
//! # Responsibility
//! - Define tracker identity, definitions and the per-tracker observation log.
//! - Validate user-entered values and dates before anything reaches storage.
//!
//! # Invariants
//! - `TrackerId` is derived from a display name: trimmed, lower-cased, each
//!   whitespace run collapsed to a single `_`.
//! - Every value held by a `TrackerLog` is finite.
//! - A `TrackerLog` holds at most one value per calendar day.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use thiserror::Error;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const ISO_DATE_LEN: usize = 10;
const STORE_KEY_PREFIX: &str = "tracker_";

/// Validation failures for tracker input. None of these mutate state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerValidationError {
    #[error("tracker name cannot be empty")]
    EmptyName,
    #[error("value cannot be empty")]
    EmptyValue,
    #[error("value `{0}` is not a number")]
    NotNumeric(String),
    #[error("value `{0}` is not a finite number")]
    NonFinite(String),
    #[error("date `{0}` is not a calendar day in YYYY-MM-DD form")]
    InvalidDate(String),
    #[error("tracker goal must be a finite number")]
    NonFiniteGoal,
}

/// Stable identifier of a tracker, derived from its display name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackerId(String);

impl TrackerId {
    /// Derives the id for a human-readable tracker name.
    ///
    /// `"  Body   Weight "` becomes `body_weight`.
    pub fn from_name(name: &str) -> Result<Self, TrackerValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TrackerValidationError::EmptyName);
        }
        let lowered = trimmed.to_lowercase();
        Ok(Self(WHITESPACE_RE.replace_all(&lowered, "_").into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of this tracker's log in the metric store.
    pub fn store_key(&self) -> String {
        format!("{STORE_KEY_PREFIX}{}", self.0)
    }
}

impl Display for TrackerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar day with no time component.
///
/// Serialized as `YYYY-MM-DD`, so lexicographic order of the serialized form
/// matches chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationDate(NaiveDate);

impl ObservationDate {
    /// Parses a strict `YYYY-MM-DD` string.
    pub fn parse(raw: &str) -> Result<Self, TrackerValidationError> {
        let trimmed = raw.trim();
        // chrono accepts unpadded fields and extra year digits; the store
        // format does not.
        if !has_iso_date_layout(trimmed) {
            return Err(TrackerValidationError::InvalidDate(trimmed.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
            .map(Self)
            .map_err(|_| TrackerValidationError::InvalidDate(trimmed.to_string()))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn to_iso(&self) -> String {
        self.0.format(ISO_DATE_FORMAT).to_string()
    }
}

impl Display for ObservationDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(ISO_DATE_FORMAT))
    }
}

impl Serialize for ObservationDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

impl<'de> Deserialize<'de> for ObservationDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn has_iso_date_layout(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == ISO_DATE_LEN
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Parses user-entered text into an observation value.
///
/// Surrounding whitespace is ignored. `inf`/`NaN` spellings parse as floats
/// but are rejected.
pub fn parse_observation_value(raw: &str) -> Result<f64, TrackerValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TrackerValidationError::EmptyValue);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|_| TrackerValidationError::NotNumeric(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(TrackerValidationError::NonFinite(trimmed.to_string()));
    }
    Ok(value)
}

/// User-defined tracker, as kept in the tracker registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerDefinition {
    /// Display name. The tracker id is derived from it.
    pub name: String,
    /// Free-form unit label, e.g. `kg` or `mg`.
    #[serde(default)]
    pub unit: Option<String>,
    /// Target value the user is working towards.
    #[serde(default)]
    pub goal: Option<f64>,
}

impl TrackerDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: None,
            goal: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_goal(mut self, goal: f64) -> Self {
        self.goal = Some(goal);
        self
    }

    pub fn id(&self) -> Result<TrackerId, TrackerValidationError> {
        TrackerId::from_name(&self.name)
    }

    /// Returns a trimmed copy, rejecting empty names and non-finite goals.
    /// A blank unit is dropped.
    pub fn normalized(&self) -> Result<Self, TrackerValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TrackerValidationError::EmptyName);
        }
        if matches!(self.goal, Some(goal) if !goal.is_finite()) {
            return Err(TrackerValidationError::NonFiniteGoal);
        }
        let unit = self
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|unit| !unit.is_empty())
            .map(str::to_string);
        Ok(Self {
            name: name.to_string(),
            unit,
            goal: self.goal,
        })
    }
}

/// Date → value log of one tracker.
///
/// Persisted as a JSON object keyed by ISO date. Writing a date that already
/// exists replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<ObservationDate, f64>", into = "BTreeMap<ObservationDate, f64>")]
pub struct TrackerLog {
    entries: BTreeMap<ObservationDate, f64>,
}

impl TrackerLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `date`. Returns the replaced value.
    pub fn upsert(
        &mut self,
        date: ObservationDate,
        value: f64,
    ) -> Result<Option<f64>, TrackerValidationError> {
        if !value.is_finite() {
            return Err(TrackerValidationError::NonFinite(value.to_string()));
        }
        Ok(self.entries.insert(date, value))
    }

    /// Removes the value for `date`, if any.
    pub fn remove(&mut self, date: &ObservationDate) -> Option<f64> {
        self.entries.remove(date)
    }

    pub fn get(&self, date: &ObservationDate) -> Option<f64> {
        self.entries.get(date).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (ObservationDate, f64)> + '_ {
        self.entries.iter().map(|(date, value)| (*date, *value))
    }
}

impl TryFrom<BTreeMap<ObservationDate, f64>> for TrackerLog {
    type Error = TrackerValidationError;

    fn try_from(entries: BTreeMap<ObservationDate, f64>) -> Result<Self, Self::Error> {
        if let Some((_, value)) = entries.iter().find(|(_, value)| !value.is_finite()) {
            return Err(TrackerValidationError::NonFinite(value.to_string()));
        }
        Ok(Self { entries })
    }
}

impl From<TrackerLog> for BTreeMap<ObservationDate, f64> {
    fn from(log: TrackerLog) -> Self {
        log.entries
    }
}
