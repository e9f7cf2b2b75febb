//! Tracker log and registry persistence over a key-value store.
//!
//! # Responsibility
//! - Map tracker logs to `tracker_<id>` keys and the registry to `trackers`.
//! - Encode/decode the JSON values stored under those keys.
//!
//! # Invariants
//! - Logs and the registry are always read and written wholesale.
//! - Undecodable stored values surface as `RepoError::InvalidData`; this
//!   layer never substitutes defaults.

use crate::model::tracker::{TrackerDefinition, TrackerId, TrackerLog};
use crate::repo::kv_repo::{KeyValueStore, RepoError, RepoResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Store key of the tracker registry.
pub const REGISTRY_KEY: &str = "trackers";

/// Repository interface for tracker logs and definitions.
pub trait TrackerRepository {
    /// Loads one log. `None` when the tracker has never been written.
    fn load_log(&self, id: &TrackerId) -> RepoResult<Option<TrackerLog>>;
    /// Replaces the stored log of one tracker.
    fn save_log(&self, id: &TrackerId, log: &TrackerLog) -> RepoResult<()>;
    /// Removes the stored log of one tracker. Missing logs are not an error.
    fn delete_log(&self, id: &TrackerId) -> RepoResult<()>;
    /// Loads all tracker definitions in insertion order.
    fn load_registry(&self) -> RepoResult<Vec<TrackerDefinition>>;
    /// Replaces the whole registry.
    fn save_registry(&self, definitions: &[TrackerDefinition]) -> RepoResult<()>;
}

/// Tracker repository storing JSON documents in any [`KeyValueStore`].
pub struct KvTrackerRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvTrackerRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> RepoResult<Option<T>> {
        let Some(raw) = self.store.read(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| RepoError::InvalidData {
                key: key.to_string(),
                message: err.to_string(),
            })
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> RepoResult<()> {
        let encoded = serde_json::to_string(value).map_err(|err| RepoError::InvalidData {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        self.store.write(key, &encoded)
    }
}

impl<S: KeyValueStore> TrackerRepository for KvTrackerRepository<S> {
    fn load_log(&self, id: &TrackerId) -> RepoResult<Option<TrackerLog>> {
        self.read_json(&id.store_key())
    }

    fn save_log(&self, id: &TrackerId, log: &TrackerLog) -> RepoResult<()> {
        self.write_json(&id.store_key(), log)
    }

    fn delete_log(&self, id: &TrackerId) -> RepoResult<()> {
        self.store.delete(&id.store_key())
    }

    fn load_registry(&self) -> RepoResult<Vec<TrackerDefinition>> {
        Ok(self.read_json(REGISTRY_KEY)?.unwrap_or_default())
    }

    fn save_registry(&self, definitions: &[TrackerDefinition]) -> RepoResult<()> {
        self.write_json(REGISTRY_KEY, definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::{KvTrackerRepository, TrackerRepository, REGISTRY_KEY};
    use crate::db::open_db_in_memory;
    use crate::model::tracker::{ObservationDate, TrackerDefinition, TrackerId, TrackerLog};
    use crate::repo::kv_repo::{KeyValueStore, RepoError, SqliteKeyValueStore};

    #[test]
    fn log_is_stored_under_prefixed_key() {
        let conn = open_db_in_memory().unwrap();
        let repo = KvTrackerRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
        let id = TrackerId::from_name("Body Weight").unwrap();

        let mut log = TrackerLog::new();
        log.upsert(ObservationDate::parse("2024-01-05").unwrap(), 72.5)
            .unwrap();
        repo.save_log(&id, &log).unwrap();

        assert_eq!(
            repo.store().read("tracker_body_weight").unwrap().as_deref(),
            Some(r#"{"2024-01-05":72.5}"#)
        );
        assert_eq!(repo.load_log(&id).unwrap(), Some(log));
    }

    #[test]
    fn corrupt_log_is_reported_not_masked() {
        let conn = open_db_in_memory().unwrap();
        let repo = KvTrackerRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
        let id = TrackerId::from_name("weight").unwrap();
        repo.store().write(&id.store_key(), "not json").unwrap();

        let err = repo.load_log(&id).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData { ref key, .. } if key == "tracker_weight"));
    }

    #[test]
    fn registry_defaults_to_empty_and_keeps_order() {
        let conn = open_db_in_memory().unwrap();
        let repo = KvTrackerRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
        assert!(repo.load_registry().unwrap().is_empty());

        let definitions = vec![
            TrackerDefinition::new("Weight").with_unit("kg").with_goal(70.0),
            TrackerDefinition::new("Creatine").with_unit("g"),
        ];
        repo.save_registry(&definitions).unwrap();
        assert_eq!(repo.load_registry().unwrap(), definitions);

        let raw = repo.store().read(REGISTRY_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["name"], "Weight");
        assert_eq!(json[0]["unit"], "kg");
        assert_eq!(json[1]["goal"], serde_json::Value::Null);
    }
}
