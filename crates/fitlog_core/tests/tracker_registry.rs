use fitlog_core::db::open_db_in_memory;
use fitlog_core::{
    KeyValueStore, KvTrackerRepository, ObservationDate, SqliteKeyValueStore, TrackerDefinition,
    TrackerError, TrackerId, TrackerLog, TrackerService, TrackerValidationError,
};
use rusqlite::Connection;

fn service(conn: &Connection) -> TrackerService<KvTrackerRepository<SqliteKeyValueStore<'_>>> {
    TrackerService::new(KvTrackerRepository::new(
        SqliteKeyValueStore::try_new(conn).unwrap(),
    ))
}

fn day(raw: &str) -> ObservationDate {
    ObservationDate::parse(raw).unwrap()
}

#[test]
fn created_trackers_are_listed_in_order() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .create_tracker(&TrackerDefinition::new("  Body Weight ").with_unit("kg"))
        .unwrap();
    assert_eq!(created.name, "Body Weight");
    service
        .create_tracker(&TrackerDefinition::new("Creatine").with_goal(5.0))
        .unwrap();

    let names = service
        .list_trackers()
        .into_iter()
        .map(|definition| definition.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Body Weight", "Creatine"]);
}

#[test]
fn names_mapping_to_same_id_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service
        .create_tracker(&TrackerDefinition::new("Body Weight"))
        .unwrap();

    let err = service
        .create_tracker(&TrackerDefinition::new("body   weight"))
        .unwrap_err();
    assert!(matches!(err, TrackerError::DuplicateTracker(ref name) if name == "body   weight"));

    let err = service
        .create_tracker(&TrackerDefinition::new("  "))
        .unwrap_err();
    assert!(matches!(
        err,
        TrackerError::Validation(TrackerValidationError::EmptyName)
    ));
    assert_eq!(service.list_trackers().len(), 1);
}

#[test]
fn delete_tracker_removes_log_and_definition() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service
        .create_tracker(&TrackerDefinition::new("Body Weight"))
        .unwrap();
    service
        .create_tracker(&TrackerDefinition::new("Creatine"))
        .unwrap();
    let weight = TrackerId::from_name("Body Weight").unwrap();
    let creatine = TrackerId::from_name("Creatine").unwrap();
    service
        .record_observation(&weight, day("2024-01-05"), "72.5")
        .unwrap();
    service
        .record_observation(&creatine, day("2024-01-05"), "5")
        .unwrap();

    service.delete_tracker("Body Weight").unwrap();

    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    assert_eq!(store.read("tracker_body_weight").unwrap(), None);
    assert_eq!(service.load_log(&weight), TrackerLog::new());
    assert_eq!(service.load_log(&creatine).len(), 1);

    let remaining = service.list_trackers();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Creatine");
}

#[test]
fn delete_tracker_without_log_or_definition_succeeds() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service.delete_tracker("Never Created").unwrap();
    assert!(service.list_trackers().is_empty());
}

#[test]
fn delete_tracker_with_unreadable_registry_keeps_log() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let weight = TrackerId::from_name("Weight").unwrap();
    service
        .record_observation(&weight, day("2024-01-05"), "70")
        .unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    store.write("trackers", "not json").unwrap();

    let err = service.delete_tracker("Weight").unwrap_err();
    assert!(matches!(err, TrackerError::StoreRead(_)));
    assert!(store.read("tracker_weight").unwrap().is_some());
    assert_eq!(service.load_log(&weight).get(&day("2024-01-05")), Some(70.0));
}

#[test]
fn unreadable_registry_lists_as_empty_but_blocks_create() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    SqliteKeyValueStore::try_new(&conn)
        .unwrap()
        .write("trackers", "{\"not\":\"a list\"}")
        .unwrap();

    assert!(service.list_trackers().is_empty());
    let err = service
        .create_tracker(&TrackerDefinition::new("Weight"))
        .unwrap_err();
    assert!(matches!(err, TrackerError::StoreRead(_)));
}

#[test]
fn summary_reports_change_and_goal_gap() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service
        .create_tracker(&TrackerDefinition::new("Body Weight").with_goal(75.0))
        .unwrap();
    let weight = TrackerId::from_name("Body Weight").unwrap();
    service
        .record_observation(&weight, day("2024-02-01"), "78")
        .unwrap();
    service
        .record_observation(&weight, day("2024-01-01"), "81")
        .unwrap();

    let summary = service.summarize("body weight").unwrap();
    assert_eq!(summary.first.map(|point| point.value), Some(81.0));
    assert_eq!(summary.latest.map(|point| point.value), Some(78.0));
    assert_eq!(summary.change, Some(-3.0));
    assert_eq!(summary.goal_remaining, Some(-3.0));

    let err = service.summarize("Steps").unwrap_err();
    assert!(matches!(err, TrackerError::TrackerNotFound(_)));
}
