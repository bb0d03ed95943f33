//! Abnormal listing cap, uncapped counting and store failure propagation.

use citysense_core::{
    ABNORMAL_DISPLAY_LIMIT, Error, abnormal_count, abnormal_readings, compose_filter, refresh,
};
use citysense_store::{
    GroupRow, Grouping, MemoryStore, Projection, ReadingFilter, RecordStore, Result as StoreResult,
    Store,
};
use citysense_types::SensorReading;

/// Timestamp `minutes` after 2024-05-01T00:00, sortable as text.
fn minute_stamp(minutes: usize) -> String {
    format!(
        "2024-05-{:02}T{:02}:{:02}",
        1 + minutes / 1440,
        (minutes / 60) % 24,
        minutes % 60
    )
}

/// 1500 abnormal readings inserted newest first, plus normal ones between.
fn many_abnormal() -> Vec<SensorReading> {
    let mut readings = Vec::new();
    for i in (0..1500).rev() {
        readings.push(SensorReading::new(
            format!("abn-{i:04}"),
            "Industrial Zone",
            minute_stamp(i * 2),
            60,
            40,
            120,
        ));
        readings.push(SensorReading::new(
            format!("ok-{i:04}"),
            "Industrial Zone",
            minute_stamp(i * 2 + 1),
            60,
            40,
            20,
        ));
    }
    readings
}

fn check_cap(store: &dyn RecordStore) {
    let filter = compose_filter(&["Industrial Zone"]);

    assert_eq!(abnormal_count(store, &filter).unwrap(), 1500);

    let listed = abnormal_readings(store, &filter).unwrap();
    assert_eq!(listed.len(), ABNORMAL_DISPLAY_LIMIT as usize);
    assert_eq!(listed.first().unwrap().sensor_id, "abn-0000");
    assert_eq!(listed.last().unwrap().sensor_id, "abn-0999");
    assert!(listed.iter().all(SensorReading::is_abnormal));
    assert!(listed.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let snapshot = refresh(store, &filter).unwrap();
    assert_eq!(snapshot.kpis.abnormal_count, 1500);
    assert_eq!(snapshot.abnormal_readings.len(), 1000);
}

#[test]
fn test_cap_on_sqlite_store() {
    let store = Store::open_in_memory().unwrap();
    store.insert_readings(&many_abnormal()).unwrap();
    check_cap(&store);
}

#[test]
fn test_cap_on_memory_store() {
    check_cap(&MemoryStore::from_readings(many_abnormal()));
}

#[test]
fn test_threshold_boundaries_are_exclusive() {
    let store = MemoryStore::from_readings(vec![
        SensorReading::new("at-limits", "A", "2024-05-01T08:00", 85, 150, 100),
        SensorReading::new("over-noise", "A", "2024-05-01T08:01", 86, 150, 100),
    ]);
    let filter = ReadingFilter::new();
    assert_eq!(abnormal_count(&store, &filter).unwrap(), 1);
    let listed = abnormal_readings(&store, &filter).unwrap();
    assert_eq!(listed[0].sensor_id, "over-noise");
}

#[test]
fn test_missing_values_never_trigger() {
    let store = MemoryStore::from_readings(vec![SensorReading {
        sensor_id: "sparse".to_string(),
        area: "A".to_string(),
        timestamp: "2024-05-01T08:00".to_string(),
        noise_db: None,
        traffic_count: None,
        pm25: None,
    }]);
    assert_eq!(abnormal_count(&store, &ReadingFilter::new()).unwrap(), 0);
}

/// A store whose backend is gone.
struct Unavailable;

fn gone() -> citysense_store::Error {
    std::io::Error::new(std::io::ErrorKind::NotConnected, "backend offline").into()
}

impl RecordStore for Unavailable {
    fn run_grouping(&self, _: &ReadingFilter, _: &Grouping) -> StoreResult<Vec<GroupRow>> {
        Err(gone())
    }

    fn run_projection(&self, _: &ReadingFilter, _: &Projection) -> StoreResult<Vec<SensorReading>> {
        Err(gone())
    }

    fn run_count(&self, _: &ReadingFilter) -> StoreResult<u64> {
        Err(gone())
    }

    fn distinct_areas(&self) -> StoreResult<Vec<String>> {
        Err(gone())
    }
}

#[test]
fn test_store_failure_is_distinguishable_from_empty() {
    let err = refresh(&Unavailable, &ReadingFilter::new()).unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(citysense_store::Error::Io(_))));
    assert!(err.to_string().contains("backend offline"));

    let err = abnormal_count(&Unavailable, &ReadingFilter::new()).unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(_)));
}
