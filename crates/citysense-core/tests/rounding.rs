//! Exact half-way means must round the same way in every operation and on
//! both adapters (ties to even at two decimals).

use citysense_core::{
    area_avg_noise, area_avg_pollution, compose_filter, derive_kpis, global_avg_pollution,
    traffic_by_hour,
};
use citysense_store::{MemoryStore, RecordStore, Store};
use citysense_types::{AreaMetric, HourMetric, SensorReading};

/// Every field of "Tie Low" sums to 17 over 8 readings (mean 2.125) and every
/// field of "Tie High" sums to 21 over 8 readings (mean 2.625).
fn fixture() -> Vec<SensorReading> {
    let low = [3, 2, 2, 2, 2, 2, 2, 2];
    let high = [3, 3, 3, 3, 3, 2, 2, 2];

    let mut readings = Vec::new();
    for (i, v) in low.into_iter().enumerate() {
        let ts = format!("2024-05-01T08:{:02}", i * 5);
        readings.push(SensorReading::new(format!("low-{i}"), "Tie Low", ts, v, v, v));
    }
    for (i, v) in high.into_iter().enumerate() {
        let ts = format!("2024-05-01T09:{:02}", i * 5);
        readings.push(SensorReading::new(format!("high-{i}"), "Tie High", ts, v, v, v));
    }
    readings
}

fn assert_ties_round_to_even(store: &dyn RecordStore) {
    let filter = compose_filter::<&str>(&[]);
    let expected_areas = vec![AreaMetric::new("Tie High", 2.62), AreaMetric::new("Tie Low", 2.12)];

    assert_eq!(area_avg_pollution(store, &filter).unwrap(), expected_areas);
    assert_eq!(area_avg_noise(store, &filter).unwrap(), expected_areas);
    assert_eq!(
        traffic_by_hour(store, &filter).unwrap(),
        vec![HourMetric::new(8, 2.12), HourMetric::new(9, 2.62)]
    );

    // 38 / 16 = 2.375 rounds up to the even 2.38
    assert_eq!(global_avg_pollution(store, &filter).unwrap(), Some(2.38));

    let kpis = derive_kpis(store, &filter).unwrap();
    assert_eq!(kpis.avg_pollution, Some(2.38));
    assert_eq!(kpis.worst_pollution_area, Some(AreaMetric::new("Tie High", 2.62)));
    assert_eq!(kpis.peak_traffic_hour, Some(HourMetric::new(9, 2.62)));
    assert_eq!(kpis.noisiest_area, Some(AreaMetric::new("Tie High", 2.62)));

    let low_only = compose_filter(&["Tie Low"]);
    assert_eq!(global_avg_pollution(store, &low_only).unwrap(), Some(2.12));
    assert_eq!(
        traffic_by_hour(store, &low_only).unwrap(),
        vec![HourMetric::new(8, 2.12)]
    );
}

#[test]
fn test_ties_round_to_even_sqlite() {
    let store = Store::open_in_memory().unwrap();
    store.insert_readings(&fixture()).unwrap();
    assert_ties_round_to_even(&store);
}

#[test]
fn test_ties_round_to_even_memory() {
    assert_ties_round_to_even(&MemoryStore::from_readings(fixture()));
}
