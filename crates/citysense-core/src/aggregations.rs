//! The four dashboard aggregations, plus the recent-readings listing.
//!
//! Every function takes the store handle and the composed filter
//! explicitly and returns freshly computed rows.

use citysense_store::{GroupRow, Grouping, Projection, ReadingFilter, RecordStore};
use citysense_types::{AreaMetric, HourMetric, MetricField, SensorReading};

use crate::error::Result;

/// Maximum number of abnormal readings listed.
///
/// Always the earliest readings by timestamp. Counting is never capped; see
/// [`abnormal_count`](crate::abnormal_count).
pub const ABNORMAL_DISPLAY_LIMIT: u32 = 1000;

/// Default number of readings returned by [`recent_readings`].
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

/// Mean PM2.5 per area, ascending by area.
pub fn area_avg_pollution<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
) -> Result<Vec<AreaMetric>> {
    area_average(store, filter, MetricField::Pm25)
}

/// Mean noise level per area, ascending by area.
pub fn area_avg_noise<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
) -> Result<Vec<AreaMetric>> {
    area_average(store, filter, MetricField::NoiseDb)
}

/// Mean traffic count per UTC hour-of-day, ascending by hour.
///
/// Hours with no readings are absent. Readings whose timestamp cannot be
/// parsed are left out of this operation only.
pub fn traffic_by_hour<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
) -> Result<Vec<HourMetric>> {
    let rows = store.run_grouping(filter, &Grouping::by_hour(MetricField::TrafficCount))?;
    Ok(rows.into_iter().filter_map(hour_metric).collect())
}

/// Readings exceeding any abnormal threshold, earliest first, capped at
/// [`ABNORMAL_DISPLAY_LIMIT`].
pub fn abnormal_readings<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
) -> Result<Vec<SensorReading>> {
    let filter = filter.clone().abnormal_only();
    let readings = store.run_projection(&filter, &Projection::new().limit(ABNORMAL_DISPLAY_LIMIT))?;
    Ok(readings)
}

/// Most recently timestamped readings, newest first, across all areas.
pub fn recent_readings<S: RecordStore + ?Sized>(
    store: &S,
    limit: u32,
) -> Result<Vec<SensorReading>> {
    let readings = store.run_projection(
        &ReadingFilter::new(),
        &Projection::new().newest_first().limit(limit),
    )?;
    Ok(readings)
}

pub(crate) fn area_average<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
    field: MetricField,
) -> Result<Vec<AreaMetric>> {
    let rows = store.run_grouping(filter, &Grouping::by_area(field))?;
    Ok(rows.into_iter().filter_map(area_metric).collect())
}

pub(crate) fn area_metric(row: GroupRow) -> Option<AreaMetric> {
    row.key.as_area().map(|area| AreaMetric::new(area, row.metric))
}

pub(crate) fn hour_metric(row: GroupRow) -> Option<HourMetric> {
    row.key.as_hour().map(|hour| HourMetric::new(hour, row.metric))
}
