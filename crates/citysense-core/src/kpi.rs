//! Headline KPIs.
//!
//! Each KPI re-runs its aggregation with ranking and a limit instead of
//! reusing rows from another call, so every value reflects the filter it
//! was given. "Top 1" KPIs rank on the rounded metric; equal metrics are
//! broken by ascending area name or hour.

use citysense_store::{Grouping, ReadingFilter, RecordStore};
use citysense_types::{AreaMetric, HourMetric, MetricField};
use serde::Serialize;

use crate::aggregations::{area_metric, hour_metric};
use crate::error::Result;

/// The five dashboard KPIs for one filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    /// Mean PM2.5 over the whole filtered population.
    pub avg_pollution: Option<f64>,
    /// Area with the highest mean PM2.5.
    pub worst_pollution_area: Option<AreaMetric>,
    /// Hour with the highest mean traffic count.
    pub peak_traffic_hour: Option<HourMetric>,
    /// Area with the highest mean noise level.
    pub noisiest_area: Option<AreaMetric>,
    /// Number of abnormal readings, uncapped.
    pub abnormal_count: u64,
}

/// Mean PM2.5 over the filtered population, ungrouped.
///
/// `None` when no reading contributes a PM2.5 value.
pub fn global_avg_pollution<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
) -> Result<Option<f64>> {
    let rows = store.run_grouping(filter, &Grouping::overall(MetricField::Pm25))?;
    Ok(rows.first().map(|row| row.metric))
}

/// Area with the highest mean PM2.5.
pub fn worst_pollution_area<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
) -> Result<Option<AreaMetric>> {
    top_area(store, filter, MetricField::Pm25)
}

/// Hour with the highest mean traffic count.
pub fn peak_traffic_hour<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
) -> Result<Option<HourMetric>> {
    let rows = store.run_grouping(
        filter,
        &Grouping::by_hour(MetricField::TrafficCount).ranked().limit(1),
    )?;
    Ok(rows.into_iter().find_map(hour_metric))
}

/// Area with the highest mean noise level.
pub fn noisiest_area<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
) -> Result<Option<AreaMetric>> {
    top_area(store, filter, MetricField::NoiseDb)
}

/// Number of readings exceeding any abnormal threshold.
///
/// Counts every match. This is not the length of
/// [`abnormal_readings`](crate::abnormal_readings), which is capped for
/// display.
pub fn abnormal_count<S: RecordStore + ?Sized>(store: &S, filter: &ReadingFilter) -> Result<u64> {
    let count = store.run_count(&filter.clone().abnormal_only())?;
    Ok(count)
}

/// Compute all five KPIs with the same filter.
pub fn derive_kpis<S: RecordStore + ?Sized>(store: &S, filter: &ReadingFilter) -> Result<Kpis> {
    Ok(Kpis {
        avg_pollution: global_avg_pollution(store, filter)?,
        worst_pollution_area: worst_pollution_area(store, filter)?,
        peak_traffic_hour: peak_traffic_hour(store, filter)?,
        noisiest_area: noisiest_area(store, filter)?,
        abnormal_count: abnormal_count(store, filter)?,
    })
}

fn top_area<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
    field: MetricField,
) -> Result<Option<AreaMetric>> {
    let rows = store.run_grouping(filter, &Grouping::by_area(field).ranked().limit(1))?;
    Ok(rows.into_iter().find_map(area_metric))
}
