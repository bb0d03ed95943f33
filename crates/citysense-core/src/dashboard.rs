//! One full dashboard refresh.

use std::time::Instant;

use citysense_store::{ReadingFilter, RecordStore};
use citysense_types::{AreaMetric, HourMetric, SensorReading};
use serde::Serialize;
use tracing::info;

use crate::aggregations::{abnormal_readings, area_avg_noise, area_avg_pollution, traffic_by_hour};
use crate::error::Result;
use crate::kpi::{Kpis, derive_kpis};

/// Everything a presentation layer needs for one refresh.
///
/// Field names are stable; renderers and exports rely on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Mean PM2.5 per area, ascending by area.
    pub area_avg_pollution: Vec<AreaMetric>,
    /// Mean traffic count per UTC hour, ascending by hour.
    pub traffic_by_hour: Vec<HourMetric>,
    /// Mean noise level per area, ascending by area.
    pub area_avg_noise: Vec<AreaMetric>,
    /// Earliest abnormal readings, capped for display.
    pub abnormal_readings: Vec<SensorReading>,
    /// Headline values.
    pub kpis: Kpis,
}

/// Run the four aggregations and five KPIs against `store` with one filter.
///
/// The same filter value reaches every operation, so all numbers describe
/// the same population. The first store failure aborts the refresh.
///
/// # Example
///
/// ```
/// use citysense_core::{compose_filter, refresh};
/// use citysense_store::MemoryStore;
/// use citysense_types::SensorReading;
///
/// let store = MemoryStore::from_readings(vec![
///     SensorReading::new("s-1", "City Center", "2024-05-01T08:00", 72, 160, 58),
/// ]);
///
/// let snapshot = refresh(&store, &compose_filter(&["City Center"]))?;
/// assert_eq!(snapshot.kpis.abnormal_count, 1);
/// assert_eq!(snapshot.traffic_by_hour[0].hour, 8);
/// # Ok::<(), citysense_core::Error>(())
/// ```
#[tracing::instrument(level = "info", skip_all, fields(areas = ?filter.areas))]
pub fn refresh<S: RecordStore + ?Sized>(
    store: &S,
    filter: &ReadingFilter,
) -> Result<DashboardSnapshot> {
    let started = Instant::now();

    let snapshot = DashboardSnapshot {
        area_avg_pollution: area_avg_pollution(store, filter)?,
        traffic_by_hour: traffic_by_hour(store, filter)?,
        area_avg_noise: area_avg_noise(store, filter)?,
        abnormal_readings: abnormal_readings(store, filter)?,
        kpis: derive_kpis(store, filter)?,
    };

    info!(
        abnormal = snapshot.kpis.abnormal_count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Dashboard refreshed"
    );

    Ok(snapshot)
}

impl DashboardSnapshot {
    /// Whether the filtered population produced no rows at all.
    pub fn is_empty(&self) -> bool {
        self.area_avg_pollution.is_empty()
            && self.traffic_by_hour.is_empty()
            && self.area_avg_noise.is_empty()
            && self.abnormal_readings.is_empty()
            && self.kpis.abnormal_count == 0
    }

    /// Hourly traffic with every hour 0-23 present, missing hours as `0.0`.
    ///
    /// Only for display; [`traffic_by_hour`](Self::traffic_by_hour) itself
    /// never contains empty hours.
    pub fn traffic_by_hour_filled(&self) -> Vec<HourMetric> {
        (0..24u8)
            .map(|hour| {
                self.traffic_by_hour
                    .iter()
                    .find(|row| row.hour == hour)
                    .copied()
                    .unwrap_or(HourMetric::new(hour, 0.0))
            })
            .collect()
    }
}
