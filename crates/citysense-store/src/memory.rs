//! In-memory record store.

use std::collections::{BTreeMap, BTreeSet};

use citysense_types::SensorReading;
use tracing::debug;

use crate::error::Result;
use crate::grouping::{GroupRow, GroupValue, finish_grouping};
use crate::queries::{GroupKey, Grouping, Projection, ReadingFilter};
use crate::traits::RecordStore;

/// A [`RecordStore`] over a plain vector of readings.
///
/// Produces exactly the rows the SQLite [`Store`](crate::Store) produces for
/// the same data, which makes it suitable for tests and for small datasets
/// loaded from JSON.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    readings: Vec<SensorReading>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `readings` in the given order.
    pub fn from_readings(readings: Vec<SensorReading>) -> Self {
        Self { readings }
    }

    /// Append a reading.
    pub fn insert(&mut self, reading: SensorReading) {
        self.readings.push(reading);
    }

    /// Number of readings held.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the store holds no readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    fn matching<'a>(
        &'a self,
        filter: &'a ReadingFilter,
    ) -> impl Iterator<Item = (usize, &'a SensorReading)> + 'a {
        self.readings
            .iter()
            .enumerate()
            .filter(move |(_, r)| filter.matches(r))
    }
}

impl FromIterator<SensorReading> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = SensorReading>>(iter: I) -> Self {
        Self::from_readings(iter.into_iter().collect())
    }
}

impl RecordStore for MemoryStore {
    fn run_grouping(&self, filter: &ReadingFilter, grouping: &Grouping) -> Result<Vec<GroupRow>> {
        let mut groups: BTreeMap<GroupValue, (i128, u64)> = BTreeMap::new();

        for (_, reading) in self.matching(filter) {
            let Some(value) = reading.value(grouping.field) else {
                continue;
            };

            let key = match grouping.key {
                GroupKey::Area => GroupValue::Area(reading.area.clone()),
                GroupKey::All => GroupValue::All,
                GroupKey::Hour => match reading.hour() {
                    Ok(hour) => GroupValue::Hour(hour),
                    Err(e) => {
                        debug!(
                            "Skipping reading from {} in hourly grouping: {}",
                            reading.sensor_id, e
                        );
                        continue;
                    }
                },
            };

            let entry = groups.entry(key).or_insert((0, 0));
            entry.0 += i128::from(value);
            entry.1 += 1;
        }

        let rows = groups
            .into_iter()
            .map(|(key, (sum, count))| GroupRow::new(key, sum as f64 / count as f64))
            .collect();

        Ok(finish_grouping(rows, grouping))
    }

    fn run_projection(
        &self,
        filter: &ReadingFilter,
        projection: &Projection,
    ) -> Result<Vec<SensorReading>> {
        let mut matched: Vec<(usize, &SensorReading)> = self.matching(filter).collect();
        matched.sort_by(|(ia, a), (ib, b)| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.sensor_id.cmp(&b.sensor_id))
                .then_with(|| ia.cmp(ib))
        });
        if projection.newest_first {
            matched.reverse();
        }

        let limit = projection.limit.map_or(usize::MAX, |l| l as usize);
        Ok(matched
            .into_iter()
            .take(limit)
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn run_count(&self, filter: &ReadingFilter) -> Result<u64> {
        Ok(self.matching(filter).count() as u64)
    }

    fn distinct_areas(&self) -> Result<Vec<String>> {
        let areas: BTreeSet<&str> = self.readings.iter().map(|r| r.area.as_str()).collect();
        Ok(areas.into_iter().map(str::to_string).collect())
    }
}
