//! Trait abstraction over record stores.
//!
//! This module provides the [`RecordStore`] trait that the analytics engine
//! runs against. The SQLite [`Store`](crate::Store) and the in-memory
//! [`MemoryStore`](crate::MemoryStore) both implement it.

use citysense_types::SensorReading;

use crate::error::Result;
use crate::grouping::GroupRow;
use crate::queries::{Grouping, Projection, ReadingFilter};

/// Read-only operations the analytics engine needs from a store.
///
/// Implementations translate the filter and request into whatever the
/// backing store speaks and return typed rows. Malformed records must be
/// absorbed here: a record whose timestamp cannot be parsed drops out of
/// hour groupings only, and a missing numeric value does not contribute to
/// that field's average.
///
/// # Example
///
/// ```
/// use citysense_store::{Grouping, RecordStore, ReadingFilter, Result};
/// use citysense_types::MetricField;
///
/// fn loudest_area<S: RecordStore + ?Sized>(store: &S) -> Result<Option<String>> {
///     let rows = store.run_grouping(
///         &ReadingFilter::new(),
///         &Grouping::by_area(MetricField::NoiseDb).ranked().limit(1),
///     )?;
///     Ok(rows.into_iter().find_map(|row| row.key.as_area().map(str::to_string)))
/// }
/// ```
pub trait RecordStore {
    /// Filter → group → average → round → order → limit.
    ///
    /// Groups with no contributing value are omitted.
    fn run_grouping(&self, filter: &ReadingFilter, grouping: &Grouping) -> Result<Vec<GroupRow>>;

    /// Full readings matching `filter`, sorted by timestamp and limited.
    fn run_projection(
        &self,
        filter: &ReadingFilter,
        projection: &Projection,
    ) -> Result<Vec<SensorReading>>;

    /// Number of readings matching `filter`. Never capped.
    fn run_count(&self, filter: &ReadingFilter) -> Result<u64>;

    /// Every distinct area, sorted ascending.
    fn distinct_areas(&self) -> Result<Vec<String>>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn run_grouping(&self, filter: &ReadingFilter, grouping: &Grouping) -> Result<Vec<GroupRow>> {
        (**self).run_grouping(filter, grouping)
    }

    fn run_projection(
        &self,
        filter: &ReadingFilter,
        projection: &Projection,
    ) -> Result<Vec<SensorReading>> {
        (**self).run_projection(filter, projection)
    }

    fn run_count(&self, filter: &ReadingFilter) -> Result<u64> {
        (**self).run_count(filter)
    }

    fn distinct_areas(&self) -> Result<Vec<String>> {
        (**self).distinct_areas()
    }
}
