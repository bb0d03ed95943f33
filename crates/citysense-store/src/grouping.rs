//! Grouped result rows and the shared round → order → limit step.

use std::cmp::Ordering;

use citysense_types::round2;

use crate::queries::{GroupOrder, Grouping};

/// Key of one grouped row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupValue {
    /// The single group of an ungrouped average.
    All,
    /// An area label.
    Area(String),
    /// A UTC hour of day.
    Hour(u8),
}

impl GroupValue {
    /// The area label, if this is an area key.
    pub fn as_area(&self) -> Option<&str> {
        match self {
            GroupValue::Area(area) => Some(area),
            _ => None,
        }
    }

    /// The hour, if this is an hour key.
    pub fn as_hour(&self) -> Option<u8> {
        match self {
            GroupValue::Hour(hour) => Some(*hour),
            _ => None,
        }
    }
}

/// One `{key, value}` row produced by a grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    /// Group key.
    pub key: GroupValue,
    /// Mean of the grouped field, rounded to 2 decimals once finished.
    pub metric: f64,
}

impl GroupRow {
    /// Create a row.
    pub fn new(key: GroupValue, metric: f64) -> Self {
        Self { key, metric }
    }
}

/// Round, order and limit raw mean rows according to `grouping`.
///
/// Every adapter routes its raw means through here so that rounding and
/// tie-breaking follow one law regardless of the backing store. Ranking is
/// done on the rounded value; equal metrics fall back to ascending key order.
pub fn finish_grouping(mut rows: Vec<GroupRow>, grouping: &Grouping) -> Vec<GroupRow> {
    for row in &mut rows {
        row.metric = round2(row.metric);
    }

    match grouping.order {
        GroupOrder::ByKey => rows.sort_by(|a, b| a.key.cmp(&b.key)),
        GroupOrder::ByMetricDesc => rows.sort_by(|a, b| by_metric_desc(a, b)),
    }

    if let Some(limit) = grouping.limit {
        rows.truncate(limit as usize);
    }

    rows
}

fn by_metric_desc(a: &GroupRow, b: &GroupRow) -> Ordering {
    b.metric
        .total_cmp(&a.metric)
        .then_with(|| a.key.cmp(&b.key))
}
