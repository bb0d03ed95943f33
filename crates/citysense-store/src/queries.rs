//! Query builders handed to a [`RecordStore`](crate::RecordStore).
//!
//! [`ReadingFilter`] selects the population every operation works on,
//! [`Grouping`] describes a filter → group → average → round → order pipeline
//! and [`Projection`] describes a sorted, limited listing of full readings.
//! All three follow the builder pattern.
//!
//! # Example
//!
//! ```
//! use citysense_store::{Grouping, MemoryStore, Projection, ReadingFilter, RecordStore};
//! use citysense_types::MetricField;
//!
//! let store = MemoryStore::new();
//! let filter = ReadingFilter::new().areas(["City Center", "Park Area"]);
//!
//! // Worst area by PM2.5
//! let by_pm25 = Grouping::by_area(MetricField::Pm25).ranked().limit(1);
//! let worst = store.run_grouping(&filter, &by_pm25)?;
//!
//! // Earliest abnormal readings
//! let abnormal =
//!     store.run_projection(&filter.clone().abnormal_only(), &Projection::new().limit(20))?;
//! # Ok::<(), citysense_store::Error>(())
//! ```

use citysense_types::{MetricField, SensorReading};

/// Columns of a full reading projection, in [`SensorReading`] field order.
pub(crate) const READING_COLUMNS: &str =
    "sensor_id, area, timestamp, noise_db, traffic_count, pm25";

/// Selection applied uniformly to every operation of one refresh.
///
/// The default filter matches every reading. Restricting to an empty set of
/// areas is not possible: an empty selection means "all areas".
///
/// # Example
///
/// ```
/// use citysense_store::ReadingFilter;
/// use citysense_types::SensorReading;
///
/// let r = SensorReading::new("s-1", "Park Area", "2024-05-01T08:00", 40, 10, 20);
///
/// assert!(ReadingFilter::new().matches(&r));
/// assert!(ReadingFilter::new().areas(Vec::<String>::new()).matches(&r));
/// assert!(ReadingFilter::new().areas(["Park Area"]).matches(&r));
/// assert!(!ReadingFilter::new().areas(["park area"]).matches(&r));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReadingFilter {
    /// Allowed areas, sorted and deduplicated. `None` allows every area.
    pub areas: Option<Vec<String>>,
    /// Keep only readings that exceed at least one abnormal threshold.
    pub abnormal_only: bool,
}

impl ReadingFilter {
    /// Create a filter that matches every reading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to readings whose area is a member of `areas`.
    ///
    /// An empty iterator clears the restriction.
    pub fn areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = areas.into_iter().map(Into::into).collect();
        list.sort();
        list.dedup();
        self.areas = if list.is_empty() { None } else { Some(list) };
        self
    }

    /// Keep only abnormal readings (any threshold exceeded).
    pub fn abnormal_only(mut self) -> Self {
        self.abnormal_only = true;
        self
    }

    /// Whether this filter leaves the area dimension unrestricted.
    pub fn selects_all_areas(&self) -> bool {
        self.areas.is_none()
    }

    /// Evaluate the filter against a reading in memory.
    pub fn matches(&self, reading: &SensorReading) -> bool {
        let area_ok = match &self.areas {
            Some(areas) => areas.binary_search(&reading.area).is_ok(),
            None => true,
        };

        area_ok && (!self.abnormal_only || reading.is_abnormal())
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref areas) = self.areas {
            let placeholders = vec!["?"; areas.len()].join(", ");
            conditions.push(format!("area IN ({})", placeholders));
            for area in areas {
                params.push(Box::new(area.clone()));
            }
        }

        if self.abnormal_only {
            let checks: Vec<String> = MetricField::ALL
                .iter()
                .map(|field| format!("{} > ?", field.column()))
                .collect();
            conditions.push(format!("({})", checks.join(" OR ")));
            for field in MetricField::ALL {
                params.push(Box::new(field.abnormal_limit()));
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }
}

/// Dimension a [`Grouping`] groups readings by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// One group per distinct area.
    Area,
    /// One group per UTC hour-of-day parsed from the timestamp.
    Hour,
    /// A single group over the whole filtered population.
    All,
}

/// Ordering applied to grouped rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Ascending by group key (area name or hour).
    #[default]
    ByKey,
    /// Descending by rounded metric, ties ascending by key.
    ByMetricDesc,
}

/// Averaging pipeline: group by [`GroupKey`], average one [`MetricField`],
/// round to 2 decimals, order, optionally limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    /// Grouping dimension.
    pub key: GroupKey,
    /// Field being averaged.
    pub field: MetricField,
    /// Row ordering.
    pub order: GroupOrder,
    /// Maximum number of rows.
    pub limit: Option<u32>,
}

impl Grouping {
    /// Average `field` per area, ordered by area.
    pub fn by_area(field: MetricField) -> Self {
        Self::new(GroupKey::Area, field)
    }

    /// Average `field` per hour-of-day, ordered by hour.
    pub fn by_hour(field: MetricField) -> Self {
        Self::new(GroupKey::Hour, field)
    }

    /// Average `field` over the whole population.
    pub fn overall(field: MetricField) -> Self {
        Self::new(GroupKey::All, field)
    }

    fn new(key: GroupKey, field: MetricField) -> Self {
        Self {
            key,
            field,
            order: GroupOrder::ByKey,
            limit: None,
        }
    }

    /// Rank rows by metric, highest first.
    pub fn ranked(mut self) -> Self {
        self.order = GroupOrder::ByMetricDesc;
        self
    }

    /// Limit the number of rows returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the aggregate SQL. Rounding, ordering and limiting happen after
    /// the rows are read, so they follow the same law for every adapter.
    ///
    /// Each row carries the group key (absent for [`GroupKey::All`]), the raw
    /// mean and the number of contributing values.
    pub(crate) fn build_sql(&self, where_clause: &str) -> String {
        let column = self.field.column();
        match self.key {
            GroupKey::Area => format!(
                "SELECT area, AVG({column}), COUNT({column}) FROM readings {where_clause} \
                 GROUP BY area HAVING COUNT({column}) > 0"
            ),
            GroupKey::Hour => format!(
                "SELECT utc_hour(timestamp) AS hour, AVG({column}), COUNT({column}) \
                 FROM readings {where_clause} \
                 GROUP BY hour HAVING hour IS NOT NULL AND COUNT({column}) > 0"
            ),
            GroupKey::All => format!(
                "SELECT AVG({column}), COUNT({column}) FROM readings {where_clause}"
            ),
        }
    }
}

/// Sorted, limited listing of full readings.
///
/// Readings are ordered by their stored timestamp string, then by sensor ID,
/// then by insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Maximum number of readings.
    pub limit: Option<u32>,
    /// Order by timestamp descending.
    pub newest_first: bool,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection {
    /// Create a chronological (oldest first), unlimited projection.
    pub fn new() -> Self {
        Self {
            limit: None,
            newest_first: false,
        }
    }

    /// Limit the number of readings returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Order by newest first.
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self, where_clause: &str) -> String {
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT {READING_COLUMNS} FROM readings {where_clause} \
             ORDER BY timestamp {order}, sensor_id {order}, id {order}"
        );

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        sql
    }
}
