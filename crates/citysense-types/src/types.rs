//! Core types for city sensor data.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseResult;

/// Noise level (dB) above which a reading is abnormal.
pub const NOISE_DB_LIMIT: i64 = 85;

/// Traffic count above which a reading is abnormal.
pub const TRAFFIC_COUNT_LIMIT: i64 = 150;

/// PM2.5 concentration (µg/m³) above which a reading is abnormal.
pub const PM25_LIMIT: i64 = 100;

/// One timestamped observation from a sensor in an area.
///
/// Numeric fields are optional: a reading missing a value does not
/// contribute to that field's average and never trips that field's
/// threshold, but still takes part in every other aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorReading {
    /// Opaque sensor identifier.
    pub sensor_id: String,
    /// Area label (case-sensitive).
    pub area: String,
    /// ISO-8601 timestamp as stored.
    pub timestamp: String,
    /// Sound pressure level in decibels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub noise_db: Option<i64>,
    /// Vehicle/pedestrian count over the reading interval.
    #[cfg_attr(feature = "serde", serde(default))]
    pub traffic_count: Option<i64>,
    /// Particulate concentration in µg/m³.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pm25: Option<i64>,
}

impl SensorReading {
    /// Create a reading with all three measurements present.
    pub fn new(
        sensor_id: impl Into<String>,
        area: impl Into<String>,
        timestamp: impl Into<String>,
        noise_db: i64,
        traffic_count: i64,
        pm25: i64,
    ) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            area: area.into(),
            timestamp: timestamp.into(),
            noise_db: Some(noise_db),
            traffic_count: Some(traffic_count),
            pm25: Some(pm25),
        }
    }

    /// Value of the given measurement, if present.
    #[must_use]
    pub fn value(&self, field: MetricField) -> Option<i64> {
        match field {
            MetricField::NoiseDb => self.noise_db,
            MetricField::TrafficCount => self.traffic_count,
            MetricField::Pm25 => self.pm25,
        }
    }

    /// UTC hour-of-day of this reading.
    pub fn hour(&self) -> ParseResult<u8> {
        crate::timestamp::hour_of_day(&self.timestamp)
    }

    /// Measurements that exceed their abnormal threshold.
    #[must_use]
    pub fn exceeded_fields(&self) -> Vec<MetricField> {
        MetricField::ALL
            .into_iter()
            .filter(|field| field.exceeds(self.value(*field)))
            .collect()
    }

    /// Whether any single measurement exceeds its threshold.
    ///
    /// ```
    /// use citysense_types::SensorReading;
    ///
    /// let spike = SensorReading::new("s-1", "Market Area", "2024-05-01T08:00", 10, 10, 101);
    /// assert!(spike.is_abnormal());
    ///
    /// let calm = SensorReading::new("s-2", "Market Area", "2024-05-01T08:00", 85, 150, 100);
    /// assert!(!calm.is_abnormal());
    /// ```
    #[must_use]
    pub fn is_abnormal(&self) -> bool {
        MetricField::ALL
            .into_iter()
            .any(|field| field.exceeds(self.value(field)))
    }
}

/// Numeric measurement carried by a [`SensorReading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MetricField {
    /// `noise_db`
    NoiseDb,
    /// `traffic_count`
    TrafficCount,
    /// `pm25`
    Pm25,
}

impl MetricField {
    /// Every measurement, in storage column order.
    pub const ALL: [MetricField; 3] = [
        MetricField::NoiseDb,
        MetricField::TrafficCount,
        MetricField::Pm25,
    ];

    /// Storage column / record field name.
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            MetricField::NoiseDb => "noise_db",
            MetricField::TrafficCount => "traffic_count",
            MetricField::Pm25 => "pm25",
        }
    }

    /// Fixed abnormal threshold. A value must be strictly greater to count.
    #[must_use]
    pub fn abnormal_limit(&self) -> i64 {
        match self {
            MetricField::NoiseDb => NOISE_DB_LIMIT,
            MetricField::TrafficCount => TRAFFIC_COUNT_LIMIT,
            MetricField::Pm25 => PM25_LIMIT,
        }
    }

    /// Whether a (possibly missing) value is above the threshold.
    #[must_use]
    pub fn exceeds(&self, value: Option<i64>) -> bool {
        value.is_some_and(|v| v > self.abnormal_limit())
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricField::NoiseDb => write!(f, "Noise (dB)"),
            MetricField::TrafficCount => write!(f, "Traffic Count"),
            MetricField::Pm25 => write!(f, "PM2.5"),
        }
    }
}

/// Area-keyed aggregation row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AreaMetric {
    /// Area label.
    pub area: String,
    /// Mean value, rounded to 2 decimal places.
    pub metric: f64,
}

impl AreaMetric {
    /// Create an area row.
    pub fn new(area: impl Into<String>, metric: f64) -> Self {
        Self {
            area: area.into(),
            metric,
        }
    }
}

/// Hour-keyed aggregation row.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HourMetric {
    /// UTC hour of day, 0-23.
    pub hour: u8,
    /// Mean value, rounded to 2 decimal places.
    pub metric: f64,
}

impl HourMetric {
    /// Create an hour row.
    pub fn new(hour: u8, metric: f64) -> Self {
        Self { hour, metric }
    }
}

impl fmt::Display for HourMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00 ({})", self.hour, self.metric)
    }
}
