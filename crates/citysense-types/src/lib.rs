//! Shared types for city environmental sensor readings.
//!
//! This crate holds the data model used by the store adapters
//! (citysense-store) and the analytics engine (citysense-core).
//!
//! # Features
//!
//! - [`SensorReading`] with optional noise, traffic and PM2.5 values
//! - Fixed abnormal thresholds and the OR-of-thresholds predicate
//! - UTC hour-of-day extraction from stored ISO-8601 timestamps
//! - The 2-decimal, ties-to-even rounding law used by every metric
//!
//! # Example
//!
//! ```
//! use citysense_types::{MetricField, SensorReading, round2};
//!
//! let reading = SensorReading::new("s-1", "City Center", "2024-05-01T08:15", 90, 40, 30);
//! assert_eq!(reading.exceeded_fields(), vec![MetricField::NoiseDb]);
//! assert_eq!(reading.hour().unwrap(), 8);
//! assert_eq!(round2(70.0 / 3.0), 23.33);
//! ```

pub mod error;
pub mod round;
pub mod timestamp;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use round::{METRIC_DECIMALS, round2};
pub use timestamp::{hour_of_day, parse_timestamp};
pub use types::{
    AreaMetric, HourMetric, MetricField, NOISE_DB_LIMIT, PM25_LIMIT, SensorReading,
    TRAFFIC_COUNT_LIMIT,
};
