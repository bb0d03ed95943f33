//! Aggregation and anomaly engine for city sensor dashboards.
//!
//! Every operation takes a [`RecordStore`](citysense_store::RecordStore)
//! handle and a [`ReadingFilter`] explicitly. Nothing is cached between
//! calls except the distinct-area list held by [`AreaCache`].
//!
//! # Features
//!
//! - **Aggregations**: mean PM2.5 and noise per area, mean traffic per UTC hour
//! - **Anomalies**: readings exceeding any fixed threshold, listed earliest first
//! - **KPIs**: global pollution, worst area, peak hour, noisiest area, abnormal count
//! - **Refresh**: one call producing a complete [`DashboardSnapshot`]
//!
//! # Example
//!
//! ```
//! use citysense_core::{AreaCache, compose_filter, refresh};
//! use citysense_store::MemoryStore;
//! use citysense_types::SensorReading;
//!
//! let store = MemoryStore::from_readings(vec![
//!     SensorReading::new("s-1", "Park Area", "2024-05-01T07:00", 42, 12, 18),
//!     SensorReading::new("s-2", "Industrial Zone", "2024-05-01T07:30", 88, 60, 110),
//! ]);
//!
//! let cache = AreaCache::default();
//! let areas = cache.areas(&store)?;
//!
//! // The UI defaults its selection to every area.
//! let snapshot = refresh(&store, &compose_filter(&areas))?;
//! assert_eq!(snapshot.kpis.worst_pollution_area.unwrap().area, "Industrial Zone");
//! assert_eq!(snapshot.kpis.abnormal_count, 1);
//! # Ok::<(), citysense_core::Error>(())
//! ```

pub mod aggregations;
pub mod cache;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod kpi;

pub use aggregations::{
    ABNORMAL_DISPLAY_LIMIT, DEFAULT_RECENT_LIMIT, abnormal_readings, area_avg_noise,
    area_avg_pollution, recent_readings, traffic_by_hour,
};
pub use cache::{AreaCache, DEFAULT_AREA_TTL};
pub use dashboard::{DashboardSnapshot, refresh};
pub use error::{Error, Result};
pub use filter::compose_filter;
pub use kpi::{
    Kpis, abnormal_count, derive_kpis, global_avg_pollution, noisiest_area, peak_traffic_hour,
    worst_pollution_area,
};

pub use citysense_store::ReadingFilter;
