//! Output formatting for text and JSON output.

use std::fmt::Write as _;

use anyhow::Result;
use citysense_core::DashboardSnapshot;
use citysense_types::{AreaMetric, MetricField, SensorReading};
use serde::Serialize;

/// Serialize any value as pretty-printed JSON.
pub fn as_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

fn metric(value: f64) -> String {
    format!("{value:.2}")
}

fn optional_metric(value: Option<f64>) -> String {
    value.map(metric).unwrap_or_else(|| "-".to_string())
}

fn optional_area(value: Option<&AreaMetric>) -> String {
    value
        .map(|a| format!("{} ({})", a.area, metric(a.metric)))
        .unwrap_or_else(|| "-".to_string())
}

/// A measurement cell; values over their abnormal threshold get a `*`.
fn measurement(reading: &SensorReading, field: MetricField, exceeded: &[MetricField]) -> String {
    match reading.value(field) {
        Some(v) if exceeded.contains(&field) => format!("{v}*"),
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

fn area_section(out: &mut String, title: &str, rows: &[AreaMetric]) {
    let _ = writeln!(out, "{title}");
    if rows.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return;
    }
    let width = rows.iter().map(|r| r.area.len()).max().unwrap_or(0);
    for row in rows {
        let _ = writeln!(out, "  {:<width$}  {:>8}", row.area, metric(row.metric));
    }
}

/// Render readings as an aligned table.
pub fn format_readings_text(readings: &[SensorReading]) -> String {
    if readings.is_empty() {
        return "  (no readings)\n".to_string();
    }

    let headers = ["TIMESTAMP", "SENSOR", "AREA", "NOISE_DB", "TRAFFIC", "PM25"];
    let rows: Vec<[String; 6]> = readings
        .iter()
        .map(|r| {
            let exceeded = r.exceeded_fields();
            [
                r.timestamp.clone(),
                r.sensor_id.clone(),
                r.area.clone(),
                measurement(r, MetricField::NoiseDb, &exceeded),
                measurement(r, MetricField::TrafficCount, &exceeded),
                measurement(r, MetricField::Pm25, &exceeded),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, cells: [&str; 6]| {
        let text = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "  {}", text.trim_end());
    };

    line(&mut out, headers);
    for row in &rows {
        line(&mut out, row.each_ref().map(String::as_str));
    }
    out
}

/// Render a full dashboard refresh.
///
/// Hourly traffic is shown for all 24 hours; hours without readings are
/// shown as 0.00.
pub fn format_dashboard_text(snapshot: &DashboardSnapshot) -> String {
    let kpis = &snapshot.kpis;
    let mut out = String::new();

    let _ = writeln!(out, "KPIs");
    let _ = writeln!(out, "  Average PM2.5:         {}", optional_metric(kpis.avg_pollution));
    let _ = writeln!(
        out,
        "  Worst pollution area:  {}",
        optional_area(kpis.worst_pollution_area.as_ref())
    );
    let _ = writeln!(
        out,
        "  Peak traffic hour:     {}",
        kpis.peak_traffic_hour
            .map(|h| format!("{:02}:00 ({})", h.hour, metric(h.metric)))
            .unwrap_or_else(|| "-".to_string())
    );
    let _ = writeln!(
        out,
        "  Noisiest area:         {}",
        optional_area(kpis.noisiest_area.as_ref())
    );
    let _ = writeln!(out, "  Abnormal readings:     {}", kpis.abnormal_count);
    out.push('\n');

    area_section(&mut out, "Average PM2.5 by area", &snapshot.area_avg_pollution);
    out.push('\n');

    let _ = writeln!(out, "Average traffic by hour (UTC)");
    if snapshot.traffic_by_hour.is_empty() {
        let _ = writeln!(out, "  (no data)");
    } else {
        for row in snapshot.traffic_by_hour_filled() {
            let _ = writeln!(out, "  {:02}:00  {:>8}", row.hour, metric(row.metric));
        }
    }
    out.push('\n');

    area_section(&mut out, "Average noise (dB) by area", &snapshot.area_avg_noise);
    out.push('\n');

    let listed = snapshot.abnormal_readings.len() as u64;
    if listed < kpis.abnormal_count {
        let _ = writeln!(
            out,
            "Abnormal readings (earliest {listed} of {})",
            kpis.abnormal_count
        );
    } else {
        let _ = writeln!(out, "Abnormal readings");
    }
    out.push_str(&format_readings_text(&snapshot.abnormal_readings));

    out
}

/// Render an area list, one per line.
pub fn format_areas_text(areas: &[String]) -> String {
    if areas.is_empty() {
        return "No areas found. Import readings with 'citysense import FILE'.\n".to_string();
    }
    areas.iter().map(|area| format!("{area}\n")).collect()
}
