//! CLI Integration Tests
//!
//! These tests run the `citysense` binary against a temporary database and
//! config file and check output formats and command behaviors.
//!
//! ```
//! cargo test --package citysense-cli --test cli_integration
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const READINGS: &str = r#"{"sensor_id":"s1","area":"City Center","timestamp":"2024-05-01T08:00","noise_db":70,"traffic_count":100,"pm25":60}
{"sensor_id":"s2","area":"City Center","timestamp":"2024-05-01T08:30","noise_db":90,"traffic_count":160,"pm25":55}
{"sensor_id":"s3","area":"City Center","timestamp":"2024-05-01T17:00","noise_db":75,"traffic_count":140,"pm25":110}
{"sensor_id":"s4","area":"Park Area","timestamp":"2024-05-01T08:15","noise_db":40,"traffic_count":20,"pm25":30}
{"sensor_id":"s5","area":"Park Area","timestamp":"2024-05-01T17:20","noise_db":45,"traffic_count":30,"pm25":35}
{"sensor_id":"s6","area":"Park Area","timestamp":"2024-05-01T17:45","noise_db":50,"traffic_count":25,"pm25":32}
"#;

/// Temporary database and config location for one test.
struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Sandbox with the six-reading fixture already imported.
    fn with_readings() -> Self {
        let sandbox = Self::new();
        let file = sandbox.path("readings.jsonl");
        std::fs::write(&file, READINGS).expect("Failed to write fixture");
        let output = sandbox.run(&["import", file.to_str().unwrap()]);
        assert!(output.status.success(), "import should succeed: {}", stderr(&output));
        sandbox
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run citysense with the sandbox database and config.
    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_citysense"))
            .args(args)
            .env("CITYSENSE_DB", self.path("readings.db"))
            .env("CITYSENSE_CONFIG", self.path("config.toml"))
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run citysense binary")
    }

    fn init_config(&self) {
        let output = self.run(&["config", "init"]);
        assert!(output.status.success(), "config init should succeed");
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = Sandbox::new().run(&["--help"]);
    assert!(output.status.success(), "Help should succeed");

    let text = stdout(&output);
    for cmd in ["dashboard", "areas", "add", "recent", "import", "config", "completions"] {
        assert!(text.contains(cmd), "Help should list {cmd}");
    }
}

#[test]
fn test_version_command() {
    let output = Sandbox::new().run(&["--version"]);
    assert!(output.status.success(), "Version should succeed");
    assert!(stdout(&output).contains("citysense"));
}

#[test]
fn test_completions() {
    let output = Sandbox::new().run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("citysense"));
}

// =============================================================================
// Dashboard
// =============================================================================

#[test]
fn test_dashboard_json_all_areas() {
    let sandbox = Sandbox::with_readings();
    sandbox.init_config();
    let output = sandbox.run(&["dashboard", "--format", "json"]);
    assert!(output.status.success(), "dashboard failed: {}", stderr(&output));

    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be pure JSON");
    assert_eq!(value["kpis"]["avg_pollution"], 53.67);
    assert_eq!(value["kpis"]["abnormal_count"], 2);
    assert_eq!(value["kpis"]["worst_pollution_area"]["area"], "City Center");
    assert_eq!(value["kpis"]["peak_traffic_hour"]["hour"], 8);
    assert_eq!(value["traffic_by_hour"].as_array().unwrap().len(), 2);
    assert_eq!(value["abnormal_readings"][0]["sensor_id"], "s2");
}

#[test]
fn test_dashboard_area_selection() {
    let sandbox = Sandbox::with_readings();
    let output = sandbox.run(&["dashboard", "--area", "Park Area", "--format", "json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["area_avg_noise"][0]["area"], "Park Area");
    assert_eq!(value["area_avg_noise"][0]["metric"], 45.0);
    assert_eq!(value["kpis"]["abnormal_count"], 0);
}

#[test]
fn test_dashboard_text_output() {
    let sandbox = Sandbox::with_readings();
    let output = sandbox.run(&["dashboard"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Noisiest area:         City Center (78.33)"));
    assert!(text.contains("  17:00     65.00"));
    assert!(text.contains("  03:00      0.00"));
}

#[test]
fn test_dashboard_uses_config_selection() {
    let sandbox = Sandbox::with_readings();
    std::fs::write(
        sandbox.path("config.toml"),
        "areas = [\"City Center\"]\nformat = \"json\"\n",
    )
    .unwrap();

    let output = sandbox.run(&["dashboard"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["area_avg_pollution"].as_array().unwrap().len(), 1);
    assert_eq!(value["area_avg_pollution"][0]["metric"], 75.0);
}

#[test]
fn test_dashboard_empty_database() {
    let output = Sandbox::new().run(&["dashboard", "--format", "json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(value["kpis"]["worst_pollution_area"].is_null());
    assert_eq!(value["kpis"]["abnormal_count"], 0);
}

// =============================================================================
// Areas, recent and import
// =============================================================================

#[test]
fn test_areas_lists_imported_areas() {
    let sandbox = Sandbox::with_readings();
    let output = sandbox.run(&["areas"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "City Center\nPark Area\n");
}

#[test]
fn test_recent_limit() {
    let sandbox = Sandbox::with_readings();
    let output = sandbox.run(&["recent", "-n", "2", "--format", "json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let ids: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["sensor_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["s6", "s5"]);
}

#[test]
fn test_import_reports_rejected_lines() {
    let sandbox = Sandbox::new();
    let file = sandbox.path("mixed.jsonl");
    std::fs::write(
        &file,
        "{\"sensor_id\":\"x\",\"area\":\"Harbor\",\"timestamp\":\"2024-05-01T08:00\"}\nnot json\n",
    )
    .unwrap();

    let output = sandbox.run(&["import", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Imported 1 readings (1 rejected)"));
    assert!(stderr(&output).contains("line 2"));
}

#[test]
fn test_import_missing_file_fails() {
    let output = Sandbox::new().run(&["import", "/nonexistent/readings.jsonl"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Failed to import"));
    assert!(err.contains("IO error"));
}

#[test]
fn test_add_reading_appears_everywhere() {
    let sandbox = Sandbox::with_readings();
    let output = sandbox.run(&[
        "add",
        "--area",
        "Harbor",
        "--sensor-id",
        "manual-1",
        "--timestamp",
        "2024-05-02T09:15:30",
        "--noise",
        "90",
        "--traffic",
        "80",
        "--pm25",
        "60",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "add failed: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["sensor_id"], "manual-1");
    assert_eq!(value["timestamp"], "2024-05-02T09:15");

    let output = sandbox.run(&["areas"]);
    assert_eq!(stdout(&output), "City Center\nHarbor\nPark Area\n");

    let output = sandbox.run(&["recent", "-n", "1", "--format", "json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value[0]["sensor_id"], "manual-1");

    let output = sandbox.run(&["dashboard", "--area", "Harbor", "--format", "json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["kpis"]["abnormal_count"], 1);
}

#[test]
fn test_add_rejects_invalid_input() {
    let sandbox = Sandbox::new();
    let base = ["add", "--traffic", "10", "--pm25", "10"];

    let output = sandbox.run(&[&base[..], &["--area", "Harbor", "--noise", "151"]].concat());
    assert!(!output.status.success());
    assert!(stderr(&output).contains("noise must be between 0 and 150"));

    let output = sandbox.run(&[&base[..], &["--area", " ", "--noise", "10"]].concat());
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Area is required"));

    let output = sandbox.run(&["areas"]);
    assert!(stdout(&output).starts_with("No areas found"));
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_config_path_and_show() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["config", "path"]);
    assert!(output.status.success());
    assert_eq!(
        Path::new(stdout(&output).trim()),
        sandbox.path("config.toml")
    );

    let output = sandbox.run(&["config", "show"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("area_cache_ttl_secs = 60"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.path("config.toml"), "recent_limit = 0\narea_cache_ttl_secs = 0\n")
        .unwrap();

    let output = sandbox.run(&["areas"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("recent_limit"));
    assert!(err.contains("area_cache_ttl_secs"));

    // init --force repairs it
    let output = sandbox.run(&["config", "init", "--force"]);
    assert!(output.status.success());
    assert!(sandbox.run(&["areas"]).status.success());
}
