use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("data")
}

fn audit() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kpi-audit"));
    for var in [
        "KPI_AUDIT_INPUT",
        "KPI_AUDIT_TOP_N",
        "KPI_AUDIT_DEPARTMENT",
        "KPI_AUDIT_FORMAT",
        "KPI_AUDIT_BACKEND",
        "KPI_AUDIT_DB",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn unique(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("{prefix}-{nanos}"))
}

#[test]
fn json_report_for_sample_inventory() {
    let output = audit()
        .env("KPI_AUDIT_INPUT", data_dir().join("sample_kpis.csv"))
        .output()
        .expect("run kpi-audit");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: Value = serde_json::from_slice(&output.stdout).expect("parse report");
    assert_eq!(report["summary"]["total_metrics"], 14);
    assert_eq!(report["removal_candidates"].as_array().map(Vec::len), Some(5));
    assert_eq!(
        report["removal_candidates"][0]["Metric_Name"],
        "Number of Calls Made"
    );
    assert_eq!(report["top_metrics"]["HR"][0]["Metric_Name"], "Employee Engagement Score");
    assert_eq!(report["top_metrics"]["Sales"].as_array().map(Vec::len), Some(3));
}

#[test]
fn text_report_with_department_filter_and_top_n() {
    let output = audit()
        .arg(data_dir().join("sample_kpis.csv"))
        .env("KPI_AUDIT_FORMAT", "text")
        .env("KPI_AUDIT_DEPARTMENT", "Operations")
        .env("KPI_AUDIT_TOP_N", "1")
        .output()
        .expect("run kpi-audit");
    assert!(output.status.success());

    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("metrics:              3"));
    assert!(text.contains("  Operations\n    Uptime"));
    assert!(!text.contains("Mean Time To Resolve"));
    assert!(text.contains("Operations / Tickets Closed: vanity 6"));
    assert!(!text.contains("Marketing"));
}

#[test]
fn json_backend_persists_classified_rows() {
    let db = unique("kpi-audit-cli-db").join("audit.json");
    let output = audit()
        .env("KPI_AUDIT_INPUT", data_dir().join("sample_kpis.csv"))
        .env("KPI_AUDIT_BACKEND", "json")
        .env("KPI_AUDIT_DB", &db)
        .output()
        .expect("run kpi-audit");
    assert!(output.status.success());

    let stored: Value = serde_json::from_slice(&fs::read(&db).expect("read db")).expect("db json");
    let metrics = stored["metrics"].as_array().expect("metrics array");
    assert_eq!(metrics.len(), 14);
    assert_eq!(metrics[0]["id"], "kpi-1");
    assert_eq!(metrics[0]["vanity_score"], 10);

    if let Some(dir) = db.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn filtered_run_keeps_every_stored_department() {
    let db = unique("kpi-audit-cli-filter").join("audit.json");
    let stored_rows = |departments: Option<&str>| {
        let mut cmd = audit();
        cmd.env("KPI_AUDIT_INPUT", data_dir().join("sample_kpis.csv"))
            .env("KPI_AUDIT_BACKEND", "json")
            .env("KPI_AUDIT_DB", &db);
        if let Some(departments) = departments {
            cmd.env("KPI_AUDIT_DEPARTMENT", departments);
        }
        let output = cmd.output().expect("run kpi-audit");
        assert!(output.status.success());
        let report: Value = serde_json::from_slice(&output.stdout).expect("parse report");
        let stored: Value =
            serde_json::from_slice(&fs::read(&db).expect("read db")).expect("db json");
        (
            report["metrics"].as_array().map_or(0, Vec::len),
            stored["metrics"].as_array().map_or(0, Vec::len),
        )
    };

    assert_eq!(stored_rows(None), (14, 14));
    assert_eq!(stored_rows(Some("Operations")), (3, 14));

    if let Some(dir) = db.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn memory_backend_is_a_dry_run() {
    let output = audit()
        .env("KPI_AUDIT_INPUT", data_dir().join("sample_kpis.csv"))
        .env("KPI_AUDIT_BACKEND", "memory")
        .env("RUST_LOG", "info")
        .output()
        .expect("run kpi-audit");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("audit persisted"), "stderr: {stderr}");
    assert!(stderr.contains("\"backend\":\"memory\""), "stderr: {stderr}");
}

#[test]
fn missing_column_fails_whole_batch() {
    let csv = unique("kpi-audit-bad").with_extension("csv");
    fs::write(&csv, "Department,Metric_Name\nSales,Leads\n").expect("write csv");

    let output = audit().arg(&csv).output().expect("run kpi-audit");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Visible_in_Dashboard"), "stderr: {stderr}");

    let _ = fs::remove_file(csv);
}

#[test]
fn missing_input_is_a_config_error() {
    let output = audit().output().expect("run kpi-audit");
    assert_eq!(output.status.code(), Some(2));
}
