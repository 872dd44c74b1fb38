//! End-to-end runs of the `shoreline-segments` binary

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const TRANSECTS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "name": "T1" },
      "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [0.0, 100.0]] } },
    { "type": "Feature", "properties": { "name": "T2" },
      "geometry": { "type": "LineString", "coordinates": [[10.0, 0.0], [10.0, 100.0]] } },
    { "type": "Feature", "properties": { "name": "T3" },
      "geometry": { "type": "LineString", "coordinates": [[20.0, 0.0], [20.0, 100.0]] } }
  ]
}"#;

fn run_binary<S: AsRef<OsStr>>(args: &[S]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shoreline-segments"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn write_inputs(dir: &Path, intersects: &str) -> (PathBuf, PathBuf, PathBuf) {
    let transects_path = dir.join("transects.geojson");
    let intersects_path = dir.join("intersects.csv");
    std::fs::write(&transects_path, TRANSECTS).unwrap();
    std::fs::write(&intersects_path, intersects).unwrap();
    (transects_path, intersects_path, dir.join("shorelines.geojson"))
}

#[test]
fn test_successful_run_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let (transects, intersects, output) = write_inputs(
        dir.path(),
        "dates,intersect T1,intersect T2,intersect T3\n2020-01-01,10.0,20.0,30.0\n",
    );

    let result = run_binary(&[&transects, &intersects, &output]);

    assert!(result.status.success());
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("2020-01-01"));
}

#[test]
fn test_missing_input_reports_error_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (transects, _, output) = write_inputs(dir.path(), "dates\n");
    let missing = dir.path().join("absent.csv");

    let result = run_binary(&[&transects, &missing, &output]);

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("error: cant find file"), "stderr was: {stderr}");
    assert!(stderr.contains("absent.csv"), "stderr was: {stderr}");
    assert!(!output.exists());
}

#[test]
fn test_unknown_transect_reports_error_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (transects, intersects, output) = write_inputs(
        dir.path(),
        "dates,intersect T1,intersect T9\n2020-01-01,10.0,20.0\n",
    );

    let result = run_binary(&[&transects, &intersects, &output]);

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("error: Unknown transect 'T9' referenced by column 'intersect T9'"),
        "stderr was: {stderr}"
    );
    assert!(!output.exists());
}

#[test]
fn test_wrong_output_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (transects, intersects, _) = write_inputs(dir.path(), "dates,intersect T1\n");
    let output = dir.path().join("shorelines.json");

    let result = run_binary(&[&transects, &intersects, &output]);

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("wrong extension"), "stderr was: {stderr}");
}
