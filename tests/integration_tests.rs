//! Integration tests for the Cifsift CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Simple cubic structure with one atom; shortest distance equals `a` and
/// every site has coordination number 6.
fn cubic_cif(a: f64) -> String {
    format!(
        "data_test\n\
         _chemical_formula_structural 'Po'\n\
         _cell_length_a {a}\n\
         _cell_length_b {a}\n\
         _cell_length_c {a}\n\
         _cell_angle_alpha 90\n\
         _cell_angle_beta 90\n\
         _cell_angle_gamma 90\n\
         loop_\n\
         _atom_site_label\n\
         _atom_site_fract_x\n\
         _atom_site_fract_y\n\
         _atom_site_fract_z\n\
         Po1 0 0 0\n"
    )
}

fn write_cif(dir: &Path, name: &str, a: f64) {
    fs::write(dir.join(name), cubic_cif(a)).unwrap();
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Parallel CIF filtering"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cifsift"));
}

#[test]
fn test_invalid_subcommand() {
    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_min_dist_moves_out_of_range_files() {
    let temp_dir = TempDir::new().unwrap();
    write_cif(temp_dir.path(), "short.cif", 2.0);
    write_cif(temp_dir.path(), "inside.cif", 5.0);

    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("min-dist")
        .arg(temp_dir.path())
        .args(["--min", "2.5", "--max", "12.0", "--workers", "2"])
        .assert()
        .success();

    let dest = temp_dir.path().join("dist_between_2.5_12");
    assert!(dest.join("short.cif").exists());
    assert!(temp_dir.path().join("inside.cif").exists());
    assert!(!temp_dir.path().join("short.cif").exists());

    // CSV log accounts for both files
    let log = fs::read_to_string(
        temp_dir.path().join("csv").join("filter_min_dist_log.csv"),
    )
    .unwrap();
    assert!(log.contains("short.cif"));
    assert!(log.contains("inside.cif"));
}

#[test]
fn test_min_dist_boundary_value_stays() {
    let temp_dir = TempDir::new().unwrap();
    // Shortest distance is exactly the lower bound; exclusive bounds keep it
    write_cif(temp_dir.path(), "edge.cif", 2.5);

    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("min-dist")
        .arg(temp_dir.path())
        .args(["--min", "2.5", "--max", "12.0", "--serial"])
        .assert()
        .success();

    assert!(temp_dir.path().join("edge.cif").exists());
    assert!(!temp_dir.path().join("dist_between_2.5_12").exists());
}

#[test]
fn test_min_dist_rejects_inverted_thresholds() {
    let temp_dir = TempDir::new().unwrap();
    write_cif(temp_dir.path(), "a.cif", 3.0);

    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("min-dist")
        .arg(temp_dir.path())
        .args(["--min", "12.0", "--max", "2.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("threshold"));

    // Fail-fast: nothing was touched
    assert!(temp_dir.path().join("a.cif").exists());
}

#[test]
fn test_coordination_exact_mode() {
    let temp_dir = TempDir::new().unwrap();
    write_cif(temp_dir.path(), "cubic.cif", 3.0);

    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("coordination")
        .arg(temp_dir.path())
        .args(["--numbers", "6", "--mode", "exact", "--serial"])
        .assert()
        .success();

    assert!(temp_dir.path().join("CN_exact_6").join("cubic.cif").exists());
}

#[test]
fn test_coordination_rejects_empty_numbers() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("coordination")
        .arg(temp_dir.path())
        .args(["--mode", "exact"])
        .assert()
        .failure();
}

#[test]
fn test_malformed_file_lands_in_error_group() {
    let temp_dir = TempDir::new().unwrap();
    write_cif(temp_dir.path(), "good.cif", 5.0);
    fs::write(temp_dir.path().join("broken.cif"), "not a cif at all\n").unwrap();

    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("min-dist")
        .arg(temp_dir.path())
        .args(["--min", "2.5", "--max", "12.0", "--workers", "2"])
        .assert()
        .success();

    // The failure is isolated: the good file was still processed and kept
    assert!(temp_dir.path().join("good.cif").exists());
    assert!(
        temp_dir
            .path()
            .join("cifs_encountered_error")
            .join("broken.cif")
            .exists()
    );
}

#[test]
fn test_empty_directory_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("min-dist")
        .arg(temp_dir.path())
        .args(["--min", "2.5", "--max", "12.0"])
        .assert()
        .success();

    // No destination or csv folder appears for a degenerate run
    assert!(fs::read_dir(temp_dir.path()).unwrap().next().is_none());
}

#[test]
fn test_json_summary_output() {
    let temp_dir = TempDir::new().unwrap();
    write_cif(temp_dir.path(), "a.cif", 5.0);

    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("min-dist")
        .arg(temp_dir.path())
        .args(["--min", "2.5", "--max", "12.0", "--serial", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"moved\": 0"))
        .stdout(predicate::str::contains("\"total\": 1"));
}

#[test]
fn test_info_command() {
    let temp_dir = TempDir::new().unwrap();
    write_cif(temp_dir.path(), "po.cif", 3.359);

    let mut cmd = Command::cargo_bin("cifsift").unwrap();
    cmd.arg("info")
        .arg(temp_dir.path())
        .arg("--compute-dist")
        .assert()
        .success()
        .stdout(predicate::str::contains("po.cif"));

    let log =
        fs::read_to_string(temp_dir.path().join("csv").join("info.csv")).unwrap();
    assert!(log.contains("po.cif"));
    assert!(log.contains("3.359"));
}
