use std::fs;
use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, NamedTempFile};

#[test]
fn test_help_works() {
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--growth"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_bad_output_fails() {
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.arg("--output")
        .arg("term,svg")
        .write_stdin("users 10\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("svg"));
}

#[test]
fn test_bad_grouping_fails() {
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.arg("--growth")
        .arg("--group-by")
        .arg("hour")
        .write_stdin("2021-04-15\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("hour"));
}

#[test]
fn test_no_data() {
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.arg("--color")
        .arg("no")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No data to process"));
}

#[test]
fn test_missing_input_fails() {
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.arg("--color")
        .arg("no")
        .arg("/nonexistent/tablecharts/sizes")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("[ERROR]"))
        .stderr(predicate::str::contains("/nonexistent/tablecharts/sizes"));
}

#[test]
fn test_sizes_in_terminal() {
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.arg("--color")
        .arg("no")
        .arg("--cutoff")
        .arg("2")
        .arg("--title")
        .arg("Biggest tables")
        .write_stdin("users 5000000\norders 3000000\nlogs 1500\nsessions 500\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Biggest tables"))
        .stdout(predicate::str::contains("users (5.0 MB)"))
        .stdout(predicate::str::contains("Other (2.0 kB)"))
        .stdout(predicate::str::ends_with("\n\n\n"));
}

#[test]
fn test_growth_in_terminal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.txt");
    let mut file = fs::File::create(&path).unwrap();
    for day in 1..=20 {
        writeln!(file, "2021-03-{:02} {}", day, day * 10).unwrap();
    }
    writeln!(file, "garbage").unwrap();
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.arg("--color")
        .arg("no")
        .arg("--verbose")
        .arg("--growth")
        .arg("--since")
        .arg("2021-03-01")
        .arg(path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("users"))
        .stdout(predicate::str::contains("Linear Regression"))
        .stdout(predicate::str::contains("Moving Average"))
        .stderr(predicate::str::contains("[DEBUG] Cannot parse a timestamp"));
}

#[test]
fn test_growth_in_terminal_and_png() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("orders.txt");
    let mut file = fs::File::create(&path).unwrap();
    for day in 1..=12 {
        writeln!(file, "2021-05-{:02}", day).unwrap();
    }
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.current_dir(dir.path())
        .arg("--color")
        .arg("no")
        .arg("--growth")
        .arg("--extrapolation")
        .arg("-o")
        .arg("term,png")
        .arg(path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("orders"))
        .stdout(predicate::str::contains("Linear Regression"))
        .stderr(predicate::str::contains("[ERROR]").not());
    let images: Vec<_> = fs::read_dir(dir.path().join("data"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(images.len(), 1);
    assert!(images[0].starts_with("orders-time-chart-"));
}

#[test]
fn test_crowded_pie_in_terminal() {
    let input: String = (0..30)
        .map(|i| format!("table_{:02} {}\n", i, 1_000_000 * (40 - i)))
        .collect();
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.arg("--color")
        .arg("no")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("table_00 (40 MB)"))
        .stdout(predicate::str::contains("table_19 (21 MB)"))
        .stdout(predicate::str::contains("Other (155 MB)"));
}

#[test]
fn test_growth_without_derived_series() {
    let mut file = NamedTempFile::new().unwrap();
    for day in 1..=9 {
        writeln!(file, "2021-03-0{}", day).unwrap();
    }
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.arg("--color")
        .arg("no")
        .arg("--growth")
        .arg("--no-trendline")
        .arg("--no-moving-average")
        .arg(file.path().to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Linear Regression").not())
        .stdout(predicate::str::contains("Moving Average").not());
}

#[test]
fn test_png_output() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.current_dir(dir.path())
        .arg("--output")
        .arg("PNG")
        .write_stdin("users 5000000\norders 3000000\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let images: Vec<_> = fs::read_dir(dir.path().join("data"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(images.len(), 1);
    assert!(images[0].starts_with("table-sizes-pie-chart-"));
    assert!(images[0].ends_with(".png"));
}

#[test]
fn test_both_outputs() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("tablecharts").unwrap();
    cmd.current_dir(dir.path())
        .arg("--color")
        .arg("no")
        .arg("-o")
        .arg("term,png")
        .write_stdin("users 5000000\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Table sizes"));
    assert_eq!(fs::read_dir(dir.path().join("data")).unwrap().count(), 1);
}
