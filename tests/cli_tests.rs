use regex::Regex;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    data_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_path = dir.path().join("regions.csv");

        let mut data = File::create(&data_path).unwrap();
        writeln!(
            data,
            "zip,city,state,population,density,business_count,adjusted_gross_income,total_income_amount"
        )
        .unwrap();
        writeln!(data, "60000,Reference,AA,1000,500.0,12,60000,40000000").unwrap();
        writeln!(data, "50000,Halfway,BB,2000,250.0,30,50000,60000000").unwrap();
        writeln!(data, "2134,Allston,MA,24582,9012.5,410,52000,1100000000").unwrap();
        writeln!(data, "98101,Seattle,WA,13400,20154.7,2380,0,1410000000").unwrap();

        Self { dir, data_path }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_muse-score"))
            .args(args)
            .arg("--data")
            .arg(&self.data_path)
            .output()
            .expect("Failed to execute binary")
    }
}

#[test]
fn test_cli_score_table() {
    let ctx = TestContext::new();
    let out = ctx.run(&["score", "--income", "120000", "--zip", "60000"]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let row = Regex::new(r"\|\s*60000\s*\|\s*continuous\s*\|\s*2\.000\s*\|\s*(\d+)\s*\|\s*([A-Za-z ]+?)\s*\|")
        .unwrap();
    let caps = row
        .captures(&stdout)
        .unwrap_or_else(|| panic!("score row not found in:\n{}", stdout));
    assert_eq!(&caps[1], "800");
    assert_eq!(&caps[2], "Excellent");
}

#[test]
fn test_cli_score_json_stepped() {
    let ctx = TestContext::new();
    let out = ctx.run(&[
        "score", "--income", "45000", "--zip", "50000", "--mode", "stepped", "--json",
    ]);
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(json["score"], 580);
    assert_eq!(json["tier"], "At Risk");
    assert_eq!(json["region"]["city"], "Halfway");
}

#[test]
fn test_cli_score_composite_shows_breakdown() {
    let ctx = TestContext::new();
    let weights = ctx.dir.path().join("weights.json");
    fs::write(&weights, r#"{ "weight_income": 1.0, "weight_cost_of_living": 0.0, "weight_density": 0.0, "weight_housing": 0.0 }"#)
        .unwrap();

    let out = ctx.run(&[
        "score",
        "--income",
        "60000",
        "--zip",
        "60000",
        "--mode",
        "composite",
        "--json",
        "--weights",
        weights.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["score"], 850);
    assert_eq!(json["breakdown"]["incomeScore"], 1.0);
}

#[test]
fn test_cli_leading_zero_zip() {
    let ctx = TestContext::new();
    let out = ctx.run(&["score", "--income", "52000", "--zip", "02134", "--json"]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["region"]["regionId"], "02134");
    assert_eq!(json["score"], 500);
}

#[test]
fn test_cli_unknown_region_exits_2() {
    let ctx = TestContext::new();
    let out = ctx.run(&["score", "--income", "50000", "--zip", "99999"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("99999"));
}

#[test]
fn test_cli_invalid_reference_income_exits_2() {
    let ctx = TestContext::new();
    let out = ctx.run(&["score", "--income", "50000", "--zip", "98101"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_cli_missing_data_exits_1() {
    let out = Command::new(env!("CARGO_BIN_EXE_muse-score"))
        .args(["score", "--income", "1", "--zip", "60000", "--data", "nope/missing.csv"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_cli_batch_writes_csv() {
    let ctx = TestContext::new();
    let input = ctx.dir.path().join("requests.csv");
    let output = ctx.dir.path().join("results.csv");
    fs::write(&input, "income,zip\n120000,60000\n45000,50000\n1000,99999\n").unwrap();

    let out = ctx.run(&[
        "batch",
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);
    assert!(out.status.success());

    let mut rdr = csv::Reader::from_path(&output).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["region_id", "income", "score", "tier", "ratio", "error"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][2], "800");
    assert_eq!(&rows[0][3], "Excellent");
    assert_eq!(&rows[1][2], "470");
    assert_eq!(&rows[2][2], "");
    assert!(rows[2][5].contains("not found"));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Rejected"));
}

#[test]
fn test_cli_batch_blank_income_rejects_only_that_row() {
    let ctx = TestContext::new();
    let input = ctx.dir.path().join("requests.csv");
    let output = ctx.dir.path().join("results.csv");
    fs::write(&input, "income,region_id\n120000,60000\n,60000\nabc,50000\n45000,50000\n").unwrap();

    let out = ctx.run(&[
        "batch",
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let mut rdr = csv::Reader::from_path(&output).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[0][2], "800");
    assert_eq!(&rows[1][0], "60000");
    assert_eq!(&rows[1][2], "");
    assert!(rows[1][5].contains("not a number"));
    assert!(rows[2][5].contains("abc"));
    assert_eq!(&rows[3][2], "470");
}

#[test]
fn test_cli_stats() {
    let ctx = TestContext::new();
    let out = ctx.run(&["stats", "--top", "2"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Unusable Income"));
    assert!(stdout.contains("Reference"));
    assert!(stdout.contains("Allston"));
    assert!(!stdout.contains("Halfway"), "top 2 should exclude the third-highest region");
}
