use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn healthscan() -> Command {
    let mut cmd = Command::cargo_bin("healthscan").expect("binary exists");
    cmd.env_remove("RUST_LOG").env_remove("HEALTHSCAN_CHURN_FILE");
    cmd
}

fn fixtures_dir() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures")
}

fn churn_file() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/churn.json")
}

fn json_output(args: &[&str]) -> Value {
    let output = healthscan().args(args).output().expect("command runs");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

// ---------------------------------------------------------------------------
// CLI smoke tests
// ---------------------------------------------------------------------------

#[test]
fn test_help_output() {
    healthscan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("health scores"))
        .stdout(predicate::str::contains("blast-radius"))
        .stdout(predicate::str::contains("diff"));
}

#[test]
fn test_missing_subcommand_fails() {
    healthscan().assert().failure();
}

#[test]
fn test_init_prints_default_config() {
    healthscan()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("[thresholds.complexity]"))
        .stdout(predicate::str::contains("[thresholds.blast_radius]"));
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[test]
fn test_analyze_json_covers_every_file() {
    let result = json_output(&["-p", fixtures_dir(), "-f", "json", "analyze"]);

    assert_eq!(result["summary"]["total_files"], 3);
    assert_eq!(result["summary"]["total_functions"], 5);

    let paths: Vec<&str> = result["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["api/handler.go", "main.go", "worker/tasks.py"]);

    let handle = &result["files"][0]["functions"][0];
    assert_eq!(handle["name"], "Handle");
    assert_eq!(handle["cyclomatic_complexity"], 3);
    assert_eq!(handle["parameter_count"], 2);
    assert_eq!(handle["fan_in"], 1);
}

#[test]
fn test_analyze_markdown() {
    healthscan()
        .args(["-p", fixtures_dir(), "analyze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Code Health:"))
        .stdout(predicate::str::contains("## Summary"))
        .stdout(predicate::str::contains("# Health Score"));
}

#[test]
fn test_analyze_text_with_jobs() {
    healthscan()
        .args(["-p", fixtures_dir(), "-f", "text", "-j", "2", "analyze"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Health score:"));
}

#[test]
fn test_missing_path_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    healthscan()
        .args(["-p", missing.to_str().unwrap(), "analyze"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

// ---------------------------------------------------------------------------
// score
// ---------------------------------------------------------------------------

#[test]
fn test_score_without_churn_uses_neutral_churn() {
    let report = json_output(&["-p", fixtures_dir(), "-f", "json", "score"]);
    assert_eq!(report["has_churn_data"], false);
    assert_eq!(report["component_scores"]["churn"]["score"], 70.0);
    assert_eq!(report["component_scores"]["churn"]["weight"], 0.0);
    let score = report["overall_score"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&score));
}

#[test]
fn test_score_with_churn_file() {
    let report = json_output(&[
        "-p",
        fixtures_dir(),
        "-f",
        "json",
        "--churn",
        churn_file(),
        "score",
    ]);
    assert_eq!(report["has_churn_data"], true);
    assert_eq!(report["component_scores"]["churn"]["weight"], 0.2);
}

#[test]
fn test_churn_load_logged_once() {
    let output = healthscan()
        .env("RUST_LOG", "healthscan=debug")
        .args(["-p", fixtures_dir(), "--churn", churn_file(), "score"])
        .output()
        .expect("command runs");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Loaded churn for 2 files").count(), 1, "{stderr}");
}

#[test]
fn test_missing_churn_file_fails() {
    healthscan()
        .args(["-p", fixtures_dir(), "--churn", "/nonexistent/churn.json", "score"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_score_fail_under() {
    healthscan()
        .args(["-p", fixtures_dir(), "score", "--fail-under", "101"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("# Health Score"))
        .stderr(predicate::str::contains("Threshold violation"));

    healthscan()
        .args(["-p", fixtures_dir(), "score", "--fail-under", "0"])
        .assert()
        .success();
}

#[test]
fn test_fail_under_from_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("strict.toml");
    std::fs::write(&config, "[score]\nfail_under = 100.5\n").unwrap();

    healthscan()
        .args(["-p", fixtures_dir(), "-c", config.to_str().unwrap(), "score"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("below the required 100.5"));
}

#[test]
fn test_missing_config_file_fails() {
    healthscan()
        .args(["-p", fixtures_dir(), "-c", "/nonexistent/healthscan.toml", "score"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_empty_directory_scores_perfect() {
    let dir = TempDir::new().unwrap();
    let report = json_output(&["-p", dir.path().to_str().unwrap(), "-f", "json", "score"]);
    assert_eq!(report["overall_score"], 100.0);
    assert_eq!(report["overall_grade"], "A");
    assert_eq!(report["concerns"][0]["type"], "empty_codebase");
    assert_eq!(report["concerns"][0]["severity"], "info");
}

// ---------------------------------------------------------------------------
// concerns, folders, owners, blast radius
// ---------------------------------------------------------------------------

#[test]
fn test_concerns_flags_nested_python() {
    let concerns = json_output(&["-p", fixtures_dir(), "-f", "json", "concerns"]);
    let kinds: Vec<&str> = concerns
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["type"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"deep_nesting"), "got {kinds:?}");
    assert!(kinds.contains(&"too_many_parameters"), "got {kinds:?}");

    let nesting = concerns
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["type"] == "deep_nesting")
        .unwrap();
    assert_eq!(nesting["severity"], "info");
    assert_eq!(nesting["affected_items"][0]["function_name"], "process");
    assert_eq!(nesting["affected_items"][0]["metrics"]["nesting_depth"], 6);
}

#[test]
fn test_folders_json() {
    let folders = json_output(&["-p", fixtures_dir(), "-f", "json", "folders"]);
    let keys: Vec<&String> = folders.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec![".", "api", "worker"]);
    assert_eq!(folders["api"]["total_functions"], 2);
}

#[test]
fn test_owners_from_repository_config() {
    let owners = json_output(&["-p", fixtures_dir(), "-f", "json", "owners"]);
    let names: Vec<&str> = owners
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["owner"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"@api-team"));
    assert!(names.contains(&"@platform"));
}

#[test]
fn test_blast_radius_below_threshold_is_empty() {
    healthscan()
        .args([
            "-p",
            fixtures_dir(),
            "-f",
            "json",
            "blast-radius",
            "--function",
            "Handle",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn test_blast_radius_with_lowered_threshold() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("healthscan.toml");
    std::fs::write(&config, "[thresholds.blast_radius]\nwarning = 0\ncritical = 1\n").unwrap();

    let concerns = json_output(&[
        "-p",
        fixtures_dir(),
        "-c",
        config.to_str().unwrap(),
        "-f",
        "json",
        "blast-radius",
        "-n",
        "Parse",
    ]);
    assert_eq!(concerns[0]["type"], "blast_radius");
    assert_eq!(concerns[0]["affected_items"][0]["function_name"], "Parse");
    assert_eq!(concerns[0]["affected_items"][0]["metrics"]["approximate"], true);
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

/// Saves `analyze -f json` output for the fixtures, optionally with churn.
fn save_analysis(dir: &TempDir, name: &str, with_churn: bool) -> String {
    let mut args = vec!["-p", fixtures_dir(), "-f", "json"];
    if with_churn {
        args.extend(["--churn", churn_file()]);
    }
    args.push("analyze");
    let output = healthscan().args(&args).output().expect("command runs");
    assert!(output.status.success());

    let path = dir.path().join(name);
    std::fs::write(&path, &output.stdout).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_diff_of_identical_runs_is_flat() {
    let dir = TempDir::new().unwrap();
    let run = save_analysis(&dir, "run.json", false);

    let diff = json_output(&["-f", "json", "diff", &run, &run]);
    assert_eq!(diff["metrics"]["score"], 0.0);
    assert_eq!(diff["metrics"]["function_count"], 0);
    assert_eq!(diff["metrics"]["file_count"], 0);
    assert_eq!(diff["metrics"]["churn"], 0);

    let owners = diff["owners"].as_array().unwrap();
    assert_eq!(owners.len(), 2);
    for owner in owners {
        assert_eq!(owner["status"], "changed");
        assert_eq!(owner["health_score"], 0.0);
    }
}

#[test]
fn test_diff_reports_churn_added() {
    let dir = TempDir::new().unwrap();
    let before = save_analysis(&dir, "before.json", false);
    let after = save_analysis(&dir, "after.json", true);

    let diff = json_output(&["-f", "json", "diff", &before, &after]);
    assert!(diff["metrics"]["churn"].as_i64().unwrap() > 0);
    assert_eq!(diff["metrics"]["function_count"], 0);

    healthscan()
        .args(["diff", &before, &after])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Health Diff"))
        .stdout(predicate::str::contains("| Churn | +"))
        .stdout(predicate::str::contains("@api-team"));
}

#[test]
fn test_diff_rejects_non_analysis_json() {
    let dir = TempDir::new().unwrap();
    let run = save_analysis(&dir, "run.json", false);
    let score = dir.path().join("score.json");
    std::fs::write(&score, "{\"overall_score\": 90.0}").unwrap();

    healthscan()
        .args(["diff", &run, score.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"))
        .stderr(predicate::str::contains("is not a saved analysis"));

    healthscan()
        .args(["diff", &run, "/nonexistent/run.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}
