//! Integration tests for tagloc CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::{tempdir, TempDir};

fn run_tagloc(args: &[&str]) -> (String, String, bool) {
    let mut cmd_args = vec!["run", "-q", "-p", "tagloc", "--"];
    cmd_args.extend(args);

    let output = Command::new("cargo")
        .args(&cmd_args)
        .current_dir(env!("CARGO_MANIFEST_DIR").to_string() + "/..")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn git(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args([
            "-c",
            "user.name=tagloc",
            "-c",
            "user.email=tagloc@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Repository with one tag, `baseline`: README.md (3 lines), main.go (10 lines).
fn baseline_repo() -> Option<TempDir> {
    let dir = tempdir().unwrap();
    let root = dir.path();
    if !git(root, &["init", "-q"]) {
        return None;
    }
    fs::write(root.join("README.md"), "one\ntwo\nthree").unwrap();
    fs::write(root.join("main.go"), "1\n2\n3\n4\n5\n6\n7\n8\n9\n10").unwrap();
    let committed = git(root, &["add", "-A"])
        && git(root, &["commit", "-q", "-m", "baseline"])
        && git(root, &["tag", "baseline"]);
    committed.then_some(dir)
}

/// The JSON document printed before the chart outcome line.
fn json_part(stdout: &str) -> serde_json::Value {
    let end = stdout.rfind("\n}").expect("no JSON object in output") + 2;
    serde_json::from_str(&stdout[..end]).expect("Invalid JSON output")
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_tagloc(&["--help"]);

    assert!(success);
    assert!(stdout.contains("tagloc"));
    assert!(stdout.contains("--checkpoint"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--json"));
    assert!(stdout.contains("--repo"));
    assert!(stdout.contains("--format"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_tagloc(&["--version"]);

    assert!(success);
    assert!(stdout.contains("tagloc"));
}

#[test]
fn test_json_report_for_tagged_repository() {
    let Some(repo) = baseline_repo() else { return };
    let out = tempdir().unwrap();
    let chart = out.path().join("chart.png");
    let font = out.path().join("missing.ttf");

    let (stdout, stderr, success) = run_tagloc(&[
        "--repo",
        repo.path().to_str().unwrap(),
        "--checkpoint",
        "baseline=Baseline",
        "--checkpoint",
        "no-such-tag=Missing",
        "--output",
        chart.to_str().unwrap(),
        "--font",
        font.to_str().unwrap(),
        "--json",
    ]);

    assert!(success);
    let report = json_part(&stdout);
    assert_eq!(
        report,
        serde_json::json!({
            "baseline": {
                "Documentation": 3,
                "Application Code": 10,
                "_label": "Baseline"
            },
            "no-such-tag": { "_label": "Missing" }
        })
    );

    // checkpoint order is kept in the output
    assert!(stdout.find("\"baseline\"").unwrap() < stdout.find("\"no-such-tag\"").unwrap());
    assert!(stderr.contains("Analyzing baseline..."));
    assert!(stderr.contains("Could not read ref no-such-tag"));

    // charting unavailable: reported, nothing written
    assert!(stdout.contains("Skipping chart generation"));
    assert!(!chart.exists());
}

#[test]
fn test_table_output() {
    let Some(repo) = baseline_repo() else { return };
    let out = tempdir().unwrap();
    let chart = out.path().join("chart.png");

    let (stdout, _, success) = run_tagloc(&[
        "--repo",
        repo.path().to_str().unwrap(),
        "--checkpoint",
        "baseline=Baseline",
        "--output",
        chart.to_str().unwrap(),
        "--format",
        "text",
    ]);

    assert!(success);
    assert!(!stdout.contains('\x1b'));
    assert!(stdout.contains("Checkpoint"));
    assert!(stdout.contains("Application Code"));
    assert!(stdout.contains("Documentation"));
    assert!(stdout.contains("Total"));
    assert!(stdout.contains("Baseline"));
    assert!(stdout.contains("13"));
}

#[test]
fn test_missing_repository_still_succeeds() {
    let dir = tempdir().unwrap();
    let chart = dir.path().join("chart.png");

    let (stdout, stderr, success) = run_tagloc(&[
        "--repo",
        dir.path().to_str().unwrap(),
        "--output",
        chart.to_str().unwrap(),
        "--json",
    ]);

    assert!(success);
    assert!(stderr.contains("every checkpoint will be empty"));
    let report = json_part(&stdout);
    assert_eq!(report["baseline"], serde_json::json!({ "_label": "Baseline" }));
    assert_eq!(
        report["milestone-tracing-polish"],
        serde_json::json!({ "_label": "9. Polish" })
    );
    assert!(stdout.contains("No data to plot.") || stdout.contains("Skipping chart generation"));
    assert!(!chart.exists());
}

#[test]
fn test_invalid_checkpoint_flag() {
    let (_, stderr, success) = run_tagloc(&["--checkpoint", "=Label"]);

    assert!(!success);
    assert!(stderr.contains("invalid checkpoint"));
}
