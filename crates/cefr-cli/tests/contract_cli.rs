use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn cefr() -> Command {
    let mut cmd = Command::cargo_bin("cefr").unwrap();
    cmd.env_remove("CEFR_CONFIG").env("RUST_LOG", "error");
    cmd
}

#[test]
fn validate_prints_correction_note() {
    cefr()
        .args(["validate", "--score", "5", "--max-score", "14", "--ai-level", "C1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CORRECTED"))
        .stdout(predicate::str::contains(
            "AI suggested C1; system corrected to A2 based on score 35.7%",
        ));
}

#[test]
fn validate_json_output() {
    let out = cefr()
        .args([
            "validate",
            "--score",
            "8",
            "--max-score",
            "10",
            "--ai-level",
            "B1",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["result"]["validated_level"], "B2");
    assert_eq!(v["result"]["was_corrected"], true);
    assert_eq!(v["result"]["percentage"], 80.0);
}

#[test]
fn strict_mode_exit_codes() {
    cefr()
        .args([
            "validate", "--score", "2", "--max-score", "5", "--ai-level", "B2", "--strict",
        ])
        .assert()
        .code(1);
    cefr()
        .args([
            "validate", "--score", "13", "--max-score", "14", "--ai-level", "C1", "--strict",
        ])
        .assert()
        .code(0);
}

#[test]
fn lowercase_ai_level_counts_as_corrected() {
    cefr()
        .args([
            "validate", "--score", "13", "--max-score", "14", "--ai-level", "c1", "--strict",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("AI suggested c1; system corrected to C1"));
}

#[test]
fn degenerate_input_does_not_fail() {
    cefr()
        .args(["validate", "--score", "4", "--max-score", "0", "--ai-level", "C2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-> A1"));
}

#[test]
fn batch_writes_outcomes_and_summary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.jsonl");
    let output = dir.path().join("out.jsonl");
    let summary = dir.path().join("summary.json");
    fs::write(
        &input,
        concat!(
            "{\"id\": \"a\", \"score\": 5, \"max_score\": 14, \"ai_level\": \"C1\"}\n",
            "{\"id\": \"b\", \"score\": 13, \"max_score\": 14, \"ai_level\": \"C1\"}\n",
            "{\"id\": \"c\", \"score\": 0, \"max_score\": 14, \"ai_level\": \"A1\"}\n",
        ),
    )
    .unwrap();

    cefr()
        .arg("batch")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success()
        .stderr(predicate::str::contains("3 validated, 1 corrected"));

    let lines: Vec<Value> = fs::read_to_string(&output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["id"], "a");
    assert_eq!(lines[0]["validated_level"], "A2");

    let s: Value = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(s["schema_version"], 1);
    assert_eq!(s["corrected"], 1);
    assert_eq!(s["transitions"]["C1"]["A2"], 1);
}

#[test]
fn batch_reports_bad_input_as_config_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.jsonl");
    fs::write(&input, "{\"id\": \"a\"}\n").unwrap();
    cefr()
        .arg("batch")
        .arg("--input")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("in.jsonl:1"));
}

#[test]
fn custom_policy_is_used_by_bands_and_validate() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("cefr.yaml");
    fs::write(
        &config,
        r#"
policy:
  bands:
    - { threshold: 50, acceptable: [B1, B2], fallback: B1 }
"#,
    )
    .unwrap();

    cefr()
        .arg("bands")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(">= 50%: accepts {B1, B2}, otherwise B1"))
        .stdout(predicate::str::contains("below 50%: always A1"));

    cefr()
        .args(["validate", "--score", "6", "--max-score", "10", "--ai-level", "C2"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("-> B1"));
}

#[test]
fn invalid_config_exits_with_config_error() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("cefr.yaml");
    fs::write(&config, "scoring: { max_concurrency: 0 }\n").unwrap();
    cefr()
        .arg("bands")
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("max_concurrency"));
}

#[test]
fn score_with_fake_provider() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("answers.jsonl");
    let output = dir.path().join("scored.jsonl");
    let long_answer = vec!["word"; 120].join(" ");
    let requests = [
        serde_json::json!({
            "response_id": "w-1",
            "skill": "writing",
            "task_prompt": "Write an email.",
            "response_text": "Hi. I am fine.",
            "max_score": 10
        }),
        serde_json::json!({
            "response_id": "s-1",
            "skill": "speaking",
            "task_prompt": "Describe a photo.",
            "response_text": long_answer,
            "max_score": 10
        }),
    ];
    let body: String = requests.iter().map(|r| format!("{}\n", r)).collect();
    fs::write(&input, body).unwrap();

    cefr()
        .arg("score")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--provider", "fake"])
        .assert()
        .success();

    let scored: Vec<Value> = fs::read_to_string(&output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(scored.len(), 2);
    assert_eq!(scored[0]["response_id"], "w-1");
    assert_eq!(scored[0]["validation"]["validated_level"], "A1");
    // 120 words: fake scores 6/10 and suggests B2, which 60% accepts.
    assert_eq!(scored[1]["assessment"]["suggested_level"], "B2");
    assert_eq!(scored[1]["validation"]["validated_level"], "B2");
    assert_eq!(scored[1]["validation"]["was_corrected"], false);
}

#[test]
fn unknown_provider_is_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("answers.jsonl");
    fs::write(&input, "").unwrap();
    cefr()
        .arg("score")
        .arg("--input")
        .arg(&input)
        .args(["--provider", "claude"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown provider"));
}

#[test]
fn init_writes_loadable_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cefr.yaml");
    cefr().arg("init").arg("--path").arg(&path).assert().success();
    cefr().arg("init").arg("--path").arg(&path).assert().code(2);

    cefr()
        .arg("bands")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Band policy (reference)"));
}
