#![allow(deprecated)]
use assert_cmd::Command;
use chrono::Utc;
use predicates::prelude::*;
use readiness_core::assessment::Assessment;
use readiness_core::catalog::Catalog;
use readiness_core::paths;
use readiness_core::store::Store;
use std::collections::BTreeMap;
use tempfile::TempDir;
use uuid::Uuid;

fn readiness(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("readiness").unwrap();
    cmd.current_dir(dir.path())
        .env("READINESS_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn init_project(dir: &TempDir) {
    readiness(dir).arg("init").assert().success();
}

/// Seed one assessment answered with every question's first option.
/// Returns (complete id, in-progress id).
fn seed_assessments(dir: &TempDir) -> (Uuid, Uuid) {
    let catalog = Catalog::builtin().unwrap();
    let store = Store::open(&paths::db_path(dir.path())).unwrap();
    let owner = Uuid::new_v4();

    let mut done = Assessment::start(owner, Utc::now());
    store.insert_assessment(&done).unwrap();
    while !done.is_exhausted(&catalog) {
        let answers: BTreeMap<u32, String> = done
            .page(&catalog, 4)
            .iter()
            .map(|q| (q.id, q.options[0].clone()))
            .collect();
        let from_cursor = done.current_question;
        let responses = done.submit_page(&catalog, 4, &answers).unwrap();
        store.record_responses(&done, from_cursor, &responses).unwrap();
    }
    store.finalize(done.id, &catalog, Utc::now()).unwrap();

    let pending = Assessment::start(owner, Utc::now());
    store.insert_assessment(&pending).unwrap();
    (done.id, pending.id)
}

// ---------------------------------------------------------------------------
// readiness init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_database() {
    let dir = TempDir::new().unwrap();
    readiness(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .readiness/config.yaml"));

    assert!(dir.path().join(".readiness/config.yaml").exists());
    assert!(dir.path().join(".readiness/readiness.db").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    readiness(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .readiness/config.yaml"));
}

#[test]
fn init_keeps_existing_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join(".readiness/config.yaml");
    std::fs::create_dir_all(config.parent().unwrap()).unwrap();
    std::fs::write(&config, "server:\n  port: 9000\n").unwrap();

    init_project(&dir);
    assert!(std::fs::read_to_string(&config).unwrap().contains("9000"));
    assert!(dir.path().join(".readiness/readiness.db").exists());
}

// ---------------------------------------------------------------------------
// readiness catalog
// ---------------------------------------------------------------------------

#[test]
fn catalog_list_shows_all_questions() {
    let dir = TempDir::new().unwrap();
    let out = readiness(&dir)
        .args(["catalog", "list", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let questions: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(questions.as_array().unwrap().len(), 33);
}

#[test]
fn catalog_list_filters_by_category() {
    let dir = TempDir::new().unwrap();
    let out = readiness(&dir)
        .args(["catalog", "list", "--category", "strategy", "--json"])
        .output()
        .unwrap();
    let questions: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(questions.as_array().unwrap().len(), 5);

    readiness(&dir)
        .args(["catalog", "list", "--category", "marketing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid category"));
}

#[test]
fn catalog_validate_builtin() {
    let dir = TempDir::new().unwrap();
    readiness(&dir)
        .args(["catalog", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 33 questions"));
}

#[test]
fn catalog_validate_rejects_mismatched_scores() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(
        &path,
        "questions:\n  - category: strategy\n    subcategory: S\n    text: T?\n    options: [\"Yes\", \"No\"]\n    scores: [1]\n    max_score: 1\n",
    )
    .unwrap();
    readiness(&dir)
        .args(["catalog", "validate"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid catalog"));
}

// ---------------------------------------------------------------------------
// readiness score
// ---------------------------------------------------------------------------

#[test]
fn score_answers_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("answers.yaml");
    std::fs::write(
        &path,
        "1: \"Yes, we have a detailed AI strategy.\"\n2: \"Unsure\"\n99: \"Yes\"\n",
    )
    .unwrap();

    let out = readiness(&dir)
        .args(["score", "--json"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(out.status.success());
    let card: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(card["categories"]["strategy"], 5.0);
    assert_eq!(card["total_score"], 5.0);
    assert_eq!(card["readiness_level"], "AI Novice");
    assert_eq!(card["skipped"], 1);
    assert_eq!(card["recommendations"].as_array().unwrap().len(), 4);
}

#[test]
fn score_accepts_json_and_prints_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("answers.json");
    std::fs::write(&path, r#"{"1": "Yes, we have a detailed AI strategy."}"#).unwrap();
    readiness(&dir)
        .arg("score")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Readiness: AI Novice"))
        .stdout(predicate::str::contains("Strategy"));
}

#[test]
fn score_rejects_non_numeric_ids() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("answers.yaml");
    std::fs::write(&path, "first: Unsure\n").unwrap();
    readiness(&dir)
        .arg("score")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid question id"));
}

// ---------------------------------------------------------------------------
// readiness assessment / report
// ---------------------------------------------------------------------------

#[test]
fn assessment_commands_need_init() {
    let dir = TempDir::new().unwrap();
    readiness(&dir)
        .args(["assessment", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn assessment_list_and_show() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let (done, _) = seed_assessments(&dir);

    let out = readiness(&dir)
        .args(["assessment", "list", "--json"])
        .output()
        .unwrap();
    let list: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 2);

    readiness(&dir)
        .args(["assessment", "show"])
        .arg(done.to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("Readiness:  AI Advanced"))
        .stdout(predicate::str::contains("Progress:   33/33 questions"));
}

#[test]
fn report_prints_markdown_and_writes_pdf() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let (done, pending) = seed_assessments(&dir);

    readiness(&dir)
        .arg("report")
        .arg(done.to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("# AI Readiness Assessment Report"))
        .stdout(predicate::str::contains("- Total Score: 73"));

    let pdf = dir.path().join("report.pdf");
    readiness(&dir)
        .arg("report")
        .arg(done.to_string())
        .arg("--out")
        .arg(&pdf)
        .assert()
        .success();
    assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));

    readiness(&dir)
        .arg("report")
        .arg(pending.to_string())
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not complete"));
}
