use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_squadron")
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("squadron-{name}-{stamp}.{extension}"))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env_remove("SQUADRON_DATA")
        .output()
        .expect("squadron should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should be json")
}

const PLAN: &str = r#"{
    "recruits": {
        "1": { "used": true, "class": "gladiator", "level": 30, "race": "hyur", "name": "Ashe",
               "chemistry": { "condition": "in_squad", "effect": "self_physical", "value": 20 } },
        "2": { "used": true, "class": "conjurer", "level": 30, "race": "elezen", "name": "Brin" },
        "3": { "used": true, "class": "rogue", "level": 30, "race": "lalafell", "name": "Cato" },
        "4": { "used": true, "class": "thaumaturge", "level": 30, "race": "roegadyn", "name": "Dell" },
        "5": { "used": true, "class": "lancer", "level": 30, "race": "miqote", "name": "Eno" },
        "6": { "used": false, "class": "archer", "level": 1, "race": "hyur", "name": "Fay" }
    },
    "training": [80, 60, 60],
    "rank": 1,
    "mission": { "requirement": [400, 380, 360], "affinity": ["hyur"] }
}"#;

fn write_plan(name: &str, body: &str) -> PathBuf {
    let path = unique_temp_path(name, "json");
    fs::write(&path, body).expect("fixture should be written");
    path
}

#[test]
fn unknown_command_prints_usage() {
    let output = run(&["serve"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: squadron"));
}

#[test]
fn train_command_applies_one_action() {
    let output = run(&["train", "100", "60", "40", "phy", "200"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output), serde_json::json!([140, 40, 20]));
}

#[test]
fn train_command_fills_before_spilling() {
    let output = run(&["train", "10", "0", "0", "men_tac", "200"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run(&["train", "40", "20", "20", "men_tac", "200"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output), serde_json::json!([40, 40, 40]));
}

#[test]
fn train_command_rejects_unknown_action() {
    let output = run(&["train", "100", "60", "40", "nap", "200"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'nap' is not valid"));
}

#[test]
fn solve_command_emits_baseline_report() {
    let path = write_plan("solve", PLAN);
    let output = run(&["solve", path.to_string_lossy().as_ref()]);

    assert_eq!(output.status.code(), Some(0));
    let payload = stdout_json(&output);
    assert_eq!(payload["squads_evaluated"], 5);
    assert!(payload["kind"].is_string());
    assert!(payload["plans"].is_array());

    let _ = fs::remove_file(path);
}

#[test]
fn what_if_commands_emit_suggestions() {
    let path = write_plan("what-if", PLAN);
    for command in ["level-up", "reclass"] {
        let output = run(&[command, path.to_string_lossy().as_ref()]);
        assert_eq!(output.status.code(), Some(0), "{command}");
        let payload = stdout_json(&output);
        assert!(payload["suggestions"].is_array(), "{command}");
    }
    let _ = fs::remove_file(path);
}

#[test]
fn solve_command_fails_on_missing_file() {
    let path = unique_temp_path("missing", "json");
    let output = run(&["solve", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("solve failed"));
}

#[test]
fn solve_command_rejects_small_roster() {
    let path = write_plan(
        "small",
        r#"{ "recruits": { "1": { "class": "GLA", "level": 5 } }, "rank": 1 }"#,
    );
    let output = run(&["solve", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at least 4"));
    let _ = fs::remove_file(path);
}

#[test]
fn validate_command_passes_clean_plan() {
    let path = write_plan("valid", PLAN);
    let output = run(&["validate", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(0));
    let payload = stdout_json(&output);
    assert!(payload["diagnostics"].is_array());
    let _ = fs::remove_file(path);
}

#[test]
fn validate_command_returns_non_zero_on_invalid_plan() {
    let path = write_plan(
        "invalid",
        r#"{ "recruits": { "1": { "class": "GLA", "level": 70 } }, "training": [500, 0, 0], "rank": 1 }"#,
    );
    let output = run(&["validate", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));
    let payload = stdout_json(&output);
    assert!(payload["diagnostics"]
        .as_array()
        .is_some_and(|diagnostics| diagnostics.iter().any(|d| d["severity"] == "error")));
    let _ = fs::remove_file(path);
}

#[test]
fn custom_game_data_from_environment() {
    let data = unique_temp_path("data", "yaml");
    fs::write(&data, "rank_caps:\n  1: 90\nclasses:\n  GLA:\n    base: [1, 1, 1]\n")
        .expect("fixture should be written");
    let plan = write_plan(
        "custom",
        r#"{ "recruits": {
            "1": { "class": "GLA", "level": 5 }, "2": { "class": "GLA", "level": 5 },
            "3": { "class": "GLA", "level": 5 }, "4": { "class": "GLA", "level": 5 }
        }, "training": [30, 30, 30], "rank": 1, "mission": { "requirement": [4, 4, 4] } }"#,
    );

    let output = Command::new(bin())
        .args(["solve", plan.to_string_lossy().as_ref()])
        .env("SQUADRON_DATA", &data)
        .output()
        .expect("squadron should run");
    assert_eq!(output.status.code(), Some(0));
    let payload = stdout_json(&output);
    assert_eq!(payload["kind"], "full");
    assert_eq!(payload["plans"][0]["evaluation"]["raw"], serde_json::json!([4, 4, 4]));
    assert_eq!(payload["plans"][0]["result"]["outcome"], "full_match");

    let _ = fs::remove_file(plan);
    let _ = fs::remove_file(data);
}
