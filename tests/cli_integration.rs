//! Integration tests for the lanes CLI
//!
//! These tests exercise the full CLI workflow using a temporary database.
//! They verify that commands work end-to-end without mocking.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Helper to run lanes CLI with a specific database path
fn run_lanes(args: &[&str], db_path: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_lanes"))
        .args(args)
        .env("LANES_DB_PATH", db_path)
        .env_remove("LANES_LOG")
        .output()
        .expect("Failed to execute lanes")
}

/// Helper to get stdout as string
fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Helper to get stderr as string
fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn temp_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("lanes.db");
    (dir, db_path)
}

/// Parse `lanes board --json`
fn board_json(db_path: &Path) -> serde_json::Value {
    let output = run_lanes(&["board", "--json"], db_path);
    assert!(output.status.success(), "board failed: {}", stderr(&output));
    serde_json::from_str(&stdout(&output)).expect("board --json should emit JSON")
}

fn task_ids(board: &serde_json::Value) -> Vec<String> {
    board["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

fn find_task<'a>(board: &'a serde_json::Value, id: &str) -> &'a serde_json::Value {
    board["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == id)
        .unwrap_or_else(|| panic!("task {} missing", id))
}

// =============================================================================
// Basic Command Tests
// =============================================================================

#[test]
fn test_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_lanes"))
        .arg("--help")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("lanes"));
    assert!(out.contains("kanban"));
}

#[test]
fn test_version_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_lanes"))
        .arg("--version")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    assert!(stdout(&output).contains("lanes"));
}

// =============================================================================
// Shell Completion Tests
// =============================================================================

#[test]
fn test_completion_zsh() {
    let output = Command::new(env!("CARGO_BIN_EXE_lanes"))
        .args(["completion", "zsh"])
        .output()
        .expect("Failed to execute");

    assert!(
        output.status.success(),
        "completion zsh failed: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("#compdef lanes"));
}

#[test]
fn test_completion_bash() {
    let output = Command::new(env!("CARGO_BIN_EXE_lanes"))
        .args(["completion", "bash"])
        .output()
        .expect("Failed to execute");

    assert!(output.status.success());
    assert!(stdout(&output).contains("_lanes"));
}

// =============================================================================
// Board Tests
// =============================================================================

#[test]
fn test_board_is_seeded() {
    let (_dir, db_path) = temp_db();
    let board = board_json(&db_path);

    assert_eq!(board["statuses"].as_array().unwrap().len(), 3);
    assert_eq!(board["contexts"].as_array().unwrap().len(), 3);
    assert_eq!(task_ids(&board), vec!["t1", "t2", "t3", "t4", "t5"]);
}

#[test]
fn test_board_text_output_groups_by_view() {
    let (_dir, db_path) = temp_db();

    let output = run_lanes(&["board"], &db_path);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("To Do (3)"));
    assert!(out.contains("In Progress (1)"));

    let output = run_lanes(&["board", "--view", "context"], &db_path);
    let out = stdout(&output);
    assert!(out.contains("Deep Work (2)"));
    assert!(out.contains("Fix Login Bug"));
}

#[test]
fn test_add_appends_after_max_order() {
    let (_dir, db_path) = temp_db();

    let output = run_lanes(
        &["add", "Plan sprint", "--status", "doing", "--context", "c2", "--tags", "planning, team"],
        &db_path,
    );
    assert!(output.status.success(), "add failed: {}", stderr(&output));
    assert!(stdout(&output).contains("Created"));

    let board = board_json(&db_path);
    let last = board["tasks"].as_array().unwrap().last().unwrap();
    assert_eq!(last["title"], "Plan sprint");
    assert_eq!(last["status"], "doing");
    assert_eq!(last["order"], 5);
    assert_eq!(last["tags"], serde_json::json!(["planning", "team"]));
}

#[test]
fn test_add_with_unknown_status_fails() {
    let (_dir, db_path) = temp_db();
    let output = run_lanes(&["add", "Orphan", "--status", "nope"], &db_path);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error"));
}

#[test]
fn test_edit_and_remove() {
    let (_dir, db_path) = temp_db();

    let output = run_lanes(&["edit", "t2", "--title", "Write README", "--status", "done"], &db_path);
    assert!(output.status.success(), "edit failed: {}", stderr(&output));

    let board = board_json(&db_path);
    let t2 = find_task(&board, "t2");
    assert_eq!(t2["title"], "Write README");
    assert_eq!(t2["status"], "done");
    assert_eq!(t2["order"], 1);

    let output = run_lanes(&["rm", "t2"], &db_path);
    assert!(output.status.success());
    assert!(!task_ids(&board_json(&db_path)).contains(&"t2".to_string()));

    let output = run_lanes(&["rm", "t2"], &db_path);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("t2"));
}

// =============================================================================
// Move Tests
// =============================================================================

#[test]
fn test_move_onto_task_in_other_column() {
    let (_dir, db_path) = temp_db();

    // t2 (todo) onto t3 (done)
    let output = run_lanes(&["move", "t2", "t3"], &db_path);
    assert!(output.status.success(), "move failed: {}", stderr(&output));

    let board = board_json(&db_path);
    assert_eq!(task_ids(&board), vec!["t1", "t3", "t2", "t4", "t5"]);
    assert_eq!(find_task(&board, "t2")["status"], "done");
    let orders: Vec<i64> = board["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_move_into_context_column() {
    let (_dir, db_path) = temp_db();

    let output = run_lanes(&["move", "t1", "c3", "--view", "context"], &db_path);
    assert!(output.status.success(), "move failed: {}", stderr(&output));

    let board = board_json(&db_path);
    let t1 = find_task(&board, "t1");
    assert_eq!(t1["context"], "c3");
    // Status untouched by a context move
    assert_eq!(t1["status"], "doing");
    assert_eq!(task_ids(&board).last().unwrap(), "t1");
}

#[test]
fn test_move_onto_unknown_target_fails() {
    let (_dir, db_path) = temp_db();
    let before = board_json(&db_path);

    let output = run_lanes(&["move", "t1", "nowhere"], &db_path);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("nowhere"));
    assert_eq!(board_json(&db_path), before);
}

// =============================================================================
// Column Tests
// =============================================================================

#[test]
fn test_context_and_rename() {
    let (_dir, db_path) = temp_db();

    let output = run_lanes(&["context", "Errands", "--color", "#123456"], &db_path);
    assert!(output.status.success(), "context failed: {}", stderr(&output));

    let output = run_lanes(&["rename", "todo", "Backlog", "--kind", "status"], &db_path);
    assert!(output.status.success(), "rename failed: {}", stderr(&output));

    let board = board_json(&db_path);
    let contexts = board["contexts"].as_array().unwrap();
    assert_eq!(contexts.len(), 4);
    assert_eq!(contexts[3]["title"], "Errands");
    assert_eq!(contexts[3]["color"], "#123456");
    assert_eq!(board["statuses"][0]["title"], "Backlog");
}

#[test]
fn test_rename_unknown_column_fails() {
    let (_dir, db_path) = temp_db();
    let output = run_lanes(&["rename", "zzz", "Nope", "--kind", "context"], &db_path);
    assert!(!output.status.success());
}

// =============================================================================
// Init Tests
// =============================================================================

#[test]
fn test_init_creates_lanes_dir() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_lanes"))
        .arg("init")
        .current_dir(dir.path())
        .env_remove("LANES_DB_PATH")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success(), "init failed: {}", stderr(&output));
    assert!(dir.path().join(".lanes").join("lanes.db").exists());
    assert!(dir.path().join(".lanes").join("config.toml").exists());
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_malformed_config_is_logged_and_ignored() {
    let dir = TempDir::new().unwrap();
    let lanes_dir = dir.path().join(".lanes");
    std::fs::create_dir_all(&lanes_dir).unwrap();
    std::fs::write(lanes_dir.join("config.toml"), "[board\nname = ").unwrap();
    let db_path = dir.path().join("lanes.db");

    let output = Command::new(env!("CARGO_BIN_EXE_lanes"))
        .arg("board")
        .current_dir(dir.path())
        .env("LANES_DB_PATH", &db_path)
        .env_remove("LANES_LOG")
        .output()
        .expect("Failed to execute");

    assert!(output.status.success(), "board failed: {}", stderr(&output));
    assert!(stdout(&output).contains("To Do (3)"));
    assert!(stderr(&output).contains("malformed"));

    let log = std::fs::read_to_string(dir.path().join("lanes.log")).unwrap();
    assert!(log.contains("malformed"), "log was: {}", log);
}
