//! End-to-end runs of the `docdex` binary.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/searchindex.js");

fn docdex(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docdex"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run docdex")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON envelope")
}

/// Temp workspace with the fixture already indexed.
fn indexed_workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let output = docdex(temp_dir.path(), &["index", FIXTURE]);
    assert!(output.status.success(), "index failed: {output:?}");
    temp_dir
}

#[test]
fn test_init_command() {
    let temp_dir = TempDir::new().unwrap();

    let output = docdex(temp_dir.path(), &["init"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Created configuration file at"));

    let config_path = temp_dir.path().join(".docdex/settings.toml");
    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("version = 1"));
    assert!(content.contains("[search]"));
    assert!(content.contains("default_limit = 10"));

    // Refuses to overwrite without --force.
    let again = docdex(temp_dir.path(), &["init"]);
    assert_eq!(again.status.code(), Some(5));

    let forced = docdex(temp_dir.path(), &["init", "--force"]);
    assert!(forced.status.success());
}

#[test]
fn test_config_command() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join(".docdex");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("settings.toml"),
        "version = 2\n[search]\ndefault_limit = 42\n",
    )
    .unwrap();

    let output = docdex(temp_dir.path(), &["config"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Current Configuration:"));
    assert!(text.contains("version = 2"));
    assert!(text.contains("default_limit = 42"));

    let output = docdex(temp_dir.path(), &["config", "--json"]);
    assert_eq!(json(&output)["data"]["search"]["default_limit"], 42);
}

#[test]
fn test_index_is_rebuilt_only_when_needed() {
    let temp_dir = TempDir::new().unwrap();

    let first = docdex(temp_dir.path(), &["index", FIXTURE]);
    assert!(first.status.success());
    assert!(stdout(&first).contains("Indexed 124 symbols from 4 documents"));
    assert!(temp_dir.path().join(".docdex/index/index.meta").exists());

    let second = docdex(temp_dir.path(), &["index", FIXTURE]);
    assert!(stdout(&second).contains("Index is up to date"));

    let forced = docdex(temp_dir.path(), &["index", FIXTURE, "--force", "--json"]);
    let envelope = json(&forced);
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["meta"]["entity_type"], "index_summary");
    assert_eq!(envelope["data"]["rebuilt"], true);
    assert_eq!(envelope["data"]["symbols"], 124);
}

#[test]
fn test_index_rejects_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let bad = temp_dir.path().join("searchindex.js");
    std::fs::write(&bad, "Search.setIndex({docnames:[").unwrap();

    let output = docdex(temp_dir.path(), &["index", "searchindex.js", "--json"]);
    assert_eq!(output.status.code(), Some(3));
    let envelope = json(&output);
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["code"], "PARSE_ERROR");
    assert!(!temp_dir.path().join(".docdex/index/index.meta").exists());
}

#[test]
fn test_index_rejects_repeated_symbol() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("searchindex.js"),
        r#"Search.setIndex({docnames:["a","b"],filenames:["a.rst","b.rst"],titles:["A","B"],
        terms:{},objects:{"pkg":{Thing:[0,0,1,""],Thing:[1,0,1,""]}},
        objnames:{"0":["py","class","Python class"]}})"#,
    )
    .unwrap();

    let output = docdex(temp_dir.path(), &["index", "searchindex.js", "--json"]);
    assert_eq!(output.status.code(), Some(3));
    let envelope = json(&output);
    assert_eq!(envelope["code"], "VALIDATION_ERROR");
    assert!(envelope["message"].as_str().unwrap().contains("pkg.Thing"));
    assert_eq!(envelope["error"]["context"]["status"], "DUPLICATE_SYMBOL");
    assert!(!temp_dir.path().join(".docdex/index/index.meta").exists());
}

#[test]
fn test_query_without_index() {
    let temp_dir = TempDir::new().unwrap();
    let output = docdex(temp_dir.path(), &["search", "automaton"]);
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("docdex index"));
}

#[test]
fn test_lookup_command() {
    let workspace = indexed_workspace();

    let output = docdex(workspace.path(), &["lookup", "todo_list.model.ToDoItem"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Python class"));
    assert!(text.contains("todo-list#todo_list.model.ToDoItem"));

    // Last-segment fallback.
    let output = docdex(workspace.path(), &["lookup", "model.step", "--json"]);
    let envelope = json(&output);
    assert_eq!(envelope["meta"]["count"], 4);
    assert!(envelope["message"].as_str().unwrap().contains("No exact match"));

    let missing = docdex(workspace.path(), &["lookup", "no.such.symbol"]);
    assert_eq!(missing.status.code(), Some(1));
}

#[test]
fn test_search_command() {
    let workspace = indexed_workspace();

    let output = docdex(
        workspace.path(),
        &["search", "automaton", "--limit", "2", "--json"],
    );
    assert!(output.status.success());
    let envelope = json(&output);
    assert_eq!(envelope["meta"]["entity_type"], "search_result");
    assert_eq!(envelope["meta"]["count"], 2);
    assert_eq!(envelope["meta"]["truncated"], true);
    assert_eq!(
        envelope["data"]["hits"][0]["name"],
        "cellular_automata.cellular_automaton"
    );
    assert_eq!(envelope["data"]["hits"][0]["score"], 21);

    let output = docdex(workspace.path(), &["search", "step", "--kind", "method"]);
    let text = stdout(&output);
    assert!(text.contains("Found 4 result(s)"));
    assert!(text.contains("cellular_automata.abstract_rule.AbstractRule.step"));

    let output = docdex(workspace.path(), &["search", "zeppelin"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_fuzzy_command() {
    let workspace = indexed_workspace();

    let output = docdex(workspace.path(), &["fuzzy", "ToDoItme", "--json"]);
    assert!(output.status.success());
    let envelope = json(&output);
    let names: Vec<&str> = envelope["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["symbol"]["full_name"].as_str())
        .collect();
    assert!(names.contains(&"todo_list.model.ToDoItem"));
}

#[test]
fn test_list_docs_and_stats() {
    let workspace = indexed_workspace();

    let output = docdex(
        workspace.path(),
        &["list", "--kind", "class", "--prefix", "todo_list", "--json"],
    );
    let envelope = json(&output);
    assert_eq!(envelope["meta"]["count"], 4);

    let output = docdex(workspace.path(), &["list", "--doc", "todo-list"]);
    let text = stdout(&output);
    assert!(text.contains("todo_list.view.ToDoListModelView"));
    assert!(text.contains("25 symbol(s)"));

    let output = docdex(workspace.path(), &["docs", "--json"]);
    let envelope = json(&output);
    assert_eq!(envelope["meta"]["count"], 4);
    assert_eq!(envelope["data"][1]["title"], "ETS Examples");
    assert_eq!(envelope["data"][1]["symbols"], 0);

    let output = docdex(workspace.path(), &["stats", "--json"]);
    let envelope = json(&output);
    assert_eq!(envelope["data"]["symbols"], 124);
    assert_eq!(envelope["data"]["documents"], 4);
    assert_eq!(envelope["data"]["kinds"]["py:attribute"], 52);

    let output = docdex(workspace.path(), &["stats"]);
    assert!(stdout(&output).contains("Index Statistics:"));
}
