//! # Chatterm Chat Integration Tests
//!
//! File: cli/tests/chat.rs
//!
//! ## Overview
//!
//! Runs the real binary end to end: configuration, SQLite storage, training
//! and the session loop, with scripted stdin.
//!

mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

const FAREWELL: &str = "Goodbye! 👋";

/// # Test Hello, Blank, Exit (`test_hello_blank_exit`)
///
/// One reply for "hello", nothing for the blank line, farewell on "exit".
#[test]
fn test_hello_blank_exit() {
    let temp_dir = tempdir().unwrap();
    let output = chat_cmd(temp_dir.path())
        .args(["--trainer", "list"])
        .write_stdin("hello\n\nexit\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Chat with SimpleBot started. Type 'exit' (or Ctrl+C) to quit."));
    // One reply plus the farewell.
    assert_eq!(stdout.matches("SimpleBot: ").count(), 2);
    assert!(stdout.trim_end().ends_with(&format!("SimpleBot: {}", FAREWELL)));
}

/// # Test List Training Uses Name (`test_list_training_uses_name`)
#[test]
fn test_list_training_uses_name() {
    let temp_dir = tempdir().unwrap();
    chat_cmd(temp_dir.path())
        .args(["--trainer", "list", "--name", "Rusty"])
        .write_stdin("What is your name?\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rusty: My name is Rusty."));
}

/// # Test End Of Input (`test_end_of_input_exits_cleanly`)
///
/// Closing stdin without the exit word still ends with a farewell and status 0.
#[test]
fn test_end_of_input_exits_cleanly() {
    let temp_dir = tempdir().unwrap();
    chat_cmd(temp_dir.path())
        .args(["--trainer", "list"])
        .write_stdin("Do you like hats?\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "SimpleBot: Sometimes. What kind of hats do you like?",
        ))
        .stdout(predicate::str::contains(FAREWELL));
}

/// # Test Custom Exit Word (`test_custom_exit_word_any_case`)
#[test]
fn test_custom_exit_word_any_case() {
    let temp_dir = tempdir().unwrap();
    let output = chat_cmd(temp_dir.path())
        .args(["--trainer", "none", "--exit-word", "quit"])
        .write_stdin("QuIt\nthis line is never read by the loop\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Type 'quit'"));
    assert_eq!(stdout.matches("SimpleBot: ").count(), 1);
    assert!(stdout.contains(FAREWELL));
}

/// # Test Invalid Trainer (`test_invalid_trainer_fails`)
#[test]
fn test_invalid_trainer_fails() {
    let temp_dir = tempdir().unwrap();
    chat_cmd(temp_dir.path())
        .args(["--trainer", "markov"])
        .write_stdin("exit\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid trainer 'markov'"));
}

/// # Test Read-Only Rejects Invalid Trainer (`test_read_only_rejects_invalid_trainer`)
///
/// The trainer name is validated at startup even when read-only mode means
/// no training will run.
#[test]
fn test_read_only_rejects_invalid_trainer() {
    let temp_dir = tempdir().unwrap();
    chat_cmd(temp_dir.path())
        .args(["--trainer", "markov", "--read-only"])
        .write_stdin("exit\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid trainer 'markov'"));
    assert!(!temp_dir.path().join("data").join("bot.sqlite3").exists());
}

/// # Test Read-Only Skips Training (`test_read_only_never_trains`)
#[test]
fn test_read_only_never_trains() {
    let temp_dir = tempdir().unwrap();
    chat_cmd(temp_dir.path())
        .args(["--trainer", "list", "--read-only"])
        .write_stdin("What is your name?\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "SimpleBot: I am sorry, but I do not understand.",
        ));
}

/// # Test Knowledge Persists (`test_knowledge_persists_between_runs`)
#[test]
fn test_knowledge_persists_between_runs() {
    let temp_dir = tempdir().unwrap();
    chat_cmd(temp_dir.path())
        .args(["--trainer", "list", "--name", "Rusty"])
        .write_stdin("exit\n")
        .assert()
        .success();

    assert!(temp_dir.path().join("data").join("bot.sqlite3").exists());

    chat_cmd(temp_dir.path())
        .args(["--read-only", "--name", "Rusty"])
        .write_stdin("what is your name\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rusty: My name is Rusty."));
}

/// # Test Corpus Fallback (`test_missing_corpus_falls_back_to_list`)
#[test]
fn test_missing_corpus_falls_back_to_list() {
    let temp_dir = tempdir().unwrap();
    chat_cmd(temp_dir.path())
        .args(["--trainer", "corpus", "--corpus-dir"])
        .arg(temp_dir.path().join("missing-corpus"))
        .write_stdin("Do you like hats?\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "SimpleBot: Sometimes. What kind of hats do you like?",
        ));
}

/// # Test Bundled Corpus (`test_bundled_corpus_training`)
#[test]
fn test_bundled_corpus_training() {
    let temp_dir = tempdir().unwrap();
    chat_cmd(temp_dir.path())
        .write_stdin("Good morning!\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("SimpleBot: Good morning to you too!"));
}

/// # Test Config File Settings (`test_config_file_settings`)
///
/// Values from `--config` apply when no flag overrides them.
#[test]
fn test_config_file_settings() {
    let temp_dir = tempdir().unwrap();
    let config = write_config(
        temp_dir.path(),
        "name = \"Configured\"\ntrainer = \"list\"\nexit_word = \"later\"\n",
    );

    chatterm_cmd()
        .current_dir(temp_dir.path())
        .env_remove("CHATTERM_DB")
        .arg("--config")
        .arg(&config)
        .arg("--db")
        .arg(temp_dir.path().join("bot.sqlite3"))
        .write_stdin("What is your name?\nLATER\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configured: My name is Configured."))
        .stdout(predicate::str::contains(FAREWELL));
}

/// # Test Invalid Config File (`test_unknown_config_key_fails`)
#[test]
fn test_unknown_config_key_fails() {
    let temp_dir = tempdir().unwrap();
    let config = write_config(temp_dir.path(), "colour = \"blue\"\n");

    chatterm_cmd()
        .current_dir(temp_dir.path())
        .arg("--config")
        .arg(&config)
        .write_stdin("exit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse TOML"));
}
