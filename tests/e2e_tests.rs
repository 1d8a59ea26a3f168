//! End-to-end CLI tests for postfind.
//!
//! These tests exercise the full CLI binary with isolated test environments.
//! Each test creates its own temporary corpus and config to ensure isolation.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Environment Helper
// =============================================================================

/// Isolated test environment with its own corpus and config.
struct TestEnv {
    _temp_dir: TempDir,
    corpus_path: PathBuf,
    config_path: PathBuf,
}

impl TestEnv {
    /// Create a new empty test environment.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();

        let corpus_path = root.join("corpus");
        fs::create_dir_all(&corpus_path).expect("Failed to create corpus dir");

        let manifest = r#"{"version": "1", "posts": []}"#;
        fs::write(corpus_path.join("manifest.json"), manifest).expect("Failed to write manifest");

        let config_path = root.join("config.toml");
        let config_content = format!("[corpus]\npath = \"{}\"\n", corpus_path.display());
        fs::write(&config_path, config_content).expect("Failed to write config");

        Self {
            _temp_dir: temp_dir,
            corpus_path,
            config_path,
        }
    }

    /// Create a test environment with sample posts.
    fn with_posts() -> Self {
        let env = Self::new();

        fs::create_dir_all(env.corpus_path.join("posts")).expect("Failed to create posts dir");

        fs::write(
            env.corpus_path.join("posts/error-handling.md"),
            "Errors in Rust are values. Use Result and Option for error handling.\n\
             The ? operator propagates errors elegantly.",
        )
        .expect("Failed to write rust post");

        fs::write(
            env.corpus_path.join("posts/lambda-patterns.md"),
            "Best practices for AWS Lambda functions.\n\
             Use environment variables for configuration.",
        )
        .expect("Failed to write aws post");

        let manifest = r#"{
    "version": "1",
    "posts": [
        {"id": "error-handling", "title": "Error Handling", "description": "Result and Option in Rust", "date": "2024-01-10", "path": "posts/error-handling.md"},
        {"id": "lambda-patterns", "title": "Lambda Patterns", "description": "Serverless functions for Rust developers", "date": "2024-02-20", "path": "posts/lambda-patterns.md"}
    ]
}"#;
        fs::write(env.corpus_path.join("manifest.json"), manifest)
            .expect("Failed to write manifest");

        env
    }

    /// Append raw TOML to the config file.
    fn append_config(&self, extra: &str) {
        let mut content = fs::read_to_string(&self.config_path).expect("Failed to read config");
        content.push_str(extra);
        fs::write(&self.config_path, content).expect("Failed to write config");
    }

    /// Get a Command configured for this test environment.
    fn command(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("postfind");
        cmd.env("POSTFIND_CONFIG", &self.config_path);
        cmd
    }
}

// =============================================================================
// 1. Help / No Command Tests
// =============================================================================

#[test]
fn tc_1_1_no_subcommand_shows_help() {
    let env = TestEnv::new();

    env.command()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("excerpt"))
        .stdout(predicate::str::contains("interactive"));
}

#[test]
fn tc_1_2_help_flag() {
    let env = TestEnv::new();

    env.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Instant search over blog posts"));
}

#[test]
fn tc_1_3_version_flag() {
    let env = TestEnv::new();

    env.command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("postfind"));
}

// =============================================================================
// 2. Search Command Tests
// =============================================================================

#[test]
fn tc_2_1_search_with_matches() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["search", "error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Error** Handling"))
        .stdout(predicate::str::contains("**Id:** error-handling"))
        .stdout(predicate::str::contains("1 result(s) found"));
}

#[test]
fn tc_2_2_search_with_no_matches() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["search", "xyznonexistent123"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No matches found for 'xyznonexistent123'",
        ));
}

#[test]
fn tc_2_3_search_with_limit() {
    let env = TestEnv::with_posts();

    // "rust" appears in both posts
    env.command()
        .args(["search", "rust", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 result(s) found"))
        .stdout(predicate::str::contains("error-handling"));
}

#[test]
fn tc_2_4_search_prefix_matches() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["search", "lamb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## **Lamb**da Patterns"))
        .stdout(predicate::str::contains("**Id:** lambda-patterns"));
}

#[test]
fn tc_2_5_search_all_words_must_match() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["search", "lambda option"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found"));
}

#[test]
fn tc_2_6_search_empty_query() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["search", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found"));
}

#[test]
fn tc_2_7_search_query_too_long() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["search", &"a".repeat(201)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too long"));
}

#[test]
fn tc_2_8_search_case_insensitive() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["search", "LAMBDA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## **Lambda** Patterns"))
        .stdout(predicate::str::contains("**Id:** lambda-patterns"));
}

#[test]
fn tc_2_9_search_body_excerpt() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["search", "environment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**environment** variables"));
}

#[test]
fn tc_2_10_search_invalid_manifest() {
    let env = TestEnv::new();
    fs::write(env.corpus_path.join("manifest.json"), "not valid json")
        .expect("Failed to write manifest");

    env.command()
        .args(["search", "rust"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse manifest"));
}

#[test]
fn tc_2_11_search_missing_manifest() {
    let env = TestEnv::new();
    fs::remove_file(env.corpus_path.join("manifest.json")).expect("Failed to remove manifest");

    env.command()
        .args(["search", "rust"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest not found"));
}

#[test]
fn tc_2_12_search_duplicate_ids_rejected() {
    let env = TestEnv::new();
    let manifest = r#"{"version": "1", "posts": [
        {"id": "a", "title": "A", "description": "", "date": "2024-01-01"},
        {"id": "a", "title": "B", "description": "", "date": "2024-01-02"}
    ]}"#;
    fs::write(env.corpus_path.join("manifest.json"), manifest).expect("Failed to write manifest");

    env.command()
        .args(["search", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate post id: a"));
}

#[test]
fn tc_2_13_search_respects_configured_excerpt_length() {
    let env = TestEnv::with_posts();
    env.append_config("[excerpt]\nmax_length = 10\n");

    // The phrase itself is not in the body, so the excerpt is the truncated start.
    env.command()
        .args(["search", "lambda environment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Best pract..."));
}

// =============================================================================
// 3. List Command Tests
// =============================================================================

#[test]
fn tc_3_1_list_all_posts() {
    let env = TestEnv::with_posts();

    env.command()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error Handling"))
        .stdout(predicate::str::contains("Lambda Patterns"))
        .stdout(predicate::str::contains("2024-02-20"));
}

#[test]
fn tc_3_2_list_no_posts() {
    let env = TestEnv::new();

    env.command()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No posts found."));
}

// =============================================================================
// 4. Get Command Tests
// =============================================================================

#[test]
fn tc_4_1_get_existing_post() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["get", "error-handling"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Error Handling"))
        .stdout(predicate::str::contains("propagates errors elegantly"));
}

#[test]
fn tc_4_2_get_post_not_found() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["get", "missing-post"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Post not found: missing-post"));
}

// =============================================================================
// 5. Excerpt Command Tests
// =============================================================================

#[test]
fn tc_5_1_excerpt_found() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["excerpt", "error-handling", "RESULT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use Result and Option"));
}

#[test]
fn tc_5_2_excerpt_not_found_has_marker() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["excerpt", "error-handling", "nonexistent", "--max-length", "6"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Errors...\n"));
}

#[test]
fn tc_5_3_excerpt_empty_query_has_no_marker() {
    let env = TestEnv::with_posts();

    env.command()
        .args(["excerpt", "error-handling", "", "-m", "6"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Errors\n"));
}

// =============================================================================
// 6. Interactive Command Tests
// =============================================================================

#[test]
fn tc_6_1_interactive_search_and_open() {
    let env = TestEnv::with_posts();
    env.append_config("[session]\ndebounce_ms = 0\n");

    // End of input lets the last debounced query fire before exiting.
    env.command()
        .arg("interactive")
        .write_stdin("lambda\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 result(s) for 'lambda'"))
        .stdout(predicate::str::contains("> 1. **Lambda** Patterns"));
}

#[test]
fn tc_6_2_interactive_quit() {
    let env = TestEnv::with_posts();

    env.command()
        .arg("interactive")
        .write_stdin(":quit\n")
        .assert()
        .success();
}

// =============================================================================
// 7. Config Tests
// =============================================================================

#[test]
fn tc_7_1_invalid_config_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "this is not [valid toml").expect("Failed to write config");

    cargo_bin_cmd!("postfind")
        .env("POSTFIND_CONFIG", &config_path)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn tc_7_2_missing_config_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("absent.toml");

    // Default corpus path is ./content relative to the working directory.
    cargo_bin_cmd!("postfind")
        .env("POSTFIND_CONFIG", &config_path)
        .current_dir(temp_dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest not found"))
        .stderr(predicate::str::contains("content"));
}

#[test]
fn tc_7_3_nonexistent_corpus_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[corpus]\npath = \"/nonexistent/postfind/corpus\"\n")
        .expect("Failed to write config");

    cargo_bin_cmd!("postfind")
        .env("POSTFIND_CONFIG", &config_path)
        .args(["search", "rust"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest not found"));
}
