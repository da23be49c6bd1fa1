//! CLI end-to-end tests that invoke the compiled `pit` binary.
//!
//! Each test gets its own HOME (so no real account file is read) and a
//! temporary directory-backed container passed through `PIT_CONTAINER`.

use std::path::Path;

use assert_cmd::Command;
use pit_test_utils::collection::TestCollection;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    home: TempDir,
    container: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            container: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the pit binary running in `dir`
    fn pit(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pit"));
        cmd.current_dir(dir)
            .env("HOME", self.home.path())
            .env("PIT_CONTAINER", self.container.path())
            .env("NO_COLOR", "1");
        cmd
    }
}

/// Extract the token from `pit init` output.
fn token_from_init(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    let start = text.find("(token ").expect("token in init output") + "(token ".len();
    text[start..].chars().take_while(|c| c.is_ascii_alphanumeric()).collect()
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let env = Env::new();
    let dir = TestCollection::new();
    env.pit(dir.root())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push").and(predicate::str::contains("clone")));
}

#[test]
fn test_version_command() {
    let env = Env::new();
    let dir = TestCollection::new();
    env.pit(dir.root())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_command_shows_hint() {
    let env = Env::new();
    let dir = TestCollection::new();
    env.pit(dir.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("pit --help"));
}

// ============================================================================
// Workflow Tests
// ============================================================================

#[test]
fn test_init_add_push_status() {
    let env = Env::new();
    let dir = TestCollection::new();

    env.pit(dir.root())
        .args(["init", "--name", "thesis"])
        .assert()
        .success()
        .stdout(predicate::str::contains("thesis"));
    dir.assert_file_exists("pit.json");

    dir.write_file("report.pdf", "%PDF v1");
    env.pit(dir.root())
        .args(["add", "report.pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("report.pdf added"));

    env.pit(dir.root())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not yet pushed"));

    env.pit(dir.root())
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("uploaded"));

    env.pit(dir.root())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("synced"));

    env.pit(dir.root())
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to push"));

    env.pit(dir.root())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("-report.pdf"));
}

#[test]
fn test_clone_round_trip() {
    let env = Env::new();
    let origin = TestCollection::new();

    let out = env.pit(origin.root()).arg("init").output().unwrap();
    assert!(out.status.success());
    let token = token_from_init(&out.stdout);

    origin.write_file("notes/todo.txt", "buy milk");
    env.pit(origin.root()).args(["add", "notes/todo.txt"]).assert().success();
    env.pit(origin.root()).arg("push").assert().success();

    let target = TestCollection::new();
    env.pit(target.root())
        .args(["clone", &token, "copy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes/todo.txt"));

    target.assert_file_contains("copy/notes/todo.txt", "buy milk");
    target.assert_file_exists("copy/pit.json");

    env.pit(&target.path("copy"))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("synced"));
}

#[test]
fn test_clone_defaults_to_token_directory() {
    let env = Env::new();
    let origin = TestCollection::new();
    let out = env.pit(origin.root()).arg("init").output().unwrap();
    let token = token_from_init(&out.stdout);
    origin.write_file("a.txt", "a");
    env.pit(origin.root()).args(["add", "a.txt"]).assert().success();
    env.pit(origin.root()).arg("push").assert().success();

    let target = TestCollection::new();
    env.pit(target.root()).args(["clone", &token]).assert().success();
    target.assert_file_contains(&format!("{token}/a.txt"), "a");
}

#[test]
fn test_push_conflict_exits_one() {
    let env = Env::new();
    let alice = TestCollection::new();

    let out = env.pit(alice.root()).arg("init").output().unwrap();
    let token = token_from_init(&out.stdout);
    alice.write_file("a.txt", "v1");
    env.pit(alice.root()).args(["add", "a.txt"]).assert().success();
    env.pit(alice.root()).arg("push").assert().success();

    let bob = TestCollection::new();
    env.pit(bob.root()).args(["clone", &token, "copy"]).assert().success();
    let bob_root = bob.path("copy");
    std::fs::write(bob_root.join("a.txt"), "bob").unwrap();
    env.pit(&bob_root).args(["add", "a.txt"]).assert().success();
    env.pit(&bob_root).arg("push").assert().success();

    alice.write_file("a.txt", "alice");
    env.pit(alice.root()).args(["add", "a.txt"]).assert().success();
    env.pit(alice.root())
        .arg("push")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("CONFLICT"))
        .stderr(predicate::str::contains("could not be pushed"));
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_status_without_collection() {
    let env = Env::new();
    let dir = TestCollection::new();
    env.pit(dir.root())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No collection initialized"));
}

#[test]
fn test_add_without_collection_fails() {
    let env = Env::new();
    let dir = TestCollection::new();
    dir.write_file("a.txt", "a");
    env.pit(dir.root())
        .args(["add", "a.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error").and(predicate::str::contains("No collection")));
}

#[test]
fn test_missing_account_is_config_error() {
    let env = Env::new();
    let dir = TestCollection::new();
    env.pit(dir.root())
        .env_remove("PIT_CONTAINER")
        .arg("init")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no container configured"));
}

#[test]
fn test_account_file_is_used() {
    let env = Env::new();
    let dir = TestCollection::new();
    let account_dir = env.home.path().join(".pit");
    std::fs::create_dir_all(&account_dir).unwrap();
    std::fs::write(
        account_dir.join("account.toml"),
        "[container]\nkind = \"local\"\npath = \"container\"\n",
    )
    .unwrap();

    env.pit(dir.root())
        .env_remove("PIT_CONTAINER")
        .arg("init")
        .assert()
        .success();
    assert!(account_dir.join("container").join("objects").is_dir());
}

#[test]
fn test_existing_log_file_receives_entries() {
    let env = Env::new();
    let dir = TestCollection::new();
    let app_dir = env.home.path().join(".pit");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(app_dir.join("log.txt"), "").unwrap();

    env.pit(dir.root()).args(["init", "--name", "thesis"]).assert().success();

    let log = std::fs::read_to_string(app_dir.join("log.txt")).unwrap();
    assert!(log.contains("initialized collection"), "log was: {log}");
}

#[test]
fn test_status_shows_remote_name() {
    let env = Env::new();
    let dir = TestCollection::new();
    let out = env.pit(dir.root()).arg("init").output().unwrap();
    let token = token_from_init(&out.stdout);
    dir.write_file("Report.pdf", "%PDF v1");
    env.pit(dir.root()).args(["add", "Report.pdf"]).assert().success();
    env.pit(dir.root()).arg("push").assert().success();

    env.pit(dir.root())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("as {token}-report.pdf")));
}

#[test]
fn test_clone_invalid_token_fails() {
    let env = Env::new();
    let dir = TestCollection::new();
    env.pit(dir.root())
        .args(["clone", "NOT-A-TOKEN"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid collection token"));
}
