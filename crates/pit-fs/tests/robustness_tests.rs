use assert_fs::prelude::*;
use pit_fs::checksum::compute_file_checksum;
use pit_fs::{ConfigStore, NormalizedPath, PitPath, RobustnessConfig, io};
use predicates::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Account {
    kind: String,
}

#[test]
fn write_atomic_without_fsync_still_replaces_content() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child(PitPath::Manifest.as_str());
    file.write_str("old").unwrap();

    let relaxed = RobustnessConfig {
        max_retries: 0,
        fsync: false,
    };
    io::write_atomic(&NormalizedPath::new(file.path()), b"new", relaxed).unwrap();

    file.assert("new");
}

#[test]
fn config_store_saves_toml_under_app_folder() {
    let temp = assert_fs::TempDir::new().unwrap();
    let account = temp
        .child(PitPath::AppFolder.as_str())
        .child(PitPath::AccountFile.as_str());

    let store = ConfigStore::new();
    let path = NormalizedPath::new(account.path());
    store
        .save(
            &path,
            &Account {
                kind: "local".to_string(),
            },
        )
        .unwrap();

    account.assert(predicate::path::is_file());
    account.assert(predicate::str::contains("kind = \"local\""));
    let loaded: Account = store.load(&path).unwrap();
    assert_eq!(loaded.kind, "local");
}

#[test]
fn file_checksum_tracks_content() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("talk.mp4");
    file.write_binary(&[0u8, 1, 2, 3]).unwrap();
    let first = compute_file_checksum(file.path()).unwrap();

    file.write_binary(&[0u8, 1, 2, 4]).unwrap();
    let second = compute_file_checksum(file.path()).unwrap();

    assert_ne!(first, second);
    assert!(first.starts_with("sha256:"));
    temp.child("missing").assert(predicate::path::missing());
    assert!(compute_file_checksum(temp.child("missing").path()).is_err());
}
