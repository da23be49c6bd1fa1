//! Tests for manifest persistence and the wire format

use pit_core::collection::Collection;
use pit_core::manifest::{self, ManifestStore};
use pit_core::Error;
use pit_fs::NormalizedPath;
use pit_test_utils::collection::TestCollection;
use pretty_assertions::assert_eq;

const WRITTEN_BY_EARLIER_VERSION: &str = r#"{
  "localName": "thesis",
  "remoteToken": "kq3vx9ms",
  "created": "2023-05-01T09:30:00Z",
  "updated": "2023-05-02T17:04:11Z",
  "documents": [
    {
      "localName": "Chapter1.docx",
      "remoteVersionTag": "0x8DB4A1C2F3E4D5B",
      "currentDigest": "sha256:02",
      "digestHistory": ["sha256:01"]
    }
  ]
}"#;

#[test]
fn reads_manifest_written_by_earlier_version() {
    let dir = TestCollection::new();
    dir.write_file("pit.json", WRITTEN_BY_EARLIER_VERSION);

    let store = ManifestStore::new(&NormalizedPath::new(dir.root()));
    let collection = store.load().unwrap();

    assert_eq!(collection.local_name, "thesis");
    assert_eq!(collection.remote_token(), "kq3vx9ms");
    let doc = collection.document("Chapter1.docx").unwrap();
    assert_eq!(doc.remote_version_tag(), "0x8DB4A1C2F3E4D5B");
    assert_eq!(doc.digest_history(), ["sha256:01".to_string()]);
    assert_eq!(
        collection.remote_name("Chapter1.docx"),
        "kq3vx9ms-chapter1.docx"
    );
}

#[test]
fn rewrite_preserves_field_order() {
    let collection = manifest::from_bytes(WRITTEN_BY_EARLIER_VERSION.as_bytes(), "pit.json").unwrap();
    let rendered = String::from_utf8(manifest::to_bytes(&collection).unwrap()).unwrap();

    let order = ["\"localName\"", "\"remoteToken\"", "\"created\"", "\"updated\"", "\"documents\""];
    let positions: Vec<usize> = order.iter().map(|k| rendered.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{rendered}");
    assert!(rendered.contains("\"created\": \"2023-05-01T09:30:00Z\""));
}

#[test]
fn malformed_manifest_is_an_error() {
    let dir = TestCollection::new();
    dir.write_file("pit.json", "{ not json");
    let store = ManifestStore::new(&NormalizedPath::new(dir.root()));
    assert!(matches!(store.load(), Err(Error::Fs(_))));
}

#[test]
fn manifest_with_escaping_document_name_is_invalid() {
    let raw = WRITTEN_BY_EARLIER_VERSION.replace("Chapter1.docx", "../../etc/passwd");
    assert!(matches!(
        manifest::from_bytes(raw.as_bytes(), "kq3vx9ms.json"),
        Err(Error::InvalidManifest { .. })
    ));
}

#[test]
fn save_leaves_no_temp_files() {
    let dir = TestCollection::new();
    let store = ManifestStore::new(&NormalizedPath::new(dir.root()));
    store.save(&Collection::new("notes", "abcdefgh")).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["pit.json".to_string()]);
}
