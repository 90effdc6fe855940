//! File Store Tests
//!
//! Tests for root-directory access: reads, upload reservations, listing
//! and its rendering.

use std::fs;

use sharebox::store::{render_listing, FileStore};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (TempDir, FileStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::open(temp_dir.path()).unwrap();
    (temp_dir, store)
}

// =============================================================================
// Open / Read Tests
// =============================================================================

#[test]
fn test_open_creates_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("nested").join("shared");

    let store = FileStore::open(&root).unwrap();
    assert!(root.is_dir());
    assert_eq!(store.root(), root);
}

#[test]
fn test_read_existing_file() {
    let (temp, store) = setup_store();
    fs::write(temp.path().join("hello.txt"), b"hi there").unwrap();

    assert_eq!(store.read("hello.txt").unwrap(), Some(b"hi there".to_vec()));
}

#[test]
fn test_read_missing_file_is_none() {
    let (_temp, store) = setup_store();
    assert_eq!(store.read("nope.txt").unwrap(), None);
}

#[test]
fn test_read_invalid_names_are_none() {
    let (temp, store) = setup_store();
    fs::write(temp.path().join("real.txt"), b"x").unwrap();

    for name in ["", ".", "..", "../real.txt", "a/b.txt", "a\\b.txt"] {
        assert_eq!(store.read(name).unwrap(), None, "name {name:?}");
    }
}

#[test]
fn test_valid_name() {
    assert!(FileStore::valid_name("a.txt"));
    assert!(FileStore::valid_name("no extension"));
    assert!(!FileStore::valid_name(""));
    assert!(!FileStore::valid_name(".."));
    assert!(!FileStore::valid_name("dir/file"));
    assert!(!FileStore::valid_name("nul\0byte"));
}

// =============================================================================
// Upload Reservation Tests
// =============================================================================

#[test]
fn test_put_commit_makes_file_visible() {
    let (temp, store) = setup_store();

    let guard = store.begin_put("upload.bin").unwrap();
    guard.commit(b"payload bytes").unwrap();

    assert_eq!(
        fs::read(temp.path().join("upload.bin")).unwrap(),
        b"payload bytes"
    );
    assert!(store.contains("upload.bin"));
}

#[test]
fn test_put_existing_name_rejected() {
    let (temp, store) = setup_store();
    fs::write(temp.path().join("taken.txt"), b"old").unwrap();

    assert!(store.begin_put("taken.txt").is_none());
    // The original content is untouched.
    assert_eq!(fs::read(temp.path().join("taken.txt")).unwrap(), b"old");
}

#[test]
fn test_put_invalid_name_rejected() {
    let (_temp, store) = setup_store();
    assert!(store.begin_put("../escape.txt").is_none());
    assert!(store.begin_put("").is_none());
}

#[test]
fn test_concurrent_put_same_name_rejected() {
    let (_temp, store) = setup_store();

    let first = store.begin_put("contended.txt").unwrap();
    // Second upload of the same name while the first is in flight.
    assert!(store.begin_put("contended.txt").is_none());

    first.commit(b"winner").unwrap();
    // Committed file now exists, so later attempts still lose.
    assert!(store.begin_put("contended.txt").is_none());
}

#[test]
fn test_dropped_guard_releases_reservation() {
    let (_temp, store) = setup_store();

    let guard = store.begin_put("flaky.txt").unwrap();
    drop(guard);

    // An aborted upload must not block the name forever.
    let retry = store.begin_put("flaky.txt").unwrap();
    retry.commit(b"second try").unwrap();
    assert!(store.contains("flaky.txt"));
}

#[test]
fn test_uncommitted_put_leaves_no_visible_file() {
    let (_temp, store) = setup_store();

    let guard = store.begin_put("ghost.txt").unwrap();
    drop(guard);

    assert!(!store.contains("ghost.txt"));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_put_empty_payload() {
    let (temp, store) = setup_store();

    store.begin_put("empty").unwrap().commit(&[]).unwrap();
    assert_eq!(fs::read(temp.path().join("empty")).unwrap(), b"");
}

// =============================================================================
// Listing Tests
// =============================================================================

#[test]
fn test_list_sorted() {
    let (temp, store) = setup_store();
    fs::write(temp.path().join("b.txt"), b"b").unwrap();
    fs::write(temp.path().join("a.txt"), b"a").unwrap();
    fs::write(temp.path().join("c.txt"), b"c").unwrap();

    assert_eq!(store.list().unwrap(), vec!["a.txt", "b.txt", "c.txt"]);
}

#[test]
fn test_list_skips_hidden_and_directories() {
    let (temp, store) = setup_store();
    fs::write(temp.path().join("visible.txt"), b"v").unwrap();
    fs::write(temp.path().join(".hidden"), b"h").unwrap();
    fs::create_dir(temp.path().join("subdir")).unwrap();

    assert_eq!(store.list().unwrap(), vec!["visible.txt"]);
}

#[test]
fn test_list_empty_root() {
    let (_temp, store) = setup_store();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_render_listing() {
    let names = vec!["a.txt".to_string(), "b.txt".to_string()];
    assert_eq!(render_listing(&names), "- a.txt\n- b.txt");
}

#[test]
fn test_render_listing_single_and_empty() {
    assert_eq!(render_listing(&["only.md".to_string()]), "- only.md");
    assert_eq!(render_listing(&[]), "");
}
