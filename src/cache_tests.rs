//! Tests for SuggestionCache

use super::*;
use tempfile::TempDir;

fn make_cache() -> (TempDir, SuggestionCache) {
    let dir = tempfile::tempdir().unwrap();
    let cache = SuggestionCache::open(dir.path().join("unit")).unwrap();
    (dir, cache)
}

fn sample() -> SuggestionSet {
    vec![
        Suggestion {
            title: "Test addition of positives".to_string(),
            reasons: vec!["basic case".to_string()],
        },
        Suggestion {
            title: "Test addition with zero".to_string(),
            reasons: vec!["identity".to_string(), "edge case".to_string()],
        },
    ]
}

#[test]
fn test_open_creates_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a").join("b");
    assert!(!root.exists());

    let cache = SuggestionCache::open(&root).unwrap();
    assert!(root.is_dir());
    assert_eq!(cache.root(), root.as_path());
}

#[test]
fn test_open_fails_when_root_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("occupied");
    fs::write(&file, b"x").unwrap();

    let err = SuggestionCache::open(&file).unwrap_err();
    assert!(matches!(err, CacheError::Io { .. }));
}

#[test]
fn test_lookup_never_stored_is_not_cached() {
    let (_dir, cache) = make_cache();
    let fp = Fingerprint::from_bytes(b"never stored");
    assert_eq!(cache.lookup(&fp).unwrap(), CacheLookup::NotCached);
}

#[test]
fn test_store_then_lookup_round_trip() {
    let (_dir, cache) = make_cache();
    let fp = Fingerprint::from_bytes(b"func Add(a, b int) int { return a + b }");

    cache.store(&fp, &sample()).unwrap();

    assert_eq!(cache.lookup(&fp).unwrap(), CacheLookup::Hit(sample()));
}

#[test]
fn test_stored_empty_set_is_a_hit() {
    let (_dir, cache) = make_cache();
    let fp = Fingerprint::from_bytes(b"empty");

    cache.store(&fp, &[]).unwrap();

    assert_eq!(cache.lookup(&fp).unwrap(), CacheLookup::Hit(vec![]));
}

#[test]
fn test_entry_named_by_fingerprint_hex() {
    let (_dir, cache) = make_cache();
    let fp = Fingerprint::from_bytes(b"content");

    let path = cache.store(&fp, &sample()).unwrap();

    assert_eq!(path, cache.root().join(fp.to_hex()));
    assert_eq!(path.file_name().unwrap().to_string_lossy().len(), 64);
}

#[test]
fn test_entry_is_json_array_of_title_and_reasons() {
    let (_dir, cache) = make_cache();
    let fp = Fingerprint::from_bytes(b"content");

    let path = cache.store(&fp, &sample()[..1]).unwrap();
    let raw = fs::read_to_string(path).unwrap();

    assert_eq!(
        raw,
        r#"[{"title":"Test addition of positives","reasons":["basic case"]}]"#
    );
}

#[test]
fn test_store_leaves_no_temporary_files() {
    let (_dir, cache) = make_cache();
    let fp = Fingerprint::from_bytes(b"content");
    cache.store(&fp, &sample()).unwrap();

    let names: Vec<String> = fs::read_dir(cache.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![fp.to_hex()]);
}

#[test]
fn test_store_twice_is_idempotent() {
    let (_dir, cache) = make_cache();
    let fp = Fingerprint::from_bytes(b"content");

    cache.store(&fp, &sample()).unwrap();
    cache.store(&fp, &sample()).unwrap();

    assert_eq!(cache.lookup(&fp).unwrap(), CacheLookup::Hit(sample()));
}

#[test]
fn test_distinct_content_distinct_entries() {
    let (_dir, cache) = make_cache();
    let a = Fingerprint::from_bytes(b"a");
    let b = Fingerprint::from_bytes(b"b");

    cache.store(&a, &sample()).unwrap();

    assert_eq!(cache.lookup(&b).unwrap(), CacheLookup::NotCached);
}

#[test]
fn test_corrupt_entry_is_an_error_not_a_miss() {
    let (_dir, cache) = make_cache();
    let fp = Fingerprint::from_bytes(b"content");
    fs::write(cache.entry_path(&fp), b"{not json").unwrap();

    let err = cache.lookup(&fp).unwrap_err();
    assert!(matches!(err, CacheError::Serialization { .. }));
    assert!(err.to_string().contains(&fp.to_hex()));
}

#[test]
fn test_unreadable_entry_is_io_error() {
    let (_dir, cache) = make_cache();
    let fp = Fingerprint::from_bytes(b"content");
    // A directory where the entry file should be cannot be read as a file
    fs::create_dir(cache.entry_path(&fp)).unwrap();

    let err = cache.lookup(&fp).unwrap_err();
    assert!(matches!(err, CacheError::Io { .. }));
}

#[test]
fn test_store_into_removed_root_fails() {
    let (_dir, cache) = make_cache();
    fs::remove_dir_all(cache.root()).unwrap();

    let err = cache
        .store(&Fingerprint::from_bytes(b"x"), &sample())
        .unwrap_err();
    assert!(matches!(err, CacheError::Io { .. }));
}

#[tokio::test]
async fn test_spawn_store_is_observable() {
    let (_dir, cache) = make_cache();
    let fp = Fingerprint::from_bytes(b"background");

    let pending = cache.spawn_store(fp, sample());
    let path = pending.wait().await.unwrap();

    assert!(path.exists());
    assert_eq!(cache.lookup(&fp).unwrap(), CacheLookup::Hit(sample()));
}

#[tokio::test]
async fn test_spawn_store_reports_failure() {
    let (_dir, cache) = make_cache();
    fs::remove_dir_all(cache.root()).unwrap();

    let pending = cache.spawn_store(Fingerprint::from_bytes(b"x"), sample());
    assert!(pending.wait().await.is_err());
}
