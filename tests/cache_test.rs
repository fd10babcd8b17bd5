//! OCRキャッシュテスト
//!
//! OCRテキストキャッシュの保存・読み込み・削除を検証

use receipt_claim_rust::ocr::cache::{compute_file_hash, OcrCache};
use tempfile::tempdir;

/// 空のキャッシュファイル
#[test]
fn test_cache_file_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache = OcrCache::load(dir.path());

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
}

/// キャッシュの保存と読み込み
#[test]
fn test_cache_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = OcrCache::load(dir.path());
    cache.insert(
        "abc123".to_string(),
        "receipt.jpg".to_string(),
        1024,
        "ABC Concrete Supply $1,200.00".to_string(),
    );
    cache.save(dir.path()).expect("キャッシュ保存失敗");

    let loaded = OcrCache::load(dir.path());
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get("abc123"), Some("ABC Concrete Supply $1,200.00"));
    assert!(loaded.get("nonexistent_hash").is_none());
}

/// 実ファイルのハッシュでヒットする
#[test]
fn test_cache_hit_by_file_hash() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("r1.jpg");
    std::fs::write(&path, b"fake receipt image").unwrap();

    let (hash, size) = compute_file_hash(&path).unwrap();
    assert_eq!(size, 18);
    assert_eq!(hash.len(), 64);

    let mut cache = OcrCache::default();
    cache.insert(hash.clone(), "r1.jpg".into(), size, "timber".into());

    // 内容を変えるとミス
    std::fs::write(&path, b"edited receipt image").unwrap();
    let (edited_hash, _) = compute_file_hash(&path).unwrap();
    assert!(cache.get(&hash).is_some());
    assert!(cache.get(&edited_hash).is_none());
}

/// キャッシュ削除
#[test]
fn test_cache_clear() {
    let dir = tempdir().expect("Failed to create temp dir");

    assert!(!OcrCache::clear(dir.path()).unwrap());

    OcrCache::default().save(dir.path()).unwrap();
    assert!(OcrCache::cache_path(dir.path()).exists());
    assert!(OcrCache::clear(dir.path()).unwrap());
    assert!(!OcrCache::cache_path(dir.path()).exists());
}
