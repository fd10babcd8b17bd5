//! OCR結果キャッシュモジュール
//!
//! 画像のSHA-256ハッシュをキーにしてOCRテキストをキャッシュし、
//! 同じ領収書の再OCRをスキップする。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = ".ocr-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrCache {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ファイルハッシュ → OCRテキスト
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    pub text: String,
}

impl OcrCache {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（壊れている・バージョン違いは空として扱う）
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader::<_, OcrCache>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(_) => {
                tracing::warn!("OCRキャッシュのバージョン不一致、再生成します");
                Self::default()
            }
            Err(e) => {
                tracing::debug!("OCRキャッシュ読み込み失敗: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（存在しなければ `false`）
    pub fn clear(folder: &Path) -> Result<bool> {
        let path = Self::cache_path(folder);
        if path.exists() {
            std::fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn get(&self, hash: &str) -> Option<&str> {
        self.entries.get(hash).map(|e| e.text.as_str())
    }

    pub fn insert(&mut self, hash: String, file_name: String, file_size: u64, text: String) {
        self.entries.insert(hash, CacheEntry {
            file_name,
            file_size,
            text,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OcrCache {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// ファイル内容のSHA-256（16進）とサイズ
pub fn compute_file_hash(path: &Path) -> Result<(String, u64)> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    let mut size = 0u64;

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        size += n as u64;
    }

    Ok((hex::encode(hasher.finalize()), size))
}
