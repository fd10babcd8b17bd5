mod exif;

use crate::error::{ReceiptClaimError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ReceiptImage {
    pub path: PathBuf,
    pub file_name: String,
    pub date: Option<String>,
}

const RECEIPT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

fn is_receipt_extension(ext: &str) -> bool {
    RECEIPT_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ReceiptImage>> {
    if !folder.is_dir() {
        return Err(ReceiptClaimError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut receipts = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(ext) = path.extension() else {
            continue;
        };
        if !is_receipt_extension(&ext.to_string_lossy()) {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        // PDFにはEXIFがない
        let date = exif::extract_date(path).ok();

        receipts.push(ReceiptImage {
            path: path.to_path_buf(),
            file_name,
            date,
        });
    }

    // ファイル名でソート
    receipts.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(receipts)
}
