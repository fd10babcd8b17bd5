use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 撮影日時を取得（DateTimeOriginal → DateTime の順）
pub fn extract_date(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut bufreader)?;

    [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .iter()
        .find_map(|tag| exif.get_field(*tag, exif::In::PRIMARY))
        .map(|field| normalize_date(&field.display_value().to_string()))
        .ok_or_else(|| "No date found in EXIF".into())
}

/// EXIF日時を `YYYY-MM-DD HH:MM` に揃える（解釈できなければそのまま）
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y:%m:%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}
