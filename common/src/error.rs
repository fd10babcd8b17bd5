//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 空・ID重複・負の金額など、カタログ全体の不整合
    #[error("Invalid catalogue: {0}")]
    InvalidCatalogue(String),

    /// CSVの行単位の誤り（行番号はヘッダーを含む1始まり）
    #[error("CSV line {line}: {message}")]
    Csv { line: usize, message: String },
}

impl Error {
    pub fn csv(line: usize, message: impl Into<String>) -> Self {
        Error::Csv {
            line,
            message: message.into(),
        }
    }

    /// CSVエラーの行番号
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Csv { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
