use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiptClaimError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("保存先エンドポイントが設定されていません。`receipt-claim config --set-endpoint URL` で設定してください")]
    MissingEndpoint,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("OCR実行エラー: {0}")]
    OcrFailed(String),

    #[error("ドラフト保存エラー: {0}")]
    SaveFailed(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("予算カタログが不正: {0}")]
    InvalidCatalogue(String),

    #[error("領収書画像が見つかりません: {0}")]
    NoReceiptsFound(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error(transparent)]
    Common(#[from] receipt_claim_common::Error),
}

pub type Result<T> = std::result::Result<T, ReceiptClaimError>;
