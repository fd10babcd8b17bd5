//! receipt-claim: 領収書OCR → 予算項目照合 → 出来高請求ドラフト

pub mod analyzer;
pub mod catalogue;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ocr;
pub mod ocr_provider;
pub mod review;
pub mod scanner;
pub mod submit;
