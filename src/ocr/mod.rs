//! OCR連携モジュール
//!
//! 外部OCRコマンド（tesseract / claude）で領収書画像からテキストを抽出する。
//! 1枚の失敗は記録して続行し、その領収書は照合しない。

pub mod cache;

use crate::error::{ReceiptClaimError, Result};
use crate::ocr_provider::OcrProvider;
use crate::scanner::ReceiptImage;
use cache::{compute_file_hash, OcrCache};
use indicatif::ProgressBar;
use std::time::Duration;
use tokio::process::Command;

/// OCR実行オプション
#[derive(Debug, Clone)]
pub struct OcrOptions {
    pub provider: OcrProvider,
    pub language: String,
    pub timeout: Duration,
}

/// 1枚分のOCR結果
#[derive(Debug, Clone)]
pub struct OcrOutcome {
    pub receipt: ReceiptImage,
    pub text: std::result::Result<String, String>,
    pub cached: bool,
}

/// 外部コマンドを実行して標準出力を返す
pub async fn run_command(program: &str, args: &[String], timeout: Duration) -> Result<String> {
    // Windowsではcmd /c経由
    #[cfg(windows)]
    let mut command = {
        let mut c = Command::new("cmd");
        c.arg("/c").arg(program).args(args);
        c
    };

    #[cfg(not(windows))]
    let mut command = {
        let mut c = Command::new(program);
        c.args(args);
        c
    };

    command.kill_on_drop(true);

    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| ReceiptClaimError::OcrFailed(format!("{} がタイムアウトしました ({:?})", program, timeout)))?
        .map_err(|e| ReceiptClaimError::OcrFailed(format!("{} 実行エラー: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReceiptClaimError::OcrFailed(format!(
            "{} failed (code {:?}): {}",
            program,
            output.status.code(),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// 1枚の領収書をOCR
pub async fn recognize(receipt: &ReceiptImage, options: &OcrOptions) -> Result<String> {
    let args = options.provider.args(&receipt.path, &options.language);
    let text = run_command(options.provider.command_name(), &args, options.timeout).await?;
    tracing::debug!("OCR {}: {} chars", receipt.file_name, text.len());
    Ok(text)
}

/// キャッシュ使用時のみファイルハッシュを計算
fn cache_key(receipt: &ReceiptImage, use_cache: bool) -> Option<(String, u64)> {
    if !use_cache {
        return None;
    }
    match compute_file_hash(&receipt.path) {
        Ok(h) => Some(h),
        Err(e) => {
            tracing::debug!("ハッシュ計算失敗 {}: {}", receipt.file_name, e);
            None
        }
    }
}

/// 複数の領収書を順にOCR（キャッシュがあれば利用・更新）
pub async fn extract_texts(
    receipts: &[ReceiptImage],
    options: &OcrOptions,
    mut cache: Option<&mut OcrCache>,
    progress: &ProgressBar,
) -> Vec<OcrOutcome> {
    let mut outcomes = Vec::with_capacity(receipts.len());

    for receipt in receipts {
        progress.set_message(receipt.file_name.clone());

        let hash = cache_key(receipt, cache.is_some());

        let cached_text = match (&cache, &hash) {
            (Some(c), Some((h, _))) => c.get(h).map(str::to_string),
            _ => None,
        };

        let outcome = if let Some(text) = cached_text {
            OcrOutcome {
                receipt: receipt.clone(),
                text: Ok(text),
                cached: true,
            }
        } else {
            match recognize(receipt, options).await {
                Ok(text) => {
                    if let (Some(c), Some((h, size))) = (cache.as_deref_mut(), &hash) {
                        c.insert(h.clone(), receipt.file_name.clone(), *size, text.clone());
                    }
                    OcrOutcome {
                        receipt: receipt.clone(),
                        text: Ok(text),
                        cached: false,
                    }
                }
                Err(e) => {
                    tracing::warn!("OCR失敗 {}: {}", receipt.file_name, e);
                    OcrOutcome {
                        receipt: receipt.clone(),
                        text: Err(e.to_string()),
                        cached: false,
                    }
                }
            }
        };

        outcomes.push(outcome);
        progress.inc(1);
    }

    outcomes
}
