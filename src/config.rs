use crate::error::{ReceiptClaimError, Result};
use crate::ocr_provider::OcrProvider;
use receipt_claim_common::{AmountPolicy, DomainBoost, MatchRules};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const API_TOKEN_ENV: &str = "RECEIPT_CLAIM_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ドラフト保存エンドポイント（例: https://host/api/claims/draft）
    pub save_endpoint: Option<String>,
    pub api_token: Option<String>,
    pub ocr_provider: OcrProvider,
    pub ocr_language: String,
    pub amount_policy: AmountPolicy,
    /// HTTP送信のタイムアウト
    pub timeout_seconds: u64,
    /// OCR1件あたりのタイムアウト
    pub ocr_timeout_seconds: u64,
    /// 組み込みに追加するドメインブースト
    pub extra_boosts: Vec<DomainBoost>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_endpoint: None,
            api_token: None,
            ocr_provider: OcrProvider::Tesseract,
            ocr_language: "eng".into(),
            amount_policy: AmountPolicy::Largest,
            timeout_seconds: 30,
            ocr_timeout_seconds: 120,
            extra_boosts: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReceiptClaimError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("receipt-claim").join("config.json"))
    }

    /// 環境変数を優先してAPIトークンを取得
    pub fn api_token(&self) -> Option<String> {
        std::env::var(API_TOKEN_ENV).ok().or_else(|| self.api_token.clone())
    }

    pub fn endpoint(&self) -> Result<&str> {
        self.save_endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ReceiptClaimError::MissingEndpoint)
    }

    pub fn match_rules(&self) -> MatchRules {
        MatchRules::with_extra_boosts(&self.extra_boosts)
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ReceiptClaimError::Config(format!(
                "エンドポイントは http:// または https:// で始まる必要があります: {}",
                endpoint
            )));
        }
        self.save_endpoint = Some(endpoint);
        self.save()
    }

    pub fn set_api_token(&mut self, token: String) -> Result<()> {
        self.api_token = Some(token);
        self.save()
    }
}
