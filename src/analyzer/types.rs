use receipt_claim_common::MilestoneMatch;
use serde::{Deserialize, Serialize};

/// レビュー状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    /// 推薦をそのまま採用
    Accepted,
    /// 別の予算項目に変更
    Overridden,
    /// 請求対象外
    Rejected,
}

/// 代替候補
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub line_id: String,
    pub line_name: String,
    pub score: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptAnalysis {
    pub file_name: String,

    #[serde(default)]
    pub file_path: String,

    #[serde(default)]
    pub date: String,             // EXIF撮影日時

    #[serde(default)]
    pub ocr_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_error: Option<String>,

    #[serde(default)]
    pub amount: Option<f64>,

    #[serde(default)]
    pub line_id: Option<String>,  // 推薦（またはレビュー後）の予算項目

    #[serde(default)]
    pub line_name: Option<String>,

    #[serde(default)]
    pub confidence: u32,

    #[serde(default)]
    pub alternatives: Vec<Alternative>,

    #[serde(default)]
    pub milestones: Vec<MilestoneMatch>,

    #[serde(default)]
    pub review: ReviewStatus,

    #[serde(default)]
    pub description: String,
}

impl ReceiptAnalysis {
    pub fn is_matched(&self) -> bool {
        self.line_id.is_some()
    }

    /// 請求ドラフトの対象か（`include_pending` で未レビューも含める）
    pub fn is_claimable(&self, include_pending: bool) -> bool {
        if !self.is_matched() {
            return false;
        }
        match self.review {
            ReviewStatus::Accepted | ReviewStatus::Overridden => true,
            ReviewStatus::Pending => include_pending,
            ReviewStatus::Rejected => false,
        }
    }
}
