//! 請求ドラフト構築

use crate::types::{DraftClaim, MatchResult};

impl DraftClaim {
    /// 照合結果から請求ドラフトを作成
    ///
    /// 一致なしの場合は `None`。金額が取れなかった場合は0（レビューで入力）。
    pub fn from_match(
        result: &MatchResult,
        amount: Option<f64>,
        receipt_text: &str,
        description: &str,
    ) -> Option<Self> {
        let line = result.budget_line.as_ref()?;
        Some(Self {
            line_item: line.id.clone(),
            amount: amount.unwrap_or(0.0),
            description: if description.is_empty() {
                format!("Auto-filled from receipt for {}", line.name)
            } else {
                description.to_string()
            },
            receipt_text: receipt_text.to_string(),
            confidence: result.confidence,
        })
    }

    /// 金額が未入力か
    pub fn needs_amount(&self) -> bool {
        self.amount <= 0.0
    }
}
