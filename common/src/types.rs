//! 共通型定義
//!
//! 予算項目・照合結果・請求ドラフトのデータ構造

use serde::{Deserialize, Serialize};

/// 予算項目のカテゴリ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum BudgetCategory {
    Materials,
    Labor,
    Equipment,
    #[default]
    Other,
}

impl BudgetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetCategory::Materials => "materials",
            BudgetCategory::Labor => "labor",
            BudgetCategory::Equipment => "equipment",
            BudgetCategory::Other => "other",
        }
    }
}

impl std::str::FromStr for BudgetCategory {
    type Err = String;

    /// 未知のカテゴリは `Other` として扱う
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "materials" | "material" => BudgetCategory::Materials,
            "labor" | "labour" => BudgetCategory::Labor,
            "equipment" => BudgetCategory::Equipment,
            _ => BudgetCategory::Other,
        })
    }
}

// JSONもCSV/Excelと同じ規則で読む
impl From<String> for BudgetCategory {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 予算項目（カタログの1エントリ）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub id: String,
    pub name: String,
    /// 照合キーワード（例: "concrete"）
    pub keyword: String,
    /// 予算額
    pub amount: f64,
    #[serde(default)]
    pub category: BudgetCategory,
    /// 残額（請求承認時に外部で更新される）
    pub remaining: f64,
}

/// 照合結果
///
/// `confidence` は加点方式のヒューリスティックスコアで、100を超えることがある。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub budget_line: Option<BudgetLine>,
    pub confidence: u32,
}

impl MatchResult {
    /// 一致なし
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_match(&self) -> bool {
        self.budget_line.is_some()
    }

    pub fn line_name(&self) -> Option<&str> {
        self.budget_line.as_ref().map(|l| l.name.as_str())
    }
}

/// スコア付き候補（レビュー時の代替案）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub budget_line: BudgetLine,
    pub score: u32,
}

/// 出来高請求ドラフト（保存エンドポイントへのPOSTボディ）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftClaim {
    /// 予算項目ID
    pub line_item: String,
    pub amount: f64,
    pub description: String,
    pub receipt_text: String,
    pub confidence: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_deserialize() {
        let c: BudgetCategory = serde_json::from_str("\"materials\"").unwrap();
        assert_eq!(c, BudgetCategory::Materials);
        let c: BudgetCategory = serde_json::from_str("\"labour\"").unwrap();
        assert_eq!(c, BudgetCategory::Labor);
        let c: BudgetCategory = serde_json::from_str("\"Material\"").unwrap();
        assert_eq!(c, BudgetCategory::Materials);
        let c: BudgetCategory = serde_json::from_str("\"permits\"").unwrap();
        assert_eq!(c, BudgetCategory::Other);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Materials".parse::<BudgetCategory>().unwrap(), BudgetCategory::Materials);
        assert_eq!(" labour ".parse::<BudgetCategory>().unwrap(), BudgetCategory::Labor);
        assert_eq!("misc".parse::<BudgetCategory>().unwrap(), BudgetCategory::Other);
    }

    #[test]
    fn test_budget_line_json() {
        let json = r#"{"id":"1","name":"Foundation Materials","keyword":"concrete","amount":15000,"category":"materials","remaining":12000}"#;
        let line: BudgetLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.name, "Foundation Materials");
        assert_eq!(line.category, BudgetCategory::Materials);
        assert_eq!(line.remaining, 12000.0);
    }

    #[test]
    fn test_draft_claim_camel_case() {
        let draft = DraftClaim {
            line_item: "1".into(),
            amount: 1200.0,
            description: "test".into(),
            receipt_text: "concrete".into(),
            confidence: 90,
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["lineItem"], "1");
        assert_eq!(value["receiptText"], "concrete");
        assert_eq!(value["confidence"], 90);
    }

    #[test]
    fn test_match_result_none() {
        let r = MatchResult::none();
        assert!(!r.is_match());
        assert_eq!(r.confidence, 0);
        assert_eq!(r.line_name(), None);
    }
}
