//! 工程マイルストーン検出
//!
//! テキストに工程キーワードが含まれる場合、基本信頼度70%に
//! 関連語1つにつき10%を加算する（上限100%）。

use serde::{Deserialize, Serialize};

/// 基本信頼度
const BASE_CONFIDENCE: u32 = 70;
/// 関連語1つあたりの加算
const TERM_CONFIDENCE: u32 = 10;
/// 上限
const MAX_CONFIDENCE: u32 = 100;

/// (工程キーワード, 関連語)
const MILESTONES: &[(&str, &[&str])] = &[
    ("foundation", &["footing", "concrete", "pour", "pier"]),
    ("slab", &["concrete", "pour", "mesh", "reinforcement"]),
    ("frame", &["timber", "stud", "truss", "wall"]),
    ("lockup", &["door", "window", "lock", "external"]),
    ("roofing", &["roof", "tile", "gutter", "sheet"]),
    ("plumbing", &["pipe", "drain", "water", "rough-in"]),
    ("electrical", &["wire", "cable", "switch", "rough-in"]),
    ("insulation", &["batts", "ceiling", "sarking", "wall"]),
    ("drywall", &["plaster", "sheet", "board", "cornice"]),
    ("flooring", &["tile", "timber", "carpet", "vinyl"]),
    ("painting", &["paint", "coat", "primer", "colour"]),
    ("handover", &["keys", "final", "certificate", "owner"]),
    ("inspection", &["inspector", "certificate", "approval", "report"]),
    ("completion", &["final", "practical", "certificate", "defects"]),
];

/// マイルストーン検出結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneMatch {
    pub milestone: String,
    /// 信頼度（%、上限100）
    pub confidence: u32,
    pub matched_terms: Vec<String>,
}

/// 工程キーワード一覧
pub fn milestone_names() -> impl Iterator<Item = &'static str> {
    MILESTONES.iter().map(|(name, _)| *name)
}

/// テキストからマイルストーンを検出（信頼度降順、同点は表の順）
pub fn detect_milestones(text: &str) -> Vec<MilestoneMatch> {
    let text = text.to_lowercase();
    let mut found: Vec<MilestoneMatch> = MILESTONES
        .iter()
        .filter(|(name, _)| text.contains(name))
        .map(|(name, terms)| {
            let matched_terms: Vec<String> = terms
                .iter()
                .filter(|t| text.contains(*t))
                .map(|t| t.to_string())
                .collect();
            let confidence = (BASE_CONFIDENCE + TERM_CONFIDENCE * matched_terms.len() as u32)
                .min(MAX_CONFIDENCE);
            MilestoneMatch {
                milestone: name.to_string(),
                confidence,
                matched_terms,
            }
        })
        .collect();

    found.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    found
}
