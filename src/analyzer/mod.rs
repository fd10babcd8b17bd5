//! 解析パイプライン
//!
//! OCR完了後のテキストに対して、予算項目照合・金額抽出・マイルストーン検出を行う。
//! 照合は純粋関数なので領収書ごとに並列実行する。

mod types;

pub use types::{Alternative, ReceiptAnalysis, ReviewStatus};

use crate::error::Result;
use crate::ocr::OcrOutcome;
use rayon::prelude::*;
use receipt_claim_common::{
    detect_milestones, extract_amount, AmountPolicy, BudgetCatalogue, BudgetMatcher,
};
use std::path::Path;

/// 代替候補の最大件数
const MAX_ALTERNATIVES: usize = 3;

/// 照合設定
pub struct AnalysisContext<'a> {
    pub catalogue: &'a BudgetCatalogue,
    pub matcher: &'a BudgetMatcher,
    pub amount_policy: AmountPolicy,
}

/// 1件のOCRテキストを解析
pub fn analyze_text(file_name: &str, text: &str, ctx: &AnalysisContext<'_>) -> ReceiptAnalysis {
    let lines = ctx.catalogue.lines();
    let result = ctx.matcher.match_text(text, lines);
    let ranked = ctx.matcher.rank(text, lines);

    if let Some(name) = result.line_name() {
        tracing::debug!("{}: {} (confidence {})", file_name, name, result.confidence);
    } else {
        tracing::debug!("{}: 該当なし", file_name);
    }

    let alternatives = ranked
        .iter()
        .skip(1)
        .take(MAX_ALTERNATIVES)
        .map(|c| Alternative {
            line_id: c.budget_line.id.clone(),
            line_name: c.budget_line.name.clone(),
            score: c.score,
        })
        .collect();

    ReceiptAnalysis {
        file_name: file_name.to_string(),
        ocr_text: text.to_string(),
        amount: extract_amount(text, ctx.amount_policy),
        line_id: result.budget_line.as_ref().map(|l| l.id.clone()),
        line_name: result.budget_line.as_ref().map(|l| l.name.clone()),
        confidence: result.confidence,
        alternatives,
        milestones: detect_milestones(text),
        ..Default::default()
    }
}

/// OCR結果一式を解析（出力順はスキャン順）
///
/// OCRに失敗した領収書は照合せず、エラー内容だけを記録する。
pub fn analyze_outcomes(outcomes: &[OcrOutcome], ctx: &AnalysisContext<'_>) -> Vec<ReceiptAnalysis> {
    outcomes
        .par_iter()
        .map(|outcome| {
            let receipt = &outcome.receipt;
            let mut analysis = match &outcome.text {
                Ok(text) => analyze_text(&receipt.file_name, text, ctx),
                Err(e) => ReceiptAnalysis {
                    file_name: receipt.file_name.clone(),
                    ocr_error: Some(e.clone()),
                    ..Default::default()
                },
            };
            analysis.file_path = receipt.path.display().to_string();
            analysis.date = receipt.date.clone().unwrap_or_default();
            analysis
        })
        .collect()
}

/// 解析結果JSONを読み込み
pub fn load_analyses(path: &Path) -> Result<Vec<ReceiptAnalysis>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// 解析結果JSONを保存
pub fn save_analyses(path: &Path, analyses: &[ReceiptAnalysis]) -> Result<()> {
    let json = serde_json::to_string_pretty(analyses)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ReceiptImage;
    use std::path::PathBuf;

    fn ctx_parts() -> (BudgetCatalogue, BudgetMatcher) {
        (BudgetCatalogue::builtin(), BudgetMatcher::default())
    }

    #[test]
    fn test_analyze_text_concrete() {
        let (catalogue, matcher) = ctx_parts();
        let ctx = AnalysisContext {
            catalogue: &catalogue,
            matcher: &matcher,
            amount_policy: AmountPolicy::Largest,
        };
        let a = analyze_text("r1.jpg", "ABC Concrete Supply Co - concrete delivery $1,200", &ctx);
        assert_eq!(a.line_id.as_deref(), Some("1"));
        assert_eq!(a.line_name.as_deref(), Some("Foundation Materials"));
        assert_eq!(a.confidence, 90);
        assert_eq!(a.amount, Some(1200.0));
        assert_eq!(a.review, ReviewStatus::Pending);
    }

    #[test]
    fn test_analyze_text_no_match() {
        let (catalogue, matcher) = ctx_parts();
        let ctx = AnalysisContext {
            catalogue: &catalogue,
            matcher: &matcher,
            amount_policy: AmountPolicy::First,
        };
        let a = analyze_text("lunch.jpg", "Coffee and sandwiches $12.50", &ctx);
        assert!(!a.is_matched());
        assert_eq!(a.confidence, 0);
        assert!(a.alternatives.is_empty());
        assert_eq!(a.amount, Some(12.5));
    }

    #[test]
    fn test_alternatives_exclude_best() {
        let (catalogue, matcher) = ctx_parts();
        let ctx = AnalysisContext {
            catalogue: &catalogue,
            matcher: &matcher,
            amount_policy: AmountPolicy::Largest,
        };
        let a = analyze_text("mixed.jpg", "timber and concrete supply", &ctx);
        assert_eq!(a.line_id.as_deref(), Some("1"));
        assert!(!a.alternatives.is_empty());
        assert!(a.alternatives.iter().all(|alt| alt.line_id != "1"));
        assert_eq!(a.alternatives[0].line_id, "3");
    }

    #[test]
    fn test_analyze_outcomes_keeps_order_and_failures() {
        let (catalogue, matcher) = ctx_parts();
        let ctx = AnalysisContext {
            catalogue: &catalogue,
            matcher: &matcher,
            amount_policy: AmountPolicy::Largest,
        };
        let receipt = |name: &str| ReceiptImage {
            path: PathBuf::from(format!("/r/{}", name)),
            file_name: name.to_string(),
            date: Some("2026:03:01 10:00:00".into()),
        };
        let outcomes = vec![
            OcrOutcome { receipt: receipt("a.jpg"), text: Ok("paint 4L $89.00".into()), cached: false },
            OcrOutcome { receipt: receipt("b.jpg"), text: Err("tesseract failed".into()), cached: false },
            OcrOutcome { receipt: receipt("c.jpg"), text: Ok("excavator hire".into()), cached: true },
        ];

        let results = analyze_outcomes(&outcomes, &ctx);
        let names: Vec<&str> = results.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);

        assert_eq!(results[0].line_id.as_deref(), Some("10"));
        assert!(results[1].ocr_error.is_some());
        assert!(!results[1].is_matched());
        assert_eq!(results[1].file_path, "/r/b.jpg");
        assert_eq!(results[2].line_id.as_deref(), Some("8"));
        assert_eq!(results[2].date, "2026:03:01 10:00:00");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claims.json");
        let analyses = vec![ReceiptAnalysis {
            file_name: "a.jpg".into(),
            line_id: Some("1".into()),
            confidence: 70,
            ..Default::default()
        }];
        save_analyses(&path, &analyses).unwrap();
        let loaded = load_analyses(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].line_id.as_deref(), Some("1"));
        assert_eq!(loaded[0].confidence, 70);
    }
}
