//! 対話式レビューモジュール
//!
//! 推薦された予算項目を確認し、採用・変更・対象外を決める。

use crate::analyzer::{load_analyses, save_analyses, ReceiptAnalysis, ReviewStatus};
use crate::error::{ReceiptClaimError, Result};
use dialoguer::{Input, Select};
use receipt_claim_common::BudgetCatalogue;
use std::path::Path;

/// 未レビューでOCRに成功した領収書のインデックス
pub fn pending_indices(analyses: &[ReceiptAnalysis]) -> Vec<usize> {
    analyses
        .iter()
        .enumerate()
        .filter(|(_, a)| a.review == ReviewStatus::Pending && a.ocr_error.is_none())
        .map(|(i, _)| i)
        .collect()
}

/// レビュー操作
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewAction {
    /// 推薦を採用
    Accept,
    /// 指定IDの予算項目に変更
    Choose(String),
    /// 請求対象外
    Reject,
    /// この領収書をスキップ
    Skip,
    /// 保存して終了
    Quit,
}

/// 操作を適用（推薦なしの採用・未知IDの指定はエラー）
pub fn apply_action(
    analysis: &mut ReceiptAnalysis,
    action: &ReviewAction,
    catalogue: &BudgetCatalogue,
) -> Result<()> {
    match action {
        ReviewAction::Accept => {
            if !analysis.is_matched() {
                return Err(ReceiptClaimError::CliExecution(format!(
                    "{}: 推薦された予算項目がありません",
                    analysis.file_name
                )));
            }
            analysis.review = ReviewStatus::Accepted;
        }
        ReviewAction::Choose(id) => {
            let line = catalogue
                .find(id)
                .ok_or_else(|| ReceiptClaimError::InvalidCatalogue(format!("予算項目IDが見つかりません: {}", id)))?;

            if analysis.line_id.as_deref() == Some(id.as_str()) {
                analysis.review = ReviewStatus::Accepted;
                return Ok(());
            }

            analysis.confidence = analysis
                .alternatives
                .iter()
                .find(|alt| alt.line_id == *id)
                .map(|alt| alt.score)
                .unwrap_or(0);
            analysis.line_id = Some(line.id.clone());
            analysis.line_name = Some(line.name.clone());
            analysis.review = ReviewStatus::Overridden;
        }
        ReviewAction::Reject => analysis.review = ReviewStatus::Rejected,
        ReviewAction::Skip | ReviewAction::Quit => {}
    }
    Ok(())
}

/// 対話式レビュー
pub fn run_interactive_review(
    input_path: &Path,
    output_path: Option<&Path>,
    catalogue: &BudgetCatalogue,
) -> Result<()> {
    let mut analyses = load_analyses(input_path)?;
    let pending = pending_indices(&analyses);

    if pending.is_empty() {
        println!("✓ 未レビューの領収書はありません");
        return Ok(());
    }

    println!("🧾 未レビューの領収書: {}件\n", pending.len());

    // 途中で失敗しても、それまでの判断は保存する
    let outcome = review_pending(&mut analyses, &pending, catalogue);

    let output = output_path.unwrap_or(input_path);
    save_analyses(output, &analyses)?;
    println!("\n✓ 保存しました: {}", output.display());

    outcome
}

fn review_pending(
    analyses: &mut [ReceiptAnalysis],
    pending: &[usize],
    catalogue: &BudgetCatalogue,
) -> Result<()> {
    for (count, &idx) in pending.iter().enumerate() {
        let analysis = &analyses[idx];
        println!("[{}/{}] {}", count + 1, pending.len(), analysis.file_name);
        let preview: String = analysis.ocr_text.chars().take(160).collect();
        println!("  OCR: {}", preview.replace('\n', " "));
        match analysis.amount {
            Some(amount) => println!("  金額: ${:.2}", amount),
            None => println!("  金額: (抽出できず)"),
        }
        if let Some(m) = analysis.milestones.first() {
            println!("  工程: {} ({}%)", m.milestone, m.confidence);
        }

        let action = prompt_review_action(analysis, catalogue)?;
        if action == ReviewAction::Quit {
            println!("保存して終了します...");
            break;
        }

        let analysis = &mut analyses[idx];
        if let Err(e) = apply_action(analysis, &action, catalogue) {
            println!("  ⚠ {}（未レビューのまま）\n", e);
            continue;
        }

        if matches!(analysis.review, ReviewStatus::Accepted | ReviewStatus::Overridden) && analysis.amount.is_none() {
            analysis.amount = prompt_amount()?;
        }

        match analysis.review {
            ReviewStatus::Pending => println!("  → スキップ\n"),
            ReviewStatus::Rejected => println!("  → 対象外\n"),
            _ => println!("  → {}\n", analysis.line_name.as_deref().unwrap_or("-")),
        }
    }

    Ok(())
}

fn prompt_review_action(analysis: &ReceiptAnalysis, catalogue: &BudgetCatalogue) -> Result<ReviewAction> {
    let mut items = Vec::new();
    let mut actions = Vec::new();

    if let (Some(_), Some(name)) = (&analysis.line_id, &analysis.line_name) {
        items.push(format!("採用: {} (スコア {})", name, analysis.confidence));
        actions.push(ReviewAction::Accept);
    }
    for alt in &analysis.alternatives {
        items.push(format!("変更: {} (スコア {})", alt.line_name, alt.score));
        actions.push(ReviewAction::Choose(alt.line_id.clone()));
    }
    items.push("カタログから選択...".to_string());
    actions.push(ReviewAction::Choose(String::new()));
    items.push("対象外".to_string());
    actions.push(ReviewAction::Reject);
    items.push("スキップ".to_string());
    actions.push(ReviewAction::Skip);
    items.push("保存して終了".to_string());
    actions.push(ReviewAction::Quit);

    let selection = Select::new()
        .with_prompt("操作")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| ReceiptClaimError::CliExecution(e.to_string()))?;

    match &actions[selection] {
        ReviewAction::Choose(id) if id.is_empty() => {
            let names: Vec<String> = catalogue
                .lines()
                .iter()
                .map(|l| format!("{} ({})", l.name, l.category))
                .collect();
            let picked = Select::new()
                .with_prompt("予算項目")
                .items(&names)
                .default(0)
                .interact()
                .map_err(|e| ReceiptClaimError::CliExecution(e.to_string()))?;
            Ok(ReviewAction::Choose(catalogue.lines()[picked].id.clone()))
        }
        action => Ok(action.clone()),
    }
}

/// 金額入力を解釈（空欄は未入力、`$` と桁区切りは無視）
pub fn parse_amount(input: &str) -> std::result::Result<Option<f64>, String> {
    let cleaned: String = input.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(Some(amount)),
        _ => Err(format!("金額が不正です: {}", input.trim())),
    }
}

/// 解釈できるまで再入力させる
fn prompt_amount() -> Result<Option<f64>> {
    let input: String = Input::new()
        .with_prompt("金額 (空欄で未入力)")
        .allow_empty(true)
        .validate_with(|input: &String| parse_amount(input).map(|_| ()))
        .interact_text()
        .map_err(|e| ReceiptClaimError::CliExecution(e.to_string()))?;

    parse_amount(&input).map_err(ReceiptClaimError::CliExecution)
}
