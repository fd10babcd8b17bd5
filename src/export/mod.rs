pub mod excel;

use crate::analyzer::ReceiptAnalysis;
use crate::error::Result;
use receipt_claim_common::BudgetCatalogue;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 予算項目ごとの集計行
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummaryRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub budget: f64,
    pub remaining: f64,
    /// 今回の請求対象（対象外を除く）の合計
    pub claimed: f64,
}

impl BudgetSummaryRow {
    /// 請求後残額（マイナスは超過）
    pub fn remaining_after(&self) -> f64 {
        self.remaining - self.claimed
    }
}

/// カタログ順に予算項目ごとの請求額を集計
pub fn budget_summary(analyses: &[ReceiptAnalysis], catalogue: &BudgetCatalogue) -> Vec<BudgetSummaryRow> {
    let mut claimed: HashMap<&str, f64> = HashMap::new();
    for a in analyses.iter().filter(|a| a.is_claimable(true)) {
        if let (Some(id), Some(amount)) = (a.line_id.as_deref(), a.amount) {
            *claimed.entry(id).or_insert(0.0) += amount;
        }
    }

    catalogue
        .lines()
        .iter()
        .map(|line| BudgetSummaryRow {
            id: line.id.clone(),
            name: line.name.clone(),
            category: line.category.to_string(),
            budget: line.amount,
            remaining: line.remaining,
            claimed: claimed.get(line.id.as_str()).copied().unwrap_or(0.0),
        })
        .collect()
}

fn output_path_for(output: &Path, title: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.xlsx", title))
    } else {
        output.to_path_buf()
    }
}

/// 請求台帳を出力し、出力先パスを返す
pub fn export_register(
    analyses: &[ReceiptAnalysis],
    catalogue: &BudgetCatalogue,
    output: &Path,
    title: &str,
) -> Result<PathBuf> {
    let output_path = output_path_for(output, title);
    let summary = budget_summary(analyses, catalogue);
    println!("- Excelを生成中...");
    excel::generate_excel(analyses, &summary, &output_path, title)?;
    println!("✔ Excel出力: {}", output_path.display());
    Ok(output_path)
}
