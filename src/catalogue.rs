//! 予算カタログの読み込み
//!
//! 拡張子で形式を判定する（.json / .csv / .xlsx・.xls）。
//! 指定がなければ組み込みカタログを使う。

use crate::error::{ReceiptClaimError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use receipt_claim_common::{BudgetCatalogue, BudgetLine};
use std::path::Path;

pub fn load_catalogue(path: Option<&Path>) -> Result<BudgetCatalogue> {
    let Some(path) = path else {
        return Ok(BudgetCatalogue::builtin());
    };

    if !path.exists() {
        return Err(ReceiptClaimError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let catalogue = match ext.as_str() {
        "json" => BudgetCatalogue::from_json_file(path)?,
        "csv" => BudgetCatalogue::from_csv_file(path)?,
        "xlsx" | "xls" | "xlsm" => from_excel(path)?,
        _ => {
            return Err(ReceiptClaimError::InvalidCatalogue(format!(
                "未対応の形式です（json/csv/xlsx）: {}",
                path.display()
            )))
        }
    };

    tracing::debug!("予算カタログ読み込み: {} ({}件)", path.display(), catalogue.len());
    Ok(catalogue)
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) if f.fract() == 0.0 => format!("{}", *f as i64),
        Some(Data::Float(f)) => f.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn cell_number(cell: Option<&Data>) -> Option<f64> {
    match cell {
        Some(Data::Int(i)) => Some(*i as f64),
        Some(Data::Float(f)) => Some(*f),
        Some(Data::String(s)) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
            cleaned.parse().ok()
        }
        _ => None,
    }
}

/// 先頭シートから読み込み（列順はCSVと同じ、1行目はヘッダー）
fn from_excel(path: &Path) -> Result<BudgetCatalogue> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ReceiptClaimError::InvalidCatalogue(format!("Excel読み込みエラー: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReceiptClaimError::InvalidCatalogue("シートがありません".into()))?
        .map_err(|e| ReceiptClaimError::InvalidCatalogue(format!("シート読み込みエラー: {}", e)))?;

    let mut lines = Vec::new();
    for (i, row) in range.rows().enumerate().skip(1) {
        let id = cell_text(row.first());
        if id.is_empty() {
            continue;
        }

        let amount = cell_number(row.get(3)).ok_or_else(|| {
            ReceiptClaimError::InvalidCatalogue(format!("{}行目: 予算額が不正です", i + 1))
        })?;
        let remaining = cell_number(row.get(5)).unwrap_or(amount);

        lines.push(BudgetLine {
            id,
            name: cell_text(row.get(1)),
            keyword: cell_text(row.get(2)),
            amount,
            category: cell_text(row.get(4)).parse().unwrap_or_default(),
            remaining,
        });
    }

    Ok(BudgetCatalogue::new(lines)?)
}
