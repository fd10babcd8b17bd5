//! 予算項目カタログ
//!
//! 組み込みシード、JSON、CSVから予算項目一覧を構築する。

use crate::error::{Error, Result};
use crate::types::{BudgetCategory, BudgetLine};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 予算項目カタログ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetCatalogue {
    lines: Vec<BudgetLine>,
}

impl BudgetCatalogue {
    /// 検証付きで構築
    pub fn new(lines: Vec<BudgetLine>) -> Result<Self> {
        let catalogue = Self { lines };
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// 組み込みシードカタログ
    pub fn builtin() -> Self {
        let seed = [
            ("1", "Foundation Materials", "concrete", 15000.0, BudgetCategory::Materials, 12000.0),
            ("2", "Slab Reinforcement", "mesh", 6000.0, BudgetCategory::Materials, 6000.0),
            ("3", "Framing Timber", "timber", 22000.0, BudgetCategory::Materials, 18500.0),
            ("4", "Roofing Materials", "roof", 14000.0, BudgetCategory::Materials, 14000.0),
            ("5", "Plumbing Rough-In", "plumb", 9000.0, BudgetCategory::Labor, 9000.0),
            ("6", "Electrical Installation", "electric", 11000.0, BudgetCategory::Labor, 10200.0),
            ("7", "Site Labour", "labour", 30000.0, BudgetCategory::Labor, 24000.0),
            ("8", "Equipment Hire", "excavator", 8000.0, BudgetCategory::Equipment, 6500.0),
            ("9", "Plasterboard & Linings", "plaster", 7500.0, BudgetCategory::Materials, 7500.0),
            ("10", "Painting", "paint", 5000.0, BudgetCategory::Labor, 5000.0),
        ];

        let lines = seed
            .iter()
            .map(|(id, name, keyword, amount, category, remaining)| BudgetLine {
                id: id.to_string(),
                name: name.to_string(),
                keyword: keyword.to_string(),
                amount: *amount,
                category: *category,
                remaining: *remaining,
            })
            .collect();

        Self { lines }
    }

    /// JSON配列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let lines: Vec<BudgetLine> = serde_json::from_str(json)?;
        Self::new(lines)
    }

    /// JSONファイルから読み込み
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// CSV文字列から読み込み
    ///
    /// 列: `id,name,keyword,amount,category,remaining`（1行目はヘッダー）
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut lines = Vec::new();

        for (line_no, line) in content.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let fields = parse_csv_line(line);
            if fields.len() < 6 {
                return Err(Error::csv(
                    line_no + 1,
                    format!("expected 6 columns, got {}", fields.len()),
                ));
            }

            lines.push(BudgetLine {
                id: fields[0].to_string(),
                name: fields[1].to_string(),
                keyword: fields[2].to_string(),
                amount: parse_money(fields[3])
                    .ok_or_else(|| Error::csv(line_no + 1, format!("invalid amount '{}'", fields[3])))?,
                category: fields[4].parse().unwrap_or_default(),
                remaining: parse_money(fields[5])
                    .ok_or_else(|| Error::csv(line_no + 1, format!("invalid remaining '{}'", fields[5])))?,
            });
        }

        Self::new(lines)
    }

    /// CSVファイルから読み込み
    pub fn from_csv_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv_str(&content)
    }

    /// 空でない・IDが一意・金額が非負であることを確認
    pub fn validate(&self) -> Result<()> {
        if self.lines.is_empty() {
            return Err(Error::InvalidCatalogue("budget catalogue is empty".into()));
        }

        let mut ids = HashSet::new();
        for line in &self.lines {
            if line.id.trim().is_empty() {
                return Err(Error::InvalidCatalogue(format!("budget line '{}' has no id", line.name)));
            }
            if !ids.insert(line.id.as_str()) {
                return Err(Error::InvalidCatalogue(format!("duplicate budget line id: {}", line.id)));
            }
            if line.amount < 0.0 || line.remaining < 0.0 {
                return Err(Error::InvalidCatalogue(format!("negative amount in budget line {}", line.id)));
            }
        }

        Ok(())
    }

    pub fn lines(&self) -> &[BudgetLine] {
        &self.lines
    }

    pub fn find(&self, id: &str) -> Option<&BudgetLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn parse_money(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned.parse().ok()
}

/// CSV1行を分割（ダブルクォート内のカンマは区切りとみなさない）
fn parse_csv_line(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut field_start = 0;

    for (i, c) in line.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == ',' && !in_quotes {
            fields.push(trim_quotes(&line[field_start..i]));
            field_start = i + 1;
        }
    }
    fields.push(trim_quotes(&line[field_start..]));

    fields
}

fn trim_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}
