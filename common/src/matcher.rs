//! 予算項目照合モジュール
//!
//! OCRテキストと予算項目カタログを照合し、最もスコアの高い項目を推薦する。
//!
//! ## スコア規則（項目ごとに独立して加算）
//! 1. 項目キーワードがテキストに含まれる: +60
//! 2. カテゴリ別キーワードが含まれる: 1語につき +10（同一語は1回のみ）
//! 3. ドメインブースト（項目名パターン × テキスト語）: ルールごとの加点
//!
//! スコアは正規化しない。100を超えることもある。

use crate::types::{BudgetCategory, BudgetLine, MatchCandidate, MatchResult};
use serde::{Deserialize, Serialize};

/// キーワード一致の加点
pub const KEYWORD_POINTS: u32 = 60;

/// カテゴリキーワード1語あたりの加点
pub const CATEGORY_POINTS: u32 = 10;

/// カテゴリ別キーワード表
pub fn category_keywords(category: BudgetCategory) -> &'static [&'static str] {
    match category {
        BudgetCategory::Materials => &["supply", "material", "hardware", "lumber", "steel", "brick"],
        BudgetCategory::Labor => &["labor", "labour", "contractor", "service", "work", "installation"],
        BudgetCategory::Equipment => &["rental", "hire", "equipment", "machinery", "tools"],
        BudgetCategory::Other => &[],
    }
}

/// ドメインブーストルール
///
/// 項目名（小文字）に `name_pattern` を含み、かつテキストに `text_term` を含む場合に `bonus` を加点。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainBoost {
    pub name_pattern: String,
    pub text_term: String,
    pub bonus: u32,
}

impl DomainBoost {
    pub fn new(name_pattern: &str, text_term: &str, bonus: u32) -> Self {
        Self {
            name_pattern: name_pattern.to_lowercase(),
            text_term: text_term.to_lowercase(),
            bonus,
        }
    }

    fn applies(&self, line_name: &str, text: &str) -> bool {
        !self.name_pattern.is_empty()
            && !self.text_term.is_empty()
            && line_name.contains(self.name_pattern.as_str())
            && text.contains(self.text_term.as_str())
    }
}

/// 組み込みのドメインブースト
pub fn default_boosts() -> Vec<DomainBoost> {
    vec![
        DomainBoost::new("foundation", "concrete", 20),
        DomainBoost::new("timber", "wood", 20),
        DomainBoost::new("electrical", "wire", 20),
    ]
}

/// 照合ルール一式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRules {
    pub keyword_points: u32,
    pub category_points: u32,
    pub boosts: Vec<DomainBoost>,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            keyword_points: KEYWORD_POINTS,
            category_points: CATEGORY_POINTS,
            boosts: default_boosts(),
        }
    }
}

impl MatchRules {
    /// 組み込みルールに追加ブーストを足したもの
    pub fn with_extra_boosts(extra: &[DomainBoost]) -> Self {
        let mut rules = Self::default();
        rules.boosts.extend(extra.iter().map(|b| DomainBoost::new(&b.name_pattern, &b.text_term, b.bonus)));
        rules
    }
}

/// 予算項目照合器
#[derive(Debug, Clone, Default)]
pub struct BudgetMatcher {
    rules: MatchRules,
}

impl BudgetMatcher {
    pub fn new(rules: MatchRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    /// 1項目のスコアを計算
    ///
    /// `text` は小文字化済みであること。
    pub fn score_line(&self, text: &str, line: &BudgetLine) -> u32 {
        if text.is_empty() {
            return 0;
        }

        let mut score = 0;

        let keyword = line.keyword.trim().to_lowercase();
        if !keyword.is_empty() && text.contains(keyword.as_str()) {
            score += self.rules.keyword_points;
        }

        // 表に重複語はないが、同一語は1回のみ数える
        let mut seen: Vec<&str> = Vec::new();
        for &word in category_keywords(line.category) {
            if !seen.contains(&word) && text.contains(word) {
                seen.push(word);
                score += self.rules.category_points;
            }
        }

        let name = line.name.to_lowercase();
        for boost in &self.rules.boosts {
            if boost.applies(&name, text) {
                score += boost.bonus;
            }
        }

        score
    }

    /// 最高スコアの項目を返す（同点は先勝ち、スコア0は一致なし）
    pub fn match_text(&self, text: &str, lines: &[BudgetLine]) -> MatchResult {
        let text = text.to_lowercase();
        let mut best: Option<&BudgetLine> = None;
        let mut best_score = 0;

        for line in lines {
            let score = self.score_line(&text, line);
            if score > best_score {
                best_score = score;
                best = Some(line);
            }
        }

        MatchResult {
            budget_line: best.cloned(),
            confidence: best_score,
        }
    }

    /// スコアが正の項目をスコア降順で返す（同点はカタログ順）
    pub fn rank(&self, text: &str, lines: &[BudgetLine]) -> Vec<MatchCandidate> {
        let text = text.to_lowercase();
        let mut candidates: Vec<MatchCandidate> = lines
            .iter()
            .filter_map(|line| {
                let score = self.score_line(&text, line);
                (score > 0).then(|| MatchCandidate {
                    budget_line: line.clone(),
                    score,
                })
            })
            .collect();

        // sort_by は安定ソート
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }
}

/// 組み込みルールで照合
pub fn match_budget_line(text: &str, lines: &[BudgetLine]) -> MatchResult {
    BudgetMatcher::default().match_text(text, lines)
}

/// 組み込みルールで候補一覧を取得
pub fn rank_budget_lines(text: &str, lines: &[BudgetLine]) -> Vec<MatchCandidate> {
    BudgetMatcher::default().rank(text, lines)
}
