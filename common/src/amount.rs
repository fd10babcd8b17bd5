//! 金額抽出
//!
//! OCRテキストから通貨らしいトークン（`$1,234.56` 等）を抽出する。

use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref AMOUNT_RE: Regex = Regex::new(r"\$?\d{1,3}(?:,\d{3})*(?:\.\d{2})?").unwrap();
}

/// 複数の金額候補から1つを選ぶ方針
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountPolicy {
    /// テキスト中で最初に現れた金額
    First,
    /// 最大の金額（領収書の合計額は通常最大）
    #[default]
    Largest,
}

impl std::str::FromStr for AmountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(AmountPolicy::First),
            "largest" | "max" => Ok(AmountPolicy::Largest),
            _ => Err(format!("Unknown amount policy: {}. Use first or largest", s)),
        }
    }
}

impl std::fmt::Display for AmountPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmountPolicy::First => write!(f, "first"),
            AmountPolicy::Largest => write!(f, "largest"),
        }
    }
}

/// 金額トークンを数値化（`$` とカンマを除去）
fn parse_token(token: &str) -> Option<f64> {
    let cleaned: String = token.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned.parse::<f64>().ok()
}

/// テキスト中の金額をすべて出現順に抽出
pub fn extract_amounts(text: &str) -> Vec<f64> {
    AMOUNT_RE
        .find_iter(text)
        .filter_map(|m| parse_token(m.as_str()))
        .collect()
}

/// 方針に従って金額を1つ抽出
pub fn extract_amount(text: &str, policy: AmountPolicy) -> Option<f64> {
    let amounts = extract_amounts(text);
    match policy {
        AmountPolicy::First => amounts.first().copied(),
        AmountPolicy::Largest => amounts.into_iter().reduce(f64::max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_amounts_in_order() {
        let amounts = extract_amounts("Total: $1,234.56 after subtotal $1,000.00");
        assert_eq!(amounts, vec![1234.56, 1000.0]);
    }

    #[test]
    fn test_total_first_both_policies_agree() {
        let text = "Total: $1,234.56 after subtotal $1,000.00";
        assert_eq!(extract_amount(text, AmountPolicy::First), Some(1234.56));
        assert_eq!(extract_amount(text, AmountPolicy::Largest), Some(1234.56));
    }

    #[test]
    fn test_reversed_order_policies_diverge() {
        let text = "Subtotal $1,000.00 GST $100.00 Total $1,234.56";
        assert_eq!(extract_amount(text, AmountPolicy::First), Some(1000.0));
        assert_eq!(extract_amount(text, AmountPolicy::Largest), Some(1234.56));
    }

    #[test]
    fn test_unformatted_thousands_split() {
        // 桁区切りのない4桁以上は3桁で切れる
        let text = "Total $2450.00";
        assert_eq!(extract_amounts(text), vec![245.0, 0.0]);
        assert_eq!(extract_amount(text, AmountPolicy::First), Some(245.0));
        assert_eq!(extract_amount(text, AmountPolicy::Largest), Some(245.0));
    }

    #[test]
    fn test_no_amount() {
        assert_eq!(extract_amount("no figures here", AmountPolicy::Largest), None);
        assert_eq!(extract_amount("", AmountPolicy::First), None);
    }

    #[test]
    fn test_without_dollar_sign() {
        assert_eq!(extract_amount("paid 12.50 cash", AmountPolicy::First), Some(12.5));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("first".parse::<AmountPolicy>().unwrap(), AmountPolicy::First);
        assert_eq!("Largest".parse::<AmountPolicy>().unwrap(), AmountPolicy::Largest);
        assert!("median".parse::<AmountPolicy>().is_err());
        assert_eq!(AmountPolicy::default(), AmountPolicy::Largest);
    }
}
