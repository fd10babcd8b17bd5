//! Receipt Claim Common Library
//!
//! CLIと他フロントエンドで共有される型と照合ロジック

pub mod types;
pub mod error;
pub mod matcher;
pub mod amount;
pub mod milestone;
pub mod catalogue;
pub mod draft;

pub use types::{BudgetCategory, BudgetLine, MatchCandidate, MatchResult, DraftClaim};
pub use error::{Error, Result};
pub use matcher::{BudgetMatcher, DomainBoost, MatchRules, match_budget_line, rank_budget_lines};
pub use amount::{AmountPolicy, extract_amount, extract_amounts};
pub use milestone::{MilestoneMatch, detect_milestones};
pub use catalogue::BudgetCatalogue;
