//! 請求ドラフト送信モジュール
//!
//! レビュー済みの解析結果から請求ドラフトを作り、保存エンドポイントへ1回ずつPOSTする。
//! 失敗は記録して次へ進む（再送しない）。

use crate::analyzer::ReceiptAnalysis;
use crate::error::{ReceiptClaimError, Result};
use receipt_claim_common::{BudgetCatalogue, DraftClaim, MatchResult};
use std::time::Duration;

/// 送信対象のドラフト
#[derive(Debug, Clone)]
pub struct PendingDraft {
    pub file_name: String,
    pub draft: DraftClaim,
}

/// 解析結果から請求ドラフトを作成
///
/// カタログから消えた予算項目を参照している結果はスキップする。
pub fn build_drafts(
    analyses: &[ReceiptAnalysis],
    catalogue: &BudgetCatalogue,
    include_pending: bool,
) -> Vec<PendingDraft> {
    analyses
        .iter()
        .filter(|a| a.is_claimable(include_pending))
        .filter_map(|a| {
            let line_id = a.line_id.as_deref()?;
            let Some(line) = catalogue.find(line_id) else {
                tracing::warn!("{}: 予算項目 {} がカタログにありません", a.file_name, line_id);
                return None;
            };
            let result = MatchResult {
                budget_line: Some(line.clone()),
                confidence: a.confidence,
            };
            DraftClaim::from_match(&result, a.amount, &a.ocr_text, &a.description).map(|draft| PendingDraft {
                file_name: a.file_name.clone(),
                draft,
            })
        })
        .collect()
}

/// 送信結果
#[derive(Debug, Default)]
pub struct SubmitSummary {
    pub saved: Vec<String>,
    /// (ファイル名, エラー内容)
    pub failed: Vec<(String, String)>,
}

/// 保存エンドポイントのクライアント
pub struct DraftSubmitter {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl DraftSubmitter {
    pub fn new(endpoint: &str, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_token,
        })
    }

    /// ドラフトを1件保存
    pub async fn save_draft(&self, draft: &DraftClaim) -> Result<()> {
        let mut request = self.client.post(&self.endpoint).json(draft);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReceiptClaimError::SaveFailed(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(())
    }

    /// 全ドラフトを順に保存
    pub async fn submit_all(&self, drafts: &[PendingDraft]) -> SubmitSummary {
        let mut summary = SubmitSummary::default();

        for pending in drafts {
            match self.save_draft(&pending.draft).await {
                Ok(()) => summary.saved.push(pending.file_name.clone()),
                Err(e) => {
                    tracing::warn!("ドラフト保存失敗 {}: {}", pending.file_name, e);
                    summary.failed.push((pending.file_name.clone(), e.to_string()));
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ReviewStatus;

    fn analysis(name: &str, line: Option<&str>, review: ReviewStatus) -> ReceiptAnalysis {
        ReceiptAnalysis {
            file_name: name.into(),
            ocr_text: format!("text of {}", name),
            line_id: line.map(str::to_string),
            amount: Some(100.0),
            confidence: 60,
            review,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_drafts_reviewed_only() {
        let catalogue = BudgetCatalogue::builtin();
        let analyses = vec![
            analysis("a.jpg", Some("1"), ReviewStatus::Accepted),
            analysis("b.jpg", Some("3"), ReviewStatus::Pending),
            analysis("c.jpg", Some("7"), ReviewStatus::Overridden),
            analysis("d.jpg", Some("8"), ReviewStatus::Rejected),
            analysis("e.jpg", None, ReviewStatus::Accepted),
        ];

        let drafts = build_drafts(&analyses, &catalogue, false);
        let names: Vec<&str> = drafts.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "c.jpg"]);
        assert_eq!(drafts[0].draft.line_item, "1");
        assert_eq!(drafts[0].draft.receipt_text, "text of a.jpg");
        assert_eq!(drafts[1].draft.line_item, "7");

        let all = build_drafts(&analyses, &catalogue, true);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_build_drafts_skips_unknown_line() {
        let catalogue = BudgetCatalogue::builtin();
        let analyses = vec![analysis("a.jpg", Some("missing"), ReviewStatus::Accepted)];
        assert!(build_drafts(&analyses, &catalogue, false).is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reported_once() {
        // ポート1はまず待ち受けていない
        let submitter = DraftSubmitter::new("http://127.0.0.1:1/api/claims/draft", None, Duration::from_secs(2)).unwrap();
        let drafts = vec![PendingDraft {
            file_name: "a.jpg".into(),
            draft: DraftClaim::default(),
        }];
        let summary = submitter.submit_all(&drafts).await;
        assert!(summary.saved.is_empty());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "a.jpg");
    }
}
