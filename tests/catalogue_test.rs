//! 予算カタログ読み込み〜照合〜結果保存の統合テスト

use receipt_claim_common::{AmountPolicy, BudgetCategory, BudgetMatcher};
use receipt_claim_rust::analyzer::{self, AnalysisContext};
use receipt_claim_rust::catalogue::load_catalogue;
use receipt_claim_rust::error::ReceiptClaimError;
use std::fs;
use tempfile::tempdir;

const CSV: &str = "id,name,keyword,amount,category,remaining
R1,Roof Sheeting,roof,\"$12,000\",materials,9000
R2,Gutter Install,gutter,4000,labor,4000
";

#[test]
fn test_csv_catalogue_drives_matching() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("budget.csv");
    fs::write(&path, CSV).unwrap();

    let catalogue = load_catalogue(Some(path.as_path())).expect("CSV読み込み失敗");
    assert_eq!(catalogue.len(), 2);
    let roof = catalogue.find("R1").unwrap();
    assert_eq!(roof.amount, 12000.0);
    assert_eq!(roof.category, BudgetCategory::Materials);

    let matcher = BudgetMatcher::default();
    let ctx = AnalysisContext {
        catalogue: &catalogue,
        matcher: &matcher,
        amount_policy: AmountPolicy::First,
    };

    let analysis = analyzer::analyze_text("r1.jpg", "Roofing sheets $640.00 then gutter $90.00", &ctx);
    assert!(analysis.line_id.is_some());
    assert!(analysis.confidence >= 60);
    assert_eq!(analysis.amount, Some(640.0));
    assert_eq!(analysis.alternatives.len(), 1);

    // 保存して読み戻す
    let out = dir.path().join("claims.json");
    analyzer::save_analyses(&out, &[analysis.clone()]).unwrap();
    let loaded = analyzer::load_analyses(&out).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].line_id, analysis.line_id);
    assert_eq!(loaded[0].amount, Some(640.0));

    let json = fs::read_to_string(&out).unwrap();
    assert!(json.contains("\"lineId\""));
    assert!(!json.contains("ocrError"));
}

#[test]
fn test_json_catalogue_with_duplicate_ids_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("budget.json");
    fs::write(
        &path,
        r#"[
            {"id":"1","name":"A","keyword":"a","amount":10,"category":"materials","remaining":10},
            {"id":"1","name":"B","keyword":"b","amount":10,"category":"labor","remaining":10}
        ]"#,
    )
    .unwrap();

    let result = load_catalogue(Some(path.as_path()));
    assert!(matches!(result, Err(ReceiptClaimError::Common(_))));
}

#[test]
fn test_missing_and_unsupported_catalogue() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("nope.csv");
    assert!(matches!(load_catalogue(Some(missing.as_path())), Err(ReceiptClaimError::FileNotFound(_))));

    let txt = dir.path().join("budget.txt");
    fs::write(&txt, "whatever").unwrap();
    assert!(matches!(load_catalogue(Some(txt.as_path())), Err(ReceiptClaimError::InvalidCatalogue(_))));
}

#[test]
fn test_builtin_catalogue_when_unspecified() {
    let catalogue = load_catalogue(None).unwrap();
    assert_eq!(catalogue.len(), 10);
    assert_eq!(catalogue.find("7").unwrap().name, "Site Labour");
}
