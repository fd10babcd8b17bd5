//! 請求台帳Excel出力の統合テスト

use calamine::{open_workbook_auto, Data, Reader};
use receipt_claim_common::{AmountPolicy, BudgetCatalogue, BudgetMatcher};
use receipt_claim_rust::analyzer::{self, AnalysisContext, ReceiptAnalysis, ReviewStatus};
use receipt_claim_rust::export;
use tempfile::tempdir;

fn analyses() -> Vec<ReceiptAnalysis> {
    let catalogue = BudgetCatalogue::builtin();
    let matcher = BudgetMatcher::default();
    let ctx = AnalysisContext {
        catalogue: &catalogue,
        matcher: &matcher,
        amount_policy: AmountPolicy::Largest,
    };

    let mut results = vec![
        analyzer::analyze_text("r1.jpg", "ABC Concrete Supply Co - concrete delivery $1,200", &ctx),
        analyzer::analyze_text("r2.jpg", "Excavator hire 2 days $880.00", &ctx),
        analyzer::analyze_text("r3.jpg", "Coffee and sandwiches $12.50", &ctx),
    ];
    results[0].review = ReviewStatus::Accepted;
    results.push(ReceiptAnalysis {
        file_name: "r4.jpg".into(),
        ocr_error: Some("tesseract failed".into()),
        ..Default::default()
    });
    results
}

#[test]
fn test_excel_register_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let catalogue = BudgetCatalogue::builtin();

    let path = export::export_register(&analyses(), &catalogue, dir.path(), "register")
        .expect("Excel生成に失敗");
    assert_eq!(path, dir.path().join("register.xlsx"));
    assert!(path.exists(), "Excelファイルが作成されていない");

    let mut workbook = open_workbook_auto(&path).expect("Excel読み込み失敗");
    assert_eq!(workbook.sheet_names(), vec!["Claims".to_string(), "Budget".to_string()]);

    let claims = workbook.worksheet_range("Claims").expect("Claimsシートがない");
    assert_eq!(claims.get_value((3, 0)), Some(&Data::String("r1.jpg".into())));
    assert_eq!(claims.get_value((3, 2)), Some(&Data::String("Foundation Materials".into())));

    let budget = workbook.worksheet_range("Budget").expect("Budgetシートがない");
    assert_eq!(budget.get_value((1, 1)), Some(&Data::String("Foundation Materials".into())));
    // 今回請求 1200
    assert_eq!(budget.get_value((1, 5)), Some(&Data::Float(1200.0)));
}

#[test]
fn test_excel_register_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("empty.xlsx");

    let result = export::export_register(&[], &BudgetCatalogue::builtin(), &output, "empty");
    assert!(result.is_ok(), "空のExcel生成に失敗: {:?}", result.err());
    assert!(output.exists());
}
