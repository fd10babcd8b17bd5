//! 請求台帳Excel生成
//!
//! - Claimsシート: 領収書ごとの照合結果
//! - Budgetシート: 予算項目ごとの今回請求額と請求後残額（参考値）

use super::BudgetSummaryRow;
use crate::analyzer::{ReceiptAnalysis, ReviewStatus};
use crate::error::{ReceiptClaimError, Result};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, XlsxError};
use std::path::Path;

const CLAIM_HEADERS: &[(&str, f64)] = &[
    ("File", 24.0),
    ("Date", 20.0),
    ("Budget Line", 28.0),
    ("Confidence", 12.0),
    ("Amount", 14.0),
    ("Milestone", 16.0),
    ("Review", 12.0),
    ("OCR Error", 30.0),
];

const BUDGET_HEADERS: &[(&str, f64)] = &[
    ("ID", 8.0),
    ("Budget Line", 28.0),
    ("Category", 14.0),
    ("Budget", 14.0),
    ("Remaining", 14.0),
    ("Claimed", 14.0),
    ("Remaining After", 16.0),
];

fn to_excel_error(e: XlsxError) -> ReceiptClaimError {
    ReceiptClaimError::ExcelGeneration(e.to_string())
}

fn review_label(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Pending => "pending",
        ReviewStatus::Accepted => "accepted",
        ReviewStatus::Overridden => "overridden",
        ReviewStatus::Rejected => "rejected",
    }
}

pub fn generate_excel(
    analyses: &[ReceiptAnalysis],
    summary: &[BudgetSummaryRow],
    output_path: &Path,
    title: &str,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));
    let money_format = Format::new().set_num_format("$#,##0.00");
    let title_format = Format::new().set_bold().set_font_size(14.0);

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Claims").map_err(to_excel_error)?;
        sheet.write_string_with_format(0, 0, title, &title_format).map_err(to_excel_error)?;

        for (col, (header, width)) in CLAIM_HEADERS.iter().enumerate() {
            let col = col as u16;
            sheet.write_string_with_format(2, col, *header, &header_format).map_err(to_excel_error)?;
            sheet.set_column_width(col, *width).map_err(to_excel_error)?;
        }

        for (i, a) in analyses.iter().enumerate() {
            let row = 3 + i as u32;
            sheet.write_string(row, 0, &a.file_name).map_err(to_excel_error)?;
            sheet.write_string(row, 1, &a.date).map_err(to_excel_error)?;
            sheet.write_string(row, 2, a.line_name.as_deref().unwrap_or("-")).map_err(to_excel_error)?;
            sheet.write_number(row, 3, a.confidence as f64).map_err(to_excel_error)?;
            if let Some(amount) = a.amount {
                sheet.write_number_with_format(row, 4, amount, &money_format).map_err(to_excel_error)?;
            }
            let milestone = a.milestones.first().map(|m| m.milestone.as_str()).unwrap_or("");
            sheet.write_string(row, 5, milestone).map_err(to_excel_error)?;
            sheet.write_string(row, 6, review_label(a.review)).map_err(to_excel_error)?;
            sheet.write_string(row, 7, a.ocr_error.as_deref().unwrap_or("")).map_err(to_excel_error)?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Budget").map_err(to_excel_error)?;

        for (col, (header, width)) in BUDGET_HEADERS.iter().enumerate() {
            let col = col as u16;
            sheet.write_string_with_format(0, col, *header, &header_format).map_err(to_excel_error)?;
            sheet.set_column_width(col, *width).map_err(to_excel_error)?;
        }

        for (i, s) in summary.iter().enumerate() {
            let row = 1 + i as u32;
            sheet.write_string(row, 0, &s.id).map_err(to_excel_error)?;
            sheet.write_string(row, 1, &s.name).map_err(to_excel_error)?;
            sheet.write_string(row, 2, &s.category).map_err(to_excel_error)?;
            sheet.write_number_with_format(row, 3, s.budget, &money_format).map_err(to_excel_error)?;
            sheet.write_number_with_format(row, 4, s.remaining, &money_format).map_err(to_excel_error)?;
            sheet.write_number_with_format(row, 5, s.claimed, &money_format).map_err(to_excel_error)?;
            sheet.write_number_with_format(row, 6, s.remaining_after(), &money_format).map_err(to_excel_error)?;
        }
    }

    workbook.save(output_path).map_err(to_excel_error)?;
    Ok(())
}
