//! Lays out downloaded EDGAR data as linked workbook sheets.

use tracing::debug;

use crate::error::EdgarResult;
use crate::facts::{CompanyFacts, ConceptSeries, FACT_COLUMNS};
use crate::submissions::{group_by_form, CompanyProfile, FilingRecord};
use crate::workbook::{offset_cell, sheet_hyperlink, CellValue, Table, Workbook};

pub const FACTS_SUMMARY_SHEET: &str = "Company SEC Data Summary";
pub const FILINGS_SHEET: &str = "SEC Filing Links";
pub const COMPANY_SUMMARY_SHEET: &str = "Company Summary";

const FACTS_SUMMARY_COLUMNS: [&str; 7] = [
    "Taxonomy:",
    "Taxonomy Concept:",
    "Description:",
    "Data Units:",
    "Data Source Url:",
    "Sheet Name:",
    "Sheet Link:",
];
const FILING_COLUMNS: [&str; 3] = ["Report Date:", "SEC Form Type:", "URL To Form:"];

/// Column gap between form blocks on the filings sheet (3 columns + 1 blank)
const FORM_BLOCK_STRIDE: i64 = 4;

/// Name of the n-th (1-based) concept sheet of a taxonomy
pub fn concept_sheet_name(taxonomy: &str, n: usize) -> String {
    format!("{}Sheet{}", taxonomy, n)
}

fn concept_table(series: &ConceptSeries) -> Table {
    let mut table = Table::new(FACT_COLUMNS);
    for row in &series.rows {
        table.push_row(vec![
            row.end.as_str().into(),
            row.val.into(),
            row.accn.as_str().into(),
            row.fy.map(f64::from).into(),
            row.fp.clone().into(),
            row.form.as_str().into(),
            row.filed.as_str().into(),
            row.frame.clone().into(),
        ]);
    }
    table
}

/// One sheet per concept, each linking back to a summary sheet that links to all of them.
///
/// Returns the number of concept sheets written.
pub fn write_company_facts(
    wb: &mut Workbook,
    facts: &CompanyFacts,
    max_per_taxonomy: Option<usize>,
) -> EdgarResult<usize> {
    // Reserve the summary's position ahead of the concept sheets
    wb.sheet_mut_or_create(FACTS_SUMMARY_SHEET);

    let mut summary = Table::new(FACTS_SUMMARY_COLUMNS);
    let back_link = sheet_hyperlink(FACTS_SUMMARY_SHEET);

    for (taxonomy, concepts) in &facts.taxonomies {
        let limit = max_per_taxonomy.unwrap_or(concepts.len());
        for (i, series) in concepts.iter().take(limit).enumerate() {
            let sheet_name = concept_sheet_name(taxonomy, i + 1);

            wb.add_sheet_with_table(&sheet_name, &concept_table(series))?;
            wb.set_cells(
                &sheet_name,
                &["J1", "J2"],
                vec![
                    "Link to Summary Sheet".into(),
                    CellValue::Formula(back_link.clone()),
                ],
            )?;

            summary.push_row(vec![
                taxonomy.as_str().into(),
                series.label.as_str().into(),
                series.description.as_str().into(),
                series.units.as_str().into(),
                series.source_url.as_str().into(),
                sheet_name.as_str().into(),
                CellValue::Formula(sheet_hyperlink(&sheet_name)),
            ]);
        }
        debug!("Wrote {} sheets for taxonomy {}", limit.min(concepts.len()), taxonomy);
    }

    let written = summary.rows.len();
    wb.add_sheet_with_table(FACTS_SUMMARY_SHEET, &summary)?;
    Ok(written)
}

/// Filings grouped by form, one three-column block per form laid out left to right.
///
/// Returns the number of form blocks written.
pub fn write_filings(wb: &mut Workbook, filings: &[FilingRecord]) -> EdgarResult<usize> {
    wb.sheet_mut_or_create(FILINGS_SHEET);

    let grouped = group_by_form(filings);
    let mut start = "A1".to_string();
    for (i, (form, records)) in grouped.iter().enumerate() {
        if i > 0 {
            start = offset_cell(&start, FORM_BLOCK_STRIDE, 0)?;
        }

        let mut table = Table::new(FILING_COLUMNS);
        for record in records {
            table.push_row(vec![
                record.report_date.as_str().into(),
                record.form.as_str().into(),
                record.url.as_str().into(),
            ]);
        }
        wb.add_table_at(FILINGS_SHEET, &table, &start)?;
        debug!("Form {} ({} filings) at {}", form, records.len(), start);
    }

    Ok(grouped.len())
}

/// Single-row table of descriptive company fields
pub fn write_company_summary(wb: &mut Workbook, profile: &CompanyProfile) -> EdgarResult<()> {
    let fields = profile.fields();
    let mut table = Table::new(fields.iter().map(|(name, _)| *name));
    table.push_row(
        fields
            .into_iter()
            .map(|(_, value)| if value.is_empty() { CellValue::Empty } else { value.into() })
            .collect(),
    );
    wb.add_sheet_with_table(COMPANY_SUMMARY_SHEET, &table)
}
