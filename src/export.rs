// 📄 Landlord Income CSV - import rows, export the breakdown
//
// Layout (one column per expense):
//   Month,Rent,<expenses...>,Tenant Paid Bills,Final Income
// followed by a blank line and the loan-interest / remaining-income summary.

use crate::landlord::{Expense, IncomeRow};
use crate::orchestrator::PortfolioSummary;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const COL_ID: &str = "Id";
const COL_MONTH: &str = "Month";
const COL_RENT: &str = "Rent";
const COL_TENANT_BILLS: &str = "Tenant Paid Bills";
const COL_FINAL_INCOME: &str = "Final Income";

/// `landlord-income-breakdown-YYYY-MM-DD.csv`
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("landlord-income-breakdown-{}.csv", date.format("%Y-%m-%d"))
}

// ============================================================================
// IMPORT
// ============================================================================

/// Load income rows from a CSV file
pub fn load_rows_csv(csv_path: &Path) -> Result<Vec<IncomeRow>> {
    let file = File::open(csv_path)
        .with_context(|| format!("Failed to open file: {}", csv_path.display()))?;
    read_rows_csv(file)
}

/// Read income rows from any CSV source
///
/// `Month`, `Rent` and `Tenant Paid Bills` map to their fields, `Id` is kept
/// when present, `Final Income` is ignored (it is recomputed) and every other
/// column is a named expense. Header names are matched case-insensitively;
/// blank cells count as 0.
pub fn read_rows_csv<R: Read>(source: R) -> Result<Vec<IncomeRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    if !headers.iter().any(|h| h.eq_ignore_ascii_case(COL_MONTH)) {
        return Err(anyhow!("CSV header has no '{}' column", COL_MONTH));
    }

    let mut rows = Vec::new();

    for (line_num, result) in reader.records().enumerate() {
        let line = line_num + 2; // 1-indexed + header row
        let record = result.with_context(|| format!("Failed to parse CSV line {}", line))?;

        // A blank line ends the rows; the summary block follows it in exports
        if record.iter().all(|cell| cell.is_empty()) {
            break;
        }

        let mut row = IncomeRow {
            id: String::new(),
            month: String::new(),
            rent: 0.0,
            tenant_paid_bills: 0.0,
            expenses: Vec::new(),
        };

        for (header, cell) in headers.iter().zip(record.iter()) {
            if header.eq_ignore_ascii_case(COL_MONTH) {
                row.month = cell.to_string();
            } else if header.eq_ignore_ascii_case(COL_ID) {
                row.id = cell.to_string();
            } else if header.eq_ignore_ascii_case(COL_FINAL_INCOME) {
                continue;
            } else {
                let amount = parse_cell(cell)
                    .with_context(|| format!("Line {}, column '{}'", line, header))?;

                if header.eq_ignore_ascii_case(COL_RENT) {
                    row.rent = amount;
                } else if header.eq_ignore_ascii_case(COL_TENANT_BILLS) {
                    row.tenant_paid_bills = amount;
                } else {
                    row.expenses.push(Expense::new(header, amount));
                }
            }
        }

        if row.id.is_empty() {
            row.id = uuid::Uuid::new_v4().to_string();
        }

        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), "loaded landlord income rows");
    Ok(rows)
}

fn parse_cell(cell: &str) -> Result<f64> {
    let cleaned = cell.trim().trim_start_matches('$').replace(',', "");
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = cleaned
        .parse()
        .map_err(|_| anyhow!("'{}' is not a number", cell))?;
    if !value.is_finite() {
        return Err(anyhow!("'{}' is not a finite number", cell));
    }
    Ok(value)
}

// ============================================================================
// EXPORT
// ============================================================================

/// Configured categories first, then any extra names in order of first use
pub fn expense_columns(rows: &[IncomeRow], categories: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = categories.to_vec();
    for expense in rows.iter().flat_map(|r| r.expenses.iter()) {
        if !columns.iter().any(|c| c == &expense.name) {
            columns.push(expense.name.clone());
        }
    }
    columns
}

/// Write rows and the portfolio summary as CSV
///
/// `summary` must come from the same `rows`. `categories` fixes the order of
/// the leading expense columns.
pub fn write_portfolio_csv<W: Write>(
    sink: W,
    rows: &[IncomeRow],
    summary: &PortfolioSummary,
    categories: &[String],
) -> Result<()> {
    let columns = expense_columns(rows, categories);
    let width = columns.len() + 4;

    let mut writer = csv::Writer::from_writer(sink);

    let mut header = vec![COL_MONTH.to_string(), COL_RENT.to_string()];
    header.extend(columns.iter().cloned());
    header.push(COL_TENANT_BILLS.to_string());
    header.push(COL_FINAL_INCOME.to_string());
    writer.write_record(&header)?;

    for (row, income) in rows.iter().zip(summary.rows.iter()) {
        let mut record = vec![row.month.clone(), row.rent.to_string()];
        record.extend(columns.iter().map(|name| row.expense(name).to_string()));
        record.push(row.tenant_paid_bills.to_string());
        record.push(income.final_income.to_string());
        writer.write_record(&record)?;
    }

    writer.write_record(vec![String::new(); width])?;
    writer.write_record(summary_line(
        width,
        &format!("Home Loan Interest ({}%)", summary.interest_percentage),
        summary.totals.loan_interest,
    ))?;
    writer.write_record(summary_line(
        width,
        "Total Remaining Income",
        summary.totals.after_loan,
    ))?;

    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Label in the first column, value in the last
fn summary_line(width: usize, label: &str, value: f64) -> Vec<String> {
    let mut line = vec![String::new(); width];
    line[0] = label.to_string();
    line[width - 1] = value.to_string();
    line
}

/// Write the breakdown to `csv_path`
pub fn export_portfolio_csv(
    csv_path: &Path,
    rows: &[IncomeRow],
    summary: &PortfolioSummary,
    categories: &[String],
) -> Result<()> {
    let file = File::create(csv_path)
        .with_context(|| format!("Failed to create file: {}", csv_path.display()))?;
    write_portfolio_csv(file, rows, summary, categories)?;
    tracing::info!(path = %csv_path.display(), rows = rows.len(), "exported landlord income CSV");
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculatorDefaults;
    use crate::events::NoopObserver;
    use crate::orchestrator::CalculationOrchestrator;
    use std::sync::Arc;

    fn standard_categories() -> Vec<String> {
        CalculatorDefaults::default().expense_categories
    }

    fn summarize(rows: &[IncomeRow], interest: f64) -> PortfolioSummary {
        CalculationOrchestrator::new(Arc::new(NoopObserver)).compute_landlord_portfolio(rows, interest)
    }

    #[test]
    fn test_default_export_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(default_export_filename(date), "landlord-income-breakdown-2026-10-19.csv");
    }

    #[test]
    fn test_read_rows() {
        let data = r#"Month,Rent,Realtor Fees,Gas,Strata,Tenant Paid Bills,Final Income
January 2025,2000,200,,250,100,999
February 2025,"$1,800.50",0,50,,,
"#;
        let rows = read_rows_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].month, "January 2025");
        assert_eq!(rows[0].expense("Strata"), 250.0);
        assert_eq!(rows[0].expense("Gas"), 0.0);
        // Final Income column is recomputed, not trusted
        assert_eq!(rows[0].final_income(), 1650.0);
        assert!(!rows[0].id.is_empty());

        assert_eq!(rows[1].rent, 1800.5);
        assert_eq!(rows[1].tenant_paid_bills, 0.0);
        assert_eq!(rows[1].final_income(), 1750.5);
    }

    #[test]
    fn test_read_rows_bad_number() {
        let data = "Month,Rent\nJanuary 2025,lots\n";
        let err = read_rows_csv(data.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("column 'Rent'"));
    }

    #[test]
    fn test_read_rows_requires_month() {
        let data = "Rent,Gas\n100,10\n";
        assert!(read_rows_csv(data.as_bytes()).is_err());
    }

    #[test]
    fn test_write_portfolio_csv() {
        let rows = vec![IncomeRow::new("January 2025")
            .with_rent(2000.0)
            .with_tenant_paid_bills(100.0)
            .with_expense("Realtor Fees", 450.0)];
        let summary = summarize(&rows, 3.5);

        let mut out = Vec::new();
        write_portfolio_csv(&mut out, &rows, &summary, &standard_categories()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Month,Rent,Realtor Fees,Home Insurance,Property Maintenance,\
Council & Emergency Levy,Water & Sewer,Electricity,Gas,Tenant Paid Bills,Final Income"
        );
        assert_eq!(lines[1], "January 2025,2000,450,0,0,0,0,0,0,100,1650");
        assert_eq!(lines[2], ",,,,,,,,,,");
        assert_eq!(lines[3], "Home Loan Interest (3.5%),,,,,,,,,,57.75");
        assert_eq!(lines[4], "Total Remaining Income,,,,,,,,,,1592.25");
    }

    #[test]
    fn test_configured_categories_lead_the_columns() {
        let categories = vec!["Strata".to_string()];
        let rows = vec![IncomeRow::with_categories("June 2025", &categories)
            .with_rent(900.0)
            .with_expense("Strata", 120.0)
            .with_expense("Gas", 30.0)];
        let summary = summarize(&rows, 0.0);

        let mut out = Vec::new();
        write_portfolio_csv(&mut out, &rows, &summary, &categories).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Month,Rent,Strata,Gas,Tenant Paid Bills,Final Income");
        assert_eq!(lines[1], "June 2025,900,120,30,0,750");
    }

    #[test]
    fn test_export_then_import() {
        let rows = vec![
            IncomeRow::new("March 2025").with_rent(1500.0).with_expense("Strata", 300.0),
            IncomeRow::new("April 2025").with_rent(1500.0).with_expense("Gas", 75.25),
        ];
        let summary = summarize(&rows, 5.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(default_export_filename(
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        ));
        export_portfolio_csv(&path, &rows, &summary, &standard_categories()).unwrap();

        let loaded = load_rows_csv(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].final_income(), 1200.0);
        assert_eq!(loaded[1].final_income(), 1424.75);
        assert_eq!(loaded[0].expense("Strata"), 300.0);
    }
}
