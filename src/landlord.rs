// 🏠 Landlord Income - Monthly breakdown and portfolio totals
// Per-month income after expenses, then home-loan interest across the portfolio

use crate::fees::round_money;
use serde::{Deserialize, Serialize};

/// Expense columns of a fresh row, in display order
pub const STANDARD_EXPENSES: [&str; 7] = [
    "Realtor Fees",
    "Home Insurance",
    "Property Maintenance",
    "Council & Emergency Levy",
    "Water & Sewer",
    "Electricity",
    "Gas",
];

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

// ============================================================================
// INCOME ROW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
}

impl Expense {
    pub fn new(name: &str, amount: f64) -> Self {
        Expense {
            name: name.to_string(),
            amount,
        }
    }
}

/// IncomeRow - One month of a rental property's books
///
/// Missing numbers deserialize as 0, the way an untouched form field counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRow {
    #[serde(default = "new_row_id")]
    pub id: String,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub rent: f64,
    #[serde(default)]
    pub tenant_paid_bills: f64,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

fn new_row_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl IncomeRow {
    /// Empty row for `month` with every standard expense at 0
    pub fn new(month: &str) -> Self {
        Self::with_categories(month, &STANDARD_EXPENSES)
    }

    /// Empty row for `month` with one zeroed expense per category, in order
    pub fn with_categories<S: AsRef<str>>(month: &str, categories: &[S]) -> Self {
        IncomeRow {
            id: new_row_id(),
            month: month.to_string(),
            rent: 0.0,
            tenant_paid_bills: 0.0,
            expenses: categories
                .iter()
                .map(|name| Expense::new(name.as_ref(), 0.0))
                .collect(),
        }
    }

    pub fn with_rent(mut self, rent: f64) -> Self {
        self.rent = rent;
        self
    }

    pub fn with_tenant_paid_bills(mut self, bills: f64) -> Self {
        self.tenant_paid_bills = bills;
        self
    }

    /// Set a named expense, adding the column if the row lacks it
    pub fn with_expense(mut self, name: &str, amount: f64) -> Self {
        match self.expenses.iter_mut().find(|e| e.name == name) {
            Some(expense) => expense.amount = amount,
            None => self.expenses.push(Expense::new(name, amount)),
        }
        self
    }

    pub fn expense(&self, name: &str) -> f64 {
        self.expenses
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.amount)
            .sum()
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    /// Final income for this month (see [`landlord_row_income`])
    pub fn final_income(&self) -> f64 {
        landlord_row_income(self.rent, self.tenant_paid_bills, &self.expenses)
    }
}

/// rent + tenant-paid bills − expenses, rounded to cents
///
/// Negative results are a loss month and are returned as-is.
pub fn landlord_row_income(rent: f64, tenant_paid_bills: f64, expenses: &[Expense]) -> f64 {
    let income = rent + tenant_paid_bills;
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
    round_money(income - total_expenses)
}

// ============================================================================
// PORTFOLIO
// ============================================================================

/// RowIncome - A row's computed result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIncome {
    pub id: String,
    pub month: String,
    pub final_income: f64,
}

impl From<&IncomeRow> for RowIncome {
    fn from(row: &IncomeRow) -> Self {
        RowIncome {
            id: row.id.clone(),
            month: row.month.clone(),
            final_income: row.final_income(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub total_before_loan: f64,
    pub loan_interest: f64,
    pub after_loan: f64,
    /// Net effect of the loan on income (always −loan_interest)
    pub income_including_loan: f64,
    pub final_total: f64,
}

/// Sum row incomes and take home-loan interest off the top
///
/// Every aggregate is rounded from its own unrounded value; none reuses
/// another's rounded figure.
pub fn landlord_portfolio_totals(rows: &[RowIncome], interest_percentage: f64) -> PortfolioTotals {
    let total: f64 = rows.iter().map(|r| r.final_income).sum();
    let loan_interest = total * (interest_percentage / 100.0);
    let after_loan = total - loan_interest;

    PortfolioTotals {
        total_before_loan: round_money(total),
        loan_interest: round_money(loan_interest),
        after_loan: round_money(after_loan),
        income_including_loan: round_money(-loan_interest),
        final_total: round_money(after_loan),
    }
}

/// "January <year>" .. "December <year + 1>", the month choices for new rows
pub fn month_options(year: i32) -> Vec<String> {
    [year, year + 1]
        .iter()
        .flat_map(|y| MONTH_NAMES.iter().map(move |m| format!("{} {}", m, y)))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_worked_example() {
        let expenses = vec![
            Expense::new("Realtor Fees", 200.0),
            Expense::new("Home Insurance", 150.0),
            Expense::new("Gas", 100.0),
        ];
        assert_eq!(landlord_row_income(2000.0, 100.0, &expenses), 1650.0);
    }

    #[test]
    fn test_row_builder_matches_free_function() {
        let row = IncomeRow::new("March 2025")
            .with_rent(2000.0)
            .with_tenant_paid_bills(100.0)
            .with_expense("Realtor Fees", 200.0)
            .with_expense("Council & Emergency Levy", 250.0);

        assert_eq!(row.expenses.len(), STANDARD_EXPENSES.len());
        assert_eq!(row.total_expenses(), 450.0);
        assert_eq!(row.final_income(), 1650.0);
    }

    #[test]
    fn test_row_with_configured_categories() {
        let categories = vec!["Strata".to_string(), "Land Tax".to_string()];
        let row = IncomeRow::with_categories("July 2025", &categories);

        let names: Vec<&str> = row.expenses.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Strata", "Land Tax"]);
        assert_eq!(row.total_expenses(), 0.0);
    }

    #[test]
    fn test_custom_expense_column_is_added() {
        let row = IncomeRow::new("April 2025").with_rent(500.0).with_expense("Strata", 120.5);
        assert_eq!(row.expense("Strata"), 120.5);
        assert_eq!(row.final_income(), 379.5);
    }

    #[test]
    fn test_loss_month_not_clamped() {
        let row = IncomeRow::new("May 2025")
            .with_rent(100.0)
            .with_expense("Property Maintenance", 850.25);
        assert_eq!(row.final_income(), -750.25);
    }

    #[test]
    fn test_row_defaults_on_deserialize() {
        let row: IncomeRow = serde_json::from_str(r#"{"month": "June 2025", "rent": 300}"#).unwrap();
        assert!(!row.id.is_empty());
        assert_eq!(row.tenant_paid_bills, 0.0);
        assert!(row.expenses.is_empty());
        assert_eq!(row.final_income(), 300.0);
    }

    #[test]
    fn test_portfolio_totals() {
        let rows = vec![
            RowIncome { id: "a".into(), month: "Jan".into(), final_income: 1650.0 },
            RowIncome { id: "b".into(), month: "Feb".into(), final_income: 1350.0 },
        ];
        let totals = landlord_portfolio_totals(&rows, 3.5);

        assert_eq!(totals.total_before_loan, 3000.0);
        assert_eq!(totals.loan_interest, 105.0);
        assert_eq!(totals.after_loan, 2895.0);
        assert_eq!(totals.income_including_loan, -105.0);
        assert_eq!(totals.final_total, 2895.0);
    }

    #[test]
    fn test_portfolio_rounds_each_aggregate_independently() {
        let rows = vec![RowIncome { id: "a".into(), month: "Jan".into(), final_income: 1.0 }];
        // interest 0.125 -> 0.13, after 0.875 -> 0.88 (not 1.0 - 0.13 = 0.87)
        let totals = landlord_portfolio_totals(&rows, 12.5);
        assert_eq!(totals.loan_interest, 0.13);
        assert_eq!(totals.after_loan, 0.88);
        assert_eq!(totals.final_total, 0.88);
        assert_eq!(totals.income_including_loan, -0.13);

        let rows = vec![RowIncome { id: "a".into(), month: "Jan".into(), final_income: 1000.01 }];
        let totals = landlord_portfolio_totals(&rows, 3.5);
        assert_eq!(totals.loan_interest, 35.0);
        assert_eq!(totals.after_loan, 965.01);
    }

    #[test]
    fn test_empty_portfolio() {
        let totals = landlord_portfolio_totals(&[], 3.5);
        assert_eq!(totals.total_before_loan, 0.0);
        assert_eq!(totals.final_total, 0.0);
    }

    #[test]
    fn test_month_options() {
        let months = month_options(2026);
        assert_eq!(months.len(), 24);
        assert_eq!(months[0], "January 2026");
        assert_eq!(months[23], "December 2027");
    }
}
