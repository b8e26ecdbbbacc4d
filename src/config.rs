// ⚙️ Calculator Defaults
// Form defaults a host starts from; loadable from a JSON file

use crate::fees::LeaseTerm;
use crate::landlord::STANDARD_EXPENSES;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorDefaults {
    /// Lease terms offered in the term selector
    pub lease_terms: Vec<LeaseTerm>,

    /// Pre-selected lease term
    pub default_term: LeaseTerm,

    /// Home-loan interest applied to landlord income, in percent
    pub interest_percentage: f64,

    /// Expense columns for new landlord income rows
    pub expense_categories: Vec<String>,
}

impl Default for CalculatorDefaults {
    fn default() -> Self {
        CalculatorDefaults {
            lease_terms: LeaseTerm::STANDARD.to_vec(),
            default_term: LeaseTerm::ONE_YEAR,
            interest_percentage: 3.5,
            expense_categories: STANDARD_EXPENSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CalculatorDefaults {
    /// Load defaults from a JSON file; absent keys keep their default
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let defaults: CalculatorDefaults =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        defaults.validate()?;
        Ok(defaults)
    }

    /// `from_file` when a path is given, built-in defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.lease_terms.is_empty() {
            return Err(anyhow!("lease_terms must list at least one term"));
        }
        if !self.interest_percentage.is_finite() || self.interest_percentage < 0.0 {
            return Err(anyhow!(
                "interest_percentage must be a non-negative number, got {}",
                self.interest_percentage
            ));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landlord::IncomeRow;
    use std::io::Write;

    #[test]
    fn test_builtin_defaults() {
        let defaults = CalculatorDefaults::default();
        let weeks: Vec<u32> = defaults.lease_terms.iter().map(|t| t.weeks()).collect();
        assert_eq!(weeks, vec![26, 52, 104, 156]);
        assert_eq!(defaults.default_term.weeks(), 52);
        assert_eq!(defaults.interest_percentage, 3.5);
        assert_eq!(defaults.expense_categories.len(), 7);
        assert!(defaults.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "interest_percentage": 6.1, "default_term": 104 }}"#).unwrap();

        let defaults = CalculatorDefaults::from_file(file.path()).unwrap();
        assert_eq!(defaults.interest_percentage, 6.1);
        assert_eq!(defaults.default_term, LeaseTerm::TWO_YEARS);
        assert_eq!(defaults.lease_terms.len(), 4);
    }

    #[test]
    fn test_expense_categories_from_file_shape_new_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "expense_categories": ["Strata"] }}"#).unwrap();

        let defaults = CalculatorDefaults::from_file(file.path()).unwrap();
        let row = IncomeRow::with_categories("August 2025", &defaults.expense_categories);
        assert_eq!(row.expenses.len(), 1);
        assert_eq!(row.expenses[0].name, "Strata");
    }

    #[test]
    fn test_zero_term_in_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "lease_terms": [0, 52] }}"#).unwrap();
        assert!(CalculatorDefaults::from_file(file.path()).is_err());
    }

    #[test]
    fn test_negative_interest_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "interest_percentage": -1 }}"#).unwrap();
        assert!(CalculatorDefaults::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(CalculatorDefaults::from_file("/nonexistent/leasebreak.json").is_err());
        assert_eq!(CalculatorDefaults::load(None).unwrap(), CalculatorDefaults::default());
    }
}
