// 💲 Fee Formula Engine - SACAT advertising / reletting fees and move-in costs
//
// Fee pattern: (base amount × weeks remaining) ÷ three-quarter term
// where three-quarter term = round(term weeks × 0.75)

use crate::error::{CalcError, CalculationResult};
use serde::{Deserialize, Serialize};

/// GST applied to weekly rent before the reletting fee (fixed, 10%)
pub const GST_MULTIPLIER: f64 = 1.10;

/// Weekly rent at or below this takes a 4-week bond, above it 6 weeks
pub const BOND_THRESHOLD: f64 = 800.0;
pub const BOND_WEEKS_STANDARD: u32 = 4;
pub const BOND_WEEKS_HIGH_RENT: u32 = 6;
pub const ADVANCE_WEEKS: u32 = 2;

// ============================================================================
// MONEY + TERM
// ============================================================================

/// Round to cents, half away from zero
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// LeaseTerm - Fixed-term agreement length in weeks (always > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LeaseTerm(u32);

impl LeaseTerm {
    pub const SIX_MONTHS: LeaseTerm = LeaseTerm(26);
    pub const ONE_YEAR: LeaseTerm = LeaseTerm(52);
    pub const TWO_YEARS: LeaseTerm = LeaseTerm(104);
    pub const THREE_YEARS: LeaseTerm = LeaseTerm(156);

    /// Options offered by the calculator forms
    pub const STANDARD: [LeaseTerm; 4] = [
        LeaseTerm::SIX_MONTHS,
        LeaseTerm::ONE_YEAR,
        LeaseTerm::TWO_YEARS,
        LeaseTerm::THREE_YEARS,
    ];

    pub fn new(weeks: u32) -> CalculationResult<Self> {
        if weeks == 0 {
            return Err(CalcError::InvalidTerm(weeks.to_string()));
        }
        Ok(LeaseTerm(weeks))
    }

    pub fn weeks(&self) -> u32 {
        self.0
    }

    /// Human label, e.g. "52 weeks (1 year)"
    pub fn label(&self) -> String {
        match self.0 {
            26 => "26 weeks (6 months)".to_string(),
            52 => "52 weeks (1 year)".to_string(),
            104 => "104 weeks (2 years)".to_string(),
            156 => "156 weeks (3 years)".to_string(),
            n => format!("{} weeks", n),
        }
    }
}

impl TryFrom<u32> for LeaseTerm {
    type Error = CalcError;

    fn try_from(weeks: u32) -> Result<Self, Self::Error> {
        LeaseTerm::new(weeks)
    }
}

impl From<LeaseTerm> for u32 {
    fn from(term: LeaseTerm) -> Self {
        term.0
    }
}

/// round(term × 0.75), the denominator of both SACAT formulas
pub fn three_quarter_term(term_weeks: u32) -> u32 {
    (term_weeks as f64 * 0.75).round() as u32
}

fn denominator(term_weeks: u32) -> CalculationResult<u32> {
    match three_quarter_term(term_weeks) {
        0 => Err(CalcError::ZeroDenominator { term_weeks }),
        n => Ok(n),
    }
}

fn require_positive(amount: f64) -> CalculationResult<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(CalcError::InvalidAmount(amount.to_string()))
    }
}

/// Round an output to cents; an amount too large to yield a finite figure is
/// reported against the input that produced it
fn money_result(value: f64, input: f64) -> CalculationResult<f64> {
    let rounded = round_money(value);
    if rounded.is_finite() {
        Ok(rounded)
    } else {
        Err(CalcError::InvalidAmount(input.to_string()))
    }
}

// ============================================================================
// ADVERTISING FEE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertisingFeeBreakdown {
    pub advertising_cost: f64,
    pub weeks_remaining: u32,
    pub term_weeks: u32,
    pub three_quarter_term: u32,
    /// Tenant's share of the advertising cost, rounded to cents
    pub fee: f64,
}

/// Advertising fee: cost × weeks ÷ three-quarter term
pub fn advertising_fee(
    cost: f64,
    weeks_remaining: u32,
    term_weeks: u32,
) -> CalculationResult<AdvertisingFeeBreakdown> {
    let cost = require_positive(cost)?;
    let three_quarter = denominator(term_weeks)?;

    let fee = (cost * weeks_remaining as f64) / three_quarter as f64;

    Ok(AdvertisingFeeBreakdown {
        advertising_cost: cost,
        weeks_remaining,
        term_weeks,
        three_quarter_term: three_quarter,
        fee: money_result(fee, cost)?,
    })
}

// ============================================================================
// RELETTING FEE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelettingFeeBreakdown {
    pub base_weekly_rent: f64,
    pub weeks_remaining: u32,
    pub term_weeks: u32,
    pub three_quarter_term: u32,
    pub weekly_rent_with_gst: f64,
    pub maximum_fee: f64,
}

/// Maximum reletting fee: (rent incl. GST × 2) × weeks ÷ three-quarter term
///
/// Both outputs are rounded on their own; `maximum_fee` is computed from the
/// unrounded GST rent.
pub fn reletting_fee(
    base_weekly_rent: f64,
    weeks_remaining: u32,
    term_weeks: u32,
) -> CalculationResult<RelettingFeeBreakdown> {
    let base = require_positive(base_weekly_rent)?;
    let three_quarter = denominator(term_weeks)?;

    let weekly_rent_with_gst = base * GST_MULTIPLIER;
    let two_weeks_rent = weekly_rent_with_gst * 2.0;
    let maximum_fee = (two_weeks_rent * weeks_remaining as f64) / three_quarter as f64;

    Ok(RelettingFeeBreakdown {
        base_weekly_rent: base,
        weeks_remaining,
        term_weeks,
        three_quarter_term: three_quarter,
        weekly_rent_with_gst: money_result(weekly_rent_with_gst, base)?,
        maximum_fee: money_result(maximum_fee, base)?,
    })
}

// ============================================================================
// RENT MOVE-IN COST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInCost {
    pub weekly_rent: f64,
    pub advance: f64,
    pub bond_weeks: u32,
    pub bond: f64,
    pub total: f64,
}

/// Upfront cost of a new tenancy: 2 weeks' advance rent plus bond
pub fn rent_move_in_cost(weekly_rent: f64) -> CalculationResult<MoveInCost> {
    let rent = require_positive(weekly_rent)?;

    let bond_weeks = if rent <= BOND_THRESHOLD {
        BOND_WEEKS_STANDARD
    } else {
        BOND_WEEKS_HIGH_RENT
    };

    let advance = rent * ADVANCE_WEEKS as f64;
    let bond = rent * bond_weeks as f64;
    let total = advance + bond;

    Ok(MoveInCost {
        weekly_rent: rent,
        advance: money_result(advance, rent)?,
        bond_weeks,
        bond: money_result(bond, rent)?,
        total: money_result(total, rent)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_advertising_fee_worked_example() {
        let result = advertising_fee(87.0, 12, 104).unwrap();
        assert_eq!(result.three_quarter_term, 78);
        assert_eq!(result.fee, 13.38);
    }

    #[test]
    fn test_reletting_fee_worked_example() {
        let result = reletting_fee(100.0, 12, 52).unwrap();
        assert_eq!(result.three_quarter_term, 39);
        assert_eq!(result.weekly_rent_with_gst, 110.0);
        assert_eq!(result.maximum_fee, 67.69);
    }

    #[test]
    fn test_three_quarter_term_rounding() {
        assert_eq!(three_quarter_term(26), 20); // 19.5 rounds away from zero
        assert_eq!(three_quarter_term(52), 39);
        assert_eq!(three_quarter_term(104), 78);
        assert_eq!(three_quarter_term(156), 117);
        assert_eq!(three_quarter_term(1), 1);
        assert_eq!(three_quarter_term(0), 0);
        for term in 2..500 {
            assert!(three_quarter_term(term) >= 1);
        }
    }

    #[test]
    fn test_zero_term_fails_cleanly() {
        let err = advertising_fee(87.0, 12, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZeroDenominator);

        let err = reletting_fee(100.0, 12, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZeroDenominator);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert_eq!(advertising_fee(bad, 12, 52).unwrap_err().kind(), ErrorKind::InvalidAmount);
            assert_eq!(reletting_fee(bad, 12, 52).unwrap_err().kind(), ErrorKind::InvalidAmount);
            assert_eq!(rent_move_in_cost(bad).unwrap_err().kind(), ErrorKind::InvalidAmount);
        }
    }

    #[test]
    fn test_overflowing_amounts_rejected() {
        // Finite inputs whose fee does not fit in an f64
        let err = advertising_fee(1e308, 12, 52).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);

        let err = reletting_fee(f64::MAX, 12, 52).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);

        let err = rent_move_in_cost(f64::MAX / 2.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAmount);

        // Large but representable amounts still work
        assert_eq!(advertising_fee(1e12, 39, 52).unwrap().fee, 1e12);
    }

    #[test]
    fn test_zero_weeks_is_zero_fee() {
        assert_eq!(advertising_fee(87.0, 0, 52).unwrap().fee, 0.0);
        assert_eq!(reletting_fee(100.0, 0, 52).unwrap().maximum_fee, 0.0);
    }

    #[test]
    fn test_repeat_calls_are_bit_identical() {
        let a = reletting_fee(433.33, 17, 156).unwrap();
        let b = reletting_fee(433.33, 17, 156).unwrap();
        assert_eq!(a.maximum_fee.to_bits(), b.maximum_fee.to_bits());
        assert_eq!(a.weekly_rent_with_gst.to_bits(), b.weekly_rent_with_gst.to_bits());
    }

    #[test]
    fn test_move_in_standard_bond() {
        let cost = rent_move_in_cost(750.0).unwrap();
        assert_eq!(cost.advance, 1500.0);
        assert_eq!(cost.bond_weeks, 4);
        assert_eq!(cost.bond, 3000.0);
        assert_eq!(cost.total, 4500.0);
    }

    #[test]
    fn test_move_in_high_rent_bond() {
        let cost = rent_move_in_cost(900.0).unwrap();
        assert_eq!(cost.bond_weeks, 6);
        assert_eq!(cost.bond, 5400.0);
        assert_eq!(cost.total, 7200.0);
    }

    #[test]
    fn test_move_in_threshold_is_inclusive() {
        assert_eq!(rent_move_in_cost(800.0).unwrap().bond_weeks, 4);
        assert_eq!(rent_move_in_cost(800.01).unwrap().bond_weeks, 6);
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(2.5), 2.5);
        assert_eq!(round_money(0.125), 0.13);
        assert_eq!(round_money(-0.125), -0.13);
        assert_eq!(round_money(13.384615), 13.38);
    }

    #[test]
    fn test_lease_term() {
        assert_eq!(LeaseTerm::new(0).unwrap_err().kind(), ErrorKind::InvalidTerm);
        assert_eq!(LeaseTerm::new(78).unwrap().weeks(), 78);
        assert_eq!(LeaseTerm::ONE_YEAR.label(), "52 weeks (1 year)");
        assert_eq!(LeaseTerm::new(10).unwrap().label(), "10 weeks");
        assert!(serde_json::from_str::<LeaseTerm>("0").is_err());
        assert_eq!(serde_json::from_str::<LeaseTerm>("104").unwrap(), LeaseTerm::TWO_YEARS);
    }
}
