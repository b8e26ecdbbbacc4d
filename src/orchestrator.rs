// 🎛️ Calculation Orchestrator
// Entry point for a user-triggered calculation: raw form values in,
// validated breakdown (or tagged failure) out, observer notified on success.
//
// Per call: Validating -> Computing -> Done(Ok | Err). Nothing is kept
// between calls.

use crate::dates::{normalize, CalendarDate};
use crate::error::{CalcError, CalculationResult};
use crate::events::{CalculationEvent, CalculationObserver, CalculatorKind, TracingObserver};
use crate::fees::{
    advertising_fee, reletting_fee, rent_move_in_cost, AdvertisingFeeBreakdown, LeaseTerm,
    MoveInCost, RelettingFeeBreakdown,
};
use crate::landlord::{landlord_portfolio_totals, IncomeRow, PortfolioTotals, RowIncome};
use crate::weeks::weeks_remaining;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::json;
use std::sync::Arc;

// ============================================================================
// REQUEST TYPES
// ============================================================================

/// InputMode - How the remaining weeks are supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    UseDates,
    UseWeeksDirectly,
}

/// RemainingInput - Remaining-weeks field(s) exactly as entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RemainingInput {
    Weeks {
        #[serde(deserialize_with = "raw_value")]
        weeks: String,
    },
    Dates {
        #[serde(default, deserialize_with = "raw_value")]
        move_out: String,
        #[serde(default, deserialize_with = "raw_value")]
        end_date: String,
    },
}

impl RemainingInput {
    /// Build from the form's date-mode toggle and its three fields
    pub fn from_form(use_dates: bool, weeks: &str, move_out: &str, end_date: &str) -> Self {
        if use_dates {
            RemainingInput::Dates {
                move_out: move_out.to_string(),
                end_date: end_date.to_string(),
            }
        } else {
            RemainingInput::Weeks {
                weeks: weeks.to_string(),
            }
        }
    }

    pub fn mode(&self) -> InputMode {
        match self {
            RemainingInput::Weeks { .. } => InputMode::UseWeeksDirectly,
            RemainingInput::Dates { .. } => InputMode::UseDates,
        }
    }
}

/// FeeRequest - Inputs of the advertising and reletting calculators
///
/// `amount` is the advertising cost or the base weekly rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRequest {
    #[serde(deserialize_with = "raw_value")]
    pub amount: String,
    #[serde(deserialize_with = "raw_value")]
    pub term: String,
    pub remaining: RemainingInput,
}

impl FeeRequest {
    pub fn with_weeks(amount: &str, weeks: &str, term: &str) -> Self {
        FeeRequest {
            amount: amount.to_string(),
            term: term.to_string(),
            remaining: RemainingInput::Weeks {
                weeks: weeks.to_string(),
            },
        }
    }

    pub fn with_dates(amount: &str, move_out: &str, end_date: &str, term: &str) -> Self {
        FeeRequest {
            amount: amount.to_string(),
            term: term.to_string(),
            remaining: RemainingInput::Dates {
                move_out: move_out.to_string(),
                end_date: end_date.to_string(),
            },
        }
    }
}

/// Form fields arrive as strings or bare JSON numbers; keep them raw
///
/// Use with `#[serde(deserialize_with = "raw_value")]` on `String` fields.
pub fn raw_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

// ============================================================================
// FIELD PARSING
// ============================================================================

/// Money field: optional leading `$`, thousands commas, must be > 0
pub fn parse_amount(raw: &str) -> CalculationResult<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    match cleaned.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(CalcError::InvalidAmount(raw.to_string())),
    }
}

/// Weeks field: whole number > 0 ("12" or "12.0"), plain digits only
pub fn parse_weeks(raw: &str) -> CalculationResult<u32> {
    let text = raw.trim();
    if !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(CalcError::InvalidWeeks(raw.to_string()));
    }

    match text.parse::<f64>() {
        Ok(weeks)
            if weeks.is_finite() && weeks > 0.0 && weeks.fract() == 0.0 && weeks <= u32::MAX as f64 =>
        {
            Ok(weeks as u32)
        }
        _ => Err(CalcError::InvalidWeeks(raw.to_string())),
    }
}

/// Term selector value: positive integer number of weeks
pub fn parse_term(raw: &str) -> CalculationResult<LeaseTerm> {
    let weeks = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| CalcError::InvalidTerm(raw.to_string()))?;
    LeaseTerm::new(weeks).map_err(|_| CalcError::InvalidTerm(raw.to_string()))
}

// ============================================================================
// RESULT TYPES
// ============================================================================

/// ValidatedFeeInput - A FeeRequest that passed every check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedFeeInput {
    pub amount: f64,
    pub weeks_remaining: u32,
    pub term: LeaseTerm,
    /// Present when the weeks were derived from dates
    pub dates: Option<(CalendarDate, CalendarDate)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub interest_percentage: f64,
    pub rows: Vec<RowIncome>,
    pub totals: PortfolioTotals,
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

/// CalculationOrchestrator - Stateless apart from its observer; share freely
#[derive(Clone)]
pub struct CalculationOrchestrator {
    observer: Arc<dyn CalculationObserver>,
}

impl std::fmt::Debug for CalculationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculationOrchestrator").finish_non_exhaustive()
    }
}

impl Default for CalculationOrchestrator {
    fn default() -> Self {
        CalculationOrchestrator::new(Arc::new(TracingObserver))
    }
}

impl CalculationOrchestrator {
    pub fn new(observer: Arc<dyn CalculationObserver>) -> Self {
        CalculationOrchestrator { observer }
    }

    /// Validate amount, then remaining weeks, then term (in that order)
    ///
    /// A bad amount short-circuits before any date is parsed.
    pub fn validate(&self, request: &FeeRequest) -> CalculationResult<ValidatedFeeInput> {
        let amount = parse_amount(&request.amount)?;

        let (weeks, dates) = match &request.remaining {
            RemainingInput::Weeks { weeks } => (parse_weeks(weeks)?, None),
            RemainingInput::Dates { move_out, end_date } => {
                let move_out = normalize(move_out.as_str())?;
                let end_date = normalize(end_date.as_str())?;
                let weeks = weeks_remaining(move_out, end_date)?;
                if weeks == 0 {
                    return Err(CalcError::InvalidWeeks(format!(
                        "0 weeks between {} and {}",
                        move_out, end_date
                    )));
                }
                (weeks, Some((move_out, end_date)))
            }
        };

        let term = parse_term(&request.term)?;

        Ok(ValidatedFeeInput {
            amount,
            weeks_remaining: weeks,
            term,
            dates,
        })
    }

    pub fn compute_advertising_fee(
        &self,
        request: &FeeRequest,
    ) -> CalculationResult<AdvertisingFeeBreakdown> {
        let result = self.validate(request).and_then(|input| {
            advertising_fee(input.amount, input.weeks_remaining, input.term.weeks())
        });

        self.finish(CalculatorKind::AdvertisingFee, result, |b| {
            (
                b.fee,
                json!({
                    "term_weeks": b.term_weeks,
                    "advertising_cost": b.advertising_cost,
                    "weeks_remaining": b.weeks_remaining,
                }),
            )
        })
    }

    pub fn compute_reletting_fee(
        &self,
        request: &FeeRequest,
    ) -> CalculationResult<RelettingFeeBreakdown> {
        let result = self.validate(request).and_then(|input| {
            reletting_fee(input.amount, input.weeks_remaining, input.term.weeks())
        });

        self.finish(CalculatorKind::RelettingFee, result, |b| {
            (
                b.maximum_fee,
                json!({
                    "term_weeks": b.term_weeks,
                    "base_rent": b.base_weekly_rent,
                    "weeks_remaining": b.weeks_remaining,
                }),
            )
        })
    }

    pub fn compute_rent_move_in(&self, weekly_rent: &str) -> CalculationResult<MoveInCost> {
        let result = parse_amount(weekly_rent).and_then(rent_move_in_cost);

        self.finish(CalculatorKind::RentMoveIn, result, |c| {
            (c.total, json!({ "weekly_rent": c.weekly_rent }))
        })
    }

    /// Row incomes plus portfolio totals; this calculator has no failure case
    pub fn compute_landlord_portfolio(
        &self,
        rows: &[IncomeRow],
        interest_percentage: f64,
    ) -> PortfolioSummary {
        let row_incomes: Vec<RowIncome> = rows.iter().map(RowIncome::from).collect();
        let totals = landlord_portfolio_totals(&row_incomes, interest_percentage);

        let summary = PortfolioSummary {
            interest_percentage,
            rows: row_incomes,
            totals,
        };

        let event = CalculationEvent::new(
            CalculatorKind::LandlordIncome,
            summary.totals.final_total,
            json!({
                "rows": summary.rows.len(),
                "interest_percentage": interest_percentage,
            }),
        );
        self.observer.calculation_completed(&event);

        summary
    }

    fn finish<T>(
        &self,
        kind: CalculatorKind,
        result: CalculationResult<T>,
        describe: impl FnOnce(&T) -> (f64, serde_json::Value),
    ) -> CalculationResult<T> {
        match &result {
            Ok(value) => {
                let (amount, params) = describe(value);
                let event = CalculationEvent::new(kind, amount, params);
                self.observer.calculation_completed(&event);
            }
            Err(err) => {
                tracing::debug!(calculator = %kind, kind = %err.kind(), "calculation rejected: {}", err);
            }
        }
        result
    }
}

// ============================================================================
// TESTS
// ============================================================================
