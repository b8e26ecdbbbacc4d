// 🗓️ Weeks Remaining - SACAT remaining-liability period
// Whole weeks between move-out and agreement end, rounding up on 4+ spare days

use crate::dates::{normalize, CalendarDate, DateInput};
use crate::error::{CalcError, CalculationResult};

/// Leftover days at or above this count add one more week
pub const ROUND_UP_REMAINDER_DAYS: i64 = 4;

/// Weeks remaining between `move_out` and `end_date`
///
/// `move_out` after `end_date` is an error, never swapped. Same-day dates
/// give 0 weeks.
///
/// # Examples:
/// ```
/// use leasebreak_calc::dates::CalendarDate;
/// use leasebreak_calc::weeks::weeks_remaining;
///
/// let move_out = CalendarDate::from_ymd(2025, 1, 1).unwrap();
/// let end = CalendarDate::from_ymd(2025, 2, 2).unwrap();
/// assert_eq!(weeks_remaining(move_out, end).unwrap(), 5); // 32 days = 4w + 4d
/// ```
pub fn weeks_remaining(move_out: CalendarDate, end_date: CalendarDate) -> CalculationResult<u32> {
    if move_out > end_date {
        return Err(CalcError::DateOrder { move_out, end_date });
    }

    let diff_days = move_out.days_until(end_date);
    let complete_weeks = diff_days / 7;
    let remainder = diff_days % 7;

    let weeks = if remainder >= ROUND_UP_REMAINDER_DAYS {
        complete_weeks + 1
    } else {
        complete_weeks
    };

    // The date range caps diff_days at ~73k, well inside u32
    Ok(weeks as u32)
}

/// Normalize two raw dates, then compute weeks remaining
///
/// Used for the live "calculated weeks" preview next to the date fields.
pub fn weeks_between<'a, 'b>(
    move_out: impl Into<DateInput<'a>>,
    end_date: impl Into<DateInput<'b>>,
) -> CalculationResult<u32> {
    let move_out = normalize(move_out)?;
    let end_date = normalize(end_date)?;
    weeks_remaining(move_out, end_date)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    #[rstest]
    #[case(ymd(2025, 1, 1), 0)] // same day
    #[case(ymd(2025, 1, 4), 0)] // 3 days
    #[case(ymd(2025, 1, 5), 1)] // 4 days rounds up
    #[case(ymd(2025, 1, 8), 1)] // exactly a week
    #[case(ymd(2025, 1, 29), 4)] // 28 days
    #[case(ymd(2025, 2, 1), 4)] // 31 days, remainder 3
    #[case(ymd(2025, 2, 2), 5)] // 32 days, remainder 4
    #[case(ymd(2025, 2, 4), 5)] // 34 days, remainder 6
    #[case(ymd(2025, 2, 5), 5)] // 35 days
    fn test_remainder_threshold(#[case] end: CalendarDate, #[case] expected: u32) {
        assert_eq!(weeks_remaining(ymd(2025, 1, 1), end).unwrap(), expected);
    }

    #[test]
    fn test_year_long_lease_across_leap_day() {
        // 2024-01-01 .. 2024-12-31 = 365 days = 52w + 1d
        assert_eq!(weeks_remaining(ymd(2024, 1, 1), ymd(2024, 12, 31)).unwrap(), 52);
    }

    #[test]
    fn test_move_out_after_end_fails() {
        let err = weeks_remaining(ymd(2025, 2, 2), ymd(2025, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DateOrderError);

        // One day late is still an error, not an abs() of 1 day
        let err = weeks_remaining(ymd(2025, 1, 2), ymd(2025, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DateOrderError);
    }

    #[test]
    fn test_weeks_between_raw_inputs() {
        assert_eq!(weeks_between("01/01/2025", "02/02/2025").unwrap(), 5);
        assert_eq!(weeks_between("2025-01-01", "29 January 2025").unwrap(), 4);
    }

    #[test]
    fn test_weeks_between_propagates_failures() {
        assert_eq!(
            weeks_between("garbage", "02/02/2025").unwrap_err().kind(),
            ErrorKind::InvalidDate
        );
        assert_eq!(
            weeks_between("02/02/2025", "01/01/2025").unwrap_err().kind(),
            ErrorKind::DateOrderError
        );
    }
}
