// 📅 Date Normalizer
// Turns whatever the user typed into a real calendar day (Australian, day-first)

use crate::error::{CalcError, CalculationResult};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Earliest accepted year
pub const MIN_YEAR: i32 = 1900;
/// Latest accepted year
pub const MAX_YEAR: i32 = 2100;

/// Explicit formats, tried in order. Numeric forms are all day-first.
pub const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",   // dd/MM/yyyy
    "%-d/%-m/%Y", // d/M/yyyy
    "%d-%m-%Y",   // dd-MM-yyyy
    "%Y-%m-%d",   // yyyy-MM-dd
    "%d.%m.%Y",   // dd.MM.yyyy
    // Text month (%B also accepts the abbreviation, case-insensitively)
    "%d %B %Y",
    "%d-%B-%Y",
    "%B %d, %Y",
    "%B %d %Y",
];

/// Date-time shapes accepted when no plain date format matched
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

// ============================================================================
// CALENDAR DATE
// ============================================================================

/// CalendarDate - A validated day in [1900, 2100], no time of day
///
/// Serializes as ISO `yyyy-MM-dd`; deserializes from any format
/// [`normalize`] accepts. Displays day-first (`dd/MM/yyyy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "NaiveDate", try_from = "String")]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Wrap a chrono date after the range check
    pub fn new(date: NaiveDate) -> CalculationResult<Self> {
        if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            Ok(CalendarDate(date))
        } else {
            Err(CalcError::InvalidDate(date.to_string()))
        }
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> CalculationResult<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| CalcError::InvalidDate(format!("{:04}-{:02}-{:02}", year, month, day)))?;
        CalendarDate::new(date)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Whole calendar days from `self` to `other` (negative if `other` is earlier)
    pub fn days_until(&self, other: CalendarDate) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// ISO form, e.g. `2025-01-29`
    pub fn iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%d/%m/%Y"))
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize(value.as_str())
    }
}

// ============================================================================
// DATE INPUT
// ============================================================================

/// DateInput - What a host can hand to the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    Text(&'a str),
    Date(NaiveDate),
    Empty,
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(text: &'a str) -> Self {
        DateInput::Text(text)
    }
}

impl<'a> From<Option<&'a str>> for DateInput<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(DateInput::Empty, DateInput::Text)
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<CalendarDate> for DateInput<'_> {
    fn from(date: CalendarDate) -> Self {
        DateInput::Date(date.0)
    }
}

// ============================================================================
// NORMALIZER
// ============================================================================

/// Normalize a user-supplied date
///
/// Strings are trimmed and tried against [`DATE_FORMATS`] in order, then
/// against ISO date-time shapes (RFC 3339 included), keeping the date part as
/// written. The first candidate inside [`MIN_YEAR`]..=[`MAX_YEAR`] wins.
///
/// # Examples:
/// ```
/// use leasebreak_calc::dates::normalize;
///
/// let date = normalize("03/04/2025").unwrap();
/// assert_eq!(date.iso(), "2025-04-03"); // day-first
/// ```
pub fn normalize<'a>(input: impl Into<DateInput<'a>>) -> CalculationResult<CalendarDate> {
    match input.into() {
        DateInput::Date(date) => CalendarDate::new(date),
        DateInput::Empty => Err(CalcError::InvalidDate(String::new())),
        DateInput::Text(text) => parse_text(text),
    }
}

fn parse_text(raw: &str) -> CalculationResult<CalendarDate> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(CalcError::InvalidDate(raw.to_string()));
    }

    // chrono skips whitespace ahead of numeric fields, so only formats that
    // spell out a space may see one
    let has_space = text.contains(char::is_whitespace);
    let allows = move |fmt: &&&str| !has_space || fmt.contains(' ');

    let explicit = DATE_FORMATS
        .iter()
        .filter(allows)
        .filter_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok());

    let from_datetime = DATETIME_FORMATS
        .iter()
        .filter(allows)
        .filter_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date());

    let from_rfc3339 = DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_local().date());

    let found = explicit
        .chain(from_datetime)
        .chain(from_rfc3339)
        .find_map(|date| CalendarDate::new(date).ok());

    match found {
        Some(date) => Ok(date),
        None => {
            tracing::debug!(input = raw, "date did not match any accepted format");
            Err(CalcError::InvalidDate(raw.to_string()))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
