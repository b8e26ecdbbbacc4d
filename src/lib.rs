// LeaseBreak Calculator SA - Core Library
// SACAT lease-break fees, rent move-in costs and landlord income, for the CLI,
// the API server and tests

pub mod error;
pub mod dates;          // Date normalizer (day-first)
pub mod weeks;          // Weeks remaining between move-out and agreement end
pub mod fees;           // Advertising / reletting fee, move-in cost
pub mod landlord;       // Landlord monthly income + portfolio totals
pub mod events;         // Calculation-completed notifications
pub mod orchestrator;   // Raw form input -> validated result
pub mod config;
pub mod export;         // Landlord income CSV import/export

// Re-export commonly used types
pub use error::{CalcError, CalculationResult, ErrorKind};
pub use dates::{normalize, CalendarDate, DateInput};
pub use weeks::{weeks_between, weeks_remaining};
pub use fees::{
    advertising_fee, reletting_fee, rent_move_in_cost, round_money, three_quarter_term,
    AdvertisingFeeBreakdown, LeaseTerm, MoveInCost, RelettingFeeBreakdown,
};
pub use landlord::{
    landlord_portfolio_totals, landlord_row_income, month_options,
    Expense, IncomeRow, PortfolioTotals, RowIncome,
};
pub use events::{
    CalculationEvent, CalculationObserver, CalculatorKind,
    NoopObserver, RecordingObserver, TracingObserver,
};
pub use orchestrator::{
    CalculationOrchestrator, FeeRequest, InputMode, PortfolioSummary, RemainingInput,
    ValidatedFeeInput,
};
pub use config::CalculatorDefaults;
pub use export::{export_portfolio_csv, load_rows_csv, read_rows_csv, write_portfolio_csv};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the stderr `tracing` subscriber used by the binaries
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Ignore the error if a subscriber is already installed (tests, embedding hosts)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
