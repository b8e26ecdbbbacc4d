use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use leasebreak_calc::export::default_export_filename;
use chrono::Datelike;
use leasebreak_calc::{
    export_portfolio_csv, load_rows_csv, month_options, weeks_between, CalculationOrchestrator,
    CalculatorDefaults, FeeRequest, RemainingInput,
};

#[derive(Parser)]
#[command(
    name = "leasebreak-calc",
    version,
    about = "SACAT lease-break and rental cost calculators (South Australia)"
)]
struct Cli {
    /// JSON file overriding the calculator defaults
    #[arg(long, global = true, env = "LEASEBREAK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tenant's share of the advertising cost
    Advertising(FeeArgs),
    /// Maximum reletting fee (rent incl. GST)
    Reletting(FeeArgs),
    /// Advance rent + bond for a new tenancy
    Rent {
        #[arg(long, allow_hyphen_values = true)]
        weekly_rent: String,
    },
    /// Weeks remaining between two dates
    Weeks {
        #[arg(long)]
        move_out: String,
        #[arg(long)]
        end_date: String,
    },
    /// Landlord income breakdown from a CSV of monthly rows
    Landlord {
        #[arg(long)]
        rows: PathBuf,
        /// Home-loan interest in percent (default from config)
        #[arg(long, allow_hyphen_values = true)]
        interest: Option<f64>,
        /// Write the breakdown CSV (defaults to a dated file name)
        #[arg(long, num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
    },
    /// List the standard lease terms
    Terms,
    /// Month choices for new landlord rows (this year and next)
    Months {
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Args)]
struct FeeArgs {
    /// Advertising cost or base weekly rent
    #[arg(long, allow_hyphen_values = true)]
    amount: String,

    /// Lease term in weeks (default from config)
    #[arg(long, allow_hyphen_values = true)]
    term: Option<String>,

    /// Remaining weeks, entered directly
    #[arg(long, allow_hyphen_values = true, required_unless_present = "move_out", conflicts_with = "move_out")]
    weeks: Option<String>,

    /// Move-out date (DD/MM/YYYY)
    #[arg(long, requires = "end_date")]
    move_out: Option<String>,

    /// Agreement end date (DD/MM/YYYY)
    #[arg(long, requires = "move_out")]
    end_date: Option<String>,
}

impl FeeArgs {
    fn into_request(self, defaults: &CalculatorDefaults) -> FeeRequest {
        let term = self
            .term
            .unwrap_or_else(|| defaults.default_term.weeks().to_string());

        let remaining = match (self.move_out, self.end_date) {
            (Some(move_out), Some(end_date)) => RemainingInput::Dates { move_out, end_date },
            _ => RemainingInput::Weeks {
                weeks: self.weeks.unwrap_or_default(),
            },
        };

        FeeRequest {
            amount: self.amount,
            term,
            remaining,
        }
    }
}

fn main() {
    leasebreak_calc::init_tracing("leasebreak_calc=warn");

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let defaults = CalculatorDefaults::load(cli.config.as_deref())?;
    let calculator = CalculationOrchestrator::default();

    match cli.command {
        Command::Advertising(args) => {
            let request = args.into_request(&defaults);
            let result = calculator.compute_advertising_fee(&request)?;

            println!("📣 Advertising Fee (SACAT)");
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("Advertising cost:    ${:.2}", result.advertising_cost);
            println!("Weeks remaining:     {}", result.weeks_remaining);
            println!("Lease term:          {} weeks (¾ = {})", result.term_weeks, result.three_quarter_term);
            println!("✓ Calculated fee:    ${:.2}", result.fee);
        }
        Command::Reletting(args) => {
            let request = args.into_request(&defaults);
            let result = calculator.compute_reletting_fee(&request)?;

            println!("🔑 Reletting Fee (SACAT)");
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("Base weekly rent:    ${:.2}", result.base_weekly_rent);
            println!("Weeks remaining:     {}", result.weeks_remaining);
            println!("Lease term:          {} weeks (¾ = {})", result.term_weeks, result.three_quarter_term);
            println!("Weekly rent + GST:   ${:.2}", result.weekly_rent_with_gst);
            println!("✓ Maximum fee:       ${:.2}", result.maximum_fee);
        }
        Command::Rent { weekly_rent } => {
            let cost = calculator.compute_rent_move_in(&weekly_rent)?;

            println!("🏡 Rent Move-In Cost");
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("Two weeks advance:   ${:.2}", cost.advance);
            println!("Bond ({} weeks):      ${:.2}", cost.bond_weeks, cost.bond);
            println!("✓ Total upfront:     ${:.2}", cost.total);
        }
        Command::Weeks { move_out, end_date } => {
            let weeks = weeks_between(move_out.as_str(), end_date.as_str())?;
            println!("✓ Weeks remaining: {}", weeks);
        }
        Command::Landlord {
            rows,
            interest,
            export,
        } => {
            let income_rows = load_rows_csv(&rows)?;
            let interest = interest.unwrap_or(defaults.interest_percentage);
            let summary = calculator.compute_landlord_portfolio(&income_rows, interest);

            println!("🏠 Landlord Income Breakdown");
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            for row in &summary.rows {
                println!("{:<20} ${:>12.2}", row.month, row.final_income);
            }
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("Total before loan:          ${:.2}", summary.totals.total_before_loan);
            println!("Home loan interest ({}%):  ${:.2}", interest, summary.totals.loan_interest);
            println!("✓ Total remaining income:   ${:.2}", summary.totals.final_total);

            if let Some(path) = export {
                let path = path.unwrap_or_else(|| {
                    PathBuf::from(default_export_filename(chrono::Local::now().date_naive()))
                });
                export_portfolio_csv(&path, &income_rows, &summary, &defaults.expense_categories)
                    .with_context(|| format!("Export to {} failed", path.display()))?;
                println!("\n💾 Exported to {}", path.display());
            }
        }
        Command::Terms => {
            for term in &defaults.lease_terms {
                let marker = if *term == defaults.default_term { " (default)" } else { "" };
                println!("{}{}", term.label(), marker);
            }
        }
        Command::Months { year } => {
            let year = year.unwrap_or_else(|| chrono::Local::now().year());
            for month in month_options(year) {
                println!("{}", month);
            }
        }
    }

    Ok(())
}
