// LeaseBreak Calculator SA - Web Server
// JSON API over the calculators, with Axum

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use leasebreak_calc::orchestrator::raw_value;
use chrono::Datelike;
use leasebreak_calc::{
    month_options, weeks_between, CalcError, CalculationOrchestrator, CalculationResult,
    CalculatorDefaults, FeeRequest, IncomeRow,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Parser)]
#[command(name = "leasebreak-server", version, about = "LeaseBreak calculators JSON API")]
struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "LEASEBREAK_ADDR", default_value = "127.0.0.1:3000")]
    addr: String,

    /// JSON file overriding the calculator defaults
    #[arg(long, env = "LEASEBREAK_CONFIG")]
    config: Option<PathBuf>,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    calculator: CalculationOrchestrator,
    defaults: Arc<CalculatorDefaults>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ApiError>,
}

/// Error kind name (`ErrorKind`, or `InvalidRequest` for an unreadable body)
#[derive(Serialize)]
struct ApiError {
    kind: String,
    message: String,
}

const INVALID_REQUEST: &str = "InvalidRequest";

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(kind: &str, message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                kind: kind.to_string(),
                message,
            }),
        }
    }

    fn calc_failure(err: &CalcError) -> Self {
        Self::failure(err.kind().name(), err.to_string())
    }
}

/// Unwrap a JSON body, or answer with the envelope and axum's status
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(status = %rejection.status(), "rejected request body: {}", rejection.body_text());
        (
            rejection.status(),
            Json(ApiResponse::<()>::failure(INVALID_REQUEST, rejection.body_text())),
        )
            .into_response()
    })
}

/// 200 with the breakdown, 422 with the error kind and message
fn respond<T: Serialize>(result: CalculationResult<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<T>::calc_failure(&err)),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct RentRequest {
    #[serde(deserialize_with = "raw_value")]
    weekly_rent: String,
}

#[derive(Deserialize)]
struct WeeksRequest {
    #[serde(default, deserialize_with = "raw_value")]
    move_out: String,
    #[serde(default, deserialize_with = "raw_value")]
    end_date: String,
}

#[derive(Serialize)]
struct WeeksResponse {
    weeks_remaining: u32,
}

#[derive(Deserialize)]
struct PortfolioRequest {
    #[serde(default)]
    rows: Vec<IncomeRow>,
    /// Falls back to the configured default when absent
    interest_percentage: Option<f64>,
}

#[derive(Deserialize)]
struct MonthOptionsQuery {
    year: Option<i32>,
}

#[derive(Serialize)]
struct TermOption {
    weeks: u32,
    label: String,
}

#[derive(Serialize)]
struct LeaseTermsResponse {
    terms: Vec<TermOption>,
    default_term: u32,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/lease-terms - Term selector options
async fn lease_terms(State(state): State<AppState>) -> impl IntoResponse {
    let terms = state
        .defaults
        .lease_terms
        .iter()
        .map(|term| TermOption {
            weeks: term.weeks(),
            label: term.label(),
        })
        .collect();

    Json(ApiResponse::ok(LeaseTermsResponse {
        terms,
        default_term: state.defaults.default_term.weeks(),
    }))
}

/// GET /api/month-options?year=YYYY - Month choices for new rows (default: this year)
async fn month_options_handler(Query(query): Query<MonthOptionsQuery>) -> impl IntoResponse {
    let year = query.year.unwrap_or_else(|| chrono::Local::now().year());
    Json(ApiResponse::ok(month_options(year)))
}

/// GET /api/new-row - Blank income row with the configured expense columns
async fn new_row(State(state): State<AppState>) -> impl IntoResponse {
    let month = chrono::Local::now().format("%B %Y").to_string();
    Json(ApiResponse::ok(IncomeRow::with_categories(
        &month,
        &state.defaults.expense_categories,
    )))
}

/// POST /api/advertising-fee
async fn advertising_fee(
    State(state): State<AppState>,
    payload: Result<Json<FeeRequest>, JsonRejection>,
) -> Response {
    match parse_body(payload) {
        Ok(request) => respond(state.calculator.compute_advertising_fee(&request)),
        Err(response) => response,
    }
}

/// POST /api/reletting-fee
async fn reletting_fee(
    State(state): State<AppState>,
    payload: Result<Json<FeeRequest>, JsonRejection>,
) -> Response {
    match parse_body(payload) {
        Ok(request) => respond(state.calculator.compute_reletting_fee(&request)),
        Err(response) => response,
    }
}

/// POST /api/rent-move-in
async fn rent_move_in(
    State(state): State<AppState>,
    payload: Result<Json<RentRequest>, JsonRejection>,
) -> Response {
    match parse_body(payload) {
        Ok(request) => respond(state.calculator.compute_rent_move_in(&request.weekly_rent)),
        Err(response) => response,
    }
}

/// POST /api/weeks-remaining - Live preview for the date fields
async fn weeks_remaining(payload: Result<Json<WeeksRequest>, JsonRejection>) -> Response {
    let request = match parse_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    respond(
        weeks_between(request.move_out.as_str(), request.end_date.as_str())
            .map(|weeks_remaining| WeeksResponse { weeks_remaining }),
    )
}

/// POST /api/landlord-portfolio
async fn landlord_portfolio(
    State(state): State<AppState>,
    payload: Result<Json<PortfolioRequest>, JsonRejection>,
) -> Response {
    let request = match parse_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let interest = request
        .interest_percentage
        .unwrap_or(state.defaults.interest_percentage);

    let summary = state.calculator.compute_landlord_portfolio(&request.rows, interest);
    Json(ApiResponse::ok(summary)).into_response()
}

// ============================================================================
// Main Server
// ============================================================================

fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/lease-terms", get(lease_terms))
        .route("/month-options", get(month_options_handler))
        .route("/new-row", get(new_row))
        .route("/advertising-fee", post(advertising_fee))
        .route("/reletting-fee", post(reletting_fee))
        .route("/rent-move-in", post(rent_move_in))
        .route("/weeks-remaining", post(weeks_remaining))
        .route("/landlord-portfolio", post(landlord_portfolio))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<()> {
    leasebreak_calc::init_tracing("leasebreak_calc=info,leasebreak_server=info");

    let args = ServerArgs::parse();
    let defaults = CalculatorDefaults::load(args.config.as_deref())?;

    let state = AppState {
        calculator: CalculationOrchestrator::default(),
        defaults: Arc::new(defaults),
    };

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", args.addr))?;

    tracing::info!(addr = %args.addr, "🚀 server running, API under /api");

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
