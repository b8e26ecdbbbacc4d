// 📣 Calculation Events
// Notification the orchestrator emits after every successful calculation.
// Delivery (analytics, audit log, ...) belongs to the host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    AdvertisingFee,
    RelettingFee,
    RentMoveIn,
    LandlordIncome,
}

impl CalculatorKind {
    pub fn code(&self) -> &str {
        match self {
            CalculatorKind::AdvertisingFee => "advertising_fee",
            CalculatorKind::RelettingFee => "reletting_fee",
            CalculatorKind::RentMoveIn => "rent_move_in",
            CalculatorKind::LandlordIncome => "landlord_income",
        }
    }
}

impl std::fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// CalculationEvent - "calculation completed", with the amount and inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub calculator: CalculatorKind,
    /// Headline figure of the result, rounded to cents
    pub amount: f64,
    /// Inputs that produced it (term, rent, weeks remaining, ...)
    pub params: serde_json::Value,
}

impl CalculationEvent {
    pub fn new(calculator: CalculatorKind, amount: f64, params: serde_json::Value) -> Self {
        CalculationEvent {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            calculator,
            amount,
            params,
        }
    }

    /// One-line label in the style of the analytics event
    pub fn label(&self) -> String {
        match self.params.as_object() {
            Some(map) if !map.is_empty() => map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }
    }
}

// ============================================================================
// OBSERVERS
// ============================================================================

/// CalculationObserver - Host hook for completed calculations
///
/// Called synchronously from the calculating thread; implementations must be
/// cheap and must not fail the calculation.
pub trait CalculationObserver: Send + Sync {
    fn calculation_completed(&self, event: &CalculationEvent);
}

/// Logs each event through `tracing` at INFO
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CalculationObserver for TracingObserver {
    fn calculation_completed(&self, event: &CalculationEvent) {
        tracing::info!(
            event_id = %event.event_id,
            calculator = %event.calculator,
            amount = event.amount,
            params = %event.params,
            "calculation completed"
        );
    }
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CalculationObserver for NoopObserver {
    fn calculation_completed(&self, _event: &CalculationEvent) {}
}

/// Keeps events in memory; handy for hosts that batch and for tests
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<CalculationEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CalculationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CalculationObserver for RecordingObserver {
    fn calculation_completed(&self, event: &CalculationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
