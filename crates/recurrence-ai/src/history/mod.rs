//! Session history: the append-only ledger, its per-session CSV files,
//! and tolerant reloading of past sessions for comparison.

mod ledger;
mod parser;
mod record;
mod store;

pub use ledger::HistoryLedger;
pub use parser::{LoadedRecord, SessionSnapshot};
pub use record::{round_confidence, PredictionRecord, SessionId, TIMESTAMP_FORMAT};
pub use store::{write_csv, SessionStore};

pub const COLUMN_COUNT: usize = 8;

/// Persisted column order.
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "Session ID",
    "Timestamp",
    "Name",
    "Confidence_No",
    "Confidence_Yes",
    "Prediction",
    "Risk",
    "HighRisk",
];

/// Read access shared by live records and rows reloaded from disk, so
/// aggregates and exports work on either.
pub trait HistoryRow {
    fn name(&self) -> Option<&str>;
    fn confidence_no(&self) -> Option<f64>;
    fn confidence_yes(&self) -> Option<f64>;
    /// Canonical outcome label when recognisable, otherwise the raw text.
    fn prediction(&self) -> Option<&str>;
    fn risk(&self) -> Option<&str>;
    fn cells(&self) -> [String; COLUMN_COUNT];
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("session history io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session history CSV error: {0}")]
    Csv(#[from] csv::Error),
}
