//! Error types for order settlement.

use thiserror::Error;

/// Result type alias for settlement operations
pub type Result<T> = std::result::Result<T, SettlementError>;

/// Errors that can occur while building, settling, or persisting orders.
#[derive(Error, Debug)]
pub enum SettlementError {
    /// Failed to open, read, or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// A value violated its contract (negative price, zero quantity, ...)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Invalid order sheet record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Tender kind outside the supported instruments
    #[error("Unknown tender kind '{0}'")]
    UnknownTenderKind(String),

    /// Currency code without a configurable exchange rate
    #[error("Unknown currency '{0}'. Expected usd or eur")]
    UnknownCurrency(String),

    /// Order status change not allowed from the current state
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Completion refused by the settlement or date gate
    #[error("Settlement blocked: {reason}")]
    SettlementBlocked { reason: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: order-settlement <orders.csv> [--rates <rates.csv>]")]
    MissingArgument,

    /// Malformed command line
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SettlementError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        SettlementError::InvalidInput {
            message: message.into(),
        }
    }
}
