use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayoffError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Non-convergent simulation: {strategy} still owed {remaining_balance} after {months} months")]
    NonConvergent {
        strategy: String,
        months: u32,
        remaining_balance: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PayoffError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PayoffError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True when the error means "not practically achievable" rather than bad input.
    pub fn is_non_convergent(&self) -> bool {
        matches!(self, PayoffError::NonConvergent { .. })
    }
}

impl From<serde_json::Error> for PayoffError {
    fn from(e: serde_json::Error) -> Self {
        PayoffError::SerializationError(e.to_string())
    }
}
