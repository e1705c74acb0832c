pub mod amortization;
pub mod config;
pub mod error;
pub mod types;

#[cfg(feature = "payoff")]
pub mod payoff;

pub use config::{PayoffConfig, RecommendationPolicy, SolverSettings};
pub use error::PayoffError;
pub use types::*;

/// Standard result type for all debt-payoff operations
pub type PayoffResult<T> = Result<T, PayoffError>;
