//! Tunable limits and heuristics for the payoff calculator.
//!
//! Every field has a default, so a request may carry a partial `config`
//! object (or none at all) and a TOML file may set only the keys it cares
//! about.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PayoffError;
use crate::types::Money;
use crate::PayoffResult;

/// Safety cap on simulated months (50 years).
pub const DEFAULT_MAX_MONTHS: u32 = 600;

/// Largest month cap a caller may configure (100 years).
pub const MAX_MONTHS_LIMIT: u32 = 1200;

/// Top-level calculator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoffConfig {
    /// Hard cap on simulated months; also the upper bound for `target_months`.
    pub max_months: u32,
    pub recommendation: RecommendationPolicy,
    pub solver: SolverSettings,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            max_months: DEFAULT_MAX_MONTHS,
            recommendation: RecommendationPolicy::default(),
            solver: SolverSettings::default(),
        }
    }
}

/// When snowball is recommended over avalanche.
///
/// Avalanche wins unless its interest advantage is immaterial (below either
/// threshold) and snowball retires debts notably sooner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationPolicy {
    /// Absolute interest advantage (dollars) below which avalanche is immaterial.
    pub min_interest_savings: Money,
    /// Interest advantage as a fraction of avalanche total interest (0.01 = 1%).
    pub min_interest_savings_pct: Decimal,
    /// How many months earlier snowball must retire its first debt to count
    /// as a meaningful quick win.
    pub quick_win_months: u32,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            min_interest_savings: dec!(50),
            min_interest_savings_pct: dec!(0.01),
            quick_win_months: 3,
        }
    }
}

/// Bounds for the extra-payment binary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Largest monthly extra payment the search will consider.
    pub ceiling: Money,
    /// Search stops once the bracket is narrower than this.
    pub tolerance: Money,
    pub max_iterations: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            ceiling: dec!(10000),
            tolerance: dec!(1),
            max_iterations: 100,
        }
    }
}

impl PayoffConfig {
    pub fn validate(&self) -> PayoffResult<()> {
        if self.max_months == 0 || self.max_months > MAX_MONTHS_LIMIT {
            return Err(PayoffError::invalid(
                "config.max_months",
                format!("Month cap must be between 1 and {MAX_MONTHS_LIMIT}"),
            ));
        }

        let rec = &self.recommendation;
        if rec.min_interest_savings < Decimal::ZERO {
            return Err(PayoffError::invalid(
                "config.recommendation.min_interest_savings",
                "Threshold cannot be negative",
            ));
        }
        if rec.min_interest_savings_pct < Decimal::ZERO
            || rec.min_interest_savings_pct > Decimal::ONE
        {
            return Err(PayoffError::invalid(
                "config.recommendation.min_interest_savings_pct",
                "Must be a fraction between 0 and 1",
            ));
        }
        if rec.quick_win_months > self.max_months {
            return Err(PayoffError::invalid(
                "config.recommendation.quick_win_months",
                format!("Cannot exceed the {}-month cap", self.max_months),
            ));
        }

        let solver = &self.solver;
        if solver.ceiling <= Decimal::ZERO {
            return Err(PayoffError::invalid(
                "config.solver.ceiling",
                "Search ceiling must be positive",
            ));
        }
        if solver.tolerance < dec!(0.01) {
            return Err(PayoffError::invalid(
                "config.solver.tolerance",
                "Tolerance must be at least one cent",
            ));
        }
        if solver.max_iterations == 0 {
            return Err(PayoffError::invalid(
                "config.solver.max_iterations",
                "Solver needs at least one iteration",
            ));
        }
        Ok(())
    }
}
