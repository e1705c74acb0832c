use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::calculator::DebtPayoffCalculator;
use super::simulation::DebtPayoffResult;
use super::strategy::PayoffStrategy;
use crate::config::RecommendationPolicy;
use crate::types::Money;
use crate::PayoffResult;

/// Snowball, avalanche and minimum-only side by side, with a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayoffComparison {
    pub snowball: DebtPayoffResult,
    pub avalanche: DebtPayoffResult,
    pub minimum_only: DebtPayoffResult,
    pub recommended_strategy: PayoffStrategy,
    pub recommendation_reason: String,
    /// Snowball interest minus avalanche interest
    pub interest_difference: Money,
    /// Snowball months minus avalanche months
    pub months_difference: i64,
}

impl DebtPayoffCalculator {
    /// Run avalanche, snowball and minimum-only and pick a recommendation.
    ///
    /// A minimum-only baseline that never retires the debts is kept with
    /// `converged == false`; savings are then measured against the month cap.
    pub fn compare_strategies(&self) -> PayoffResult<DebtPayoffComparison> {
        let mut avalanche = self.calculate_avalanche()?;
        let mut snowball = self.calculate_snowball()?;
        let mut minimum_only = self.minimum_only_baseline().result;

        avalanche.savings_vs_minimum = Some(avalanche.savings_against(&minimum_only));
        snowball.savings_vs_minimum = Some(snowball.savings_against(&minimum_only));
        minimum_only.savings_vs_minimum = Some(minimum_only.savings_against(&minimum_only));

        let (recommended_strategy, recommendation_reason) =
            recommend(&avalanche, &snowball, &self.config().recommendation);

        debug!(
            recommended = %recommended_strategy,
            avalanche_interest = %avalanche.total_interest_paid,
            snowball_interest = %snowball.total_interest_paid,
            "strategy comparison complete"
        );

        Ok(DebtPayoffComparison {
            interest_difference: snowball.total_interest_paid - avalanche.total_interest_paid,
            months_difference: i64::from(snowball.total_months) - i64::from(avalanche.total_months),
            snowball,
            avalanche,
            minimum_only,
            recommended_strategy,
            recommendation_reason,
        })
    }
}

/// Avalanche unless its interest edge is immaterial and snowball gets the
/// debtor somewhere noticeably faster.
pub fn recommend(
    avalanche: &DebtPayoffResult,
    snowball: &DebtPayoffResult,
    policy: &RecommendationPolicy,
) -> (PayoffStrategy, String) {
    let advantage = snowball.total_interest_paid - avalanche.total_interest_paid;
    let relative_floor = avalanche.total_interest_paid * policy.min_interest_savings_pct;
    let immaterial = advantage < policy.min_interest_savings || advantage < relative_floor;

    let finishes_sooner = snowball.total_months < avalanche.total_months;
    let quick_win = match (snowball.first_payoff_month(), avalanche.first_payoff_month()) {
        (Some(s), Some(a)) => {
            policy.quick_win_months > 0 && a.saturating_sub(s) >= policy.quick_win_months
        }
        _ => false,
    };

    if immaterial && (finishes_sooner || quick_win) {
        let reason = if finishes_sooner {
            format!(
                "Snowball costs only ${:.2} more in interest but is debt-free in {} months instead of {}.",
                advantage.max(Decimal::ZERO),
                snowball.total_months,
                avalanche.total_months
            )
        } else {
            format!(
                "Snowball costs only ${:.2} more in interest and clears its first debt in month {} \
                 instead of month {}, which helps keep momentum.",
                advantage.max(Decimal::ZERO),
                snowball.first_payoff_month().unwrap_or_default(),
                avalanche.first_payoff_month().unwrap_or_default()
            )
        };
        return (PayoffStrategy::Snowball, reason);
    }

    let reason = if advantage > Decimal::ZERO {
        format!(
            "Avalanche saves ${:.2} in interest compared with snowball and is debt-free in {} months.",
            advantage, avalanche.total_months
        )
    } else {
        format!(
            "Avalanche and snowball cost the same interest here; avalanche targets the most \
             expensive debt first and is debt-free in {} months.",
            avalanche.total_months
        )
    };
    (PayoffStrategy::Avalanche, reason)
}
