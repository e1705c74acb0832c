//! Inverse solver: the extra monthly payment needed to be debt-free within a
//! target number of months.
//!
//! Payoff duration is non-increasing in the extra payment, so the minimal
//! sufficient extra is found by bisection over `[0, ceiling]` using the
//! avalanche order.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::calculator::DebtPayoffCalculator;
use crate::amortization::round_currency;
use crate::error::PayoffError;
use crate::types::Money;
use crate::PayoffResult;

/// Outcome of the target-timeline search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPaymentTarget {
    /// Extra monthly payment (above all minimums) to hit the target.
    /// Equals the search ceiling when the target is not achievable.
    pub required_extra_payment: Money,
    pub is_achievable: bool,
    pub target_months: u32,
    /// Minimum-only timeline; `None` when minimums never retire the debts.
    pub current_months: Option<u32>,
    /// Avalanche timeline at `required_extra_payment`, re-verified.
    pub projected_months: Option<u32>,
    /// Interest saved vs minimum-only (zero unless achievable)
    pub interest_saved: Money,
    /// Months saved vs minimum-only (zero unless achievable)
    pub months_saved: i64,
    /// Bisection steps taken
    pub iterations: u32,
}

impl DebtPayoffCalculator {
    /// Find the smallest extra payment for which the avalanche plan retires
    /// every debt within `target_months`.
    ///
    /// The configured `extra_payment` of the calculator is ignored; the
    /// solver searches its own range.
    pub fn calculate_extra_payment_for_target(
        &self,
        target_months: u32,
    ) -> PayoffResult<ExtraPaymentTarget> {
        let max_months = self.config().max_months;
        if target_months == 0 || target_months > max_months {
            return Err(PayoffError::invalid(
                "target_months",
                format!("Target must be between 1 and {max_months} months"),
            ));
        }

        let baseline = self.minimum_only_baseline().result;
        let current_months = baseline.converged.then_some(baseline.total_months);

        if let Some(months) = current_months {
            if months <= target_months {
                debug!(months, target_months, "target already met by minimum payments");
                return Ok(ExtraPaymentTarget {
                    required_extra_payment: Decimal::ZERO,
                    is_achievable: true,
                    target_months,
                    current_months,
                    projected_months: current_months,
                    interest_saved: Decimal::ZERO,
                    months_saved: 0,
                    iterations: 0,
                });
            }
        }

        let settings = &self.config().solver;
        let meets_target = |extra: Money| {
            let sim = self.simulate_avalanche(extra).result;
            sim.converged && sim.total_months <= target_months
        };

        let ceiling = settings
            .ceiling
            .round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity);
        if !meets_target(ceiling) {
            let at_ceiling = self.simulate_avalanche(ceiling).result;
            debug!(%ceiling, target_months, "target not reachable within search ceiling");
            return Ok(ExtraPaymentTarget {
                required_extra_payment: ceiling,
                is_achievable: false,
                target_months,
                current_months,
                projected_months: at_ceiling.converged.then_some(at_ceiling.total_months),
                interest_saved: Decimal::ZERO,
                months_saved: 0,
                iterations: 0,
            });
        }

        // Invariant: `lo` misses the target, `hi` meets it.
        let mut lo = Decimal::ZERO;
        let mut hi = ceiling;
        let mut iterations: u32 = 0;
        while hi - lo > settings.tolerance && iterations < settings.max_iterations {
            iterations += 1;
            let mid = round_currency(lo + (hi - lo) / dec!(2));
            if mid <= lo || mid >= hi {
                break;
            }
            if meets_target(mid) {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let verified = self.simulate_avalanche(hi).result;
        let is_achievable = verified.converged && verified.total_months <= target_months;
        let savings = verified.savings_against(&baseline);

        debug!(
            required = %hi,
            iterations,
            projected = verified.total_months,
            "extra payment search converged"
        );

        Ok(ExtraPaymentTarget {
            required_extra_payment: hi,
            is_achievable,
            target_months,
            current_months,
            projected_months: verified.converged.then_some(verified.total_months),
            interest_saved: if is_achievable {
                savings.interest_saved
            } else {
                Decimal::ZERO
            },
            months_saved: if is_achievable { savings.months_saved } else { 0 },
            iterations,
        })
    }
}
