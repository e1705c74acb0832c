//! JSON request/response shapes for hosts (HTTP handlers, CLI, bindings).
//!
//! Each entry point validates, runs the calculator and wraps the answer in a
//! [`ComputationOutput`] envelope with caller-facing warnings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::calculator::DebtPayoffCalculator;
use super::comparison::DebtPayoffComparison;
use super::debt::DebtInput;
use super::simulation::DebtPayoffResult;
use super::strategy::{CustomPriority, PayoffStrategy};
use super::target::ExtraPaymentTarget;
use crate::config::PayoffConfig;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::PayoffResult;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Strategy selector as accepted on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedStrategy {
    Snowball,
    #[default]
    Avalanche,
    Custom,
    MinimumOnly,
    /// Snowball, avalanche and minimum-only side by side
    Comparison,
}

impl RequestedStrategy {
    fn single(self) -> Option<PayoffStrategy> {
        match self {
            RequestedStrategy::Snowball => Some(PayoffStrategy::Snowball),
            RequestedStrategy::Avalanche => Some(PayoffStrategy::Avalanche),
            RequestedStrategy::Custom => Some(PayoffStrategy::Custom),
            RequestedStrategy::MinimumOnly => Some(PayoffStrategy::MinimumOnly),
            RequestedStrategy::Comparison => None,
        }
    }
}

/// Body of a payoff-plan request.
///
/// `extra_payment` defaults to 0 and `strategy` to avalanche when omitted;
/// the strategy actually run is echoed in the envelope's `assumptions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffRequest {
    pub debts: Vec<DebtInput>,
    #[serde(default)]
    pub extra_payment: Money,
    /// Avalanche when omitted
    #[serde(default)]
    pub strategy: RequestedStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_order: Option<Vec<CustomPriority>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PayoffConfig>,
}

/// Body of a target-timeline request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRequest {
    pub debts: Vec<DebtInput>,
    /// Missing means 0, which fails validation unless overridden by the host
    #[serde(default)]
    pub target_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PayoffConfig>,
}

/// Either a single plan or a three-way comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayoffResponse {
    Comparison(Box<DebtPayoffComparison>),
    Single(Box<DebtPayoffResult>),
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run the requested strategy (or comparison).
///
/// Single-strategy results carry `savings_vs_minimum` whenever the
/// minimum-only baseline itself converges.
pub fn plan_payoff(input: &PayoffRequest) -> PayoffResult<ComputationOutput<PayoffResponse>> {
    let start = Instant::now();
    let calc = build_calculator(&input.debts, input.extra_payment, input.config.as_ref())?;
    let mut warnings = calc.diagnostics();

    let (methodology, response) = match input.strategy.single() {
        None => {
            let comparison = calc.compare_strategies()?;
            push_baseline_warning(&comparison.minimum_only, &mut warnings);
            (
                "Debt Payoff Strategy Comparison",
                PayoffResponse::Comparison(Box::new(comparison)),
            )
        }
        Some(strategy) => {
            let mut result = calc.calculate(strategy, input.custom_order.as_deref())?;
            if strategy != PayoffStrategy::MinimumOnly && calc.extra_payment().is_zero() {
                warnings.push(format!(
                    "No extra payment: the {strategy} plan is identical to paying minimums only"
                ));
            }
            let baseline = calc.minimum_only_baseline().result;
            if baseline.converged {
                result.savings_vs_minimum = Some(result.savings_against(&baseline));
            } else {
                push_baseline_warning(&baseline, &mut warnings);
            }
            (
                "Debt Payoff Simulation",
                PayoffResponse::Single(Box::new(result)),
            )
        }
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "debt_count": input.debts.len(),
            "extra_payment": input.extra_payment.to_string(),
            "strategy": input.strategy,
            "max_months": calc.config().max_months,
        }),
        warnings,
        elapsed,
        response,
    ))
}

/// Always run the three-way comparison, whatever `strategy` says.
pub fn compare_payoff_strategies(
    input: &PayoffRequest,
) -> PayoffResult<ComputationOutput<DebtPayoffComparison>> {
    let start = Instant::now();
    let calc = build_calculator(&input.debts, input.extra_payment, input.config.as_ref())?;
    let mut warnings = calc.diagnostics();

    let comparison = calc.compare_strategies()?;
    push_baseline_warning(&comparison.minimum_only, &mut warnings);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt Payoff Strategy Comparison",
        &serde_json::json!({
            "debt_count": input.debts.len(),
            "extra_payment": input.extra_payment.to_string(),
            "recommendation": calc.config().recommendation,
        }),
        warnings,
        elapsed,
        comparison,
    ))
}

/// Solve for the extra payment that meets `target_months`.
pub fn solve_target_payment(
    input: &TargetRequest,
) -> PayoffResult<ComputationOutput<ExtraPaymentTarget>> {
    let start = Instant::now();
    let calc = build_calculator(&input.debts, Decimal::ZERO, input.config.as_ref())?;
    let mut warnings = calc.diagnostics();

    let outcome = calc.calculate_extra_payment_for_target(input.target_months)?;
    if !outcome.is_achievable {
        warnings.push(format!(
            "A {}-month payoff is not reachable with up to {} extra per month",
            input.target_months, outcome.required_extra_payment
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Extra Payment Target Solver (Bisection, Avalanche Order)",
        &serde_json::json!({
            "debt_count": input.debts.len(),
            "target_months": input.target_months,
            "solver": calc.config().solver,
        }),
        warnings,
        elapsed,
        outcome,
    ))
}

fn build_calculator(
    debts: &[DebtInput],
    extra_payment: Money,
    config: Option<&PayoffConfig>,
) -> PayoffResult<DebtPayoffCalculator> {
    DebtPayoffCalculator::with_config(
        debts.to_vec(),
        extra_payment,
        config.cloned().unwrap_or_default(),
    )
}

fn push_baseline_warning(baseline: &DebtPayoffResult, warnings: &mut Vec<String>) {
    if !baseline.converged {
        warnings.push(format!(
            "Minimum payments alone do not retire these debts within {} months; \
             savings are measured against that cap",
            baseline.total_months
        ));
    }
}
