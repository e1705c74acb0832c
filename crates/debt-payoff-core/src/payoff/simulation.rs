//! Month-by-month amortization with a pooled extra payment.
//!
//! Each month every open debt accrues interest on its opening balance and
//! receives its minimum payment. The extra pool (configured extra plus the
//! minimums of debts retired in earlier months) then goes to open debts in
//! priority order, cascading any surplus to the next debt in the same month.
//! All amounts are rounded to cents at every step.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::debt::DebtInput;
use super::strategy::PayoffStrategy;
use crate::amortization::{is_settled, monthly_interest, round_currency};
use crate::types::{DebtId, Money};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One debt's activity in one simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    /// 1-based month index
    pub month: u32,
    pub debt_id: DebtId,
    pub debt_name: String,
    /// Minimum plus any allocated extra
    pub payment_amount: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    /// Portion of `payment_amount` drawn from the extra pool
    pub extra_payment: Money,
    /// Accrued interest the payment did not cover (added to the balance)
    pub capitalized_interest: Money,
    pub remaining_balance: Money,
    pub is_paid_off: bool,
}

/// Per-debt totals across a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayoffSummary {
    pub debt_id: DebtId,
    pub debt_name: String,
    pub starting_balance: Money,
    pub payoff_month: Option<u32>,
    pub total_interest_paid: Money,
    pub total_paid: Money,
}

/// Which strategy and extra budget produced a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyApplied {
    pub strategy: PayoffStrategy,
    pub extra_payment: Money,
}

/// Improvement of a strategy over the minimum-only baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsVsMinimum {
    pub months_saved: i64,
    pub interest_saved: Money,
}

/// Full outcome of one strategy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayoffResult {
    pub strategy: StrategyApplied,
    /// Month in which the last debt reached zero (the cap when not converged)
    pub total_months: u32,
    pub total_interest_paid: Money,
    pub total_amount_paid: Money,
    pub monthly_schedule: Vec<PaymentScheduleEntry>,
    /// Debt ids in the order they were retired
    pub debt_payoff_order: Vec<DebtId>,
    pub debt_summaries: Vec<DebtPayoffSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_vs_minimum: Option<SavingsVsMinimum>,
    /// False when the month cap was reached with balances outstanding
    pub converged: bool,
}

impl DebtPayoffResult {
    /// Earliest month in which any debt was retired.
    pub fn first_payoff_month(&self) -> Option<u32> {
        self.debt_summaries
            .iter()
            .filter_map(|s| s.payoff_month)
            .min()
    }

    /// Months and interest saved relative to `baseline`.
    pub fn savings_against(&self, baseline: &DebtPayoffResult) -> SavingsVsMinimum {
        SavingsVsMinimum {
            months_saved: i64::from(baseline.total_months) - i64::from(self.total_months),
            interest_saved: baseline.total_interest_paid - self.total_interest_paid,
        }
    }

    /// Schedule rows for one month.
    pub fn month(&self, month: u32) -> impl Iterator<Item = &PaymentScheduleEntry> {
        self.monthly_schedule.iter().filter(move |e| e.month == month)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A finished run plus what was still owed when it stopped.
#[derive(Debug, Clone)]
pub(crate) struct Simulation {
    pub result: DebtPayoffResult,
    pub outstanding: Money,
}

/// Working state for one debt, addressed by its position in the input slice.
#[derive(Debug, Clone)]
struct DebtState {
    balance: Money,
    payoff_month: Option<u32>,
    interest_paid: Money,
    total_paid: Money,
}

impl DebtState {
    fn is_open(&self) -> bool {
        self.payoff_month.is_none()
    }
}

/// Allocation for one open debt in the current month.
struct MonthSlot {
    idx: usize,
    opening: Money,
    interest: Money,
    minimum: Money,
    extra: Money,
}

impl MonthSlot {
    /// Opening balance plus this month's interest.
    fn due(&self) -> Money {
        self.opening + self.interest
    }

    /// Balance still owed after the minimum and any extra so far.
    fn owed_after_payments(&self) -> Money {
        self.due() - self.minimum - self.extra
    }
}

/// Run the amortization loop for `order` (positions into `debts`,
/// highest priority first).
///
/// With a zero `extra_payment` no pool is formed, so every strategy
/// degenerates to minimum-only payments regardless of order. A month whose
/// amounts would leave the range of `Decimal` is not applied; the run stops
/// there unconverged.
pub(crate) fn simulate(
    debts: &[DebtInput],
    order: &[usize],
    extra_payment: Money,
    strategy: PayoffStrategy,
    max_months: u32,
) -> Simulation {
    let extra_payment = round_currency(extra_payment);
    let rolls_forward = extra_payment > Decimal::ZERO;

    let mut states: Vec<DebtState> = debts
        .iter()
        .map(|d| DebtState {
            balance: round_currency(d.current_balance),
            payoff_month: None,
            interest_paid: Decimal::ZERO,
            total_paid: Decimal::ZERO,
        })
        .collect();

    let mut schedule: Vec<PaymentScheduleEntry> = Vec::new();
    let mut payoff_order: Vec<DebtId> = Vec::with_capacity(debts.len());
    let mut freed_minimums = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut month: u32 = 0;

    while month < max_months && states.iter().any(DebtState::is_open) {
        let pool = if rolls_forward {
            extra_payment.checked_add(freed_minimums).map(round_currency)
        } else {
            Some(Decimal::ZERO)
        };
        let Some(entries) = pool.and_then(|pool| settle_month(debts, order, &states, pool, month + 1))
        else {
            warn!(
                strategy = %strategy,
                month = month + 1,
                "amounts exceed decimal range, stopping simulation"
            );
            break;
        };

        // Month totals are checked as a whole so a failing month leaves no trace
        let month_interest = entries
            .iter()
            .try_fold(Decimal::ZERO, |acc, (_, e)| acc.checked_add(e.interest_payment));
        let month_paid = entries
            .iter()
            .try_fold(Decimal::ZERO, |acc, (_, e)| acc.checked_add(e.payment_amount));
        let newly_freed = entries
            .iter()
            .filter(|(_, e)| e.is_paid_off)
            .try_fold(Decimal::ZERO, |acc, &(idx, _)| {
                acc.checked_add(debts[idx].minimum_payment)
            });
        let totals = month_interest.zip(month_paid).zip(newly_freed).and_then(
            |((interest, paid), freed)| {
                Some((
                    total_interest.checked_add(interest)?,
                    total_paid.checked_add(paid)?,
                    freed_minimums.checked_add(freed)?,
                ))
            },
        );
        let Some((next_interest, next_paid, next_freed)) = totals else {
            warn!(
                strategy = %strategy,
                month = month + 1,
                "running totals exceed decimal range, stopping simulation"
            );
            break;
        };

        month += 1;
        total_interest = next_interest;
        total_paid = next_paid;
        // Freed minimums join the pool from next month on
        freed_minimums = next_freed;

        for (idx, entry) in entries {
            let state = &mut states[idx];
            state.balance = entry.remaining_balance;
            // Bounded by the checked run totals above
            state.interest_paid += entry.interest_payment;
            state.total_paid += entry.payment_amount;
            if entry.is_paid_off {
                state.payoff_month = Some(month);
                payoff_order.push(entry.debt_id);
            }
            schedule.push(entry);
        }
    }

    let outstanding: Money = states
        .iter()
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.balance))
        .unwrap_or(Decimal::MAX);
    let converged = !states.iter().any(DebtState::is_open);

    let debt_summaries = debts
        .iter()
        .zip(states.iter())
        .map(|(debt, state)| DebtPayoffSummary {
            debt_id: debt.debt_id,
            debt_name: debt.name.clone(),
            starting_balance: debt.current_balance,
            payoff_month: state.payoff_month,
            total_interest_paid: state.interest_paid,
            total_paid: state.total_paid,
        })
        .collect();

    debug!(
        strategy = %strategy,
        extra = %extra_payment,
        months = month,
        interest = %total_interest,
        converged,
        "payoff simulation finished"
    );

    Simulation {
        result: DebtPayoffResult {
            strategy: StrategyApplied {
                strategy,
                extra_payment,
            },
            total_months: month,
            total_interest_paid: total_interest,
            total_amount_paid: total_paid,
            monthly_schedule: schedule,
            debt_payoff_order: payoff_order,
            debt_summaries,
            savings_vs_minimum: None,
            converged,
        },
        outstanding,
    }
}

/// Accrue interest, apply minimums and distribute `pool` for one month.
///
/// Returns each open debt's position with its schedule entry, or `None`
/// when an amount leaves the range of `Decimal`.
fn settle_month(
    debts: &[DebtInput],
    order: &[usize],
    states: &[DebtState],
    mut pool: Money,
    month: u32,
) -> Option<Vec<(usize, PaymentScheduleEntry)>> {
    // Interest accrual and minimum payments
    let mut slots: Vec<MonthSlot> = Vec::with_capacity(order.len());
    for &idx in order.iter().filter(|&&idx| states[idx].is_open()) {
        let debt = &debts[idx];
        let opening = states[idx].balance;
        let interest = monthly_interest(opening, debt.interest_rate)?;
        let due = opening.checked_add(interest)?;
        slots.push(MonthSlot {
            idx,
            opening,
            interest,
            minimum: round_currency(debt.minimum_payment.min(due)),
            extra: Decimal::ZERO,
        });
    }

    // Extra pool, cascading down the priority list
    for slot in slots.iter_mut() {
        if pool <= Decimal::ZERO {
            break;
        }
        let owed = slot.owed_after_payments();
        if owed <= Decimal::ZERO {
            continue;
        }
        let applied = pool.min(owed);
        slot.extra += applied;
        pool -= applied;
    }

    let entries = slots
        .into_iter()
        .map(|slot| {
            let debt = &debts[slot.idx];
            let payment = slot.minimum + slot.extra;
            let principal = (payment - slot.interest).max(Decimal::ZERO);
            let interest_paid = payment - principal;

            let mut remaining = round_currency(slot.due() - payment);
            if is_settled(remaining) {
                remaining = Decimal::ZERO;
            }

            let entry = PaymentScheduleEntry {
                month,
                debt_id: debt.debt_id,
                debt_name: debt.name.clone(),
                payment_amount: payment,
                principal_payment: principal,
                interest_payment: interest_paid,
                extra_payment: slot.extra,
                capitalized_interest: slot.interest - interest_paid,
                remaining_balance: remaining,
                is_paid_off: remaining.is_zero(),
            };
            (slot.idx, entry)
        })
        .collect();
    Some(entries)
}
