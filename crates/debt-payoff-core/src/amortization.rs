use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Percent};

/// Balances below one cent are treated as retired.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

const MONTHS_PER_YEAR_PCT: Decimal = dec!(1200);

/// Round to currency precision (cents, half away from zero).
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Monthly periodic rate from an annual percentage (19.99 -> 0.0166583...).
pub fn monthly_rate(apr: Percent) -> Decimal {
    apr / MONTHS_PER_YEAR_PCT
}

/// One month of interest on `balance`, rounded to cents.
///
/// `None` when the product leaves the range of `Decimal`.
pub fn monthly_interest(balance: Money, apr: Percent) -> Option<Money> {
    balance.checked_mul(monthly_rate(apr)).map(round_currency)
}

/// Whether a balance is small enough to count as paid off.
pub fn is_settled(balance: Money) -> bool {
    balance < BALANCE_EPSILON
}

/// True when `payment` retires at least some principal in the first month.
pub fn covers_interest(balance: Money, apr: Percent, payment: Money) -> bool {
    monthly_interest(balance, apr).is_some_and(|interest| payment > interest)
}

/// Closed-form number of level monthly payments needed to retire a single
/// balance (NPER), rounded up to whole months.
///
/// Returns `None` when the payment never amortizes the balance. This ignores
/// per-month rounding, so it can differ from the simulated timeline by one
/// month on long horizons.
pub fn months_to_payoff(balance: Money, apr: Percent, payment: Money) -> Option<u32> {
    if balance <= Decimal::ZERO {
        return Some(0);
    }
    if payment <= Decimal::ZERO {
        return None;
    }

    let r = monthly_rate(apr);
    if r.is_zero() {
        return balance.checked_div(payment)?.ceil().to_u32();
    }
    if !covers_interest(balance, apr, payment) {
        return None;
    }

    // n = -ln(1 - r*B/P) / ln(1 + r)
    let inner = Decimal::ONE - r.checked_mul(balance)?.checked_div(payment)?;
    let numerator = inner.checked_ln()?;
    let denominator = (Decimal::ONE + r).checked_ln()?;
    if denominator.is_zero() {
        return None;
    }
    (-numerator / denominator).ceil().to_u32()
}
