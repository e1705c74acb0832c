use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::PayoffError;
use crate::types::{DebtId, Money, Percent};
use crate::PayoffResult;

/// A single debt as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtInput {
    pub debt_id: DebtId,
    pub name: String,
    /// Principal currently owed.
    pub current_balance: Money,
    /// Annual percentage rate (19.99 = 19.99%).
    pub interest_rate: Percent,
    /// Contractual minimum monthly payment.
    pub minimum_payment: Money,
}

impl DebtInput {
    pub fn new(
        debt_id: DebtId,
        name: impl Into<String>,
        current_balance: Money,
        interest_rate: Percent,
        minimum_payment: Money,
    ) -> Self {
        Self {
            debt_id,
            name: name.into(),
            current_balance,
            interest_rate,
            minimum_payment,
        }
    }

    fn label(&self) -> String {
        format!("debt {} ({})", self.debt_id, self.name)
    }
}

/// Reject empty debt lists, duplicate ids and out-of-domain numbers.
pub fn validate_debts(debts: &[DebtInput]) -> PayoffResult<()> {
    if debts.is_empty() {
        return Err(PayoffError::invalid(
            "debts",
            "At least one debt is required",
        ));
    }

    let mut seen: HashSet<DebtId> = HashSet::with_capacity(debts.len());
    for debt in debts {
        if !seen.insert(debt.debt_id) {
            return Err(PayoffError::invalid(
                "debt_id",
                format!("Duplicate debt_id {}", debt.debt_id),
            ));
        }
        if debt.current_balance <= Decimal::ZERO {
            return Err(PayoffError::invalid(
                format!("debts[{}].current_balance", debt.debt_id),
                format!("Balance for {} must be positive", debt.label()),
            ));
        }
        if debt.interest_rate < Decimal::ZERO {
            return Err(PayoffError::invalid(
                format!("debts[{}].interest_rate", debt.debt_id),
                format!("Interest rate for {} cannot be negative", debt.label()),
            ));
        }
        if debt.minimum_payment <= Decimal::ZERO {
            return Err(PayoffError::invalid(
                format!("debts[{}].minimum_payment", debt.debt_id),
                format!("Minimum payment for {} must be positive", debt.label()),
            ));
        }
    }
    Ok(())
}
