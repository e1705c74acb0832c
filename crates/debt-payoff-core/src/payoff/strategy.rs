//! Payoff orderings: which debt receives the extra payment first.
//!
//! Every ordering is returned as a list of positions into the caller's debt
//! slice, highest priority first. Ties are always broken deterministically.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::debt::DebtInput;
use crate::error::PayoffError;
use crate::types::DebtId;
use crate::PayoffResult;

/// Prioritisation strategy for allocating the extra payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffStrategy {
    /// Smallest balance first
    Snowball,
    /// Highest interest rate first
    Avalanche,
    /// Caller-supplied priority list
    Custom,
    /// Minimum payments only, no extra allocation
    MinimumOnly,
}

impl PayoffStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoffStrategy::Snowball => "snowball",
            PayoffStrategy::Avalanche => "avalanche",
            PayoffStrategy::Custom => "custom",
            PayoffStrategy::MinimumOnly => "minimum_only",
        }
    }
}

impl fmt::Display for PayoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a custom payoff order. Priority 1 is paid first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPriority {
    pub debt_id: DebtId,
    pub priority: u32,
}

/// Ascending balance, ties by debt_id ascending.
pub fn snowball_order(debts: &[DebtInput]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..debts.len()).collect();
    order.sort_by(|&a, &b| {
        debts[a]
            .current_balance
            .cmp(&debts[b].current_balance)
            .then(debts[a].debt_id.cmp(&debts[b].debt_id))
    });
    order
}

/// Descending rate, then descending balance, then debt_id ascending.
pub fn avalanche_order(debts: &[DebtInput]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..debts.len()).collect();
    order.sort_by(|&a, &b| {
        debts[b]
            .interest_rate
            .cmp(&debts[a].interest_rate)
            .then(debts[b].current_balance.cmp(&debts[a].current_balance))
            .then(debts[a].debt_id.cmp(&debts[b].debt_id))
    });
    order
}

/// debt_id ascending. Allocation order is irrelevant without an extra pool.
pub fn minimum_only_order(debts: &[DebtInput]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..debts.len()).collect();
    order.sort_by_key(|&i| debts[i].debt_id);
    order
}

/// Resolve a caller-supplied priority list.
///
/// Every debt must appear exactly once, every id must be known, and
/// priorities must be distinct and start at 1 or above.
pub fn custom_order(debts: &[DebtInput], priorities: &[CustomPriority]) -> PayoffResult<Vec<usize>> {
    let index_by_id: HashMap<DebtId, usize> = debts
        .iter()
        .enumerate()
        .map(|(i, d)| (d.debt_id, i))
        .collect();

    let mut seen_ids: HashSet<DebtId> = HashSet::with_capacity(priorities.len());
    let mut seen_priorities: HashSet<u32> = HashSet::with_capacity(priorities.len());
    let mut ranked: Vec<(u32, usize)> = Vec::with_capacity(priorities.len());

    for entry in priorities {
        let idx = *index_by_id.get(&entry.debt_id).ok_or_else(|| {
            PayoffError::invalid(
                "custom_order",
                format!("Unknown debt_id {} in custom order", entry.debt_id),
            )
        })?;
        if !seen_ids.insert(entry.debt_id) {
            return Err(PayoffError::invalid(
                "custom_order",
                format!("debt_id {} appears more than once", entry.debt_id),
            ));
        }
        if entry.priority == 0 {
            return Err(PayoffError::invalid(
                "custom_order",
                format!("Priority for debt_id {} must be 1 or greater", entry.debt_id),
            ));
        }
        if !seen_priorities.insert(entry.priority) {
            return Err(PayoffError::invalid(
                "custom_order",
                format!("Priority {} is assigned more than once", entry.priority),
            ));
        }
        ranked.push((entry.priority, idx));
    }

    if let Some(missing) = debts.iter().find(|d| !seen_ids.contains(&d.debt_id)) {
        return Err(PayoffError::invalid(
            "custom_order",
            format!("debt_id {} ({}) is missing from custom order", missing.debt_id, missing.name),
        ));
    }

    ranked.sort_by_key(|&(priority, _)| priority);
    Ok(ranked.into_iter().map(|(_, idx)| idx).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn debts() -> Vec<DebtInput> {
        vec![
            DebtInput::new(1, "Car", dec!(8000), dec!(6.5), dec!(250)),
            DebtInput::new(2, "Visa", dec!(1500), dec!(22.9), dec!(45)),
            DebtInput::new(3, "Store card", dec!(400), dec!(22.9), dec!(25)),
            DebtInput::new(4, "Medical", dec!(400), dec!(0), dec!(20)),
        ]
    }

    fn ids(debts: &[DebtInput], order: &[usize]) -> Vec<DebtId> {
        order.iter().map(|&i| debts[i].debt_id).collect()
    }

    #[test]
    fn test_snowball_smallest_balance_first_ties_by_id() {
        let d = debts();
        assert_eq!(ids(&d, &snowball_order(&d)), vec![3, 4, 2, 1]);
    }

    #[test]
    fn test_avalanche_highest_rate_then_larger_balance() {
        let d = debts();
        // 2 and 3 share 22.9%; 2 has the larger balance
        assert_eq!(ids(&d, &avalanche_order(&d)), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_minimum_only_by_id() {
        let mut d = debts();
        d.reverse();
        assert_eq!(ids(&d, &minimum_only_order(&d)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_custom_order_sorted_by_priority() {
        let d = debts();
        let prio = vec![
            CustomPriority { debt_id: 1, priority: 2 },
            CustomPriority { debt_id: 2, priority: 4 },
            CustomPriority { debt_id: 3, priority: 3 },
            CustomPriority { debt_id: 4, priority: 1 },
        ];
        assert_eq!(ids(&d, &custom_order(&d, &prio).unwrap()), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_custom_order_missing_debt() {
        let d = debts();
        let prio = vec![
            CustomPriority { debt_id: 1, priority: 1 },
            CustomPriority { debt_id: 2, priority: 2 },
            CustomPriority { debt_id: 3, priority: 3 },
        ];
        let err = custom_order(&d, &prio).unwrap_err();
        assert!(err.to_string().contains("debt_id 4"));
    }

    #[test]
    fn test_custom_order_duplicate_debt() {
        let d = debts();
        let prio = vec![
            CustomPriority { debt_id: 1, priority: 1 },
            CustomPriority { debt_id: 1, priority: 2 },
            CustomPriority { debt_id: 3, priority: 3 },
            CustomPriority { debt_id: 4, priority: 4 },
        ];
        assert!(custom_order(&d, &prio).is_err());
    }

    #[test]
    fn test_custom_order_unknown_debt() {
        let d = debts();
        let prio = vec![CustomPriority { debt_id: 99, priority: 1 }];
        let err = custom_order(&d, &prio).unwrap_err();
        assert!(err.to_string().contains("Unknown debt_id 99"));
    }

    #[test]
    fn test_custom_order_duplicate_priority() {
        let d = debts();
        let prio = vec![
            CustomPriority { debt_id: 1, priority: 1 },
            CustomPriority { debt_id: 2, priority: 1 },
            CustomPriority { debt_id: 3, priority: 2 },
            CustomPriority { debt_id: 4, priority: 3 },
        ];
        assert!(custom_order(&d, &prio).is_err());
    }

    #[test]
    fn test_strategy_serde_names() {
        let json = serde_json::to_string(&PayoffStrategy::MinimumOnly).unwrap();
        assert_eq!(json, "\"minimum_only\"");
        let parsed: PayoffStrategy = serde_json::from_str("\"avalanche\"").unwrap();
        assert_eq!(parsed, PayoffStrategy::Avalanche);
    }
}
