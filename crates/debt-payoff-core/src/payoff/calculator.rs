use rust_decimal::Decimal;
use tracing::warn;

use super::debt::{validate_debts, DebtInput};
use super::simulation::{simulate, DebtPayoffResult, Simulation};
use super::strategy::{
    avalanche_order, custom_order, minimum_only_order, snowball_order, CustomPriority,
    PayoffStrategy,
};
use crate::amortization::{covers_interest, monthly_interest, months_to_payoff};
use crate::config::PayoffConfig;
use crate::error::PayoffError;
use crate::types::Money;
use crate::PayoffResult;

/// Simulates payoff plans for a fixed set of debts and extra budget.
///
/// Immutable after construction; every calculation builds its own working
/// state, so one calculator can be shared across threads.
#[derive(Debug, Clone)]
pub struct DebtPayoffCalculator {
    debts: Vec<DebtInput>,
    extra_payment: Money,
    config: PayoffConfig,
}

impl DebtPayoffCalculator {
    pub fn new(debts: Vec<DebtInput>, extra_payment: Money) -> PayoffResult<Self> {
        Self::with_config(debts, extra_payment, PayoffConfig::default())
    }

    pub fn with_config(
        debts: Vec<DebtInput>,
        extra_payment: Money,
        config: PayoffConfig,
    ) -> PayoffResult<Self> {
        config.validate()?;
        validate_debts(&debts)?;
        if extra_payment < Decimal::ZERO {
            return Err(PayoffError::invalid(
                "extra_payment",
                "Extra payment cannot be negative",
            ));
        }
        Ok(Self {
            debts,
            extra_payment,
            config,
        })
    }

    pub fn debts(&self) -> &[DebtInput] {
        &self.debts
    }

    pub fn extra_payment(&self) -> Money {
        self.extra_payment
    }

    pub fn config(&self) -> &PayoffConfig {
        &self.config
    }

    /// Minimum payments only; the baseline for savings.
    pub fn calculate_minimum_only(&self) -> PayoffResult<DebtPayoffResult> {
        converged(self.minimum_only_baseline())
    }

    pub fn calculate_snowball(&self) -> PayoffResult<DebtPayoffResult> {
        let order = snowball_order(&self.debts);
        converged(self.run(PayoffStrategy::Snowball, &order, self.extra_payment))
    }

    pub fn calculate_avalanche(&self) -> PayoffResult<DebtPayoffResult> {
        converged(self.simulate_avalanche(self.extra_payment))
    }

    pub fn calculate_custom(&self, priorities: &[CustomPriority]) -> PayoffResult<DebtPayoffResult> {
        let order = custom_order(&self.debts, priorities)?;
        converged(self.run(PayoffStrategy::Custom, &order, self.extra_payment))
    }

    /// Dispatch on a strategy value. `custom_order` is required for
    /// [`PayoffStrategy::Custom`] and ignored otherwise.
    pub fn calculate(
        &self,
        strategy: PayoffStrategy,
        custom_order: Option<&[CustomPriority]>,
    ) -> PayoffResult<DebtPayoffResult> {
        match strategy {
            PayoffStrategy::Snowball => self.calculate_snowball(),
            PayoffStrategy::Avalanche => self.calculate_avalanche(),
            PayoffStrategy::MinimumOnly => self.calculate_minimum_only(),
            PayoffStrategy::Custom => {
                let priorities = custom_order.ok_or_else(|| {
                    PayoffError::invalid(
                        "custom_order",
                        "A custom order is required for the custom strategy",
                    )
                })?;
                self.calculate_custom(priorities)
            }
        }
    }

    /// Human-readable notes about inputs that make plans slow or impossible.
    pub fn diagnostics(&self) -> Vec<String> {
        let mut notes = Vec::new();
        for debt in &self.debts {
            if !covers_interest(debt.current_balance, debt.interest_rate, debt.minimum_payment) {
                let interest = monthly_interest(debt.current_balance, debt.interest_rate)
                    .map_or_else(|| "beyond the representable range".to_string(), |i| i.to_string());
                notes.push(format!(
                    "Debt {} ({}): minimum payment {} does not cover monthly interest {}; \
                     the balance grows under minimum payments",
                    debt.debt_id, debt.name, debt.minimum_payment, interest,
                ));
                continue;
            }
            if let Some(months) =
                months_to_payoff(debt.current_balance, debt.interest_rate, debt.minimum_payment)
            {
                if months > self.config.max_months {
                    notes.push(format!(
                        "Debt {} ({}): minimum payments alone need about {} months, \
                         beyond the {}-month simulation cap",
                        debt.debt_id, debt.name, months, self.config.max_months,
                    ));
                }
            }
        }
        notes
    }

    // -----------------------------------------------------------------------
    // Crate-internal runs that never fail on non-convergence
    // -----------------------------------------------------------------------

    pub(crate) fn minimum_only_baseline(&self) -> Simulation {
        let order = minimum_only_order(&self.debts);
        self.run(PayoffStrategy::MinimumOnly, &order, Decimal::ZERO)
    }

    pub(crate) fn simulate_avalanche(&self, extra_payment: Money) -> Simulation {
        let order = avalanche_order(&self.debts);
        self.run(PayoffStrategy::Avalanche, &order, extra_payment)
    }

    fn run(&self, strategy: PayoffStrategy, order: &[usize], extra_payment: Money) -> Simulation {
        simulate(
            &self.debts,
            order,
            extra_payment,
            strategy,
            self.config.max_months,
        )
    }
}

/// Turn a capped run into a `NonConvergent` error.
fn converged(sim: Simulation) -> PayoffResult<DebtPayoffResult> {
    if sim.result.converged {
        return Ok(sim.result);
    }
    warn!(
        strategy = %sim.result.strategy.strategy,
        months = sim.result.total_months,
        outstanding = %sim.outstanding,
        "payoff simulation hit the month cap"
    );
    Err(PayoffError::NonConvergent {
        strategy: sim.result.strategy.strategy.to_string(),
        months: sim.result.total_months,
        remaining_balance: sim.outstanding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn three_debts() -> Vec<DebtInput> {
        vec![
            DebtInput::new(1, "Student loan", dec!(2000), dec!(6), dec!(50)),
            DebtInput::new(2, "Store card", dec!(500), dec!(24), dec!(25)),
            DebtInput::new(3, "Visa", dec!(1200), dec!(29.99), dec!(40)),
        ]
    }

    #[test]
    fn test_negative_extra_rejected() {
        assert!(DebtPayoffCalculator::new(three_debts(), dec!(-1)).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = PayoffConfig {
            max_months: 0,
            ..Default::default()
        };
        assert!(DebtPayoffCalculator::with_config(three_debts(), dec!(100), cfg).is_err());
    }

    #[test]
    fn test_strategies_report_themselves() {
        let calc = DebtPayoffCalculator::new(three_debts(), dec!(100)).unwrap();
        let snow = calc.calculate_snowball().unwrap();
        let aval = calc.calculate_avalanche().unwrap();
        let min = calc.calculate_minimum_only().unwrap();
        assert_eq!(snow.strategy.strategy, PayoffStrategy::Snowball);
        assert_eq!(snow.strategy.extra_payment, dec!(100));
        assert_eq!(aval.strategy.strategy, PayoffStrategy::Avalanche);
        assert_eq!(min.strategy.strategy, PayoffStrategy::MinimumOnly);
        assert_eq!(min.strategy.extra_payment, Decimal::ZERO);
    }

    #[test]
    fn test_snowball_and_avalanche_orders_diverge() {
        let calc = DebtPayoffCalculator::new(three_debts(), dec!(100)).unwrap();
        let snow = calc.calculate_snowball().unwrap();
        let aval = calc.calculate_avalanche().unwrap();
        // Snowball targets the 500 store card; avalanche targets the 29.99% Visa
        assert_eq!(snow.debt_payoff_order[0], 2);
        assert_eq!(aval.debt_payoff_order[0], 3);
        assert_ne!(snow.debt_payoff_order, aval.debt_payoff_order);
        assert!(aval.total_interest_paid <= snow.total_interest_paid);
    }

    #[test]
    fn test_custom_matches_equivalent_builtin_order() {
        let calc = DebtPayoffCalculator::new(three_debts(), dec!(100)).unwrap();
        let custom = calc
            .calculate_custom(&[
                CustomPriority { debt_id: 3, priority: 1 },
                CustomPriority { debt_id: 2, priority: 2 },
                CustomPriority { debt_id: 1, priority: 3 },
            ])
            .unwrap();
        let aval = calc.calculate_avalanche().unwrap();
        assert_eq!(custom.strategy.strategy, PayoffStrategy::Custom);
        assert_eq!(custom.total_months, aval.total_months);
        assert_eq!(custom.total_interest_paid, aval.total_interest_paid);
        assert_eq!(custom.debt_payoff_order, aval.debt_payoff_order);
    }

    #[test]
    fn test_dispatch_custom_requires_order() {
        let calc = DebtPayoffCalculator::new(three_debts(), dec!(100)).unwrap();
        assert!(calc.calculate(PayoffStrategy::Custom, None).is_err());
        assert!(calc.calculate(PayoffStrategy::Snowball, None).is_ok());
    }

    #[test]
    fn test_non_convergent_is_distinguishable() {
        let debts = vec![DebtInput::new(1, "Payday", dec!(1000), dec!(24), dec!(15))];
        let calc = DebtPayoffCalculator::new(debts, Decimal::ZERO).unwrap();
        let err = calc.calculate_minimum_only().unwrap_err();
        assert!(err.is_non_convergent());
        match err {
            PayoffError::NonConvergent { months, .. } => assert_eq!(months, 600),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_diagnostics_flag_negative_amortization() {
        let debts = vec![
            DebtInput::new(1, "Payday", dec!(1000), dec!(24), dec!(15)),
            DebtInput::new(2, "Visa", dec!(1000), dec!(24), dec!(40)),
        ];
        let calc = DebtPayoffCalculator::new(debts, dec!(50)).unwrap();
        let notes = calc.diagnostics();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].starts_with("Debt 1 (Payday)"));
    }

    #[test]
    fn test_diagnostics_flag_timeline_beyond_cap() {
        // 21 a month against 20 of interest takes about 154 months
        let debts = vec![DebtInput::new(1, "Slow card", dec!(1000), dec!(24), dec!(21))];
        let cfg = PayoffConfig {
            max_months: 120,
            ..Default::default()
        };
        let calc = DebtPayoffCalculator::with_config(debts.clone(), dec!(25), cfg).unwrap();
        let notes = calc.diagnostics();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("about 154 months"));

        let calc = DebtPayoffCalculator::new(debts, dec!(25)).unwrap();
        assert!(calc.diagnostics().is_empty());
    }

    #[test]
    fn test_runaway_balance_stops_unconverged() {
        // 400% APR against a 25 minimum compounds past the decimal range long before month 600
        let debts = vec![DebtInput::new(1, "Payday", dec!(1000), dec!(400), dec!(25))];
        let calc = DebtPayoffCalculator::new(debts, Decimal::ZERO).unwrap();
        let err = calc.calculate_minimum_only().unwrap_err();
        match err {
            PayoffError::NonConvergent { months, .. } => assert!(months < 600),
            other => panic!("unexpected error: {other}"),
        }

        let baseline = calc.minimum_only_baseline().result;
        assert!(!baseline.converged);
        assert_eq!(baseline.monthly_schedule.len() as u32, baseline.total_months);
        assert_eq!(calc.diagnostics().len(), 1);
    }

    #[test]
    fn test_unrepresentable_rate_is_non_convergent() {
        let debts = vec![DebtInput::new(1, "Broken", dec!(1000), Decimal::MAX, dec!(25))];
        let calc = DebtPayoffCalculator::new(debts, dec!(100)).unwrap();
        let err = calc.calculate_avalanche().unwrap_err();
        assert!(err.is_non_convergent());
        assert!(calc.diagnostics()[0].contains("beyond the representable range"));
    }
}
