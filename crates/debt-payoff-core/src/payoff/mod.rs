//! Debt payoff planning: strategy orderings, month-by-month simulation,
//! strategy comparison and the extra-payment target solver.

pub mod api;
pub mod calculator;
pub mod comparison;
pub mod debt;
pub mod simulation;
pub mod strategy;
pub mod target;

pub use calculator::DebtPayoffCalculator;
pub use comparison::DebtPayoffComparison;
pub use debt::DebtInput;
pub use simulation::{
    DebtPayoffResult, DebtPayoffSummary, PaymentScheduleEntry, SavingsVsMinimum, StrategyApplied,
};
pub use strategy::{CustomPriority, PayoffStrategy};
pub use target::ExtraPaymentTarget;
