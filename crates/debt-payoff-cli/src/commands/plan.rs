use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use debt_payoff_core::payoff::api::{self, PayoffRequest, RequestedStrategy};
use debt_payoff_core::PayoffConfig;

use crate::{config, input};

/// Strategy names accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Snowball,
    Avalanche,
    Custom,
    MinimumOnly,
    Comparison,
}

impl From<StrategyArg> for RequestedStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Snowball => RequestedStrategy::Snowball,
            StrategyArg::Avalanche => RequestedStrategy::Avalanche,
            StrategyArg::Custom => RequestedStrategy::Custom,
            StrategyArg::MinimumOnly => RequestedStrategy::MinimumOnly,
            StrategyArg::Comparison => RequestedStrategy::Comparison,
        }
    }
}

/// Arguments for a single payoff plan
#[derive(Args)]
pub struct PlanArgs {
    /// Path to JSON request file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Strategy to simulate (overrides the request)
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Extra monthly payment above all minimums (overrides the request)
    #[arg(long)]
    pub extra_payment: Option<Decimal>,
}

/// Arguments for a strategy comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON request file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Extra monthly payment above all minimums (overrides the request)
    #[arg(long)]
    pub extra_payment: Option<Decimal>,
}

pub fn run_plan(
    args: PlanArgs,
    settings: Option<&PayoffConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut body: Value = input::load_request(args.input.as_deref(), "payoff plan")?;
    config::merge(&mut body, settings)?;
    let mut request: PayoffRequest = serde_json::from_value(body)?;
    if let Some(strategy) = args.strategy {
        request.strategy = strategy.into();
    }
    if let Some(extra) = args.extra_payment {
        request.extra_payment = extra;
    }

    let result = api::plan_payoff(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(
    args: CompareArgs,
    settings: Option<&PayoffConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut body: Value = input::load_request(args.input.as_deref(), "strategy comparison")?;
    config::merge(&mut body, settings)?;
    let mut request: PayoffRequest = serde_json::from_value(body)?;
    if let Some(extra) = args.extra_payment {
        request.extra_payment = extra;
    }

    let result = api::compare_payoff_strategies(&request)?;
    Ok(serde_json::to_value(result)?)
}
