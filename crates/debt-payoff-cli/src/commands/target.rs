use clap::Args;
use serde_json::Value;

use debt_payoff_core::payoff::api::{self, TargetRequest};
use debt_payoff_core::PayoffConfig;

use crate::{config, input};

/// Arguments for the target-timeline solver
#[derive(Args)]
pub struct TargetArgs {
    /// Path to JSON request file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Months within which every debt should be paid off (overrides the request)
    #[arg(long)]
    pub target_months: Option<u32>,
}

pub fn run_target(
    args: TargetArgs,
    settings: Option<&PayoffConfig>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut body: Value = input::load_request(args.input.as_deref(), "target payment solving")?;
    config::merge(&mut body, settings)?;
    let mut request: TargetRequest = serde_json::from_value(body)?;
    if let Some(months) = args.target_months {
        request.target_months = months;
    }

    let result = api::solve_target_payment(&request)?;
    Ok(serde_json::to_value(result)?)
}
