use napi::Result as NapiResult;
use napi_derive::napi;

use debt_payoff_core::payoff::api::{self, PayoffRequest, TargetRequest};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Debt payoff
// ---------------------------------------------------------------------------

/// Simulate the requested strategy, or all three when `strategy` is "comparison".
#[napi]
pub fn plan_payoff(input_json: String) -> NapiResult<String> {
    let input: PayoffRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = api::plan_payoff(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_strategies(input_json: String) -> NapiResult<String> {
    let input: PayoffRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = api::compare_payoff_strategies(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn solve_target_payment(input_json: String) -> NapiResult<String> {
    let input: TargetRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = api::solve_target_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
