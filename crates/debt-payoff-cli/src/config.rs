use serde_json::{Map, Value};
use std::error::Error;
use tracing::debug;

use debt_payoff_core::PayoffConfig;

use crate::input;

/// Load calculator settings from a TOML file, if one was given.
pub fn load(path: Option<&str>) -> Result<Option<PayoffConfig>, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let settings: PayoffConfig = input::file::read_toml(path)?;
    settings.validate()?;
    debug!(path, max_months = settings.max_months, "loaded calculator config");
    Ok(Some(settings))
}

/// Lay the file settings under the request's own `config` block.
///
/// Keys present in the request win; every other key keeps the file's value.
pub fn merge(request: &mut Value, file: Option<&PayoffConfig>) -> Result<(), Box<dyn Error>> {
    let Some(file) = file else {
        return Ok(());
    };
    let Value::Object(body) = request else {
        return Err("request must be a JSON object".into());
    };

    let mut merged = serde_json::to_value(file)?;
    if let Some(overrides) = body.remove("config") {
        overlay(&mut merged, overrides);
    }
    body.insert("config".to_string(), merged);
    Ok(())
}

fn overlay(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => overlay_map(base, overrides),
        (base, overrides) => *base = overrides,
    }
}

fn overlay_map(base: &mut Map<String, Value>, overrides: Map<String, Value>) {
    for (key, value) in overrides {
        match base.get_mut(&key) {
            Some(existing) => overlay(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}
