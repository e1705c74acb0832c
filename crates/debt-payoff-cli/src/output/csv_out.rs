use serde_json::{Map, Value};
use std::io;

use super::display_value;

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Strategy columns for a comparison summary.
const SUMMARY_COLUMNS: [&str; 5] = [
    "strategy",
    "total_months",
    "total_interest_paid",
    "total_amount_paid",
    "first_payoff_month",
];

/// Write output as CSV to stdout.
///
/// Single plans become one row per schedule entry; comparisons become one
/// row per strategy; anything else is written as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) if map.contains_key("monthly_schedule") => {
            if let Some(Value::Array(rows)) = map.get("monthly_schedule") {
                write_rows(&mut wtr, rows);
            }
        }
        Value::Object(map) if map.contains_key("recommended_strategy") => {
            write_comparison(&mut wtr, map);
        }
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &display_value(val)]);
            }
        }
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&display_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn write_comparison(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(SUMMARY_COLUMNS);
    for name in ["avalanche", "snowball", "minimum_only"] {
        let Some(Value::Object(plan)) = map.get(name) else {
            continue;
        };
        let first_payoff = plan
            .get("debt_summaries")
            .and_then(Value::as_array)
            .and_then(|summaries| {
                summaries
                    .iter()
                    .filter_map(|s| s.get("payoff_month").and_then(Value::as_u64))
                    .min()
            })
            .map(|m| m.to_string())
            .unwrap_or_default();
        let _ = wtr.write_record([
            name.to_string(),
            plan.get("total_months").map(display_value).unwrap_or_default(),
            plan.get("total_interest_paid").map(display_value).unwrap_or_default(),
            plan.get("total_amount_paid").map(display_value).unwrap_or_default(),
            first_payoff,
        ]);
    }
}

fn write_rows(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&display_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(display_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
