use serde_json::Value;

use super::display_value;

/// Headline fields, most specific first.
const HEADLINE_KEYS: [&str; 4] = [
    "required_extra_payment",
    "recommended_strategy",
    "total_months",
    "total_interest_paid",
];

/// Print just the headline answer from the output envelope.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in HEADLINE_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    println!("{}", display_value(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, display_value(val));
            return;
        }
    }

    println!("{}", display_value(result_obj));
}
