use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::display_value;

/// Format output as tables using the tabled crate.
///
/// Scalar fields go into a Field/Value table; arrays of records (schedules,
/// per-debt summaries) get their own table; nested plans (the three
/// strategies of a comparison) are printed as titled sections.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                print_section(None, result);
                print_envelope_notes(map);
            } else {
                print_section(None, map);
            }
        }
        Value::Array(arr) => print_records(arr),
        _ => println!("{}", value),
    }
}

fn print_section(title: Option<&str>, map: &Map<String, Value>) {
    if let Some(title) = title {
        println!("\n== {} ==", title);
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested: Vec<(&str, &Map<String, Value>)> = Vec::new();
    let mut record_sets: Vec<(&str, &Vec<Value>)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Object(inner) if inner.values().any(is_container) => {
                nested.push((key.as_str(), inner));
            }
            Value::Object(inner) => {
                for (sub, sub_val) in inner {
                    builder.push_record([format!("{key}.{sub}"), display_value(sub_val)]);
                }
            }
            Value::Array(items) if items.iter().any(Value::is_object) => {
                record_sets.push((key.as_str(), items));
            }
            Value::Array(items) => {
                let joined: Vec<String> = items.iter().map(display_value).collect();
                builder.push_record([key.clone(), joined.join(", ")]);
            }
            _ => {
                builder.push_record([key.clone(), display_value(val)]);
            }
        }
    }
    println!("{}", Table::from(builder));

    for (key, items) in record_sets {
        println!("\n{}:", key);
        print_records(items);
    }
    for (key, inner) in nested {
        print_section(Some(key), inner);
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

fn print_records(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", display_value(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(display_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
