//! Human-readable diffs between two serialized records

use serde_json::{Map, Value};

/// Longest string value shown in a diff before truncation
const MAX_SHOWN_CHARS: usize = 50;

/// Summarize top-level field changes between two JSON values
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(b), Value::Object(a)) => diff_objects(b, a, "", false),
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// List every changed leaf, descending into nested objects
///
/// Nested fields are reported with dotted paths such as `budget.fire_pct`.
pub fn generate_detailed_diff(before: &Value, after: &Value, prefix: &str) -> Vec<String> {
    match (before, after) {
        (Value::Object(b), Value::Object(a)) => diff_objects(b, a, prefix, true),
        _ if before != after => vec![format!(
            "{}: {} -> {}",
            prefix,
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    }
}

fn diff_objects(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    prefix: &str,
    recurse: bool,
) -> Vec<String> {
    let path = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };
    let mut changes = Vec::new();

    for (key, old) in before {
        match after.get(key) {
            Some(new) if old == new => {}
            Some(new) if recurse && old.is_object() && new.is_object() => {
                changes.extend(generate_detailed_diff(old, new, &path(key)));
            }
            Some(new) => changes.push(format!(
                "{}: {} -> {}",
                path(key),
                format_value(old),
                format_value(new)
            )),
            None => changes.push(format!("{}: {} -> (removed)", path(key), format_value(old))),
        }
    }

    for (key, new) in after {
        if !before.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", path(key), format_value(new)));
        }
    }

    changes
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_SHOWN_CHARS => {
            let head: String = s.chars().take(MAX_SHOWN_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_fields_only() {
        let before = json!({"name": "Rent", "amount": 120000});
        let after = json!({"name": "Rent", "amount": 125000});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "amount: 120000 -> 125000");
    }

    #[test]
    fn test_added_and_removed() {
        let before = json!({"name": "Car", "deadline": "2024-12-01"});
        let after = json!({"name": "Car", "priority": "High"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("deadline: \"2024-12-01\" -> (removed)"));
        assert!(diff.contains("priority: (added) -> \"High\""));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"name": "Gym", "amount": 2000});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_nested_objects_summarized_at_top_level() {
        let before = json!({"frequency": {"type": "Weekly"}});
        let after = json!({"frequency": {"type": "Custom", "unit": "Month", "value": 3}});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "frequency: {1 fields} -> {3 fields}");
    }

    #[test]
    fn test_detailed_diff_uses_dotted_paths() {
        let before = json!({"budget": {"fire_pct": "10", "smile_pct": "20"}, "currency_symbol": "$"});
        let after = json!({"budget": {"fire_pct": "15", "smile_pct": "20"}, "currency_symbol": "$"});

        let changes = generate_detailed_diff(&before, &after, "");
        assert_eq!(changes, vec!["budget.fire_pct: \"10\" -> \"15\"".to_string()]);
    }

    #[test]
    fn test_long_multibyte_string_truncation() {
        let long = "é".repeat(80);
        let diff = generate_diff(&json!({"name": long}), &json!({"name": "x"})).unwrap();
        assert!(diff.contains("...\""));
    }
}
