//! Value classification used by the pruning walk.

use serde_json::Value;

/// True for the values the store treats as deletions: the empty string, the
/// empty array and the empty mapping. `null` is deliberately *not* empty -
/// it is a real, retained value.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::is_empty_value;

    #[test]
    fn empty_values() {
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!({})));
    }

    #[test]
    fn non_empty_values() {
        assert!(!is_empty_value(&json!(null)));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!("x")));
        assert!(!is_empty_value(&json!([null])));
        assert!(!is_empty_value(&json!({ "key": "value" })));
    }
}
