//! Stock filters. A filter that does not apply to the value's type passes
//! the value through unchanged.

use std::rc::Rc;

use serde_json::{Number, Value};

use crate::engine::Filter;

/// Truncate string values to at most `limit` characters.
pub fn max_length(limit: usize) -> Filter {
    Rc::new(move |value| match value {
        Value::String(text) if text.chars().count() > limit => {
            Value::String(text.chars().take(limit).collect())
        }
        other => other,
    })
}

/// Clamp numeric values up to at least `limit`.
pub fn min(limit: f64) -> Filter {
    Rc::new(move |value| match value.as_f64() {
        Some(number) if number < limit => clamped(limit, value),
        _ => value,
    })
}

/// Clamp numeric values down to at most `limit`.
pub fn max(limit: f64) -> Filter {
    Rc::new(move |value| match value.as_f64() {
        Some(number) if number > limit => clamped(limit, value),
        _ => value,
    })
}

fn clamped(limit: f64, original: Value) -> Value {
    match Number::from_f64(limit) {
        Some(number) => Value::Number(number),
        None => original,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn max_length_truncates_strings_only() {
        let filter = max_length(3);
        assert_eq!(filter(json!("abcdef")), json!("abc"));
        assert_eq!(filter(json!("ab")), json!("ab"));
        assert_eq!(filter(json!(123456)), json!(123456));
    }

    #[test]
    fn min_and_max_clamp_numbers_only() {
        assert_eq!(min(10.0)(json!(3)), json!(10.0));
        assert_eq!(min(10.0)(json!(12)), json!(12));
        assert_eq!(max(10.0)(json!(12)), json!(10.0));
        assert_eq!(max(10.0)(json!(3)), json!(3));
        assert_eq!(min(10.0)(json!("text")), json!("text"));
    }
}
