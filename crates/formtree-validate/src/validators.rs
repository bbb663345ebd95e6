//! Stock validators.
//!
//! Each constructor takes the failure message so hosts control the wording.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::engine::Validator;

static TEXT_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z]+$").expect("static pattern"));
static NUMBER_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[0-9]+$").expect("static pattern"));

/// Fails on the absent value and on `null`; everything else passes,
/// including the empty string (an empty string never survives in the store
/// anyway - it reads back as absent).
pub fn required(message: &str) -> Validator {
    let message = message.to_string();
    Rc::new(move |value| match value {
        None | Some(Value::Null) => Some(message.clone()),
        Some(_) => None,
    })
}

/// Passes string values matching `pattern`; fails anything else.
pub fn pattern(message: &str, pattern: Regex) -> Validator {
    let message = message.to_string();
    Rc::new(move |value| match value.and_then(Value::as_str) {
        Some(text) if pattern.is_match(text) => None,
        _ => Some(message.clone()),
    })
}

/// Letters only.
pub fn text(message: &str) -> Validator {
    pattern(message, TEXT_ONLY.clone())
}

/// Digits only.
pub fn number(message: &str) -> Validator {
    pattern(message, NUMBER_ONLY.clone())
}
