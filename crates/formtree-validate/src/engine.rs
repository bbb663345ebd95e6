//! Cascading validator execution and the change-gated error writer.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use formtree_store::{Result, StoreAdapter};

/// A validator receives the current value (`None` when the path is absent)
/// and returns `None` to pass or an error message to fail.
pub type Validator = Rc<dyn Fn(Option<&Value>) -> Option<String>>;

/// A filter is a pure transform applied to a raw input value before it is
/// stored or validated.
pub type Filter = Rc<dyn Fn(Value) -> Value>;

/// Which validation request is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationTrigger {
    Change,
    Blur,
    Submit,
}

/// Ordered validator lists for one node, plus its disabled flag.
#[derive(Clone, Default)]
pub struct ValidationSet {
    pub disabled: bool,
    pub on_change: Vec<Validator>,
    pub on_blur: Vec<Validator>,
    pub on_submit: Vec<Validator>,
}

impl fmt::Debug for ValidationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationSet")
            .field("disabled", &self.disabled)
            .field("on_change", &self.on_change.len())
            .field("on_blur", &self.on_blur.len())
            .field("on_submit", &self.on_submit.len())
            .finish()
    }
}

impl ValidationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_change(mut self, validator: Validator) -> Self {
        self.on_change.push(validator);
        self
    }

    pub fn with_blur(mut self, validator: Validator) -> Self {
        self.on_blur.push(validator);
        self
    }

    pub fn with_submit(mut self, validator: Validator) -> Self {
        self.on_submit.push(validator);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Run the validator lists selected by `trigger` against `value`.
    ///
    /// Triggers cascade: `Submit` runs the submit, blur and change lists,
    /// `Blur` runs blur and change, `Change` runs change only. Failing
    /// messages are collected in that execution order, so the most
    /// severity-specific errors surface first. A disabled node produces no
    /// errors.
    pub fn compute_errors(&self, trigger: ValidationTrigger, value: Option<&Value>) -> Vec<String> {
        if self.disabled {
            return Vec::new();
        }
        let mut errors = Vec::new();
        if matches!(trigger, ValidationTrigger::Submit) {
            errors.extend(run_validation(&self.on_submit, value));
        }
        if matches!(trigger, ValidationTrigger::Submit | ValidationTrigger::Blur) {
            errors.extend(run_validation(&self.on_blur, value));
        }
        errors.extend(run_validation(&self.on_change, value));
        errors
    }
}

/// Run validators in order, keeping the failing messages.
pub fn run_validation(validators: &[Validator], value: Option<&Value>) -> Vec<String> {
    validators
        .iter()
        .filter_map(|validator| validator(value))
        .collect()
}

/// Pass a raw value through a filter chain, left to right.
pub fn run_filters(filters: &[Filter], value: Value) -> Value {
    filters.iter().fold(value, |value, filter| filter(value))
}

/// List equality: same length and the same message at every index.
pub fn errors_changed(current: &[String], next: &[String]) -> bool {
    current.len() != next.len() || current.iter().zip(next).any(|(a, b)| a != b)
}

/// Stored representation of an error list.
pub fn errors_to_value(errors: &[String]) -> Value {
    Value::Array(
        errors
            .iter()
            .map(|error| Value::String(error.clone()))
            .collect(),
    )
}

/// Error list read back from the store. An absent or non-list node is the
/// empty list.
pub fn errors_from_value(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Recompute the errors for the node at `path`, compare against the list
/// stored at `error_path` (an absent entry compares as empty), and write
/// only when they differ. Writing an empty list prunes the entry. Returns
/// whether a write happened.
pub fn apply_errors_if_changed(
    store: &dyn StoreAdapter,
    path: &str,
    error_path: &str,
    validation: &ValidationSet,
    trigger: ValidationTrigger,
) -> Result<bool> {
    let value = store.get(path);
    let current = errors_from_value(store.get(error_path).as_ref());
    let next = validation.compute_errors(trigger, value.as_ref());
    if !errors_changed(&current, &next) {
        return Ok(false);
    }
    tracing::debug!(path, ?trigger, errors = next.len(), "writing changed validation errors");
    store.set(error_path, Some(errors_to_value(&next)))?;
    Ok(true)
}
