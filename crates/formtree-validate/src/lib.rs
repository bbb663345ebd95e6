//! Validation engine for path-addressed form state.
//!
//! A node (field, group or root) carries up to three ordered validator
//! lists, one per trigger. Triggers cascade by severity: a submit run also
//! runs the blur and change lists, a blur run also runs the change list.
//! Error writes are change-gated - [`apply_errors_if_changed`] only touches
//! the store when the recomputed list actually differs from the stored one,
//! so subscribers are never retriggered by a no-op validation pass.
//!
//! Validators and filters are assumed pure and non-panicking by contract;
//! the engine does not catch panics from user-supplied functions.

mod engine;
pub mod filters;
pub mod validators;

pub use engine::{
    Filter, ValidationSet, ValidationTrigger, Validator, apply_errors_if_changed, errors_changed,
    errors_from_value, errors_to_value, run_filters, run_validation,
};
