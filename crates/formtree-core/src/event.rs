//! Events exchanged between form nodes.
//!
//! Requests (`Run*Validation`) ask a node to recompute its validators;
//! outcomes (`Change`, `Blur`, `Submit`, `SubmitAbort`) report what a node
//! did. Events are immutable value objects passed by reference through the
//! buses. The serialized form uses the historical wire tags
//! (`runChangeValidation`, `onChange`, ...) with camelCase payload keys.

use serde::Serialize;
use serde_json::Value;

use formtree_validate::ValidationTrigger;

/// Why a submit did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AbortReason {
    User,
    Validation,
}

/// One event on a form bus. `sender` is the path of the originating node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum FormEvent {
    #[serde(rename = "runChangeValidation")]
    RunChangeValidation { sender: String },
    #[serde(rename = "runBlurValidation")]
    RunBlurValidation { sender: String },
    #[serde(rename = "runSubmitValidation")]
    RunSubmitValidation { sender: String },
    #[serde(rename = "onChange", rename_all = "camelCase")]
    Change {
        sender: String,
        from_value: Option<Value>,
        to_value: Option<Value>,
        from_errors: Vec<String>,
        to_errors: Vec<String>,
    },
    #[serde(rename = "onBlur", rename_all = "camelCase")]
    Blur {
        sender: String,
        from_errors: Vec<String>,
        to_errors: Vec<String>,
    },
    #[serde(rename = "onSubmit")]
    Submit { sender: String },
    #[serde(rename = "onSubmitAbort")]
    SubmitAbort { sender: String, reason: AbortReason },
}

/// Tag of a [`FormEvent`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    RunChangeValidation,
    RunBlurValidation,
    RunSubmitValidation,
    Change,
    Blur,
    Submit,
    SubmitAbort,
}

impl FormEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::RunChangeValidation { .. } => EventKind::RunChangeValidation,
            Self::RunBlurValidation { .. } => EventKind::RunBlurValidation,
            Self::RunSubmitValidation { .. } => EventKind::RunSubmitValidation,
            Self::Change { .. } => EventKind::Change,
            Self::Blur { .. } => EventKind::Blur,
            Self::Submit { .. } => EventKind::Submit,
            Self::SubmitAbort { .. } => EventKind::SubmitAbort,
        }
    }

    /// Path of the node that raised the event.
    pub fn sender(&self) -> &str {
        match self {
            Self::RunChangeValidation { sender }
            | Self::RunBlurValidation { sender }
            | Self::RunSubmitValidation { sender }
            | Self::Change { sender, .. }
            | Self::Blur { sender, .. }
            | Self::Submit { sender }
            | Self::SubmitAbort { sender, .. } => sender,
        }
    }

    /// The validation trigger a request event carries; `None` for outcome
    /// events.
    pub fn validation_trigger(&self) -> Option<ValidationTrigger> {
        match self {
            Self::RunChangeValidation { .. } => Some(ValidationTrigger::Change),
            Self::RunBlurValidation { .. } => Some(ValidationTrigger::Blur),
            Self::RunSubmitValidation { .. } => Some(ValidationTrigger::Submit),
            _ => None,
        }
    }
}

/// The validation-request kinds.
pub const VALIDATION_EVENTS: [EventKind; 3] = [
    EventKind::RunChangeValidation,
    EventKind::RunBlurValidation,
    EventKind::RunSubmitValidation,
];

/// Kinds a child bus forwards onto its parent bus. Submit requests travel
/// the other way (root to leaves) and submit outcomes stay on the root bus,
/// so the upward and downward sets are disjoint and forwarding cannot
/// cycle.
pub const BUBBLED_EVENTS: [EventKind; 4] = [
    EventKind::RunChangeValidation,
    EventKind::RunBlurValidation,
    EventKind::Change,
    EventKind::Blur,
];

/// Wrap `callback` so it only sees events whose kind is in `kinds`.
pub fn filter_events(
    kinds: &[EventKind],
    callback: impl Fn(&FormEvent) + 'static,
) -> impl Fn(&FormEvent) + 'static {
    let kinds = kinds.to_vec();
    move |event| {
        if kinds.contains(&event.kind()) {
            callback(event);
        }
    }
}

/// [`filter_events`] fixed to the validation-request kinds.
pub fn filter_validation_events(
    callback: impl Fn(&FormEvent) + 'static,
) -> impl Fn(&FormEvent) + 'static {
    filter_events(&VALIDATION_EVENTS, callback)
}
