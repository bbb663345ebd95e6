//! Form/fieldset/field coordination over a path-addressed store.
//!
//! Components form a tree of scopes. Each node owns an event bus; buses are
//! chained so that validation requests and outcome events raised on a leaf
//! also fire on every ancestor bus (bubbling), while submit requests raised
//! on the root broadcast down to every descendant. Nodes react to requests
//! arriving on their own bus by recomputing their validators and writing the
//! result into the error sub-tree - only when it actually changed.
//!
//! Store access is injected: every node receives its `Rc<dyn StoreAdapter>`
//! at construction. There is no process-wide configuration.
//!
//! Node lifecycle: constructing (name and scope checks, fail fast) ->
//! attached (store gate + event wiring registered) -> active -> detached
//! (everything unsubscribed, also performed on drop; terminal).

mod error;
mod event;
mod field;
mod fieldset;
mod form;
mod node;
mod scope;

pub use error::{FormError, Result};
pub use event::{
    AbortReason, BUBBLED_EVENTS, EventKind, FormEvent, VALIDATION_EVENTS, filter_events,
    filter_validation_events,
};
pub use field::{Field, FieldProps};
pub use fieldset::{FieldSet, FieldSetProps};
pub use form::{ERRORS_KEY, Form, FormProps, SubmitOutcome, scope_has_errors};
pub use scope::{FormScope, ScopeKind};
