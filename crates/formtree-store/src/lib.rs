//! Path-addressed state store for nested form trees.
//!
//! State is a single [`serde_json::Value`] tree addressed by dot-delimited
//! paths (`"form.fieldset.field"`). Writes are immutable-by-move: every
//! mutation consumes the tree and returns a new one, rewriting only the
//! spine of the mutated path. Writing an empty value (`""`, `[]`, `{}`, or
//! the absent value `None`) deletes the node and prunes any ancestors left
//! empty by that deletion; `null` is a real value and is retained.
//!
//! The crate is organized into:
//!
//! - [`tree`] - pure get/set/merge/set-many over an owned tree
//! - [`path`] - dotted-path composition helpers
//! - [`ChangeDetection`] - previous/next comparator gating re-computation
//! - [`StoreAdapter`] - the backend-agnostic store contract, plus the
//!   change-detection connector every consumer routes through
//! - [`MemoryStore`] / [`ReducerStoreAdapter`] - the two provided backends
//! - [`StoreContext`] - a read/write view rooted at a base path

mod adapter;
mod change;
mod context;
mod error;
mod memory;
pub mod path;
mod reducer;
pub mod tree;
mod value;

pub use serde_json::{Map, Value, json};

pub use adapter::{StoreAdapter, Unsubscribe, Watch, connect_to_change_detection};
pub use change::ChangeDetection;
pub use context::StoreContext;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use reducer::{Action, ReducerStore, ReducerStoreAdapter, reduce};
pub use tree::{PathValue, find_prop_children};
pub use value::is_empty_value;
