//! Plain in-memory store backend.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};

use formtree_events::Subscription;

use crate::adapter::{StoreAdapter, Unsubscribe};
use crate::error::{Result, StoreError};
use crate::tree::{self, PathValue};

/// A single owned tree plus a notify bus. The reference backend for tests
/// and for hosts without their own state container.
pub struct MemoryStore {
    state: RefCell<Value>,
    notify: Rc<Subscription<()>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::with_state(Value::Object(Map::new()))
    }

    /// Store seeded with an initial tree.
    pub fn with_state(initial: Value) -> Self {
        Self {
            state: RefCell::new(initial),
            notify: Rc::new(Subscription::new()),
        }
    }

    /// Replace the tree through `update` and notify subscribers. The borrow
    /// is released before notification so subscribers can read back.
    fn apply(&self, update: impl FnOnce(Value) -> Value) {
        {
            let mut state = self.state.borrow_mut();
            let current = std::mem::take(&mut *state);
            *state = update(current);
        }
        self.notify.invoke(&());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreAdapter for MemoryStore {
    fn state(&self) -> Value {
        self.state.borrow().clone()
    }

    fn get(&self, path: &str) -> Option<Value> {
        tree::get(&self.state.borrow(), path).cloned()
    }

    fn set(&self, path: &str, value: Option<Value>) -> Result<Option<Value>> {
        if path.is_empty() {
            return Err(StoreError::InvalidPath);
        }
        tracing::debug!(path, "memory store set");
        self.apply(|state| tree::set_unchecked(state, path, value));
        Ok(self.get(path))
    }

    fn merge(&self, path: &str, value: Value) -> Result<Option<Value>> {
        tracing::debug!(path, "memory store merge");
        self.apply(|state| tree::merge(state, path, value));
        Ok(self.get(path))
    }

    fn set_paths(&self, paths: &[PathValue]) -> Result<Value> {
        if paths.iter().any(|entry| entry.path.is_empty()) {
            return Err(StoreError::InvalidPath);
        }
        tracing::debug!(count = paths.len(), "memory store set_paths");
        self.apply(|state| {
            paths.iter().fold(state, |state, entry| {
                tree::set_unchecked(state, &entry.path, entry.value.clone())
            })
        });
        Ok(self.state())
    }

    fn subscribe(&self, callback: Rc<dyn Fn()>) -> Unsubscribe {
        let id = self.notify.subscribe(move |_| callback());
        let notify = Rc::downgrade(&self.notify);
        Box::new(move || {
            if let Some(notify) = notify.upgrade() {
                notify.unsubscribe(id);
            }
        })
    }
}
