//! Reducer-based store backend.
//!
//! One possible host for the tree engine: a single-writer store whose state
//! only changes by dispatching actions through a reducer function. The
//! action wire format (`SET` / `MERGE` / `SET_PATHS` tags carrying
//! `{path, value}` or `{paths}`) is an adapter-level convention any other
//! host can reproduce.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use formtree_events::Subscription;

use crate::adapter::{StoreAdapter, Unsubscribe};
use crate::error::Result;
use crate::tree::{self, PathValue};

/// Write actions understood by [`reduce`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "SET")]
    Set {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
    #[serde(rename = "MERGE")]
    Merge { path: String, value: Value },
    #[serde(rename = "SET_PATHS")]
    SetPaths { paths: Vec<PathValue> },
}

impl Action {
    pub fn set(path: impl Into<String>, value: impl Into<Option<Value>>) -> Self {
        Self::Set {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn merge(path: impl Into<String>, value: Value) -> Self {
        Self::Merge {
            path: path.into(),
            value,
        }
    }

    pub fn set_paths(paths: Vec<PathValue>) -> Self {
        Self::SetPaths { paths }
    }
}

/// Reduce one action against the current state, delegating to the tree
/// engine.
pub fn reduce(state: Value, action: &Action) -> Result<Value> {
    match action {
        Action::Set { path, value } => tree::set(state, path, value.clone()),
        Action::Merge { path, value } => Ok(tree::merge(state, path, value.clone())),
        Action::SetPaths { paths } => tree::set_paths(state, paths),
    }
}

/// Single-writer store driving its state through a reducer function.
///
/// Generic over the action type so hosts can embed [`Action`] in their own
/// action enum and delegate the form-owned variants to [`reduce`].
pub struct ReducerStore<A> {
    state: RefCell<Value>,
    reducer: Box<dyn Fn(Value, &A) -> Result<Value>>,
    notify: Rc<Subscription<()>>,
}

impl<A> ReducerStore<A> {
    pub fn new(initial: Value, reducer: impl Fn(Value, &A) -> Result<Value> + 'static) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(initial),
            reducer: Box::new(reducer),
            notify: Rc::new(Subscription::new()),
        })
    }

    /// Run the reducer and, on success, replace the state and notify
    /// subscribers. A failed reduction leaves the state untouched.
    pub fn dispatch(&self, action: &A) -> Result<()> {
        let next = (self.reducer)(self.state.borrow().clone(), action)?;
        *self.state.borrow_mut() = next;
        self.notify.invoke(&());
        Ok(())
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, read: impl FnOnce(&Value) -> R) -> R {
        read(&self.state.borrow())
    }

    /// Snapshot of the current state.
    pub fn get_state(&self) -> Value {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self, callback: Rc<dyn Fn()>) -> Unsubscribe {
        let id = self.notify.subscribe(move |_| callback());
        let notify = Rc::downgrade(&self.notify);
        Box::new(move || {
            if let Some(notify) = notify.upgrade() {
                notify.unsubscribe(id);
            }
        })
    }
}

/// [`StoreAdapter`] over a `ReducerStore<Action>`: every write becomes a
/// dispatched action.
pub struct ReducerStoreAdapter {
    store: Rc<ReducerStore<Action>>,
}

impl ReducerStoreAdapter {
    pub fn new(store: Rc<ReducerStore<Action>>) -> Self {
        Self { store }
    }

    /// Adapter over a fresh store seeded with `initial` and reduced by
    /// [`reduce`].
    pub fn with_state(initial: Value) -> Self {
        Self::new(ReducerStore::new(initial, reduce))
    }

    pub fn store(&self) -> &Rc<ReducerStore<Action>> {
        &self.store
    }
}

impl StoreAdapter for ReducerStoreAdapter {
    fn state(&self) -> Value {
        self.store.get_state()
    }

    fn get(&self, path: &str) -> Option<Value> {
        self.store.read(|state| tree::get(state, path).cloned())
    }

    fn set(&self, path: &str, value: Option<Value>) -> Result<Option<Value>> {
        tracing::debug!(path, "dispatching SET");
        self.store.dispatch(&Action::set(path, value))?;
        Ok(self.get(path))
    }

    fn merge(&self, path: &str, value: Value) -> Result<Option<Value>> {
        tracing::debug!(path, "dispatching MERGE");
        self.store.dispatch(&Action::merge(path, value))?;
        Ok(self.get(path))
    }

    fn set_paths(&self, paths: &[PathValue]) -> Result<Value> {
        tracing::debug!(count = paths.len(), "dispatching SET_PATHS");
        self.store.dispatch(&Action::set_paths(paths.to_vec()))?;
        Ok(self.state())
    }

    fn subscribe(&self, callback: Rc<dyn Fn()>) -> Unsubscribe {
        self.store.subscribe(callback)
    }
}
