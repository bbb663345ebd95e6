//! The backend-agnostic store contract and the change-detection connector.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::change::ChangeDetection;
use crate::error::Result;
use crate::tree::PathValue;

/// Revokes a subscription when called. Dispatches already begun when the
/// revocation runs may still deliver; later ones never do.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// Contract any concrete store backend must satisfy.
///
/// Writes are synchronous-observable: subscribers fire after the write
/// completes, within the writing call and in registration order, and reads
/// always reflect the latest completed write. Backends are consumed as
/// `Rc<dyn StoreAdapter>`; nothing in the core depends on their internals.
pub trait StoreAdapter {
    /// Snapshot of the whole state tree.
    fn state(&self) -> Value;

    /// Value at `path`, the whole state for an empty path, `None` when the
    /// path does not resolve.
    fn get(&self, path: &str) -> Option<Value>;

    /// Write `value` at `path` (`None` deletes) and return the value now
    /// stored there - `None` when the write pruned the node away.
    fn set(&self, path: &str, value: Option<Value>) -> Result<Option<Value>>;

    /// Shallow-merge `value` at `path` and return the value now stored
    /// there.
    fn merge(&self, path: &str, value: Value) -> Result<Option<Value>>;

    /// Apply the entries as one sequential write and return the resulting
    /// whole state.
    fn set_paths(&self, paths: &[PathValue]) -> Result<Value>;

    /// Register a raw change callback, fired after every completed write.
    /// Consumers that react to state should route through
    /// [`connect_to_change_detection`] instead of subscribing directly.
    fn subscribe(&self, callback: Rc<dyn Fn()>) -> Unsubscribe;

    /// `get` with a fallback for unresolved paths.
    fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }
}

/// What a change-detection connection observes on each store notification.
pub enum Watch {
    /// A single derived value, recomputed from the adapter.
    Selector(Box<dyn Fn(&dyn StoreAdapter) -> Value>),
    /// Explicit paths, snapshotted as a path-to-value mapping compared by
    /// key set and values. Unresolved paths are omitted from the mapping.
    Paths(Vec<String>),
}

impl Watch {
    pub fn selector(selector: impl Fn(&dyn StoreAdapter) -> Value + 'static) -> Self {
        Self::Selector(Box::new(selector))
    }

    pub fn paths(paths: impl IntoIterator<Item: Into<String>>) -> Self {
        Self::Paths(paths.into_iter().map(Into::into).collect())
    }
}

/// Subscribe to `adapter`, recompute the watched snapshot on every
/// notification, and invoke `on_change` only when it differs from the last
/// observed snapshot. This is the sole gate between raw store notifications
/// and consumer re-computation.
///
/// The connection holds the adapter weakly; it never keeps its own store
/// alive.
pub fn connect_to_change_detection(
    adapter: &Rc<dyn StoreAdapter>,
    watch: Watch,
    on_change: impl Fn() + 'static,
) -> Unsubscribe {
    let snapshot: Box<dyn Fn() -> Option<Value>> = match watch {
        Watch::Selector(selector) => {
            let weak = Rc::downgrade(adapter);
            Box::new(move || weak.upgrade().map(|adapter| selector(&*adapter)))
        }
        Watch::Paths(paths) => {
            let weak = Rc::downgrade(adapter);
            Box::new(move || {
                let adapter = weak.upgrade()?;
                let mut map = Map::new();
                for path in &paths {
                    if let Some(value) = adapter.get(path) {
                        map.insert(path.clone(), value);
                    }
                }
                Some(Value::Object(map))
            })
        }
    };

    let detection = RefCell::new(ChangeDetection::new());
    adapter.subscribe(Rc::new(move || {
        let Some(current) = snapshot() else { return };
        if detection.borrow_mut().check(current) {
            on_change();
        }
    }))
}
