//! Read/write view over the store rooted at a base path.

use std::rc::Rc;

use serde_json::Value;

use crate::adapter::StoreAdapter;
use crate::error::Result;
use crate::path::join;
use crate::tree::PathValue;

/// A store view bound to a fixed base path. Every operation composes
/// `base + relative` and delegates to the underlying adapter, so a scope
/// works identically at the root and several levels deep. An empty relative
/// path addresses the base subtree itself.
pub struct StoreContext {
    adapter: Rc<dyn StoreAdapter>,
    base_path: String,
}

impl StoreContext {
    pub fn new(adapter: Rc<dyn StoreAdapter>, base_path: impl Into<String>) -> Self {
        Self {
            adapter,
            base_path: base_path.into(),
        }
    }

    pub fn adapter(&self) -> &Rc<dyn StoreAdapter> {
        &self.adapter
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The subtree at the base path, or the whole store for an empty base.
    pub fn state(&self) -> Option<Value> {
        self.adapter.get(&self.base_path)
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        self.adapter.get(&join(&self.base_path, path))
    }

    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    pub fn set(&self, path: &str, value: Option<Value>) -> Result<Option<Value>> {
        self.adapter.set(&join(&self.base_path, path), value)
    }

    pub fn merge(&self, path: &str, value: Value) -> Result<Option<Value>> {
        self.adapter.merge(&join(&self.base_path, path), value)
    }

    /// Qualify each entry with the base path and apply them as one write.
    /// Returns the resulting base subtree.
    pub fn set_paths(&self, paths: &[PathValue]) -> Result<Option<Value>> {
        let qualified: Vec<PathValue> = paths
            .iter()
            .map(|entry| PathValue::new(join(&self.base_path, &entry.path), entry.value.clone()))
            .collect();
        self.adapter.set_paths(&qualified)?;
        Ok(self.state())
    }
}
