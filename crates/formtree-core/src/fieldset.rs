//! Grouping node: a nested scope with its own validation.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use formtree_events::Subscription;
use formtree_store::path::{build_path, join};
use formtree_store::{StoreAdapter, StoreContext, Watch};
use formtree_validate::{ValidationSet, ValidationTrigger, apply_errors_if_changed};

use crate::error::{FormError, Result};
use crate::event::FormEvent;
use crate::form::ERRORS_KEY;
use crate::node::{Wiring, validate_name};
use crate::scope::FormScope;

/// Construction inputs for a [`FieldSet`].
#[derive(Clone, Default)]
pub struct FieldSetProps {
    pub name: String,
    /// Base-path override; defaults to the enclosing scope's path.
    pub path: Option<String>,
    /// Group-level validators, run against the group subtree.
    pub validation: ValidationSet,
}

impl FieldSetProps {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_validation(mut self, validation: ValidationSet) -> Self {
        self.validation = validation;
        self
    }
}

/// A group of nested nodes sharing a path prefix. Owns the child scope its
/// members attach to; its bus is chained into the parent's, so member
/// activity bubbles through it and submit requests reach its members.
pub struct FieldSet {
    name: String,
    path: String,
    error_path: String,
    adapter: Rc<dyn StoreAdapter>,
    validation: Rc<RefCell<ValidationSet>>,
    scope: Rc<FormScope>,
    wiring: Wiring,
    detached: bool,
}

impl FieldSet {
    pub fn new(
        adapter: Rc<dyn StoreAdapter>,
        parent: &Rc<FormScope>,
        props: FieldSetProps,
    ) -> Result<Self> {
        validate_name(&props.name)?;
        if parent.is_detached() {
            return Err(FormError::DetachedScope);
        }
        let base = props.path.unwrap_or_else(|| parent.path().to_string());
        let path = join(&base, &props.name);
        let error_path = build_path([base.as_str(), ERRORS_KEY, props.name.as_str()]);

        let mut wiring = Wiring::new();
        let validation = Rc::new(RefCell::new(props.validation));
        wiring.listen_for_validation(&adapter, &path, &error_path, &validation);
        wiring.connect_parent(parent.events());
        let watched = path.clone();
        wiring.watch_store(
            &adapter,
            Watch::selector(move |store| store.get_or(&watched, Value::Null)),
        );
        let scope = FormScope::group(Rc::clone(parent), path.clone(), Rc::clone(&wiring.events));

        Ok(Self {
            name: props.name,
            path,
            error_path,
            adapter,
            validation,
            scope,
            wiring,
            detached: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn error_path(&self) -> &str {
        &self.error_path
    }

    /// The scope nested members attach to.
    pub fn scope(&self) -> &Rc<FormScope> {
        &self.scope
    }

    pub fn events(&self) -> &Rc<Subscription<FormEvent>> {
        &self.wiring.events
    }

    /// Fired (through the change-detection gate) when the group subtree
    /// changes.
    pub fn updates(&self) -> &Rc<Subscription<()>> {
        &self.wiring.updates
    }

    /// Store view rooted at the group subtree.
    pub fn context(&self) -> StoreContext {
        StoreContext::new(Rc::clone(&self.adapter), self.path.clone())
    }

    /// Enable or disable group validation, revalidating on an actual flip.
    pub fn set_disabled(&self, disabled: bool) -> Result<()> {
        let flipped = {
            let mut validation = self.validation.borrow_mut();
            let flipped = validation.disabled != disabled;
            validation.disabled = disabled;
            flipped
        };
        if flipped {
            let snapshot = self.validation.borrow().clone();
            apply_errors_if_changed(
                &*self.adapter,
                &self.path,
                &self.error_path,
                &snapshot,
                ValidationTrigger::Change,
            )?;
        }
        Ok(())
    }

    /// Tear down all wiring and mark the child scope detached. Terminal.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.wiring.detach();
        self.scope.detach();
    }
}

impl Drop for FieldSet {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSet")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}
