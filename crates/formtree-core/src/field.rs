//! Leaf node: a single value with filters and validation.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use formtree_events::Subscription;
use formtree_store::path::{build_path, join};
use formtree_store::{PathValue, StoreAdapter, StoreContext, Watch};
use formtree_validate::{
    Filter, ValidationSet, ValidationTrigger, apply_errors_if_changed, errors_from_value,
    errors_to_value, run_filters,
};

use crate::error::{FormError, Result};
use crate::event::FormEvent;
use crate::form::ERRORS_KEY;
use crate::node::{Wiring, validate_name};
use crate::scope::FormScope;

/// Construction inputs for a [`Field`].
#[derive(Clone, Default)]
pub struct FieldProps {
    pub name: String,
    /// Base-path override; defaults to the enclosing scope's path.
    pub path: Option<String>,
    pub validation: ValidationSet,
    /// Applied to raw input, left to right, before storing or validating.
    pub filters: Vec<Filter>,
}

impl FieldProps {
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

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// A leaf field. Writes its value and errors into the store at
/// `base.name` / `base.__errors__.name`, re-renders through the
/// change-detection gate on either path, and takes part in the validation
/// event protocol through the enclosing scope's bus.
pub struct Field {
    name: String,
    path: String,
    error_path: String,
    adapter: Rc<dyn StoreAdapter>,
    validation: Rc<RefCell<ValidationSet>>,
    filters: Vec<Filter>,
    wiring: Wiring,
    detached: bool,
}

impl Field {
    pub fn new(
        adapter: Rc<dyn StoreAdapter>,
        parent: &Rc<FormScope>,
        props: FieldProps,
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
        wiring.watch_store(&adapter, Watch::paths([path.clone(), error_path.clone()]));

        Ok(Self {
            name: props.name,
            path,
            error_path,
            adapter,
            validation,
            filters: props.filters,
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

    pub fn events(&self) -> &Rc<Subscription<FormEvent>> {
        &self.wiring.events
    }

    /// Fired (through the change-detection gate) when the field's value or
    /// errors change.
    pub fn updates(&self) -> &Rc<Subscription<()>> {
        &self.wiring.updates
    }

    /// Store view rooted at the field's path.
    pub fn context(&self) -> StoreContext {
        StoreContext::new(Rc::clone(&self.adapter), self.path.clone())
    }

    /// Current stored value, `None` when absent.
    pub fn value(&self) -> Option<Value> {
        self.adapter.get(&self.path)
    }

    /// Current stored error list.
    pub fn errors(&self) -> Vec<String> {
        errors_from_value(self.adapter.get(&self.error_path).as_ref())
    }

    /// Accept a raw input value: run the filter chain, write value and
    /// change-validation errors as one store write, then raise the change
    /// request (ancestors revalidate) and the change outcome.
    pub fn input(&self, raw: Value) -> Result<()> {
        let value = run_filters(&self.filters, raw);
        let from_value = self.value();
        let from_errors = self.errors();
        let to_errors = self
            .validation
            .borrow()
            .compute_errors(ValidationTrigger::Change, Some(&value));
        tracing::debug!(path = %self.path, errors = to_errors.len(), "field input");

        self.adapter.set_paths(&[
            PathValue::new(self.path.clone(), value),
            PathValue::new(self.error_path.clone(), errors_to_value(&to_errors)),
        ])?;

        self.wiring.events.invoke(&FormEvent::RunChangeValidation {
            sender: self.path.clone(),
        });
        self.wiring.events.invoke(&FormEvent::Change {
            sender: self.path.clone(),
            from_value,
            to_value: self.value(),
            from_errors,
            to_errors,
        });
        Ok(())
    }

    /// Report that the field lost focus: raise the blur request (the field
    /// itself and every ancestor revalidate) and the blur outcome.
    pub fn blur(&self) {
        let from_errors = self.errors();
        self.wiring.events.invoke(&FormEvent::RunBlurValidation {
            sender: self.path.clone(),
        });
        let to_errors = self.errors();
        self.wiring.events.invoke(&FormEvent::Blur {
            sender: self.path.clone(),
            from_errors,
            to_errors,
        });
    }

    /// Enable or disable validation, revalidating on an actual flip.
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

    /// Tear down all wiring. Terminal.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.wiring.detach();
    }
}

impl Drop for Field {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}
