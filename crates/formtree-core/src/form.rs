//! The root node of a form tree.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use formtree_events::Subscription;
use formtree_store::path::build_path;
use formtree_store::{StoreAdapter, StoreContext, Watch, find_prop_children, is_empty_value};
use formtree_validate::ValidationSet;

use crate::error::Result;
use crate::event::{AbortReason, FormEvent};
use crate::node::{Wiring, validate_name};
use crate::scope::FormScope;

/// Reserved key holding the error sub-tree at each scope. Not addressable
/// as a node name.
pub const ERRORS_KEY: &str = "__errors__";

/// How a submit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Aborted(AbortReason),
}

/// Construction inputs for a [`Form`].
#[derive(Clone, Default)]
pub struct FormProps {
    pub name: String,
    /// Store path for the form subtree; defaults to the form name.
    pub path: Option<String>,
    /// Root-level validators, run against the whole form subtree.
    pub validation: ValidationSet,
}

impl FormProps {
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

/// Root of a form tree. Owns the root scope handed to nested nodes, runs
/// root-level validation, and drives the submit protocol.
pub struct Form {
    name: String,
    path: String,
    error_path: String,
    adapter: Rc<dyn StoreAdapter>,
    validation: Rc<RefCell<ValidationSet>>,
    scope: Rc<FormScope>,
    wiring: Wiring,
    detached: bool,
}

impl Form {
    pub fn new(adapter: Rc<dyn StoreAdapter>, props: FormProps) -> Result<Self> {
        validate_name(&props.name)?;
        let path = props.path.unwrap_or_else(|| props.name.clone());
        // Root errors live inside the form subtree so a submit check finds
        // them along with every descendant's.
        let error_path = build_path([path.as_str(), ERRORS_KEY, props.name.as_str()]);

        let mut wiring = Wiring::new();
        let validation = Rc::new(RefCell::new(props.validation));
        wiring.listen_for_validation(&adapter, &path, &error_path, &validation);
        let watched = path.clone();
        wiring.watch_store(
            &adapter,
            Watch::selector(move |store| store.get_or(&watched, Value::Null)),
        );
        let scope = FormScope::root(path.clone(), Rc::clone(&wiring.events));

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

    /// The root scope nested nodes attach to.
    pub fn scope(&self) -> &Rc<FormScope> {
        &self.scope
    }

    /// The root event bus: outcome events from the whole tree surface here.
    pub fn events(&self) -> &Rc<Subscription<FormEvent>> {
        &self.wiring.events
    }

    /// Fired (through the change-detection gate) when the form subtree
    /// changes.
    pub fn updates(&self) -> &Rc<Subscription<()>> {
        &self.wiring.updates
    }

    /// Store view rooted at the form subtree.
    pub fn context(&self) -> StoreContext {
        StoreContext::new(Rc::clone(&self.adapter), self.path.clone())
    }

    /// Run submit validation across the whole tree, then either raise
    /// `Submit` or abort because errors survived.
    pub fn submit(&self) -> SubmitOutcome {
        self.wiring.events.invoke(&FormEvent::RunSubmitValidation {
            sender: self.path.clone(),
        });

        let outcome = if scope_has_errors(&*self.adapter, &self.path) {
            self.wiring.events.invoke(&FormEvent::SubmitAbort {
                sender: self.path.clone(),
                reason: AbortReason::Validation,
            });
            SubmitOutcome::Aborted(AbortReason::Validation)
        } else {
            self.wiring.events.invoke(&FormEvent::Submit {
                sender: self.path.clone(),
            });
            SubmitOutcome::Submitted
        };
        tracing::info!(path = %self.path, ?outcome, "submit finished");
        outcome
    }

    /// Report a host-driven cancellation to every subscriber.
    pub fn abort_submit(&self) {
        self.wiring.events.invoke(&FormEvent::SubmitAbort {
            sender: self.path.clone(),
            reason: AbortReason::User,
        });
    }

    /// Tear down all wiring. Terminal: nested nodes can no longer attach to
    /// this form's scope.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.wiring.detach();
        self.scope.detach();
    }
}

impl Drop for Form {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}

/// True when any error sub-tree under `base_path` still holds entries.
pub fn scope_has_errors(adapter: &dyn StoreAdapter, base_path: &str) -> bool {
    let Some(subtree) = adapter.get(base_path) else {
        return false;
    };
    find_prop_children(&subtree, ERRORS_KEY, base_path)
        .iter()
        .any(|(_, value)| !value.is_null() && !is_empty_value(value))
}
