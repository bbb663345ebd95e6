//! Context nodes carried down the component tree.

use std::cell::Cell;
use std::rc::Rc;

use formtree_events::Subscription;

use crate::event::FormEvent;

/// Whether a scope is the form root or a nested group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    Group,
}

/// One node of the context tree: its kind, a back-reference to the
/// enclosing scope (`None` at the root), the fully resolved path, and the
/// owning node's event bus. Created when a group node is composed into the
/// tree, marked detached when that node is torn down.
pub struct FormScope {
    kind: ScopeKind,
    parent: Option<Rc<FormScope>>,
    path: String,
    events: Rc<Subscription<FormEvent>>,
    detached: Cell<bool>,
}

impl FormScope {
    pub(crate) fn root(path: impl Into<String>, events: Rc<Subscription<FormEvent>>) -> Rc<Self> {
        Rc::new(Self {
            kind: ScopeKind::Root,
            parent: None,
            path: path.into(),
            events,
            detached: Cell::new(false),
        })
    }

    pub(crate) fn group(
        parent: Rc<FormScope>,
        path: impl Into<String>,
        events: Rc<Subscription<FormEvent>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            kind: ScopeKind::Group,
            parent: Some(parent),
            path: path.into(),
            events,
            detached: Cell::new(false),
        })
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&Rc<FormScope>> {
        self.parent.as_ref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn events(&self) -> &Rc<Subscription<FormEvent>> {
        &self.events
    }

    /// True once this scope - or any scope above it - has been torn down.
    pub fn is_detached(&self) -> bool {
        self.detached.get() || self.parent.as_ref().is_some_and(|parent| parent.is_detached())
    }

    pub(crate) fn detach(&self) {
        self.detached.set(true);
    }
}
