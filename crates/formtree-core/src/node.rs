//! Shared wiring for form nodes: event buses, forwarding registrations and
//! the store gate. Every registration is held by id/handle and revoked on
//! detach.

use std::cell::RefCell;
use std::rc::Rc;

use formtree_events::{SubscriberId, Subscription};
use formtree_store::path::SEPARATOR;
use formtree_store::{StoreAdapter, Unsubscribe, Watch, connect_to_change_detection};
use formtree_validate::{ValidationSet, apply_errors_if_changed};

use crate::error::FormError;
use crate::event::{BUBBLED_EVENTS, EventKind, FormEvent, filter_events, filter_validation_events};

pub(crate) fn validate_name(name: &str) -> Result<(), FormError> {
    if name.contains(SEPARATOR) {
        return Err(FormError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Event and store wiring owned by one node.
pub(crate) struct Wiring {
    pub events: Rc<Subscription<FormEvent>>,
    pub updates: Rc<Subscription<()>>,
    store_gate: Option<Unsubscribe>,
    own_validation: Option<SubscriberId>,
    forward_up: Option<SubscriberId>,
    forward_down: Option<SubscriberId>,
    parent_events: Option<Rc<Subscription<FormEvent>>>,
}

impl Wiring {
    pub fn new() -> Self {
        Self {
            events: Rc::new(Subscription::new()),
            updates: Rc::new(Subscription::new()),
            store_gate: None,
            own_validation: None,
            forward_up: None,
            forward_down: None,
            parent_events: None,
        }
    }

    /// React to validation requests on the own bus by recomputing this
    /// node's validators and conditionally writing its errors.
    pub fn listen_for_validation(
        &mut self,
        adapter: &Rc<dyn StoreAdapter>,
        path: &str,
        error_path: &str,
        validation: &Rc<RefCell<ValidationSet>>,
    ) {
        let adapter = Rc::clone(adapter);
        let validation = Rc::clone(validation);
        let path = path.to_string();
        let error_path = error_path.to_string();
        let id = self.events.subscribe(filter_validation_events(move |event| {
            let Some(trigger) = event.validation_trigger() else {
                return;
            };
            // Clone the set so the borrow is not held across the store
            // write, whose subscribers run synchronously.
            let snapshot = validation.borrow().clone();
            let result = apply_errors_if_changed(&*adapter, &path, &error_path, &snapshot, trigger);
            // The error path always has a concrete target, so the only
            // failable write cannot fail here; log just in case.
            if let Err(error) = result {
                tracing::warn!(%error, path, "validation error write failed");
            }
        }));
        self.own_validation = Some(id);
    }

    /// Chain this node's bus into the parent's: bubbled kinds go up, submit
    /// requests come down.
    pub fn connect_parent(&mut self, parent: &Rc<Subscription<FormEvent>>) {
        let up_target = Rc::downgrade(parent);
        self.forward_up = Some(self.events.subscribe(filter_events(
            &BUBBLED_EVENTS,
            move |event| {
                if let Some(target) = up_target.upgrade() {
                    target.invoke(event);
                }
            },
        )));

        let down_target = Rc::downgrade(&self.events);
        self.forward_down = Some(parent.subscribe(filter_events(
            &[EventKind::RunSubmitValidation],
            move |event| {
                if let Some(target) = down_target.upgrade() {
                    target.invoke(event);
                }
            },
        )));
        self.parent_events = Some(Rc::clone(parent));
    }

    /// Route store notifications through the change-detection gate into the
    /// node's update bus.
    pub fn watch_store(&mut self, adapter: &Rc<dyn StoreAdapter>, watch: Watch) {
        let updates = Rc::downgrade(&self.updates);
        self.store_gate = Some(connect_to_change_detection(adapter, watch, move || {
            if let Some(updates) = updates.upgrade() {
                updates.invoke(&());
            }
        }));
    }

    /// Revoke every registration. No callbacks fire after this returns.
    pub fn detach(&mut self) {
        if let Some(unsubscribe) = self.store_gate.take() {
            unsubscribe();
        }
        if let Some(id) = self.own_validation.take() {
            self.events.unsubscribe(id);
        }
        if let Some(id) = self.forward_up.take() {
            self.events.unsubscribe(id);
        }
        if let (Some(id), Some(parent)) = (self.forward_down.take(), self.parent_events.take()) {
            parent.unsubscribe(id);
        }
    }
}
