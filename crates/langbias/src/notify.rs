//! Subscription table used to tell the rendering layer about state changes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<E> = Rc<RefCell<Box<dyn FnMut(&E)>>>;

struct ListenerTable<E> {
    next_id: u64,
    entries: Vec<(u64, Listener<E>)>,
}

/// Single-threaded list of listeners for events of type `E`.
///
/// Cloning yields another handle to the same table.
pub struct Listeners<E> {
    table: Rc<RefCell<ListenerTable<E>>>,
}

impl<E> Clone for Listeners<E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            table: Rc::new(RefCell::new(ListenerTable {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<E: 'static> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. It stays registered until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, listener: impl FnMut(&E) + 'static) -> Subscription {
        let listener: Box<dyn FnMut(&E)> = Box::new(listener);
        let id = {
            let mut table = self.table.borrow_mut();
            let id = table.next_id;
            table.next_id += 1;
            table.entries.push((id, Rc::new(RefCell::new(listener))));
            id
        };
        let table: Weak<RefCell<ListenerTable<E>>> = Rc::downgrade(&self.table);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(table) = table.upgrade() {
                    table.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Call every listener registered at the moment of the call.
    ///
    /// Listeners may subscribe or unsubscribe while being notified. A listener
    /// that triggers a nested notification of itself is skipped for the
    /// nested event.
    pub fn notify(&self, event: &E) {
        let listeners: Vec<Listener<E>> = self
            .table
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut listener) => (&mut **listener)(event),
                Err(_) => log::warn!("skipping re-entrant listener notification"),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.table.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
