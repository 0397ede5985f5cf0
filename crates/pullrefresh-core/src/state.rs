//! Observable single-writer state cells.
//!
//! A `MutableState` is held by exactly one writer; readers get a `State`
//! view and may subscribe to changes. Listeners run synchronously on the UI
//! thread, after the new value is stored.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

pub type SubscriptionId = u64;

type Listener<T> = Rc<dyn Fn(&T) + 'static>;

struct StateInner<T> {
    value: RefCell<T>,
    listeners: RefCell<SmallVec<[(SubscriptionId, Listener<T>); 2]>>,
    next_listener_id: Cell<SubscriptionId>,
}

/// Writable handle to a state cell. Clones share the same cell.
pub struct MutableState<T> {
    inner: Rc<StateInner<T>>,
}

/// Read-only view of a state cell.
pub struct State<T> {
    inner: Rc<StateInner<T>>,
}

impl<T: Clone + PartialEq + 'static> MutableState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(StateInner {
                value: RefCell::new(value),
                listeners: RefCell::new(SmallVec::new()),
                next_listener_id: Cell::new(1),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Stores `value` and notifies listeners. Returns `false` when the value
    /// was already equal and nothing changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        notify(&self.inner);
        true
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn as_state(&self) -> State<T> {
        State {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> State<T> {
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(entry, _)| *entry != id);
    }
}

fn notify<T: Clone>(inner: &StateInner<T>) {
    let listeners: SmallVec<[Listener<T>; 2]> = inner
        .listeners
        .borrow()
        .iter()
        .map(|(_, listener)| Rc::clone(listener))
        .collect();
    if listeners.is_empty() {
        return;
    }
    let value = inner.value.borrow().clone();
    for listener in listeners {
        listener(&value);
    }
}

impl<T> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutableState")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
