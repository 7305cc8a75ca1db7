//! Per-resource listener lists.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by every `on_*` subscription, accepted by `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Hands out listener ids for one resource.
#[derive(Debug, Default)]
pub(crate) struct ListenerIds {
    next: Cell<u64>,
}

impl ListenerIds {
    pub(crate) fn next(&self) -> ListenerId {
        let id = self.next.get() + 1;
        self.next.set(id);
        ListenerId(id)
    }
}

type Callback<A> = Rc<dyn Fn(&A)>;

/// Callbacks for one event of one resource.
///
/// `emit` works on a snapshot, so a callback may add or remove listeners
/// (or destroy the resource that owns the list) while it runs.
pub(crate) struct Listeners<A: ?Sized> {
    entries: RefCell<Vec<(ListenerId, Callback<A>)>>,
}

impl<A: ?Sized> Default for Listeners<A> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<A: ?Sized> Listeners<A> {
    pub(crate) fn add(&self, id: ListenerId, callback: impl Fn(&A) + 'static) {
        self.entries.borrow_mut().push((id, Rc::new(callback)));
    }

    /// Returns whether `id` was registered here.
    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    pub(crate) fn emit(&self, arg: &A) {
        let snapshot: Vec<Callback<A>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(arg);
        }
    }

    pub(crate) fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}
