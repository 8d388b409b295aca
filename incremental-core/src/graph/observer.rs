//! Observers
//!
//! An observer is the terminal edge of the graph. It wraps a callback into
//! user code, fires once when it is created, and afterwards once per batch
//! in which its cell changed.
//!
//! Observers sit at [`Height::Observer`], below every reader, so within a
//! batch they only run after every reader has settled.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::height::Height;
use super::node::{EdgeId, Node};

/// A terminal edge delivering values to a callback.
pub(crate) struct Observer {
    id: EdgeId,
    notify: RefCell<Box<dyn FnMut()>>,
    disposed: Cell<bool>,
}

impl Observer {
    /// Create an observer and fire it immediately.
    pub(crate) fn new<F>(notify: F) -> Rc<Self>
    where
        F: FnMut() + 'static,
    {
        let observer = Rc::new(Self {
            id: EdgeId::new(),
            notify: RefCell::new(Box::new(notify)),
            disposed: Cell::new(false),
        });
        observer.fire();
        observer
    }

    pub(crate) fn id(&self) -> EdgeId {
        self.id
    }

    /// Run the callback, unless the observer has been disposed.
    pub(crate) fn fire(&self) {
        if self.disposed.get() {
            return;
        }
        let mut notify = self.notify.borrow_mut();
        (*notify)();
    }

    /// Stop all future firings, including one already pending in the
    /// current batch.
    pub(crate) fn dispose(&self) {
        self.disposed.set(true);
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl Node for Observer {
    fn height(&self) -> Height {
        Height::Observer
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("id", &self.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observer_fires_on_creation() {
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();

        let _observer = Observer::new(move || runs_clone.set(runs_clone.get() + 1));

        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn observer_fires_on_demand() {
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();

        let observer = Observer::new(move || runs_clone.set(runs_clone.get() + 1));
        observer.fire();
        observer.fire();

        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn disposed_observer_does_not_fire() {
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();

        let observer = Observer::new(move || runs_clone.set(runs_clone.get() + 1));
        observer.dispose();
        observer.fire();

        assert!(observer.is_disposed());
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn observer_height_is_the_sentinel() {
        let observer = Observer::new(|| {});
        assert_eq!(observer.height(), Height::Observer);
    }
}
