//! Readers
//!
//! A reader is the internal edge between a source cell and whatever was
//! computed from it. Firing a reader re-runs its closure, which reads the
//! source's current value, writes the recomputed result somewhere, and
//! returns the node that was written (its new target).
//!
//! For `map` the target is always the same result cell. For `flat_map` the
//! target is the reader of whichever inner cell the current source value
//! selected, which is how the graph changes shape at runtime.
//!
//! Once disposed a reader is invalidated for good and firing it does
//! nothing. A pending firing that was queued before disposal is therefore
//! harmless.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::height::Height;
use super::node::{EdgeId, Node, Target};

type ReadFn = Box<dyn FnMut() -> Target>;

/// A dynamic edge from a source cell to a (possibly changing) target.
pub(crate) struct Reader {
    id: EdgeId,
    read: RefCell<ReadFn>,
    target: RefCell<Target>,
    invalidated: Cell<bool>,
}

impl Reader {
    /// Create a reader, evaluating `read` once to find its initial target.
    pub(crate) fn new<F>(read: F) -> Rc<Self>
    where
        F: FnMut() -> Target + 'static,
    {
        let mut read: ReadFn = Box::new(read);
        let target = read();
        Self::with_target(target, read)
    }

    /// Create a reader whose initial evaluation has already been done by the
    /// caller, so `read` first runs on the next firing.
    pub(crate) fn settled<F>(target: Target, read: F) -> Rc<Self>
    where
        F: FnMut() -> Target + 'static,
    {
        Self::with_target(target, Box::new(read))
    }

    fn with_target(target: Target, read: ReadFn) -> Rc<Self> {
        Rc::new(Self {
            id: EdgeId::new(),
            read: RefCell::new(read),
            target: RefCell::new(target),
            invalidated: Cell::new(false),
        })
    }

    pub(crate) fn id(&self) -> EdgeId {
        self.id
    }

    /// Re-evaluate and retarget. A no-op once invalidated.
    pub(crate) fn fire(&self) {
        if self.invalidated.get() {
            return;
        }
        let next = {
            let mut read = self.read.borrow_mut();
            (*read)()
        };
        let previous = self.target.replace(next);
        // Dropping the old target can cascade into other subscriptions.
        drop(previous);
    }

    /// Permanently disable this reader.
    pub(crate) fn invalidate(&self) {
        self.invalidated.set(true);
    }

    pub(crate) fn is_invalidated(&self) -> bool {
        self.invalidated.get()
    }
}

impl Node for Reader {
    fn height(&self) -> Height {
        self.target.borrow().height().incremented()
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("id", &self.id)
            .field("height", &self.height())
            .field("invalidated", &self.is_invalidated())
            .finish()
    }
}
