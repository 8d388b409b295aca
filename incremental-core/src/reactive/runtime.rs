//! Reactive Runtime
//!
//! The runtime owns the scheduler that every cell created from it shares.
//! It is constructed explicitly and passed around by handle, so separate
//! graphs (for example, separate tests) never share propagation state.
//!
//! # How It Works
//!
//! 1. Roots are created from the runtime ([`Runtime::var`],
//!    [`Runtime::constant`]).
//!
//! 2. Derived cells inherit the runtime of the cell they were built from.
//!
//! 3. A write to any cell of the runtime drains that runtime's scheduler
//!    before returning.
//!
//! # Thread Safety
//!
//! None. A runtime and its cells are `!Send`; all mutation and propagation
//! happen on the thread that created them.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use super::cell::Incr;
use super::equality::Equality;
use super::var::Var;
use crate::error::{Error, Result};
use crate::graph::Scheduler;

/// Handle to one propagation scheduler.
#[derive(Clone)]
pub struct Runtime {
    scheduler: Rc<Scheduler>,
}

impl Runtime {
    /// Create a runtime with an idle scheduler.
    pub fn new() -> Self {
        trace!("runtime created");
        Self {
            scheduler: Rc::new(Scheduler::new()),
        }
    }

    /// Create a mutable root compared by `==`.
    pub fn var<T>(&self, value: T) -> Var<T>
    where
        T: Clone + PartialEq + 'static,
    {
        Var::new(self, value)
    }

    /// Create a mutable root with a custom equality.
    pub fn var_with<T>(&self, value: T, eq: Equality<T>) -> Var<T>
    where
        T: Clone + 'static,
    {
        Var::with_eq(self, value, eq)
    }

    /// Create a cell that never changes.
    pub fn constant<T>(&self, value: T) -> Incr<T>
    where
        T: Clone + 'static,
    {
        Incr::constant(self, value)
    }

    /// Check that `other` is this runtime.
    pub fn check_same(&self, other: &Runtime) -> Result<()> {
        if self.ptr_eq(other) {
            Ok(())
        } else {
            Err(Error::RuntimeMismatch)
        }
    }

    /// Whether two handles refer to the same runtime.
    pub fn ptr_eq(&self, other: &Runtime) -> bool {
        Rc::ptr_eq(&self.scheduler, &other.scheduler)
    }

    /// Whether a batch is being drained right now.
    ///
    /// True only when called from inside a reader or observer.
    pub fn is_propagating(&self) -> bool {
        self.scheduler.is_processing()
    }

    pub(crate) fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Panic with [`Error::RuntimeMismatch`] unless `other` is this runtime.
    pub(crate) fn assert_same(&self, other: &Runtime) {
        if let Err(err) = self.check_same(other) {
            panic!("{err}");
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("propagating", &self.is_propagating())
            .field("pending", &self.scheduler.pending_len())
            .finish()
    }
}
