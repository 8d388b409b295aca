//! Mutable Roots
//!
//! A `Var` is the only cell user code writes directly. Everything downstream
//! of it is derived through the combinators on [`Incr`].

use std::fmt::{self, Debug};

use super::cell::{CellInner, Incr};
use super::disposable::Disposable;
use super::equality::Equality;
use super::runtime::Runtime;

/// A writable root cell.
///
/// Cloning a `Var` gives another handle to the same cell.
pub struct Var<T> {
    incr: Incr<T>,
}

impl<T: Clone + 'static> Var<T> {
    /// Create a root compared by `==`.
    pub fn new(runtime: &Runtime, value: T) -> Self
    where
        T: PartialEq,
    {
        Self::with_eq(runtime, value, Equality::natural())
    }

    /// Create a root with a custom equality.
    pub fn with_eq(runtime: &Runtime, value: T, eq: Equality<T>) -> Self {
        Self {
            incr: Incr::from_inner(CellInner::new(runtime.clone(), value, eq)),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.incr.read()
    }

    /// Replace the value.
    ///
    /// When this changes the value and no batch is running, every affected
    /// reader and observer has run by the time `set` returns. Inside a batch
    /// (from an observer callback) the change is folded into that batch.
    ///
    /// # Panics
    ///
    /// Panics if a transform or callback reached by this change panics. The
    /// runtime stays usable afterwards.
    pub fn set(&self, value: T) {
        self.incr.inner.write(value);
    }

    /// Update the value in place and write the result back.
    pub fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// The read side of this root, for building derived cells.
    pub fn incr(&self) -> &Incr<T> {
        &self.incr
    }

    /// Shorthand for `self.incr().observe(callback)`.
    pub fn observe<F>(&self, callback: F) -> Disposable
    where
        F: FnMut(&T) + 'static,
    {
        self.incr.observe(callback)
    }
}

impl Var<()> {
    /// Create a unit root for signalling: every [`Var::notify`] propagates.
    pub fn trigger(runtime: &Runtime) -> Self {
        Self::with_eq(runtime, (), Equality::never())
    }

    /// Propagate a change without a payload.
    pub fn notify(&self) {
        self.set(());
    }
}

impl<T> Clone for Var<T> {
    fn clone(&self) -> Self {
        Self {
            incr: self.incr.clone(),
        }
    }
}

impl<T: Debug> Debug for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Var").field(&self.incr).finish()
    }
}
