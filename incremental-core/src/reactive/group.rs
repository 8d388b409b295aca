//! Subscription Groups
//!
//! A group collects disposables so a whole set of subscriptions can be
//! cancelled at once, or one at a time by token. Dropping the group cancels
//! everything still in it.

use std::cell::RefCell;
use std::fmt;

use tracing::trace;

use super::cell::Incr;
use super::disposable::Disposable;
use super::var::Var;
use crate::graph::{Registry, Token};

/// A bag of subscriptions with a shared lifetime.
#[derive(Default)]
pub struct SubscriptionGroup {
    subscriptions: RefCell<Registry<Disposable>>,
}

impl SubscriptionGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a disposable.
    pub fn add(&self, disposable: Disposable) -> Token {
        self.subscriptions.borrow_mut().add(disposable)
    }

    /// Observe a cell for as long as this group (or the returned token) lives.
    pub fn observe<T, F>(&self, incr: &Incr<T>, callback: F) -> Token
    where
        T: Clone + 'static,
        F: FnMut(&T) + 'static,
    {
        self.add(incr.observe(callback))
    }

    /// Observe a root for as long as this group (or the returned token) lives.
    pub fn observe_var<T, F>(&self, var: &Var<T>, callback: F) -> Token
    where
        T: Clone + 'static,
        F: FnMut(&T) + 'static,
    {
        self.observe(var.incr(), callback)
    }

    /// Dispose one subscription. Unknown or already cancelled tokens are
    /// ignored.
    pub fn cancel(&self, token: Token) {
        let removed = self.subscriptions.borrow_mut().remove(token);
        drop(removed);
    }

    /// Dispose every subscription in the group.
    pub fn cancel_all(&self) {
        let all = self.subscriptions.borrow_mut().drain();
        trace!(count = all.len(), "cancelling subscription group");
        drop(all);
    }

    /// Number of subscriptions still held.
    pub fn len(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Whether the group holds no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.borrow().is_empty()
    }
}

impl fmt::Debug for SubscriptionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionGroup")
            .field("len", &self.len())
            .finish()
    }
}
