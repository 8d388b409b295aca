//! Disposables
//!
//! A disposable revokes one reader or observer registration. Disposal is
//! explicit and idempotent: [`Disposable::dispose`] runs the release action
//! at most once, and dropping a disposable disposes it.
//!
//! Derived cells keep the disposables of their own readers, so the graph
//! behind a derived cell lives exactly as long as that cell.

use std::cell::Cell;
use std::fmt;

use super::group::SubscriptionGroup;
use crate::graph::Token;

/// Handle that revokes a subscription.
#[must_use = "dropping a Disposable immediately revokes the subscription"]
pub struct Disposable {
    release: Cell<Option<Box<dyn FnOnce()>>>,
}

impl Disposable {
    /// Wrap a release action.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            release: Cell::new(Some(Box::new(release))),
        }
    }

    /// A disposable with nothing to release.
    pub fn empty() -> Self {
        Self {
            release: Cell::new(None),
        }
    }

    /// Revoke the subscription. Later calls do nothing.
    pub fn dispose(&self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Whether the release action has run (or there never was one).
    pub fn is_disposed(&self) -> bool {
        let release = self.release.take();
        let disposed = release.is_none();
        self.release.set(release);
        disposed
    }

    /// Hand this disposable to a group, returning the group's token for it.
    pub fn on(self, group: &SubscriptionGroup) -> Token {
        group.add(self)
    }
}

impl Drop for Disposable {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
