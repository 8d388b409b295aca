//! Reactive Layer
//!
//! The typed API over the graph: cells that hold values, roots that user
//! code writes, and the combinators that derive new cells from old ones.
//!
//! # Concepts
//!
//! ## Cells
//!
//! An [`Incr`] holds the latest value of a source or derived computation.
//! Reading is always allowed. Writing happens only through a [`Var`] or
//! through the readers the combinators install.
//!
//! ## Readers and Observers
//!
//! Each combinator attaches a reader to its source cell. When the source
//! changes, the reader recomputes and writes the derived cell. Observers are
//! the terminal edges: they deliver settled values to user callbacks, once
//! eagerly on subscription and then once per batch that changed the value.
//!
//! ## Lifetimes
//!
//! Subscriptions are values. [`Incr::observe`] returns a [`Disposable`]
//! that revokes the observer when disposed or dropped. Derived cells hold
//! their own subscriptions, so a derived cell and the graph behind it are
//! freed together once nothing refers to them. A [`SubscriptionGroup`]
//! bundles subscriptions that should end together.
//!
//! # Implementation Notes
//!
//! Dependencies are explicit: a combinator subscribes to exactly the cells
//! it was built from. `flat_map` is the only combinator that changes its
//! dependencies after construction.

mod cell;
mod combinators;
mod disposable;
mod equality;
mod group;
mod runtime;
mod var;

pub use cell::Incr;
pub use disposable::Disposable;
pub use equality::Equality;
pub use group::SubscriptionGroup;
pub use runtime::Runtime;
pub use var::Var;
