//! Incremental Core
//!
//! This crate provides a self-adjusting computation engine: mutable roots
//! are transformed and combined into derived cells that re-evaluate
//! automatically when their inputs change. It implements:
//!
//! - Height-ordered change propagation with no glitches
//! - At most one firing per edge per batch
//! - Dynamic dependencies (`flat_map`) that rewire the graph at runtime
//! - Explicit, leak-free subscription lifetimes
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Heights, edges, the token registry and the scheduler
//! - `reactive`: Cells, roots, combinators and subscriptions
//! - `error`: Programming errors the engine detects
//!
//! # Example
//!
//! ```rust
//! use incremental_core::reactive::Runtime;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let runtime = Runtime::new();
//! let count = runtime.var(1);
//! let doubled = count.incr().map(|c| c * 2);
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let seen_clone = seen.clone();
//! let _observer = doubled.observe(move |d| seen_clone.borrow_mut().push(*d));
//!
//! count.set(2);
//! assert_eq!(*seen.borrow(), vec![2, 4]);
//! ```

pub mod error;
pub mod graph;
pub mod reactive;

pub use error::{Error, Result};
pub use reactive::{Disposable, Equality, Incr, Runtime, SubscriptionGroup, Var};
