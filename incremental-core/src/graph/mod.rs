//! Propagation Graph
//!
//! This module implements the engine underneath the reactive cells: the
//! height model that orders recomputation, the edges that get fired, and
//! the worklist that drains a change in one pass.
//!
//! # Overview
//!
//! - Cells are nodes. They hold values and know which edges read them.
//! - Readers are edges from a source cell to something recomputed from it.
//!   A reader's target can change at runtime (`flat_map`).
//! - Observers are terminal edges into user callbacks.
//!
//! When a cell changes, its edges are queued with their current heights and
//! the scheduler fires them highest first. Since heights decrease along
//! every live path toward an observer, this is a topological order even
//! while the graph is being rewired.
//!
//! # Design Decisions
//!
//! 1. Heights are recomputed on demand, never stored, because dynamic
//!    rewiring changes them between batches.
//!
//! 2. Edges are tracked in token registries so a cell can enumerate and
//!    revoke its attached edges without owning them.
//!
//! 3. Source cells only hold weak references to their readers. Readers are
//!    owned by the cells computed from them, so dropping a derived cell
//!    releases its part of the graph.

mod height;
mod node;
pub(crate) mod observer;
pub(crate) mod reader;
mod registry;
pub(crate) mod scheduler;

pub use height::Height;
pub use node::{EdgeId, EdgeKind, Node};
pub use registry::{Registry, Token};

pub(crate) use node::{Edge, Target};
pub(crate) use observer::Observer;
pub(crate) use reader::Reader;
pub(crate) use scheduler::Scheduler;
