//! Graph Nodes
//!
//! This module defines what the scheduler sees of the graph: nodes that have
//! a height, and edges that can additionally be fired.
//!
//! The set of edge kinds is closed. A [`Reader`] recomputes something from a
//! cell's value, an [`Observer`] delivers a settled value to user code.
//! Cells themselves are nodes but not edges; they appear here only as the
//! possible target of a reader.

use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use super::height::Height;
use super::observer::Observer;
use super::reader::Reader;

/// Unique identifier for an edge.
///
/// The scheduler deduplicates firings by this id. Pointer identity is not
/// enough: an edge dropped mid-batch may have its allocation reused by a new
/// edge enqueued later in the same batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Generate a new unique edge ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

/// The kind of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// An internal edge that recomputes a target from a source cell.
    Reader,

    /// A terminal edge that calls back into user code.
    Observer,
}

/// Anything with a position in the dependency topology.
pub trait Node {
    /// The node's current height.
    fn height(&self) -> Height;
}

/// What a reader's last evaluation wrote into or redirected to.
#[derive(Clone)]
pub(crate) enum Target {
    /// A cell. Held weakly: the cell owns the subscription that owns the
    /// reader, so a strong link back would be a cycle.
    Cell(Weak<dyn Node>),

    /// Another reader, as produced by `flat_map` rewiring.
    Reader(Rc<Reader>),
}

impl Target {
    /// Build a cell target.
    pub(crate) fn cell<N: Node + 'static>(node: &Rc<N>) -> Self {
        Self::from_weak(&Rc::downgrade(node))
    }

    /// Build a cell target from a weak handle.
    pub(crate) fn from_weak<N: Node + 'static>(node: &Weak<N>) -> Self {
        let weak: Weak<dyn Node> = node.clone();
        Target::Cell(weak)
    }
}

impl Node for Target {
    fn height(&self) -> Height {
        match self {
            Target::Cell(cell) => cell.upgrade().map_or(Height::ZERO, |cell| cell.height()),
            Target::Reader(reader) => reader.height(),
        }
    }
}

/// A fireable edge, as queued by the scheduler.
#[derive(Clone)]
pub(crate) enum Edge {
    Reader(Rc<Reader>),
    Observer(Rc<Observer>),
}

impl Edge {
    pub(crate) fn id(&self) -> EdgeId {
        match self {
            Edge::Reader(reader) => reader.id(),
            Edge::Observer(observer) => observer.id(),
        }
    }

    pub(crate) fn kind(&self) -> EdgeKind {
        match self {
            Edge::Reader(_) => EdgeKind::Reader,
            Edge::Observer(_) => EdgeKind::Observer,
        }
    }

    pub(crate) fn fire(&self) {
        match self {
            Edge::Reader(reader) => reader.fire(),
            Edge::Observer(observer) => observer.fire(),
        }
    }
}

impl Node for Edge {
    fn height(&self) -> Height {
        match self {
            Edge::Reader(reader) => reader.height(),
            Edge::Observer(observer) => observer.height(),
        }
    }
}
