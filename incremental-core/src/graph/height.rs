//! Heights
//!
//! A height places a node in the current dependency topology. The scheduler
//! always fires the pending edge with the greatest height first, so heights
//! must strictly decrease along every live path from a source cell toward
//! its observers.
//!
//! Heights are never cached. A cell's height is one more than the largest
//! height among the readers attached to it, and a reader's height is one
//! more than the height of its current target. Because `flat_map` rewires
//! targets at runtime, the height is recomputed each time an edge is
//! enqueued.

use std::fmt;

/// Position of a node in the dependency topology.
///
/// `Observer` is a sentinel that orders below every level, which is what
/// makes observers fire after every reader of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Height {
    /// The height of every observer.
    Observer,

    /// A regular height.
    Level(u32),
}

impl Height {
    /// The base height of a cell with no readers, before incrementing.
    pub const ZERO: Height = Height::Level(0);

    /// Least upper bound of two heights.
    pub fn join(self, other: Height) -> Height {
        self.max(other)
    }

    /// The height one step above this one.
    pub fn incremented(self) -> Height {
        match self {
            Height::Observer => Height::ZERO,
            Height::Level(level) => Height::Level(level + 1),
        }
    }

    /// Least upper bound of a set of heights, starting from [`Height::ZERO`].
    pub fn lub<I>(heights: I) -> Height
    where
        I: IntoIterator<Item = Height>,
    {
        heights.into_iter().fold(Height::ZERO, Height::join)
    }
}

impl Default for Height {
    fn default() -> Self {
        Height::ZERO
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Height::Observer => f.write_str("observer"),
            Height::Level(level) => write!(f, "{level}"),
        }
    }
}
