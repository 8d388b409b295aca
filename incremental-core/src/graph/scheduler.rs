//! Update Scheduler
//!
//! The scheduler drains one batch of changes to quiescence in a single,
//! topologically ordered pass.
//!
//! # Algorithm
//!
//! 1. A cell whose value changed enqueues its readers and observers, each
//!    paired with the height it has *at enqueue time*.
//! 2. The drain repeatedly pops the pending edge with the greatest height.
//!    Edges already fired in this batch are skipped, so every edge fires at
//!    most once per batch.
//! 3. A fired reader writes its target, which may enqueue more edges. Those
//!    always sit lower than the reader that produced them, and observers sit
//!    below every reader, so nothing is observed before all of its inputs
//!    for this batch have settled.
//! 4. When nothing is pending, the fired set and every per-cell "already
//!    enqueued" flag recorded during the batch are reset.
//!
//! Ties among equal heights fire in enqueue order.
//!
//! # Re-entrancy
//!
//! Writes made while a drain is running (from a reader or from an observer
//! callback) only enqueue. [`Scheduler::run_if_idle`] returns immediately
//! when a drain is in progress, so the new work is folded into the outer
//! drain instead of recursing.

use std::cell::{Cell, RefCell};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::height::Height;
use super::node::{Edge, EdgeId, Node};

/// An edge waiting to fire, with the height it had when enqueued.
struct Pending {
    height: Height,
    seq: u64,
    edge: Edge,
}

impl Pending {
    fn key(&self) -> (Height, Reverse<u64>) {
        (self.height, Reverse(self.seq))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// The worklist that orders recomputation.
///
/// Single-threaded: one scheduler per [`Runtime`](crate::reactive::Runtime),
/// shared by every cell created from it.
#[derive(Default)]
pub(crate) struct Scheduler {
    pending: RefCell<BinaryHeap<Pending>>,
    fired: RefCell<HashSet<EdgeId>>,
    touched: RefCell<SmallVec<[Rc<Cell<bool>>; 8]>>,
    processing: Cell<bool>,
    seq: Cell<u64>,
}

impl Scheduler {
    /// Create an idle scheduler.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue edges, reading each one's height now.
    pub(crate) fn enqueue<I>(&self, edges: I)
    where
        I: IntoIterator<Item = Edge>,
    {
        // Heights walk the graph; compute them before borrowing the queue.
        let batch: Vec<Pending> = edges
            .into_iter()
            .map(|edge| {
                let seq = self.seq.get();
                self.seq.set(seq + 1);
                Pending {
                    height: edge.height(),
                    seq,
                    edge,
                }
            })
            .collect();
        self.pending.borrow_mut().extend(batch);
    }

    /// Remember a cell's "already enqueued this batch" flag so it can be
    /// cleared when the batch settles.
    pub(crate) fn touched(&self, flag: Rc<Cell<bool>>) {
        self.touched.borrow_mut().push(flag);
    }

    /// Drain the queue, unless a drain is already running.
    pub(crate) fn run_if_idle(&self) {
        if self.processing.replace(true) {
            return;
        }
        let batch = Batch { scheduler: self };

        let mut fired = 0usize;
        loop {
            let next = self.pending.borrow_mut().pop();
            let Some(pending) = next else {
                break;
            };
            if !self.fired.borrow_mut().insert(pending.edge.id()) {
                continue;
            }
            trace!(
                edge = pending.edge.id().raw(),
                kind = ?pending.edge.kind(),
                height = %pending.height,
                "firing edge"
            );
            pending.edge.fire();
            fired += 1;
        }

        debug!(
            fired,
            cells = self.touched.borrow().len(),
            "batch settled"
        );
        drop(batch);
    }

    /// Whether a drain is currently running.
    pub(crate) fn is_processing(&self) -> bool {
        self.processing.get()
    }

    /// Number of edges waiting to fire.
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }
}

/// Resets the per-batch state when a drain ends.
///
/// Also runs when a user transform or callback panics mid-drain, so the
/// scheduler is not left stuck in the "processing" state.
struct Batch<'a> {
    scheduler: &'a Scheduler,
}

impl Drop for Batch<'_> {
    fn drop(&mut self) {
        let scheduler = self.scheduler;
        let touched = std::mem::take(&mut *scheduler.touched.borrow_mut());
        for flag in touched {
            flag.set(false);
        }
        let abandoned = std::mem::take(&mut *scheduler.pending.borrow_mut());
        drop(abandoned);
        scheduler.fired.borrow_mut().clear();
        scheduler.processing.set(false);
    }
}
