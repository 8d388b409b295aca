//! Value Cells
//!
//! A cell holds the current value of a source or derived node, the equality
//! used to suppress no-op writes, and the edges attached to it.
//!
//! # Write Path
//!
//! 1. Writes judged equal to the current value return immediately.
//! 2. Otherwise the value is stored. If the cell was already enqueued in the
//!    current batch, that is all: edges firing later in the batch read the
//!    cell live and will see the new value.
//! 3. Otherwise the cell marks itself enqueued, queues its readers and
//!    observers, and asks the scheduler to drain.
//!
//! # Ownership
//!
//! A cell holds its readers weakly and its observers strongly. A derived
//! cell retains the disposables of the readers that feed it, which in turn
//! hold the upstream cells. Upstream never keeps downstream alive.

use std::cell::{Cell, Ref, RefCell};
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};

use tracing::trace;

use super::disposable::Disposable;
use super::equality::Equality;
use super::runtime::Runtime;
use crate::error::Error;
use crate::graph::{Edge, Height, Node, Observer, Reader, Registry, Target, Token};

/// Shared state of one cell.
pub(crate) struct CellInner<T> {
    value: RefCell<T>,
    eq: Equality<T>,
    constant: bool,
    readers: RefCell<Registry<Weak<Reader>>>,
    observers: RefCell<Registry<Rc<Observer>>>,
    /// Set once this cell has enqueued its edges in the current batch.
    enqueued: Rc<Cell<bool>>,
    /// Subscriptions that feed this cell.
    retained: RefCell<Registry<Disposable>>,
    runtime: Runtime,
}

impl<T: Clone + 'static> CellInner<T> {
    pub(crate) fn new(runtime: Runtime, value: T, eq: Equality<T>) -> Rc<Self> {
        Self::build(runtime, value, eq, false)
    }

    fn constant(runtime: Runtime, value: T) -> Rc<Self> {
        Self::build(runtime, value, Equality::always(), true)
    }

    fn build(runtime: Runtime, value: T, eq: Equality<T>, constant: bool) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(value),
            eq,
            constant,
            readers: RefCell::new(Registry::new()),
            observers: RefCell::new(Registry::new()),
            enqueued: Rc::new(Cell::new(false)),
            retained: RefCell::new(Registry::new()),
            runtime,
        })
    }

    pub(crate) fn read(&self) -> T {
        self.value.borrow().clone()
    }

    pub(crate) fn write(&self, value: T) {
        if self.constant {
            panic!("{}", Error::ConstantWrite);
        }
        if self.eq.test(&self.value.borrow(), &value) {
            return;
        }
        let previous = self.value.replace(value);
        drop(previous);

        if self.enqueued.replace(true) {
            return;
        }
        let scheduler = self.runtime.scheduler();
        scheduler.enqueue(self.edges());
        scheduler.touched(Rc::clone(&self.enqueued));
        scheduler.run_if_idle();
    }

    /// Attach a reader that evaluates `recompute` against this cell right away.
    pub(crate) fn subscribe<F>(self: &Rc<Self>, mut recompute: F) -> (Rc<Reader>, Disposable)
    where
        F: FnMut(&T) -> Target + 'static,
    {
        let source = Rc::clone(self);
        let reader = Reader::new(move || recompute(&source.read()));
        let disposable = self.attach(&reader);
        (reader, disposable)
    }

    /// Attach a reader whose first evaluation the caller already performed.
    pub(crate) fn subscribe_settled<F>(self: &Rc<Self>, target: Target, mut recompute: F) -> Disposable
    where
        F: FnMut(&T) -> Target + 'static,
    {
        let source = Rc::clone(self);
        let reader = Reader::settled(target, move || recompute(&source.read()));
        self.attach(&reader)
    }

    fn attach(self: &Rc<Self>, reader: &Rc<Reader>) -> Disposable {
        // Constants never fire again, so there is nothing to register.
        if self.constant {
            return Disposable::empty();
        }
        let token = self.readers.borrow_mut().add(Rc::downgrade(reader));
        let source = Rc::clone(self);
        let reader = Rc::clone(reader);
        Disposable::new(move || {
            reader.invalidate();
            let removed = source.readers.borrow_mut().remove(token);
            drop(removed);
            trace!(edge = reader.id().raw(), "reader disposed");
        })
    }

    pub(crate) fn observe<F>(self: &Rc<Self>, mut callback: F) -> Disposable
    where
        F: FnMut(&T) + 'static,
    {
        let cell = Rc::downgrade(self);
        let observer = Observer::new(move || {
            if let Some(cell) = cell.upgrade() {
                let value = cell.read();
                callback(&value);
            }
        });
        let token = self.observers.borrow_mut().add(Rc::clone(&observer));

        let cell = Rc::clone(self);
        Disposable::new(move || {
            observer.dispose();
            let removed = cell.observers.borrow_mut().remove(token);
            drop(removed);
        })
    }

    /// Keep a subscription alive for as long as this cell lives.
    pub(crate) fn retain(&self, disposable: Disposable) -> Token {
        self.retained.borrow_mut().add(disposable)
    }

    /// Revoke a subscription previously handed to [`CellInner::retain`].
    pub(crate) fn release(&self, token: Token) {
        let removed = self.retained.borrow_mut().remove(token);
        drop(removed);
    }

    fn edges(&self) -> Vec<Edge> {
        let readers = self.readers.borrow().snapshot();
        let observers = self.observers.borrow().snapshot();
        readers
            .iter()
            .filter_map(Weak::upgrade)
            .map(Edge::Reader)
            .chain(observers.into_iter().map(Edge::Observer))
            .collect()
    }
}

impl<T> Node for CellInner<T> {
    fn height(&self) -> Height {
        let readers = self.readers.borrow();
        Height::lub(
            readers
                .values()
                .filter_map(Weak::upgrade)
                .map(|reader| reader.height()),
        )
        .incremented()
    }
}

/// An incremental value: a source or derived cell.
///
/// Handles are cheap to clone and all clones refer to the same cell. Derived
/// cells are built with the combinators (`map`, `flat_map`, `reduce`,
/// `zip`) and cannot be written directly; roots are written through
/// [`Var`](super::Var).
pub struct Incr<T> {
    pub(crate) inner: Rc<CellInner<T>>,
}

impl<T: Clone + 'static> Incr<T> {
    pub(crate) fn from_inner(inner: Rc<CellInner<T>>) -> Self {
        Self { inner }
    }

    /// Create a cell that never changes and never propagates.
    pub fn constant(runtime: &Runtime, value: T) -> Self {
        Self::from_inner(CellInner::constant(runtime.clone(), value))
    }

    /// Get the current value.
    ///
    /// Legal at any time, including from inside a reader or observer, where
    /// it returns the latest (possibly mid-batch) value.
    pub fn read(&self) -> T {
        self.inner.read()
    }

    /// Borrow the current value without cloning it.
    ///
    /// # Panics
    ///
    /// Panics if a write reaches this cell while `f` runs. That includes
    /// setting any [`Var`](super::Var) upstream of it, since the change
    /// propagates before `set` returns. Use [`Incr::read`] when `f` may
    /// trigger propagation.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value: Ref<'_, T> = self.inner.value.borrow();
        f(&value)
    }

    /// Subscribe to settled changes.
    ///
    /// `callback` runs once with the current value before this returns, then
    /// once after every batch in which the value changed. Dropping or
    /// disposing the returned handle stops it.
    pub fn observe<F>(&self, callback: F) -> Disposable
    where
        F: FnMut(&T) + 'static,
    {
        self.inner.observe(callback)
    }

    /// The equality this cell suppresses writes with.
    pub fn equality(&self) -> Equality<T> {
        self.inner.eq.clone()
    }
}

impl<T> Incr<T> {
    /// The runtime this cell propagates on.
    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }

    /// The cell's current height.
    pub fn height(&self) -> Height {
        self.inner.height()
    }

    /// Whether this is a constant cell.
    pub fn is_constant(&self) -> bool {
        self.inner.constant
    }

    /// Number of readers currently attached.
    pub fn reader_count(&self) -> usize {
        self.inner.readers.borrow().len()
    }

    /// Number of observers currently attached.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    /// Whether two handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Incr<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Incr<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Debug> Debug for Incr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Incr")
            .field("value", &*self.inner.value.borrow())
            .field("constant", &self.inner.constant)
            .field("reader_count", &self.reader_count())
            .field("observer_count", &self.observer_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(&T) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        (log, move |value: &T| log_clone.borrow_mut().push(value.clone()))
    }

    #[test]
    fn write_then_read() {
        let runtime = Runtime::new();
        let cell = CellInner::new(runtime, 1, Equality::natural());

        cell.write(2);
        assert_eq!(cell.read(), 2);
    }

    #[test]
    fn equal_write_is_suppressed() {
        let runtime = Runtime::new();
        let cell = CellInner::new(runtime, 1, Equality::natural());
        let (log, callback) = recorder();

        let _observer = cell.observe(callback);
        cell.write(1);
        cell.write(2);
        cell.write(2);

        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn never_equality_propagates_every_write() {
        let runtime = Runtime::new();
        let cell = CellInner::new(runtime, "same", Equality::never());
        let (log, callback) = recorder();

        let _observer = cell.observe(callback);
        cell.write("same");
        cell.write("same");

        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn observe_delivers_current_value_eagerly() {
        let runtime = Runtime::new();
        let cell = CellInner::new(runtime, 7, Equality::natural());
        let (log, callback) = recorder();

        let _observer = cell.observe(callback);

        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn dropped_observer_handle_stops_delivery() {
        let runtime = Runtime::new();
        let cell = CellInner::new(runtime, 0, Equality::natural());
        let (log, callback) = recorder();

        drop(cell.observe(callback));
        cell.write(1);

        assert_eq!(*log.borrow(), vec![0]);
        assert_eq!(cell.observers.borrow().len(), 0);
    }

    #[test]
    fn subscribe_registers_and_dispose_revokes() {
        let runtime = Runtime::new();
        let source = CellInner::new(runtime.clone(), 1, Equality::natural());
        let sink = CellInner::new(runtime, 0, Equality::natural());

        let sink_weak = Rc::downgrade(&sink);
        let target = Target::cell(&sink);
        let (reader, disposable) = source.subscribe(move |value: &i32| {
            if let Some(sink) = sink_weak.upgrade() {
                sink.write(value * 10);
            }
            target.clone()
        });

        assert_eq!(sink.read(), 10);
        assert_eq!(source.readers.borrow().len(), 1);

        source.write(2);
        assert_eq!(sink.read(), 20);

        disposable.dispose();
        assert!(reader.is_invalidated());
        assert_eq!(source.readers.borrow().len(), 0);

        source.write(3);
        assert_eq!(sink.read(), 20);
    }

    #[test]
    fn cell_height_is_above_its_readers() {
        let runtime = Runtime::new();
        let source = CellInner::new(runtime.clone(), 0, Equality::natural());
        let sink = CellInner::new(runtime, 0, Equality::natural());
        assert_eq!(sink.height(), Height::Level(1));

        let target = Target::cell(&sink);
        let _disposable = source.subscribe_settled(target.clone(), move |_| target.clone());

        // sink: 1, reader: 2, source: 3
        assert_eq!(source.height(), Height::Level(3));
    }

    #[test]
    fn constant_does_not_register_readers() {
        let runtime = Runtime::new();
        let constant = CellInner::constant(runtime.clone(), 5);
        let sink = CellInner::new(runtime, 0, Equality::natural());

        let target = Target::cell(&sink);
        let disposable = constant.subscribe_settled(target.clone(), move |_| target.clone());

        assert!(disposable.is_disposed());
        assert_eq!(constant.readers.borrow().len(), 0);
    }

    #[test]
    #[should_panic(expected = "constant cell")]
    fn writing_a_constant_fails_fast() {
        let runtime = Runtime::new();
        let constant = CellInner::constant(runtime, 5);
        constant.write(6);
    }

    #[test]
    fn write_from_observer_is_folded_into_the_batch() {
        let runtime = Runtime::new();
        let first = CellInner::new(runtime.clone(), 0, Equality::natural());
        let second = CellInner::new(runtime.clone(), 0, Equality::natural());
        let (log, callback) = recorder();
        let _second_observer = second.observe(callback);

        let second_clone = second.clone();
        let runtime_clone = runtime.clone();
        let _forward = first.observe(move |value: &i32| {
            second_clone.write(*value);
            // The forwarded change has not been delivered yet.
            if runtime_clone.is_propagating() {
                assert_eq!(second_clone.read(), *value);
            }
        });

        first.write(4);

        assert_eq!(*log.borrow(), vec![0, 4]);
        assert!(!runtime.is_propagating());
    }

    #[test]
    fn second_write_in_a_batch_does_not_requeue() {
        let runtime = Runtime::new();
        let trigger = CellInner::new(runtime.clone(), 0, Equality::natural());
        let target = CellInner::new(runtime.clone(), 0, Equality::natural());
        let (log, callback) = recorder();
        let _target_observer = target.observe(callback);

        let depths = Rc::new(RefCell::new(Vec::new()));
        let depths_clone = depths.clone();
        let target_clone = target.clone();
        let runtime_clone = runtime.clone();
        let _writer = trigger.observe(move |value: &i32| {
            if *value == 0 {
                return;
            }
            target_clone.write(value * 10);
            depths_clone.borrow_mut().push(runtime_clone.scheduler().pending_len());
            target_clone.write(value * 100);
            depths_clone.borrow_mut().push(runtime_clone.scheduler().pending_len());
        });

        trigger.write(1);

        // The second write only stores the value.
        let recorded = depths.borrow();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0], recorded[1]);
        assert_eq!(*log.borrow(), vec![0, 100]);
        assert!(!target.enqueued.get());
    }

    #[test]
    #[should_panic(expected = "already borrowed")]
    fn with_panics_when_propagation_reaches_the_cell() {
        let runtime = Runtime::new();
        let root = crate::reactive::Var::new(&runtime, 1);
        let doubled = root.incr().map(|x| x * 2);

        doubled.with(|_| root.set(2));
    }
}
