//! Combinators
//!
//! Every derived cell is built by one of the operations here. Each one
//! creates a result cell, attaches a reader to its source, and hands the
//! reader's disposable to the result cell, so the upstream subscription
//! lives exactly as long as the result.
//!
//! - `map` recomputes a value.
//! - `flat_map` selects another cell and forwards it, rewiring whenever the
//!   selection changes. This is the only way the graph changes shape.
//! - `reduce` folds the stream of source values into an accumulator.
//! - `zip` and `zip3` combine several cells, built from `flat_map` and `map`.
//!
//! Variants without a suffix compare results by `==`; the `_with` variants
//! take an explicit [`Equality`]. Use [`Equality::never`] for payloads that
//! have no meaningful equality.

use std::rc::Rc;

use super::cell::{CellInner, Incr};
use super::equality::Equality;
use crate::graph::{Target, Token};

impl<A: Clone + 'static> Incr<A> {
    /// Derive a cell by applying `transform` to every value of this one.
    pub fn map<B, F>(&self, transform: F) -> Incr<B>
    where
        B: Clone + PartialEq + 'static,
        F: FnMut(&A) -> B + 'static,
    {
        self.map_with(Equality::natural(), transform)
    }

    /// [`Incr::map`] with a custom equality on the result.
    pub fn map_with<B, F>(&self, eq: Equality<B>, mut transform: F) -> Incr<B>
    where
        B: Clone + 'static,
        F: FnMut(&A) -> B + 'static,
    {
        let initial = transform(&self.read());
        let result = CellInner::new(self.runtime().clone(), initial, eq);

        let weak = Rc::downgrade(&result);
        let target = Target::cell(&result);
        let subscription = self.inner.subscribe_settled(target.clone(), move |value| {
            if let Some(result) = weak.upgrade() {
                result.write(transform(value));
            }
            target.clone()
        });
        result.retain(subscription);
        Incr::from_inner(result)
    }

    /// An identity view of this cell that suppresses writes with `eq`.
    pub fn with_equality(&self, eq: Equality<A>) -> Incr<A> {
        self.map_with(eq, A::clone)
    }

    /// Derive a cell that forwards whichever cell `select` picks for the
    /// current value of this one.
    ///
    /// # Panics
    ///
    /// Panics if `select` returns a cell from a different runtime.
    pub fn flat_map<B, F>(&self, select: F) -> Incr<B>
    where
        B: Clone + PartialEq + 'static,
        F: FnMut(&A) -> Incr<B> + 'static,
    {
        self.flat_map_with(Equality::natural(), select)
    }

    /// [`Incr::flat_map`] with a custom equality on the result.
    pub fn flat_map_with<B, F>(&self, eq: Equality<B>, mut select: F) -> Incr<B>
    where
        B: Clone + 'static,
        F: FnMut(&A) -> Incr<B> + 'static,
    {
        let runtime = self.runtime().clone();
        let first = select(&self.read());
        runtime.assert_same(first.runtime());
        let result = CellInner::new(runtime.clone(), first.read(), eq);

        let weak = Rc::downgrade(&result);
        let mut first = Some(first);
        let mut current: Option<Token> = None;
        let (_, outer) = self.inner.subscribe(move |value| {
            let Some(result) = weak.upgrade() else {
                return Target::from_weak(&weak);
            };
            // Revoke before selecting so the old inner graph can be freed.
            if let Some(token) = current.take() {
                result.release(token);
            }
            let inner = match first.take() {
                Some(inner) => inner,
                None => select(value),
            };
            runtime.assert_same(inner.runtime());

            let forward = Rc::downgrade(&result);
            let target = Target::from_weak(&forward);
            let (reader, subscription) = inner.inner.subscribe(move |value| {
                if let Some(result) = forward.upgrade() {
                    result.write(value.clone());
                }
                target.clone()
            });
            current = Some(result.retain(subscription));
            Target::Reader(reader)
        });
        result.retain(outer);
        Incr::from_inner(result)
    }

    /// Fold every value of this cell into an accumulator, starting from
    /// `initial`.
    ///
    /// Values are folded in the order they settle, one per batch in which
    /// this cell changed. The current value is folded in immediately.
    pub fn reduce<B, F>(&self, initial: B, combine: F) -> Incr<B>
    where
        B: Clone + PartialEq + 'static,
        F: FnMut(&B, &A) -> B + 'static,
    {
        self.reduce_with(initial, Equality::natural(), combine)
    }

    /// [`Incr::reduce`] with a custom equality on the accumulator.
    pub fn reduce_with<B, F>(&self, initial: B, eq: Equality<B>, mut combine: F) -> Incr<B>
    where
        B: Clone + 'static,
        F: FnMut(&B, &A) -> B + 'static,
    {
        let mut accumulator = initial;
        self.map_with(eq, move |value| {
            accumulator = combine(&accumulator, value);
            accumulator.clone()
        })
    }

    /// Combine the latest values of this cell and `other`.
    ///
    /// # Panics
    ///
    /// Panics if `other` belongs to a different runtime.
    pub fn zip<B, C, F>(&self, other: &Incr<B>, combine: F) -> Incr<C>
    where
        B: Clone + 'static,
        C: Clone + PartialEq + 'static,
        F: Fn(&A, &B) -> C + 'static,
    {
        self.zip_with(other, Equality::natural(), combine)
    }

    /// [`Incr::zip`] with a custom equality on the result.
    pub fn zip_with<B, C, F>(&self, other: &Incr<B>, eq: Equality<C>, combine: F) -> Incr<C>
    where
        B: Clone + 'static,
        C: Clone + 'static,
        F: Fn(&A, &B) -> C + 'static,
    {
        self.runtime().assert_same(other.runtime());
        let other = other.clone();
        let combine = Rc::new(combine);
        let inner_eq = eq.clone();
        self.flat_map_with(eq, move |a| {
            let a = a.clone();
            let combine = Rc::clone(&combine);
            other.map_with(inner_eq.clone(), move |b| combine(&a, b))
        })
    }

    /// Pair up the latest values of this cell and `other`, compared with
    /// both cells' own equalities.
    pub fn zip_pair<B>(&self, other: &Incr<B>) -> Incr<(A, B)>
    where
        B: Clone + 'static,
    {
        let eq = Equality::pair(self.equality(), other.equality());
        self.zip_with(other, eq, |a, b| (a.clone(), b.clone()))
    }

    /// Combine the latest values of three cells.
    ///
    /// # Panics
    ///
    /// Panics if the cells do not all belong to the same runtime.
    pub fn zip3<B, C, D, F>(&self, second: &Incr<B>, third: &Incr<C>, combine: F) -> Incr<D>
    where
        B: Clone + 'static,
        C: Clone + 'static,
        D: Clone + PartialEq + 'static,
        F: Fn(&A, &B, &C) -> D + 'static,
    {
        self.zip3_with(second, third, Equality::natural(), combine)
    }

    /// [`Incr::zip3`] with a custom equality on the result.
    pub fn zip3_with<B, C, D, F>(
        &self,
        second: &Incr<B>,
        third: &Incr<C>,
        eq: Equality<D>,
        combine: F,
    ) -> Incr<D>
    where
        B: Clone + 'static,
        C: Clone + 'static,
        D: Clone + 'static,
        F: Fn(&A, &B, &C) -> D + 'static,
    {
        self.runtime().assert_same(second.runtime());
        self.runtime().assert_same(third.runtime());
        let second = second.clone();
        let third = third.clone();
        let combine = Rc::new(combine);
        let outer_eq = eq.clone();
        self.flat_map_with(outer_eq, move |a| {
            let a = a.clone();
            let third = third.clone();
            let combine = Rc::clone(&combine);
            let eq = eq.clone();
            second.flat_map_with(eq.clone(), move |b| {
                let a = a.clone();
                let b = b.clone();
                let combine = Rc::clone(&combine);
                third.map_with(eq.clone(), move |c| combine(&a, &b, c))
            })
        })
    }

    /// Group the latest values of three cells, compared with each cell's
    /// own equality.
    pub fn zip_triple<B, C>(&self, second: &Incr<B>, third: &Incr<C>) -> Incr<(A, B, C)>
    where
        B: Clone + 'static,
        C: Clone + 'static,
    {
        let eq = Equality::triple(self.equality(), second.equality(), third.equality());
        self.zip3_with(second, third, eq, |a, b, c| (a.clone(), b.clone(), c.clone()))
    }
}
