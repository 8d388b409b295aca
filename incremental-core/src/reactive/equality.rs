//! Equality Predicates
//!
//! Every cell carries a predicate that decides whether a write is a change.
//! A write judged equal to the current value does nothing observable.
//!
//! Predicates must be pure: no side effects, same answer for the same pair.

use std::fmt;
use std::rc::Rc;

/// A change-suppression predicate over `T`.
pub struct Equality<T: ?Sized> {
    test: Rc<dyn Fn(&T, &T) -> bool>,
}

impl<T: ?Sized + 'static> Equality<T> {
    /// Wrap a custom predicate.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        Self {
            test: Rc::new(test),
        }
    }

    /// Treat every write as a change.
    ///
    /// This is the default for payloads without a natural equality.
    pub fn never() -> Self {
        Self::new(|_, _| false)
    }

    /// Treat every write as a non-change.
    pub fn always() -> Self {
        Self::new(|_, _| true)
    }

    /// Compare two values.
    pub fn test(&self, previous: &T, next: &T) -> bool {
        (self.test)(previous, next)
    }
}

impl<T: PartialEq + ?Sized + 'static> Equality<T> {
    /// The payload's own `==`.
    pub fn natural() -> Self {
        Self::new(|a: &T, b: &T| a == b)
    }
}

impl<T: 'static> Equality<Vec<T>> {
    /// Equal when both have the same length and every pair of elements is
    /// equal by `element`.
    pub fn elementwise(element: Equality<T>) -> Self {
        Self::new(move |a: &Vec<T>, b: &Vec<T>| {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| element.test(x, y))
        })
    }
}

impl<A: 'static, B: 'static> Equality<(A, B)> {
    /// Component-wise equality of a pair.
    pub fn pair(first: Equality<A>, second: Equality<B>) -> Self {
        Self::new(move |a: &(A, B), b: &(A, B)| first.test(&a.0, &b.0) && second.test(&a.1, &b.1))
    }
}

impl<A: 'static, B: 'static, C: 'static> Equality<(A, B, C)> {
    /// Component-wise equality of a triple.
    pub fn triple(first: Equality<A>, second: Equality<B>, third: Equality<C>) -> Self {
        Self::new(move |a: &(A, B, C), b: &(A, B, C)| {
            first.test(&a.0, &b.0) && second.test(&a.1, &b.1) && third.test(&a.2, &b.2)
        })
    }
}

impl<T: ?Sized> Clone for Equality<T> {
    fn clone(&self) -> Self {
        Self {
            test: Rc::clone(&self.test),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Equality<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equality").finish_non_exhaustive()
    }
}
