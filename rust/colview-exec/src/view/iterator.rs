//! Iteration over index-keyed element accessors.

use std::{cmp::Ordering, ops::Deref};

/// An element accessor positioned at a logical index.
pub trait IndexedElement {
    fn index(&self) -> usize;

    /// Moves the accessor to the next index. No bounds check.
    fn advance_index(&mut self);
}

/// A cursor over an element accessor.
///
/// Equality and ordering compare the accessor's index only; cursors from
/// different containers compare meaningfully only within one index space.
/// Dereferencing yields the accessor itself, not a materialized value.
#[derive(Clone, Debug)]
pub struct IndexBasedIterator<E> {
    element: E,
}

impl<E: IndexedElement + Clone> IndexBasedIterator<E> {
    pub fn new(element: E) -> IndexBasedIterator<E> {
        IndexBasedIterator { element }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.element.index()
    }

    #[inline]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Advances the cursor, returning it for chaining.
    #[inline]
    pub fn advance(&mut self) -> &mut Self {
        self.element.advance_index();
        self
    }

    /// Advances the cursor, returning its state before the move.
    #[inline]
    pub fn post_advance(&mut self) -> Self {
        let prior = self.clone();
        self.element.advance_index();
        prior
    }
}

impl<E: IndexedElement> Deref for IndexBasedIterator<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.element
    }
}

impl<E: IndexedElement> PartialEq for IndexBasedIterator<E> {
    fn eq(&self, other: &Self) -> bool {
        self.element.index() == other.element.index()
    }
}

impl<E: IndexedElement> Eq for IndexBasedIterator<E> {}

impl<E: IndexedElement> PartialOrd for IndexBasedIterator<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: IndexedElement> Ord for IndexBasedIterator<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.element.index().cmp(&other.element.index())
    }
}

/// Rust iterator walking a cursor from `begin` up to (excluding) `end`.
#[derive(Clone, Debug)]
pub struct Elements<E> {
    current: IndexBasedIterator<E>,
    end: usize,
}

impl<E: IndexedElement + Clone> Elements<E> {
    pub fn new(begin: IndexBasedIterator<E>, end: IndexBasedIterator<E>) -> Elements<E> {
        Elements {
            end: end.index(),
            current: begin,
        }
    }
}

impl<E: IndexedElement + Clone> Iterator for Elements<E> {
    type Item = E;

    #[inline]
    fn next(&mut self) -> Option<E> {
        if self.current.index() >= self.end {
            return None;
        }
        Some(self.current.post_advance().element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.current.index());
        (remaining, Some(remaining))
    }
}

impl<E: IndexedElement + Clone> ExactSizeIterator for Elements<E> {}
