//! Readers: per-shape navigation of decoded argument columns.
//!
//! One reader is created per argument and decode pass. Nested readers decode
//! their child columns once, at construction, and own the child readers;
//! per-row access is index arithmetic plus a null check.
//!
//! # Null propagation
//!
//! Nested readers answer "does this row contain a null anywhere below it?"
//! in two phases:
//!
//! 1. [`VectorReader::set_children_may_have_nulls`] walks the reader tree once
//!    and memoizes, at each nested reader, whether its children can produce a
//!    null at all.
//! 2. [`VectorReader::contains_null`], [`VectorReader::contains_null_range`]
//!    and [`VectorReader::may_have_nulls_recursive`] consult the memo.
//!
//! Querying phase 2 on a nested reader before phase 1 panics. A caller that
//! finds `may_have_nulls_recursive() == false` for every argument can use
//! [`VectorReader::read_null_free`] for the whole batch.

use colview_common::Result;

pub mod array;
pub mod generic;
pub mod map;
pub mod row;
pub mod scalar;
pub mod variadic;

pub(crate) const NULL_MEMO_UNSET: &str =
    "set_children_may_have_nulls() must be called before querying nested nulls";

/// Row-indexed read access to a decoded column.
///
/// `offset` is a logical row of the reader's decoded column. For a child
/// reader this is a position inside the parent's element windows.
pub trait VectorReader {
    /// The value at a non-null row: a raw value for scalars, a view for nested
    /// shapes.
    type Item<'r>
    where
        Self: 'r;

    /// The value at a row known to contain no nulls at any depth.
    type NullFreeItem<'r>
    where
        Self: 'r;

    /// Number of logical rows.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the row at `offset` is not null.
    fn is_set(&self, offset: usize) -> bool;

    /// Returns the value at `offset`.
    ///
    /// The row must be set; the result for a null row is unspecified.
    fn get(&self, offset: usize) -> Self::Item<'_>;

    /// Returns the value at `offset`, or `None` if the row is null.
    #[inline]
    fn read(&self, offset: usize) -> Option<Self::Item<'_>> {
        if self.is_set(offset) {
            Some(self.get(offset))
        } else {
            None
        }
    }

    /// Returns the value at `offset` without any null checks.
    fn read_null_free(&self, offset: usize) -> Self::NullFreeItem<'_>;

    /// Returns `true` if any row of this column may be null (not looking at
    /// children).
    fn may_have_nulls(&self) -> bool;

    /// Phase 1 of null propagation: memoizes child nullability bottom-up.
    ///
    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Unsupported`](colview_common::ErrorKind::Unsupported)
    /// if the reader tree contains a generic reader.
    fn set_children_may_have_nulls(&mut self) -> Result<()>;

    /// Returns `true` if the row at `index` is null or contains a null at any
    /// depth.
    fn contains_null(&self, index: usize) -> bool;

    /// Returns `true` if any row in `start..end` contains a null.
    fn contains_null_range(&self, start: usize, end: usize) -> bool {
        (start..end).any(|index| self.contains_null(index))
    }

    /// Returns `true` if some row of this column, or of any descendant, may be
    /// null.
    fn may_have_nulls_recursive(&self) -> bool;
}
