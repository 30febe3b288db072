use std::fmt;

use crate::reader::VectorReader;

use super::accessor::OptionalAccessor;

/// The trailing arguments of a call at one row.
///
/// Element `i` is the value of argument `start + i` at the row.
pub struct VariadicView<'r, R: VectorReader> {
    readers: &'r [R],
    row: usize,
}

impl<'r, R: VectorReader> VariadicView<'r, R> {
    #[inline]
    pub fn new(readers: &'r [R], row: usize) -> VariadicView<'r, R> {
        VariadicView { readers, row }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn at(&self, index: usize) -> OptionalAccessor<'r, R> {
        OptionalAccessor::new(&self.readers[index], self.row)
    }

    pub fn iter(&self) -> VariadicElements<'r, R> {
        VariadicElements {
            readers: self.readers.iter(),
            row: self.row,
        }
    }
}

impl<R: VectorReader> Clone for VariadicView<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: VectorReader> Copy for VariadicView<'_, R> {}

impl<R: VectorReader> fmt::Debug for VariadicView<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariadicView")
            .field("row", &self.row)
            .field("len", &self.readers.len())
            .finish()
    }
}

impl<'r, R: VectorReader> IntoIterator for VariadicView<'r, R> {
    type Item = OptionalAccessor<'r, R>;
    type IntoIter = VariadicElements<'r, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of a [`VariadicView`].
pub struct VariadicElements<'r, R: VectorReader> {
    readers: std::slice::Iter<'r, R>,
    row: usize,
}

impl<'r, R: VectorReader> Iterator for VariadicElements<'r, R> {
    type Item = OptionalAccessor<'r, R>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let row = self.row;
        self.readers
            .next()
            .map(|reader| OptionalAccessor::new(reader, row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.readers.size_hint()
    }
}

impl<R: VectorReader> ExactSizeIterator for VariadicElements<'_, R> {}

/// The trailing arguments of a call at one row, read without null checks.
pub struct NullFreeVariadicView<'r, R: VectorReader> {
    readers: &'r [R],
    row: usize,
}

impl<'r, R: VectorReader> NullFreeVariadicView<'r, R> {
    #[inline]
    pub fn new(readers: &'r [R], row: usize) -> NullFreeVariadicView<'r, R> {
        NullFreeVariadicView { readers, row }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    #[inline]
    pub fn at(&self, index: usize) -> R::NullFreeItem<'r> {
        self.readers[index].read_null_free(self.row)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = R::NullFreeItem<'r>> + use<'r, R> {
        let row = self.row;
        self.readers.iter().map(move |reader| reader.read_null_free(row))
    }
}

impl<R: VectorReader> Clone for NullFreeVariadicView<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: VectorReader> Copy for NullFreeVariadicView<'_, R> {}
