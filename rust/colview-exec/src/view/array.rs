use std::fmt;

use crate::reader::VectorReader;

use super::{
    accessor::{NullFreeAccessor, OptionalAccessor},
    iterator::{Elements, IndexBasedIterator},
};

/// The elements of one array row: a window `offset..offset + len` into the
/// element reader.
pub struct ArrayView<'r, R: VectorReader> {
    reader: &'r R,
    offset: usize,
    len: usize,
}

impl<'r, R: VectorReader> ArrayView<'r, R> {
    #[inline]
    pub fn new(reader: &'r R, offset: usize, len: usize) -> ArrayView<'r, R> {
        ArrayView {
            reader,
            offset,
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position of the first element in the element reader.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the element at `index`, `0 <= index < len()`.
    #[inline]
    pub fn at(&self, index: usize) -> OptionalAccessor<'r, R> {
        debug_assert!(index < self.len, "index {index} out of bounds ({})", self.len);
        OptionalAccessor::new(self.reader, self.offset + index)
    }

    /// Returns `true` if some element of the element column may be null.
    #[inline]
    pub fn may_have_nulls(&self) -> bool {
        self.reader.may_have_nulls()
    }

    pub fn begin(&self) -> IndexBasedIterator<OptionalAccessor<'r, R>> {
        IndexBasedIterator::new(OptionalAccessor::new(self.reader, self.offset))
    }

    pub fn end(&self) -> IndexBasedIterator<OptionalAccessor<'r, R>> {
        IndexBasedIterator::new(OptionalAccessor::new(self.reader, self.offset + self.len))
    }

    pub fn iter(&self) -> Elements<OptionalAccessor<'r, R>> {
        Elements::new(self.begin(), self.end())
    }
}

impl<R: VectorReader> Clone for ArrayView<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: VectorReader> Copy for ArrayView<'_, R> {}

impl<R: VectorReader> fmt::Debug for ArrayView<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayView")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish()
    }
}

impl<'r, R: VectorReader> IntoIterator for ArrayView<'r, R> {
    type Item = OptionalAccessor<'r, R>;
    type IntoIter = Elements<OptionalAccessor<'r, R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'r, R: VectorReader> IntoIterator for &ArrayView<'r, R> {
    type Item = OptionalAccessor<'r, R>;
    type IntoIter = Elements<OptionalAccessor<'r, R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Element-wise equality, including element nullness.
impl<'r, 's, R, S> PartialEq<ArrayView<'s, S>> for ArrayView<'r, R>
where
    R: VectorReader,
    S: VectorReader,
    R::Item<'r>: PartialEq<S::Item<'s>>,
{
    fn eq(&self, other: &ArrayView<'s, S>) -> bool {
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

/// The elements of one array row on the null-free path: elements are read
/// with [`VectorReader::read_null_free`].
pub struct NullFreeArrayView<'r, R: VectorReader> {
    reader: &'r R,
    offset: usize,
    len: usize,
}

impl<'r, R: VectorReader> NullFreeArrayView<'r, R> {
    #[inline]
    pub fn new(reader: &'r R, offset: usize, len: usize) -> NullFreeArrayView<'r, R> {
        NullFreeArrayView {
            reader,
            offset,
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn at(&self, index: usize) -> R::NullFreeItem<'r> {
        debug_assert!(index < self.len, "index {index} out of bounds ({})", self.len);
        self.reader.read_null_free(self.offset + index)
    }

    pub fn begin(&self) -> IndexBasedIterator<NullFreeAccessor<'r, R>> {
        IndexBasedIterator::new(NullFreeAccessor::new(self.reader, self.offset))
    }

    pub fn end(&self) -> IndexBasedIterator<NullFreeAccessor<'r, R>> {
        IndexBasedIterator::new(NullFreeAccessor::new(self.reader, self.offset + self.len))
    }

    pub fn iter(&self) -> NullFreeElements<'r, R> {
        NullFreeElements {
            elements: Elements::new(self.begin(), self.end()),
        }
    }
}

impl<R: VectorReader> Clone for NullFreeArrayView<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: VectorReader> Copy for NullFreeArrayView<'_, R> {}

impl<'r, R: VectorReader> IntoIterator for NullFreeArrayView<'r, R> {
    type Item = R::NullFreeItem<'r>;
    type IntoIter = NullFreeElements<'r, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the values of a [`NullFreeArrayView`].
pub struct NullFreeElements<'r, R: VectorReader> {
    elements: Elements<NullFreeAccessor<'r, R>>,
}

impl<'r, R: VectorReader> Iterator for NullFreeElements<'r, R> {
    type Item = R::NullFreeItem<'r>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.elements.next().map(|element| element.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.elements.size_hint()
    }
}

impl<R: VectorReader> ExactSizeIterator for NullFreeElements<'_, R> {}
