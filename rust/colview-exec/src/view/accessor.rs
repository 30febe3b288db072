//! Lazy accessors to a single position of a reader.
//!
//! An accessor is a reader reference plus an index; nothing is read until the
//! value is requested.

use std::fmt;

use crate::reader::VectorReader;

use super::iterator::IndexedElement;

/// A possibly-null value at one position of a reader.
///
/// Converts explicitly to `Option` via [`to_option`](Self::to_option); there
/// are no implicit conversions. Compares equal to another accessor or to an
/// `Option` when both are absent or both hold equal values. Comparisons with
/// `Option<U>` accept only value types that convert losslessly into the
/// reader's item type.
pub struct OptionalAccessor<'r, R: VectorReader> {
    reader: &'r R,
    index: usize,
}

impl<'r, R: VectorReader> OptionalAccessor<'r, R> {
    #[inline]
    pub fn new(reader: &'r R, index: usize) -> OptionalAccessor<'r, R> {
        OptionalAccessor { reader, index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn has_value(&self) -> bool {
        self.reader.is_set(self.index)
    }

    /// Returns the value.
    ///
    /// # Panics
    ///
    /// Panics if the position is null.
    #[inline]
    pub fn value(&self) -> R::Item<'r> {
        assert!(
            self.has_value(),
            "value() called on a null element at index {}",
            self.index
        );
        self.reader.get(self.index)
    }

    #[inline]
    pub fn to_option(&self) -> Option<R::Item<'r>> {
        self.reader.read(self.index)
    }
}

impl<R: VectorReader> Clone for OptionalAccessor<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: VectorReader> Copy for OptionalAccessor<'_, R> {}

impl<R: VectorReader> fmt::Debug for OptionalAccessor<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalAccessor")
            .field("index", &self.index)
            .field("has_value", &self.has_value())
            .finish()
    }
}

impl<R: VectorReader> IndexedElement for OptionalAccessor<'_, R> {
    #[inline]
    fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn advance_index(&mut self) {
        self.index += 1;
    }
}

impl<'r, 's, R, S> PartialEq<OptionalAccessor<'s, S>> for OptionalAccessor<'r, R>
where
    R: VectorReader,
    S: VectorReader,
    R::Item<'r>: PartialEq<S::Item<'s>>,
{
    fn eq(&self, other: &OptionalAccessor<'s, S>) -> bool {
        match (self.has_value(), other.has_value()) {
            (true, true) => self.value() == other.value(),
            (false, false) => true,
            _ => false,
        }
    }
}

/// A value at a position that is never null, such as a map key.
pub struct KeyAccessor<'r, R: VectorReader> {
    reader: &'r R,
    index: usize,
}

impl<'r, R: VectorReader> KeyAccessor<'r, R> {
    #[inline]
    pub fn new(reader: &'r R, index: usize) -> KeyAccessor<'r, R> {
        KeyAccessor { reader, index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn value(&self) -> R::Item<'r> {
        self.reader.get(self.index)
    }
}

impl<R: VectorReader> Clone for KeyAccessor<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: VectorReader> Copy for KeyAccessor<'_, R> {}

impl<R: VectorReader> fmt::Debug for KeyAccessor<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyAccessor")
            .field("index", &self.index)
            .finish()
    }
}

impl<R: VectorReader> IndexedElement for KeyAccessor<'_, R> {
    #[inline]
    fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn advance_index(&mut self) {
        self.index += 1;
    }
}

impl<'r, 's, R, S> PartialEq<KeyAccessor<'s, S>> for KeyAccessor<'r, R>
where
    R: VectorReader,
    S: VectorReader,
    R::Item<'r>: PartialEq<S::Item<'s>>,
{
    fn eq(&self, other: &KeyAccessor<'s, S>) -> bool {
        self.value() == other.value()
    }
}

/// Reads a position through [`VectorReader::read_null_free`].
pub struct NullFreeAccessor<'r, R: VectorReader> {
    reader: &'r R,
    index: usize,
}

impl<'r, R: VectorReader> NullFreeAccessor<'r, R> {
    #[inline]
    pub fn new(reader: &'r R, index: usize) -> NullFreeAccessor<'r, R> {
        NullFreeAccessor { reader, index }
    }

    #[inline]
    pub fn value(&self) -> R::NullFreeItem<'r> {
        self.reader.read_null_free(self.index)
    }
}

impl<R: VectorReader> Clone for NullFreeAccessor<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: VectorReader> Copy for NullFreeAccessor<'_, R> {}

impl<R: VectorReader> IndexedElement for NullFreeAccessor<'_, R> {
    #[inline]
    fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn advance_index(&mut self) {
        self.index += 1;
    }
}

macro_rules! impl_value_eq {
    ($T:ty) => {
        impl<'r, R> PartialEq<Option<$T>> for OptionalAccessor<'r, R>
        where
            R: VectorReader,
            R::Item<'r>: From<$T> + PartialEq,
        {
            fn eq(&self, other: &Option<$T>) -> bool {
                match other {
                    Some(value) => {
                        self.has_value() && self.value() == <R::Item<'r> as From<$T>>::from(*value)
                    }
                    None => !self.has_value(),
                }
            }
        }

        impl<'r, R> PartialEq<OptionalAccessor<'r, R>> for Option<$T>
        where
            R: VectorReader,
            R::Item<'r>: From<$T> + PartialEq,
        {
            fn eq(&self, other: &OptionalAccessor<'r, R>) -> bool {
                other == self
            }
        }

        impl<'r, R> PartialEq<$T> for KeyAccessor<'r, R>
        where
            R: VectorReader,
            R::Item<'r>: From<$T> + PartialEq,
        {
            fn eq(&self, other: &$T) -> bool {
                self.value() == <R::Item<'r> as From<$T>>::from(*other)
            }
        }

        impl<'r, R> PartialEq<KeyAccessor<'r, R>> for $T
        where
            R: VectorReader,
            R::Item<'r>: From<$T> + PartialEq,
        {
            fn eq(&self, other: &KeyAccessor<'r, R>) -> bool {
                other == self
            }
        }
    };
}

impl_value_eq!(bool);
impl_value_eq!(i8);
impl_value_eq!(i16);
impl_value_eq!(i32);
impl_value_eq!(i64);
impl_value_eq!(u8);
impl_value_eq!(u16);
impl_value_eq!(u32);
impl_value_eq!(u64);
impl_value_eq!(f32);
impl_value_eq!(f64);

impl<'r, 'x, R> PartialEq<Option<&'x str>> for OptionalAccessor<'r, R>
where
    R: VectorReader,
    R::Item<'r>: PartialEq<&'x str>,
{
    fn eq(&self, other: &Option<&'x str>) -> bool {
        match other {
            Some(value) => self.has_value() && self.value() == *value,
            None => !self.has_value(),
        }
    }
}

impl<'r, 'x, R> PartialEq<OptionalAccessor<'r, R>> for Option<&'x str>
where
    R: VectorReader,
    R::Item<'r>: PartialEq<&'x str>,
{
    fn eq(&self, other: &OptionalAccessor<'r, R>) -> bool {
        other == self
    }
}

impl<'r, 'x, R> PartialEq<&'x str> for KeyAccessor<'r, R>
where
    R: VectorReader,
    R::Item<'r>: PartialEq<&'x str>,
{
    fn eq(&self, other: &&'x str) -> bool {
        self.value() == *other
    }
}

impl<'r, 'x, R> PartialEq<KeyAccessor<'r, R>> for &'x str
where
    R: VectorReader,
    R::Item<'r>: PartialEq<&'x str>,
{
    fn eq(&self, other: &KeyAccessor<'r, R>) -> bool {
        other == self
    }
}
