use std::fmt;

use crate::reader::VectorReader;

use super::{
    accessor::{KeyAccessor, OptionalAccessor},
    iterator::{Elements, IndexBasedIterator, IndexedElement},
};

/// One key/value entry of a map row.
///
/// `first` and `second` always point at the same child position.
pub struct MapEntry<'r, K: VectorReader, V: VectorReader> {
    pub first: KeyAccessor<'r, K>,
    pub second: OptionalAccessor<'r, V>,
    index: usize,
}

impl<'r, K: VectorReader, V: VectorReader> MapEntry<'r, K, V> {
    #[inline]
    pub fn new(keys: &'r K, values: &'r V, index: usize) -> MapEntry<'r, K, V> {
        MapEntry {
            first: KeyAccessor::new(keys, index),
            second: OptionalAccessor::new(values, index),
            index,
        }
    }

    #[inline]
    pub fn key(&self) -> K::Item<'r> {
        self.first.value()
    }

    #[inline]
    pub fn value(&self) -> OptionalAccessor<'r, V> {
        self.second
    }
}

impl<K: VectorReader, V: VectorReader> Clone for MapEntry<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: VectorReader, V: VectorReader> Copy for MapEntry<'_, K, V> {}

impl<K: VectorReader, V: VectorReader> fmt::Debug for MapEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapEntry")
            .field("index", &self.index)
            .field("has_value", &self.second.has_value())
            .finish()
    }
}

impl<K: VectorReader, V: VectorReader> IndexedElement for MapEntry<'_, K, V> {
    #[inline]
    fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn advance_index(&mut self) {
        self.first.advance_index();
        self.second.advance_index();
        self.index += 1;
    }
}

impl<'r, 's, K1, V1, K2, V2> PartialEq<MapEntry<'s, K2, V2>> for MapEntry<'r, K1, V1>
where
    K1: VectorReader,
    V1: VectorReader,
    K2: VectorReader,
    V2: VectorReader,
    K1::Item<'r>: PartialEq<K2::Item<'s>>,
    V1::Item<'r>: PartialEq<V2::Item<'s>>,
{
    fn eq(&self, other: &MapEntry<'s, K2, V2>) -> bool {
        self.first == other.first && self.second == other.second
    }
}

/// Compares with a `(key, optional value)` pair.
impl<'r, K, V, A, B> PartialEq<(A, Option<B>)> for MapEntry<'r, K, V>
where
    K: VectorReader,
    V: VectorReader,
    KeyAccessor<'r, K>: PartialEq<A>,
    OptionalAccessor<'r, V>: PartialEq<Option<B>>,
{
    fn eq(&self, other: &(A, Option<B>)) -> bool {
        self.first == other.0 && self.second == other.1
    }
}

/// The entries of one map row: a window `offset..offset + len` into the key
/// and value readers, in storage order.
///
/// Duplicate keys are kept; lookups return the first match.
pub struct MapView<'r, K: VectorReader, V: VectorReader> {
    keys: &'r K,
    values: &'r V,
    offset: usize,
    len: usize,
}

impl<'r, K: VectorReader, V: VectorReader> MapView<'r, K, V> {
    #[inline]
    pub fn new(keys: &'r K, values: &'r V, offset: usize, len: usize) -> MapView<'r, K, V> {
        MapView {
            keys,
            values,
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
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the entry at `index`, `0 <= index < len()`.
    #[inline]
    pub fn at(&self, index: usize) -> MapEntry<'r, K, V> {
        debug_assert!(index < self.len, "index {index} out of bounds ({})", self.len);
        MapEntry::new(self.keys, self.values, self.offset + index)
    }

    pub fn begin(&self) -> IndexBasedIterator<MapEntry<'r, K, V>> {
        IndexBasedIterator::new(MapEntry::new(self.keys, self.values, self.offset))
    }

    pub fn end(&self) -> IndexBasedIterator<MapEntry<'r, K, V>> {
        IndexBasedIterator::new(MapEntry::new(
            self.keys,
            self.values,
            self.offset + self.len,
        ))
    }

    pub fn iter(&self) -> Elements<MapEntry<'r, K, V>> {
        Elements::new(self.begin(), self.end())
    }

    /// Returns the first entry whose key equals `key`.
    pub fn find<Q>(&self, key: Q) -> Option<MapEntry<'r, K, V>>
    where
        KeyAccessor<'r, K>: PartialEq<Q>,
    {
        self.iter().find(|entry| entry.first == key)
    }

    pub fn contains_key<Q>(&self, key: Q) -> bool
    where
        KeyAccessor<'r, K>: PartialEq<Q>,
    {
        self.find(key).is_some()
    }
}

impl<K: VectorReader, V: VectorReader> Clone for MapView<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: VectorReader, V: VectorReader> Copy for MapView<'_, K, V> {}

impl<K: VectorReader, V: VectorReader> fmt::Debug for MapView<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapView")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish()
    }
}

impl<'r, K: VectorReader, V: VectorReader> IntoIterator for MapView<'r, K, V> {
    type Item = MapEntry<'r, K, V>;
    type IntoIter = Elements<MapEntry<'r, K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'r, K: VectorReader, V: VectorReader> IntoIterator for &MapView<'r, K, V> {
    type Item = MapEntry<'r, K, V>;
    type IntoIter = Elements<MapEntry<'r, K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Entry-wise equality in storage order.
impl<'r, 's, K1, V1, K2, V2> PartialEq<MapView<'s, K2, V2>> for MapView<'r, K1, V1>
where
    K1: VectorReader,
    V1: VectorReader,
    K2: VectorReader,
    V2: VectorReader,
    K1::Item<'r>: PartialEq<K2::Item<'s>>,
    V1::Item<'r>: PartialEq<V2::Item<'s>>,
{
    fn eq(&self, other: &MapView<'s, K2, V2>) -> bool {
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

/// The entries of one map row on the null-free path, as raw `(key, value)`
/// pairs.
pub struct NullFreeMapView<'r, K: VectorReader, V: VectorReader> {
    keys: &'r K,
    values: &'r V,
    offset: usize,
    len: usize,
}

impl<'r, K: VectorReader, V: VectorReader> NullFreeMapView<'r, K, V> {
    #[inline]
    pub fn new(keys: &'r K, values: &'r V, offset: usize, len: usize) -> NullFreeMapView<'r, K, V> {
        NullFreeMapView {
            keys,
            values,
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
    pub fn at(&self, index: usize) -> (K::NullFreeItem<'r>, V::NullFreeItem<'r>) {
        debug_assert!(index < self.len, "index {index} out of bounds ({})", self.len);
        let position = self.offset + index;
        (
            self.keys.read_null_free(position),
            self.values.read_null_free(position),
        )
    }

    pub fn iter(&self) -> NullFreeEntries<'r, K, V> {
        NullFreeEntries {
            view: *self,
            next: 0,
        }
    }
}

impl<K: VectorReader, V: VectorReader> Clone for NullFreeMapView<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: VectorReader, V: VectorReader> Copy for NullFreeMapView<'_, K, V> {}

impl<'r, K: VectorReader, V: VectorReader> IntoIterator for NullFreeMapView<'r, K, V> {
    type Item = (K::NullFreeItem<'r>, V::NullFreeItem<'r>);
    type IntoIter = NullFreeEntries<'r, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`NullFreeMapView`].
pub struct NullFreeEntries<'r, K: VectorReader, V: VectorReader> {
    view: NullFreeMapView<'r, K, V>,
    next: usize,
}

impl<'r, K: VectorReader, V: VectorReader> Iterator for NullFreeEntries<'r, K, V> {
    type Item = (K::NullFreeItem<'r>, V::NullFreeItem<'r>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.view.len {
            return None;
        }
        let entry = self.view.at(self.next);
        self.next += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.view.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<K: VectorReader, V: VectorReader> ExactSizeIterator for NullFreeEntries<'_, K, V> {}
