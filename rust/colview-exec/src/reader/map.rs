use std::borrow::Cow;

use arrow_array::Array as _;
use colview_common::Result;
use colview_vector::{DecodedVector, ListWindows, Window};

use crate::{
    arg_type::{ArgType, Map, check_type},
    view::map::{MapView, NullFreeMapView},
};

use super::{NULL_MEMO_UNSET, VectorReader};

/// Reader of a map column.
///
/// Keys and values are decoded in full once; each row is a window shared by
/// the key and value readers.
pub struct MapReader<'a, K: ArgType, V: ArgType> {
    decoded: Cow<'a, DecodedVector>,
    windows: ListWindows,
    keys: K::Reader<'a>,
    values: V::Reader<'a>,
    keys_may_have_nulls: Option<bool>,
    values_may_have_nulls: Option<bool>,
}

impl<'a, K: ArgType, V: ArgType> MapReader<'a, K, V> {
    pub fn new(decoded: Cow<'a, DecodedVector>) -> Result<MapReader<'a, K, V>> {
        check_type::<Map<K, V>>(&decoded)?;
        let (windows, keys, values) = ListWindows::from_map(decoded.base().as_ref())?;
        log::debug!(
            "building map reader over {} rows with {} entries",
            decoded.size(),
            keys.len()
        );
        let keys = K::create_reader(Cow::Owned(DecodedVector::decode_all(&keys)?))?;
        let values = V::create_reader(Cow::Owned(DecodedVector::decode_all(&values)?))?;
        Ok(MapReader {
            decoded,
            windows,
            keys,
            values,
            keys_may_have_nulls: None,
            values_may_have_nulls: None,
        })
    }

    pub fn decoded(&self) -> &DecodedVector {
        &self.decoded
    }

    pub fn keys(&self) -> &K::Reader<'a> {
        &self.keys
    }

    pub fn values(&self) -> &V::Reader<'a> {
        &self.values
    }

    /// Returns the entry window of the row at `offset`.
    #[inline]
    pub fn window(&self, offset: usize) -> Window {
        self.windows.window(self.decoded.index(offset))
    }
}

impl<'a, K: ArgType, V: ArgType> VectorReader for MapReader<'a, K, V> {
    type Item<'r>
        = MapView<'r, K::Reader<'a>, V::Reader<'a>>
    where
        Self: 'r;

    type NullFreeItem<'r>
        = NullFreeMapView<'r, K::Reader<'a>, V::Reader<'a>>
    where
        Self: 'r;

    #[inline]
    fn len(&self) -> usize {
        self.decoded.size()
    }

    #[inline]
    fn is_set(&self, offset: usize) -> bool {
        !self.decoded.is_null_at(offset)
    }

    #[inline]
    fn get(&self, offset: usize) -> Self::Item<'_> {
        let window = self.window(offset);
        MapView::new(&self.keys, &self.values, window.offset, window.len)
    }

    #[inline]
    fn read_null_free(&self, offset: usize) -> Self::NullFreeItem<'_> {
        let window = self.window(offset);
        NullFreeMapView::new(&self.keys, &self.values, window.offset, window.len)
    }

    #[inline]
    fn may_have_nulls(&self) -> bool {
        self.decoded.may_have_nulls()
    }

    fn set_children_may_have_nulls(&mut self) -> Result<()> {
        self.keys.set_children_may_have_nulls()?;
        self.values.set_children_may_have_nulls()?;
        self.keys_may_have_nulls = Some(self.keys.may_have_nulls_recursive());
        self.values_may_have_nulls = Some(self.values.may_have_nulls_recursive());
        Ok(())
    }

    fn contains_null(&self, index: usize) -> bool {
        let keys_may_have_nulls = self.keys_may_have_nulls.expect(NULL_MEMO_UNSET);
        let values_may_have_nulls = self.values_may_have_nulls.expect(NULL_MEMO_UNSET);
        if self.decoded.is_null_at(index) {
            return true;
        }
        let window = self.window(index);
        (keys_may_have_nulls && self.keys.contains_null_range(window.offset, window.end()))
            || (values_may_have_nulls
                && self.values.contains_null_range(window.offset, window.end()))
    }

    fn may_have_nulls_recursive(&self) -> bool {
        let keys_may_have_nulls = self.keys_may_have_nulls.expect(NULL_MEMO_UNSET);
        let values_may_have_nulls = self.values_may_have_nulls.expect(NULL_MEMO_UNSET);
        self.decoded.may_have_nulls() || keys_may_have_nulls || values_may_have_nulls
    }
}
