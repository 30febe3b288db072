use std::borrow::Cow;

use arrow_array::Array as _;
use colview_common::Result;
use colview_vector::{DecodedVector, ListWindows, Window};

use crate::{
    arg_type::{ArgType, Array, check_type},
    view::array::{ArrayView, NullFreeArrayView},
};

use super::{NULL_MEMO_UNSET, VectorReader};

/// Reader of a list column.
///
/// The element column is decoded in full once, and each row is a window into
/// the element reader.
pub struct ArrayReader<'a, V: ArgType> {
    decoded: Cow<'a, DecodedVector>,
    windows: ListWindows,
    elements: V::Reader<'a>,
    elements_may_have_nulls: Option<bool>,
}

impl<'a, V: ArgType> ArrayReader<'a, V> {
    pub fn new(decoded: Cow<'a, DecodedVector>) -> Result<ArrayReader<'a, V>> {
        check_type::<Array<V>>(&decoded)?;
        let (windows, values) = ListWindows::from_list(decoded.base().as_ref())?;
        log::debug!(
            "building array reader over {} rows with {} elements",
            decoded.size(),
            values.len()
        );
        let elements = V::create_reader(Cow::Owned(DecodedVector::decode_all(&values)?))?;
        Ok(ArrayReader {
            decoded,
            windows,
            elements,
            elements_may_have_nulls: None,
        })
    }

    pub fn decoded(&self) -> &DecodedVector {
        &self.decoded
    }

    /// The reader over the flattened elements of all rows.
    pub fn elements(&self) -> &V::Reader<'a> {
        &self.elements
    }

    /// Returns the element window of the row at `offset`.
    #[inline]
    pub fn window(&self, offset: usize) -> Window {
        self.windows.window(self.decoded.index(offset))
    }
}

impl<'a, V: ArgType> VectorReader for ArrayReader<'a, V> {
    type Item<'r>
        = ArrayView<'r, V::Reader<'a>>
    where
        Self: 'r;

    type NullFreeItem<'r>
        = NullFreeArrayView<'r, V::Reader<'a>>
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
        ArrayView::new(&self.elements, window.offset, window.len)
    }

    #[inline]
    fn read_null_free(&self, offset: usize) -> Self::NullFreeItem<'_> {
        let window = self.window(offset);
        NullFreeArrayView::new(&self.elements, window.offset, window.len)
    }

    #[inline]
    fn may_have_nulls(&self) -> bool {
        self.decoded.may_have_nulls()
    }

    fn set_children_may_have_nulls(&mut self) -> Result<()> {
        self.elements.set_children_may_have_nulls()?;
        self.elements_may_have_nulls = Some(self.elements.may_have_nulls_recursive());
        Ok(())
    }

    fn contains_null(&self, index: usize) -> bool {
        let elements_may_have_nulls = self.elements_may_have_nulls.expect(NULL_MEMO_UNSET);
        if self.decoded.is_null_at(index) {
            return true;
        }
        if !elements_may_have_nulls {
            return false;
        }
        let window = self.window(index);
        self.elements.contains_null_range(window.offset, window.end())
    }

    fn may_have_nulls_recursive(&self) -> bool {
        let elements_may_have_nulls = self.elements_may_have_nulls.expect(NULL_MEMO_UNSET);
        self.decoded.may_have_nulls() || elements_may_have_nulls
    }
}
