use std::borrow::Cow;

use colview_common::{Result, error::Error};
use colview_vector::DecodedVector;

use crate::arg_type::ScalarType;

use super::VectorReader;

/// Reader of a scalar column: values are read from the decoded base array at
/// the mapped physical index.
pub struct ScalarReader<'a, T: ScalarType> {
    decoded: Cow<'a, DecodedVector>,
    values: T::Values,
}

impl<'a, T: ScalarType> ScalarReader<'a, T> {
    pub fn new(decoded: Cow<'a, DecodedVector>) -> Result<ScalarReader<'a, T>> {
        if !T::accepts(decoded.data_type()) {
            return Err(Error::type_mismatch(
                T::NAME,
                decoded.data_type().to_string(),
            ));
        }
        let values = T::downcast(decoded.base()).ok_or_else(|| {
            Error::type_mismatch(T::NAME, decoded.data_type().to_string())
        })?;
        Ok(ScalarReader { decoded, values })
    }

    pub fn decoded(&self) -> &DecodedVector {
        &self.decoded
    }
}

impl<T: ScalarType> VectorReader for ScalarReader<'_, T> {
    type Item<'r>
        = T::Value<'r>
    where
        Self: 'r;

    type NullFreeItem<'r>
        = T::Value<'r>
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
        T::value_at(&self.values, self.decoded.index(offset))
    }

    #[inline]
    fn read_null_free(&self, offset: usize) -> Self::NullFreeItem<'_> {
        self.get(offset)
    }

    #[inline]
    fn may_have_nulls(&self) -> bool {
        self.decoded.may_have_nulls()
    }

    fn set_children_may_have_nulls(&mut self) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn contains_null(&self, index: usize) -> bool {
        self.decoded.is_null_at(index)
    }

    fn contains_null_range(&self, start: usize, end: usize) -> bool {
        self.decoded.may_have_nulls() && (start..end).any(|index| self.decoded.is_null_at(index))
    }

    fn may_have_nulls_recursive(&self) -> bool {
        self.decoded.may_have_nulls()
    }
}
