use std::borrow::Cow;

use arrow_array::{Array, ArrayRef, cast::AsArray};
use arrow_schema::Fields;
use colview_common::{Result, error::Error};
use colview_vector::DecodedVector;

use crate::{
    arg_type::{ArgType, Row, check_type},
    view::{accessor::OptionalAccessor, row::RowView},
};

use super::{NULL_MEMO_UNSET, VectorReader};

/// The fields of a [`Row`] argument, implemented for tuples of [`ArgType`]s.
pub trait RowFields: 'static {
    /// One reader per field.
    type Readers<'a>;

    /// One [`OptionalAccessor`] per field.
    type Accessors<'r, 'a>
    where
        'a: 'r;

    /// One null-free value per field.
    type NullFreeValues<'r, 'a>
    where
        'a: 'r;

    const ARITY: usize;

    fn signature() -> String;

    fn accepts(fields: &Fields) -> bool;

    /// Creates the field readers, decoding every field column in full.
    fn create_readers<'a>(columns: &[ArrayRef]) -> Result<Self::Readers<'a>>;

    fn set_children_may_have_nulls(readers: &mut Self::Readers<'_>) -> Result<()>;

    /// Returns `true` if any field may produce a null at any depth.
    fn any_may_have_nulls(readers: &Self::Readers<'_>) -> bool;

    /// Returns `true` if any field is null or contains a null at `index`.
    fn any_contains_null(readers: &Self::Readers<'_>, index: usize) -> bool;

    /// # Panics
    ///
    /// Panics if `position >= ARITY`.
    fn is_field_set(readers: &Self::Readers<'_>, position: usize, index: usize) -> bool;

    fn accessors<'r, 'a: 'r>(
        readers: &'r Self::Readers<'a>,
        index: usize,
    ) -> Self::Accessors<'r, 'a>;

    fn null_free_values<'r, 'a: 'r>(
        readers: &'r Self::Readers<'a>,
        index: usize,
    ) -> Self::NullFreeValues<'r, 'a>;
}

macro_rules! impl_row_fields {
    ($arity:literal; $($name:ident: $idx:tt),+) => {
        impl<$($name: ArgType),+> RowFields for ($($name,)+) {
            type Readers<'a> = ($($name::Reader<'a>,)+);

            type Accessors<'r, 'a>
                = ($(OptionalAccessor<'r, $name::Reader<'a>>,)+)
            where
                'a: 'r;

            type NullFreeValues<'r, 'a>
                = ($(<$name::Reader<'a> as VectorReader>::NullFreeItem<'r>,)+)
            where
                'a: 'r;

            const ARITY: usize = $arity;

            fn signature() -> String {
                [$($name::signature()),+].join(", ")
            }

            fn accepts(fields: &Fields) -> bool {
                fields.len() == $arity $(&& $name::accepts(fields[$idx].data_type()))+
            }

            fn create_readers<'a>(columns: &[ArrayRef]) -> Result<Self::Readers<'a>> {
                Ok(($(
                    $name::create_reader(Cow::Owned(DecodedVector::decode_all(&columns[$idx])?))?,
                )+))
            }

            fn set_children_may_have_nulls(readers: &mut Self::Readers<'_>) -> Result<()> {
                $(readers.$idx.set_children_may_have_nulls()?;)+
                Ok(())
            }

            fn any_may_have_nulls(readers: &Self::Readers<'_>) -> bool {
                $(readers.$idx.may_have_nulls_recursive())||+
            }

            fn any_contains_null(readers: &Self::Readers<'_>, index: usize) -> bool {
                $(readers.$idx.contains_null(index))||+
            }

            fn is_field_set(readers: &Self::Readers<'_>, position: usize, index: usize) -> bool {
                match position {
                    $($idx => readers.$idx.is_set(index),)+
                    _ => panic!("field {position} out of bounds ({})", $arity),
                }
            }

            #[inline]
            fn accessors<'r, 'a: 'r>(
                readers: &'r Self::Readers<'a>,
                index: usize,
            ) -> Self::Accessors<'r, 'a> {
                ($(OptionalAccessor::new(&readers.$idx, index),)+)
            }

            #[inline]
            fn null_free_values<'r, 'a: 'r>(
                readers: &'r Self::Readers<'a>,
                index: usize,
            ) -> Self::NullFreeValues<'r, 'a> {
                ($(readers.$idx.read_null_free(index),)+)
            }
        }
    };
}

impl_row_fields!(1; A: 0);
impl_row_fields!(2; A: 0, B: 1);
impl_row_fields!(3; A: 0, B: 1, C: 2);
impl_row_fields!(4; A: 0, B: 1, C: 2, D: 3);
impl_row_fields!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
impl_row_fields!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_row_fields!(7; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_row_fields!(8; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

/// Reader of a struct column with one child reader per field.
///
/// Field readers are indexed by the physical row of the struct.
pub struct RowReader<'a, T: RowFields> {
    decoded: Cow<'a, DecodedVector>,
    fields: T::Readers<'a>,
    fields_may_have_nulls: Option<bool>,
}

impl<'a, T: RowFields> RowReader<'a, T> {
    pub fn new(decoded: Cow<'a, DecodedVector>) -> Result<RowReader<'a, T>> {
        check_type::<Row<T>>(&decoded)?;
        let struct_array = decoded.base().as_struct_opt().ok_or_else(|| {
            Error::type_mismatch(Row::<T>::signature(), decoded.data_type().to_string())
        })?;
        log::debug!(
            "building row reader with {} field(s) over {} rows",
            T::ARITY,
            struct_array.len()
        );
        let fields = T::create_readers(struct_array.columns())?;
        Ok(RowReader {
            decoded,
            fields,
            fields_may_have_nulls: None,
        })
    }

    pub fn decoded(&self) -> &DecodedVector {
        &self.decoded
    }

    pub fn field_readers(&self) -> &T::Readers<'a> {
        &self.fields
    }
}

impl<'a, T: RowFields> VectorReader for RowReader<'a, T> {
    type Item<'r>
        = RowView<'r, 'a, T>
    where
        Self: 'r;

    type NullFreeItem<'r>
        = T::NullFreeValues<'r, 'a>
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
        RowView::new(&self.fields, self.decoded.index(offset))
    }

    #[inline]
    fn read_null_free(&self, offset: usize) -> Self::NullFreeItem<'_> {
        T::null_free_values(&self.fields, self.decoded.index(offset))
    }

    #[inline]
    fn may_have_nulls(&self) -> bool {
        self.decoded.may_have_nulls()
    }

    fn set_children_may_have_nulls(&mut self) -> Result<()> {
        T::set_children_may_have_nulls(&mut self.fields)?;
        self.fields_may_have_nulls = Some(T::any_may_have_nulls(&self.fields));
        Ok(())
    }

    fn contains_null(&self, index: usize) -> bool {
        let fields_may_have_nulls = self.fields_may_have_nulls.expect(NULL_MEMO_UNSET);
        self.decoded.is_null_at(index)
            || (fields_may_have_nulls
                && T::any_contains_null(&self.fields, self.decoded.index(index)))
    }

    fn may_have_nulls_recursive(&self) -> bool {
        let fields_may_have_nulls = self.fields_may_have_nulls.expect(NULL_MEMO_UNSET);
        self.decoded.may_have_nulls() || fields_may_have_nulls
    }
}
