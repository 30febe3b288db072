use std::{cell::RefCell, cmp::Ordering, fmt, rc::Rc};

use arrow_ord::ord::make_comparator;
use arrow_schema::{DataType, SortOptions};
use colview_common::{Result, error::Error};
use colview_vector::DecodedVector;

use crate::{
    arg_type::ArgType,
    reader::{VectorReader, generic::CastCache},
};

/// A value of a generic argument at one row.
///
/// The concrete type is discovered at runtime with
/// [`data_type`](Self::data_type) and the value is read by casting the view
/// to an [`ArgType`] with [`try_cast_to`](Self::try_cast_to) or
/// [`cast_to`](Self::cast_to).
#[derive(Clone, Copy)]
pub struct GenericView<'r> {
    decoded: &'r DecodedVector,
    cache: &'r RefCell<CastCache>,
    row: usize,
}

impl<'r> GenericView<'r> {
    pub fn new(
        decoded: &'r DecodedVector,
        cache: &'r RefCell<CastCache>,
        row: usize,
    ) -> GenericView<'r> {
        GenericView {
            decoded,
            cache,
            row,
        }
    }

    #[inline]
    pub fn data_type(&self) -> &'r DataType {
        self.decoded.data_type()
    }

    /// Logical row of the view.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Physical position of the value in the decoded base array.
    #[inline]
    pub fn index(&self) -> usize {
        self.decoded.index(self.row)
    }

    #[inline]
    pub fn decoded(&self) -> &'r DecodedVector {
        self.decoded
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.decoded.is_null_at(self.row)
    }

    /// Casts the view to `T`, or returns `None` if the column is not of type `T`.
    ///
    /// A column of type `T` whose typed reader cannot be built also yields
    /// `None`; the failure is logged and [`cast_to`](Self::cast_to) reports it.
    pub fn try_cast_to<T: ArgType>(&self) -> Option<CastValue<T>> {
        self.resolve::<T>().unwrap_or_else(|e| {
            log::warn!(
                "generic cast to {} failed for {}: {e}",
                T::signature(),
                self.data_type()
            );
            None
        })
    }

    /// Casts the view to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::TypeMismatch`](colview_common::ErrorKind::TypeMismatch)
    /// if the column is not of type `T`.
    pub fn cast_to<T: ArgType>(&self) -> Result<CastValue<T>> {
        self.resolve::<T>()?.ok_or_else(|| {
            Error::type_mismatch(T::signature(), self.data_type().to_string())
        })
    }

    fn resolve<T: ArgType>(&self) -> Result<Option<CastValue<T>>> {
        let reader = self.cache.borrow_mut().resolve::<T>(self.decoded)?;
        Ok(reader.map(|reader| CastValue {
            reader,
            row: self.row,
        }))
    }

    /// Compares the values of two views, which may come from different
    /// columns. Nulls order first.
    ///
    /// # Errors
    ///
    /// Fails if the two data types cannot be compared.
    pub fn compare(&self, other: &GenericView<'_>) -> Result<Ordering> {
        match (self.is_null(), other.is_null()) {
            (true, true) => return Ok(Ordering::Equal),
            (true, false) => return Ok(Ordering::Less),
            (false, true) => return Ok(Ordering::Greater),
            (false, false) => (),
        }
        let comparator = make_comparator(
            self.decoded.base().as_ref(),
            other.decoded.base().as_ref(),
            SortOptions::default(),
        )
        .map_err(|e| Error::arrow("generic view comparison", e))?;
        Ok(comparator(self.index(), other.index()))
    }

    /// Returns `true` if both views hold equal values, or both are null.
    pub fn equals(&self, other: &GenericView<'_>) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Equal)
    }
}

impl fmt::Debug for GenericView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericView")
            .field("data_type", self.data_type())
            .field("row", &self.row)
            .finish()
    }
}

/// A generic view cast to a concrete argument type.
///
/// Holds the cached typed reader, so the value stays readable after the cast
/// cache moves on to other types.
pub struct CastValue<T: ArgType> {
    reader: Rc<T::Reader<'static>>,
    row: usize,
}

impl<T: ArgType> CastValue<T> {
    #[inline]
    pub fn is_set(&self) -> bool {
        self.reader.is_set(self.row)
    }

    /// Returns the value. The row must not be null.
    #[inline]
    pub fn get(&self) -> <T::Reader<'static> as VectorReader>::Item<'_> {
        self.reader.get(self.row)
    }

    #[inline]
    pub fn read(&self) -> Option<<T::Reader<'static> as VectorReader>::Item<'_>> {
        self.reader.read(self.row)
    }

    /// The typed reader shared through the cast cache.
    pub fn reader(&self) -> &Rc<T::Reader<'static>> {
        &self.reader
    }
}
