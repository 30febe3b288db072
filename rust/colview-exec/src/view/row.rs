use std::fmt;

use crate::reader::row::RowFields;

/// The fields of one struct row.
///
/// [`fields`](Self::fields) returns one [`OptionalAccessor`] per field as a
/// tuple, so a row is taken apart by destructuring:
///
/// ```ignore
/// let (id, name) = row.fields();
/// ```
///
/// [`OptionalAccessor`]: super::accessor::OptionalAccessor
pub struct RowView<'r, 'a, T: RowFields> {
    readers: &'r T::Readers<'a>,
    index: usize,
}

impl<'r, 'a, T: RowFields> RowView<'r, 'a, T> {
    #[inline]
    pub fn new(readers: &'r T::Readers<'a>, index: usize) -> RowView<'r, 'a, T> {
        RowView { readers, index }
    }

    /// Position of the row in the field readers.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        T::ARITY
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        T::ARITY == 0
    }

    #[inline]
    pub fn fields(&self) -> T::Accessors<'r, 'a> {
        T::accessors(self.readers, self.index)
    }

    /// Returns `true` if the field at `position` is not null in this row.
    pub fn is_field_set(&self, position: usize) -> bool {
        T::is_field_set(self.readers, position, self.index)
    }
}

impl<T: RowFields> Clone for RowView<'_, '_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: RowFields> Copy for RowView<'_, '_, T> {}

impl<T: RowFields> fmt::Debug for RowView<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowView")
            .field("index", &self.index)
            .field("arity", &T::ARITY)
            .finish()
    }
}
