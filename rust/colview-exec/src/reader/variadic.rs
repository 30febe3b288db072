use std::borrow::Cow;

use colview_common::{Result, error::Error, verify_arg};
use colview_vector::{DecodedArgs, DecodedVector};

use crate::{
    arg_type::ArgType,
    view::variadic::{NullFreeVariadicView, VariadicView},
};

use super::{NULL_MEMO_UNSET, VectorReader};

/// Reader of the trailing arguments of a call, one child reader per argument.
///
/// A variadic row is never null itself; its elements are the child values at
/// that row.
pub struct VariadicReader<'a, T: ArgType> {
    readers: Vec<T::Reader<'a>>,
    rows: usize,
    children_may_have_nulls: Option<bool>,
}

impl<'a, T: ArgType> VariadicReader<'a, T> {
    /// Creates readers for every argument from `start` to the end of the call.
    ///
    /// An empty tail (`start == args.len()`) is allowed.
    pub fn new(args: &'a DecodedArgs, start: usize) -> Result<VariadicReader<'a, T>> {
        verify_arg!(start, start <= args.len());
        let readers = (start..args.len())
            .map(|position| T::create_reader(Cow::Borrowed(args.at(position))))
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "building variadic reader over {} argument(s) from position {start}",
            readers.len()
        );
        Ok(VariadicReader {
            readers,
            rows: args.rows(),
            children_may_have_nulls: None,
        })
    }

    /// Creates readers over the given columns, which must all have the same
    /// number of rows.
    pub fn from_columns(
        columns: impl IntoIterator<Item = Cow<'a, DecodedVector>>,
    ) -> Result<VariadicReader<'a, T>> {
        let mut rows = None;
        let mut readers = Vec::new();
        for column in columns {
            match rows {
                None => rows = Some(column.size()),
                Some(rows) if rows != column.size() => {
                    return Err(Error::invalid_arg(
                        "columns",
                        format!("expected {rows} rows, found {}", column.size()),
                    ));
                }
                Some(_) => (),
            }
            readers.push(T::create_reader(column)?);
        }
        Ok(VariadicReader {
            readers,
            rows: rows.unwrap_or(0),
            children_may_have_nulls: None,
        })
    }

    /// Number of arguments covered.
    pub fn arg_count(&self) -> usize {
        self.readers.len()
    }

    pub fn readers(&self) -> &[T::Reader<'a>] {
        &self.readers
    }
}

impl<'a, T: ArgType> VectorReader for VariadicReader<'a, T> {
    type Item<'r>
        = VariadicView<'r, T::Reader<'a>>
    where
        Self: 'r;

    type NullFreeItem<'r>
        = NullFreeVariadicView<'r, T::Reader<'a>>
    where
        Self: 'r;

    #[inline]
    fn len(&self) -> usize {
        self.rows
    }

    #[inline]
    fn is_set(&self, _offset: usize) -> bool {
        true
    }

    #[inline]
    fn get(&self, offset: usize) -> Self::Item<'_> {
        VariadicView::new(&self.readers, offset)
    }

    #[inline]
    fn read_null_free(&self, offset: usize) -> Self::NullFreeItem<'_> {
        NullFreeVariadicView::new(&self.readers, offset)
    }

    fn may_have_nulls(&self) -> bool {
        false
    }

    fn set_children_may_have_nulls(&mut self) -> Result<()> {
        for reader in &mut self.readers {
            reader.set_children_may_have_nulls()?;
        }
        self.children_may_have_nulls = Some(
            self.readers
                .iter()
                .any(|reader| reader.may_have_nulls_recursive()),
        );
        Ok(())
    }

    fn contains_null(&self, index: usize) -> bool {
        let children_may_have_nulls = self.children_may_have_nulls.expect(NULL_MEMO_UNSET);
        children_may_have_nulls && self.readers.iter().any(|reader| reader.contains_null(index))
    }

    fn may_have_nulls_recursive(&self) -> bool {
        self.children_may_have_nulls.expect(NULL_MEMO_UNSET)
    }
}
