//! Decoded argument columns of a single evaluation pass.

use arrow_array::ArrayRef;
use colview_common::Result;

use crate::{decoded::DecodedVector, selectivity::SelectivityVector};

/// The argument columns of one function call, each decoded for the same
/// selected rows.
#[derive(Clone, Debug)]
pub struct DecodedArgs {
    args: Vec<DecodedVector>,
    rows: usize,
}

impl DecodedArgs {
    /// Decodes every column in `columns` for `rows`.
    pub fn decode(columns: &[ArrayRef], rows: &SelectivityVector) -> Result<DecodedArgs> {
        let args = columns
            .iter()
            .map(|column| DecodedVector::decode(column, rows))
            .collect::<Result<Vec<_>>>()?;
        log::trace!("decoded {} argument column(s) for {} rows", args.len(), rows.len());
        Ok(DecodedArgs {
            args,
            rows: rows.len(),
        })
    }

    /// Number of argument columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Number of logical rows every argument was decoded for.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The decoded argument at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= self.len()`.
    #[inline]
    pub fn at(&self, position: usize) -> &DecodedVector {
        &self.args[position]
    }

    pub fn get(&self, position: usize) -> Option<&DecodedVector> {
        self.args.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecodedVector> {
        self.args.iter()
    }
}
