//! Builders for the wrapper encodings understood by [`DecodedVector`].
//!
//! [`DecodedVector`]: crate::decoded::DecodedVector

use std::sync::Arc;

use arrow_array::{Array, ArrayRef, DictionaryArray, Int32Array, RunArray, types::Int32Type};
use colview_common::{Result, verify_arg};

/// Wraps `values` in a dictionary with `Int32` keys. A `None` key is a null row.
pub fn dictionary(
    values: ArrayRef,
    keys: impl IntoIterator<Item = Option<i32>>,
) -> Result<ArrayRef> {
    let keys = Int32Array::from_iter(keys);
    Ok(Arc::new(DictionaryArray::<Int32Type>::try_new(
        keys, values,
    )?))
}

/// Repeats the value at `index` of `values` `len` times, as a single-run
/// run-end encoded array.
pub fn constant(values: &ArrayRef, index: usize, len: usize) -> Result<ArrayRef> {
    if len == 0 {
        let run_ends = Int32Array::from(Vec::<i32>::new());
        let values = values.slice(0, 0);
        return Ok(Arc::new(RunArray::<Int32Type>::try_new(
            &run_ends,
            values.as_ref(),
        )?));
    }
    verify_arg!(index, index < values.len());
    verify_arg!(len, len <= i32::MAX as usize);
    let run_ends = Int32Array::from(vec![len as i32]);
    let values = values.slice(index, 1);
    Ok(Arc::new(RunArray::<Int32Type>::try_new(
        &run_ends,
        values.as_ref(),
    )?))
}

/// Run-end encodes `values`, repeating `values[i]` `run_lengths[i]` times.
pub fn run_ends(values: &ArrayRef, run_lengths: &[usize]) -> Result<ArrayRef> {
    verify_arg!(run_lengths, run_lengths.len() == values.len());
    verify_arg!(run_lengths, run_lengths.iter().all(|&len| len > 0));
    let mut end = 0usize;
    let mut ends = Vec::with_capacity(run_lengths.len());
    for &len in run_lengths {
        end += len;
        verify_arg!(run_lengths, end <= i32::MAX as usize);
        ends.push(end as i32);
    }
    let run_ends = Int32Array::from(ends);
    Ok(Arc::new(RunArray::<Int32Type>::try_new(
        &run_ends,
        values.as_ref(),
    )?))
}
