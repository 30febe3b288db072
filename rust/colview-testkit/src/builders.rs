//! Array builders for tests.

use std::sync::Arc;

use arrow_array::{
    Array, ArrayRef, Int64Array, ListArray, MapArray, StringArray, StructArray, UInt32Array,
};
use arrow_buffer::{NullBuffer, OffsetBuffer};
use arrow_schema::{DataType, Field, Fields};
use colview_vector::encoding;

/// Physical encodings that [`encode`] can wrap a flat array in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Flat,
    Dictionary,
    RunEnd,
}

impl Encoding {
    pub const ALL: [Encoding; 3] = [Encoding::Flat, Encoding::Dictionary, Encoding::RunEnd];
}

pub fn int64_array(values: impl IntoIterator<Item = Option<i64>>) -> ArrayRef {
    Arc::new(Int64Array::from_iter(values))
}

pub fn string_array<'s>(values: impl IntoIterator<Item = Option<&'s str>>) -> ArrayRef {
    Arc::new(StringArray::from_iter(values))
}

fn null_buffer(row_nulls: Option<&[bool]>) -> Option<NullBuffer> {
    row_nulls.map(|nulls| {
        NullBuffer::from(nulls.iter().map(|is_null| !is_null).collect::<Vec<_>>())
    })
}

/// Builds a list array over `values`: row `i` takes the next `lengths[i]`
/// values. `row_nulls[i] == true` marks row `i` null.
pub fn make_list(
    values: ArrayRef,
    lengths: &[usize],
    row_nulls: Option<&[bool]>,
) -> anyhow::Result<ArrayRef> {
    let field = Arc::new(Field::new_list_field(values.data_type().clone(), true));
    let offsets = OffsetBuffer::from_lengths(lengths.iter().copied());
    Ok(Arc::new(ListArray::try_new(
        field,
        offsets,
        values,
        null_buffer(row_nulls),
    )?))
}

/// Builds a `List<Int64>` array with rows of the given lengths.
///
/// The element at flat position `j` is `value_at(j)`, or null if
/// `is_null_at(j)`.
pub fn make_array_vector(
    lengths: &[usize],
    value_at: impl Fn(usize) -> i64,
    is_null_at: impl Fn(usize) -> bool,
) -> anyhow::Result<ArrayRef> {
    let total = lengths.iter().sum::<usize>();
    let values = int64_array((0..total).map(|j| (!is_null_at(j)).then(|| value_at(j))));
    make_list(values, lengths, None)
}

/// Builds a map array from `keys` and `values`: row `i` takes the next
/// `lengths[i]` entries.
pub fn make_map(
    keys: ArrayRef,
    values: ArrayRef,
    lengths: &[usize],
    row_nulls: Option<&[bool]>,
) -> anyhow::Result<ArrayRef> {
    let fields = Fields::from(vec![
        Field::new("keys", keys.data_type().clone(), false),
        Field::new("values", values.data_type().clone(), true),
    ]);
    let entries = StructArray::try_new(fields.clone(), vec![keys, values], None)?;
    let field = Arc::new(Field::new("entries", DataType::Struct(fields), false));
    let offsets = OffsetBuffer::from_lengths(lengths.iter().copied());
    Ok(Arc::new(MapArray::try_new(
        field,
        offsets,
        entries,
        null_buffer(row_nulls),
        false,
    )?))
}

/// Builds a `Map<Int64, Int64>` array, one row per entry list.
pub fn make_map_vector(rows: &[Vec<(i64, Option<i64>)>]) -> anyhow::Result<ArrayRef> {
    let keys = int64_array(rows.iter().flatten().map(|(key, _)| Some(*key)));
    let values = int64_array(rows.iter().flatten().map(|(_, value)| *value));
    let lengths = rows.iter().map(Vec::len).collect::<Vec<_>>();
    make_map(keys, values, &lengths, None)
}

/// Builds a struct array with one nullable field per `(name, column)` pair.
pub fn make_struct(
    columns: Vec<(&str, ArrayRef)>,
    row_nulls: Option<&[bool]>,
) -> anyhow::Result<ArrayRef> {
    let fields = columns
        .iter()
        .map(|(name, column)| Field::new(*name, column.data_type().clone(), true))
        .collect::<Fields>();
    let arrays = columns.into_iter().map(|(_, column)| column).collect();
    Ok(Arc::new(StructArray::try_new(
        fields,
        arrays,
        null_buffer(row_nulls),
    )?))
}

/// Gathers the rows of `array` at `indices`; a `None` index yields a null row.
pub fn take(
    array: &ArrayRef,
    indices: impl IntoIterator<Item = Option<u32>>,
) -> anyhow::Result<ArrayRef> {
    let indices = UInt32Array::from_iter(indices);
    Ok(arrow_select::take::take(array.as_ref(), &indices, None)?)
}

/// Re-encodes a flat `array` without changing its logical values.
///
/// - `Dictionary`: the values are stored in reverse order and every other
///   null row is expressed as a null key instead of a null value.
/// - `RunEnd`: one run per row.
pub fn encode(array: &ArrayRef, encoding: Encoding) -> anyhow::Result<ArrayRef> {
    let len = array.len();
    match encoding {
        Encoding::Flat => Ok(array.clone()),
        Encoding::Dictionary => {
            let reversed = take(array, (0..len as u32).rev().map(Some))?;
            let keys = (0..len).map(|row| {
                if array.is_null(row) && row % 2 == 0 {
                    None
                } else {
                    Some((len - 1 - row) as i32)
                }
            });
            Ok(encoding::dictionary(reversed, keys)?)
        }
        Encoding::RunEnd => Ok(encoding::run_ends(array, &vec![1; len])?),
    }
}
