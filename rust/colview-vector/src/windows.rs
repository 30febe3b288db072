//! Element windows of list-like and map columns.

use std::ops::Range;

use arrow_array::{Array, ArrayRef, cast::AsArray};
use arrow_buffer::{OffsetBuffer, ScalarBuffer};
use arrow_schema::DataType;
use colview_common::{Result, error::Error};

/// A contiguous run of child positions owned by one list or map entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub len: usize,
}

impl Window {
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Per-entry child windows of a list-like array, indexed by physical position
/// of the parent.
///
/// The windows refer to positions in the child array returned alongside them
/// by [`ListWindows::from_list`] or [`ListWindows::from_map`].
#[derive(Clone, Debug)]
pub enum ListWindows {
    /// `List` and `Map`: entry `i` spans `offsets[i]..offsets[i + 1]`.
    Offsets(OffsetBuffer<i32>),
    /// `LargeList`.
    LargeOffsets(OffsetBuffer<i64>),
    /// `ListView`: entry `i` spans `offsets[i]..offsets[i] + sizes[i]`.
    OffsetsAndSizes {
        offsets: ScalarBuffer<i32>,
        sizes: ScalarBuffer<i32>,
    },
    /// `LargeListView`.
    LargeOffsetsAndSizes {
        offsets: ScalarBuffer<i64>,
        sizes: ScalarBuffer<i64>,
    },
    /// `FixedSizeList`: entry `i` spans `i * size..(i + 1) * size`.
    FixedSize(usize),
}

impl ListWindows {
    /// Extracts the windows and the child values of a list-like array.
    pub fn from_list(array: &dyn Array) -> Result<(ListWindows, ArrayRef)> {
        match array.data_type() {
            DataType::List(_) => {
                let list = array.as_list::<i32>();
                Ok((
                    ListWindows::Offsets(list.offsets().clone()),
                    list.values().clone(),
                ))
            }
            DataType::LargeList(_) => {
                let list = array.as_list::<i64>();
                Ok((
                    ListWindows::LargeOffsets(list.offsets().clone()),
                    list.values().clone(),
                ))
            }
            DataType::ListView(_) => {
                let list = array.as_list_view::<i32>();
                Ok((
                    ListWindows::OffsetsAndSizes {
                        offsets: list.offsets().clone(),
                        sizes: list.sizes().clone(),
                    },
                    list.values().clone(),
                ))
            }
            DataType::LargeListView(_) => {
                let list = array.as_list_view::<i64>();
                Ok((
                    ListWindows::LargeOffsetsAndSizes {
                        offsets: list.offsets().clone(),
                        sizes: list.sizes().clone(),
                    },
                    list.values().clone(),
                ))
            }
            DataType::FixedSizeList(_, size) => {
                let list = array.as_fixed_size_list();
                Ok((
                    ListWindows::FixedSize(*size as usize),
                    list.values().clone(),
                ))
            }
            other => Err(Error::type_mismatch("a list type", other.to_string())),
        }
    }

    /// Extracts the windows, the keys and the values of a map array.
    pub fn from_map(array: &dyn Array) -> Result<(ListWindows, ArrayRef, ArrayRef)> {
        match array.data_type() {
            DataType::Map(_, _) => {
                let map = array.as_map();
                Ok((
                    ListWindows::Offsets(map.offsets().clone()),
                    map.keys().clone(),
                    map.values().clone(),
                ))
            }
            other => Err(Error::type_mismatch("Map", other.to_string())),
        }
    }

    /// Returns the child window of the entry at physical position `index`.
    #[inline]
    pub fn window(&self, index: usize) -> Window {
        match self {
            ListWindows::Offsets(offsets) => {
                let start = offsets[index] as usize;
                Window {
                    offset: start,
                    len: offsets[index + 1] as usize - start,
                }
            }
            ListWindows::LargeOffsets(offsets) => {
                let start = offsets[index] as usize;
                Window {
                    offset: start,
                    len: offsets[index + 1] as usize - start,
                }
            }
            ListWindows::OffsetsAndSizes { offsets, sizes } => Window {
                offset: offsets[index] as usize,
                len: sizes[index] as usize,
            },
            ListWindows::LargeOffsetsAndSizes { offsets, sizes } => Window {
                offset: offsets[index] as usize,
                len: sizes[index] as usize,
            },
            ListWindows::FixedSize(size) => Window {
                offset: index * size,
                len: *size,
            },
        }
    }
}
