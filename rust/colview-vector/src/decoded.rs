//! Resolution of encoded Arrow arrays into a selection-aware logical view.
//!
//! A [`DecodedVector`] hides the physical encoding of a column behind a small
//! index-based interface: `index(row)` maps a logical row to a position in the
//! flat [`base`](DecodedVector::base) array, and `is_null_at(row)` reports
//! nulls from every encoding layer combined.
//!
//! Supported encodings:
//! - flat arrays (anything that is neither dictionary nor run-end encoded),
//! - `DictionaryArray` with any integer key type, with nulls in the keys
//!   and/or the values,
//! - `RunArray` with `Int16`, `Int32` or `Int64` run ends. A single run is the
//!   constant encoding.
//!
//! Layers may be nested (for example, a dictionary over a run-end encoded
//! array); they are composed into a single mapping at decode time.

use std::sync::Arc;

use arrow_array::{
    Array, ArrayRef, RunArray,
    cast::AsArray,
    types::{Int16Type, Int32Type, Int64Type, RunEndIndexType},
};
use arrow_buffer::{BooleanBufferBuilder, NullBuffer};
use arrow_schema::DataType;
use colview_common::{Result, error::Error, verify_arg};

use crate::selectivity::SelectivityVector;

/// Mapping from logical rows to physical positions in the base array.
#[derive(Clone, Debug)]
pub enum IndexMapping {
    /// Logical row `i` is physical position `i`.
    Identity,
    /// Every logical row maps to the same physical position.
    Constant(usize),
    /// Explicit per-row table; entries of unselected rows are unspecified.
    Indices(Arc<[usize]>),
}

impl IndexMapping {
    #[inline]
    pub fn resolve(&self, row: usize) -> usize {
        match self {
            IndexMapping::Identity => row,
            IndexMapping::Constant(index) => *index,
            IndexMapping::Indices(indices) => indices[row],
        }
    }
}

#[derive(Clone, Debug)]
enum Nulls {
    /// No row is null.
    None,
    /// Nulls come from the base array only and are looked up by physical position.
    Base(NullBuffer),
    /// Nulls from wrapper layers combined with base nulls, by logical row.
    Logical(NullBuffer),
}

/// A column resolved for one decode pass.
///
/// Cloning is cheap: the base array, the index table and the null buffer are
/// all reference counted.
#[derive(Clone, Debug)]
pub struct DecodedVector {
    base: ArrayRef,
    mapping: IndexMapping,
    nulls: Nulls,
    size: usize,
}

impl DecodedVector {
    /// Decodes `array` for the rows selected in `rows`.
    ///
    /// # Errors
    ///
    /// Returns an error if `rows` spans more rows than `array` has, or if the
    /// array uses an encoding that cannot be resolved (for example, a run-end
    /// type other than `Int16`/`Int32`/`Int64`).
    pub fn decode(array: &ArrayRef, rows: &SelectivityVector) -> Result<DecodedVector> {
        verify_arg!(rows, rows.len() <= array.len());

        let size = rows.len();
        let mut base = array.clone();
        let mut mapping = IndexMapping::Identity;
        let mut wrapper_nulls: Option<BooleanBufferBuilder> = None;
        let mut layers = 0usize;

        while let Some(layer) = EncodingLayer::try_from_array(&base)? {
            layers += 1;
            let live = rows
                .iter()
                .filter(|&row| !wrapper_nulls.as_ref().is_some_and(|nulls| !nulls.get_bit(row)))
                .collect::<Vec<_>>();
            if live.is_empty() {
                base = layer.values().clone();
                continue;
            }

            match mapping {
                IndexMapping::Constant(outer) => match layer.resolve(&[outer])?[0] {
                    Some(inner) => mapping = IndexMapping::Constant(inner),
                    None => live
                        .iter()
                        .for_each(|&row| Self::set_null(&mut wrapper_nulls, size, row)),
                },
                _ => {
                    let positions = live
                        .iter()
                        .map(|&row| mapping.resolve(row))
                        .collect::<Vec<_>>();
                    let mut indices = vec![0usize; size];
                    let mut resolved = Vec::with_capacity(live.len());
                    for (&row, inner) in live.iter().zip(layer.resolve(&positions)?) {
                        match inner {
                            Some(inner) => {
                                indices[row] = inner;
                                resolved.push(row);
                            }
                            None => Self::set_null(&mut wrapper_nulls, size, row),
                        }
                    }
                    mapping = Self::simplify(indices, &resolved);
                }
            }
            base = layer.values().clone();
        }

        let base_nulls = base.logical_nulls().filter(|nulls| nulls.null_count() > 0);
        let nulls = match wrapper_nulls {
            Some(mut validity) => {
                if let Some(base_nulls) = &base_nulls {
                    for row in rows.iter() {
                        if validity.get_bit(row) && base_nulls.is_null(mapping.resolve(row)) {
                            validity.set_bit(row, false);
                        }
                    }
                }
                Nulls::Logical(NullBuffer::new(validity.finish()))
            }
            None => base_nulls.map_or(Nulls::None, Nulls::Base),
        };

        if layers > 0 {
            log::debug!(
                "decoded {layers} encoding layer(s) over {} base ({size} rows, {:?} mapping)",
                base.data_type(),
                MappingKind::of(&mapping),
            );
        }

        Ok(DecodedVector {
            base,
            mapping,
            nulls,
            size,
        })
    }

    /// Decodes every row of `array`.
    ///
    /// This is how nested readers decode their child columns: the windows of a
    /// list or map may reach any child position, so all of them are resolved.
    pub fn decode_all(array: &ArrayRef) -> Result<DecodedVector> {
        Self::decode(array, &SelectivityVector::all(array.len()))
    }

    /// Number of logical rows covered by this decode pass.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The innermost flat array that physical positions refer to.
    #[inline]
    pub fn base(&self) -> &ArrayRef {
        &self.base
    }

    /// Data type of the base array.
    #[inline]
    pub fn data_type(&self) -> &DataType {
        self.base.data_type()
    }

    #[inline]
    pub fn mapping(&self) -> &IndexMapping {
        &self.mapping
    }

    /// Maps a logical row to its physical position in [`base`](Self::base).
    #[inline]
    pub fn index(&self, row: usize) -> usize {
        self.mapping.resolve(row)
    }

    #[inline]
    pub fn is_null_at(&self, row: usize) -> bool {
        match &self.nulls {
            Nulls::None => false,
            Nulls::Base(nulls) => nulls.is_null(self.index(row)),
            Nulls::Logical(nulls) => nulls.is_null(row),
        }
    }

    /// Returns `false` only if no row can be null.
    #[inline]
    pub fn may_have_nulls(&self) -> bool {
        !matches!(self.nulls, Nulls::None)
    }

    #[inline]
    pub fn is_identity_mapping(&self) -> bool {
        matches!(self.mapping, IndexMapping::Identity)
    }

    #[inline]
    pub fn is_constant_mapping(&self) -> bool {
        matches!(self.mapping, IndexMapping::Constant(_))
    }

    /// Marks `row` null in the wrapper validity, allocating it on first use.
    fn set_null(validity: &mut Option<BooleanBufferBuilder>, size: usize, row: usize) {
        validity
            .get_or_insert_with(|| {
                let mut builder = BooleanBufferBuilder::new(size);
                builder.append_n(size, true);
                builder
            })
            .set_bit(row, false);
    }

    /// Collapses an index table whose non-null rows all point to the same
    /// position into a constant mapping.
    fn simplify(indices: Vec<usize>, live: &[usize]) -> IndexMapping {
        if let Some((&first, rest)) = live.split_first() {
            let value = indices[first];
            if rest.iter().all(|&row| indices[row] == value) {
                return IndexMapping::Constant(value);
            }
        }
        IndexMapping::Indices(indices.into())
    }
}

#[derive(Debug)]
enum MappingKind {
    Identity,
    Constant,
    Indices,
}

impl MappingKind {
    fn of(mapping: &IndexMapping) -> MappingKind {
        match mapping {
            IndexMapping::Identity => MappingKind::Identity,
            IndexMapping::Constant(_) => MappingKind::Constant,
            IndexMapping::Indices(_) => MappingKind::Indices,
        }
    }
}

/// One wrapper encoding peeled off an array: a position translation plus the
/// wrapped values.
enum EncodingLayer {
    Dictionary {
        /// Key per position, clamped into the values range.
        keys: Vec<usize>,
        key_nulls: Option<NullBuffer>,
        values: ArrayRef,
    },
    RunEnd {
        array: ArrayRef,
        physical_indices: fn(&ArrayRef, &[usize]) -> Result<Vec<usize>>,
        values: ArrayRef,
    },
}

impl EncodingLayer {
    fn try_from_array(array: &ArrayRef) -> Result<Option<EncodingLayer>> {
        match array.data_type() {
            DataType::Dictionary(_, _) => {
                let dict = array
                    .as_any_dictionary_opt()
                    .ok_or_else(|| Error::invalid_arg("array", "expected a dictionary array"))?;
                let values = dict.values().clone();
                // Keys over empty values can only be null.
                let (keys, key_nulls) = if values.is_empty() {
                    (Vec::new(), Some(NullBuffer::new_null(dict.len())))
                } else {
                    (dict.normalized_keys(), dict.keys().nulls().cloned())
                };
                Ok(Some(EncodingLayer::Dictionary {
                    keys,
                    key_nulls,
                    values,
                }))
            }
            DataType::RunEndEncoded(run_ends, _) => match run_ends.data_type() {
                DataType::Int16 => Self::run_ends::<Int16Type>(array).map(Some),
                DataType::Int32 => Self::run_ends::<Int32Type>(array).map(Some),
                DataType::Int64 => Self::run_ends::<Int64Type>(array).map(Some),
                other => Err(Error::not_implemented(format!("run end type {other}"))),
            },
            _ => Ok(None),
        }
    }

    fn run_ends<R: RunEndIndexType>(array: &ArrayRef) -> Result<EncodingLayer> {
        let values = Self::run_array::<R>(array)?.values().clone();
        Ok(EncodingLayer::RunEnd {
            array: array.clone(),
            physical_indices: Self::physical_indices::<R>,
            values,
        })
    }

    fn run_array<R: RunEndIndexType>(array: &ArrayRef) -> Result<&RunArray<R>> {
        array
            .as_any()
            .downcast_ref::<RunArray<R>>()
            .ok_or_else(|| Error::invalid_arg("array", "expected a run-end encoded array"))
    }

    fn physical_indices<R: RunEndIndexType>(
        array: &ArrayRef,
        positions: &[usize],
    ) -> Result<Vec<usize>> {
        let positions = positions
            .iter()
            .map(|&position| position as u64)
            .collect::<Vec<_>>();
        Ok(Self::run_array::<R>(array)?.get_physical_indices(&positions)?)
    }

    fn values(&self) -> &ArrayRef {
        match self {
            EncodingLayer::Dictionary { values, .. } | EncodingLayer::RunEnd { values, .. } => {
                values
            }
        }
    }

    /// Translates `positions` of this layer into positions of its values;
    /// `None` marks a null key.
    fn resolve(&self, positions: &[usize]) -> Result<Vec<Option<usize>>> {
        match self {
            EncodingLayer::Dictionary {
                keys, key_nulls, ..
            } => Ok(positions
                .iter()
                .map(|&position| {
                    if key_nulls
                        .as_ref()
                        .is_some_and(|nulls| nulls.is_null(position))
                    {
                        None
                    } else {
                        Some(keys[position])
                    }
                })
                .collect()),
            EncodingLayer::RunEnd {
                array,
                physical_indices,
                ..
            } => Ok(physical_indices(array, positions)?
                .into_iter()
                .map(Some)
                .collect()),
        }
    }
}
