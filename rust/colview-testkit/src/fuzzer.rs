//! Seeded random arrays for reader tests.
//!
//! [`VectorFuzzer::fuzz`] returns an array that may be dictionary, run-end or
//! constant encoded at the top level (and dictionary encoded below it),
//! paired with a flat array holding the same logical values.

use std::sync::Arc;

use arrow_array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int32Array, Int64Array, ListArray, MapArray,
    StringArray, StructArray,
};
use arrow_buffer::{NullBuffer, OffsetBuffer};
use arrow_schema::{DataType, Field, Fields};
use colview_vector::encoding;

use crate::builders::{Encoding, encode, take};

#[derive(Clone, Debug)]
pub struct FuzzerOptions {
    /// Number of rows of a top-level vector.
    pub vector_size: usize,
    /// Probability of a null at any position, `0.0..=1.0`.
    pub null_ratio: f64,
    /// Maximum number of elements in a list or map row.
    pub container_length: usize,
    /// Probability of wrapping a vector in an encoding layer.
    pub encoding_probability: f64,
    pub seed: u64,
}

impl Default for FuzzerOptions {
    fn default() -> Self {
        FuzzerOptions {
            vector_size: 100,
            null_ratio: 0.1,
            container_length: 5,
            encoding_probability: 0.3,
            seed: 0x5eed,
        }
    }
}

/// A fuzzed vector and its flat equivalent.
pub struct FuzzedVector {
    pub encoded: ArrayRef,
    pub flat: ArrayRef,
}

pub struct VectorFuzzer {
    options: FuzzerOptions,
    rng: fastrand::Rng,
}

impl VectorFuzzer {
    pub fn new(options: FuzzerOptions) -> VectorFuzzer {
        let rng = fastrand::Rng::with_seed(options.seed);
        VectorFuzzer { options, rng }
    }

    pub fn options(&self) -> &FuzzerOptions {
        &self.options
    }

    /// Generates a vector of `options.vector_size` rows, possibly wrapped in a
    /// dictionary, run-end or constant layer.
    pub fn fuzz(&mut self, data_type: &DataType) -> anyhow::Result<FuzzedVector> {
        let size = self.options.vector_size;
        if size == 0 || !self.coin(self.options.encoding_probability) {
            let flat = self.fuzz_flat(data_type, size)?;
            return Ok(FuzzedVector {
                encoded: flat.clone(),
                flat,
            });
        }

        match self.rng.usize(0..3) {
            0 => {
                let base_len = (size / 2).max(1);
                let base = self.fuzz_flat(data_type, base_len)?;
                let keys = (0..size)
                    .map(|_| {
                        if self.coin(self.options.null_ratio) {
                            None
                        } else {
                            Some(self.rng.usize(..base_len) as u32)
                        }
                    })
                    .collect::<Vec<_>>();
                let flat = take(&base, keys.iter().copied())?;
                let encoded =
                    encoding::dictionary(base, keys.iter().map(|key| key.map(|k| k as i32)))?;
                Ok(FuzzedVector { encoded, flat })
            }
            1 => {
                let mut runs = Vec::new();
                let mut remaining = size;
                while remaining > 0 {
                    let run = self.rng.usize(1..=3).min(remaining);
                    runs.push(run);
                    remaining -= run;
                }
                let base = self.fuzz_flat(data_type, runs.len())?;
                let expanded = runs
                    .iter()
                    .enumerate()
                    .flat_map(|(run, &len)| std::iter::repeat_n(Some(run as u32), len))
                    .collect::<Vec<_>>();
                let flat = take(&base, expanded)?;
                let encoded = encoding::run_ends(&base, &runs)?;
                Ok(FuzzedVector { encoded, flat })
            }
            _ => {
                let base = self.fuzz_flat(data_type, 1)?;
                let flat = take(&base, std::iter::repeat_n(Some(0), size))?;
                let encoded = encoding::constant(&base, 0, size)?;
                Ok(FuzzedVector { encoded, flat })
            }
        }
    }

    /// Generates a flat vector of `len` rows. Children of nested types may be
    /// dictionary encoded; map keys never are, and never contain nulls.
    pub fn fuzz_flat(&mut self, data_type: &DataType, len: usize) -> anyhow::Result<ArrayRef> {
        let null_ratio = self.options.null_ratio;
        self.fuzz_values(data_type, len, null_ratio)
    }

    fn fuzz_values(
        &mut self,
        data_type: &DataType,
        len: usize,
        null_ratio: f64,
    ) -> anyhow::Result<ArrayRef> {
        let nulls = self.nulls(len, null_ratio);
        let is_valid = |row: usize| nulls.as_ref().is_none_or(|nulls| nulls.is_valid(row));
        let array: ArrayRef = match data_type {
            DataType::Boolean => Arc::new(BooleanArray::from_iter(
                (0..len).map(|row| is_valid(row).then(|| self.rng.bool())),
            )),
            DataType::Int32 => Arc::new(Int32Array::from_iter(
                (0..len).map(|row| is_valid(row).then(|| self.rng.i32(-1000..1000))),
            )),
            DataType::Int64 => Arc::new(Int64Array::from_iter(
                (0..len).map(|row| is_valid(row).then(|| self.rng.i64(-1000..1000))),
            )),
            DataType::Float64 => Arc::new(Float64Array::from_iter(
                (0..len).map(|row| is_valid(row).then(|| self.rng.f64())),
            )),
            DataType::Utf8 => {
                let values = (0..len)
                    .map(|row| {
                        is_valid(row).then(|| {
                            let len = self.rng.usize(0..8);
                            std::iter::repeat_with(|| self.rng.alphanumeric())
                                .take(len)
                                .collect::<String>()
                        })
                    })
                    .collect::<Vec<_>>();
                Arc::new(StringArray::from(values))
            }
            DataType::List(field) => {
                let lengths = self.lengths(len, nulls.as_ref());
                let total = lengths.iter().sum();
                let values = self.fuzz_child(field.data_type(), total)?;
                let field = Arc::new(Field::new_list_field(values.data_type().clone(), true));
                Arc::new(ListArray::try_new(
                    field,
                    OffsetBuffer::from_lengths(lengths),
                    values,
                    nulls,
                )?)
            }
            DataType::Map(entries, _) => {
                let DataType::Struct(entry_fields) = entries.data_type() else {
                    anyhow::bail!("map entries must be a struct: {}", entries.data_type());
                };
                anyhow::ensure!(entry_fields.len() == 2, "map entries must have two fields");
                let lengths = self.lengths(len, nulls.as_ref());
                let total = lengths.iter().sum();
                let keys = self.fuzz_values(entry_fields[0].data_type(), total, 0.0)?;
                let values = self.fuzz_child(entry_fields[1].data_type(), total)?;
                let fields = Fields::from(vec![
                    Field::new("keys", keys.data_type().clone(), false),
                    Field::new("values", values.data_type().clone(), true),
                ]);
                let entries = StructArray::try_new(fields.clone(), vec![keys, values], None)?;
                let field = Arc::new(Field::new("entries", DataType::Struct(fields), false));
                Arc::new(MapArray::try_new(
                    field,
                    OffsetBuffer::from_lengths(lengths),
                    entries,
                    nulls,
                    false,
                )?)
            }
            DataType::Struct(fields) => {
                let columns = fields
                    .iter()
                    .map(|field| self.fuzz_child(field.data_type(), len))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                let fields = fields
                    .iter()
                    .zip(&columns)
                    .map(|(field, column)| {
                        Field::new(field.name(), column.data_type().clone(), true)
                    })
                    .collect::<Fields>();
                Arc::new(StructArray::try_new(fields, columns, nulls)?)
            }
            other => anyhow::bail!("unsupported data type for fuzzing: {other}"),
        };
        Ok(array)
    }

    /// A child column: flat, or dictionary encoded with the same values.
    fn fuzz_child(&mut self, data_type: &DataType, len: usize) -> anyhow::Result<ArrayRef> {
        let flat = self.fuzz_flat(data_type, len)?;
        if len > 0 && self.coin(self.options.encoding_probability) {
            encode(&flat, Encoding::Dictionary)
        } else {
            Ok(flat)
        }
    }

    fn nulls(&mut self, len: usize, null_ratio: f64) -> Option<NullBuffer> {
        if null_ratio <= 0.0 {
            return None;
        }
        let validity = (0..len)
            .map(|_| !self.coin(null_ratio))
            .collect::<Vec<_>>();
        Some(NullBuffer::from(validity))
    }

    /// Row lengths of a list or map; null rows are empty.
    fn lengths(&mut self, len: usize, nulls: Option<&NullBuffer>) -> Vec<usize> {
        (0..len)
            .map(|row| {
                if nulls.is_some_and(|nulls| nulls.is_null(row)) {
                    0
                } else {
                    self.rng.usize(0..=self.options.container_length)
                }
            })
            .collect()
    }

    fn coin(&mut self, probability: f64) -> bool {
        self.rng.f64() < probability
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow_array::Array;
    use arrow_schema::{DataType, Field};

    use super::{FuzzerOptions, VectorFuzzer};

    #[test]
    fn test_fuzz_is_deterministic() {
        let data_type = DataType::List(Arc::new(Field::new_list_field(DataType::Int64, true)));
        let mut first = VectorFuzzer::new(FuzzerOptions::default());
        let mut second = VectorFuzzer::new(FuzzerOptions::default());
        for _ in 0..5 {
            let a = first.fuzz(&data_type).unwrap();
            let b = second.fuzz(&data_type).unwrap();
            assert_eq!(a.flat.to_data(), b.flat.to_data());
            assert_eq!(a.encoded.len(), a.flat.len());
        }
    }

    #[test]
    fn test_fuzz_without_nulls() {
        let mut fuzzer = VectorFuzzer::new(FuzzerOptions {
            null_ratio: 0.0,
            encoding_probability: 1.0,
            ..Default::default()
        });
        for _ in 0..10 {
            let vector = fuzzer.fuzz(&DataType::Utf8).unwrap();
            assert_eq!(vector.flat.len(), 100);
            assert_eq!(vector.flat.null_count(), 0);
            assert!(vector.encoded.logical_nulls().is_none_or(|n| n.null_count() == 0));
        }
    }
}
