use std::sync::Arc;

use arrow_array::Array as _;
use arrow_schema::{DataType, Field, Fields};
use colview_testkit::fuzzer::{FuzzerOptions, VectorFuzzer};
use colview_vector::DecodedVector;

use crate::{Array, Map, Row, VectorReader, Varchar, create_reader};

const ITERATIONS: usize = 20;

fn list_of(data_type: DataType) -> DataType {
    DataType::List(Arc::new(Field::new_list_field(data_type, true)))
}

fn map_of(key: DataType, value: DataType) -> DataType {
    let entries = Field::new(
        "entries",
        DataType::Struct(Fields::from(vec![
            Field::new("keys", key, false),
            Field::new("values", value, true),
        ])),
        false,
    );
    DataType::Map(Arc::new(entries), false)
}

fn fuzzer(seed: u64) -> VectorFuzzer {
    VectorFuzzer::new(FuzzerOptions {
        vector_size: 64,
        seed,
        ..Default::default()
    })
}

/// Checks that the readers over the encoded and flat vectors agree on values,
/// on nullness and on nested nulls.
macro_rules! check_fuzzed {
    ($arg:ty, $data_type:expr, $seed:expr) => {{
        let mut fuzzer = fuzzer($seed);
        for _ in 0..ITERATIONS {
            let vector = fuzzer.fuzz(&$data_type)?;
            let flat = DecodedVector::decode_all(&vector.flat)?;
            let encoded = DecodedVector::decode_all(&vector.encoded)?;
            let mut expected = create_reader::<$arg>(&flat)?;
            let mut actual = create_reader::<$arg>(&encoded)?;

            for row in 0..expected.len() {
                assert_eq!(expected.is_set(row), vector.flat.is_valid(row));
            }
            assert_readers_equal!(expected, actual);

            expected.set_children_may_have_nulls()?;
            actual.set_children_may_have_nulls()?;
            for row in 0..expected.len() {
                assert_eq!(expected.contains_null(row), actual.contains_null(row), "row {row}");
            }
        }
    }};
}

#[test]
fn test_fuzz_arrays() -> anyhow::Result<()> {
    check_fuzzed!(Array<i64>, list_of(DataType::Int64), 1);
    check_fuzzed!(Array<Varchar>, list_of(DataType::Utf8), 2);
    check_fuzzed!(Array<Array<i32>>, list_of(list_of(DataType::Int32)), 3);
    Ok(())
}

#[test]
fn test_fuzz_maps() -> anyhow::Result<()> {
    check_fuzzed!(Map<i64, Varchar>, map_of(DataType::Int64, DataType::Utf8), 4);
    check_fuzzed!(
        Map<Varchar, Array<f64>>,
        map_of(DataType::Utf8, list_of(DataType::Float64)),
        5
    );
    Ok(())
}

#[test]
fn test_fuzz_rows() -> anyhow::Result<()> {
    let data_type = DataType::Struct(Fields::from(vec![
        Field::new("a", DataType::Int64, true),
        Field::new("b", list_of(DataType::Boolean), true),
    ]));
    let mut fuzzer = fuzzer(6);
    for _ in 0..ITERATIONS {
        let vector = fuzzer.fuzz(&data_type)?;
        let flat = DecodedVector::decode_all(&vector.flat)?;
        let encoded = DecodedVector::decode_all(&vector.encoded)?;
        let expected = create_reader::<Row<(i64, Array<bool>)>>(&flat)?;
        let actual = create_reader::<Row<(i64, Array<bool>)>>(&encoded)?;

        for row in 0..expected.len() {
            assert_eq!(expected.is_set(row), actual.is_set(row), "row {row}");
            let (Some(e), Some(a)) = (expected.read(row), actual.read(row)) else {
                continue;
            };
            let (e_a, e_b) = e.fields();
            let (a_a, a_b) = a.fields();
            assert_eq!(e_a.to_option(), a_a.to_option());
            assert_eq!(e_b.has_value(), a_b.has_value());
            if e_b.has_value() {
                assert!(e_b.value() == a_b.value(), "row {row}");
            }
        }
    }
    Ok(())
}

#[test]
fn test_fuzz_null_free() -> anyhow::Result<()> {
    let mut fuzzer = VectorFuzzer::new(FuzzerOptions {
        vector_size: 32,
        null_ratio: 0.0,
        seed: 7,
        ..Default::default()
    });
    for _ in 0..ITERATIONS {
        let vector = fuzzer.fuzz(&list_of(DataType::Int64))?;
        let flat = DecodedVector::decode_all(&vector.flat)?;
        let encoded = DecodedVector::decode_all(&vector.encoded)?;
        let mut expected = create_reader::<Array<i64>>(&flat)?;
        let mut actual = create_reader::<Array<i64>>(&encoded)?;
        expected.set_children_may_have_nulls()?;
        actual.set_children_may_have_nulls()?;
        assert!(!actual.may_have_nulls_recursive());

        for row in 0..expected.len() {
            let e = expected.read_null_free(row).iter().collect::<Vec<_>>();
            let a = actual.read_null_free(row).iter().collect::<Vec<_>>();
            assert_eq!(e, a, "row {row}");
        }
    }
    Ok(())
}
