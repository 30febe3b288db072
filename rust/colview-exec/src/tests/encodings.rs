use std::sync::Arc;

use arrow_array::{ArrayRef, new_null_array};
use arrow_schema::{DataType, Field};
use colview_testkit::builders::{
    Encoding, encode, int64_array, make_array_vector, make_list, make_map_vector, make_struct,
    string_array,
};
use colview_vector::{DecodedVector, SelectivityVector, encoding};

use crate::{Array, Map, Row, VectorReader, Varchar, create_reader};

fn lists() -> anyhow::Result<ArrayRef> {
    let values = int64_array([Some(1), None, Some(3), Some(4), Some(5), None]);
    make_list(values, &[2, 0, 3, 1], Some(&[false, true, false, false]))
}

fn maps() -> anyhow::Result<ArrayRef> {
    make_map_vector(&[
        vec![(1, Some(10))],
        vec![],
        vec![(2, None), (3, Some(30))],
        vec![(1, Some(10)), (1, Some(11))],
    ])
}

#[test]
fn test_arrays_across_encodings() -> anyhow::Result<()> {
    let flat = lists()?;
    let expected = DecodedVector::decode_all(&flat)?;
    let expected = create_reader::<Array<i64>>(&expected)?;

    for encoding in Encoding::ALL {
        let decoded = DecodedVector::decode_all(&encode(&flat, encoding)?)?;
        let reader = create_reader::<Array<i64>>(&decoded)?;
        assert_readers_equal!(expected, reader);
    }
    Ok(())
}

#[test]
fn test_maps_across_encodings() -> anyhow::Result<()> {
    let flat = maps()?;
    let expected = DecodedVector::decode_all(&flat)?;
    let expected = create_reader::<Map<i64, i64>>(&expected)?;

    for encoding in Encoding::ALL {
        let decoded = DecodedVector::decode_all(&encode(&flat, encoding)?)?;
        let reader = create_reader::<Map<i64, i64>>(&decoded)?;
        assert_readers_equal!(expected, reader);
    }
    Ok(())
}

#[test]
fn test_constant_encoding() -> anyhow::Result<()> {
    let flat = maps()?;
    let expected = DecodedVector::decode_all(&flat)?;
    let expected = create_reader::<Map<i64, i64>>(&expected)?;

    let constant = DecodedVector::decode_all(&encoding::constant(&flat, 2, 50)?)?;
    assert!(constant.is_constant_mapping());
    let reader = create_reader::<Map<i64, i64>>(&constant)?;
    assert_eq!(reader.len(), 50);
    for row in [0, 17, 49] {
        assert!(reader.get(row) == expected.get(2));
    }

    let nulls = lists()?;
    let constant = DecodedVector::decode_all(&encoding::constant(&nulls, 1, 4)?)?;
    let mut reader = create_reader::<Array<i64>>(&constant)?;
    reader.set_children_may_have_nulls()?;
    assert!((0..4).all(|row| !reader.is_set(row)));
    assert!(reader.contains_null_range(0, 4));
    Ok(())
}

#[test]
fn test_nested_dictionaries() -> anyhow::Result<()> {
    let flat = lists()?;
    let twice = encode(&encode(&flat, Encoding::Dictionary)?, Encoding::Dictionary)?;
    let decoded = DecodedVector::decode_all(&twice)?;
    let reader = create_reader::<Array<i64>>(&decoded)?;
    let expected = DecodedVector::decode_all(&flat)?;
    let expected = create_reader::<Array<i64>>(&expected)?;
    assert_readers_equal!(expected, reader);
    Ok(())
}

#[test]
fn test_dictionary_encoded_children() -> anyhow::Result<()> {
    let values = string_array([Some("x"), None, Some("z"), Some("x")]);
    let plain = make_list(values.clone(), &[1, 3], None)?;
    let wrapped = make_list(encode(&values, Encoding::Dictionary)?, &[1, 3], None)?;

    let plain = DecodedVector::decode_all(&plain)?;
    let wrapped = DecodedVector::decode_all(&wrapped)?;
    let expected = create_reader::<Array<Varchar>>(&plain)?;
    let reader = create_reader::<Array<Varchar>>(&wrapped)?;
    assert_readers_equal!(expected, reader);
    Ok(())
}

#[test]
fn test_rows_across_encodings() -> anyhow::Result<()> {
    let flat = make_struct(
        vec![
            ("n", int64_array([Some(1), None, Some(3)])),
            ("l", make_array_vector(&[1, 0, 2], |j| j as i64, |j| j == 2)?),
        ],
        Some(&[false, false, true]),
    )?;
    let expected = DecodedVector::decode_all(&flat)?;
    let expected = create_reader::<Row<(i64, Array<i64>)>>(&expected)?;

    for encoding in Encoding::ALL {
        let decoded = DecodedVector::decode_all(&encode(&flat, encoding)?)?;
        let reader = create_reader::<Row<(i64, Array<i64>)>>(&decoded)?;
        for row in 0..3 {
            match (expected.read(row), reader.read(row)) {
                (Some(e), Some(a)) => {
                    let (e_n, e_l) = e.fields();
                    let (a_n, a_l) = a.fields();
                    assert_eq!(e_n.to_option(), a_n.to_option());
                    assert_eq!(e_l.has_value(), a_l.has_value());
                    assert!(e_l.value() == a_l.value());
                }
                (None, None) => (),
                _ => panic!("row {row} nullness differs under {encoding:?}"),
            }
        }
    }
    Ok(())
}

#[test]
fn test_partial_selection() -> anyhow::Result<()> {
    let flat = maps()?;
    let encoded = encode(&flat, Encoding::Dictionary)?;
    let rows = SelectivityVector::from_positions([0, 2], 3);
    let decoded = DecodedVector::decode(&encoded, &rows)?;
    let reader = create_reader::<Map<i64, i64>>(&decoded)?;
    let expected = DecodedVector::decode_all(&flat)?;
    let expected = create_reader::<Map<i64, i64>>(&expected)?;

    assert_eq!(reader.len(), 3);
    for row in rows.iter() {
        assert!(reader.get(row) == expected.get(row));
    }
    Ok(())
}

#[test]
fn test_all_null_dictionaries() -> anyhow::Result<()> {
    let list = DataType::List(Arc::new(Field::new_list_field(DataType::Int64, true)));
    let dictionary = DataType::Dictionary(Box::new(DataType::Int32), Box::new(list));
    let decoded = DecodedVector::decode_all(&new_null_array(&dictionary, 4))?;
    let mut reader = create_reader::<Array<i64>>(&decoded)?;
    reader.set_children_may_have_nulls()?;
    assert_eq!(reader.len(), 4);
    assert!((0..4).all(|row| !reader.is_set(row) && reader.read(row).is_none()));
    assert!(reader.contains_null_range(0, 4));

    let dictionary = DataType::Dictionary(Box::new(DataType::Int16), Box::new(DataType::Utf8));
    let decoded = DecodedVector::decode_all(&new_null_array(&dictionary, 2))?;
    let reader = create_reader::<Varchar>(&decoded)?;
    assert!(reader.read(0).is_none() && reader.read(1).is_none());
    Ok(())
}
