use colview_testkit::builders::{
    Encoding, encode, int64_array, make_array_vector, make_map_vector, make_struct, string_array,
};
use colview_vector::DecodedVector;

use crate::{Array, Map, Row, VectorReader, Varchar, create_reader};

fn people() -> anyhow::Result<arrow_array::ArrayRef> {
    make_struct(
        vec![
            ("id", int64_array([Some(1), Some(2), None, Some(4)])),
            ("name", string_array([Some("ann"), None, Some("cy"), Some("dee")])),
        ],
        Some(&[false, false, false, true]),
    )
}

#[test]
fn test_fields() -> anyhow::Result<()> {
    let decoded = DecodedVector::decode_all(&people()?)?;
    let reader = create_reader::<Row<(i64, Varchar)>>(&decoded)?;
    assert_eq!(reader.len(), 4);

    let row = reader.get(0);
    assert_eq!(row.len(), 2);
    let (id, name) = row.fields();
    assert_eq!(id.to_option(), Some(1));
    assert!(name == Some("ann"));

    let (id, name) = reader.get(1).fields();
    assert!(id == Some(2i64));
    assert!(!name.has_value());
    assert!(!reader.get(1).is_field_set(1));
    assert!(reader.get(1).is_field_set(0));

    let (id, name) = reader.get(2).fields();
    assert!(id == None::<i64>);
    assert_eq!(name.value(), "cy");

    assert!(!reader.is_set(3));
    assert!(reader.read(3).is_none());
    Ok(())
}

#[test]
fn test_encoded_rows_use_physical_field_positions() -> anyhow::Result<()> {
    let array = people()?;
    for encoding in Encoding::ALL {
        let decoded = DecodedVector::decode_all(&encode(&array, encoding)?)?;
        let reader = create_reader::<Row<(i64, Varchar)>>(&decoded)?;
        let names = (0..reader.len())
            .map(|row| reader.read(row).and_then(|view| view.fields().1.to_option()))
            .collect::<Vec<_>>();
        assert_eq!(names, vec![Some("ann"), None, Some("cy"), None], "{encoding:?}");
    }
    Ok(())
}

#[test]
fn test_contains_null() -> anyhow::Result<()> {
    let decoded = DecodedVector::decode_all(&people()?)?;
    let mut reader = create_reader::<Row<(i64, Varchar)>>(&decoded)?;
    reader.set_children_may_have_nulls()?;

    assert!(reader.may_have_nulls_recursive());
    assert!(!reader.contains_null(0));
    assert!(reader.contains_null(1));
    assert!(reader.contains_null(2));
    assert!(reader.contains_null(3));
    Ok(())
}

#[test]
fn test_null_free_values() -> anyhow::Result<()> {
    let array = make_struct(
        vec![
            ("a", int64_array([Some(7), Some(8)])),
            ("b", string_array([Some("x"), Some("y")])),
        ],
        None,
    )?;
    let decoded = DecodedVector::decode_all(&array)?;
    let mut reader = create_reader::<Row<(i64, Varchar)>>(&decoded)?;
    reader.set_children_may_have_nulls()?;
    assert!(!reader.may_have_nulls_recursive());

    let (a, b) = reader.read_null_free(1);
    assert_eq!(a, 8);
    assert_eq!(b, "y");
    Ok(())
}

#[test]
fn test_nested_field() -> anyhow::Result<()> {
    let lists = make_array_vector(&[2, 1], |j| j as i64, |j| j == 2)?;
    let array = make_struct(
        vec![("values", lists), ("count", int64_array([Some(2), Some(1)]))],
        None,
    )?;
    let decoded = DecodedVector::decode_all(&array)?;
    let mut reader = create_reader::<Row<(Array<i64>, i64)>>(&decoded)?;
    reader.set_children_may_have_nulls()?;

    let (values, count) = reader.get(0).fields();
    assert_eq!(values.value().len() as i64, count.value());
    assert!(values.value().at(1) == Some(1i64));
    assert!(!reader.contains_null(0));
    assert!(reader.contains_null(1));
    Ok(())
}

#[test]
fn test_arity_mismatch() -> anyhow::Result<()> {
    let decoded = DecodedVector::decode_all(&people()?)?;
    let error = create_reader::<Row<(i64,)>>(&decoded).err().unwrap();
    assert!(error.is_type_mismatch());
    let error = create_reader::<Row<(i64, i64)>>(&decoded).err().unwrap();
    assert!(error.is_type_mismatch());
    Ok(())
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_field_position_out_of_bounds() {
    let decoded = DecodedVector::decode_all(&people().unwrap()).unwrap();
    let reader = create_reader::<Row<(i64, Varchar)>>(&decoded).unwrap();
    reader.get(0).is_field_set(2);
}

#[test]
fn test_nested_field_accessors_outlive_the_view() -> anyhow::Result<()> {
    let array = make_struct(
        vec![
            ("id", int64_array([Some(1), Some(2)])),
            ("tags", make_array_vector(&[2, 1], |j| j as i64 * 10, |_| false)?),
            ("attrs", make_map_vector(&[vec![(1, Some(7))], vec![]])?),
        ],
        None,
    )?;
    let decoded = DecodedVector::decode_all(&array)?;
    let mut reader = create_reader::<Row<(i64, Array<i64>, Map<i64, i64>)>>(&decoded)?;
    reader.set_children_may_have_nulls()?;
    assert!(!reader.may_have_nulls_recursive());

    let rows = (0..reader.len())
        .map(|row| reader.get(row).fields())
        .collect::<Vec<_>>();
    let (id, tags, attrs) = &rows[0];
    assert_eq!(id.value(), 1);
    assert_eq!(tags.value().iter().map(|tag| tag.value()).collect::<Vec<_>>(), [0, 10]);
    assert!(attrs.value().at(0) == (1i64, Some(7i64)));
    let (id, tags, attrs) = &rows[1];
    assert_eq!(id.value(), 2);
    assert_eq!(tags.value().len(), 1);
    assert!(attrs.value().is_empty());

    let (id, tags, attrs) = reader.read_null_free(0);
    assert_eq!(id, 1);
    assert_eq!(tags.iter().collect::<Vec<_>>(), [0, 10]);
    assert_eq!(attrs.iter().collect::<Vec<_>>(), [(1, 7)]);
    Ok(())
}
