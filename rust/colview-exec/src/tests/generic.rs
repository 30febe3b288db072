use std::{cmp::Ordering, rc::Rc};

use arrow_schema::DataType;
use colview_testkit::builders::{
    Encoding, encode, int64_array, make_array_vector, make_map_vector, string_array,
};
use colview_vector::DecodedVector;

use crate::{
    AnyType, Array, Generic, Map, TypeVariable, VectorReader, Varchar, Variadic, create_reader,
    reader::generic::CAST_CACHE_SLOTS,
};

#[test]
fn test_cast_to_matching_type() -> anyhow::Result<()> {
    let decoded = DecodedVector::decode_all(&int64_array([Some(5), None]))?;
    let reader = create_reader::<Generic>(&decoded)?;

    let view = reader.get(0);
    assert_eq!(view.data_type(), &DataType::Int64);
    assert!(!view.is_null());
    let value = view.try_cast_to::<i64>().expect("bigint column");
    assert!(value.is_set());
    assert_eq!(value.get(), 5);
    assert_eq!(view.cast_to::<i64>()?.read(), Some(5));

    let null = reader.get(1);
    assert!(null.is_null());
    assert_eq!(null.cast_to::<i64>()?.read(), None);
    Ok(())
}

#[test]
fn test_cast_to_other_type_fails() -> anyhow::Result<()> {
    let decoded = DecodedVector::decode_all(&int64_array([Some(5)]))?;
    let reader = create_reader::<Generic<TypeVariable<1>>>(&decoded)?;
    let view = reader.get(0);

    assert!(view.try_cast_to::<Varchar>().is_none());
    assert!(view.try_cast_to::<i32>().is_none());
    let error = view.cast_to::<Varchar>().err().unwrap();
    assert!(error.is_type_mismatch());
    assert!(error.to_string().contains("varchar"));
    assert_eq!(reader.cached_casts(), 0);
    Ok(())
}

#[test]
fn test_try_cast_agrees_with_cast() -> anyhow::Result<()> {
    let lists = make_array_vector(&[2, 1], |j| j as i64, |_| false)?;
    let dictionary = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
    let nulls = arrow_array::new_null_array(&dictionary, 2);

    for array in [int64_array([Some(1), None]), lists, nulls] {
        let decoded = DecodedVector::decode_all(&array)?;
        let reader = create_reader::<Generic>(&decoded)?;
        for row in 0..reader.len() {
            let view = reader.get(row);
            assert_eq!(
                view.try_cast_to::<i64>().is_some(),
                view.cast_to::<i64>().is_ok()
            );
            assert_eq!(
                view.try_cast_to::<Varchar>().is_some(),
                view.cast_to::<Varchar>().is_ok()
            );
            assert_eq!(
                view.try_cast_to::<Array<i64>>().is_some(),
                view.cast_to::<Array<i64>>().is_ok()
            );
        }
    }
    Ok(())
}

#[test]
fn test_repeated_casts_share_a_reader() -> anyhow::Result<()> {
    let decoded = DecodedVector::decode_all(&int64_array([Some(1), Some(2), Some(3)]))?;
    let reader = create_reader::<Generic>(&decoded)?;

    let first = reader.get(0).cast_to::<i64>()?;
    let third = reader.get(2).cast_to::<i64>()?;
    assert!(Rc::ptr_eq(first.reader(), third.reader()));
    assert_eq!(first.get() + third.get(), 4);
    assert_eq!(reader.cached_casts(), 1);
    assert!(reader.is_last_cast::<i64>());
    Ok(())
}

#[test]
fn test_cache_keeps_most_recent_casts() -> anyhow::Result<()> {
    let decoded = DecodedVector::decode_all(&int64_array([Some(1)]))?;
    let reader = create_reader::<Generic>(&decoded)?;
    let view = reader.get(0);

    let original = view.cast_to::<i64>()?;
    view.cast_to::<Generic<AnyType>>()?;
    view.cast_to::<Generic<TypeVariable<1>>>()?;
    assert_eq!(reader.cached_casts(), CAST_CACHE_SLOTS);

    // Touching the bigint reader keeps it while the oldest slot is evicted.
    assert!(Rc::ptr_eq(original.reader(), view.cast_to::<i64>()?.reader()));
    view.cast_to::<Generic<TypeVariable<2>>>()?;
    assert_eq!(reader.cached_casts(), CAST_CACHE_SLOTS);
    assert!(Rc::ptr_eq(original.reader(), view.cast_to::<i64>()?.reader()));

    // Cycling through more types than slots evicts it.
    view.cast_to::<Variadic<i64>>()?;
    view.cast_to::<Generic<AnyType>>()?;
    view.cast_to::<Generic<TypeVariable<1>>>()?;
    assert!(reader.is_last_cast::<Generic<TypeVariable<1>>>());
    let recreated = view.cast_to::<i64>()?;
    assert!(!Rc::ptr_eq(original.reader(), recreated.reader()));
    assert_eq!(original.get(), recreated.get());
    Ok(())
}

#[test]
fn test_nested_generic_elements() -> anyhow::Result<()> {
    let array = make_array_vector(&[2, 1], |j| 10 * j as i64, |j| j == 1)?;
    let decoded = DecodedVector::decode_all(&array)?;
    let reader = create_reader::<Array<Generic>>(&decoded)?;

    let row = reader.get(0);
    let first = row.at(0).value();
    assert_eq!(first.cast_to::<i64>()?.get(), 0);
    assert!(!row.at(1).has_value());
    assert_eq!(reader.get(1).at(0).value().cast_to::<i64>()?.get(), 20);
    Ok(())
}

#[test]
fn test_cast_to_nested_type() -> anyhow::Result<()> {
    let array = make_map_vector(&[vec![(1, Some(2))], vec![(3, None), (4, Some(5))]])?;
    let decoded = DecodedVector::decode_all(&array)?;
    let reader = create_reader::<Generic>(&decoded)?;

    let cast = reader.get(1).cast_to::<Map<i64, i64>>()?;
    let map = cast.get();
    assert_eq!(map.len(), 2);
    assert!(map.at(1) == (4i64, Some(5i64)));
    assert!(reader.get(1).try_cast_to::<Array<i64>>().is_none());
    Ok(())
}

#[test]
fn test_compare_across_columns() -> anyhow::Result<()> {
    let left = DecodedVector::decode_all(&int64_array([Some(1), Some(5), None]))?;
    let right = DecodedVector::decode_all(&int64_array([Some(5), Some(1), None]))?;
    let left = create_reader::<Generic<TypeVariable<1>>>(&left)?;
    let right = create_reader::<Generic<TypeVariable<1>>>(&right)?;

    assert_eq!(left.get(0).compare(&right.get(1))?, Ordering::Equal);
    assert!(left.get(0).equals(&right.get(1))?);
    assert_eq!(left.get(0).compare(&right.get(0))?, Ordering::Less);
    assert_eq!(left.get(1).compare(&right.get(1))?, Ordering::Greater);
    assert_eq!(left.get(2).compare(&right.get(0))?, Ordering::Less);
    assert_eq!(left.get(0).compare(&right.get(2))?, Ordering::Greater);
    assert!(left.get(2).equals(&right.get(2))?);
    Ok(())
}

#[test]
fn test_compare_encoded_strings() -> anyhow::Result<()> {
    let flat = string_array([Some("b"), Some("a"), None]);
    let left = DecodedVector::decode_all(&flat)?;
    let right = DecodedVector::decode_all(&encode(&flat, Encoding::Dictionary)?)?;
    let left = create_reader::<Generic>(&left)?;
    let right = create_reader::<Generic>(&right)?;

    assert_eq!(right.get(0).data_type(), &DataType::Utf8);
    for row in 0..3 {
        assert!(left.get(row).equals(&right.get(row))?);
    }
    assert_eq!(left.get(1).compare(&right.get(0))?, Ordering::Less);
    assert_eq!(right.get(0).cast_to::<Varchar>()?.get(), "b");
    Ok(())
}

#[test]
fn test_compare_mismatched_types_fails() -> anyhow::Result<()> {
    let numbers = DecodedVector::decode_all(&int64_array([Some(1)]))?;
    let strings = DecodedVector::decode_all(&string_array([Some("1")]))?;
    let numbers = create_reader::<Generic>(&numbers)?;
    let strings = create_reader::<Generic>(&strings)?;
    assert!(numbers.get(0).compare(&strings.get(0)).is_err());
    Ok(())
}
