use std::borrow::Cow;

use colview_testkit::builders::{int64_array, make_array_vector, string_array};
use colview_vector::{DecodedArgs, DecodedVector, SelectivityVector};

use crate::{
    Array, ArgType, VectorReader, Varchar, Variadic, reader::variadic::VariadicReader,
};

fn args() -> anyhow::Result<DecodedArgs> {
    let columns = vec![
        string_array([Some("f"), Some("g"), Some("h")]),
        int64_array([Some(1), None, Some(3)]),
        int64_array([Some(10), Some(20), Some(30)]),
    ];
    Ok(DecodedArgs::decode(&columns, &SelectivityVector::all(3))?)
}

#[test]
fn test_trailing_arguments() -> anyhow::Result<()> {
    let args = args()?;
    let name = Varchar::create_reader_from_args(&args, 0)?;
    let rest = Variadic::<i64>::create_reader_from_args(&args, 1)?;
    assert_eq!(rest.arg_count(), 2);
    assert_eq!(rest.len(), 3);
    assert!(!rest.may_have_nulls());

    assert_eq!(name.get(0), "f");
    let view = rest.get(0);
    assert_eq!(view.len(), 2);
    assert!(view.at(0) == Some(1i64));
    assert!(view.at(1) == Some(10i64));

    let view = rest.get(1);
    assert!(rest.is_set(1));
    assert!(!view.at(0).has_value());
    assert_eq!(
        view.iter().map(|e| e.to_option()).collect::<Vec<_>>(),
        vec![None, Some(20)]
    );
    let total = rest
        .get(2)
        .into_iter()
        .filter_map(|e| e.to_option())
        .sum::<i64>();
    assert_eq!(total, 33);
    Ok(())
}

#[test]
fn test_empty_tail() -> anyhow::Result<()> {
    let args = args()?;
    let rest = Variadic::<i64>::create_reader_from_args(&args, 3)?;
    assert_eq!(rest.arg_count(), 0);
    assert_eq!(rest.len(), 3);
    assert!(rest.get(0).is_empty());
    assert_eq!(rest.get(2).iter().count(), 0);

    assert!(Variadic::<i64>::create_reader_from_args(&args, 4).is_err());
    Ok(())
}

#[test]
fn test_type_mismatch_in_tail() -> anyhow::Result<()> {
    let args = args()?;
    let error = Variadic::<i64>::create_reader_from_args(&args, 0).err().unwrap();
    assert!(error.is_type_mismatch());
    Ok(())
}

#[test]
fn test_null_propagation() -> anyhow::Result<()> {
    let args = args()?;
    let mut rest = Variadic::<i64>::create_reader_from_args(&args, 1)?;
    rest.set_children_may_have_nulls()?;
    assert!(rest.may_have_nulls_recursive());
    assert!(!rest.contains_null(0));
    assert!(rest.contains_null(1));
    assert!(!rest.contains_null(2));

    let mut last = Variadic::<i64>::create_reader_from_args(&args, 2)?;
    last.set_children_may_have_nulls()?;
    assert!(!last.may_have_nulls_recursive());
    let view = last.read_null_free(1);
    assert_eq!(view.len(), 1);
    assert_eq!(view.at(0), 20);
    assert_eq!(view.iter().collect::<Vec<_>>(), vec![20]);
    Ok(())
}

#[test]
fn test_nested_elements() -> anyhow::Result<()> {
    let columns = vec![
        make_array_vector(&[1, 2], |j| j as i64, |_| false)?,
        make_array_vector(&[0, 1], |j| 100 + j as i64, |_| true)?,
    ];
    let args = DecodedArgs::decode(&columns, &SelectivityVector::all(2))?;
    let mut reader = Variadic::<Array<i64>>::create_reader_from_args(&args, 0)?;
    reader.set_children_may_have_nulls()?;

    let view = reader.get(1);
    assert_eq!(view.at(0).value().len(), 2);
    assert!(view.at(1).value().at(0) == None::<i64>);
    assert!(!reader.contains_null(0));
    assert!(reader.contains_null(1));
    Ok(())
}

#[test]
fn test_single_column() -> anyhow::Result<()> {
    let column = DecodedVector::decode_all(&int64_array([Some(5), Some(6)]))?;
    let reader = crate::create_reader::<Variadic<i64>>(&column)?;
    assert_eq!(reader.arg_count(), 1);
    assert!(reader.get(1).at(0) == Some(6i64));
    Ok(())
}

#[test]
fn test_row_count_mismatch() -> anyhow::Result<()> {
    let short = DecodedVector::decode_all(&int64_array([Some(1)]))?;
    let long = DecodedVector::decode_all(&int64_array([Some(1), Some(2)]))?;
    let result =
        VariadicReader::<i64>::from_columns([Cow::Borrowed(&short), Cow::Borrowed(&long)]);
    assert!(result.is_err());
    Ok(())
}
