//! Argument types: the compile-time description of a function argument's shape.
//!
//! Every argument of a row-at-a-time function is declared by a type implementing
//! [`ArgType`]. The type selects the reader that navigates the argument column,
//! checks that the column's Arrow data type matches, and names the shape in
//! error messages.
//!
//! Scalar types are plain Rust types (`i64`, `bool`, ...) plus the markers
//! [`Varchar`], [`Varbinary`] and [`Date`]. Nested shapes are composed from
//! [`Array`], [`Map`], [`Row`], [`Variadic`] and [`Generic`]:
//!
//! ```ignore
//! type Arg = Map<i64, Array<Varchar>>;
//! let reader = create_reader::<Arg>(&decoded)?;
//! ```

use std::{borrow::Cow, marker::PhantomData};

use arrow_array::{
    ArrayRef, BinaryArray, BinaryViewArray, BooleanArray, LargeBinaryArray, LargeStringArray,
    PrimitiveArray, StringArray, StringViewArray,
    cast::AsArray,
    types::{
        Date32Type, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type,
        UInt8Type, UInt16Type, UInt32Type, UInt64Type,
    },
};
use arrow_schema::DataType;
use colview_common::{Result, error::Error, verify_arg};
use colview_vector::{DecodedArgs, DecodedVector};

use crate::reader::{
    VectorReader, array::ArrayReader, generic::GenericReader, map::MapReader, row::RowFields,
    row::RowReader, scalar::ScalarReader, variadic::VariadicReader,
};

/// A function argument type with an associated reader.
pub trait ArgType: 'static {
    /// The reader navigating a column of this type.
    type Reader<'a>: VectorReader;

    /// Human-readable name of the type, used in error messages.
    fn signature() -> String;

    /// Returns `true` if a column of `data_type` can be read as this type.
    ///
    /// Dictionary and run-end wrappers are looked through at every level.
    fn accepts(data_type: &DataType) -> bool;

    /// Creates the reader over `decoded`.
    ///
    /// A borrowed source must outlive the reader; an owned one is kept by it.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::TypeMismatch`](colview_common::ErrorKind::TypeMismatch)
    /// if the column's data type is not accepted by this type.
    fn create_reader<'a>(decoded: Cow<'a, DecodedVector>) -> Result<Self::Reader<'a>>;

    /// Creates the reader for the argument at `position` of a call.
    ///
    /// Variadic types consume every argument from `position` onwards.
    fn create_reader_from_args(args: &DecodedArgs, position: usize) -> Result<Self::Reader<'_>> {
        verify_arg!(position, position < args.len());
        Self::create_reader(Cow::Borrowed(args.at(position)))
    }
}

/// Creates the reader for argument type `T` over a borrowed decoded column.
pub fn create_reader<T: ArgType>(decoded: &DecodedVector) -> Result<T::Reader<'_>> {
    T::create_reader(Cow::Borrowed(decoded))
}

/// Fails with a type mismatch unless `T` accepts the column's data type.
pub(crate) fn check_type<T: ArgType>(decoded: &DecodedVector) -> Result<()> {
    if T::accepts(decoded.data_type()) {
        Ok(())
    } else {
        Err(Error::type_mismatch(
            T::signature(),
            decoded.data_type().to_string(),
        ))
    }
}

/// Strips dictionary and run-end wrappers from a data type.
pub fn value_type(data_type: &DataType) -> &DataType {
    match data_type {
        DataType::Dictionary(_, values) => value_type(values),
        DataType::RunEndEncoded(_, values) => value_type(values.data_type()),
        other => other,
    }
}

/// A scalar type: reads values straight out of a typed Arrow array.
pub trait ScalarType: 'static {
    /// The typed array holding the values.
    type Values: Clone + 'static;

    /// A value borrowed from [`Values`](Self::Values).
    type Value<'r>: Copy + PartialEq + std::fmt::Debug;

    const NAME: &'static str;

    fn accepts(data_type: &DataType) -> bool;

    /// Extracts the typed array, or `None` if `array` has another type.
    fn downcast(array: &ArrayRef) -> Option<Self::Values>;

    fn value_at(values: &Self::Values, index: usize) -> Self::Value<'_>;
}

/// Variable-length UTF-8 strings (`Utf8`, `LargeUtf8`, `Utf8View`), read as `&str`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Varchar;

/// Variable-length binary (`Binary`, `LargeBinary`, `BinaryView`), read as `&[u8]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Varbinary;

/// Days since the UNIX epoch (`Date32`), read as `i32`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Date;

#[derive(Clone, Debug)]
pub enum StringValues {
    Utf8(StringArray),
    LargeUtf8(LargeStringArray),
    Utf8View(StringViewArray),
}

#[derive(Clone, Debug)]
pub enum BinaryValues {
    Binary(BinaryArray),
    LargeBinary(LargeBinaryArray),
    BinaryView(BinaryViewArray),
}

impl ScalarType for Varchar {
    type Values = StringValues;
    type Value<'r> = &'r str;

    const NAME: &'static str = "varchar";

    fn accepts(data_type: &DataType) -> bool {
        matches!(
            value_type(data_type),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
        )
    }

    fn downcast(array: &ArrayRef) -> Option<StringValues> {
        match array.data_type() {
            DataType::Utf8 => Some(StringValues::Utf8(array.as_string::<i32>().clone())),
            DataType::LargeUtf8 => Some(StringValues::LargeUtf8(array.as_string::<i64>().clone())),
            DataType::Utf8View => Some(StringValues::Utf8View(array.as_string_view().clone())),
            _ => None,
        }
    }

    #[inline]
    fn value_at(values: &StringValues, index: usize) -> &str {
        match values {
            StringValues::Utf8(array) => array.value(index),
            StringValues::LargeUtf8(array) => array.value(index),
            StringValues::Utf8View(array) => array.value(index),
        }
    }
}

impl ScalarType for Varbinary {
    type Values = BinaryValues;
    type Value<'r> = &'r [u8];

    const NAME: &'static str = "varbinary";

    fn accepts(data_type: &DataType) -> bool {
        matches!(
            value_type(data_type),
            DataType::Binary | DataType::LargeBinary | DataType::BinaryView
        )
    }

    fn downcast(array: &ArrayRef) -> Option<BinaryValues> {
        match array.data_type() {
            DataType::Binary => Some(BinaryValues::Binary(array.as_binary::<i32>().clone())),
            DataType::LargeBinary => {
                Some(BinaryValues::LargeBinary(array.as_binary::<i64>().clone()))
            }
            DataType::BinaryView => Some(BinaryValues::BinaryView(array.as_binary_view().clone())),
            _ => None,
        }
    }

    #[inline]
    fn value_at(values: &BinaryValues, index: usize) -> &[u8] {
        match values {
            BinaryValues::Binary(array) => array.value(index),
            BinaryValues::LargeBinary(array) => array.value(index),
            BinaryValues::BinaryView(array) => array.value(index),
        }
    }
}

impl ScalarType for bool {
    type Values = BooleanArray;
    type Value<'r> = bool;

    const NAME: &'static str = "boolean";

    fn accepts(data_type: &DataType) -> bool {
        matches!(value_type(data_type), DataType::Boolean)
    }

    fn downcast(array: &ArrayRef) -> Option<BooleanArray> {
        array.as_boolean_opt().cloned()
    }

    #[inline]
    fn value_at(values: &BooleanArray, index: usize) -> bool {
        values.value(index)
    }
}

macro_rules! impl_primitive_scalar {
    ($T:ty, $arrow:ty, $data_type:ident, $name:literal) => {
        impl ScalarType for $T {
            type Values = PrimitiveArray<$arrow>;
            type Value<'r> = <$arrow as arrow_array::ArrowPrimitiveType>::Native;

            const NAME: &'static str = $name;

            fn accepts(data_type: &DataType) -> bool {
                matches!(value_type(data_type), DataType::$data_type)
            }

            fn downcast(array: &ArrayRef) -> Option<Self::Values> {
                array.as_primitive_opt::<$arrow>().cloned()
            }

            #[inline]
            fn value_at(values: &Self::Values, index: usize) -> Self::Value<'_> {
                values.value(index)
            }
        }
    };
}

impl_primitive_scalar!(i8, Int8Type, Int8, "tinyint");
impl_primitive_scalar!(i16, Int16Type, Int16, "smallint");
impl_primitive_scalar!(i32, Int32Type, Int32, "integer");
impl_primitive_scalar!(i64, Int64Type, Int64, "bigint");
impl_primitive_scalar!(u8, UInt8Type, UInt8, "utinyint");
impl_primitive_scalar!(u16, UInt16Type, UInt16, "usmallint");
impl_primitive_scalar!(u32, UInt32Type, UInt32, "uinteger");
impl_primitive_scalar!(u64, UInt64Type, UInt64, "ubigint");
impl_primitive_scalar!(f32, Float32Type, Float32, "real");
impl_primitive_scalar!(f64, Float64Type, Float64, "double");
impl_primitive_scalar!(Date, Date32Type, Date32, "date");

macro_rules! impl_scalar_arg_type {
    ($T:ty) => {
        impl ArgType for $T {
            type Reader<'a> = ScalarReader<'a, $T>;

            fn signature() -> String {
                <$T as ScalarType>::NAME.to_string()
            }

            fn accepts(data_type: &DataType) -> bool {
                <$T as ScalarType>::accepts(data_type)
            }

            fn create_reader<'a>(decoded: Cow<'a, DecodedVector>) -> Result<Self::Reader<'a>> {
                ScalarReader::new(decoded)
            }
        }
    };
}

impl_scalar_arg_type!(bool);
impl_scalar_arg_type!(i8);
impl_scalar_arg_type!(i16);
impl_scalar_arg_type!(i32);
impl_scalar_arg_type!(i64);
impl_scalar_arg_type!(u8);
impl_scalar_arg_type!(u16);
impl_scalar_arg_type!(u32);
impl_scalar_arg_type!(u64);
impl_scalar_arg_type!(f32);
impl_scalar_arg_type!(f64);
impl_scalar_arg_type!(Varchar);
impl_scalar_arg_type!(Varbinary);
impl_scalar_arg_type!(Date);

/// A list of `V`: `List`, `LargeList`, `ListView`, `LargeListView` or
/// `FixedSizeList`.
pub struct Array<V>(PhantomData<V>);

impl<V: ArgType> ArgType for Array<V> {
    type Reader<'a> = ArrayReader<'a, V>;

    fn signature() -> String {
        format!("array({})", V::signature())
    }

    fn accepts(data_type: &DataType) -> bool {
        match value_type(data_type) {
            DataType::List(field)
            | DataType::LargeList(field)
            | DataType::ListView(field)
            | DataType::LargeListView(field)
            | DataType::FixedSizeList(field, _) => V::accepts(field.data_type()),
            _ => false,
        }
    }

    fn create_reader<'a>(decoded: Cow<'a, DecodedVector>) -> Result<Self::Reader<'a>> {
        ArrayReader::new(decoded)
    }
}

/// A map from `K` to `V`.
pub struct Map<K, V>(PhantomData<(K, V)>);

impl<K: ArgType, V: ArgType> ArgType for Map<K, V> {
    type Reader<'a> = MapReader<'a, K, V>;

    fn signature() -> String {
        format!("map({}, {})", K::signature(), V::signature())
    }

    fn accepts(data_type: &DataType) -> bool {
        match value_type(data_type) {
            DataType::Map(entries, _) => match entries.data_type() {
                DataType::Struct(fields) if fields.len() == 2 => {
                    K::accepts(fields[0].data_type()) && V::accepts(fields[1].data_type())
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn create_reader<'a>(decoded: Cow<'a, DecodedVector>) -> Result<Self::Reader<'a>> {
        MapReader::new(decoded)
    }
}

/// A struct whose fields are described by the tuple `T`, e.g. `Row<(i64, Varchar)>`.
pub struct Row<T>(PhantomData<T>);

impl<T: RowFields> ArgType for Row<T> {
    type Reader<'a> = RowReader<'a, T>;

    fn signature() -> String {
        format!("row({})", T::signature())
    }

    fn accepts(data_type: &DataType) -> bool {
        match value_type(data_type) {
            DataType::Struct(fields) => T::accepts(fields),
            _ => false,
        }
    }

    fn create_reader<'a>(decoded: Cow<'a, DecodedVector>) -> Result<Self::Reader<'a>> {
        RowReader::new(decoded)
    }
}

/// Zero or more trailing arguments of type `T`.
///
/// Built with [`ArgType::create_reader_from_args`], the reader covers every
/// argument from the given position to the end of the call.
pub struct Variadic<T>(PhantomData<T>);

impl<T: ArgType> ArgType for Variadic<T> {
    type Reader<'a> = VariadicReader<'a, T>;

    fn signature() -> String {
        format!("{}...", T::signature())
    }

    fn accepts(data_type: &DataType) -> bool {
        T::accepts(data_type)
    }

    fn create_reader<'a>(decoded: Cow<'a, DecodedVector>) -> Result<Self::Reader<'a>> {
        VariadicReader::from_columns([decoded])
    }

    fn create_reader_from_args(args: &DecodedArgs, position: usize) -> Result<Self::Reader<'_>> {
        VariadicReader::new(args, position)
    }
}

/// Names the type variable a [`Generic`] argument is bound to.
pub trait TypeVariableName: 'static {
    fn name() -> String;
}

/// An unconstrained type.
pub struct AnyType;

/// A type variable; arguments sharing an `ID` share a type at runtime.
pub struct TypeVariable<const ID: usize>;

impl TypeVariableName for AnyType {
    fn name() -> String {
        "any".to_string()
    }
}

impl<const ID: usize> TypeVariableName for TypeVariable<ID> {
    fn name() -> String {
        format!("T{ID}")
    }
}

/// An argument whose concrete type is only known at runtime.
///
/// The reader yields [`GenericView`](crate::view::generic::GenericView)s that
/// can be cast to a concrete argument type per row.
pub struct Generic<T = AnyType>(PhantomData<T>);

impl<T: TypeVariableName> ArgType for Generic<T> {
    type Reader<'a> = GenericReader<'a>;

    fn signature() -> String {
        T::name()
    }

    fn accepts(_data_type: &DataType) -> bool {
        true
    }

    fn create_reader<'a>(decoded: Cow<'a, DecodedVector>) -> Result<Self::Reader<'a>> {
        Ok(GenericReader::new(decoded))
    }
}
