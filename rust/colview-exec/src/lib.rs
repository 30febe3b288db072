//! Row-at-a-time access to columnar arguments.
//!
//! Function bodies written one row at a time read their arguments through
//! readers and views instead of materialized values:
//!
//! - [`arg_type`] declares argument shapes (`i64`, [`Varchar`](arg_type::Varchar),
//!   [`Array`](arg_type::Array), [`Map`](arg_type::Map), [`Row`](arg_type::Row),
//!   [`Variadic`](arg_type::Variadic), [`Generic`](arg_type::Generic)) and picks
//!   the matching reader.
//! - [`reader`] holds the readers and the two-phase null propagation protocol.
//! - [`view`] holds the lazy per-row views, accessors and iterators.
//!
//! ```ignore
//! let args = DecodedArgs::decode(&columns, &rows)?;
//! let mut reader = Map::<i64, Varchar>::create_reader_from_args(&args, 0)?;
//! reader.set_children_may_have_nulls()?;
//! for row in rows.iter() {
//!     if let Some(map) = reader.read(row) {
//!         for entry in map {
//!             let key: i64 = entry.key();
//!             let value: Option<&str> = entry.second.to_option();
//!         }
//!     }
//! }
//! ```

pub mod arg_type;
pub mod reader;
pub mod view;

#[cfg(test)]
mod tests;

pub use arg_type::{
    AnyType, ArgType, Array, Date, Generic, Map, Row, TypeVariable, Varbinary, Varchar, Variadic,
    create_reader,
};
pub use reader::VectorReader;
