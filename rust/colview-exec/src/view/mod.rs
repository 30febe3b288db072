//! Views: the per-row values handed out by readers.
//!
//! Views never own data. Each one is a reader reference plus an index or a
//! window, borrowed from the reader for `'r`, and is cheap to copy.
//!
//! | Reader | Nullable path | Null-free path |
//! |---|---|---|
//! | scalar | raw value | raw value |
//! | array | [`ArrayView`](array::ArrayView) | [`NullFreeArrayView`](array::NullFreeArrayView) |
//! | map | [`MapView`](map::MapView) | [`NullFreeMapView`](map::NullFreeMapView) |
//! | row | [`RowView`](row::RowView) | tuple of null-free values |
//! | variadic | [`VariadicView`](variadic::VariadicView) | [`NullFreeVariadicView`](variadic::NullFreeVariadicView) |
//! | generic | [`GenericView`](generic::GenericView) | [`GenericView`](generic::GenericView) |

pub mod accessor;
pub mod array;
pub mod generic;
pub mod iterator;
pub mod map;
pub mod row;
pub mod variadic;
