//! Decoded column access for row-at-a-time readers.
//!
//! This crate turns an Arrow array, possibly wrapped in dictionary or run-end
//! encodings, into a [`DecodedVector`]: a flat base array plus a mapping from
//! logical rows to base positions and a combined null mask. Readers built on
//! top of it never look at the physical encoding again.
//!
//! - [`selectivity`]: the set of rows a decode pass resolves.
//! - [`decoded`]: [`DecodedVector`] and the encoding resolution.
//! - [`decoded_args`]: the decoded argument columns of one call.
//! - [`windows`]: per-entry child windows of list and map columns.
//! - [`encoding`]: helpers that build dictionary, constant and run-end
//!   encoded arrays.

pub mod decoded;
pub mod decoded_args;
pub mod encoding;
pub mod selectivity;
pub mod windows;

pub use decoded::{DecodedVector, IndexMapping};
pub use decoded_args::DecodedArgs;
pub use selectivity::SelectivityVector;
pub use windows::{ListWindows, Window};
