//! Test utilities for the colview crates.
//!
//! - [`builders`]: concise constructors for list, map and struct arrays, and
//!   re-encoding of arrays into dictionary and run-end form with the same
//!   logical values.
//! - [`fuzzer`]: a seeded random generator of (possibly nested, possibly
//!   encoded) arrays together with their flat equivalents.
//!
//! This crate is intended for tests only.

pub mod builders;
pub mod fuzzer;
