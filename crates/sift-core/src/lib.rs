//! # sift-core: Foundational Types for sift
//!
//! This crate is the leaf of the sift workspace. It defines the pieces every
//! other crate must agree on:
//!
//! 1. **Compile error taxonomy.** `CompileError` is the only error a schema
//!    evaluation can raise; bad input data is never an error.
//!
//! 2. **Value semantics.** Presence (`null` counts as absent), truthiness and
//!    the loose numeric/string coercions used by the built-in sanitizers.
//!
//! 3. **Property keys.** Parsing of the `name?` optional marker and the `*`
//!    catch-all key.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sift-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod key;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::CompileError;
pub use key::{PropertyKey, CATCH_ALL, OPTIONAL_MARKER};
pub use value::{
    is_absent, is_truthy, number_value, parse_float, to_display_string, to_int32, to_number,
    type_name,
};
