//! # sift-types: Built-in Rules
//!
//! Ready-made descriptors for the common value shapes, plus a loader for
//! schemas written as YAML or JSON.
//!
//! | Rule | Accepts | Sanitizes to |
//! |------|---------|--------------|
//! | [`string()`] | length and pattern checks | trimmed string form |
//! | [`number()`] | anything numeric, with optional bounds | leading number, `null` if none |
//! | [`boolean()`] | any present value | truthiness |
//! | [`array()`] | arrays, with length and element rules | a copy of the array |
//! | [`pass()`] | any present value | the value unchanged |
//! | [`dynamic()`] | whatever the chosen rule accepts | whatever the chosen rule produces |
//!
//! Every builder converts into a [`Descriptor`], so it can be passed
//! straight to `Schema::builder().rule(..)`.
//!
//! ## Crate Policy
//!
//! - Builds only on the public `sift-schema` API. Nothing here is special to
//!   the evaluator; callers can write equivalent rules themselves.
//! - Type checks never raise. A value of the wrong shape fails the rule.

pub mod array;
pub mod boolean;
pub mod definition;
pub mod dynamic;
pub mod error;
pub mod number;
pub mod string;

pub use array::ArrayType;
pub use boolean::{BooleanType, PassType};
pub use definition::{DefinitionError, FieldSpec, SchemaSpec, TypeSpec};
pub use dynamic::DynamicType;
pub use error::SiftError;
pub use number::{sanitize_number, NumberType};
pub use string::{sanitize_string, StringType};

use sift_schema::{Descriptor, Invocation};

/// A string rule with no checks.
pub fn string() -> StringType {
    StringType::new()
}

/// A number rule that only requires a numeric value.
pub fn number() -> NumberType {
    NumberType::new()
}

/// A boolean rule: any present value, sanitized to its truthiness.
pub fn boolean() -> BooleanType {
    BooleanType::new()
}

/// An array rule that only requires an array.
pub fn array() -> ArrayType {
    ArrayType::new()
}

/// A rule that accepts any present value unchanged.
pub fn pass() -> PassType {
    PassType::new()
}

/// A rule chosen per value by `choose`.
pub fn dynamic<F>(choose: F) -> DynamicType
where
    F: Fn(&Invocation<'_>) -> Descriptor + Send + Sync + 'static,
{
    DynamicType::new(choose)
}
