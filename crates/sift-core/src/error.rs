//! # Error Types: Compile-Time Failure Taxonomy
//!
//! Defines the error that may escape a `Schema::test` call. It uses
//! `thiserror` for derive-based `Display` and `Error` implementations. The
//! workspace-wide `SiftError` lives in `sift-types`, the crate that can see
//! every domain error it wraps.
//!
//! ## Design
//!
//! - Only *schema* problems are errors. Bad *data* never produces an error;
//!   it produces a `ValidationResult` with `valid == false`.
//! - `CompileError` is `Clone` because a compiled ruleset (or the failure to
//!   compile one) is cached on the schema and handed out on every call.
//! - Validator failures (returned errors, panics) are not represented here at
//!   all: they are converted to a failed check at the invocation boundary.

use thiserror::Error;

/// Error raised while compiling a raw schema definition into a ruleset.
///
/// These surface synchronously from the first `test` call on a schema, and
/// from every later call, since the compile result is cached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The descriptor matched none of the recognized rule shapes.
    #[error("invalid rule expression for {}: {found}", describe_property(.property.as_deref()))]
    InvalidRuleExpression {
        /// Property the descriptor was attached to, if known.
        property: Option<String>,
        /// Short description of the offending descriptor.
        found: String,
    },

    /// Two raw keys normalized to the same property name (e.g. `foo` and `foo?`).
    #[error("duplicate property \"{property}\" in schema definition")]
    DuplicateProperty {
        /// The canonical property name declared twice.
        property: String,
    },

    /// A raw key normalized to an empty property name.
    #[error("schema key \"{key}\" does not name a property")]
    EmptyProperty {
        /// The raw key as written in the definition.
        key: String,
    },
}

fn describe_property(property: Option<&str>) -> String {
    match property {
        Some(p) => format!("property \"{p}\""),
        None => "anonymous value".to_string(),
    }
}
