//! # sift-schema: Rule Compilation & Evaluation
//!
//! The core of sift: turns declarative schema definitions into rules and
//! tests objects against them, producing a verdict, error messages and a
//! sanitized copy of the object.
//!
//! ## Pipeline
//!
//! - [`descriptor`]: the caller-authored rule shapes ([`Descriptor`]) and
//!   the wrappers around caller code ([`Predicate`], [`Sanitizer`],
//!   [`Chooser`]).
//! - [`rule`]: compiles one descriptor to one [`Rule`].
//! - [`ruleset`]: compiles a whole definition to a
//!   [`Ruleset`], splitting the `?` optional marker off keys.
//! - [`evaluate`]: the Value and Property Evaluators, including dynamic
//!   rule selection and nested-schema delegation.
//! - [`schema`]: [`Schema`], which caches its ruleset and folds property
//!   outcomes into a [`ValidationResult`].
//!
//! ## Crate Policy
//!
//! - Depends only on `sift-core` internally.
//! - Testing data never raises an error. Only malformed definitions produce
//!   a `CompileError`.
//! - Caller-supplied validators are isolated: an error or panic inside one
//!   fails that check and nothing else.

pub mod descriptor;
pub mod evaluate;
pub mod result;
pub mod rule;
pub mod ruleset;
pub mod schema;

pub use descriptor::{Chooser, Descriptor, Invocation, Predicate, RuleOptions, Sanitizer, Validator};
pub use evaluate::{required_message, test_property, test_value, Field, PropertyOutcome};
pub use result::{ValidationErrors, ValidationResult};
pub use rule::{compile, default_message, Rule};
pub use ruleset::{compile_ruleset, Ruleset};
pub use schema::{Schema, SchemaBuilder};
pub use sift_core::CompileError;
