//! # Schema
//!
//! The public entry point. A [`Schema`] owns a raw definition (ordered
//! `(key, descriptor)` pairs) and compiles it into a [`Ruleset`] the first
//! time it is used. The compile result, success or failure, is cached for
//! the lifetime of the schema; the definition is never mutated.
//!
//! ## Thread Safety
//!
//! `Schema` is `Send + Sync`. The cache is a `OnceLock`, so concurrent
//! first calls compile at most once and every caller observes the same
//! ruleset.

use std::fmt;
use std::sync::OnceLock;

use serde_json::Value;
use sift_core::CompileError;

use crate::descriptor::Descriptor;
use crate::evaluate::test_property;
use crate::result::ValidationResult;
use crate::ruleset::{compile_ruleset, Ruleset};

/// A declarative object schema.
///
/// ```
/// use serde_json::json;
/// use sift_schema::{Descriptor, Schema};
///
/// let schema = Schema::builder()
///     .rule("name", Descriptor::check(|v| v.is_string()))
///     .rule("nickname?", Descriptor::check(|v| v.is_string()))
///     .rule("admin", true)
///     .build();
///
/// let result = schema.test(&json!({"name": "ada", "admin": 1})).unwrap();
/// assert!(result.valid);
/// assert_eq!(result.sanitized(), json!({"name": "ada", "admin": true}));
/// ```
pub struct Schema {
    definition: Vec<(String, Descriptor)>,
    ruleset: OnceLock<Result<Ruleset, CompileError>>,
}

impl Schema {
    /// Create a schema from `(key, descriptor)` pairs.
    ///
    /// Keys ending in `?` declare optional properties. Compilation is
    /// deferred to the first [`test`](Self::test) call.
    pub fn new<I, K, D>(definition: I) -> Self
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: Into<Descriptor>,
    {
        Self {
            definition: definition
                .into_iter()
                .map(|(k, d)| (k.into(), d.into()))
                .collect(),
            ruleset: OnceLock::new(),
        }
    }

    /// Start building a schema with heterogeneous descriptors.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Raw keys of the definition, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.definition.iter().map(|(k, _)| k.as_str())
    }

    /// The compiled ruleset, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Returns the (cached) `CompileError` if the definition is malformed.
    pub fn ruleset(&self) -> Result<&Ruleset, CompileError> {
        self.ruleset
            .get_or_init(|| compile_ruleset(self.definition.iter().map(|(k, d)| (k.as_str(), d))))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Test `object` against this schema.
    ///
    /// # Errors
    ///
    /// Returns a `CompileError` if the schema is malformed. Invalid data is
    /// never an error; it is reported through [`ValidationResult`].
    pub fn test(&self, object: &Value) -> Result<ValidationResult, CompileError> {
        self.test_with(object, &[])
    }

    /// Test `object`, passing `extra` to every validator as context.
    ///
    /// Every property is evaluated, in declaration order, even after one has
    /// failed.
    ///
    /// # Errors
    ///
    /// See [`test`](Self::test).
    pub fn test_with(
        &self,
        object: &Value,
        extra: &[Value],
    ) -> Result<ValidationResult, CompileError> {
        let ruleset = self.ruleset()?;
        let mut result = ValidationResult::default();

        for (property, rule) in ruleset.iter() {
            let outcome = test_property(rule, object, extra, property)?;
            tracing::trace!(property, passed = outcome.passed(), "evaluated property");
            result.absorb(outcome);
        }

        Ok(result)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("compiled", &self.ruleset.get().is_some())
            .finish()
    }
}

impl<K, D> FromIterator<(K, D)> for Schema
where
    K: Into<String>,
    D: Into<Descriptor>,
{
    fn from_iter<I: IntoIterator<Item = (K, D)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    definition: Vec<(String, Descriptor)>,
}

impl SchemaBuilder {
    /// Declare a property. Append `?` to the key to make it optional.
    pub fn rule(mut self, key: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        self.definition.push((key.into(), descriptor.into()));
        self
    }

    /// Finish the schema.
    pub fn build(self) -> Schema {
        Schema::new(self.definition)
    }
}
