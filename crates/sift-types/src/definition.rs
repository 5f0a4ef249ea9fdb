//! # Declarative Schema Definitions
//!
//! Loads a schema from YAML or JSON text. Each top-level key is a property
//! key (with the `?` optional marker, as in code-built schemas) and each
//! value is either a typed rule or a literal shorthand:
//!
//! ```yaml
//! name: { type: string, min: 1, max: 100 }
//! "middle?": { type: string, max: 100, pattern: "^[A-Z]" }
//! age: { type: number, min: 1, max: 125, message: "bad age" }
//! tags: { type: array, min: 1, items: { type: string, max: 20 } }
//! address: { type: object, properties: { street: { type: string } } }
//! flag: true
//! ```
//!
//! Declaration order is preserved, so error messages come out in the order
//! the definition lists its properties.
//!
//! Problems the loader can see up front (bad syntax, an unknown `type`, an
//! invalid regular expression, `min` above `max`) are reported as a
//! [`DefinitionError`]. Literal shorthands that are not booleans, numbers
//! or strings are passed through and surface as a `CompileError` on the
//! first test, like any other malformed descriptor.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use sift_schema::{Descriptor, Predicate, RuleOptions, Schema, Validator};
use thiserror::Error;

use crate::{ArrayType, BooleanType, NumberType, PassType, StringType};

/// Errors raised while loading or building a declarative definition.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The YAML text could not be parsed into a definition.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON text could not be parsed into a definition.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A string rule's `pattern` is not a valid regular expression.
    #[error("invalid pattern for \"{property}\": {reason}")]
    InvalidPattern {
        /// Property the pattern belongs to.
        property: String,
        /// Why the expression was rejected.
        reason: String,
    },

    /// A rule declares `min` greater than `max`.
    #[error("invalid bounds for \"{property}\": min {min} is greater than max {max}")]
    InvalidBounds {
        /// Property the bounds belong to.
        property: String,
        /// Declared lower bound.
        min: f64,
        /// Declared upper bound.
        max: f64,
    },
}

/// An ordered set of property definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSpec {
    fields: Vec<(String, FieldSpec)>,
}

/// One property definition.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    /// A typed rule, written as a map with a `type` key.
    Typed(TypeSpec),
    /// A literal shorthand selecting a coercion-only rule.
    Literal(Value),
}

/// The typed rules a definition can name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeSpec {
    String {
        min: Option<usize>,
        max: Option<usize>,
        pattern: Option<String>,
        message: Option<String>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
        message: Option<String>,
    },
    Boolean,
    Array {
        min: Option<usize>,
        max: Option<usize>,
        items: Option<Box<FieldSpec>>,
        message: Option<String>,
    },
    Object {
        properties: SchemaSpec,
        message: Option<String>,
    },
    Pass,
}

impl SchemaSpec {
    /// Parse a definition from YAML.
    pub fn from_yaml_str(input: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Parse a definition from JSON.
    pub fn from_json_str(input: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Property keys, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// The definition of `key`, if declared.
    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, field)| field)
    }

    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no properties are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build the schema this definition describes.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] for invalid patterns or bounds.
    pub fn build(&self) -> Result<Schema, DefinitionError> {
        let mut definition = Vec::with_capacity(self.fields.len());
        for (key, field) in &self.fields {
            definition.push((key.clone(), field.descriptor(key)?));
        }
        tracing::debug!(properties = definition.len(), "built schema from definition");
        Ok(Schema::new(definition))
    }
}

impl FieldSpec {
    fn descriptor(&self, property: &str) -> Result<Descriptor, DefinitionError> {
        match self {
            Self::Typed(spec) => spec.descriptor(property),
            Self::Literal(value) => Ok(Descriptor::Literal(value.clone())),
        }
    }
}

impl TypeSpec {
    fn descriptor(&self, property: &str) -> Result<Descriptor, DefinitionError> {
        let descriptor: Descriptor = match self {
            Self::String {
                min,
                max,
                pattern,
                message,
            } => {
                let mut rule = StringType::new();
                rule = match (*min, *max) {
                    (Some(min), Some(max)) => {
                        check_bounds(property, min as f64, max as f64)?;
                        rule.len_between(min, max)
                    }
                    (Some(min), None) => rule.min_len(min),
                    (None, Some(max)) => rule.max_len(max),
                    (None, None) => rule,
                };
                if let Some(pattern) = pattern {
                    let regex = Regex::new(pattern).map_err(|e| DefinitionError::InvalidPattern {
                        property: property.to_string(),
                        reason: e.to_string(),
                    })?;
                    rule = rule.pattern(regex);
                }
                if let Some(message) = message {
                    rule = rule.message(message.clone());
                }
                rule.into()
            }
            Self::Number { min, max, message } => {
                let mut rule = NumberType::new();
                rule = match (*min, *max) {
                    (Some(min), Some(max)) => {
                        check_bounds(property, min, max)?;
                        rule.between(min, max)
                    }
                    (Some(min), None) => rule.min(min),
                    (None, Some(max)) => rule.max(max),
                    (None, None) => rule,
                };
                if let Some(message) = message {
                    rule = rule.message(message.clone());
                }
                rule.into()
            }
            Self::Boolean => BooleanType::new().into(),
            Self::Array {
                min,
                max,
                items,
                message,
            } => {
                let mut rule = ArrayType::new();
                rule = match (*min, *max) {
                    (Some(min), Some(max)) => {
                        check_bounds(property, min as f64, max as f64)?;
                        rule.len_between(min, max)
                    }
                    (Some(min), None) => rule.min_len(min),
                    (None, Some(max)) => rule.len_between(0, max),
                    (None, None) => rule,
                };
                if let Some(items) = items {
                    rule = rule.items(items.descriptor(&format!("{property}[]"))?);
                }
                if let Some(message) = message {
                    rule = rule.message(message.clone());
                }
                rule.into()
            }
            Self::Object {
                properties,
                message,
            } => {
                let nested = Arc::new(properties.build()?);
                let mut options = RuleOptions::new()
                    .validator(Predicate::on_value(Value::is_object))
                    .validator(Validator::Schema(nested));
                options.message = message.clone();
                options.into()
            }
            Self::Pass => PassType::new().into(),
        };
        Ok(descriptor)
    }
}

fn check_bounds(property: &str, min: f64, max: f64) -> Result<(), DefinitionError> {
    if min > max {
        return Err(DefinitionError::InvalidBounds {
            property: property.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

impl<'de> Deserialize<'de> for SchemaSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = SchemaSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of property keys to rule definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SchemaSpec, A::Error> {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, field)) = map.next_entry::<String, FieldSpec>()? {
                    fields.push((key, field));
                }
                Ok(SchemaSpec { fields })
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

// Maps are typed rules; anything else is a literal shorthand. Going through
// `Value` keeps an unknown `type` from silently becoming a literal.
impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.is_object() {
            serde_json::from_value(value)
                .map(FieldSpec::Typed)
                .map_err(de::Error::custom)
        } else {
            Ok(FieldSpec::Literal(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PERSON: &str = r#"
name: { type: string, min: 1, max: 10 }
"middle?": { type: string, pattern: "^[A-Z]" }
age: { type: number, min: 1, max: 125, message: "bad age" }
active: { type: boolean }
tags: { type: array, min: 1, items: { type: string, max: 5 } }
address: { type: object, properties: { street: { type: string } } }
note: { type: pass }
flag: true
"#;

    #[test]
    fn yaml_keeps_declaration_order() {
        let spec = SchemaSpec::from_yaml_str(PERSON).unwrap();
        assert_eq!(
            spec.keys().collect::<Vec<_>>(),
            vec!["name", "middle?", "age", "active", "tags", "address", "note", "flag"]
        );
        assert_eq!(spec.get("flag"), Some(&FieldSpec::Literal(json!(true))));
        assert_eq!(
            spec.get("active"),
            Some(&FieldSpec::Typed(TypeSpec::Boolean))
        );
    }

    #[test]
    fn yaml_schema_validates_and_sanitizes() {
        let schema = SchemaSpec::from_yaml_str(PERSON).unwrap().build().unwrap();
        let result = schema
            .test(&json!({
                "name": "  Ada  ",
                "age": "36",
                "active": 1,
                "tags": ["x", "y"],
                "address": {"street": "Main", "zip": 1},
                "note": {"kept": [1]},
                "flag": 0
            }))
            .unwrap();
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(
            result.sanitized(),
            json!({
                "name": "Ada",
                "age": 36,
                "active": true,
                "tags": ["x", "y"],
                "address": {"street": "Main"},
                "note": {"kept": [1]},
                "flag": false
            })
        );
    }

    #[test]
    fn yaml_schema_reports_messages_in_order() {
        let schema = SchemaSpec::from_yaml_str(PERSON).unwrap().build().unwrap();
        let result = schema
            .test(&json!({
                "name": "",
                "middle": "lower",
                "age": 400,
                "active": false,
                "tags": ["toolong"],
                "address": "nowhere",
                "note": 1,
                "flag": 1
            }))
            .unwrap();
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "Field \"name\" is invalid.",
                "Field \"middle\" is invalid.",
                "bad age",
                "Field \"tags\" is invalid.",
                "Field \"address\" is invalid.",
            ]
        );
    }

    #[test]
    fn json_definitions_load() {
        let spec = SchemaSpec::from_json_str(
            r#"{"id": {"type": "number", "min": 0}, "label?": {"type": "string"}}"#,
        )
        .unwrap();
        let schema = spec.build().unwrap();
        assert!(schema.test(&json!({"id": 3})).unwrap().valid);
        assert!(!schema.test(&json!({"id": -3})).unwrap().valid);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = SchemaSpec::from_yaml_str("a: { type: date }").unwrap_err();
        assert!(matches!(err, DefinitionError::Yaml(_)));
        let err = SchemaSpec::from_json_str(r#"{"a": {"type": "date"}}"#).unwrap_err();
        assert!(matches!(err, DefinitionError::Json(_)));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let spec = SchemaSpec::from_yaml_str("a: { type: string, pattern: '(' }").unwrap();
        let err = spec.build().unwrap_err();
        assert!(
            matches!(err, DefinitionError::InvalidPattern { ref property, .. } if property == "a")
        );
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let spec = SchemaSpec::from_yaml_str("a: { type: number, min: 5, max: 1 }").unwrap();
        let err = spec.build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid bounds for \"a\": min 5 is greater than max 1"
        );

        let nested = SchemaSpec::from_yaml_str(
            "a: { type: object, properties: { b: { type: string, min: 3, max: 2 } } }",
        )
        .unwrap();
        assert!(matches!(
            nested.build().unwrap_err(),
            DefinitionError::InvalidBounds { .. }
        ));
    }

    #[test]
    fn bad_literal_surfaces_on_first_test() {
        let schema = SchemaSpec::from_yaml_str("a: [1, 2]").unwrap().build().unwrap();
        assert!(schema.test(&json!({"a": 1})).is_err());
    }

    #[test]
    fn bad_item_literal_surfaces_on_first_test() {
        let schema = SchemaSpec::from_yaml_str("tags: { type: array, items: [1, 2] }")
            .unwrap()
            .build()
            .unwrap();
        let err = schema.test(&json!({"tags": ["a"]})).unwrap_err();
        assert!(matches!(err, sift_schema::CompileError::InvalidRuleExpression { .. }));
    }
}
