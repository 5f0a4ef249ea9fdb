//! # Value and Property Evaluation
//!
//! Evaluates one compiled [`Rule`] against one value:
//!
//! 1. **Presence.** Missing and `null` values pass only when the rule is
//!    optional, and then contribute no field to the sanitized output.
//! 2. **Dynamic selection.** A dynamic rule asks its chooser for a
//!    descriptor, compiles it as an optional rule for the same property and
//!    continues with that transient rule. A chooser that panics fails the
//!    property with the rule's message.
//! 3. **Predicates.** Every predicate runs, even after one has failed, so
//!    that side effects and call counts do not depend on ordering.
//! 4. **Nested schema.** If the predicates passed and the rule carries a
//!    schema, arrays are checked element by element and objects are checked
//!    as a whole. Scalars skip this step.
//! 5. **Sanitize.** Passing values are run through the rule's sanitizer.
//!
//! The only error this module returns is a `CompileError` from a dynamic
//! chooser (or a nested schema) yielding an uncompilable descriptor.

use std::sync::Arc;

use serde_json::Value;
use sift_core::{is_absent, CompileError, CATCH_ALL};

use crate::descriptor::{Invocation, Validator};
use crate::rule::{compile, Rule};
use crate::schema::Schema;

/// A property name and its sanitized value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Output key.
    pub name: String,
    /// Sanitized value.
    pub value: Value,
}

/// The result of evaluating one rule.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyOutcome {
    /// The value passed. `field` is `None` when nothing should be written to
    /// the sanitized output (absent optional values, anonymous values and
    /// the catch-all property).
    Pass {
        /// The sanitized field, if any.
        field: Option<Field>,
    },
    /// The value failed with the given messages.
    Fail {
        /// Error messages, in order.
        messages: Vec<String>,
    },
}

impl PropertyOutcome {
    /// Returns true if the value passed.
    pub fn passed(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }

    fn fail(message: impl Into<String>) -> Self {
        Self::Fail {
            messages: vec![message.into()],
        }
    }
}

/// The message reported for a required value that is absent.
pub fn required_message(property: Option<&str>) -> String {
    match property {
        Some(p) => format!("\"{p}\" is required."),
        None => "Field is required.".to_string(),
    }
}

/// Evaluate `rule` against `value`, a member of `object`.
///
/// `value` is `None` when the member is missing. `property` names the
/// member, or is `None` for anonymous values such as array elements.
///
/// # Errors
///
/// Returns a `CompileError` if a dynamic rule chooses a descriptor that
/// cannot be compiled.
pub fn test_value(
    rule: &Rule,
    value: Option<&Value>,
    object: &Value,
    property: Option<&str>,
    extra: &[Value],
) -> Result<PropertyOutcome, CompileError> {
    match value {
        Some(value) if !is_absent(Some(value)) => {
            test_present_value(rule, value, object, property, extra)
        }
        _ if rule.is_required() => Ok(PropertyOutcome::fail(required_message(property))),
        _ => Ok(PropertyOutcome::Pass { field: None }),
    }
}

/// Evaluate `rule` against the member `property` of `object`.
///
/// A required property that is not a key of `object` fails without running
/// any validator. The catch-all property `*` is looked up like any other key
/// but never writes a field to the sanitized output.
///
/// # Errors
///
/// See [`test_value`].
pub fn test_property(
    rule: &Rule,
    object: &Value,
    extra: &[Value],
    property: &str,
) -> Result<PropertyOutcome, CompileError> {
    let value = object.get(property);
    if rule.is_required() && value.is_none() {
        return Ok(PropertyOutcome::fail(required_message(Some(property))));
    }

    test_value(rule, value, object, Some(property), extra)
}

fn test_present_value(
    rule: &Rule,
    value: &Value,
    object: &Value,
    property: Option<&str>,
    extra: &[Value],
) -> Result<PropertyOutcome, CompileError> {
    let invocation = Invocation {
        value,
        object,
        extra,
    };

    if let Some(chooser) = rule.dynamic() {
        let Some(descriptor) = chooser.choose(&invocation) else {
            return Ok(PropertyOutcome::fail(rule.message()));
        };
        let transient = compile(false, property, &descriptor)?;
        return test_present_value(&transient, value, object, property, extra);
    }

    // No short-circuit: every predicate observes the value.
    let mut passed = true;
    for predicate in rule.validators().iter().filter_map(Validator::as_predicate) {
        passed &= predicate.try_run(&invocation)?;
    }

    if !passed {
        return Ok(PropertyOutcome::fail(rule.message()));
    }

    let name = reported_name(property);

    if let Some(schema) = rule.validators().iter().find_map(Validator::as_schema) {
        match value {
            Value::Array(items) => return test_elements(schema, items, name),
            Value::Object(_) => return test_nested(schema, value, name),
            _ => {}
        }
    }

    Ok(PropertyOutcome::Pass {
        field: name.map(|name| Field {
            name: name.to_string(),
            value: rule.sanitizer().apply(value),
        }),
    })
}

fn test_elements(
    schema: &Arc<Schema>,
    items: &[Value],
    name: Option<&str>,
) -> Result<PropertyOutcome, CompileError> {
    let results = items
        .iter()
        .map(|item| schema.test(item))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(failed) = results.iter().find(|r| !r.valid) {
        return Ok(PropertyOutcome::Fail {
            messages: failed.errors.clone(),
        });
    }

    Ok(PropertyOutcome::Pass {
        field: name.map(|name| Field {
            name: name.to_string(),
            value: Value::Array(
                results
                    .into_iter()
                    .map(|r| Value::Object(r.object))
                    .collect(),
            ),
        }),
    })
}

fn test_nested(
    schema: &Arc<Schema>,
    value: &Value,
    name: Option<&str>,
) -> Result<PropertyOutcome, CompileError> {
    let result = schema.test(value)?;

    if !result.valid {
        return Ok(PropertyOutcome::Fail {
            messages: result.errors.into_iter().take(1).collect(),
        });
    }

    Ok(PropertyOutcome::Pass {
        field: name.map(|name| Field {
            name: name.to_string(),
            value: Value::Object(result.object),
        }),
    })
}

fn reported_name(property: Option<&str>) -> Option<&str> {
    property.filter(|p| *p != CATCH_ALL)
}
