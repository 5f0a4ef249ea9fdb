//! # Rule Compiler
//!
//! Normalizes one [`Descriptor`] into a [`Rule`]: a non-empty validator list,
//! a failure message, a sanitizer and an optional dynamic chooser.
//!
//! Dispatch order:
//!
//! 1. A predicate or nested schema becomes the single validator.
//! 2. A list keeps its predicates and schemas, in order, and drops the rest.
//! 3. Rule options are copied through, with defaults for missing parts.
//! 4. A boolean, number or string literal becomes a coercion-only rule.
//! 5. Any other literal is an `InvalidRuleExpression`.
//!
//! Compilation is pure: compiling the same descriptor twice yields
//! equivalent rules, which is what lets dynamic rules recompile on every
//! evaluation.

use serde_json::Value;
use sift_core::{
    is_truthy, number_value, to_display_string, to_int32, to_number, type_name, CompileError,
};

use crate::descriptor::{Chooser, Descriptor, Predicate, RuleOptions, Sanitizer, Validator};

/// The normalized, compiled form of a descriptor.
#[derive(Debug, Clone)]
pub struct Rule {
    required: bool,
    property: Option<String>,
    validators: Vec<Validator>,
    message: String,
    sanitizer: Sanitizer,
    dynamic: Option<Chooser>,
}

impl Rule {
    /// Whether the value must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The property this rule was compiled for, if known.
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// The validators, never empty.
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// The message reported when the rule fails.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The sanitizer applied to passing values.
    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// The dynamic chooser, if the rule is selected at evaluation time.
    pub fn dynamic(&self) -> Option<&Chooser> {
        self.dynamic.as_ref()
    }

    fn assemble(required: bool, property: Option<&str>, options: RuleOptions) -> Self {
        let validators = match options.validators {
            Some(validators) if !validators.is_empty() => validators,
            _ => vec![Validator::Predicate(Predicate::always())],
        };

        let message = match options.message {
            Some(message) if !message.is_empty() => message,
            _ => default_message(property),
        };

        Self {
            required,
            property: property.map(str::to_string),
            validators,
            message,
            sanitizer: options.sanitizer.unwrap_or_else(Sanitizer::identity),
            dynamic: options.dynamic,
        }
    }
}

/// The message used when a descriptor does not provide one.
pub fn default_message(property: Option<&str>) -> String {
    match property {
        Some(p) => format!("Field \"{p}\" is invalid."),
        None => "Field is invalid.".to_string(),
    }
}

/// Compile a descriptor into a rule.
///
/// # Errors
///
/// Returns `CompileError::InvalidRuleExpression` when the descriptor is a
/// literal that is not a boolean, number or string.
pub fn compile(
    required: bool,
    property: Option<&str>,
    descriptor: &Descriptor,
) -> Result<Rule, CompileError> {
    let options = match descriptor {
        Descriptor::Predicate(p) => {
            RuleOptions::new().validators(vec![Validator::Predicate(p.clone())])
        }
        Descriptor::Schema(s) => RuleOptions::new().validators(vec![Validator::Schema(s.clone())]),
        Descriptor::List(items) => RuleOptions::new().validators(
            items
                .iter()
                .filter_map(|item| match item {
                    Descriptor::Predicate(p) => Some(Validator::Predicate(p.clone())),
                    Descriptor::Schema(s) => Some(Validator::Schema(s.clone())),
                    _ => None,
                })
                .collect(),
        ),
        Descriptor::Options(options) => options.clone(),
        Descriptor::Literal(literal) => {
            let mut rule = Rule::assemble(
                required,
                property,
                RuleOptions::new().sanitizer(literal_sanitizer(property, literal)?),
            );
            rule.message = String::new();
            return Ok(rule);
        }
    };

    Ok(Rule::assemble(required, property, options))
}

fn literal_sanitizer(property: Option<&str>, literal: &Value) -> Result<Sanitizer, CompileError> {
    match literal {
        Value::Bool(_) => Ok(Sanitizer::new(|v| Value::Bool(is_truthy(v)))),
        Value::Number(_) => Ok(Sanitizer::new(|v| {
            number_value(f64::from(to_int32(to_number(v))))
        })),
        Value::String(_) => Ok(Sanitizer::new(|v| Value::String(to_display_string(v)))),
        other => Err(CompileError::InvalidRuleExpression {
            property: property.map(str::to_string),
            found: type_name(other).to_string(),
        }),
    }
}
