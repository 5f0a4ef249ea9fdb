//! # Array Rule
//!
//! Checks that the value is an array, optionally bounds its length, and
//! applies element rules to every element. Element rules come in two forms:
//!
//! - [`ArrayType::each`] adds a validator (a predicate or a nested schema)
//!   to one shared element rule, evaluated like any property rule.
//! - [`ArrayType::items`] adds a whole descriptor, compiled into its own
//!   element rule.
//!
//! Every element is evaluated even after one fails. Elements that are
//! `null` are treated as absent and pass. The sanitized value is a copy of
//! the array; element sanitizers do not apply.

use std::sync::OnceLock;

use serde_json::Value;
use sift_schema::{
    compile, test_value, CompileError, Descriptor, Predicate, Rule, RuleOptions, Sanitizer,
    Validator,
};

/// Builder for an array rule.
#[derive(Debug, Clone)]
pub struct ArrayType {
    checks: Vec<Predicate>,
    each: Vec<Validator>,
    items: Vec<Descriptor>,
    message: Option<String>,
}

impl Default for ArrayType {
    fn default() -> Self {
        Self {
            checks: vec![Predicate::on_value(Value::is_array)],
            each: Vec::new(),
            items: Vec::new(),
            message: None,
        }
    }
}

impl ArrayType {
    /// A rule that only requires an array.
    pub fn new() -> Self {
        Self::default()
    }

    /// At least `min` elements.
    pub fn min_len(self, min: usize) -> Self {
        self.check(Predicate::on_value(move |v| {
            v.as_array().is_some_and(|a| a.len() >= min)
        }))
    }

    /// Between `min` and `max` elements, inclusive.
    pub fn len_between(self, min: usize, max: usize) -> Self {
        self.check(Predicate::on_value(move |v| {
            v.as_array().is_some_and(|a| (min..=max).contains(&a.len()))
        }))
    }

    /// Validate every element with `validator`.
    pub fn each(mut self, validator: impl Into<Validator>) -> Self {
        self.each.push(validator.into());
        self
    }

    /// Validate every element against `descriptor`.
    pub fn items(mut self, descriptor: impl Into<Descriptor>) -> Self {
        self.items.push(descriptor.into());
        self
    }

    /// An additional check on the array itself.
    pub fn check(mut self, predicate: Predicate) -> Self {
        self.checks.push(predicate);
        self
    }

    /// Override the failure message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn element_rules(&self) -> Vec<Descriptor> {
        let mut rules = Vec::with_capacity(self.items.len() + 1);
        if !self.each.is_empty() {
            rules.push(Descriptor::Options(
                RuleOptions::new().validators(self.each.clone()),
            ));
        }
        rules.extend(self.items.iter().cloned());
        rules
    }
}

/// A predicate that passes when every element satisfies every rule.
///
/// The element rules compile on first use. A malformed element descriptor
/// is raised as a `CompileError` from `Schema::test`, not as invalid data.
fn elements_check(descriptors: Vec<Descriptor>) -> Predicate {
    let compiled: OnceLock<Result<Vec<Rule>, CompileError>> = OnceLock::new();
    Predicate::fallible(move |inv| {
        let Some(elements) = inv.value.as_array() else {
            return Ok(false);
        };
        let rules = compiled
            .get_or_init(|| {
                descriptors
                    .iter()
                    .map(|descriptor| compile(false, None, descriptor))
                    .collect()
            })
            .as_ref()
            .map_err(Clone::clone)?;

        let mut passed = true;
        for rule in rules {
            for element in elements {
                let outcome = test_value(rule, Some(element), inv.value, None, inv.extra)?;
                passed &= outcome.passed();
            }
        }
        Ok(passed)
    })
}

impl From<ArrayType> for Descriptor {
    fn from(rule: ArrayType) -> Self {
        let element_rules = rule.element_rules();
        let mut validators: Vec<Validator> =
            rule.checks.into_iter().map(Validator::from).collect();
        if !element_rules.is_empty() {
            validators.push(elements_check(element_rules).into());
        }

        let mut options = RuleOptions::new()
            .validators(validators)
            .sanitizer(Sanitizer::identity());
        options.message = rule.message;
        Descriptor::Options(options)
    }
}
