//! # Number Rule
//!
//! Accepts any value with a numeric reading (`7`, `"10.123"`, `true`) and
//! sanitizes it by parsing the leading number of its string form. Bounds
//! compare the value truncated to a 32-bit integer, so `NumberType::new()
//! .between(5.0, 10.0)` accepts `10.9`.

use serde_json::Value;
use sift_core::{number_value, parse_float, to_display_string, to_int32, to_number};
use sift_schema::{Descriptor, Predicate, RuleOptions, Sanitizer, Validator};

/// Builder for a number rule.
#[derive(Debug, Clone)]
pub struct NumberType {
    checks: Vec<Predicate>,
    message: Option<String>,
}

impl Default for NumberType {
    fn default() -> Self {
        Self {
            checks: vec![Predicate::on_value(is_number)],
            message: None,
        }
    }
}

impl NumberType {
    /// A rule that only requires a numeric reading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Truncated value is at least `min`.
    pub fn min(self, min: f64) -> Self {
        self.check(Predicate::on_value(move |v| truncated(v) >= min))
    }

    /// Truncated value is at most `max`.
    pub fn max(self, max: f64) -> Self {
        self.check(Predicate::on_value(move |v| truncated(v) <= max))
    }

    /// Truncated value lies in `min..=max`.
    pub fn between(self, min: f64, max: f64) -> Self {
        self.check(Predicate::on_value(move |v| {
            let t = truncated(v);
            t >= min && t <= max
        }))
    }

    /// An additional caller-supplied check.
    pub fn check(mut self, predicate: Predicate) -> Self {
        self.checks.push(predicate);
        self
    }

    /// Override the failure message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

fn is_number(value: &Value) -> bool {
    !to_number(value).is_nan()
}

fn truncated(value: &Value) -> f64 {
    f64::from(to_int32(to_number(value)))
}

/// Leading number of the value's string form; `null` if there is none.
pub fn sanitize_number(value: &Value) -> Value {
    number_value(parse_float(&to_display_string(value)))
}

impl From<NumberType> for Descriptor {
    fn from(rule: NumberType) -> Self {
        let mut options = RuleOptions::new()
            .sanitizer(Sanitizer::new(sanitize_number))
            .validators(rule.checks.into_iter().map(Validator::from).collect());
        options.message = rule.message;
        Descriptor::Options(options)
    }
}
