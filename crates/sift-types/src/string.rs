//! # String Rule
//!
//! Validates string length and pattern. Passing values are sanitized to
//! their trimmed string form, so numbers and booleans are accepted and
//! stringified unless a check rejects them.
//!
//! Lengths are counted in characters. Length checks fail for values that
//! are not strings; pattern checks test the string form of any value.

use regex::Regex;
use serde_json::Value;
use sift_core::to_display_string;
use sift_schema::{Descriptor, Predicate, RuleOptions, Sanitizer, Validator};

/// Builder for a string rule.
#[derive(Debug, Clone, Default)]
pub struct StringType {
    checks: Vec<Predicate>,
    message: Option<String>,
}

impl StringType {
    /// A rule with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// At most `max` characters.
    pub fn max_len(self, max: usize) -> Self {
        self.check(Predicate::on_value(move |v| {
            char_len(v).is_some_and(|len| len <= max)
        }))
    }

    /// At least `min` characters.
    pub fn min_len(self, min: usize) -> Self {
        self.check(Predicate::on_value(move |v| {
            char_len(v).is_some_and(|len| len >= min)
        }))
    }

    /// Between `min` and `max` characters, inclusive.
    pub fn len_between(self, min: usize, max: usize) -> Self {
        self.check(Predicate::on_value(move |v| {
            char_len(v).is_some_and(|len| (min..=max).contains(&len))
        }))
    }

    /// The string form matches `pattern`.
    pub fn pattern(self, pattern: Regex) -> Self {
        self.check(Predicate::on_value(move |v| {
            pattern.is_match(&to_display_string(v))
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

fn char_len(value: &Value) -> Option<usize> {
    value.as_str().map(|s| s.chars().count())
}

/// Trimmed string form of the value.
pub fn sanitize_string(value: &Value) -> Value {
    Value::String(to_display_string(value).trim().to_string())
}

impl From<StringType> for Descriptor {
    fn from(rule: StringType) -> Self {
        let mut options = RuleOptions::new().sanitizer(Sanitizer::new(sanitize_string));
        if !rule.checks.is_empty() {
            options = options.validators(rule.checks.into_iter().map(Validator::from).collect());
        }
        options.message = rule.message;
        Descriptor::Options(options)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sanitizing_twice_changes_nothing(s in "\\PC{0,40}") {
            let once = sanitize_string(&Value::String(s));
            prop_assert_eq!(sanitize_string(&once), once);
        }

        #[test]
        fn max_len_matches_char_count(s in "\\PC{0,20}", max in 0usize..20) {
            let schema = sift_schema::Schema::builder()
                .rule("s", StringType::new().max_len(max))
                .build();
            let valid = schema.test(&serde_json::json!({ "s": s })).unwrap().valid;
            prop_assert_eq!(valid, s.chars().count() <= max);
        }
    }
}
