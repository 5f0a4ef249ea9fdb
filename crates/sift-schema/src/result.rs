//! # Validation Results
//!
//! The aggregate outcome of testing an object against a schema, and the
//! error form used when a caller wants invalid data as an `Err`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::evaluate::PropertyOutcome;

/// The verdict, errors and sanitized object produced by `Schema::test`.
///
/// `object` holds exactly the properties that passed and were present;
/// absent optional properties never appear, even if their rule has a
/// sanitizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True if every property passed.
    pub valid: bool,
    /// Messages of failing properties, in declaration order.
    pub errors: Vec<String>,
    /// Sanitized values of passing properties.
    pub object: Map<String, Value>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            object: Map::new(),
        }
    }
}

impl ValidationResult {
    /// Fold one property outcome into the aggregate.
    pub(crate) fn absorb(&mut self, outcome: PropertyOutcome) {
        match outcome {
            PropertyOutcome::Pass { field: Some(field) } => {
                self.object.insert(field.name, field.value);
            }
            PropertyOutcome::Pass { field: None } => {}
            PropertyOutcome::Fail { messages } => {
                self.valid = false;
                self.errors.extend(messages);
            }
        }
    }

    /// The sanitized object as a JSON value.
    pub fn sanitized(&self) -> Value {
        Value::Object(self.object.clone())
    }

    /// Convert into the sanitized object, or the errors if invalid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when `valid` is false.
    pub fn into_result(self) -> Result<Map<String, Value>, ValidationErrors> {
        if self.valid {
            Ok(self.object)
        } else {
            Err(ValidationErrors {
                messages: self.errors,
            })
        }
    }
}

/// The messages of a failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", render(.messages))]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns a slice of all messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<String> {
        self.messages
    }
}

fn render(messages: &[String]) -> Rendered<'_> {
    Rendered(messages)
}

struct Rendered<'a>(&'a [String]);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {message}")?;
        }
        Ok(())
    }
}
