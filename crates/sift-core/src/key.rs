//! # Property Keys
//!
//! Raw schema keys carry the optional marker: `"middleName?"` declares an
//! optional property named `middleName`. Exactly one trailing `?` marks a
//! key optional; any other key (including one ending in `??`) is a required
//! property named verbatim.

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Suffix marking a property optional.
pub const OPTIONAL_MARKER: char = '?';

/// Property name whose passing value is never written to the sanitized output.
pub const CATCH_ALL: &str = "*";

/// A parsed schema key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyKey {
    name: String,
    required: bool,
}

impl PropertyKey {
    /// Parse a raw schema key, splitting off the optional marker.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::EmptyProperty` when nothing remains after the
    /// marker is removed.
    pub fn parse(raw: &str) -> Result<Self, CompileError> {
        let (name, required) = match raw.strip_suffix(OPTIONAL_MARKER) {
            Some(stripped) if !stripped.ends_with(OPTIONAL_MARKER) => (stripped, false),
            _ => (raw, true),
        };

        if name.is_empty() {
            return Err(CompileError::EmptyProperty {
                key: raw.to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            required,
        })
    }

    /// The canonical property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the property must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether this is the `*` catch-all key.
    pub fn is_catch_all(&self) -> bool {
        self.name == CATCH_ALL
    }
}
