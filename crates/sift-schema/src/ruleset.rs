//! # Ruleset Compiler
//!
//! Compiles a raw schema definition (ordered `(key, descriptor)` pairs)
//! into a [`Ruleset`]. Keys are parsed by [`PropertyKey`], so `"name?"`
//! yields an optional rule for `name`. Declaration order is preserved; it
//! is the order in which properties are evaluated and errors reported.

use std::collections::HashSet;

use sift_core::{CompileError, PropertyKey};

use crate::descriptor::Descriptor;
use crate::rule::{compile, Rule};

/// A compiled schema: property names mapped to rules, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Ruleset {
    rules: Vec<(String, Rule)>,
}

impl Ruleset {
    /// Number of declared properties.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no properties are declared.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up the rule for a property.
    pub fn get(&self, property: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, rule)| rule)
    }

    /// Iterate `(property, rule)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Property names in declaration order.
    pub fn properties(&self) -> Vec<&str> {
        self.rules.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Compile every entry of a raw definition.
///
/// # Errors
///
/// - `CompileError::DuplicateProperty` if two keys normalize to the same name.
/// - `CompileError::EmptyProperty` if a key names no property.
/// - Any error from compiling an individual descriptor.
pub fn compile_ruleset<'a, I>(definition: I) -> Result<Ruleset, CompileError>
where
    I: IntoIterator<Item = (&'a str, &'a Descriptor)>,
{
    let mut seen = HashSet::new();
    let mut rules = Vec::new();

    for (raw_key, descriptor) in definition {
        let key = PropertyKey::parse(raw_key)?;
        if !seen.insert(key.name().to_string()) {
            return Err(CompileError::DuplicateProperty {
                property: key.name().to_string(),
            });
        }
        let rule = compile(key.is_required(), Some(key.name()), descriptor)?;
        rules.push((key.name().to_string(), rule));
    }

    tracing::debug!(properties = rules.len(), "compiled ruleset");
    Ok(Ruleset { rules })
}
