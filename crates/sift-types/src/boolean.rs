//! # Boolean and Pass Rules
//!
//! Both accept any present value. `BooleanType` sanitizes by truthiness;
//! `PassType` leaves the value untouched. `null` is absent, not false, so a
//! required boolean still rejects it.

use serde_json::Value;
use sift_core::is_truthy;
use sift_schema::{Descriptor, RuleOptions, Sanitizer};

/// Accepts any present value and sanitizes it to a boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl BooleanType {
    /// The boolean rule.
    pub fn new() -> Self {
        Self
    }
}

impl From<BooleanType> for Descriptor {
    fn from(_: BooleanType) -> Self {
        Descriptor::Options(
            RuleOptions::new().sanitizer(Sanitizer::new(|v| Value::Bool(is_truthy(v)))),
        )
    }
}

/// Accepts any present value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassType;

impl PassType {
    /// The pass rule.
    pub fn new() -> Self {
        Self
    }
}

impl From<PassType> for Descriptor {
    fn from(_: PassType) -> Self {
        Descriptor::Options(RuleOptions::new())
    }
}
