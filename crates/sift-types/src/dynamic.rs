//! # Dynamic Rule
//!
//! Chooses the rule for a value at evaluation time. The chooser sees the
//! value, the containing object and the extra arguments, so the choice can
//! depend on sibling fields. The chosen descriptor is compiled as an
//! optional rule for the same property.

use sift_schema::{Chooser, Descriptor, Invocation, RuleOptions};

/// A rule selected at evaluation time.
#[derive(Debug, Clone)]
pub struct DynamicType(Chooser);

impl DynamicType {
    /// Wrap a choosing function.
    pub fn new<F>(choose: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Descriptor + Send + Sync + 'static,
    {
        Self(Chooser::new(choose))
    }
}

impl From<DynamicType> for Descriptor {
    fn from(rule: DynamicType) -> Self {
        Descriptor::Options(RuleOptions::dynamic(rule.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NumberType, StringType};
    use serde_json::json;
    use sift_schema::{Predicate, Schema};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn chooses_rule_by_value() {
        let v1_calls = Arc::new(AtomicUsize::new(0));
        let v2_calls = Arc::new(AtomicUsize::new(0));
        let (c1, c2) = (v1_calls.clone(), v2_calls.clone());
        let v1 = Predicate::on_value(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
            true
        });
        let v2 = Predicate::on_value(move |_| {
            c2.fetch_add(1, Ordering::SeqCst);
            true
        });

        let schema = Schema::builder()
            .rule(
                "foo",
                DynamicType::new(move |inv| {
                    if inv.value == &json!(3) {
                        v1.clone().into()
                    } else {
                        v2.clone().into()
                    }
                }),
            )
            .build();

        schema.test(&json!({"foo": 3})).unwrap();
        assert_eq!(v1_calls.load(Ordering::SeqCst), 1);
        assert_eq!(v2_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn chooses_rule_by_sibling() {
        let schema = Schema::builder()
            .rule("kind", StringType::new())
            .rule(
                "value",
                DynamicType::new(|inv| match inv.sibling("kind").and_then(|k| k.as_str()) {
                    Some("number") => NumberType::new().into(),
                    _ => StringType::new().max_len(3).into(),
                }),
            )
            .build();

        let numeric = schema.test(&json!({"kind": "number", "value": "12.5"})).unwrap();
        assert!(numeric.valid);
        assert_eq!(numeric.object["value"], json!(12.5));

        let text = schema.test(&json!({"kind": "text", "value": "long"})).unwrap();
        assert!(!text.valid);
    }

    #[test]
    fn dynamic_rule_still_requires_presence() {
        let schema = Schema::builder()
            .rule("foo", DynamicType::new(|_| Descriptor::from(true)))
            .build();
        let result = schema.test(&json!({})).unwrap();
        assert_eq!(result.errors, vec!["\"foo\" is required."]);
    }
}
