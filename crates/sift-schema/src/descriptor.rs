//! # Rule Descriptors
//!
//! A descriptor is the caller-authored description of how one property is
//! validated, before compilation. Descriptors form a closed sum type so the
//! rule compiler dispatches on shape once, at compile time, instead of
//! inspecting values during evaluation.
//!
//! Caller-supplied code enters the engine through three closure wrappers:
//!
//! - [`Predicate`]: a check over an [`Invocation`]. Predicates may fail by
//!   returning an error or by panicking; both count as a failed check.
//! - [`Sanitizer`]: maps a validated value to its canonical form.
//! - [`Chooser`]: picks a descriptor at evaluation time (dynamic rules).
//!   A panic while choosing fails the property.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use sift_core::CompileError;

use crate::schema::Schema;

/// The arguments handed to a predicate or chooser.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// The value under test.
    pub value: &'a Value,
    /// The object that contains the value. For array elements this is the
    /// array itself.
    pub object: &'a Value,
    /// Extra context arguments passed to `Schema::test_with`.
    pub extra: &'a [Value],
}

impl<'a> Invocation<'a> {
    /// Look up a sibling property of the value on the containing object.
    pub fn sibling(&self, property: &str) -> Option<&'a Value> {
        self.object.get(property)
    }
}

type PredicateFn = dyn Fn(&Invocation<'_>) -> anyhow::Result<bool> + Send + Sync;
type SanitizerFn = dyn Fn(&Value) -> Value + Send + Sync;
type ChooserFn = dyn Fn(&Invocation<'_>) -> Descriptor + Send + Sync;

/// A caller-supplied check.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    /// Wrap an infallible check over the full invocation.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(move |inv| Ok(check(inv))))
    }

    /// Wrap a check that may fail. An `Err` counts as a failed check.
    pub fn fallible<F>(check: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    /// Wrap a check that only looks at the value.
    pub fn on_value<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(move |inv| check(inv.value))
    }

    /// A check that always passes.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Run the check. Errors and panics raised by the caller's code are
    /// contained here and reported as `false`.
    pub fn run(&self, invocation: &Invocation<'_>) -> bool {
        self.try_run(invocation).unwrap_or(false)
    }

    /// Run the check, passing through a `CompileError` raised while the
    /// check compiled a nested rule. Any other error or panic is reported as
    /// `false`.
    ///
    /// # Errors
    ///
    /// Returns the `CompileError` the check failed with, if any.
    pub fn try_run(&self, invocation: &Invocation<'_>) -> Result<bool, CompileError> {
        match contain_panic("validator", || (self.0)(invocation)) {
            Some(Ok(passed)) => Ok(passed),
            Some(Err(error)) => match error.downcast::<CompileError>() {
                Ok(compile) => Err(compile),
                Err(error) => {
                    tracing::debug!(error = %error, "validator returned an error; treating as failed");
                    Ok(false)
                }
            },
            None => Ok(false),
        }
    }
}

/// Call into caller-supplied code, turning a panic into `None`.
fn contain_panic<T>(role: &'static str, call: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(value) => Some(value),
        Err(payload) => {
            tracing::debug!(
                role,
                panic = panic_message(payload.as_ref()),
                "caller code panicked; treating as failed"
            );
            None
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

/// Maps a validated value to its sanitized form.
#[derive(Clone)]
pub struct Sanitizer(Arc<SanitizerFn>);

impl Sanitizer {
    /// Wrap a sanitizing function.
    pub fn new<F>(sanitize: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(sanitize))
    }

    /// Returns the value unchanged.
    pub fn identity() -> Self {
        Self::new(Value::clone)
    }

    /// Apply the sanitizer.
    pub fn apply(&self, value: &Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sanitizer(..)")
    }
}

/// Chooses the descriptor to apply to a value at evaluation time.
#[derive(Clone)]
pub struct Chooser(Arc<ChooserFn>);

impl Chooser {
    /// Wrap a choosing function.
    pub fn new<F>(choose: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Descriptor + Send + Sync + 'static,
    {
        Self(Arc::new(choose))
    }

    /// Pick a descriptor for this invocation. Returns `None` if the
    /// choosing function panicked.
    pub fn choose(&self, invocation: &Invocation<'_>) -> Option<Descriptor> {
        contain_panic("chooser", || (self.0)(invocation))
    }
}

impl fmt::Debug for Chooser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Chooser(..)")
    }
}

/// A compiled validator: either a plain check or a nested schema.
#[derive(Debug, Clone)]
pub enum Validator {
    /// A caller-supplied check.
    Predicate(Predicate),
    /// A nested schema applied to object- or array-valued properties.
    Schema(Arc<Schema>),
}

impl Validator {
    /// The nested schema, if this validator is one.
    pub fn as_schema(&self) -> Option<&Arc<Schema>> {
        match self {
            Self::Schema(schema) => Some(schema),
            Self::Predicate(_) => None,
        }
    }

    /// The predicate, if this validator is one.
    pub fn as_predicate(&self) -> Option<&Predicate> {
        match self {
            Self::Predicate(predicate) => Some(predicate),
            Self::Schema(_) => None,
        }
    }
}

impl From<Predicate> for Validator {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<Schema> for Validator {
    fn from(schema: Schema) -> Self {
        Self::Schema(Arc::new(schema))
    }
}

impl From<Arc<Schema>> for Validator {
    fn from(schema: Arc<Schema>) -> Self {
        Self::Schema(schema)
    }
}

/// An explicit rule record: validators plus optional message, sanitizer and
/// dynamic chooser. Missing parts take the rule defaults at compile time.
#[derive(Debug, Clone, Default)]
pub struct RuleOptions {
    /// Validators to run, in order.
    pub validators: Option<Vec<Validator>>,
    /// Error message reported when the rule fails.
    pub message: Option<String>,
    /// Sanitizer applied to passing values.
    pub sanitizer: Option<Sanitizer>,
    /// Chooser that replaces this rule at evaluation time.
    pub dynamic: Option<Chooser>,
}

impl RuleOptions {
    /// Empty options; every part defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options whose rule is chosen at evaluation time.
    pub fn dynamic(chooser: Chooser) -> Self {
        Self {
            dynamic: Some(chooser),
            ..Self::default()
        }
    }

    /// Append a validator.
    pub fn validator(mut self, validator: impl Into<Validator>) -> Self {
        self.validators
            .get_or_insert_with(Vec::new)
            .push(validator.into());
        self
    }

    /// Replace the validator list.
    pub fn validators(mut self, validators: Vec<Validator>) -> Self {
        self.validators = Some(validators);
        self
    }

    /// Set the failure message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the sanitizer.
    pub fn sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }
}

/// A raw rule description, before compilation.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// A single check.
    Predicate(Predicate),
    /// A nested schema.
    Schema(Arc<Schema>),
    /// A list whose checks and schemas become the validators. Other
    /// elements are ignored.
    List(Vec<Descriptor>),
    /// An explicit rule record.
    Options(RuleOptions),
    /// A literal. Booleans, numbers and strings select a coercion-only rule;
    /// anything else fails to compile.
    Literal(Value),
}

impl Descriptor {
    /// Shorthand for a value-only check.
    pub fn check<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::on_value(check))
    }
}

impl From<Predicate> for Descriptor {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<Schema> for Descriptor {
    fn from(schema: Schema) -> Self {
        Self::Schema(Arc::new(schema))
    }
}

impl From<Arc<Schema>> for Descriptor {
    fn from(schema: Arc<Schema>) -> Self {
        Self::Schema(schema)
    }
}

impl From<Validator> for Descriptor {
    fn from(validator: Validator) -> Self {
        match validator {
            Validator::Predicate(p) => Self::Predicate(p),
            Validator::Schema(s) => Self::Schema(s),
        }
    }
}

impl From<Vec<Descriptor>> for Descriptor {
    fn from(items: Vec<Descriptor>) -> Self {
        Self::List(items)
    }
}

impl From<RuleOptions> for Descriptor {
    fn from(options: RuleOptions) -> Self {
        Self::Options(options)
    }
}

impl From<Value> for Descriptor {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<bool> for Descriptor {
    fn from(b: bool) -> Self {
        Self::Literal(Value::Bool(b))
    }
}

impl From<i64> for Descriptor {
    fn from(n: i64) -> Self {
        Self::Literal(Value::from(n))
    }
}

impl From<f64> for Descriptor {
    fn from(n: f64) -> Self {
        Self::Literal(Value::from(n))
    }
}

impl From<&str> for Descriptor {
    fn from(s: &str) -> Self {
        Self::Literal(Value::String(s.to_string()))
    }
}

impl From<String> for Descriptor {
    fn from(s: String) -> Self {
        Self::Literal(Value::String(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoke(predicate: &Predicate, value: &Value) -> bool {
        predicate.run(&Invocation {
            value,
            object: &Value::Null,
            extra: &[],
        })
    }

    #[test]
    fn predicate_returns_check_result() {
        let even = Predicate::on_value(|v| v.as_i64().is_some_and(|n| n % 2 == 0));
        assert!(invoke(&even, &json!(4)));
        assert!(!invoke(&even, &json!(3)));
    }

    #[test]
    fn predicate_error_is_failure() {
        let failing = Predicate::fallible(|_| Err(anyhow::anyhow!("boom")));
        assert!(!invoke(&failing, &json!(1)));
    }

    #[test]
    fn predicate_panic_is_failure() {
        let panicking = Predicate::on_value(|_| panic!("validator bug"));
        assert!(!invoke(&panicking, &json!(1)));
    }

    #[test]
    fn compile_error_passes_through_try_run() {
        let nested = Predicate::fallible(|_| {
            Err(CompileError::EmptyProperty { key: "?".into() }.into())
        });
        let inv = Invocation {
            value: &json!(1),
            object: &Value::Null,
            extra: &[],
        };
        assert_eq!(
            nested.try_run(&inv),
            Err(CompileError::EmptyProperty { key: "?".into() })
        );
        assert!(!nested.run(&inv));
    }

    #[test]
    fn invocation_exposes_siblings() {
        let object = json!({"password": "s3cret", "confirm": "s3cret"});
        let matches = Predicate::new(|inv| inv.sibling("password") == Some(inv.value));
        assert!(matches.run(&Invocation {
            value: &object["confirm"],
            object: &object,
            extra: &[],
        }));
    }

    #[test]
    fn literal_conversions() {
        assert!(matches!(Descriptor::from(true), Descriptor::Literal(Value::Bool(true))));
        assert!(matches!(Descriptor::from("x"), Descriptor::Literal(Value::String(_))));
        assert!(matches!(Descriptor::from(0i64), Descriptor::Literal(Value::Number(_))));
    }

    #[test]
    fn options_builder_accumulates_validators() {
        let options = RuleOptions::new()
            .validator(Predicate::always())
            .validator(Predicate::always())
            .message("nope");
        assert_eq!(options.validators.as_ref().map(Vec::len), Some(2));
        assert_eq!(options.message.as_deref(), Some("nope"));
    }

    #[test]
    fn identity_sanitizer_clones() {
        let value = json!({"a": [1, 2]});
        assert_eq!(Sanitizer::identity().apply(&value), value);
    }
}
