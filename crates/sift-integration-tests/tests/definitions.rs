//! # Declarative Definitions
//!
//! Schemas loaded from YAML and JSON text behave like schemas built in code.

mod common;

use serde_json::json;
use sift_types::{DefinitionError, SchemaSpec, SiftError};

const SIGNUP: &str = r#"
username: { type: string, min: 3, max: 16, pattern: "^[a-z0-9_]+$" }
"email?": { type: string, pattern: "@" }
age: { type: number, min: 13, message: "must be at least 13" }
interests: { type: array, max: 3, items: { type: string, min: 1 } }
newsletter: true
profile:
  type: object
  properties:
    "bio?": { type: string, max: 40 }
    visits: 0
"#;

#[test]
fn yaml_signup_form_round_trip() {
    common::init_tracing();
    let schema = SchemaSpec::from_yaml_str(SIGNUP).unwrap().build().unwrap();

    let result = schema
        .test(&json!({
            "username": "ada_l",
            "age": "36",
            "interests": ["math", "engines"],
            "newsletter": "yes",
            "profile": {"visits": "12"}
        }))
        .unwrap();

    assert!(result.valid, "{:?}", result.errors);
    assert_eq!(
        result.sanitized(),
        json!({
            "username": "ada_l",
            "age": 36,
            "interests": ["math", "engines"],
            "newsletter": true,
            "profile": {"visits": 12}
        })
    );
}

#[test]
fn yaml_signup_form_errors() {
    let schema = SchemaSpec::from_yaml_str(SIGNUP).unwrap().build().unwrap();

    let result = schema
        .test(&json!({
            "username": "Ada Lovelace",
            "email": "nope",
            "age": 9,
            "interests": ["a", "b", "c", "d"],
            "profile": {"bio": "x".repeat(41), "visits": 1}
        }))
        .unwrap();

    assert!(!result.valid);
    assert_eq!(
        result.errors,
        vec![
            "Field \"username\" is invalid.",
            "Field \"email\" is invalid.",
            "must be at least 13",
            "Field \"interests\" is invalid.",
            "\"newsletter\" is required.",
            "Field \"bio\" is invalid.",
        ]
    );
}

#[test]
fn json_and_yaml_definitions_agree() {
    let yaml = SchemaSpec::from_yaml_str("a: { type: number, max: 3 }\nb: \"\"\n").unwrap();
    let json = SchemaSpec::from_json_str(r#"{"a": {"type": "number", "max": 3}, "b": ""}"#).unwrap();
    assert_eq!(yaml, json);

    let input = json!({"a": "2.5", "b": 10});
    assert_eq!(
        yaml.build().unwrap().test(&input).unwrap(),
        json.build().unwrap().test(&input).unwrap()
    );
}

#[test]
fn definition_errors_are_reported_before_testing() {
    let err = SchemaSpec::from_yaml_str("a: { type: string, pattern: '[' }")
        .unwrap()
        .build()
        .unwrap_err();
    assert!(matches!(err, DefinitionError::InvalidPattern { .. }));

    let err: SiftError = SchemaSpec::from_yaml_str("a: [unclosed").unwrap_err().into();
    assert!(err.to_string().starts_with("definition error:"));
}
