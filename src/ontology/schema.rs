use std::path::Path;

use serde_json::Value;

use crate::{Error, Result};

/// Schema shipped with the crate, used unless `creator.schema_path` overrides it.
pub const BUILTIN_SCHEMA: &str = include_str!("../../schemas/ontology_definition.schema.json");

/// Loads the schema document, either from `path` or the built-in one.
///
/// # Errors
///
/// Fails when the file cannot be read or is not JSON.
pub fn load(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) => {
            std::fs::read_to_string(path).map_err(|source| Error::io_failure(path, source))?
        }
        None => BUILTIN_SCHEMA.to_string(),
    };
    serde_json::from_str(&text).map_err(|err| Error::InvalidSchema(err.to_string()))
}

/// Validates `document` against `schema`.
///
/// # Errors
///
/// [`Error::SchemaViolation`] names the first offending instance path and the
/// violated keyword, and carries every message the validator produced.
pub fn validate(document: &Value, schema: &Value) -> Result<()> {
    let validator =
        jsonschema::validator_for(schema).map_err(|err| Error::InvalidSchema(err.to_string()))?;

    let mut first: Option<(String, String)> = None;
    let mut messages = Vec::new();
    for err in validator.iter_errors(document) {
        let path = err.instance_path.to_string();
        if first.is_none() {
            let schema_path = err.schema_path.to_string();
            let constraint = schema_path
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            first = Some((path.clone(), constraint));
        }
        messages.push(format!("{path}: {err}"));
    }

    match first {
        None => Ok(()),
        Some((path, constraint)) => {
            tracing::debug!(violations = messages.len(), "ontology definition rejected");
            Err(Error::SchemaViolation {
                path: if path.is_empty() { "/".to_string() } else { path },
                constraint,
                messages,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{load, validate};
    use crate::Error;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn minimal_document_is_valid() {
        let schema = load(None).expect("built-in schema");
        let document = json!({
            "ontology_iri": "http://example.org/onto",
            "classes": {"Person": "Thing"}
        });
        validate(&document, &schema).expect("valid document");
    }

    #[rstest]
    #[case(json!({"classes": {}}), "required")]
    #[case(json!({"ontology_iri": "http://example.org/onto", "classes": {}, "extra": 1}), "additionalProperties")]
    #[case(json!({"ontology_iri": "http://example.org/onto", "classes": {"A": "Thing"}, "disjoint_classes": ["A"]}), "minItems")]
    #[case(json!({"ontology_iri": "http://example.org/onto", "classes": {}, "general_axioms": [{"axiom_type": "SymmetricProperty", "properties": []}]}), "enum")]
    #[case(json!({"ontology_iri": "http://example.org/onto", "classes": {}, "object_properties": {"p": {"property_type": ["Reflexive"]}}}), "enum")]
    fn violations_name_the_constraint(#[case] document: serde_json::Value, #[case] expected: &str) {
        let schema = load(None).expect("built-in schema");
        let err = validate(&document, &schema).expect_err("violation");
        let Error::SchemaViolation {
            constraint,
            messages,
            ..
        } = err
        else {
            panic!("unexpected error {err:?}");
        };
        assert_eq!(constraint, expected);
        assert!(!messages.is_empty());
    }

    #[test]
    fn violation_points_at_the_offending_instance() {
        let schema = load(None).expect("built-in schema");
        let document = json!({
            "ontology_iri": "http://example.org/onto",
            "classes": {"Person": 42}
        });
        let err = validate(&document, &schema).expect_err("violation");
        assert!(matches!(err, Error::SchemaViolation { ref path, .. } if path == "/classes/Person"));
    }
}
