//! Validation of render data against a blueprint's variable schema.
//!
//! Every declared variable is checked in declaration order and every
//! violation is reported; validation never stops at the first error.
//! Keys in the data that the schema does not declare are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::metadata::{BlueprintMetadata, VariableSpec, VariableType};
use crate::value;

pub const TEMPLATE_NOT_FOUND: &str = "Template type not found";

/// Outcome of validating one data object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// The single-error result for an unknown template type.
    pub fn not_found() -> Self {
        Self::from_errors(vec![TEMPLATE_NOT_FOUND.to_string()])
    }
}

/// Check `data` against every variable declared by `metadata`.
///
/// A non-object `data` has no keys, so it only fails on required variables.
pub fn validate(metadata: &BlueprintMetadata, data: &Value) -> ValidationResult {
    let errors = metadata
        .variables
        .iter()
        .filter_map(|spec| check_variable(spec, data.get(&spec.name)))
        .collect();
    ValidationResult::from_errors(errors)
}

fn check_variable(spec: &VariableSpec, value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => spec
            .required
            .then(|| format!("Required variable missing: {}", spec.name)),
        Some(v) if !matches_type(spec.var_type, v) => Some(format!(
            "Invalid type for {}: expected {}",
            spec.name, spec.var_type
        )),
        Some(_) => None,
    }
}

/// Type-check dispatch for each declared variable type.
pub fn matches_type(var_type: VariableType, value: &Value) -> bool {
    match var_type {
        VariableType::String => value.is_string(),
        VariableType::Number => value.is_number(),
        VariableType::Boolean => value.is_boolean(),
        VariableType::Array => value.is_array(),
        VariableType::Date => value::to_datetime(value).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> BlueprintMetadata {
        BlueprintMetadata::parse(
            "report",
            r#"{ "type": "report", "variables": [
                { "name": "title", "type": "string", "required": true },
                { "name": "count", "type": "number", "required": true },
                { "name": "published", "type": "boolean", "required": false },
                { "name": "tags", "type": "array", "required": false },
                { "name": "date", "type": "date", "required": true }
            ] }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_data() {
        let data = json!({
            "title": "Q1",
            "count": 3,
            "published": true,
            "tags": ["a", "b"],
            "date": "2024-01-15"
        });
        let result = validate(&metadata(), &data);
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_missing_required_in_declaration_order() {
        let result = validate(&metadata(), &json!({}));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "Required variable missing: title",
                "Required variable missing: count",
                "Required variable missing: date",
            ]
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let data = json!({ "title": null, "count": 1, "date": "2024-01-15" });
        let result = validate(&metadata(), &data);
        assert_eq!(result.errors, vec!["Required variable missing: title"]);
    }

    #[test]
    fn test_type_mismatches_all_reported() {
        let data = json!({
            "date": "not a date",
            "tags": "a,b",
            "published": "yes",
            "count": "3",
            "title": 7
        });
        let result = validate(&metadata(), &data);
        assert_eq!(
            result.errors,
            vec![
                "Invalid type for title: expected string",
                "Invalid type for count: expected number",
                "Invalid type for published: expected boolean",
                "Invalid type for tags: expected array",
                "Invalid type for date: expected date",
            ]
        );
    }

    #[test]
    fn test_mixed_missing_and_mismatch() {
        let data = json!({ "count": "many", "date": 1_705_314_600_000i64 });
        let result = validate(&metadata(), &data);
        assert_eq!(
            result.errors,
            vec![
                "Required variable missing: title",
                "Invalid type for count: expected number",
            ]
        );
    }

    #[test]
    fn test_optional_absent_and_extra_keys_ignored() {
        let data = json!({ "title": "x", "count": 0, "date": "2024-01-15", "extra": {"a": 1} });
        assert!(validate(&metadata(), &data).valid);
    }

    #[test]
    fn test_date_accepts_convertible_values() {
        assert!(matches_type(VariableType::Date, &json!("2024-01-15T10:00:00Z")));
        assert!(matches_type(VariableType::Date, &json!(0)));
        assert!(!matches_type(VariableType::Date, &json!(true)));
        assert!(!matches_type(VariableType::Date, &json!("")));
    }

    #[test]
    fn test_non_object_data() {
        let result = validate(&metadata(), &json!("scalar"));
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_not_found_result() {
        let result = ValidationResult::not_found();
        assert!(!result.valid);
        assert_eq!(result.errors, vec![TEMPLATE_NOT_FOUND]);
    }
}
