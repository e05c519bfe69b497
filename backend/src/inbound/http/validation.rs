//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies are validated with `validator` derives; the resulting
//! [`ValidationErrors`] tree is flattened into [`FieldViolation`]s for the
//! classifier. Path and query values arrive as raw strings and are parsed
//! here so that a bad value becomes a type-mismatch failure naming the
//! parameter, never a framework rejection.

use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use super::error::ApiError;

/// One rejected input field as reported by the validation engine.
///
/// `path` keeps the full dotted location (`address.city`, `roles[1]`); the
/// classifier shortens it to the final segment for clients.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub path: String,
    pub message: String,
    pub rejected_value: Option<Value>,
}

impl FieldViolation {
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        rejected_value: Option<Value>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            rejected_value,
        }
    }

    fn from_error(path: &str, error: &ValidationError) -> Self {
        let message = error
            .message
            .as_deref()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("failed `{}` validation", error.code));
        Self::new(path, message, error.params.get("value").cloned())
    }
}

/// Flatten a validation report into violations ordered by field path.
///
/// Violations on the same field keep the order in which the engine raised
/// them.
pub fn flatten_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    collect(None, errors, &mut violations);
    violations.sort_by(|left, right| left.path.cmp(&right.path));
    violations
}

fn collect(prefix: Option<&str>, errors: &ValidationErrors, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|error| FieldViolation::from_error(&path, error)));
            }
            ValidationErrorsKind::Struct(nested) => collect(Some(&path), nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(Some(&format!("{path}[{index}]")), nested, out);
                }
            }
        }
    }
}

/// Run `validator` rules on a decoded payload.
///
/// # Examples
/// ```
/// use auth_backend::inbound::http::validation::validate_payload;
/// use validator::Validate;
///
/// #[derive(Validate)]
/// struct Probe {
///     #[validate(length(min = 2))]
///     name: String,
/// }
///
/// assert!(validate_payload(&Probe { name: "Ada".into() }).is_ok());
/// assert!(validate_payload(&Probe { name: "A".into() }).is_err());
/// ```
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload
        .validate()
        .map_err(|errors| ApiError::Validation(flatten_violations(&errors)))
}

/// Newtype wrapper for HTTP parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

fn type_mismatch(field: FieldName, expected: &'static str) -> ApiError {
    ApiError::TypeMismatch {
        name: field.as_str().to_owned(),
        expected,
    }
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| type_mismatch(field, "UUID"))
}

/// Parse an optional non-negative integer, falling back to `default`.
pub(crate) fn parse_u32_or(
    value: Option<&str>,
    field: FieldName,
    default: u32,
) -> Result<u32, ApiError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| type_mismatch(field, "integer")),
    }
}

/// Demand a present, non-blank parameter.
pub(crate) fn require_param(value: Option<String>, field: FieldName) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::MissingParameter {
            name: field.as_str().to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Debug, Validate)]
    struct Address {
        #[validate(length(min = 2, message = "city is too short"))]
        city: String,
    }

    #[derive(Debug, Validate)]
    struct Signup {
        #[validate(length(min = 2, max = 100, message = "name must be 2-100 characters"))]
        name: String,
        #[validate(email(message = "email must be well-formed"))]
        email: String,
        #[validate(nested)]
        address: Address,
    }

    const NAME: FieldName = FieldName::new("name");

    #[rstest]
    fn flattens_field_and_nested_violations_in_path_order() {
        let signup = Signup {
            name: "A".into(),
            email: "nope".into(),
            address: Address { city: "X".into() },
        };
        let errors = signup.validate().expect_err("invalid signup");
        let violations = flatten_violations(&errors);

        let paths: Vec<_> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, ["address.city", "email", "name"]);
        assert_eq!(violations[2].message, "name must be 2-100 characters");
        assert_eq!(violations[2].rejected_value, Some(json!("A")));
    }

    #[rstest]
    fn valid_payload_passes() {
        let signup = Signup {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            address: Address {
                city: "London".into(),
            },
        };
        assert!(validate_payload(&signup).is_ok());
    }

    #[rstest]
    fn missing_message_falls_back_to_rule_code() {
        let mut errors = ValidationErrors::new();
        errors.add("age", ValidationError::new("range"));
        let violations = flatten_violations(&errors);
        assert_eq!(violations[0].message, "failed `range` validation");
        assert_eq!(violations[0].rejected_value, None);
    }

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
    #[case("not-a-uuid", false)]
    fn parse_uuid_reports_type_mismatch(#[case] raw: &str, #[case] ok: bool) {
        match parse_uuid(raw, FieldName::new("id")) {
            Ok(_) => assert!(ok),
            Err(ApiError::TypeMismatch { name, expected }) => {
                assert!(!ok);
                assert_eq!(name, "id");
                assert_eq!(expected, "UUID");
            }
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    #[rstest]
    #[case(None, Ok(20))]
    #[case(Some("3"), Ok(3))]
    #[case(Some("-1"), Err(()))]
    #[case(Some("three"), Err(()))]
    fn parse_u32_or_defaults_and_rejects(
        #[case] raw: Option<&str>,
        #[case] expected: Result<u32, ()>,
    ) {
        let parsed = parse_u32_or(raw, FieldName::new("size"), 20).map_err(|_| ());
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("  "))]
    fn require_param_rejects_absent_or_blank(#[case] raw: Option<&str>) {
        let err = require_param(raw.map(str::to_owned), NAME).expect_err("missing");
        assert!(matches!(err, ApiError::MissingParameter { name } if name == "name"));
    }
}
