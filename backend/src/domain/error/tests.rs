//! Tests for the error catalogue and domain error constructors.

use super::*;
use rstest::rstest;
use std::collections::HashSet;
use std::error::Error as _;

#[derive(Debug, thiserror::Error)]
#[error("connection reset")]
struct ConnectionReset;

#[rstest]
#[case(ErrorCode::AuthInvalidCredentials, "AUTH_001", "AUTH_INVALID_CREDENTIALS")]
#[case(ErrorCode::AuthTokenExpired, "AUTH_002", "AUTH_TOKEN_EXPIRED")]
#[case(ErrorCode::AuthAccessDenied, "AUTH_003", "AUTH_ACCESS_DENIED")]
#[case(ErrorCode::AuthAccountLocked, "AUTH_004", "AUTH_ACCOUNT_LOCKED")]
#[case(ErrorCode::AuthAccountDisabled, "AUTH_005", "AUTH_ACCOUNT_DISABLED")]
#[case(ErrorCode::UserNotFound, "USER_001", "USER_NOT_FOUND")]
#[case(ErrorCode::UserEmailExists, "USER_002", "USER_EMAIL_EXISTS")]
#[case(ErrorCode::UserInvalidPassword, "USER_003", "USER_INVALID_PASSWORD")]
#[case(ErrorCode::RoleNotFound, "ROLE_001", "ROLE_NOT_FOUND")]
#[case(ErrorCode::RoleAlreadyAssigned, "ROLE_002", "ROLE_ALREADY_ASSIGNED")]
#[case(ErrorCode::ValidationFailed, "VAL_001", "VALIDATION_FAILED")]
#[case(ErrorCode::ResourceNotFound, "RES_001", "RESOURCE_NOT_FOUND")]
#[case(ErrorCode::OperationNotAllowed, "RES_002", "OPERATION_NOT_ALLOWED")]
#[case(ErrorCode::InternalError, "SYS_001", "INTERNAL_ERROR")]
#[case(ErrorCode::BadRequest, "SYS_002", "BAD_REQUEST")]
fn catalogue_codes_are_stable(
    #[case] code: ErrorCode,
    #[case] wire: &str,
    #[case] name: &str,
) {
    assert_eq!(code.as_str(), wire);
    assert_eq!(code.name(), name);
    assert_eq!(
        serde_json::to_value(code).expect("serialise code"),
        serde_json::Value::String(wire.to_owned())
    );
}

#[rstest]
fn catalogue_wire_codes_are_unique() {
    let codes: HashSet<_> = ErrorCode::ALL.iter().map(|code| code.as_str()).collect();
    assert_eq!(codes.len(), ErrorCode::ALL.len());
}

#[rstest]
fn wire_code_prefix_matches_family() {
    for code in ErrorCode::ALL {
        let prefix = match code.family() {
            ErrorFamily::Auth => vec!["AUTH_"],
            ErrorFamily::User => vec!["USER_"],
            ErrorFamily::Role => vec!["ROLE_"],
            ErrorFamily::Validation => vec!["VAL_"],
            ErrorFamily::Resource | ErrorFamily::System => vec!["RES_", "SYS_"],
        };
        assert!(
            prefix.iter().any(|p| code.as_str().starts_with(p)),
            "{code} does not match family {:?}",
            code.family()
        );
    }
}

#[rstest]
fn every_code_has_a_default_message() {
    for code in ErrorCode::ALL {
        assert!(!code.default_message().trim().is_empty(), "{code}");
    }
}

#[rstest]
#[case(ErrorCode::UserNotFound, "user-001")]
#[case(ErrorCode::ValidationFailed, "val-001")]
#[case(ErrorCode::InternalError, "sys-001")]
fn problem_slug_lowercases_and_hyphenates(#[case] code: ErrorCode, #[case] slug: &str) {
    assert_eq!(code.problem_slug(), slug);
}

#[rstest]
fn code_alone_defaults_to_bad_request_and_default_message() {
    let err = DomainError::new(ErrorCode::UserEmailExists);
    assert_eq!(err.code(), ErrorCode::UserEmailExists);
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), "Email already exists");
    assert!(err.args().is_empty());
    assert!(err.source().is_none());
}

#[rstest]
fn role_not_found_is_not_promoted_to_404_implicitly() {
    let err = DomainError::new(ErrorCode::RoleNotFound);
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
fn custom_message_keeps_bad_request() {
    let err = DomainError::with_message(ErrorCode::UserInvalidPassword, "too short");
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.message(), "too short");
    assert_eq!(err.to_string(), "too short");
}

#[rstest]
#[case("")]
#[case("   ")]
fn blank_message_falls_back_to_default(#[case] message: &str) {
    let err = DomainError::with_message(ErrorCode::OperationNotAllowed, message);
    assert_eq!(err.message(), "Operation not allowed");
}

#[rstest]
fn explicit_status_overrides_default() {
    let err = DomainError::with_status(ErrorCode::UserEmailExists, StatusCode::CONFLICT);
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.message(), "Email already exists");
}

#[rstest]
fn not_found_constructors_always_report_404() {
    let plain = DomainError::not_found(ErrorCode::UserNotFound);
    assert_eq!(plain.status(), StatusCode::NOT_FOUND);
    assert_eq!(plain.code().as_str(), "USER_001");
    assert!(plain.is_not_found());

    let custom = DomainError::not_found_with_message(ErrorCode::RoleNotFound, "no such role");
    assert_eq!(custom.status(), StatusCode::NOT_FOUND);
    assert_eq!(custom.message(), "no such role");
}

#[rstest]
fn entity_not_found_uses_resource_code() {
    let err = DomainError::entity_not_found("User", "ada@example.com");
    assert_eq!(err.code(), ErrorCode::ResourceNotFound);
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        err.message(),
        "User not found with identifier: ada@example.com"
    );
}

#[rstest]
fn cause_is_exposed_as_source() {
    let err = DomainError::with_status(ErrorCode::InternalError, StatusCode::BAD_GATEWAY)
        .with_cause(ConnectionReset);
    let source = err.source().expect("cause attached");
    assert_eq!(source.to_string(), "connection reset");
}

#[rstest]
#[case("Role {} cannot be granted to {}", &["ADMIN", "ada"], "Role ADMIN cannot be granted to ada")]
#[case("Role {} cannot be granted to {}", &["ADMIN"], "Role ADMIN cannot be granted to {}")]
#[case("No placeholders", &["ignored"], "No placeholders")]
fn args_fill_placeholders_in_order(
    #[case] template: &str,
    #[case] args: &[&str],
    #[case] expected: &str,
) {
    let err = DomainError::with_message(ErrorCode::OperationNotAllowed, template)
        .with_args(args.iter().copied());
    assert_eq!(err.message(), expected);
    assert_eq!(err.args().len(), args.len());
}
