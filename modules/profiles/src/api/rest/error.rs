use modkit::api::problem::{ProblemResponse, ValidationError};
use modkit::api::rejection;
use modkit::ErrDef;

use axum::extract::rejection::{JsonRejection, PathRejection};

use crate::domain::error::DomainError;

/// Error catalog of the profiles REST surface.
pub mod catalog {
    use modkit::ErrDef;

    pub const VALIDATION: ErrDef = ErrDef::new(400, "Validation error", "PROFILES_VALIDATION");
    pub const BAD_REQUEST: ErrDef = ErrDef::new(400, "Bad Request", "PROFILES_BAD_REQUEST");
    pub const NOT_FOUND: ErrDef = ErrDef::new(404, "Profile not found", "PROFILES_NOT_FOUND");
    pub const LAWYER_NOT_FOUND: ErrDef = ErrDef::new(
        404,
        "Lawyer profile not found or unauthorized",
        "PROFILES_LAWYER_NOT_FOUND",
    );
    pub const EMAIL_CONFLICT: ErrDef =
        ErrDef::new(409, "Email already exists", "PROFILES_EMAIL_CONFLICT");
    pub const INTERNAL_STORE: ErrDef =
        ErrDef::new(500, "Internal error", "PROFILES_INTERNAL_STORE");
}

fn validation(def: &ErrDef, detail: String, field: &str, instance: &str) -> ProblemResponse {
    let mut resp = def.respond(detail.clone(), instance);
    resp.0 = resp.0.with_errors(vec![ValidationError {
        detail,
        pointer: format!("/{field}"),
    }]);
    resp
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::ProfileNotFound { external_id } => catalog::NOT_FOUND.respond(
            format!("Profile with externalId '{external_id}' was not found"),
            instance,
        ),
        DomainError::LawyerNotFoundOrUnauthorized { .. } => catalog::LAWYER_NOT_FOUND.respond(
            "Lawyer profile not found or unauthorized",
            instance,
        ),
        DomainError::EmailAlreadyExists { email } => catalog::EMAIL_CONFLICT.respond(
            format!("Email '{email}' is already in use"),
            instance,
        ),
        DomainError::Validation { field, message } => validation(
            &catalog::VALIDATION,
            format!("{field}: {message}"),
            field,
            instance,
        ),
        DomainError::InvalidCoordinates { message } => validation(
            &catalog::VALIDATION,
            format!("location: {message}"),
            "location",
            instance,
        ),
        DomainError::Store { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Store error occurred");
            catalog::INTERNAL_STORE.respond("An internal storage error occurred", instance)
        }
    }
}

pub fn map_json_rejection(r: &JsonRejection, instance: &str) -> ProblemResponse {
    rejection::json_rejection(r, catalog::BAD_REQUEST.code, instance)
}

pub fn map_path_rejection(r: &PathRejection, instance: &str) -> ProblemResponse {
    rejection::path_rejection(r, catalog::BAD_REQUEST.code, instance)
}
