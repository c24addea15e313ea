use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfilesError {
    #[error("Profile not found: {external_id}")]
    NotFound { external_id: String },

    #[error("Lawyer profile not found or not authorized: {external_id}")]
    NotFoundOrUnauthorized { external_id: String },

    #[error("Profile with email '{email}' already exists")]
    Conflict { email: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl ProfilesError {
    pub fn not_found(external_id: impl Into<String>) -> Self {
        Self::NotFound {
            external_id: external_id.into(),
        }
    }

    pub fn not_found_or_unauthorized(external_id: impl Into<String>) -> Self {
        Self::NotFoundOrUnauthorized {
            external_id: external_id.into(),
        }
    }

    pub fn conflict(email: impl Into<String>) -> Self {
        Self::Conflict {
            email: email.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for ProfilesError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            ProfileNotFound { external_id } => Self::not_found(external_id),
            LawyerNotFoundOrUnauthorized { external_id } => {
                Self::not_found_or_unauthorized(external_id)
            }
            EmailAlreadyExists { email } => Self::conflict(email),
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            InvalidCoordinates { message } => {
                Self::validation(format!("location: {message}"))
            }
            Store { .. } => Self::internal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;

    #[test]
    fn store_details_do_not_leak() {
        let err: ProfilesError = DomainError::store("disk I/O error at page 7").into();
        assert_eq!(err, ProfilesError::Internal);
        assert_eq!(err.to_string(), "Internal error");
    }

    #[test]
    fn validation_keeps_field_name() {
        let err: ProfilesError = DomainError::validation("age", "must be >= 0").into();
        assert_eq!(err, ProfilesError::validation("age: must be >= 0"));
    }

    #[test]
    fn role_gate_maps_to_its_own_variant() {
        let err: ProfilesError = DomainError::lawyer_not_found_or_unauthorized("u1").into();
        assert!(matches!(err, ProfilesError::NotFoundOrUnauthorized { .. }));
    }
}
