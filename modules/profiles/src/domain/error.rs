use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Profile not found: {external_id}")]
    ProfileNotFound { external_id: String },

    #[error("Lawyer profile not found or not authorized: {external_id}")]
    LawyerNotFoundOrUnauthorized { external_id: String },

    #[error("Profile with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates { message: String },

    #[error("Store error: {message}")]
    Store { message: String },
}

impl DomainError {
    pub fn profile_not_found(external_id: impl Into<String>) -> Self {
        Self::ProfileNotFound {
            external_id: external_id.into(),
        }
    }

    pub fn lawyer_not_found_or_unauthorized(external_id: impl Into<String>) -> Self {
        Self::LawyerNotFoundOrUnauthorized {
            external_id: external_id.into(),
        }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_coordinates(message: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Caller-side input problems; nothing was written.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidCoordinates { .. })
    }
}
