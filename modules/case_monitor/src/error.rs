use thiserror::Error;

use crate::workflow::Step;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaseMonitorError {
    #[error("You must be signed in to {action}.")]
    NotSignedIn { action: &'static str },

    #[error("Please select a PDF to upload.")]
    NoFileSelected,

    #[error("Only PDF files are allowed: {name}")]
    NotPdf { name: String },

    #[error("{field} must be at least 1")]
    InvalidParameter { field: &'static str },

    #[error("No articles to analyze. Run a search first.")]
    NoArticles,

    #[error("no article at index {index}")]
    UnknownArticle { index: usize },

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// Failure reported by (or while reaching) the analysis backend.
    #[error("{message}")]
    Remote {
        step: Step,
        status: Option<u16>,
        message: String,
    },

    #[error("token source failed: {0}")]
    Token(String),

    #[error("failed to read case file: {0}")]
    Io(String),
}

impl CaseMonitorError {
    pub fn remote(step: Step, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Remote {
            step,
            status,
            message: message.into(),
        }
    }

    /// Transport or decoding failure: the caller only sees the generic step message.
    pub fn generic(step: Step) -> Self {
        Self::remote(step, None, step.failure_message())
    }
}
