//! Static error catalog entries.
//!
//! Each module declares its error kinds once as `ErrDef` constants so that
//! status, title and code stay stable across handlers.
use axum::http::StatusCode;

use crate::api::problem::{Problem, ProblemResponse, ERRORS_BASE_URL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
}

impl ErrDef {
    pub const fn new(status: u16, title: &'static str, code: &'static str) -> Self {
        Self {
            status,
            title,
            code,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn type_url(&self) -> String {
        format!("{ERRORS_BASE_URL}/{}", self.code)
    }

    #[inline]
    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(self.status_code(), self.title, detail)
            .with_code(self.code)
            .with_type(self.type_url())
    }

    /// Problem response for `instance`, tagged with the current trace id.
    pub fn respond(&self, detail: impl Into<String>, instance: &str) -> ProblemResponse {
        self.to_problem(detail)
            .with_instance(instance)
            .with_current_trace()
            .into()
    }
}
