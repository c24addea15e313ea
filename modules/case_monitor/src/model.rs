use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CaseMonitorError;

/// A case file picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl CaseFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, CaseMonitorError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CaseMonitorError::Io(format!("{}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    /// `.pdf` extension, case-insensitive.
    pub fn is_pdf(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".pdf")
    }

    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0 / 1024.0
    }
}

/// Search request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub days_back: u32,
    pub max_results: u32,
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), CaseMonitorError> {
        if self.days_back < 1 {
            return Err(CaseMonitorError::InvalidParameter { field: "days_back" });
        }
        if self.max_results < 1 {
            return Err(CaseMonitorError::InvalidParameter {
                field: "max_results",
            });
        }
        Ok(())
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            days_back: 7,
            max_results: 20,
        }
    }
}

/// Article as returned by the search endpoint. Unknown fields are kept so the
/// analysis request echoes the backend's own record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub articles_analyzed: u32,
    #[serde(default)]
    pub alerts_created: u32,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub message: Option<String>,
}
