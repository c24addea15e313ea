//! Case monitor: uploads a case file to the analysis backend, searches related
//! articles and requests their analysis, tracked as an explicit workflow.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod session;
pub mod workflow;

pub use client::CaseMonitorClient;
pub use config::CaseMonitorConfig;
pub use error::CaseMonitorError;
pub use model::{AnalysisResult, Article, CaseFile, SearchParams};
pub use monitor::CaseMonitor;
pub use session::{SessionContext, SessionManager, StaticToken, TokenSource};
pub use workflow::{CaseWorkflow, Step, WorkflowState};
