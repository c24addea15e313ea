use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{info, instrument};

use crate::client::CaseMonitorClient;
use crate::error::CaseMonitorError;
use crate::model::{AnalysisResult, Article, CaseFile, SearchParams};
use crate::session::SessionManager;
use crate::workflow::{CaseWorkflow, WorkflowState};

/// Drives a [`CaseWorkflow`] against the analysis backend.
///
/// Each action fetches a session context first; without one the action is
/// rejected and the workflow is left untouched.
pub struct CaseMonitor {
    client: CaseMonitorClient,
    sessions: Arc<SessionManager>,
    workflow: CaseWorkflow,
    progress: watch::Sender<u8>,
}

impl CaseMonitor {
    pub fn new(
        client: CaseMonitorClient,
        sessions: Arc<SessionManager>,
        workflow: CaseWorkflow,
    ) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            client,
            sessions,
            workflow,
            progress,
        }
    }

    pub fn workflow(&self) -> &CaseWorkflow {
        &self.workflow
    }

    pub fn workflow_mut(&mut self) -> &mut CaseWorkflow {
        &mut self.workflow
    }

    /// Upload progress in percent.
    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    pub fn select_file(&mut self, file: CaseFile) -> Result<(), CaseMonitorError> {
        self.workflow.select_file(file)
    }

    #[instrument(name = "case_monitor.upload", skip(self))]
    pub async fn upload(&mut self) -> Result<Value, CaseMonitorError> {
        let session = self.sessions.require("upload files").await?;
        let file = self.workflow.start_upload()?;

        let mut rx = self.progress.subscribe();
        let send = self
            .client
            .upload_case_file(&session, &file, self.progress.clone());
        tokio::pin!(send);
        let outcome = loop {
            tokio::select! {
                res = &mut send => break res,
                Ok(()) = rx.changed() => {
                    let pct = *rx.borrow_and_update();
                    self.workflow.set_progress(pct);
                }
            }
        };

        self.workflow.finish_upload(outcome.clone());
        if outcome.is_ok() {
            info!(file = %file.name, "Case file uploaded");
        }
        outcome
    }

    #[instrument(name = "case_monitor.search", skip(self))]
    pub async fn search(&mut self, params: SearchParams) -> Result<Vec<Article>, CaseMonitorError> {
        let session = self.sessions.require("search articles").await?;
        let params = self.workflow.start_search(params)?;
        let outcome = self.client.search_articles(&session, params).await;
        self.workflow.finish_search(outcome.clone());
        outcome
    }

    /// Toggle an article in the analysis selection.
    pub fn toggle_article(&mut self, index: usize) -> Result<(), CaseMonitorError> {
        self.workflow.toggle_article(index)
    }

    #[instrument(name = "case_monitor.analyze", skip(self))]
    pub async fn analyze(&mut self) -> Result<AnalysisResult, CaseMonitorError> {
        let session = self.sessions.require("analyze articles").await?;
        let articles = self.workflow.start_analysis()?;
        let outcome = self.client.analyze_articles(&session, &articles).await;
        self.workflow.finish_analysis(outcome.clone());
        if let Ok(result) = &outcome {
            info!(
                analyzed = result.articles_analyzed,
                alerts = result.alerts_created,
                "Analysis finished"
            );
        }
        outcome
    }

    pub fn back_to_search(&mut self) -> Result<(), CaseMonitorError> {
        self.workflow.back_to_search()
    }

    pub fn reset(&mut self) {
        self.workflow.reset();
        self.progress.send_replace(0);
    }

    pub fn state(&self) -> &WorkflowState {
        self.workflow.state()
    }
}
