//! Upload → search → analyze as an explicit state machine.
//!
//! The workflow holds no I/O. Each remote step is split into `start_*`, which
//! validates and moves to the in-flight state, and `finish_*`, which applies the
//! outcome. A failed step parks in [`WorkflowState::Failed`] and remembers the
//! state to resume from.
use std::fmt;
use std::mem;

use serde_json::Value;

use crate::error::CaseMonitorError;
use crate::model::{AnalysisResult, Article, CaseFile, SearchParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Upload,
    Search,
    Analyze,
}

impl Step {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Step::Upload => "Upload failed. Please try again.",
            Step::Search => "Search failed. Please try again.",
            Step::Analyze => "Analysis failed. Please try again.",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Upload => "upload",
            Step::Search => "search",
            Step::Analyze => "analyze",
        })
    }
}

/// Search results and the indices the user picked, in pick order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Results {
    pub articles: Vec<Article>,
    pub selection: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    FileSelected {
        file: CaseFile,
    },
    Uploading {
        file: CaseFile,
        progress: u8,
    },
    Uploaded {
        receipt: Value,
    },
    Searching {
        receipt: Value,
        params: SearchParams,
    },
    SearchReady {
        receipt: Value,
        results: Results,
    },
    Analyzing {
        receipt: Value,
        results: Results,
    },
    Analyzed {
        receipt: Value,
        results: Results,
        analysis: AnalysisResult,
    },
    Failed {
        step: Step,
        message: String,
        resume: Box<WorkflowState>,
    },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::FileSelected { .. } => "file selected",
            WorkflowState::Uploading { .. } => "uploading",
            WorkflowState::Uploaded { .. } => "uploaded",
            WorkflowState::Searching { .. } => "searching",
            WorkflowState::SearchReady { .. } => "search ready",
            WorkflowState::Analyzing { .. } => "analyzing",
            WorkflowState::Analyzed { .. } => "analyzed",
            WorkflowState::Failed { .. } => "failed",
        }
    }

    /// The screen a user would be on.
    pub fn step(&self) -> Step {
        match self {
            WorkflowState::Idle
            | WorkflowState::FileSelected { .. }
            | WorkflowState::Uploading { .. } => Step::Upload,
            WorkflowState::Uploaded { .. } | WorkflowState::Searching { .. } => Step::Search,
            WorkflowState::SearchReady { .. }
            | WorkflowState::Analyzing { .. }
            | WorkflowState::Analyzed { .. } => Step::Analyze,
            WorkflowState::Failed { step, .. } => *step,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            WorkflowState::Uploading { .. }
                | WorkflowState::Searching { .. }
                | WorkflowState::Analyzing { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct CaseWorkflow {
    state: WorkflowState,
    fallback_count: usize,
}

impl Default for CaseWorkflow {
    fn default() -> Self {
        Self::new(10)
    }
}

impl CaseWorkflow {
    /// `fallback_count`: how many leading results to analyze when nothing is selected.
    pub fn new(fallback_count: usize) -> Self {
        Self {
            state: WorkflowState::Idle,
            fallback_count,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            WorkflowState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Run `f` on the taken state; on error the state `f` hands back is put in place.
    /// A `Failed` state is kept as is, failure message included.
    fn transition<T>(
        &mut self,
        f: impl FnOnce(WorkflowState) -> Result<(WorkflowState, T), (WorkflowState, CaseMonitorError)>,
    ) -> Result<T, CaseMonitorError> {
        let current = mem::replace(&mut self.state, WorkflowState::Idle);
        let failed = matches!(current, WorkflowState::Failed { .. }).then(|| current.clone());
        match f(current) {
            Ok((next, out)) => {
                self.state = next;
                Ok(out)
            }
            Err((previous, err)) => {
                self.state = failed.unwrap_or(previous);
                Err(err)
            }
        }
    }

    /// Resolve a `Failed` state to the state it was entered from.
    fn settled(state: WorkflowState) -> WorkflowState {
        match state {
            WorkflowState::Failed { resume, .. } => *resume,
            other => other,
        }
    }

    fn invalid(action: &'static str, state: &WorkflowState) -> CaseMonitorError {
        CaseMonitorError::InvalidTransition {
            action,
            state: state.name(),
        }
    }

    pub fn select_file(&mut self, file: CaseFile) -> Result<(), CaseMonitorError> {
        self.transition(|state| {
            if state.is_busy() {
                let err = Self::invalid("select a file", &state);
                return Err((state, err));
            }
            if !file.is_pdf() {
                return Err((
                    state,
                    CaseMonitorError::NotPdf {
                        name: file.name.clone(),
                    },
                ));
            }
            Ok((WorkflowState::FileSelected { file }, ()))
        })
    }

    pub fn clear_file(&mut self) {
        if let WorkflowState::FileSelected { .. } = self.state {
            self.state = WorkflowState::Idle;
        }
    }

    /// Returns the file to send.
    pub fn start_upload(&mut self) -> Result<CaseFile, CaseMonitorError> {
        self.transition(|state| match Self::settled(state) {
            WorkflowState::FileSelected { file } => Ok((
                WorkflowState::Uploading {
                    file: file.clone(),
                    progress: 0,
                },
                file,
            )),
            WorkflowState::Idle => Err((WorkflowState::Idle, CaseMonitorError::NoFileSelected)),
            other => {
                let err = Self::invalid("upload", &other);
                Err((other, err))
            }
        })
    }

    /// Progress percentage while uploading; ignored in any other state.
    pub fn set_progress(&mut self, pct: u8) {
        if let WorkflowState::Uploading { progress, .. } = &mut self.state {
            *progress = pct.min(100);
        }
    }

    pub fn finish_upload(&mut self, outcome: Result<Value, CaseMonitorError>) {
        let state = mem::replace(&mut self.state, WorkflowState::Idle);
        self.state = match (state, outcome) {
            (WorkflowState::Uploading { .. }, Ok(receipt)) => WorkflowState::Uploaded { receipt },
            (WorkflowState::Uploading { file, .. }, Err(e)) => WorkflowState::Failed {
                step: Step::Upload,
                message: e.to_string(),
                resume: Box::new(WorkflowState::FileSelected { file }),
            },
            (other, _) => other,
        };
    }

    /// Allowed after an upload and again from the analyze step to re-run the search.
    pub fn start_search(&mut self, params: SearchParams) -> Result<SearchParams, CaseMonitorError> {
        self.transition(|state| {
            if let Err(e) = params.validate() {
                return Err((state, e));
            }
            match Self::settled(state) {
                WorkflowState::Uploaded { receipt }
                | WorkflowState::SearchReady { receipt, .. }
                | WorkflowState::Analyzed { receipt, .. } => {
                    Ok((WorkflowState::Searching { receipt, params }, params))
                }
                other => {
                    let err = Self::invalid("search", &other);
                    Err((other, err))
                }
            }
        })
    }

    pub fn finish_search(&mut self, outcome: Result<Vec<Article>, CaseMonitorError>) {
        let state = mem::replace(&mut self.state, WorkflowState::Idle);
        self.state = match (state, outcome) {
            (WorkflowState::Searching { receipt, .. }, Ok(articles)) => {
                WorkflowState::SearchReady {
                    receipt,
                    results: Results {
                        articles,
                        selection: Vec::new(),
                    },
                }
            }
            (WorkflowState::Searching { receipt, .. }, Err(e)) => WorkflowState::Failed {
                step: Step::Search,
                message: e.to_string(),
                resume: Box::new(WorkflowState::Uploaded { receipt }),
            },
            (other, _) => other,
        };
    }

    /// Add or remove an article from the selection.
    pub fn toggle_article(&mut self, index: usize) -> Result<(), CaseMonitorError> {
        let results = match &mut self.state {
            WorkflowState::SearchReady { results, .. } => results,
            WorkflowState::Failed { resume, .. } => match resume.as_mut() {
                WorkflowState::SearchReady { results, .. } => results,
                other => return Err(Self::invalid("select articles", other)),
            },
            other => return Err(Self::invalid("select articles", other)),
        };
        if index >= results.articles.len() {
            return Err(CaseMonitorError::UnknownArticle { index });
        }
        match results.selection.iter().position(|&i| i == index) {
            Some(pos) => {
                results.selection.remove(pos);
            }
            None => results.selection.push(index),
        }
        Ok(())
    }

    /// Articles to send: the selection in pick order, else the first `fallback` results.
    fn payload(results: &Results, fallback: usize) -> Vec<Article> {
        if results.selection.is_empty() {
            results
                .articles
                .iter()
                .take(fallback)
                .cloned()
                .collect()
        } else {
            results
                .selection
                .iter()
                .filter_map(|&i| results.articles.get(i).cloned())
                .collect()
        }
    }

    /// Returns the articles to analyze.
    pub fn start_analysis(&mut self) -> Result<Vec<Article>, CaseMonitorError> {
        let fallback = self.fallback_count;
        self.transition(|state| match Self::settled(state) {
            WorkflowState::SearchReady { receipt, results }
            | WorkflowState::Analyzed {
                receipt, results, ..
            } => {
                let payload = Self::payload(&results, fallback);
                if payload.is_empty() {
                    return Err((
                        WorkflowState::SearchReady { receipt, results },
                        CaseMonitorError::NoArticles,
                    ));
                }
                Ok((WorkflowState::Analyzing { receipt, results }, payload))
            }
            other => {
                let err = Self::invalid("analyze", &other);
                Err((other, err))
            }
        })
    }

    pub fn finish_analysis(&mut self, outcome: Result<AnalysisResult, CaseMonitorError>) {
        let state = mem::replace(&mut self.state, WorkflowState::Idle);
        self.state = match (state, outcome) {
            (WorkflowState::Analyzing { receipt, results }, Ok(analysis)) => {
                WorkflowState::Analyzed {
                    receipt,
                    results,
                    analysis,
                }
            }
            (WorkflowState::Analyzing { receipt, results }, Err(e)) => WorkflowState::Failed {
                step: Step::Analyze,
                message: e.to_string(),
                resume: Box::new(WorkflowState::SearchReady { receipt, results }),
            },
            (other, _) => other,
        };
    }

    /// Leave the analyze step for the search form, keeping the upload receipt.
    pub fn back_to_search(&mut self) -> Result<(), CaseMonitorError> {
        self.transition(|state| match Self::settled(state) {
            WorkflowState::SearchReady { receipt, .. } | WorkflowState::Analyzed { receipt, .. } => {
                Ok((WorkflowState::Uploaded { receipt }, ()))
            }
            other => {
                let err = Self::invalid("go back to search", &other);
                Err((other, err))
            }
        })
    }

    /// Drop the failure message and return to the state the failed step started from.
    pub fn dismiss_error(&mut self) {
        let state = mem::replace(&mut self.state, WorkflowState::Idle);
        self.state = Self::settled(state);
    }

    pub fn reset(&mut self) {
        self.state = WorkflowState::Idle;
    }
}
