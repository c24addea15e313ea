//! Calls to the analysis backend.
//!
//! Every request carries the caller's [`SessionContext`] as a bearer token and
//! runs through [`modkit::TracedClient`]. Error bodies of the form
//! `{"error": "..."}` surface their message; anything else becomes the step's
//! generic failure text.
use std::time::Duration;

use futures::stream;
use modkit::TracedClient;
use reqwest::{header::AUTHORIZATION, multipart, Method, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::CaseMonitorConfig;
use crate::error::CaseMonitorError;
use crate::model::{AnalysisResult, Article, CaseFile, SearchParams, SearchResponse};
use crate::session::SessionContext;
use crate::workflow::Step;

const UPLOAD_PATH: &str = "api/v1/upload-case-file";
const SEARCH_PATH: &str = "api/v1/search-articles";
const ANALYZE_PATH: &str = "api/v1/analyze-articles";

const UPLOAD_CHUNK: usize = 64 * 1024;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    articles: &'a [Article],
}

#[derive(Clone)]
pub struct CaseMonitorClient {
    http: TracedClient,
    base: Url,
    upload_timeout: Duration,
    search_timeout: Duration,
    analyze_timeout: Duration,
}

impl CaseMonitorClient {
    pub fn new(http: TracedClient, cfg: &CaseMonitorConfig) -> anyhow::Result<Self> {
        let mut base = Url::parse(&cfg.base_url)
            .map_err(|e| anyhow::anyhow!("invalid case_monitor base_url '{}': {e}", cfg.base_url))?;
        // Url::join drops the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            base,
            upload_timeout: cfg.upload_timeout(),
            search_timeout: cfg.search_timeout(),
            analyze_timeout: cfg.analyze_timeout(),
        })
    }

    fn endpoint(&self, path: &str, step: Step) -> Result<Url, CaseMonitorError> {
        self.base
            .join(path)
            .map_err(|e| CaseMonitorError::remote(step, None, e.to_string()))
    }

    /// Stream `file` as multipart field `file`, publishing percent sent on `progress`.
    #[instrument(
        name = "case_monitor.client.upload",
        skip(self, session, file, progress),
        fields(file = %file.name, size = file.bytes.len())
    )]
    pub async fn upload_case_file(
        &self,
        session: &SessionContext,
        file: &CaseFile,
        progress: watch::Sender<u8>,
    ) -> Result<Value, CaseMonitorError> {
        let url = self.endpoint(UPLOAD_PATH, Step::Upload)?;
        let total = file.bytes.len() as u64;
        let chunks: Vec<Vec<u8>> = file.bytes.chunks(UPLOAD_CHUNK).map(<[u8]>::to_vec).collect();

        progress.send_replace(0);
        let mut sent: u64 = 0;
        let body = stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            let pct = if total == 0 { 100 } else { sent * 100 / total };
            progress.send_replace(pct.min(100) as u8);
            Ok::<_, std::io::Error>(chunk)
        }));

        let part = multipart::Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
            .file_name(file.name.clone())
            .mime_str("application/pdf")
            .map_err(|e| CaseMonitorError::remote(Step::Upload, None, e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let req = self
            .http
            .request(Method::POST, url.as_str())
            .header(AUTHORIZATION, session.bearer())
            .timeout(self.upload_timeout)
            .multipart(form);
        let resp = self.send(req, Step::Upload).await?;
        let text = read_body(resp, Step::Upload).await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    #[instrument(name = "case_monitor.client.search", skip(self, session))]
    pub async fn search_articles(
        &self,
        session: &SessionContext,
        params: SearchParams,
    ) -> Result<Vec<Article>, CaseMonitorError> {
        let url = self.endpoint(SEARCH_PATH, Step::Search)?;
        let req = self
            .http
            .request(Method::POST, url.as_str())
            .header(AUTHORIZATION, session.bearer())
            .timeout(self.search_timeout)
            .json(&params);
        let resp = self.send(req, Step::Search).await?;
        let found: SearchResponse = decode(resp, Step::Search).await?;
        debug!(count = found.articles.len(), "Search returned articles");
        Ok(found.articles)
    }

    #[instrument(
        name = "case_monitor.client.analyze",
        skip(self, session, articles),
        fields(count = articles.len())
    )]
    pub async fn analyze_articles(
        &self,
        session: &SessionContext,
        articles: &[Article],
    ) -> Result<AnalysisResult, CaseMonitorError> {
        let url = self.endpoint(ANALYZE_PATH, Step::Analyze)?;
        let req = self
            .http
            .request(Method::POST, url.as_str())
            .header(AUTHORIZATION, session.bearer())
            .timeout(self.analyze_timeout)
            .json(&AnalyzeRequest { articles });
        let resp = self.send(req, Step::Analyze).await?;
        decode(resp, Step::Analyze).await
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        step: Step,
    ) -> Result<Response, CaseMonitorError> {
        let resp = self.http.send(req).await.map_err(|e| {
            warn!(step = %step, error = %e, "Request to analysis backend failed");
            CaseMonitorError::generic(step)
        })?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        warn!(step = %step, status = status.as_u16(), "Analysis backend returned an error");
        Err(error_from_body(step, Some(status.as_u16()), &body))
    }
}

/// `{"error": "..."}` wins; otherwise the generic message for `step`.
fn error_from_body(step: Step, status: Option<u16>, body: &str) -> CaseMonitorError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(b) if !b.error.trim().is_empty() => CaseMonitorError::remote(step, status, b.error),
        _ => CaseMonitorError::remote(step, status, step.failure_message()),
    }
}

async fn read_body(resp: Response, step: Step) -> Result<String, CaseMonitorError> {
    resp.text().await.map_err(|e| {
        warn!(step = %step, error = %e, "Failed to read response body");
        CaseMonitorError::generic(step)
    })
}

/// Decode a JSON body; an empty body yields `T::default()`.
async fn decode<T: DeserializeOwned + Default>(
    resp: Response,
    step: Step,
) -> Result<T, CaseMonitorError> {
    let text = read_body(resp, step).await?;
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&text).map_err(|e| {
        warn!(step = %step, error = %e, "Unexpected response body");
        CaseMonitorError::generic(step)
    })
}
