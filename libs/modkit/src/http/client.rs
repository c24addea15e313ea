//! Traced HTTP client.
//!
//! Wraps `reqwest::Client` so every outgoing call runs inside an
//! `outgoing_http` span carrying method, url and the response status.

use tracing::{field::Empty, Instrument, Level};

#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Execute a built request inside an `outgoing_http` span.
    pub async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO, "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            http.status_code = Empty,
            error = Empty,
            otel.kind = "client",
        );

        let result = self.inner.execute(req).instrument(span.clone()).await;
        match &result {
            Ok(response) => {
                let status = response.status();
                span.record("http.status_code", status.as_u16());
                if status.is_client_error() || status.is_server_error() {
                    span.record("error", true);
                }
            }
            Err(_) => {
                span.record("error", true);
            }
        }
        result
    }

    /// Build and execute a request prepared with [`TracedClient::request`].
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> reqwest::Result<reqwest::Response> {
        let req = builder.build()?;
        self.execute(req).await
    }

    pub async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.send(self.inner.get(url)).await
    }

    pub async fn post(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        self.send(self.inner.post(url)).await
    }

    /// Start a request; finish it with [`TracedClient::send`].
    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn get_reaches_server() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/ping");
            then.status(200).body("ok");
        });

        let client = TracedClient::from(reqwest::Client::new());
        let resp = client.get(&server.url("/ping")).await.unwrap();

        assert!(resp.status().is_success());
        m.assert();
    }

    #[tokio::test]
    async fn send_keeps_builder_headers_and_body() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/echo")
                .header("authorization", "Bearer t0k")
                .json_body(serde_json::json!({ "a": 1 }));
            then.status(201);
        });

        let client = TracedClient::default();
        let builder = client
            .request(reqwest::Method::POST, &server.url("/echo"))
            .bearer_auth("t0k")
            .json(&serde_json::json!({ "a": 1 }));
        let resp = client.send(builder).await.unwrap();

        assert_eq!(resp.status().as_u16(), 201);
        m.assert();
    }

    #[tokio::test]
    async fn error_status_is_returned_not_raised() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/fail");
            then.status(503);
        });

        let resp = TracedClient::default()
            .post(&server.url("/fail"))
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 503);
    }
}
