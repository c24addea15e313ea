//! Mapping of axum body/path extractor rejections to problem responses.
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;

use crate::api::problem::{from_parts, ProblemResponse};

pub const BAD_REQUEST_CODE: &str = "BAD_REQUEST";

/// A JSON body that failed to parse, including unknown or mistyped fields.
pub fn json_rejection(rejection: &JsonRejection, code: &str, instance: &str) -> ProblemResponse {
    let status = match rejection {
        JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::BAD_REQUEST,
    };
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    from_parts(status, code, "Bad Request", rejection.body_text(), instance)
}

pub fn path_rejection(rejection: &PathRejection, code: &str, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        code,
        "Bad Request",
        rejection.body_text(),
        instance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request, Json};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    #[allow(dead_code)]
    struct Body1 {
        name: String,
    }

    #[tokio::test]
    async fn unknown_field_maps_to_400() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"a","extra":1}"#))
            .unwrap();
        let rejection = Json::<Body1>::from_request(req, &()).await.unwrap_err();
        let resp = json_rejection(&rejection, BAD_REQUEST_CODE, "/x");
        assert_eq!(resp.0.status, 400);
        assert!(resp.0.detail.contains("extra"));
    }

    #[tokio::test]
    async fn missing_content_type_maps_to_415() {
        let req = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"name":"a"}"#))
            .unwrap();
        let rejection = Json::<Body1>::from_request(req, &()).await.unwrap_err();
        let resp = json_rejection(&rejection, BAD_REQUEST_CODE, "/x");
        assert_eq!(resp.0.status, 415);
    }
}
