//! REST surface tests: real routes over an in-memory store, driven with `oneshot`.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use profiles::api::rest::routes;

async fn app() -> Router {
    let svc = common::create_test_service().await;
    routes::register_routes(Router::new(), svc).expect("routes")
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

async fn register(app: &Router, external_id: &str, email: &str, role: &str) -> Value {
    let (status, body) = call(
        app,
        json_request(
            Method::POST,
            "/api/register",
            json!({ "externalId": external_id, "email": email, "role": role }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn hello_world() {
    let app = app().await;
    let req = Request::builder().uri("/api").body(Body::empty()).unwrap();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Hello World!".into()));
}

#[tokio::test]
async fn register_returns_profile_with_defaults() {
    let app = app().await;
    let body = register(&app, "u1", "a@x.com", "user").await;

    assert_eq!(body["externalId"], "u1");
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["role"], "user");
    assert_eq!(body["displayName"], "User");
    assert_eq!(body["photoURL"], "default_image_url");
    assert_eq!(body["yearsOfExperience"], 0);
    assert!(body.get("location").is_none());

    // repeat registration returns the same document
    let again = register(&app, "u1", "changed@x.com", "admin").await;
    assert_eq!(again, body);
}

#[tokio::test]
async fn end_to_end_scenario_over_http() {
    let app = app().await;
    register(&app, "u1", "a@x.com", "user").await;

    let (status, body) = call(
        &app,
        json_request(
            Method::POST,
            "/api/update-profile",
            json!({ "externalId": "u1", "location": [12.9, 77.6] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(
        body["location"],
        json!({ "type": "Point", "coordinates": [77.6, 12.9] })
    );

    let (status, body) = call(
        &app,
        json_request(
            Method::PATCH,
            "/api/update-lawyer-profile/u1",
            json!({ "yearsOfExperience": 3 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PROFILES_LAWYER_NOT_FOUND");
    assert_eq!(body["instance"], "/api/update-lawyer-profile/u1");
}

#[tokio::test]
async fn lawyer_update_returns_message_and_lawyer() {
    let app = app().await;
    register(&app, "l1", "law@x.com", "lawyer").await;

    let (status, body) = call(
        &app,
        json_request(
            Method::PATCH,
            "/api/update-lawyer-profile/l1",
            json!({
                "displayName": "Counsel",
                "qualification": "LLB",
                "yearsOfExperience": 7,
                "photoURL": "https://cdn.example.com/p.png",
                "coordinates": [12.9, 77.6]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["lawyer"]["displayName"], "Counsel");
    assert_eq!(body["lawyer"]["yearsOfExperience"], 7);
    assert_eq!(body["lawyer"]["photoURL"], "https://cdn.example.com/p.png");
    assert_eq!(body["lawyer"]["location"]["coordinates"], json!([77.6, 12.9]));
    assert_eq!(body["lawyer"]["role"], "lawyer");
}

#[tokio::test]
async fn get_profile_by_external_id() {
    let app = app().await;
    let created = register(&app, "u1", "a@x.com", "user").await;

    let req = Request::builder()
        .uri("/api/profiles/u1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let req = Request::builder()
        .uri("/api/profiles/nobody")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PROFILES_NOT_FOUND");
}

#[tokio::test]
async fn update_unknown_profile_is_404() {
    let app = app().await;
    let (status, body) = call(
        &app,
        json_request(
            Method::POST,
            "/api/update-profile",
            json!({ "externalId": "ghost", "displayName": "x" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PROFILES_NOT_FOUND");
}

#[tokio::test]
async fn validation_errors_are_400_problems() {
    let app = app().await;
    register(&app, "u1", "a@x.com", "user").await;

    let cases = [
        (
            "/api/register",
            json!({ "externalId": "u2" }),
            "PROFILES_VALIDATION",
        ),
        (
            "/api/register",
            json!({ "externalId": "u2", "email": "b@x.com", "role": "judge" }),
            "PROFILES_VALIDATION",
        ),
        (
            "/api/update-profile",
            json!({ "externalId": "u1", "location": ["north", "east"] }),
            "PROFILES_VALIDATION",
        ),
        (
            "/api/update-profile",
            json!({ "externalId": "u1", "location": [12.9] }),
            "PROFILES_VALIDATION",
        ),
        (
            "/api/update-profile",
            json!({ "externalId": "u1", "displayName": "" }),
            "PROFILES_VALIDATION",
        ),
        (
            "/api/update-profile",
            json!({ "displayName": "Ada" }),
            "PROFILES_VALIDATION",
        ),
    ];
    for (uri, body, code) in cases {
        let (status, resp) = call(&app, json_request(Method::POST, uri, body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {body}: {resp}");
        assert_eq!(resp["code"], code, "{uri} {body}");
    }
}

#[tokio::test]
async fn unknown_and_mistyped_fields_are_bad_requests() {
    let app = app().await;
    register(&app, "u1", "a@x.com", "user").await;

    // role is not an updatable field
    let (status, body) = call(
        &app,
        json_request(
            Method::POST,
            "/api/update-profile",
            json!({ "externalId": "u1", "role": "lawyer" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PROFILES_BAD_REQUEST");

    let (status, body) = call(
        &app,
        json_request(
            Method::POST,
            "/api/update-profile",
            json!({ "externalId": "u1", "age": "forty" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PROFILES_BAD_REQUEST");

    // role stayed as registered
    let req = Request::builder()
        .uri("/api/profiles/u1")
        .body(Body::empty())
        .unwrap();
    let (_, body) = call(&app, req).await;
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn email_conflict_is_409() {
    let app = app().await;
    register(&app, "u1", "a@x.com", "user").await;

    let (status, body) = call(
        &app,
        json_request(
            Method::POST,
            "/api/register",
            json!({ "externalId": "u2", "email": "a@x.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "PROFILES_EMAIL_CONFLICT");
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn problem_responses_use_problem_json() {
    let app = app().await;
    let req = Request::builder()
        .uri("/api/profiles/nobody")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app().await;
    let req = Request::builder()
        .uri("/openapi.json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/register"]["post"].is_object());
    assert!(body["paths"]["/api/update-lawyer-profile/{externalId}"]["patch"].is_object());
}
