use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{handlers, openapi::ProfilesApiDoc};
use crate::domain::service::Service;

/// Mount the profile routes under `/api` and the OpenAPI document at `/openapi.json`.
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let api = Router::new()
        .route("/", get(handlers::hello))
        .route("/register", post(handlers::register))
        .route("/update-profile", post(handlers::update_profile))
        .route(
            "/update-lawyer-profile/{external_id}",
            patch(handlers::update_lawyer_profile),
        )
        .route("/profiles/{external_id}", get(handlers::get_profile))
        .layer(Extension(service));

    let doc = ProfilesApiDoc::openapi();
    Ok(router
        .nest("/api", api)
        .route("/openapi.json", get(move || std::future::ready(Json(doc.clone())))))
}
