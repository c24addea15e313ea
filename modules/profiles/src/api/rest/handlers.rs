use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        OriginalUri, Path,
    },
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use tracing::{error, info};

use crate::api::rest::dto::{
    LawyerUpdatedDto, ProfileDto, RegisterReq, UpdateLawyerProfileReq, UpdateProfileReq,
};
use crate::api::rest::error::{map_domain_error, map_json_rejection, map_path_rejection};
use crate::contract::model::LawyerProfilePatch;
use crate::domain::service::Service;

/// Liveness text served at the API root.
#[utoipa::path(
    get,
    path = "/api",
    tag = "profiles",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn hello() -> &'static str {
    "Hello World!"
}

/// Register a profile, or return the existing one for this external id
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "profiles",
    request_body = RegisterReq,
    responses(
        (status = 200, description = "Registered or already existing profile", body = ProfileDto),
        (status = 400, description = "Invalid input", body = Problem),
        (status = 409, description = "Email belongs to another profile", body = Problem),
        (status = 500, description = "Store failure", body = Problem)
    )
)]
pub async fn register(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<RegisterReq>, JsonRejection>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    let Json(req) = body.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!("Registering profile: {}", req.external_id);

    match svc.register(req.into()).await {
        Ok(profile) => Ok(Json(ProfileDto::from(profile))),
        Err(e) => {
            error!("Failed to register profile: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Update editable fields of a registered profile
#[utoipa::path(
    post,
    path = "/api/update-profile",
    tag = "profiles",
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Updated profile", body = ProfileDto),
        (status = 400, description = "Invalid input", body = Problem),
        (status = 404, description = "No profile for externalId", body = Problem),
        (status = 500, description = "Store failure", body = Problem)
    )
)]
pub async fn update_profile(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<UpdateProfileReq>, JsonRejection>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    let Json(req) = body.map_err(|r| map_json_rejection(&r, uri.path()))?;
    let (external_id, patch) = req
        .into_parts()
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    info!("Updating profile: {}", external_id);

    match svc.update_profile(&external_id, patch).await {
        Ok(profile) => Ok(Json(ProfileDto::from(profile))),
        Err(e) => {
            error!("Failed to update profile {}: {}", external_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Update a lawyer profile; other roles are reported as not found
#[utoipa::path(
    patch,
    path = "/api/update-lawyer-profile/{externalId}",
    tag = "profiles",
    params(("externalId" = String, Path, description = "Identity provider user id")),
    request_body = UpdateLawyerProfileReq,
    responses(
        (status = 200, description = "Updated lawyer profile", body = LawyerUpdatedDto),
        (status = 400, description = "Invalid input", body = Problem),
        (status = 404, description = "No lawyer profile for externalId", body = Problem),
        (status = 500, description = "Store failure", body = Problem)
    )
)]
pub async fn update_lawyer_profile(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateLawyerProfileReq>, JsonRejection>,
) -> Result<Json<LawyerUpdatedDto>, ProblemResponse> {
    let Path(external_id) = path.map_err(|r| map_path_rejection(&r, uri.path()))?;
    let Json(req) = body.map_err(|r| map_json_rejection(&r, uri.path()))?;
    let patch =
        LawyerProfilePatch::try_from(req).map_err(|e| map_domain_error(&e, uri.path()))?;
    info!("Updating lawyer profile: {}", external_id);

    match svc.update_lawyer_profile(&external_id, patch).await {
        Ok(profile) => Ok(Json(LawyerUpdatedDto::from(profile))),
        Err(e) => {
            error!("Failed to update lawyer profile {}: {}", external_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a profile by external id
#[utoipa::path(
    get,
    path = "/api/profiles/{externalId}",
    tag = "profiles",
    params(("externalId" = String, Path, description = "Identity provider user id")),
    responses(
        (status = 200, description = "Profile found", body = ProfileDto),
        (status = 404, description = "No profile for externalId", body = Problem),
        (status = 500, description = "Store failure", body = Problem)
    )
)]
pub async fn get_profile(
    OriginalUri(uri): OriginalUri,
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    let Path(external_id) = path.map_err(|r| map_path_rejection(&r, uri.path()))?;

    match svc.get_profile(&external_id).await {
        Ok(profile) => Ok(Json(ProfileDto::from(profile))),
        Err(e) => {
            error!("Failed to get profile {}: {}", external_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
