use modkit::api::problem::{Problem, ValidationError};
use utoipa::OpenApi;

use crate::api::rest::dto::{
    GeoPointDto, LawyerUpdatedDto, ProfileDto, RegisterReq, UpdateLawyerProfileReq,
    UpdateProfileReq,
};
use crate::api::rest::handlers;

/// OpenAPI document for the profiles REST surface, served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "LegalWatch Profiles API"),
    paths(
        handlers::hello,
        handlers::register,
        handlers::update_profile,
        handlers::update_lawyer_profile,
        handlers::get_profile
    ),
    components(schemas(
        ProfileDto,
        GeoPointDto,
        RegisterReq,
        UpdateProfileReq,
        UpdateLawyerProfileReq,
        LawyerUpdatedDto,
        Problem,
        ValidationError
    )),
    tags((name = "profiles", description = "Profile registration and updates"))
)]
pub struct ProfilesApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ProfilesApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for p in [
            "/api",
            "/api/register",
            "/api/update-profile",
            "/api/update-lawyer-profile/{externalId}",
            "/api/profiles/{externalId}",
        ] {
            assert!(paths.iter().any(|k| k.as_str() == p), "missing {p}");
        }
        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("ProfileDto"));
        assert!(schemas.contains_key("Problem"));
    }
}
