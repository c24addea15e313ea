use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    GeoPoint, LawyerProfilePatch, LocationInput, NewRegistration, Profile, ProfilePatch,
};
use crate::domain::error::DomainError;
use crate::domain::geo::parse_location_value;

/// GeoJSON point as stored: `coordinates` is `[longitude, latitude]`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GeoPointDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

impl From<GeoPoint> for GeoPointDto {
    fn from(p: GeoPoint) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: p.coordinates().to_vec(),
        }
    }
}

/// REST DTO for the profile record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPointDto>,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
    pub years_of_experience: i32,
    pub qualification: String,
    #[serde(rename = "degreeImageURL")]
    pub degree_image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            external_id: p.external_id,
            email: p.email,
            display_name: p.display_name,
            age: p.age,
            gender: p.gender,
            role: p.role.map(|r| r.as_str().to_string()),
            location: p.location.map(GeoPointDto::from),
            photo_url: p.photo_url,
            years_of_experience: p.years_of_experience,
            qualification: p.qualification,
            degree_image_url: p.degree_image_url,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Body of `POST /register`. Missing ids deserialize as empty and fail validation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterReq {
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<RegisterReq> for NewRegistration {
    fn from(req: RegisterReq) -> Self {
        Self {
            external_id: req.external_id,
            email: req.email,
            role: req.role,
        }
    }
}

/// Body of `POST /update-profile`.
///
/// `location` and `coordinates` both carry a raw `[latitude, longitude]` pair
/// (or a GeoJSON point); `coordinates` wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileReq {
    #[serde(default)]
    pub external_id: String,
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub location: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub coordinates: Option<Value>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

fn location_input(
    location: Option<Value>,
    coordinates: Option<Value>,
) -> Result<Option<LocationInput>, DomainError> {
    coordinates
        .or(location)
        .filter(|v| !v.is_null())
        .map(|v| parse_location_value(&v))
        .transpose()
}

impl UpdateProfileReq {
    /// Split the body into the target id and the patch.
    pub fn into_parts(self) -> Result<(String, ProfilePatch), DomainError> {
        let location = location_input(self.location, self.coordinates)?;
        Ok((
            self.external_id,
            ProfilePatch {
                display_name: self.display_name,
                age: self.age,
                gender: self.gender,
                location,
                photo_url: self.photo_url,
            },
        ))
    }
}

/// Body of `PATCH /update-lawyer-profile/{externalId}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateLawyerProfileReq {
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub location: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub coordinates: Option<Value>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub years_of_experience: Option<i32>,
    pub qualification: Option<String>,
    #[serde(rename = "degreeImageURL")]
    pub degree_image_url: Option<String>,
}

impl TryFrom<UpdateLawyerProfileReq> for LawyerProfilePatch {
    type Error = DomainError;

    fn try_from(req: UpdateLawyerProfileReq) -> Result<Self, Self::Error> {
        Ok(Self {
            location: location_input(req.location, req.coordinates)?,
            display_name: req.display_name,
            age: req.age,
            gender: req.gender,
            photo_url: req.photo_url,
            years_of_experience: req.years_of_experience,
            qualification: req.qualification,
            degree_image_url: req.degree_image_url,
        })
    }
}

pub const LAWYER_UPDATED_MESSAGE: &str = "Profile updated successfully";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LawyerUpdatedDto {
    pub message: String,
    pub lawyer: ProfileDto,
}

impl From<Profile> for LawyerUpdatedDto {
    fn from(p: Profile) -> Self {
        Self {
            message: LAWYER_UPDATED_MESSAGE.to_string(),
            lawyer: p.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::Role;
    use serde_json::json;

    #[test]
    fn profile_serializes_with_wire_names() {
        let mut p = Profile::registered(
            Uuid::nil(),
            "u1".into(),
            "a@x.com".into(),
            Some(Role::Lawyer),
            Utc::now(),
        );
        p.location = Some(GeoPoint::new(77.6, 12.9));
        let v = serde_json::to_value(ProfileDto::from(p)).unwrap();
        assert_eq!(v["externalId"], "u1");
        assert_eq!(v["photoURL"], "default_image_url");
        assert_eq!(v["degreeImageURL"], "");
        assert_eq!(v["yearsOfExperience"], 0);
        assert_eq!(v["role"], "lawyer");
        assert_eq!(v["location"], json!({ "type": "Point", "coordinates": [77.6, 12.9] }));
        assert!(v.get("age").is_none());
    }

    #[test]
    fn coordinates_win_over_location() {
        let req: UpdateProfileReq = serde_json::from_value(json!({
            "externalId": "u1",
            "location": [1.0, 2.0],
            "coordinates": [12.9, 77.6]
        }))
        .unwrap();
        let (id, patch) = req.into_parts().unwrap();
        assert_eq!(id, "u1");
        assert_eq!(patch.location, Some(LocationInput::LatLng(vec![12.9, 77.6])));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<UpdateProfileReq, _> = serde_json::from_value(json!({
            "externalId": "u1",
            "role": "admin"
        }));
        assert!(res.is_err());

        let res: Result<UpdateLawyerProfileReq, _> =
            serde_json::from_value(json!({ "email": "b@x.com" }));
        assert!(res.is_err());
    }

    #[test]
    fn non_numeric_location_is_a_validation_error() {
        let req: UpdateLawyerProfileReq =
            serde_json::from_value(json!({ "location": ["a", "b"] })).unwrap();
        let err = LawyerProfilePatch::try_from(req).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn null_location_is_ignored() {
        let req: UpdateProfileReq =
            serde_json::from_value(json!({ "externalId": "u1", "location": null })).unwrap();
        let (_, patch) = req.into_parts().unwrap();
        assert!(patch.location.is_none());
    }
}
