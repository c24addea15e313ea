//! Transport-agnostic profile model. No serde here; REST DTOs live in `api::rest::dto`.
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_DISPLAY_NAME: &str = "User";
pub const DEFAULT_PHOTO_URL: &str = "default_image_url";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Lawyer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Lawyer => "lawyer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown role '{}', expected one of: user, lawyer, admin",
            self.0
        )
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "lawyer" => Ok(Role::Lawyer),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A point stored longitude-first, the way GeoJSON orders coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Build from a caller pair ordered `[latitude, longitude]`.
    pub fn from_lat_lng(latitude: f64, longitude: f64) -> Self {
        Self::new(longitude, latitude)
    }

    /// GeoJSON `coordinates` array: `[longitude, latitude]`.
    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn to_lat_lng(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// Location as supplied by a caller, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Raw pair ordered `[latitude, longitude]`; arity is checked by the service.
    LatLng(Vec<f64>),
    /// Already longitude-first (GeoJSON point).
    Point(GeoPoint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileState {
    Unregistered,
    Registered,
    Located,
}

impl ProfileState {
    pub fn of(profile: Option<&Profile>) -> Self {
        match profile {
            None => ProfileState::Unregistered,
            Some(p) if p.location.is_some() => ProfileState::Located,
            Some(_) => ProfileState::Registered,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub role: Option<Role>,
    pub location: Option<GeoPoint>,
    pub photo_url: String,
    pub years_of_experience: i32,
    pub qualification: String,
    pub degree_image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh record with every documented default filled in.
    pub fn registered(
        id: Uuid,
        external_id: String,
        email: String,
        role: Option<Role>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            external_id,
            email,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            age: None,
            gender: None,
            role,
            location: None,
            photo_url: DEFAULT_PHOTO_URL.to_string(),
            years_of_experience: 0,
            qualification: String::new(),
            degree_image_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> ProfileState {
        ProfileState::of(Some(self))
    }

    pub fn is_lawyer(&self) -> bool {
        self.role == Some(Role::Lawyer)
    }
}

/// Registration request. Raw strings; the service trims and validates them.
#[derive(Debug, Clone, Default)]
pub struct NewRegistration {
    pub external_id: String,
    pub email: String,
    pub role: Option<String>,
}

/// Partial update for any registered profile.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub location: Option<LocationInput>,
    pub photo_url: Option<String>,
}

/// Partial update accepted only for lawyer profiles.
#[derive(Debug, Clone, Default)]
pub struct LawyerProfilePatch {
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub location: Option<LocationInput>,
    pub photo_url: Option<String>,
    pub years_of_experience: Option<i32>,
    pub qualification: Option<String>,
    pub degree_image_url: Option<String>,
}
