use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::contract::model::{GeoPoint, Profile, Role};

/// Selects at most one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFilter {
    pub external_id: String,
    /// When set, the stored role must match too.
    pub role: Option<Role>,
}

impl ProfileFilter {
    pub fn by_external_id(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// Validated column changes for a single find-one-and-update. `None` leaves a field as is.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub location: Option<GeoPoint>,
    pub photo_url: Option<String>,
    pub years_of_experience: Option<i32>,
    pub qualification: Option<String>,
    pub degree_image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileChanges {
    pub fn touch(updated_at: DateTime<Utc>) -> Self {
        Self {
            display_name: None,
            age: None,
            gender: None,
            location: None,
            photo_url: None,
            years_of_experience: None,
            qualification: None,
            degree_image_url: None,
            updated_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: String },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait ProfilesRepository: Send + Sync {
    async fn find_one(&self, filter: &ProfileFilter) -> Result<Option<Profile>, StoreError>;

    /// Insert a fully-formed profile. Duplicate `external_id` or `email`
    /// surfaces as [`StoreError::UniqueViolation`].
    async fn create(&self, profile: Profile) -> Result<Profile, StoreError>;

    /// Atomically apply `changes` to the matching record and return it updated.
    /// Never inserts; `Ok(None)` when nothing matches.
    async fn find_one_and_update(
        &self,
        filter: &ProfileFilter,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, StoreError>;
}
