use async_trait::async_trait;

use crate::contract::{
    error::ProfilesError,
    model::{LawyerProfilePatch, NewRegistration, Profile, ProfilePatch},
};

/// Public API of the profiles module for other modules in the same process.
#[async_trait]
pub trait ProfilesApi: Send + Sync {
    /// Idempotent by external id: a repeat call returns the stored profile untouched.
    async fn register(&self, registration: NewRegistration) -> Result<Profile, ProfilesError>;

    async fn get_profile(&self, external_id: &str) -> Result<Profile, ProfilesError>;

    async fn update_profile(
        &self,
        external_id: &str,
        patch: ProfilePatch,
    ) -> Result<Profile, ProfilesError>;

    /// Only profiles whose role is `lawyer` are updated.
    async fn update_lawyer_profile(
        &self,
        external_id: &str,
        patch: LawyerProfilePatch,
    ) -> Result<Profile, ProfilesError>;
}
