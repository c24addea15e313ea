use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::ProfilesApi,
    error::ProfilesError,
    model::{LawyerProfilePatch, NewRegistration, Profile, ProfilePatch},
};
use crate::domain::service::Service;

/// Local implementation of the ProfilesApi trait that delegates to the domain service
pub struct ProfilesLocalClient {
    service: Arc<Service>,
}

impl ProfilesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ProfilesApi for ProfilesLocalClient {
    async fn register(&self, registration: NewRegistration) -> Result<Profile, ProfilesError> {
        self.service.register(registration).await.map_err(Into::into)
    }

    async fn get_profile(&self, external_id: &str) -> Result<Profile, ProfilesError> {
        self.service.get_profile(external_id).await.map_err(Into::into)
    }

    async fn update_profile(
        &self,
        external_id: &str,
        patch: ProfilePatch,
    ) -> Result<Profile, ProfilesError> {
        self.service
            .update_profile(external_id, patch)
            .await
            .map_err(Into::into)
    }

    async fn update_lawyer_profile(
        &self,
        external_id: &str,
        patch: LawyerProfilePatch,
    ) -> Result<Profile, ProfilesError> {
        self.service
            .update_lawyer_profile(external_id, patch)
            .await
            .map_err(Into::into)
    }
}
