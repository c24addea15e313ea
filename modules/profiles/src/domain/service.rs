use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    LawyerProfilePatch, LocationInput, NewRegistration, Profile, ProfilePatch, Role,
    DEFAULT_PHOTO_URL,
};
use crate::domain::error::DomainError;
use crate::domain::geo::resolve_location;
use crate::domain::repo::{ProfileChanges, ProfileFilter, ProfilesRepository, StoreError};

/// Domain service with the registration and update rules.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ProfilesRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_display_name_length: usize,
    pub max_age: i32,
    pub max_years_of_experience: i32,
    pub max_qualification_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_display_name_length: 100,
            max_age: 150,
            max_years_of_experience: 80,
            max_qualification_length: 200,
        }
    }
}

/// Keeps the whole context chain, e.g. `find_one failed: <driver error>`.
fn store_err(e: StoreError) -> DomainError {
    DomainError::store(format!("{e:#}"))
}

impl Service {
    pub fn new(repo: Arc<dyn ProfilesRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(
        name = "profiles.service.register",
        skip(self, registration),
        fields(external_id = %registration.external_id)
    )]
    pub async fn register(&self, registration: NewRegistration) -> Result<Profile, DomainError> {
        let (external_id, email, role) = self.validate_registration(registration)?;
        let filter = ProfileFilter::by_external_id(&external_id);

        if let Some(existing) = self.repo.find_one(&filter).await.map_err(store_err)? {
            debug!("Profile already registered, returning stored record");
            return Ok(existing);
        }

        let profile = Profile::registered(
            Uuid::new_v4(),
            external_id,
            email.clone(),
            role,
            Utc::now(),
        );

        match self.repo.create(profile).await {
            Ok(created) => {
                info!("Registered profile with id={}", created.id);
                Ok(created)
            }
            Err(StoreError::UniqueViolation { field }) => {
                // Either a concurrent register won the race for this external id,
                // or the email belongs to another profile.
                warn!(field = %field, "Unique violation on create, re-reading");
                match self.repo.find_one(&filter).await.map_err(store_err)? {
                    Some(winner) => Ok(winner),
                    None => Err(DomainError::email_already_exists(email)),
                }
            }
            Err(e) => Err(store_err(e)),
        }
    }

    #[instrument(name = "profiles.service.get_profile", skip(self))]
    pub async fn get_profile(&self, external_id: &str) -> Result<Profile, DomainError> {
        let external_id = required("externalId", external_id)?;
        self.repo
            .find_one(&ProfileFilter::by_external_id(external_id))
            .await
            .map_err(store_err)?
            .ok_or_else(|| DomainError::profile_not_found(external_id))
    }

    #[instrument(name = "profiles.service.update_profile", skip(self, patch))]
    pub async fn update_profile(
        &self,
        external_id: &str,
        patch: ProfilePatch,
    ) -> Result<Profile, DomainError> {
        let external_id = required("externalId", external_id)?;

        let mut changes = ProfileChanges::touch(Utc::now());
        self.apply_common(
            &mut changes,
            patch.display_name,
            patch.age,
            patch.gender,
            patch.location,
        )?;
        changes.photo_url = patch.photo_url;

        let updated = self
            .repo
            .find_one_and_update(&ProfileFilter::by_external_id(external_id), changes)
            .await
            .map_err(store_err)?
            .ok_or_else(|| DomainError::profile_not_found(external_id))?;

        info!("Updated profile");
        Ok(updated)
    }

    #[instrument(name = "profiles.service.update_lawyer_profile", skip(self, patch))]
    pub async fn update_lawyer_profile(
        &self,
        external_id: &str,
        patch: LawyerProfilePatch,
    ) -> Result<Profile, DomainError> {
        let external_id = required("externalId", external_id)?;

        let mut changes = ProfileChanges::touch(Utc::now());
        self.apply_common(
            &mut changes,
            patch.display_name,
            patch.age,
            patch.gender,
            patch.location,
        )?;
        if let Some(url) = patch.photo_url {
            changes.photo_url = Some(validate_image_url("photoURL", url)?);
        }
        if let Some(url) = patch.degree_image_url {
            changes.degree_image_url = Some(validate_image_url("degreeImageURL", url)?);
        }
        if let Some(years) = patch.years_of_experience {
            if !(0..=self.config.max_years_of_experience).contains(&years) {
                return Err(DomainError::validation(
                    "yearsOfExperience",
                    format!(
                        "must be between 0 and {}",
                        self.config.max_years_of_experience
                    ),
                ));
            }
            changes.years_of_experience = Some(years);
        }
        if let Some(qualification) = patch.qualification {
            let len = qualification.chars().count();
            if len > self.config.max_qualification_length {
                return Err(DomainError::validation(
                    "qualification",
                    format!(
                        "too long: {} characters (max: {})",
                        len, self.config.max_qualification_length
                    ),
                ));
            }
            changes.qualification = Some(qualification);
        }

        let filter = ProfileFilter::by_external_id(external_id).with_role(Role::Lawyer);
        let updated = self
            .repo
            .find_one_and_update(&filter, changes)
            .await
            .map_err(store_err)?
            .ok_or_else(|| DomainError::lawyer_not_found_or_unauthorized(external_id))?;

        info!("Updated lawyer profile");
        Ok(updated)
    }

    fn validate_registration(
        &self,
        registration: NewRegistration,
    ) -> Result<(String, String, Option<Role>), DomainError> {
        let external_id = required("externalId", &registration.external_id)?.to_string();
        let email = required("email", &registration.email)?.to_string();
        if !looks_like_email(&email) {
            return Err(DomainError::validation(
                "email",
                format!("'{email}' is not a valid email address"),
            ));
        }
        let role = registration
            .role
            .map(|r| r.parse::<Role>())
            .transpose()
            .map_err(|e| DomainError::validation("role", e.to_string()))?;
        Ok((external_id, email, role))
    }

    /// Fields shared by both update operations.
    fn apply_common(
        &self,
        changes: &mut ProfileChanges,
        display_name: Option<String>,
        age: Option<i32>,
        gender: Option<String>,
        location: Option<LocationInput>,
    ) -> Result<(), DomainError> {
        if let Some(name) = display_name {
            changes.display_name = Some(self.validate_display_name(name)?);
        }
        if let Some(age) = age {
            if !(0..=self.config.max_age).contains(&age) {
                return Err(DomainError::validation(
                    "age",
                    format!("must be between 0 and {}", self.config.max_age),
                ));
            }
            changes.age = Some(age);
        }
        changes.gender = gender;
        if let Some(input) = location {
            changes.location = Some(resolve_location(input)?);
        }
        Ok(())
    }

    fn validate_display_name(&self, name: String) -> Result<String, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("displayName", "cannot be empty"));
        }
        let len = name.chars().count();
        if len > self.config.max_display_name_length {
            return Err(DomainError::validation(
                "displayName",
                format!(
                    "too long: {} characters (max: {})",
                    len, self.config.max_display_name_length
                ),
            ));
        }
        Ok(name)
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "is required"));
    }
    Ok(trimmed)
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !email.contains(' '),
        None => false,
    }
}

/// Empty clears the image; otherwise an absolute URL or the default placeholder.
fn validate_image_url(field: &str, value: String) -> Result<String, DomainError> {
    if value.is_empty() || value == DEFAULT_PHOTO_URL || url::Url::parse(&value).is_ok() {
        Ok(value)
    } else {
        Err(DomainError::validation(
            field,
            format!("'{value}' is not an absolute URL"),
        ))
    }
}
