use anyhow::Context;
use sea_orm::entity::prelude::*;

use crate::contract::model::{GeoPoint, Profile, Role};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub external_id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub role: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub photo_url: String,
    pub years_of_experience: i32,
    pub qualification: String,
    pub degree_image_url: String,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Profile {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let role = m
            .role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .with_context(|| format!("profile {} has an invalid stored role", m.id))?;
        let location = match (m.longitude, m.latitude) {
            (Some(lng), Some(lat)) => Some(GeoPoint::new(lng, lat)),
            _ => None,
        };
        Ok(Profile {
            id: m.id,
            external_id: m.external_id,
            email: m.email,
            display_name: m.display_name,
            age: m.age,
            gender: m.gender,
            role,
            location,
            photo_url: m.photo_url,
            years_of_experience: m.years_of_experience,
            qualification: m.qualification,
            degree_image_url: m.degree_image_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}
