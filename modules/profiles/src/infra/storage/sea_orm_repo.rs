//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over the connection so tests can hand it an in-memory SQLite
//! `DatabaseConnection`. Every update runs inside its own transaction:
//! UPDATE by filter, then read the row back through the same transaction.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    Set, SqlErr, TransactionTrait,
};

use crate::contract::model::Profile;
use crate::domain::repo::{ProfileChanges, ProfileFilter, ProfilesRepository, StoreError};
use crate::infra::storage::entity::{ActiveModel as ProfileAM, Column, Entity as ProfileEntity};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmProfilesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmProfilesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn condition(filter: &ProfileFilter) -> Condition {
    let mut cond = Condition::all().add(Column::ExternalId.eq(filter.external_id.as_str()));
    if let Some(role) = filter.role {
        cond = cond.add(Column::Role.eq(role.as_str()));
    }
    cond
}

/// Name of the column behind a unique-constraint message.
///
/// SQLite reports `UNIQUE constraint failed: profiles.email`, Postgres names
/// the index (`idx_profiles_email`); both contain the column name.
fn unique_field(message: &str) -> &'static str {
    if message.contains("external_id") {
        "external_id"
    } else if message.contains("email") {
        "email"
    } else {
        "unknown"
    }
}

fn map_write_err(e: DbErr, what: &'static str) -> StoreError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => StoreError::UniqueViolation {
            field: unique_field(&msg).to_string(),
        },
        _ => StoreError::Backend(anyhow::Error::new(e).context(what)),
    }
}

fn to_active(changes: ProfileChanges) -> ProfileAM {
    let mut am = ProfileAM {
        updated_at: Set(changes.updated_at),
        ..Default::default()
    };
    if let Some(v) = changes.display_name {
        am.display_name = Set(v);
    }
    if let Some(v) = changes.age {
        am.age = Set(Some(v));
    }
    if let Some(v) = changes.gender {
        am.gender = Set(Some(v));
    }
    if let Some(p) = changes.location {
        am.longitude = Set(Some(p.longitude));
        am.latitude = Set(Some(p.latitude));
    }
    if let Some(v) = changes.photo_url {
        am.photo_url = Set(v);
    }
    if let Some(v) = changes.years_of_experience {
        am.years_of_experience = Set(v);
    }
    if let Some(v) = changes.qualification {
        am.qualification = Set(v);
    }
    if let Some(v) = changes.degree_image_url {
        am.degree_image_url = Set(v);
    }
    am
}

#[async_trait::async_trait]
impl<C> ProfilesRepository for SeaOrmProfilesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_one(&self, filter: &ProfileFilter) -> Result<Option<Profile>, StoreError> {
        let found = ProfileEntity::find()
            .filter(condition(filter))
            .one(&self.conn)
            .await
            .context("find_one failed")?;
        Ok(found.map(Profile::try_from).transpose()?)
    }

    async fn create(&self, p: Profile) -> Result<Profile, StoreError> {
        let m = ProfileAM {
            id: Set(p.id),
            external_id: Set(p.external_id),
            email: Set(p.email),
            display_name: Set(p.display_name),
            age: Set(p.age),
            gender: Set(p.gender),
            role: Set(p.role.map(|r| r.as_str().to_string())),
            longitude: Set(p.location.map(|l| l.longitude)),
            latitude: Set(p.location.map(|l| l.latitude)),
            photo_url: Set(p.photo_url),
            years_of_experience: Set(p.years_of_experience),
            qualification: Set(p.qualification),
            degree_image_url: Set(p.degree_image_url),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        };
        let inserted = m
            .insert(&self.conn)
            .await
            .map_err(|e| map_write_err(e, "insert failed"))?;
        Ok(Profile::try_from(inserted)?)
    }

    async fn find_one_and_update(
        &self,
        filter: &ProfileFilter,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, StoreError> {
        let txn = self.conn.begin().await.context("begin failed")?;

        let res = ProfileEntity::update_many()
            .set(to_active(changes))
            .filter(condition(filter))
            .exec(&txn)
            .await
            .map_err(|e| map_write_err(e, "update failed"))?;

        if res.rows_affected == 0 {
            txn.rollback().await.context("rollback failed")?;
            return Ok(None);
        }

        let row = ProfileEntity::find()
            .filter(condition(filter))
            .one(&txn)
            .await
            .context("read-back failed")?;
        txn.commit().await.context("commit failed")?;

        Ok(row.map(Profile::try_from).transpose()?)
    }
}
