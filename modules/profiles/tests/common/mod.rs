#![allow(dead_code)]

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use profiles::{
    domain::service::{Service, ServiceConfig},
    infra::storage::{migrations::Migrator, SeaOrmProfilesRepository},
};

/// Fresh in-memory SQLite with the profiles schema applied.
///
/// One pooled connection: every `sqlite::memory:` connection is its own database.
pub async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_test_service() -> Arc<Service> {
    create_test_service_with(ServiceConfig::default()).await
}

pub async fn create_test_service_with(config: ServiceConfig) -> Arc<Service> {
    let db = create_test_db().await;
    let repo = SeaOrmProfilesRepository::new(db);
    Arc::new(Service::new(Arc::new(repo), config))
}
