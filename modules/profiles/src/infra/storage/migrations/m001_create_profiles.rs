use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::ExternalId).string().not_null())
                    .col(ColumnDef::new(Profiles::Email).string().not_null())
                    .col(
                        ColumnDef::new(Profiles::DisplayName)
                            .string()
                            .not_null()
                            .default("User"),
                    )
                    .col(ColumnDef::new(Profiles::Age).integer().null())
                    .col(ColumnDef::new(Profiles::Gender).string().null())
                    .col(ColumnDef::new(Profiles::Role).string().null())
                    .col(ColumnDef::new(Profiles::Longitude).double().null())
                    .col(ColumnDef::new(Profiles::Latitude).double().null())
                    .col(
                        ColumnDef::new(Profiles::PhotoUrl)
                            .string()
                            .not_null()
                            .default("default_image_url"),
                    )
                    .col(
                        ColumnDef::new(Profiles::YearsOfExperience)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Profiles::Qualification)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Profiles::DegreeImageUrl)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_profiles_external_id")
                    .table(Profiles::Table)
                    .col(Profiles::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_profiles_email")
                    .table(Profiles::Table)
                    .col(Profiles::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_profiles_location")
                    .table(Profiles::Table)
                    .col(Profiles::Longitude)
                    .col(Profiles::Latitude)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    ExternalId,
    Email,
    DisplayName,
    Age,
    Gender,
    Role,
    Longitude,
    Latitude,
    PhotoUrl,
    YearsOfExperience,
    Qualification,
    DegreeImageUrl,
    CreatedAt,
    UpdatedAt,
}
