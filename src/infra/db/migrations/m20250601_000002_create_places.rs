//! Migration: Create the `places` table with FK to `users`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Places::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Places::Id).uuid().primary_key())
                    .col(ColumnDef::new(Places::Title).string().not_null())
                    .col(ColumnDef::new(Places::Description).string().not_null())
                    .col(ColumnDef::new(Places::Address).string().not_null())
                    .col(ColumnDef::new(Places::Lat).double().not_null())
                    .col(ColumnDef::new(Places::Lng).double().not_null())
                    .col(ColumnDef::new(Places::ImageUrl).string().null())
                    .col(ColumnDef::new(Places::Creator).uuid().not_null())
                    .col(
                        ColumnDef::new(Places::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Places::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_places_creator")
                            .from(Places::Table, Places::Creator)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing a user's places filters on creator
        manager
            .create_index(
                Index::create()
                    .name("idx_places_creator")
                    .table(Places::Table)
                    .col(Places::Creator)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_places_creator")
                    .table(Places::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Places::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Places {
    Table,
    Id,
    Title,
    Description,
    Address,
    Lat,
    Lng,
    ImageUrl,
    Creator,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
