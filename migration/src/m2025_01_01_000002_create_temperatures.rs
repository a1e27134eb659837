//! Migration to create the temperatures table.
//!
//! Readings reference their city and are removed together with it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Temperatures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Temperatures::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Temperatures::CityId).integer().not_null())
                    .col(
                        ColumnDef::new(Temperatures::DateTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Temperatures::Temperature).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_temperatures_city_id")
                            .from(Temperatures::Table, Temperatures::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing filters by city and orders newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_temperatures_city_id_date_time")
                    .table(Temperatures::Table)
                    .col(Temperatures::CityId)
                    .col(Temperatures::DateTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_temperatures_city_id_date_time")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Temperatures::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Temperatures {
    Table,
    Id,
    CityId,
    DateTime,
    Temperature,
}

#[derive(DeriveIden)]
enum Cities {
    Table,
    Id,
}
