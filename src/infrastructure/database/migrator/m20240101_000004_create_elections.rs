//! Migration to create elections table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Elections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Elections::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Elections::CategoryId).integer().not_null())
                    // RFC 3339 UTC
                    .col(ColumnDef::new(Elections::StartTime).string_len(40).not_null())
                    .col(ColumnDef::new(Elections::EndTime).string_len(40).not_null())
                    .col(
                        ColumnDef::new(Elections::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_elections_category")
                            .from(Elections::Table, Elections::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_elections_category")
                    .table(Elections::Table)
                    .col(Elections::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Elections::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Elections {
    Table,
    Id,
    CategoryId,
    StartTime,
    EndTime,
    CreatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}
