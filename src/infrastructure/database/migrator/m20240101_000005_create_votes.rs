//! Migration to create votes table
//!
//! The unique index on `(voter_id, election_id)` is the storage-level
//! guarantee of one vote per voter per election.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Votes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Votes::VoterId).integer().not_null())
                    .col(ColumnDef::new(Votes::CandidateId).integer().not_null())
                    .col(ColumnDef::new(Votes::ElectionId).integer().not_null())
                    .col(
                        ColumnDef::new(Votes::CastAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_voter")
                            .from(Votes::Table, Votes::VoterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_candidate")
                            .from(Votes::Table, Votes::CandidateId)
                            .to(Candidates::Table, Candidates::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_election")
                            .from(Votes::Table, Votes::ElectionId)
                            .to(Elections::Table, Elections::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_votes_voter_election")
                    .table(Votes::Table)
                    .col(Votes::VoterId)
                    .col(Votes::ElectionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_votes_election_candidate")
                    .table(Votes::Table)
                    .col(Votes::ElectionId)
                    .col(Votes::CandidateId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Votes {
    Table,
    Id,
    VoterId,
    CandidateId,
    ElectionId,
    CastAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Candidates {
    Table,
    Id,
}

#[derive(Iden)]
enum Elections {
    Table,
    Id,
}
