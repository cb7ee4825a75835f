use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Games {
    Table,
    Id,
    Name,
    IsActive,
    CurrentRound,
    LockVersion,
    CreatedAt,
    UpdatedAt,
    EndedAt,
}

#[derive(Iden)]
enum GameRounds {
    Table,
    Id,
    GameId,
    RoundNumber,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    GameId,
    DisplayName,
    IsPlayer,
    PlayerSlot,
    Avatar,
    CreatedAt,
}

#[derive(Iden)]
enum Submissions {
    Table,
    Id,
    SessionId,
    GameId,
    RoundId,
    Content,
    ResultUrl,
    VideoTaskUuid,
    CreatedAt,
}

#[derive(Iden)]
enum Votes {
    Table,
    Id,
    SessionId,
    SubmissionId,
    RoundId,
    CreatedAt,
}

#[derive(Iden)]
enum Videos {
    Table,
    Id,
    TaskUuid,
    VideoUrl,
    Status,
    Prompt,
    Model,
    Width,
    Height,
    Cost,
    Seed,
    CreatedAt,
    UpdatedAt,
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

fn created_at_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(id_col(Games::Id))
                    .col(ColumnDef::new(Games::Name).string().not_null())
                    .col(
                        ColumnDef::new(Games::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Games::CurrentRound)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Games::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(created_at_col(Games::CreatedAt))
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_games_is_active")
                    .table(Games::Table)
                    .col(Games::IsActive)
                    .to_owned(),
            )
            .await?;

        // game_rounds
        manager
            .create_table(
                Table::create()
                    .table(GameRounds::Table)
                    .if_not_exists()
                    .col(id_col(GameRounds::Id))
                    .col(ColumnDef::new(GameRounds::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameRounds::RoundNumber)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GameRounds::Content).string().not_null())
                    .col(created_at_col(GameRounds::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_rounds_game_id")
                            .from(GameRounds::Table, GameRounds::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one row per round number: the backstop for auto-advance.
        manager
            .create_index(
                Index::create()
                    .name("ux_game_rounds_game_round")
                    .table(GameRounds::Table)
                    .col(GameRounds::GameId)
                    .col(GameRounds::RoundNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // sessions
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(id_col(Sessions::Id))
                    .col(ColumnDef::new(Sessions::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::DisplayName).string().not_null())
                    .col(
                        ColumnDef::new(Sessions::IsPlayer)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Sessions::PlayerSlot).small_integer().null())
                    .col(
                        ColumnDef::new(Sessions::Avatar)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(created_at_col(Sessions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_game_id")
                            .from(Sessions::Table, Sessions::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Voters carry a NULL slot, which never collides.
        manager
            .create_index(
                Index::create()
                    .name("ux_sessions_game_player_slot")
                    .table(Sessions::Table)
                    .col(Sessions::GameId)
                    .col(Sessions::PlayerSlot)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // submissions
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(id_col(Submissions::Id))
                    .col(
                        ColumnDef::new(Submissions::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::RoundId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::Content).text().not_null())
                    .col(ColumnDef::new(Submissions::ResultUrl).text().null())
                    .col(ColumnDef::new(Submissions::VideoTaskUuid).string().null())
                    .col(created_at_col(Submissions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submissions_session_id")
                            .from(Submissions::Table, Submissions::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submissions_game_id")
                            .from(Submissions::Table, Submissions::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submissions_round_id")
                            .from(Submissions::Table, Submissions::RoundId)
                            .to(GameRounds::Table, GameRounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_submissions_session_round")
                    .table(Submissions::Table)
                    .col(Submissions::SessionId)
                    .col(Submissions::RoundId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_submissions_round_id")
                    .table(Submissions::Table)
                    .col(Submissions::RoundId)
                    .to_owned(),
            )
            .await?;

        // votes
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(id_col(Votes::Id))
                    .col(ColumnDef::new(Votes::SessionId).big_integer().not_null())
                    .col(ColumnDef::new(Votes::SubmissionId).big_integer().not_null())
                    .col(ColumnDef::new(Votes::RoundId).big_integer().not_null())
                    .col(created_at_col(Votes::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_session_id")
                            .from(Votes::Table, Votes::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_submission_id")
                            .from(Votes::Table, Votes::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_round_id")
                            .from(Votes::Table, Votes::RoundId)
                            .to(GameRounds::Table, GameRounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One vote per session per round.
        manager
            .create_index(
                Index::create()
                    .name("ux_votes_session_round")
                    .table(Votes::Table)
                    .col(Votes::SessionId)
                    .col(Votes::RoundId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_votes_submission_id")
                    .table(Votes::Table)
                    .col(Votes::SubmissionId)
                    .to_owned(),
            )
            .await?;

        // videos
        manager
            .create_table(
                Table::create()
                    .table(Videos::Table)
                    .if_not_exists()
                    .col(id_col(Videos::Id))
                    .col(ColumnDef::new(Videos::TaskUuid).string().not_null())
                    .col(ColumnDef::new(Videos::VideoUrl).text().not_null())
                    .col(ColumnDef::new(Videos::Status).string().not_null())
                    .col(ColumnDef::new(Videos::Prompt).text().not_null())
                    .col(ColumnDef::new(Videos::Model).string().not_null())
                    .col(ColumnDef::new(Videos::Width).double().not_null())
                    .col(ColumnDef::new(Videos::Height).double().not_null())
                    .col(ColumnDef::new(Videos::Cost).double().null())
                    .col(ColumnDef::new(Videos::Seed).double().null())
                    .col(created_at_col(Videos::CreatedAt))
                    .col(
                        ColumnDef::new(Videos::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_videos_task_uuid")
                    .table(Videos::Table)
                    .col(Videos::TaskUuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order; indexes go with their tables
        manager
            .drop_table(Table::drop().table(Videos::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Votes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GameRounds::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
