//! Create usuario table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Usuario::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Usuario::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Usuario::Email).string_len(120).not_null())
                    .col(ColumnDef::new(Usuario::Username).string_len(80).not_null())
                    .col(ColumnDef::new(Usuario::FullName).string_len(150))
                    .col(ColumnDef::new(Usuario::Bio).text())
                    .col(ColumnDef::new(Usuario::Website).string_len(255))
                    .col(
                        ColumnDef::new(Usuario::IsPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Usuario::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Usuario::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: email
        manager
            .create_index(
                Index::create()
                    .name("idx_usuario_email")
                    .table(Usuario::Table)
                    .col(Usuario::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: username
        manager
            .create_index(
                Index::create()
                    .name("idx_usuario_username")
                    .table(Usuario::Table)
                    .col(Usuario::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_usuario_created_at")
                    .table(Usuario::Table)
                    .col(Usuario::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Usuario::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Usuario {
    Table,
    Id,
    Email,
    Username,
    FullName,
    Bio,
    Website,
    IsPrivate,
    IsVerified,
    CreatedAt,
}
