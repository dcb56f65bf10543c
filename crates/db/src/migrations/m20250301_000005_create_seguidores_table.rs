//! Create seguidores table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Seguidores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Seguidores::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Seguidores::IdSeguidor).integer().not_null())
                    .col(ColumnDef::new(Seguidores::IdSeguido).integer().not_null())
                    .col(
                        ColumnDef::new(Seguidores::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Seguidores::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seguidores_seguidor")
                            .from(Seguidores::Table, Seguidores::IdSeguidor)
                            .to(Usuario::Table, Usuario::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seguidores_seguido")
                            .from(Seguidores::Table, Seguidores::IdSeguido)
                            .to(Usuario::Table, Usuario::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (id_seguidor, id_seguido) - one edge per pair,
        // across toggle history
        manager
            .create_index(
                Index::create()
                    .name("idx_seguidores_seguidor_seguido")
                    .table(Seguidores::Table)
                    .col(Seguidores::IdSeguidor)
                    .col(Seguidores::IdSeguido)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: id_seguido (for listing followers)
        manager
            .create_index(
                Index::create()
                    .name("idx_seguidores_id_seguido")
                    .table(Seguidores::Table)
                    .col(Seguidores::IdSeguido)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Seguidores::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Seguidores {
    Table,
    Id,
    IdSeguidor,
    IdSeguido,
    CreatedAt,
    IsActive,
}

#[derive(Iden)]
enum Usuario {
    Table,
    Id,
}
