//! Create medio table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Medio::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Medio::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Medio::IdUsuario).integer())
                    .col(ColumnDef::new(Medio::IdPub).integer())
                    .col(ColumnDef::new(Medio::Url).string_len(1024).not_null())
                    .col(ColumnDef::new(Medio::MediaType).string_len(20).not_null())
                    .col(ColumnDef::new(Medio::Width).integer())
                    .col(ColumnDef::new(Medio::Height).integer())
                    .col(
                        ColumnDef::new(Medio::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medio_usuario")
                            .from(Medio::Table, Medio::IdUsuario)
                            .to(Usuario::Table, Usuario::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medio_publicacion")
                            .from(Medio::Table, Medio::IdPub)
                            .to(Publicacion::Table, Publicacion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: id_usuario (for listing a user's uploads)
        manager
            .create_index(
                Index::create()
                    .name("idx_medio_id_usuario")
                    .table(Medio::Table)
                    .col(Medio::IdUsuario)
                    .to_owned(),
            )
            .await?;

        // Index: id_pub (for listing a post's media)
        manager
            .create_index(
                Index::create()
                    .name("idx_medio_id_pub")
                    .table(Medio::Table)
                    .col(Medio::IdPub)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Medio::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Medio {
    Table,
    Id,
    IdUsuario,
    IdPub,
    Url,
    MediaType,
    Width,
    Height,
    CreatedAt,
}

#[derive(Iden)]
enum Usuario {
    Table,
    Id,
}

#[derive(Iden)]
enum Publicacion {
    Table,
    Id,
}
