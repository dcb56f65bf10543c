//! Create publicacion table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Publicacion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Publicacion::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Publicacion::IdUsuario).integer().not_null())
                    .col(ColumnDef::new(Publicacion::Texto).text())
                    .col(
                        ColumnDef::new(Publicacion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Publicacion::Privacy)
                            .string_len(20)
                            .not_null()
                            .default("public"),
                    )
                    .col(ColumnDef::new(Publicacion::Location).string_len(255))
                    .col(
                        ColumnDef::new(Publicacion::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Publicacion::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Publicacion::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_publicacion_usuario")
                            .from(Publicacion::Table, Publicacion::IdUsuario)
                            .to(Usuario::Table, Usuario::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: id_usuario (for listing a user's posts)
        manager
            .create_index(
                Index::create()
                    .name("idx_publicacion_id_usuario")
                    .table(Publicacion::Table)
                    .col(Publicacion::IdUsuario)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for timeline ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_publicacion_created_at")
                    .table(Publicacion::Table)
                    .col(Publicacion::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Publicacion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Publicacion {
    Table,
    Id,
    IdUsuario,
    Texto,
    CreatedAt,
    Privacy,
    Location,
    LikeCount,
    CommentCount,
    IsDeleted,
}

#[derive(Iden)]
enum Usuario {
    Table,
    Id,
}
