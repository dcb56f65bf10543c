//! Create comentarios table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comentarios::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comentarios::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comentarios::IdPub).integer().not_null())
                    .col(ColumnDef::new(Comentarios::IdUsuario).integer().not_null())
                    .col(ColumnDef::new(Comentarios::Texto).text().not_null())
                    .col(
                        ColumnDef::new(Comentarios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Comentarios::ParentCommentId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comentarios_publicacion")
                            .from(Comentarios::Table, Comentarios::IdPub)
                            .to(Publicacion::Table, Publicacion::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comentarios_usuario")
                            .from(Comentarios::Table, Comentarios::IdUsuario)
                            .to(Usuario::Table, Usuario::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comentarios_parent")
                            .from(Comentarios::Table, Comentarios::ParentCommentId)
                            .to(Comentarios::Table, Comentarios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: id_pub (for listing a post's comments)
        manager
            .create_index(
                Index::create()
                    .name("idx_comentarios_id_pub")
                    .table(Comentarios::Table)
                    .col(Comentarios::IdPub)
                    .to_owned(),
            )
            .await?;

        // Index: id_usuario (for listing a user's comments)
        manager
            .create_index(
                Index::create()
                    .name("idx_comentarios_id_usuario")
                    .table(Comentarios::Table)
                    .col(Comentarios::IdUsuario)
                    .to_owned(),
            )
            .await?;

        // Index: parent_comment_id (for walking reply subtrees)
        manager
            .create_index(
                Index::create()
                    .name("idx_comentarios_parent_comment_id")
                    .table(Comentarios::Table)
                    .col(Comentarios::ParentCommentId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for thread ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_comentarios_created_at")
                    .table(Comentarios::Table)
                    .col(Comentarios::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comentarios::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Comentarios {
    Table,
    Id,
    IdPub,
    IdUsuario,
    Texto,
    CreatedAt,
    ParentCommentId,
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
