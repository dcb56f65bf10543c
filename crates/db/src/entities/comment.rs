//! Comment entity (threaded comments on posts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comentarios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Post this comment belongs to
    #[sea_orm(indexed)]
    pub id_pub: i32,

    /// Comment author
    #[sea_orm(indexed)]
    pub id_usuario: i32,

    #[sea_orm(column_type = "Text")]
    pub texto: String,

    #[sea_orm(indexed)]
    pub created_at: DateTimeWithTimeZone,

    /// Parent comment for threaded replies. NULL for root comments.
    /// Invariant: the parent belongs to the same post.
    #[sea_orm(nullable, indexed)]
    pub parent_comment_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::IdPub",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::IdUsuario",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentCommentId",
        to = "Column::Id",
        on_delete = "Cascade"
    )]
    Parent,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
