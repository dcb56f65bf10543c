//! Media entity (uploaded images/videos).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medio")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Uploader user ID. NULL once the uploader's account is deleted.
    #[sea_orm(nullable, indexed)]
    pub id_usuario: Option<i32>,

    /// Post this media is attached to, if any
    #[sea_orm(nullable, indexed)]
    pub id_pub: Option<i32>,

    /// Storage URL
    pub url: String,

    /// Media type tag (image, video, ...)
    pub media_type: String,

    /// Image/video width
    #[sea_orm(nullable)]
    pub width: Option<i32>,

    /// Image/video height
    #[sea_orm(nullable)]
    pub height: Option<i32>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::IdUsuario",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::IdPub",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
