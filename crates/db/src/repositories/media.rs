//! Media repository.

use std::sync::Arc;

use crate::entities::{Media, media};
use redsocial_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};

/// Media repository for database operations.
#[derive(Clone)]
pub struct MediaRepository {
    db: Arc<DatabaseConnection>,
}

impl MediaRepository {
    /// Create a new media repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a media row by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<media::Model>> {
        self.find_by_id_in(self.db.as_ref(), id).await
    }

    /// Find a media row by ID on a caller-supplied connection.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
    ) -> AppResult<Option<media::Model>> {
        Media::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a media row by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<media::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("media {id}")))
    }

    /// Get media attached to a post, oldest first.
    pub async fn find_by_post(&self, post_id: i32) -> AppResult<Vec<media::Model>> {
        Media::find()
            .filter(media::Column::IdPub.eq(post_id))
            .order_by_asc(media::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get media uploaded by a user, newest first.
    pub async fn find_by_owner(&self, user_id: i32) -> AppResult<Vec<media::Model>> {
        Media::find()
            .filter(media::Column::IdUsuario.eq(user_id))
            .order_by_desc(media::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new media row.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: media::ActiveModel,
    ) -> AppResult<media::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a media row.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: media::ActiveModel,
    ) -> AppResult<media::Model> {
        model
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a media row. Returns the number of deleted rows.
    pub async fn delete_by_id<C: ConnectionTrait>(&self, conn: &C, id: i32) -> AppResult<u64> {
        Media::delete_by_id(id)
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete all media attached to a post. Returns the number of
    /// deleted rows.
    pub async fn delete_by_post<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: i32,
    ) -> AppResult<u64> {
        Media::delete_many()
            .filter(media::Column::IdPub.eq(post_id))
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete all media attached to any of the given posts.
    pub async fn delete_by_posts<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_ids: &[i32],
    ) -> AppResult<u64> {
        if post_ids.is_empty() {
            return Ok(0);
        }
        Media::delete_many()
            .filter(media::Column::IdPub.is_in(post_ids.to_vec()))
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Detach a deleted uploader from their surviving media (set
    /// `id_usuario` to NULL). Returns the number of detached rows.
    pub async fn detach_owner<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> AppResult<u64> {
        Media::update_many()
            .col_expr(media::Column::IdUsuario, Expr::cust("NULL"))
            .filter(media::Column::IdUsuario.eq(user_id))
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
