//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use redsocial_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<comment::Model>> {
        self.find_by_id_in(self.db.as_ref(), id).await
    }

    /// Find a comment by ID on a caller-supplied connection.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
    ) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {id}")))
    }

    /// Get comments on a post, oldest first.
    pub async fn find_by_post(&self, post_id: i32) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::IdPub.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get direct replies to a comment, oldest first.
    pub async fn find_replies(&self, parent_id: i32) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::ParentCommentId.eq(parent_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count live comments on a post.
    pub async fn count_by_post(&self, post_id: i32) -> AppResult<u64> {
        Comment::find()
            .filter(comment::Column::IdPub.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get comments authored by a user on a caller-supplied connection.
    pub async fn find_by_author_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::IdUsuario.eq(user_id))
            .order_by_asc(comment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the IDs of direct replies to a comment.
    pub async fn find_reply_ids_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        parent_id: i32,
    ) -> AppResult<Vec<i32>> {
        let replies = Comment::find()
            .filter(comment::Column::ParentCommentId.eq(parent_id))
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(replies.into_iter().map(|c| c.id).collect())
    }

    /// Collect the IDs of a comment and its entire reply subtree.
    ///
    /// Thread depth is caller-controlled and unbounded, so this walks
    /// the tree with an explicit stack instead of recursing.
    pub async fn collect_subtree_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        root_id: i32,
    ) -> AppResult<Vec<i32>> {
        let mut ids = Vec::new();
        let mut stack = vec![root_id];

        while let Some(current) = stack.pop() {
            ids.push(current);
            let children = self.find_reply_ids_in(conn, current).await?;
            stack.extend(children);
        }

        Ok(ids)
    }

    /// Create a new comment.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: comment::ActiveModel,
    ) -> AppResult<comment::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a comment.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: comment::ActiveModel,
    ) -> AppResult<comment::Model> {
        model
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the given comment rows. Returns the number of deleted rows.
    pub async fn delete_by_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[i32],
    ) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        Comment::delete_many()
            .filter(comment::Column::Id.is_in(ids.to_vec()))
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete all comments on a post. Returns the number of deleted rows.
    pub async fn delete_by_post<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: i32,
    ) -> AppResult<u64> {
        Comment::delete_many()
            .filter(comment::Column::IdPub.eq(post_id))
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete all comments on any of the given posts.
    pub async fn delete_by_posts<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_ids: &[i32],
    ) -> AppResult<u64> {
        if post_ids.is_empty() {
            return Ok(0);
        }
        Comment::delete_many()
            .filter(comment::Column::IdPub.is_in(post_ids.to_vec()))
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
