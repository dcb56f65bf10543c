//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use redsocial_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<post::Model>> {
        self.find_by_id_in(self.db.as_ref(), id).await
    }

    /// Find a post by ID on a caller-supplied connection.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
    ) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {id}")))
    }

    /// Check whether a post exists.
    pub async fn exists<C: ConnectionTrait>(&self, conn: &C, id: i32) -> AppResult<bool> {
        Ok(self.find_by_id_in(conn, id).await?.is_some())
    }

    /// Get posts by user (newest first).
    pub async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<post::Model>> {
        self.find_by_user_in(self.db.as_ref(), user_id).await
    }

    /// Get posts by user on a caller-supplied connection.
    pub async fn find_by_user_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::IdUsuario.eq(user_id))
            .order_by_desc(post::Column::Id)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: post::ActiveModel,
    ) -> AppResult<post::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: post::ActiveModel,
    ) -> AppResult<post::Model> {
        model
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post row. Returns the number of deleted rows.
    pub async fn delete_by_id<C: ConnectionTrait>(&self, conn: &C, id: i32) -> AppResult<u64> {
        Post::delete_by_id(id)
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete all posts of a user. Returns the number of deleted rows.
    pub async fn delete_by_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> AppResult<u64> {
        Post::delete_many()
            .filter(post::Column::IdUsuario.eq(user_id))
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment comment count atomically (single UPDATE query, no fetch).
    pub async fn increment_comment_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: i32,
    ) -> AppResult<()> {
        Post::update_many()
            .col_expr(
                post::Column::CommentCount,
                Expr::col(post::Column::CommentCount).add(1),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement comment count by `n` atomically, floored at zero.
    pub async fn decrement_comment_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: i32,
        n: u64,
    ) -> AppResult<()> {
        if n == 0 {
            return Ok(());
        }
        Post::update_many()
            .col_expr(
                post::Column::CommentCount,
                Expr::cust(format!("GREATEST(comment_count - {n}, 0)")),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment like count atomically. Returns the number of updated
    /// rows (zero when the post does not exist).
    pub async fn increment_like_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: i32,
    ) -> AppResult<u64> {
        Post::update_many()
            .col_expr(
                post::Column::LikeCount,
                Expr::col(post::Column::LikeCount).add(1),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Decrement like count atomically, guarded against going negative.
    /// Returns the number of updated rows: zero means the post does not
    /// exist or its counter is already at zero.
    pub async fn decrement_like_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: i32,
    ) -> AppResult<u64> {
        Post::update_many()
            .col_expr(
                post::Column::LikeCount,
                Expr::col(post::Column::LikeCount).sub(1),
            )
            .filter(post::Column::Id.eq(post_id))
            .filter(post::Column::LikeCount.gt(0))
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::post::Privacy;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_post(id: i32, user_id: i32, texto: Option<&str>) -> post::Model {
        post::Model {
            id,
            id_usuario: user_id,
            texto: texto.map(std::string::ToString::to_string),
            created_at: Utc::now().into(),
            privacy: Privacy::Public,
            location: None,
            like_count: 0,
            comment_count: 0,
            is_deleted: false,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let post = create_test_post(1, 1, Some("hola"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_by_id(1).await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().texto, Some("hola".to_string()));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id(404).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let p1 = create_test_post(1, 1, Some("uno"));
        let p2 = create_test_post(2, 1, Some("dos"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[p2, p1]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_by_user(1).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_decrement_like_count_reports_updated_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                ])
                .into_connection(),
        );

        let repo = PostRepository::new(db.clone());
        assert_eq!(repo.decrement_like_count(db.as_ref(), 1).await.unwrap(), 1);
        // Second call hits the guard (counter already at zero).
        assert_eq!(repo.decrement_like_count(db.as_ref(), 1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_decrement_comment_count_zero_is_noop() {
        // No exec results queued: a zero decrement must not touch the store.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PostRepository::new(db.clone());
        let result = repo.decrement_comment_count(db.as_ref(), 1, 0).await;

        assert!(result.is_ok());
    }
}
