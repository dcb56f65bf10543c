//! Counter service.
//!
//! Exposes the like-count adjustments used by the external likes
//! collaborator. The comment counter is maintained by the comment and
//! user services as part of their transactions.

use std::sync::Arc;

use crate::services::db_err;
use redsocial_common::{AppError, AppResult};
use redsocial_db::repositories::PostRepository;
use sea_orm::{DatabaseConnection, TransactionTrait};

/// Counter service for denormalized post counters.
#[derive(Clone)]
pub struct CounterService {
    db: Arc<DatabaseConnection>,
    post_repo: PostRepository,
}

impl CounterService {
    /// Create a new counter service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, post_repo: PostRepository) -> Self {
        Self { db, post_repo }
    }

    /// Atomically increment a post's like count.
    pub async fn increment_likes(&self, post_id: i32) -> AppResult<()> {
        let rows = self
            .post_repo
            .increment_like_count(self.db.as_ref(), post_id)
            .await?;
        if rows == 0 {
            return Err(AppError::NotFound(format!("post {post_id}")));
        }
        tracing::debug!(post_id, "Incremented like count");
        Ok(())
    }

    /// Atomically decrement a post's like count, guarded against going
    /// negative.
    ///
    /// The decrement only applies while the counter is above zero; when
    /// the guard refuses it, a missing post reports `NotFound` and a
    /// zeroed counter reports `CounterUnderflow`.
    pub async fn decrement_likes(&self, post_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let rows = self.post_repo.decrement_like_count(&txn, post_id).await?;
        if rows == 0 {
            self.post_repo
                .find_by_id_in(&txn, post_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;
            return Err(AppError::CounterUnderflow(format!(
                "like_count of post {post_id}"
            )));
        }

        txn.commit().await.map_err(db_err)?;
        tracing::debug!(post_id, "Decremented like count");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use redsocial_db::entities::post::{self, Privacy};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_post(id: i32, like_count: i32) -> post::Model {
        post::Model {
            id,
            id_usuario: 1,
            texto: None,
            created_at: Utc::now().into(),
            privacy: Privacy::Public,
            location: None,
            like_count,
            comment_count: 0,
            is_deleted: false,
        }
    }

    fn service_with(db: Arc<DatabaseConnection>) -> CounterService {
        CounterService::new(db.clone(), PostRepository::new(db))
    }

    #[tokio::test]
    async fn test_increment_likes_ok() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service_with(db);
        assert!(service.increment_likes(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_increment_likes_missing_post_returns_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.increment_likes(404).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_decrement_likes_at_zero_returns_underflow() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0, // guard refused the update
                }])
                .append_query_results([[create_test_post(1, 0)]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.decrement_likes(1).await;

        assert!(matches!(result, Err(AppError::CounterUnderflow(_))));
    }

    #[tokio::test]
    async fn test_decrement_likes_missing_post_returns_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.decrement_likes(404).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_decrement_likes_ok() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = service_with(db);
        assert!(service.decrement_likes(1).await.is_ok());
    }
}
