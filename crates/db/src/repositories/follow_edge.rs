//! Follow edge repository.

use std::sync::Arc;

use crate::entities::{FollowEdge, follow_edge};
use redsocial_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};

/// Follow edge repository for database operations.
#[derive(Clone)]
pub struct FollowEdgeRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowEdgeRepository {
    /// Create a new follow edge repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow edge by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<follow_edge::Model>> {
        FollowEdge::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the edge for a (follower, followed) pair, active or not.
    pub async fn find_by_pair(
        &self,
        follower_id: i32,
        followed_id: i32,
    ) -> AppResult<Option<follow_edge::Model>> {
        self.find_by_pair_in(self.db.as_ref(), follower_id, followed_id)
            .await
    }

    /// Find the edge for a pair on a caller-supplied connection.
    pub async fn find_by_pair_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        follower_id: i32,
        followed_id: i32,
    ) -> AppResult<Option<follow_edge::Model>> {
        FollowEdge::find()
            .filter(follow_edge::Column::IdSeguidor.eq(follower_id))
            .filter(follow_edge::Column::IdSeguido.eq(followed_id))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is actively following another user.
    pub async fn is_following(&self, follower_id: i32, followed_id: i32) -> AppResult<bool> {
        Ok(self
            .find_by_pair(follower_id, followed_id)
            .await?
            .is_some_and(|edge| edge.is_active))
    }

    /// Create a new follow edge.
    ///
    /// A unique-pair violation from a concurrent insert resolves to
    /// `AlreadyFollowing`: the store, not application locking, decides
    /// the race winner.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: follow_edge::ActiveModel,
    ) -> AppResult<follow_edge::Model> {
        model.insert(conn).await.map_err(|e: DbErr| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::AlreadyFollowing,
            _ => AppError::Database(e.to_string()),
        })
    }

    /// Update a follow edge (active flag toggles).
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: follow_edge::ActiveModel,
    ) -> AppResult<follow_edge::Model> {
        model
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete every edge touching a user, in either direction. Returns
    /// the number of deleted rows.
    pub async fn delete_by_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> AppResult<u64> {
        FollowEdge::delete_many()
            .filter(
                Condition::any()
                    .add(follow_edge::Column::IdSeguidor.eq(user_id))
                    .add(follow_edge::Column::IdSeguido.eq(user_id)),
            )
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get active edges pointing at a user (their followers), oldest
    /// first.
    pub async fn find_followers(&self, user_id: i32) -> AppResult<Vec<follow_edge::Model>> {
        FollowEdge::find()
            .filter(follow_edge::Column::IdSeguido.eq(user_id))
            .filter(follow_edge::Column::IsActive.eq(true))
            .order_by_asc(follow_edge::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get active edges leaving a user (who they follow), oldest first.
    pub async fn find_following(&self, user_id: i32) -> AppResult<Vec<follow_edge::Model>> {
        FollowEdge::find()
            .filter(follow_edge::Column::IdSeguidor.eq(user_id))
            .filter(follow_edge::Column::IsActive.eq(true))
            .order_by_asc(follow_edge::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active followers of a user.
    pub async fn count_followers(&self, user_id: i32) -> AppResult<u64> {
        FollowEdge::find()
            .filter(follow_edge::Column::IdSeguido.eq(user_id))
            .filter(follow_edge::Column::IsActive.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users a user actively follows.
    pub async fn count_following(&self, user_id: i32) -> AppResult<u64> {
        FollowEdge::find()
            .filter(follow_edge::Column::IdSeguidor.eq(user_id))
            .filter(follow_edge::Column::IsActive.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_edge(
        id: i32,
        follower_id: i32,
        followed_id: i32,
        is_active: bool,
    ) -> follow_edge::Model {
        follow_edge::Model {
            id,
            id_seguidor: follower_id,
            id_seguido: followed_id,
            created_at: Utc::now().into(),
            is_active,
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let edge = create_test_edge(1, 1, 2, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge.clone()]])
                .into_connection(),
        );

        let repo = FollowEdgeRepository::new(db);
        let result = repo.find_by_pair(1, 2).await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.id_seguidor, 1);
        assert_eq!(found.id_seguido, 2);
    }

    #[tokio::test]
    async fn test_find_by_pair_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_edge::Model>::new()])
                .into_connection(),
        );

        let repo = FollowEdgeRepository::new(db);
        let result = repo.find_by_pair(1, 3).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_is_following_true() {
        let edge = create_test_edge(1, 1, 2, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );

        let repo = FollowEdgeRepository::new(db);
        assert!(repo.is_following(1, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_following_false_for_inactive_edge() {
        let edge = create_test_edge(1, 1, 2, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );

        let repo = FollowEdgeRepository::new(db);
        assert!(!repo.is_following(1, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_followers_only_active() {
        let e1 = create_test_edge(1, 2, 1, true);
        let e2 = create_test_edge(2, 3, 1, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1, e2]])
                .into_connection(),
        );

        let repo = FollowEdgeRepository::new(db);
        let result = repo.find_followers(1).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|e| e.is_active));
    }

    #[tokio::test]
    async fn test_find_following() {
        let e1 = create_test_edge(1, 1, 2, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1]])
                .into_connection(),
        );

        let repo = FollowEdgeRepository::new(db);
        let result = repo.find_following(1).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id_seguido, 2);
    }
}
