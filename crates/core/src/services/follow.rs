//! Follow service.
//!
//! Directed, deduplicated follow graph over users. Unfollow is soft:
//! the edge row survives with `is_active = false`, and a later follow
//! reactivates it instead of inserting a duplicate, so the unique
//! (follower, followed) pair holds across toggle history.

use std::sync::Arc;

use crate::services::db_err;
use redsocial_common::{AppError, AppResult};
use redsocial_db::{
    entities::follow_edge,
    repositories::{FollowEdgeRepository, UserRepository},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    db: Arc<DatabaseConnection>,
    follow_repo: FollowEdgeRepository,
    user_repo: UserRepository,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        follow_repo: FollowEdgeRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            db,
            follow_repo,
            user_repo,
        }
    }

    /// Follow a user.
    ///
    /// Reuses an inactive historical edge when one exists. A concurrent
    /// duplicate insert loses at the store's unique-pair index and
    /// observes `AlreadyFollowing`.
    pub async fn follow(
        &self,
        follower_id: i32,
        followed_id: i32,
    ) -> AppResult<follow_edge::Model> {
        if follower_id == followed_id {
            return Err(AppError::SelfFollow);
        }

        let txn = self.db.begin().await.map_err(db_err)?;

        if let Some(edge) = self
            .follow_repo
            .find_by_pair_in(&txn, follower_id, followed_id)
            .await?
        {
            if edge.is_active {
                return Err(AppError::AlreadyFollowing);
            }

            // Reactivate in place: the edge id and created_at survive
            // the toggle.
            let mut active: follow_edge::ActiveModel = edge.into();
            active.is_active = Set(true);
            let edge = self.follow_repo.update(&txn, active).await?;
            txn.commit().await.map_err(db_err)?;

            tracing::debug!(follower_id, followed_id, "Reactivated follow edge");
            return Ok(edge);
        }

        if !self.user_repo.exists(&txn, follower_id).await? {
            return Err(AppError::DanglingReference(format!("user {follower_id}")));
        }
        if !self.user_repo.exists(&txn, followed_id).await? {
            return Err(AppError::DanglingReference(format!("user {followed_id}")));
        }

        let model = follow_edge::ActiveModel {
            id_seguidor: Set(follower_id),
            id_seguido: Set(followed_id),
            created_at: Set(chrono::Utc::now().into()),
            is_active: Set(true),
            ..Default::default()
        };

        let edge = self.follow_repo.create(&txn, model).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::debug!(follower_id, followed_id, "Created follow edge");
        Ok(edge)
    }

    /// Unfollow a user (soft removal, history preserved).
    pub async fn unfollow(&self, follower_id: i32, followed_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let edge = self
            .follow_repo
            .find_by_pair_in(&txn, follower_id, followed_id)
            .await?
            .filter(|edge| edge.is_active)
            .ok_or(AppError::NotFollowing)?;

        let mut active: follow_edge::ActiveModel = edge.into();
        active.is_active = Set(false);
        self.follow_repo.update(&txn, active).await?;

        txn.commit().await.map_err(db_err)?;

        tracing::debug!(follower_id, followed_id, "Deactivated follow edge");
        Ok(())
    }

    /// Get a user's followers (active edges, oldest first).
    pub async fn list_followers(&self, user_id: i32) -> AppResult<Vec<follow_edge::Model>> {
        self.follow_repo.find_followers(user_id).await
    }

    /// Get the users a user follows (active edges, oldest first).
    pub async fn list_following(&self, user_id: i32) -> AppResult<Vec<follow_edge::Model>> {
        self.follow_repo.find_following(user_id).await
    }

    /// Check if a user is actively following another.
    pub async fn is_following(&self, follower_id: i32, followed_id: i32) -> AppResult<bool> {
        self.follow_repo.is_following(follower_id, followed_id).await
    }

    /// Count a user's active followers.
    pub async fn count_followers(&self, user_id: i32) -> AppResult<u64> {
        self.follow_repo.count_followers(user_id).await
    }

    /// Count the users a user actively follows.
    pub async fn count_following(&self, user_id: i32) -> AppResult<u64> {
        self.follow_repo.count_following(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use redsocial_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_user(id: i32) -> user::Model {
        user::Model {
            id,
            email: format!("user{id}@example.com"),
            username: format!("user{id}"),
            full_name: None,
            bio: None,
            website: None,
            is_private: false,
            is_verified: false,
            created_at: Utc::now().into(),
        }
    }

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

    fn service_with(db: Arc<DatabaseConnection>) -> FollowService {
        FollowService::new(
            db.clone(),
            FollowEdgeRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_follow_yourself_returns_error() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db);
        let result = service.follow(1, 1).await;

        assert!(matches!(result, Err(AppError::SelfFollow)));
    }

    #[tokio::test]
    async fn test_follow_already_following_returns_error() {
        let edge = create_test_edge(1, 1, 2, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.follow(1, 2).await;

        assert!(matches!(result, Err(AppError::AlreadyFollowing)));
    }

    #[tokio::test]
    async fn test_follow_reactivates_inactive_edge_keeping_id() {
        let inactive = create_test_edge(7, 1, 2, false);
        let reactivated = create_test_edge(7, 1, 2, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[inactive]])
                .append_query_results([[reactivated]]) // update returning
                .into_connection(),
        );

        let service = service_with(db);
        let edge = service.follow(1, 2).await.unwrap();

        assert_eq!(edge.id, 7);
        assert!(edge.is_active);
    }

    #[tokio::test]
    async fn test_follow_missing_follower_returns_dangling_reference() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_edge::Model>::new()]) // no edge
                .append_query_results([Vec::<user::Model>::new()]) // follower missing
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.follow(1, 2).await;

        assert!(matches!(result, Err(AppError::DanglingReference(_))));
    }

    #[tokio::test]
    async fn test_follow_creates_new_edge() {
        let created = create_test_edge(1, 1, 2, true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_edge::Model>::new()]) // no edge
                .append_query_results([[create_test_user(1)]])
                .append_query_results([[create_test_user(2)]])
                .append_query_results([[created.clone()]]) // insert returning
                .into_connection(),
        );

        let service = service_with(db);
        let edge = service.follow(1, 2).await.unwrap();

        assert_eq!(edge.id_seguidor, 1);
        assert_eq!(edge.id_seguido, 2);
        assert!(edge.is_active);
    }

    #[tokio::test]
    async fn test_unfollow_without_edge_returns_not_following() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow_edge::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.unfollow(1, 2).await;

        assert!(matches!(result, Err(AppError::NotFollowing)));
    }

    #[tokio::test]
    async fn test_unfollow_inactive_edge_returns_not_following() {
        let inactive = create_test_edge(1, 1, 2, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[inactive]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.unfollow(1, 2).await;

        assert!(matches!(result, Err(AppError::NotFollowing)));
    }

    #[tokio::test]
    async fn test_unfollow_deactivates_active_edge() {
        let active = create_test_edge(1, 1, 2, true);
        let deactivated = create_test_edge(1, 1, 2, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[active]])
                .append_query_results([[deactivated]]) // update returning
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.unfollow(1, 2).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_is_following_inactive_edge_is_false() {
        let inactive = create_test_edge(1, 1, 2, false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[inactive]])
                .into_connection(),
        );

        let service = service_with(db);
        assert!(!service.is_following(1, 2).await.unwrap());
    }
}
