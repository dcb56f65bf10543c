//! User service.

use std::collections::HashSet;
use std::sync::Arc;

use crate::services::db_err;
use redsocial_common::{AppError, AppResult};
use redsocial_db::{
    entities::user,
    repositories::{
        CommentRepository, FollowEdgeRepository, MediaRepository, PostRepository, UserRepository,
    },
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

/// User service for business logic.
///
/// Owns user lifecycle gatekeeping: uniqueness of email/username and the
/// full deletion cascade over everything a user owns.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    user_repo: UserRepository,
    post_repo: PostRepository,
    media_repo: MediaRepository,
    comment_repo: CommentRepository,
    follow_repo: FollowEdgeRepository,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email, length(max = 120))]
    pub email: String,

    #[validate(length(min = 1, max = 80))]
    pub username: String,

    #[validate(length(max = 150))]
    pub full_name: Option<String>,

    pub bio: Option<String>,

    #[validate(length(max = 255))]
    pub website: Option<String>,

    #[serde(default)]
    pub is_private: bool,
}

/// Input for updating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(email, length(max = 120))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 80))]
    pub username: Option<String>,

    #[validate(length(max = 150))]
    pub full_name: Option<String>,

    pub bio: Option<String>,

    #[validate(length(max = 255))]
    pub website: Option<String>,

    pub is_private: Option<bool>,
    pub is_verified: Option<bool>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        user_repo: UserRepository,
        post_repo: PostRepository,
        media_repo: MediaRepository,
        comment_repo: CommentRepository,
        follow_repo: FollowEdgeRepository,
    ) -> Self {
        Self {
            db,
            user_repo,
            post_repo,
            media_repo,
            comment_repo,
            follow_repo,
        }
    }

    /// Create a new user.
    ///
    /// Fails with `DuplicateKey` naming the violated field when the
    /// email or username is already taken.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(db_err)?;

        if self
            .user_repo
            .find_by_email_in(&txn, &input.email)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateKey("email".to_string()));
        }

        if self
            .user_repo
            .find_by_username_in(&txn, &input.username)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateKey("username".to_string()));
        }

        let model = user::ActiveModel {
            email: Set(input.email),
            username: Set(input.username),
            full_name: Set(input.full_name),
            bio: Set(input.bio),
            website: Set(input.website),
            is_private: Set(input.is_private),
            is_verified: Set(false),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let user = self.user_repo.create(&txn, model).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::debug!(user_id = user.id, username = %user.username, "Created user");
        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: i32) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {username}")))
    }

    /// Get a user by email.
    pub async fn get_by_email(&self, email: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {email}")))
    }

    /// Update a user.
    ///
    /// Email and username changes re-check uniqueness against other
    /// users.
    pub async fn update(&self, id: i32, input: UpdateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let user = self
            .user_repo
            .find_by_id_in(&txn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

        if let Some(ref email) = input.email
            && let Some(existing) = self.user_repo.find_by_email_in(&txn, email).await?
            && existing.id != id
        {
            return Err(AppError::DuplicateKey("email".to_string()));
        }

        if let Some(ref username) = input.username
            && let Some(existing) = self.user_repo.find_by_username_in(&txn, username).await?
            && existing.id != id
        {
            return Err(AppError::DuplicateKey("username".to_string()));
        }

        let mut active: user::ActiveModel = user.into();

        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(username) = input.username {
            active.username = Set(username);
        }
        if let Some(full_name) = input.full_name {
            active.full_name = Set(Some(full_name));
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(website) = input.website {
            active.website = Set(Some(website));
        }
        if let Some(is_private) = input.is_private {
            active.is_private = Set(is_private);
        }
        if let Some(is_verified) = input.is_verified {
            active.is_verified = Set(is_verified);
        }

        let updated = self.user_repo.update(&txn, active).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(updated)
    }

    /// Delete a user and everything they own, atomically.
    ///
    /// Cascade order: the user's posts (with their media and comments),
    /// then the user's surviving comments on other posts (each taking
    /// its reply subtree and adjusting that post's counter), then media
    /// detachment, then both directions of the follow graph, then the
    /// user row.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let user = self
            .user_repo
            .find_by_id_in(&txn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

        // Posts first. Their media and comments go with them, which is
        // what gives the post cascade precedence over media detachment
        // when the user owns both the media and the post it sits on.
        let posts = self.post_repo.find_by_user_in(&txn, id).await?;
        let post_ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
        self.media_repo.delete_by_posts(&txn, &post_ids).await?;
        self.comment_repo.delete_by_posts(&txn, &post_ids).await?;
        self.post_repo.delete_by_user(&txn, id).await?;

        // The user's remaining comments live on other users' posts.
        // Each root takes its reply subtree with it; the owning post's
        // counter drops by the number of rows actually removed.
        let mut removed: HashSet<i32> = HashSet::new();
        let comments = self.comment_repo.find_by_author_in(&txn, id).await?;
        for comment in comments {
            if removed.contains(&comment.id) {
                continue;
            }
            let subtree = self
                .comment_repo
                .collect_subtree_ids(&txn, comment.id)
                .await?;
            let deleted = self.comment_repo.delete_by_ids(&txn, &subtree).await?;
            self.post_repo
                .decrement_comment_count(&txn, comment.id_pub, deleted)
                .await?;
            removed.extend(subtree);
        }

        // Media the post cascade did not claim is detached, not deleted.
        let detached = self.media_repo.detach_owner(&txn, id).await?;

        // Both directions of the follow graph, including inactive history.
        self.follow_repo.delete_by_user(&txn, id).await?;

        self.user_repo.delete_by_id(&txn, id).await?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            user_id = id,
            username = %user.username,
            posts = post_ids.len(),
            media_detached = detached,
            "Deleted user and owned subtree"
        );
        Ok(())
    }
}
