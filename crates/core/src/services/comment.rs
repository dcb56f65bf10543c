//! Comment service.
//!
//! Maintains the per-post reply tree: same-post parent validation on
//! creation, worklist subtree deletion, and the post's comment counter,
//! all inside one transaction per operation.

use std::sync::Arc;

use crate::services::db_err;
use redsocial_common::{AppError, AppResult};
use redsocial_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository, UserRepository},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    db: Arc<DatabaseConnection>,
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
}

/// Input for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    pub id_pub: i32,

    pub id_usuario: i32,

    #[validate(length(min = 1))]
    pub texto: String,

    /// Parent comment for a threaded reply. Must belong to `id_pub`.
    pub parent_comment_id: Option<i32>,
}

/// Input for updating a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentInput {
    #[validate(length(min = 1))]
    pub texto: String,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            db,
            comment_repo,
            post_repo,
            user_repo,
        }
    }

    /// Create a new comment, adjusting the post's comment counter in
    /// the same transaction.
    pub async fn create(&self, input: CreateCommentInput) -> AppResult<comment::Model> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(db_err)?;

        if !self.post_repo.exists(&txn, input.id_pub).await? {
            return Err(AppError::DanglingReference(format!("post {}", input.id_pub)));
        }

        if !self.user_repo.exists(&txn, input.id_usuario).await? {
            return Err(AppError::DanglingReference(format!(
                "user {}",
                input.id_usuario
            )));
        }

        if let Some(parent_id) = input.parent_comment_id {
            let parent = self
                .comment_repo
                .find_by_id_in(&txn, parent_id)
                .await?
                .ok_or_else(|| {
                    AppError::DanglingReference(format!("parent comment {parent_id}"))
                })?;

            if parent.id_pub != input.id_pub {
                return Err(AppError::DanglingReference(format!(
                    "parent comment {parent_id} belongs to post {}, not post {}",
                    parent.id_pub, input.id_pub
                )));
            }
        }

        let model = comment::ActiveModel {
            id_pub: Set(input.id_pub),
            id_usuario: Set(input.id_usuario),
            texto: Set(input.texto),
            created_at: Set(chrono::Utc::now().into()),
            parent_comment_id: Set(input.parent_comment_id),
            ..Default::default()
        };

        let comment = self.comment_repo.create(&txn, model).await?;
        self.post_repo
            .increment_comment_count(&txn, input.id_pub)
            .await?;

        txn.commit().await.map_err(db_err)?;

        tracing::debug!(
            comment_id = comment.id,
            post_id = comment.id_pub,
            parent_id = ?comment.parent_comment_id,
            "Created comment"
        );
        Ok(comment)
    }

    /// Get a comment by ID.
    pub async fn get(&self, id: i32) -> AppResult<comment::Model> {
        self.comment_repo.get_by_id(id).await
    }

    /// Get comments on a post, oldest first.
    pub async fn list_by_post(&self, post_id: i32) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_by_post(post_id).await
    }

    /// Get direct replies to a comment, oldest first.
    pub async fn list_replies(&self, parent_id: i32) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_replies(parent_id).await
    }

    /// Update a comment's text.
    pub async fn update(&self, id: i32, input: UpdateCommentInput) -> AppResult<comment::Model> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let comment = self
            .comment_repo
            .find_by_id_in(&txn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {id}")))?;

        let mut active: comment::ActiveModel = comment.into();
        active.texto = Set(input.texto);

        let updated = self.comment_repo.update(&txn, active).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(updated)
    }

    /// Delete a comment and its entire reply subtree, decrementing the
    /// post's counter by the number of rows removed. Returns that
    /// number.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let comment = self
            .comment_repo
            .find_by_id_in(&txn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {id}")))?;

        let subtree = self.comment_repo.collect_subtree_ids(&txn, id).await?;
        let removed = self.comment_repo.delete_by_ids(&txn, &subtree).await?;
        self.post_repo
            .decrement_comment_count(&txn, comment.id_pub, removed)
            .await?;

        txn.commit().await.map_err(db_err)?;

        tracing::debug!(
            comment_id = id,
            post_id = comment.id_pub,
            removed,
            "Deleted comment subtree"
        );
        Ok(removed)
    }
}
