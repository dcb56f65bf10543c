//! Media service.

use std::sync::Arc;

use crate::services::db_err;
use redsocial_common::{AppError, AppResult};
use redsocial_db::{
    entities::media,
    repositories::{MediaRepository, PostRepository, UserRepository},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

/// Media service for business logic.
#[derive(Clone)]
pub struct MediaService {
    db: Arc<DatabaseConnection>,
    media_repo: MediaRepository,
    user_repo: UserRepository,
    post_repo: PostRepository,
}

/// Input for creating a new media row.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMediaInput {
    /// Uploader, if known. Media can outlive its uploader.
    pub id_usuario: Option<i32>,

    /// Post to attach to, if any.
    pub id_pub: Option<i32>,

    #[validate(length(min = 1, max = 1024))]
    pub url: String,

    #[validate(length(min = 1, max = 20))]
    pub media_type: String,

    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Input for updating a media row.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMediaInput {
    #[validate(length(min = 1, max = 1024))]
    pub url: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub media_type: Option<String>,

    /// New width (None = no change, Some(None) = clear).
    pub width: Option<Option<i32>>,

    /// New height (None = no change, Some(None) = clear).
    pub height: Option<Option<i32>>,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        media_repo: MediaRepository,
        user_repo: UserRepository,
        post_repo: PostRepository,
    ) -> Self {
        Self {
            db,
            media_repo,
            user_repo,
            post_repo,
        }
    }

    /// Create a new media row.
    ///
    /// Both references are optional, but when present they must point
    /// at existing rows.
    pub async fn create(&self, input: CreateMediaInput) -> AppResult<media::Model> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(db_err)?;

        if let Some(user_id) = input.id_usuario
            && !self.user_repo.exists(&txn, user_id).await?
        {
            return Err(AppError::DanglingReference(format!("user {user_id}")));
        }

        if let Some(post_id) = input.id_pub
            && !self.post_repo.exists(&txn, post_id).await?
        {
            return Err(AppError::DanglingReference(format!("post {post_id}")));
        }

        let model = media::ActiveModel {
            id_usuario: Set(input.id_usuario),
            id_pub: Set(input.id_pub),
            url: Set(input.url),
            media_type: Set(input.media_type),
            width: Set(input.width),
            height: Set(input.height),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let media = self.media_repo.create(&txn, model).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::debug!(media_id = media.id, post_id = ?media.id_pub, "Created media");
        Ok(media)
    }

    /// Get a media row by ID.
    pub async fn get(&self, id: i32) -> AppResult<media::Model> {
        self.media_repo.get_by_id(id).await
    }

    /// Get media attached to a post.
    pub async fn list_by_post(&self, post_id: i32) -> AppResult<Vec<media::Model>> {
        self.media_repo.find_by_post(post_id).await
    }

    /// Get media uploaded by a user.
    pub async fn list_by_owner(&self, user_id: i32) -> AppResult<Vec<media::Model>> {
        self.media_repo.find_by_owner(user_id).await
    }

    /// Update a media row.
    pub async fn update(&self, id: i32, input: UpdateMediaInput) -> AppResult<media::Model> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let media = self
            .media_repo
            .find_by_id_in(&txn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("media {id}")))?;

        let mut active: media::ActiveModel = media.into();

        if let Some(url) = input.url {
            active.url = Set(url);
        }
        if let Some(media_type) = input.media_type {
            active.media_type = Set(media_type);
        }
        if let Some(width) = input.width {
            active.width = Set(width);
        }
        if let Some(height) = input.height {
            active.height = Set(height);
        }

        let updated = self.media_repo.update(&txn, active).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(updated)
    }

    /// Delete a media row.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = self.media_repo.delete_by_id(self.db.as_ref(), id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(format!("media {id}")));
        }
        tracing::debug!(media_id = id, "Deleted media");
        Ok(())
    }
}
