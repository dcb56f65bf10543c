//! Post service.

use std::sync::Arc;

use crate::services::db_err;
use redsocial_common::{AppError, AppResult};
use redsocial_db::{
    entities::media,
    entities::post::{self, Privacy},
    repositories::{CommentRepository, MediaRepository, PostRepository, UserRepository},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    db: Arc<DatabaseConnection>,
    post_repo: PostRepository,
    user_repo: UserRepository,
    media_repo: MediaRepository,
    comment_repo: CommentRepository,
}

/// Input for creating a new post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    pub id_usuario: i32,

    pub texto: Option<String>,

    /// Wire form of the privacy level; defaults to public.
    pub privacy: Option<String>,

    #[validate(length(max = 255))]
    pub location: Option<String>,
}

/// Input for updating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostInput {
    /// New text (None = no change, Some(None) = remove, Some(Some(t)) = set).
    pub texto: Option<Option<String>>,

    /// New privacy wire value.
    pub privacy: Option<String>,

    /// New location (None = no change, Some(None) = remove).
    pub location: Option<Option<String>>,

    /// Soft-delete flag.
    pub is_deleted: Option<bool>,
}

/// A post with its attached media, the canonical transport projection.
#[derive(Debug, Serialize)]
pub struct PostWithMedia {
    #[serde(flatten)]
    pub post: post::Model,
    pub medios: Vec<media::Model>,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        post_repo: PostRepository,
        user_repo: UserRepository,
        media_repo: MediaRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            db,
            post_repo,
            user_repo,
            media_repo,
            comment_repo,
        }
    }

    /// Parse a privacy wire value, rejecting anything outside the
    /// three documented levels.
    fn parse_privacy(value: Option<&str>) -> AppResult<Privacy> {
        match value {
            None => Ok(Privacy::Public),
            Some(v) => {
                Privacy::parse(v).ok_or_else(|| AppError::InvalidEnumValue(v.to_string()))
            }
        }
    }

    /// Create a new post.
    pub async fn create(&self, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let privacy = Self::parse_privacy(input.privacy.as_deref())?;

        let txn = self.db.begin().await.map_err(db_err)?;

        if !self.user_repo.exists(&txn, input.id_usuario).await? {
            return Err(AppError::DanglingReference(format!(
                "user {}",
                input.id_usuario
            )));
        }

        let model = post::ActiveModel {
            id_usuario: Set(input.id_usuario),
            texto: Set(input.texto),
            created_at: Set(chrono::Utc::now().into()),
            privacy: Set(privacy),
            location: Set(input.location),
            like_count: Set(0),
            comment_count: Set(0),
            is_deleted: Set(false),
            ..Default::default()
        };

        let post = self.post_repo.create(&txn, model).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::debug!(post_id = post.id, user_id = post.id_usuario, "Created post");
        Ok(post)
    }

    /// Get a post by ID.
    pub async fn get(&self, id: i32) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    /// Get a post with its attached media projections.
    pub async fn get_with_media(&self, id: i32) -> AppResult<PostWithMedia> {
        let post = self.post_repo.get_by_id(id).await?;
        let medios = self.media_repo.find_by_post(id).await?;
        Ok(PostWithMedia { post, medios })
    }

    /// Get posts by user, newest first.
    pub async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<post::Model>> {
        self.post_repo.find_by_user(user_id).await
    }

    /// Update a post.
    pub async fn update(&self, id: i32, input: UpdatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let privacy = input
            .privacy
            .as_deref()
            .map(|v| Privacy::parse(v).ok_or_else(|| AppError::InvalidEnumValue(v.to_string())))
            .transpose()?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let post = self
            .post_repo
            .find_by_id_in(&txn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

        let mut active: post::ActiveModel = post.into();

        if let Some(texto) = input.texto {
            active.texto = Set(texto);
        }
        if let Some(privacy) = privacy {
            active.privacy = Set(privacy);
        }
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(is_deleted) = input.is_deleted {
            active.is_deleted = Set(is_deleted);
        }

        let updated = self.post_repo.update(&txn, active).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(updated)
    }

    /// Delete a post and everything it owns (media and comments),
    /// atomically.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let post = self
            .post_repo
            .find_by_id_in(&txn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

        self.media_repo.delete_by_post(&txn, id).await?;
        // A flat delete covers the whole comment tree: every reply
        // belongs to the same post as its parent.
        let comments_removed = self.comment_repo.delete_by_post(&txn, id).await?;
        self.post_repo.delete_by_id(&txn, id).await?;

        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            post_id = id,
            user_id = post.id_usuario,
            comments_removed,
            "Deleted post and owned subtree"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use redsocial_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

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

    fn create_test_post(id: i32, user_id: i32) -> post::Model {
        post::Model {
            id,
            id_usuario: user_id,
            texto: Some("hola".to_string()),
            created_at: Utc::now().into(),
            privacy: Privacy::Public,
            location: None,
            like_count: 0,
            comment_count: 0,
            is_deleted: false,
        }
    }

    fn service_with(db: Arc<DatabaseConnection>) -> PostService {
        PostService::new(
            db.clone(),
            PostRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            MediaRepository::new(db.clone()),
            CommentRepository::new(db),
        )
    }

    fn valid_input(user_id: i32, privacy: Option<&str>) -> CreatePostInput {
        CreatePostInput {
            id_usuario: user_id,
            texto: Some("hola".to_string()),
            privacy: privacy.map(std::string::ToString::to_string),
            location: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_privacy_value() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db);
        let result = service.create(valid_input(1, Some("secret"))).await;

        match result {
            Err(AppError::InvalidEnumValue(value)) => assert_eq!(value, "secret"),
            other => panic!("Expected InvalidEnumValue, got {other:?}"),
        }
    }

    #[test]
    fn test_privacy_parse_accepts_exactly_three_values() {
        assert_eq!(Privacy::parse("public"), Some(Privacy::Public));
        assert_eq!(Privacy::parse("followers"), Some(Privacy::Followers));
        assert_eq!(Privacy::parse("private"), Some(Privacy::Private));
        assert_eq!(Privacy::parse("PUBLIC"), None);
        assert_eq!(Privacy::parse(""), None);
        for privacy in [Privacy::Public, Privacy::Followers, Privacy::Private] {
            assert_eq!(Privacy::parse(privacy.as_str()), Some(privacy));
        }
    }

    #[tokio::test]
    async fn test_create_missing_author_returns_dangling_reference() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.create(valid_input(42, None)).await;

        assert!(matches!(result, Err(AppError::DanglingReference(_))));
    }

    #[tokio::test]
    async fn test_create_defaults_to_public_privacy() {
        let author = create_test_user(1);
        let created = create_test_post(7, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author]])
                .append_query_results([[created.clone()]])
                .into_connection(),
        );

        let service = service_with(db);
        let post = service.create(valid_input(1, None)).await.unwrap();

        assert_eq!(post.privacy, Privacy::Public);
        assert_eq!(post.comment_count, 0);
        assert_eq!(post.like_count, 0);
    }

    #[tokio::test]
    async fn test_delete_nonexistent_post_returns_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.delete(404).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_media_and_comments() {
        let post = create_test_post(7, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2, // media
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 3, // comments
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1, // post row
                    },
                ])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.delete(7).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_get_with_media_serializes_with_medios_key() {
        let post = create_test_post(7, 1);
        let media_row = redsocial_db::entities::media::Model {
            id: 3,
            id_usuario: Some(1),
            id_pub: Some(7),
            url: "https://cdn.example.com/m/3.jpg".to_string(),
            media_type: "image".to_string(),
            width: Some(800),
            height: Some(600),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_query_results([[media_row]])
                .into_connection(),
        );

        let service = service_with(db);
        let projection = service.get_with_media(7).await.unwrap();

        let json = serde_json::to_value(&projection).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["id_usuario"], 1);
        assert_eq!(json["privacy"], "public");
        assert_eq!(json["medios"][0]["id_pub"], 7);
        // Internal soft-delete flag stays out of the canonical projection.
        assert!(json.get("is_deleted").is_none());
    }
}
