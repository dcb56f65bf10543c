//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use redsocial_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, SqlErr,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<user::Model>> {
        self.find_by_id_in(self.db.as_ref(), id).await
    }

    /// Find a user by ID on a caller-supplied connection.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: i32,
    ) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))
    }

    /// Check whether a user exists.
    pub async fn exists<C: ConnectionTrait>(&self, conn: &C, id: i32) -> AppResult<bool> {
        Ok(self.find_by_id_in(conn, id).await?.is_some())
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        self.find_by_email_in(self.db.as_ref(), email).await
    }

    /// Find a user by email on a caller-supplied connection.
    pub async fn find_by_email_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        email: &str,
    ) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        self.find_by_username_in(self.db.as_ref(), username).await
    }

    /// Find a user by username on a caller-supplied connection.
    pub async fn find_by_username_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        username: &str,
    ) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: user::ActiveModel,
    ) -> AppResult<user::Model> {
        model.insert(conn).await.map_err(map_unique_violation)
    }

    /// Update a user.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: user::ActiveModel,
    ) -> AppResult<user::Model> {
        model.update(conn).await.map_err(map_unique_violation)
    }

    /// Delete a user row. Returns the number of deleted rows.
    pub async fn delete_by_id<C: ConnectionTrait>(&self, conn: &C, id: i32) -> AppResult<u64> {
        User::delete_by_id(id)
            .exec(conn)
            .await
            .map(|r| r.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Translate a unique-index violation into `DuplicateKey` naming the
/// violated field, so concurrent creations resolve deterministically.
fn map_unique_violation(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            if msg.contains("email") {
                AppError::DuplicateKey("email".to_string())
            } else if msg.contains("username") {
                AppError::DuplicateKey("username".to_string())
            } else {
                AppError::DuplicateKey(msg)
            }
        }
        _ => AppError::Database(e.to_string()),
    }
}
