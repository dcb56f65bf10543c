//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod counter;
pub mod follow;
pub mod media;
pub mod post;
pub mod user;

pub use comment::{CommentService, CreateCommentInput, UpdateCommentInput};
pub use counter::CounterService;
pub use follow::FollowService;
pub use media::{CreateMediaInput, MediaService, UpdateMediaInput};
pub use post::{CreatePostInput, PostService, PostWithMedia, UpdatePostInput};
pub use user::{CreateUserInput, UpdateUserInput, UserService};

use redsocial_common::AppError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> AppError {
    AppError::Database(e.to_string())
}
