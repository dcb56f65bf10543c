//! Entity repositories.
//!
//! Repositories expose CRUD and foreign-key finders over the entities.
//! Pure read entry points run on the repository's shared connection;
//! every method that participates in a mutating sequence takes a
//! caller-supplied connection so the service layer can scope it to a
//! single transaction.

pub mod comment;
pub mod follow_edge;
pub mod media;
pub mod post;
pub mod user;

pub use comment::CommentRepository;
pub use follow_edge::FollowEdgeRepository;
pub use media::MediaRepository;
pub use post::PostRepository;
pub use user::UserRepository;
