//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{CommentRecord, LegacyPostRecord, PostRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Insert parameters for a freshly published post. `created_at` is the
/// instant the slug was derived from, so both always agree.
#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub show_in_feed: bool,
    pub show_header: bool,
    pub comments_enabled: bool,
    pub created_at: OffsetDateTime,
}

/// Insert parameters for the migration path: slug and creation time are
/// preserved from the legacy record instead of derived.
#[derive(Debug, Clone)]
pub struct ImportPostParams {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub show_in_feed: bool,
    pub pinned: bool,
    pub banned: bool,
    pub show_header: bool,
    pub comments_enabled: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub post_id: Uuid,
    pub author_name: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct CreateAbuseReportParams {
    pub post_id: Uuid,
    pub reporter_name: String,
    pub details: String,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Insert a new post. A unique-index violation surfaces as
    /// [`RepoError::Duplicate`] with the violated constraint's name.
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn import_post(&self, params: ImportPostParams) -> Result<PostRecord, RepoError>;
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    async fn create_comment(&self, params: CreateCommentParams) -> Result<CommentRecord, RepoError>;

    /// Comments for a post, oldest first.
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError>;
}

#[async_trait]
pub trait ReportsRepo: Send + Sync {
    async fn create_report(&self, params: CreateAbuseReportParams) -> Result<(), RepoError>;
}

/// The superseded local store: a serialized post list plus a boolean-ish
/// slot recording whether migration to the backing database has run.
#[async_trait]
pub trait LegacyStore: Send + Sync {
    async fn load_posts(&self) -> Result<Vec<LegacyPostRecord>, RepoError>;

    async fn has_migrated(&self) -> Result<bool, RepoError>;

    async fn set_migrated(&self) -> Result<(), RepoError>;
}
