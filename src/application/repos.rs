//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{PostRecord, PostSummary};

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

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub slug: String,
    pub title: String,
    pub markdown: String,
}

/// Replace the content of the post currently stored under `current_slug`.
/// `slug` may differ from `current_slug` to rename the post.
#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub current_slug: String,
    pub slug: String,
    pub title: String,
    pub markdown: String,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    /// Fails with [`RepoError::NotFound`] when no post is stored under `current_slug`.
    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    /// Removing a slug that is not stored succeeds without effect.
    async fn delete_post(&self, slug: &str) -> Result<(), RepoError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn health_check(&self) -> Result<(), RepoError>;
}
