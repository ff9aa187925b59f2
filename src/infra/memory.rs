//! In-process post store used when no database is configured, and by tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::application::repos::{
    CreatePostParams, HealthCheck, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::{PostRecord, PostSummary};

const PRIMARY_KEY: &str = "posts_pkey";

#[derive(Default)]
pub struct InMemoryPosts {
    posts: RwLock<BTreeMap<String, PostRecord>>,
}

impl InMemoryPosts {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }
}

#[async_trait]
impl PostsRepo for InMemoryPosts {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.posts.read().await.get(slug).cloned())
    }

    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
        Ok(self
            .posts
            .read()
            .await
            .values()
            .map(PostRecord::summary)
            .collect())
    }
}

#[async_trait]
impl PostsWriteRepo for InMemoryPosts {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&params.slug) {
            return Err(RepoError::Duplicate {
                constraint: PRIMARY_KEY.to_string(),
            });
        }

        let now = OffsetDateTime::now_utc();
        let post = PostRecord {
            slug: params.slug,
            title: params.title,
            markdown: params.markdown,
            created_at: now,
            updated_at: now,
        };
        posts.insert(post.slug.clone(), post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.write().await;
        if params.slug != params.current_slug && posts.contains_key(&params.slug) {
            return Err(RepoError::Duplicate {
                constraint: PRIMARY_KEY.to_string(),
            });
        }

        let existing = posts
            .remove(&params.current_slug)
            .ok_or(RepoError::NotFound)?;
        let post = PostRecord {
            slug: params.slug,
            title: params.title,
            markdown: params.markdown,
            created_at: existing.created_at,
            updated_at: OffsetDateTime::now_utc(),
        };
        posts.insert(post.slug.clone(), post.clone());
        Ok(post)
    }

    async fn delete_post(&self, slug: &str) -> Result<(), RepoError> {
        self.posts.write().await.remove(slug);
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for InMemoryPosts {
    async fn health_check(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
