//! Public post lookups.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::application::render::{RenderError, RenderRequest, RenderService};
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::{PostRecord, PostSummary};

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result of a lookup by slug. Absence is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostLookup<T = PostRecord> {
    Found(T),
    NotFound,
}

impl<T> PostLookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for PostLookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Found(value),
            None => Self::NotFound,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPost {
    pub slug: String,
    pub title: String,
    pub html: String,
}

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    renderer: Arc<dyn RenderService>,
}

impl PostService {
    pub fn new(reader: Arc<dyn PostsRepo>, renderer: Arc<dyn RenderService>) -> Self {
        Self { reader, renderer }
    }

    pub async fn get_post(&self, slug: &str) -> Result<PostLookup, PostServiceError> {
        Ok(self.reader.find_by_slug(slug).await?.into())
    }

    /// Summaries of every stored post, ordered by slug.
    pub async fn get_post_listings(&self) -> Result<Vec<PostSummary>, PostServiceError> {
        Ok(self.reader.list_summaries().await?)
    }

    pub async fn render_post(
        &self,
        slug: &str,
    ) -> Result<PostLookup<RenderedPost>, PostServiceError> {
        let Some(post) = self.get_post(slug).await?.found() else {
            return Ok(PostLookup::NotFound);
        };

        let output = self
            .renderer
            .render(&RenderRequest::new(&post.slug, &post.markdown))?;

        Ok(PostLookup::Found(RenderedPost {
            slug: post.slug,
            title: post.title,
            html: output.html,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render::render_service;
    use crate::application::repos::{CreatePostParams, PostsWriteRepo};
    use crate::infra::memory::InMemoryPosts;

    async fn service_with(posts: &[(&str, &str, &str)]) -> PostService {
        let store = Arc::new(InMemoryPosts::new());
        for (slug, title, markdown) in posts {
            store
                .create_post(CreatePostParams {
                    slug: slug.to_string(),
                    title: title.to_string(),
                    markdown: markdown.to_string(),
                })
                .await
                .expect("seed post");
        }
        PostService::new(store, render_service())
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let service = service_with(&[]).await;
        assert_eq!(
            service.get_post("nonexistent-slug").await.expect("lookup"),
            PostLookup::NotFound
        );
        assert_eq!(
            service
                .render_post("nonexistent-slug")
                .await
                .expect("lookup"),
            PostLookup::NotFound
        );
    }

    #[tokio::test]
    async fn listings_are_ordered_by_slug() {
        let service =
            service_with(&[("zeta", "Z", "z"), ("alpha", "A", "a"), ("mid", "M", "m")]).await;
        let slugs: Vec<_> = service
            .get_post_listings()
            .await
            .expect("listings")
            .into_iter()
            .map(|summary| summary.slug)
            .collect();
        assert_eq!(slugs, ["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn render_post_produces_html() {
        let service = service_with(&[("hello", "Hello", "# Hi")]).await;
        let rendered = service
            .render_post("hello")
            .await
            .expect("render")
            .found()
            .expect("found");
        assert_eq!(rendered.title, "Hello");
        assert!(rendered.html.contains("<h1>Hi</h1>"), "{}", rendered.html);
    }
}
