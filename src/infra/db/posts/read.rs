use async_trait::async_trait;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::{PostRecord, PostSummary};
use crate::infra::db::{PostgresRepositories, map_sqlx_error};

use super::types::{PostRow, PostSummaryRow};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT slug, title, markdown, created_at, updated_at
            FROM posts
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
        let rows = sqlx::query_as::<_, PostSummaryRow>(
            r#"
            SELECT slug, title
            FROM posts
            ORDER BY slug
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostSummary::from).collect())
    }
}
