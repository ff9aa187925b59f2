use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::infra::db::{PostgresRepositories, map_sqlx_error};

use super::types::PostRow;

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            slug,
            title,
            markdown,
        } = params;

        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (slug, title, markdown, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING slug, title, markdown, created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(title)
        .bind(markdown)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            current_slug,
            slug,
            title,
            markdown,
        } = params;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET slug = $2,
                title = $3,
                markdown = $4,
                updated_at = $5
            WHERE slug = $1
            RETURNING slug, title, markdown, created_at, updated_at
            "#,
        )
        .bind(current_slug)
        .bind(slug)
        .bind(title)
        .bind(markdown)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_post(&self, slug: &str) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM posts WHERE slug = $1")
            .bind(slug)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
