use time::OffsetDateTime;

use crate::domain::entities::{PostRecord, PostSummary};

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) markdown: String,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            slug: row.slug,
            title: row.title,
            markdown: row.markdown,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostSummaryRow {
    pub(crate) slug: String,
    pub(crate) title: String,
}

impl From<PostSummaryRow> for PostSummary {
    fn from(row: PostSummaryRow) -> Self {
        Self {
            slug: row.slug,
            title: row.title,
        }
    }
}
