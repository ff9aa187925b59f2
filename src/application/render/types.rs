use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rendering request passed into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Slug of the post being rendered, used for diagnostics.
    pub slug: String,
    /// Source markdown captured from the editor.
    pub markdown: String,
}

impl RenderRequest {
    pub fn new(slug: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            markdown: markdown.into(),
        }
    }
}

/// Deterministic rendering result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutput {
    /// Sanitised HTML safe to embed in a page.
    pub html: String,
}

/// Structured errors surfaced by the rendering pipeline.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("markdown rendering failed for `{slug}`: {message}")]
    Markdown { slug: String, message: String },
}

/// Trait exposed by the rendering pipeline. Implementations must be pure and
/// deterministic: given the same input, they return identical outputs or errors.
pub trait RenderService: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError>;
}
