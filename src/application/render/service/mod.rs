mod config;

use std::sync::Arc;

use comrak::{Arena, format_html, nodes::AstNode, parse_document};
use once_cell::sync::Lazy;

use crate::application::render::types::{
    RenderError, RenderOutput, RenderRequest, RenderService,
};

use config::{build_post_sanitizer, default_options};

/// Default Comrak-based rendering pipeline with Ammonia sanitisation.
pub struct ComrakRenderService {
    options: comrak::Options<'static>,
    sanitizer: ammonia::Builder<'static>,
}

impl ComrakRenderService {
    /// Construct a renderer with the GFM extensions enabled.
    pub fn new() -> Self {
        Self {
            options: default_options(),
            sanitizer: build_post_sanitizer(),
        }
    }
}

static RENDER_SERVICE: Lazy<Arc<ComrakRenderService>> =
    Lazy::new(|| Arc::new(ComrakRenderService::new()));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<ComrakRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl Default for ComrakRenderService {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderService for ComrakRenderService {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        let arena = Arena::new();
        let root = parse_document(&arena, &request.markdown, &self.options);

        let rendered_html = render_html_stage(root, &self.options, &request.slug)?;
        let html = self.sanitizer.clean(&rendered_html).to_string();

        Ok(RenderOutput { html })
    }
}

fn render_html_stage<'a>(
    root: &'a AstNode<'a>,
    options: &comrak::Options<'static>,
    slug: &str,
) -> Result<String, RenderError> {
    let mut html = String::new();
    format_html(root, options, &mut html).map_err(|err| RenderError::Markdown {
        slug: slug.to_string(),
        message: err.to_string(),
    })?;
    Ok(html)
}
