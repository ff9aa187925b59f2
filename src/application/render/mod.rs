//! Markdown rendering for post bodies.
//!
//! The pipeline is pure: it accepts markdown input, produces deterministic,
//! sanitised HTML, and surfaces structured errors. Callers decide what to do
//! with the output; nothing here touches storage.

mod service;
mod types;

pub use service::{ComrakRenderService, render_service};
pub use types::{RenderError, RenderOutput, RenderRequest, RenderService};
