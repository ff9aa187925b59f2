use crate::application::error::{ErrorReport, HttpError};
use crate::domain::entities::PostSummary;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Render the not-found page for a slug and tag the response for request logging.
pub fn render_not_found_response(slug: &str) -> Response {
    let view = LayoutContext::new(PageMetaView::titled("Not found"), ErrorPageView::not_found(slug));
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        format!("post `{slug}` does not exist"),
    )
    .attach(&mut response);
    response
}

pub fn render_missing_page_response(path: &str) -> Response {
    let view = LayoutContext::new(PageMetaView::titled("Not found"), ErrorPageView::missing_page());
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_missing_page_response",
        StatusCode::NOT_FOUND,
        format!("no route for `{path}`"),
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
}

impl PageMetaView {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(meta: PageMetaView, content: T) -> Self {
        Self { meta, content }
    }
}

pub struct PostListView {
    pub posts: Vec<PostSummary>,
    pub show_admin_link: bool,
}

impl PostListView {
    pub fn has_posts(&self) -> bool {
        !self.posts.is_empty()
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<PostListView>,
}

pub struct PostDetailView {
    pub slug: String,
    pub title: String,
    pub html: String,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub detail: Option<String>,
    pub primary_action: ErrorAction,
}

impl ErrorPageView {
    pub fn not_found(slug: &str) -> Self {
        Self {
            title: "Post Not Found".to_string(),
            message: not_found_message(slug),
            detail: None,
            primary_action: ErrorAction::posts(),
        }
    }

    pub fn missing_page() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist.".to_string(),
            detail: None,
            primary_action: ErrorAction::posts(),
        }
    }

    pub fn fatal(detail: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: FATAL_MESSAGE.to_string(),
            detail: Some(detail.into()),
            primary_action: ErrorAction::posts(),
        }
    }
}

pub const FATAL_MESSAGE: &str = "Oh no, something went wrong!";

pub fn not_found_message(slug: &str) -> String {
    format!("Uh oh! This post with the slug \"{slug}\" does not exist!")
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn posts() -> Self {
        Self {
            href: "/posts".to_string(),
            label: "Back to posts".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

pub struct LoginView {
    pub email: String,
    pub redirect_to: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub view: LayoutContext<LoginView>,
}
