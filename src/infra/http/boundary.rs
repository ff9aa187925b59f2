//! Maps [`PageError`] onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use url::form_urlencoded;

use crate::{
    application::error::{ErrorReport, PageError},
    domain::{entities::PostSummary, posts::PostFormFields},
    presentation::{
        admin::views::{
            AdminLayout, AdminNavigationView, AdminPostEditorTemplate, AdminPostEditorView,
        },
        views::{
            ErrorPageView, ErrorTemplate, FATAL_MESSAGE, LayoutContext, PageMetaView,
            not_found_message, render_not_found_response, render_template_response,
        },
    },
};

use super::format::ResponseFormat;

pub const LOGIN_PATH: &str = "/login";

/// Renders page errors in the negotiated format. Admin pages supply their
/// post navigation so a rejected form re-renders inside the admin layout.
pub struct PageResponder<'a> {
    source: &'static str,
    format: ResponseFormat,
    navigation: &'a [PostSummary],
}

impl<'a> PageResponder<'a> {
    pub fn new(source: &'static str, format: ResponseFormat) -> Self {
        Self {
            source,
            format,
            navigation: &[],
        }
    }

    pub fn with_navigation<'b>(self, posts: &'b [PostSummary]) -> PageResponder<'b> {
        PageResponder {
            source: self.source,
            format: self.format,
            navigation: posts,
        }
    }

    pub fn respond(self, error: PageError) -> Response {
        let status = error.status();
        let report = ErrorReport::from_error(self.source, status, &error);

        let mut response = match (error, self.format) {
            (PageError::Unauthorized { redirect_to }, ResponseFormat::Html) => {
                Redirect::to(&login_redirect(&redirect_to)).into_response()
            }
            (PageError::Unauthorized { .. }, ResponseFormat::Json) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "admin session required" })),
            )
                .into_response(),
            (PageError::ValidationFailure { errors, .. }, ResponseFormat::Json) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            (
                PageError::ValidationFailure {
                    slug_param,
                    fields,
                    errors,
                },
                ResponseFormat::Html,
            ) => {
                let PostFormFields {
                    title,
                    slug,
                    markdown,
                } = fields;
                let active = (!slug_param.is_new()).then(|| slug_param.as_str());
                let content = AdminPostEditorView {
                    form_action: format!("/posts/admin/{slug_param}"),
                    is_new: slug_param.is_new(),
                    title: title.unwrap_or_default(),
                    slug: slug.unwrap_or_default(),
                    markdown: markdown.unwrap_or_default(),
                    errors,
                };
                let navigation = AdminNavigationView::from_posts(self.navigation, active);
                let title = if content.is_new { "New post" } else { "Edit post" };
                render_template_response(
                    AdminPostEditorTemplate {
                        view: AdminLayout::new(title, navigation, content),
                    },
                    StatusCode::UNPROCESSABLE_ENTITY,
                )
            }
            (PageError::NotFound { slug }, ResponseFormat::Json) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": not_found_message(&slug) })),
            )
                .into_response(),
            (PageError::NotFound { slug }, ResponseFormat::Html) => render_not_found_response(&slug),
            (PageError::Fatal { detail }, ResponseFormat::Json) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": FATAL_MESSAGE, "detail": detail })),
            )
                .into_response(),
            (PageError::Fatal { detail }, ResponseFormat::Html) => render_template_response(
                ErrorTemplate {
                    view: LayoutContext::new(
                        PageMetaView::titled("Error"),
                        ErrorPageView::fatal(detail),
                    ),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        };

        report.attach(&mut response);
        response
    }
}

/// Build the login URL that returns the client to `redirect_to` afterwards.
pub fn login_redirect(redirect_to: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(redirect_to.as_bytes()).collect();
    format!("{LOGIN_PATH}?redirect_to={encoded}")
}
