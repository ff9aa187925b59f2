use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::{
    application::{
        error::{ErrorReport, PageError},
        posts::{PostLookup, PostService},
        repos::HealthCheck,
    },
    domain::entities::PostSummary,
    presentation::views::{
        IndexTemplate, LayoutContext, PageMetaView, PostDetailView, PostListView, PostTemplate,
        render_missing_page_response, render_template_response,
    },
};

use super::{auth::OptionalAdmin, boundary::PageResponder, format::ResponseFormat};

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub health: Arc<dyn HealthCheck>,
}

#[derive(Serialize)]
struct PostListPayload {
    posts: Vec<PostSummary>,
    is_admin: bool,
}

pub(crate) async fn root() -> Redirect {
    Redirect::to("/posts")
}

pub(crate) async fn index(
    State(state): State<HttpState>,
    OptionalAdmin(admin): OptionalAdmin,
    format: ResponseFormat,
) -> Response {
    let posts = match state.posts.get_post_listings().await {
        Ok(posts) => posts,
        Err(err) => {
            return PageResponder::new("infra::http::public::index", format)
                .respond(PageError::from(err));
        }
    };

    match format {
        ResponseFormat::Json => Json(PostListPayload {
            posts,
            is_admin: admin.is_some(),
        })
        .into_response(),
        ResponseFormat::Html => {
            let view = LayoutContext::new(
                PageMetaView::titled("Posts"),
                PostListView {
                    posts,
                    show_admin_link: admin.is_some(),
                },
            );
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
    }
}

pub(crate) async fn post_detail(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
    format: ResponseFormat,
) -> Response {
    let responder = PageResponder::new("infra::http::public::post_detail", format);

    let post = match state.posts.render_post(&slug).await {
        Ok(PostLookup::Found(post)) => post,
        Ok(PostLookup::NotFound) => return responder.respond(PageError::not_found(slug)),
        Err(err) => return responder.respond(PageError::from(err)),
    };

    match format {
        ResponseFormat::Json => Json(post).into_response(),
        ResponseFormat::Html => {
            let view = LayoutContext::new(
                PageMetaView::titled(post.title.clone()),
                PostDetailView {
                    slug: post.slug,
                    title: post.title,
                    html: post.html,
                },
            );
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
    }
}

pub(crate) async fn db_health(State(state): State<HttpState>) -> Response {
    match state.health.health_check().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

pub(crate) async fn fallback(uri: Uri) -> Response {
    render_missing_page_response(uri.path())
}
