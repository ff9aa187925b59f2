use axum::{
    Json,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tracing::debug;

use crate::{
    application::{
        admin::posts::{SubmitOutcome, SubmitPostCommand},
        error::PageError,
    },
    domain::{
        entities::{PostRecord, PostSummary},
        posts::{PostIntent, SlugParam, ValidationErrors},
    },
    infra::http::{
        admin::AdminState, auth::RequireAdmin, boundary::PageResponder, format::ResponseFormat,
    },
    presentation::{
        admin::views::{
            AdminIndexTemplate, AdminIndexView, AdminLayout, AdminNavigationView,
            AdminPostEditorTemplate, AdminPostEditorView,
        },
        views::render_template_response,
    },
};

use super::forms::AdminPostForm;

#[derive(Serialize)]
struct AdminPostsPayload {
    posts: Vec<PostSummary>,
}

#[derive(Serialize)]
struct AdminEditorPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    post: Option<PostRecord>,
}

pub(crate) async fn admin_posts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AdminState>,
    format: ResponseFormat,
) -> Response {
    let posts = match state.posts.list().await {
        Ok(posts) => posts,
        Err(err) => {
            return PageResponder::new("infra::http::admin_posts", format)
                .respond(PageError::from(err));
        }
    };

    match format {
        ResponseFormat::Json => Json(AdminPostsPayload { posts }).into_response(),
        ResponseFormat::Html => {
            let navigation = AdminNavigationView::from_posts(&posts, None);
            let content = AdminIndexView {
                new_post_href: "/posts/admin/new".to_string(),
            };
            render_template_response(
                AdminIndexTemplate {
                    view: AdminLayout::new("Posts", navigation, content),
                },
                StatusCode::OK,
            )
        }
    }
}

pub(crate) async fn admin_post_edit(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AdminState>,
    Path(raw_slug): Path<String>,
    format: ResponseFormat,
) -> Response {
    let responder = PageResponder::new("infra::http::admin_post_edit", format);

    let slug_param = match SlugParam::parse(&raw_slug) {
        Ok(slug_param) => slug_param,
        Err(err) => return responder.respond(PageError::from(err)),
    };

    let post = match state.posts.load_editor(&slug_param).await {
        Ok(post) => post,
        Err(err) => return responder.respond(PageError::from(err)),
    };

    if format == ResponseFormat::Json {
        return Json(AdminEditorPayload { post }).into_response();
    }

    let posts = match state.posts.list().await {
        Ok(posts) => posts,
        Err(err) => return responder.respond(PageError::from(err)),
    };

    let navigation = AdminNavigationView::from_posts(&posts, post.as_ref().map(|p| p.slug.as_str()));
    let content = match post {
        Some(post) => AdminPostEditorView {
            form_action: format!("/posts/admin/{}", post.slug),
            is_new: false,
            title: post.title,
            slug: post.slug,
            markdown: post.markdown,
            errors: ValidationErrors::default(),
        },
        None => AdminPostEditorView {
            form_action: format!("/posts/admin/{slug_param}"),
            is_new: true,
            title: String::new(),
            slug: String::new(),
            markdown: String::new(),
            errors: ValidationErrors::default(),
        },
    };
    let title = if content.is_new { "New post" } else { "Edit post" };

    render_template_response(
        AdminPostEditorTemplate {
            view: AdminLayout::new(title, navigation, content),
        },
        StatusCode::OK,
    )
}

pub(crate) async fn admin_post_submit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AdminState>,
    Path(raw_slug): Path<String>,
    format: ResponseFormat,
    Form(form): Form<AdminPostForm>,
) -> Response {
    let responder = PageResponder::new("infra::http::admin_post_submit", format);

    let slug_param = match SlugParam::parse(&raw_slug) {
        Ok(slug_param) => slug_param,
        Err(err) => return responder.respond(PageError::from(err)),
    };

    let (intent, fields) = form.into_parts();
    let intent = match intent.as_deref() {
        None | Some("") => PostIntent::default_for(&slug_param),
        Some(raw) => match raw.parse::<PostIntent>() {
            Ok(intent) => intent,
            Err(err) => return responder.respond(PageError::from(err)),
        },
    };

    debug!(
        target = "quill::http::admin",
        admin = admin.email(),
        intent = intent.as_str(),
        slug = %slug_param,
        "post form submitted"
    );

    let command = SubmitPostCommand {
        intent,
        slug_param: slug_param.clone(),
        fields: fields.clone(),
    };

    match state.posts.submit(command).await {
        Ok(SubmitOutcome::Redirect(directive)) => Redirect::to(directive.href()).into_response(),
        Ok(SubmitOutcome::Invalid(errors)) => {
            let posts = match state.posts.list().await {
                Ok(posts) => posts,
                Err(err) => return responder.respond(PageError::from(err)),
            };
            responder
                .with_navigation(&posts)
                .respond(PageError::ValidationFailure {
                    slug_param,
                    fields,
                    errors,
                })
        }
        Err(err) => responder.respond(PageError::from(err)),
    }
}
