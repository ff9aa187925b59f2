use askama::Template;

use crate::domain::entities::PostSummary;
use crate::domain::posts::ValidationErrors;

#[derive(Clone)]
pub struct AdminNavigationItemView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminNavigationView {
    pub items: Vec<AdminNavigationItemView>,
}

impl AdminNavigationView {
    /// Build the post navigation, marking the entry for `active_slug`.
    pub fn from_posts(posts: &[PostSummary], active_slug: Option<&str>) -> Self {
        let items = posts
            .iter()
            .map(|post| AdminNavigationItemView {
                label: post.title.clone(),
                href: format!("/posts/admin/{}", post.slug),
                is_active: active_slug == Some(post.slug.as_str()),
            })
            .collect();
        Self { items }
    }
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub title: String,
    pub navigation: AdminNavigationView,
    pub asset_version: String,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(title: impl Into<String>, navigation: AdminNavigationView, content: T) -> Self {
        Self {
            title: title.into(),
            navigation,
            asset_version: asset_version(),
            content,
        }
    }
}

fn asset_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub struct AdminIndexView {
    pub new_post_href: String,
}

#[derive(Template)]
#[template(path = "admin/index.html")]
pub struct AdminIndexTemplate {
    pub view: AdminLayout<AdminIndexView>,
}

pub struct AdminPostEditorView {
    pub form_action: String,
    pub is_new: bool,
    pub title: String,
    pub slug: String,
    pub markdown: String,
    pub errors: ValidationErrors,
}

impl AdminPostEditorView {
    pub fn submit_intent(&self) -> &'static str {
        if self.is_new { "create" } else { "update" }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_new {
            "Create Post"
        } else {
            "Update Post"
        }
    }
}

#[derive(Template)]
#[template(path = "admin/editor.html")]
pub struct AdminPostEditorTemplate {
    pub view: AdminLayout<AdminPostEditorView>,
}
