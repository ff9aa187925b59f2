mod posts;
mod state;

pub use state::AdminState;

use axum::{Router, routing::get};

use super::RouterState;

pub(super) fn admin_routes() -> Router<RouterState> {
    Router::new()
        .route("/posts/admin", get(posts::admin_posts))
        .route(
            "/posts/admin/{slug}",
            get(posts::admin_post_edit).post(posts::admin_post_submit),
        )
}
