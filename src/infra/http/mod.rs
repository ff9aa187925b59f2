mod admin;
mod auth;
mod boundary;
mod format;
mod middleware;
mod public;

pub use admin::AdminState;
pub use auth::{AuthState, OptionalAdmin, RequireAdmin, SessionCookieSettings, safe_redirect};
pub use boundary::{PageResponder, login_redirect};
pub use format::ResponseFormat;
pub use public::HttpState;

use axum::{
    Router,
    extract::FromRef,
    middleware as axum_middleware,
    routing::{get, post},
};

use middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct RouterState {
    pub http: HttpState,
    pub admin: AdminState,
    pub auth: AuthState,
}

impl FromRef<RouterState> for HttpState {
    fn from_ref(state: &RouterState) -> Self {
        state.http.clone()
    }
}

impl FromRef<RouterState> for AdminState {
    fn from_ref(state: &RouterState) -> Self {
        state.admin.clone()
    }
}

impl FromRef<RouterState> for AuthState {
    fn from_ref(state: &RouterState) -> Self {
        state.auth.clone()
    }
}

pub fn build_router(state: RouterState) -> Router {
    Router::new()
        .route("/", get(public::root))
        .route("/posts", get(public::index))
        .route("/posts/{slug}", get(public::post_detail))
        .merge(admin::admin_routes())
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        .route("/_health/db", get(public::db_health))
        .fallback(public::fallback)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
