//! Session cookie handling, the admin extractors, and the login/logout routes.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Form, FromRef, FromRequestParts, Query, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::{
    application::{
        auth::{AdminGate, AdminUser, AuthError},
        error::{ErrorReport, PageError},
    },
    presentation::views::{
        LayoutContext, LoginTemplate, LoginView, PageMetaView, render_template_response,
    },
};

use super::{boundary::PageResponder, format::ResponseFormat};

const DEFAULT_LOGIN_REDIRECT: &str = "/posts/admin";
const LOGOUT_REDIRECT: &str = "/posts";

#[derive(Debug, Clone)]
pub struct SessionCookieSettings {
    pub name: String,
    pub secure: bool,
}

#[derive(Clone)]
pub struct AuthState {
    pub gate: Arc<AdminGate>,
    pub cookie: SessionCookieSettings,
}

impl AuthState {
    fn session_id<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.cookie.name).map(Cookie::value)
    }

    fn session_cookie(&self, value: String) -> Cookie<'static> {
        let max_age = self.gate.ttl();
        Cookie::build((self.cookie.name.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie.secure)
            .max_age(max_age)
            .build()
    }

    fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(self.cookie.name.clone()).path("/").build()
    }
}

/// Extractor that admits only the configured admin. Rejections redirect HTML
/// clients to the login page and answer JSON clients with `401`.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AdminUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        let format = ResponseFormat::from_headers(&parts.headers);
        let jar = CookieJar::from_headers(&parts.headers);
        let responder = || PageResponder::new("infra::http::auth::require_admin", format);

        match auth.gate.require_admin(auth.session_id(&jar)).await {
            Ok(admin) => Ok(Self(admin)),
            Err(AuthError::Unauthorized) => {
                let redirect_to = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string());
                Err(responder().respond(PageError::Unauthorized { redirect_to }))
            }
            Err(err) => Err(responder().respond(PageError::from(err))),
        }
    }
}

/// Extractor that resolves the admin when present and never rejects on absence.
#[derive(Debug, Clone)]
pub struct OptionalAdmin(pub Option<AdminUser>);

impl<S> FromRequestParts<S> for OptionalAdmin
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(Self(auth.gate.optional_admin(auth.session_id(&jar)).await))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LoginQuery {
    redirect_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LoginForm {
    email: String,
    access_token: String,
    redirect_to: Option<String>,
}

pub(crate) async fn login_form(Query(query): Query<LoginQuery>) -> Response {
    render_login(
        String::new(),
        safe_redirect(query.redirect_to.as_deref()),
        None,
        StatusCode::OK,
    )
}

pub(crate) async fn login_submit(
    State(auth): State<AuthState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let redirect_to = safe_redirect(form.redirect_to.as_deref());

    match auth.gate.login(&form.email, &form.access_token).await {
        Ok(session) => {
            let jar = jar.add(auth.session_cookie(session.id));
            (jar, Redirect::to(&redirect_to)).into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            let mut response = render_login(
                form.email,
                redirect_to,
                Some("Invalid email or access token.".to_string()),
                StatusCode::BAD_REQUEST,
            );
            ErrorReport::from_message(
                "infra::http::auth::login_submit",
                StatusCode::BAD_REQUEST,
                "invalid admin credentials",
            )
            .attach(&mut response);
            response
        }
        Err(err) => PageResponder::new("infra::http::auth::login_submit", ResponseFormat::Html)
            .respond(PageError::from(err)),
    }
}

pub(crate) async fn logout(State(auth): State<AuthState>, jar: CookieJar) -> Response {
    if let Some(id) = auth.session_id(&jar) {
        auth.gate.logout(id).await;
    }

    let jar = jar.remove(auth.removal_cookie());
    (jar, Redirect::to(LOGOUT_REDIRECT)).into_response()
}

fn render_login(
    email: String,
    redirect_to: String,
    error: Option<String>,
    status: StatusCode,
) -> Response {
    let view = LayoutContext::new(
        PageMetaView::titled("Admin login"),
        LoginView {
            email,
            redirect_to,
            error,
        },
    );
    render_template_response(LoginTemplate { view }, status)
}

/// Accept only same-site absolute paths as post-login targets.
pub fn safe_redirect(candidate: Option<&str>) -> String {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => DEFAULT_LOGIN_REDIRECT.to_string(),
    }
}
