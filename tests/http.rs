use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use quill::application::admin::posts::AdminPostService;
use quill::application::auth::{AdminCredentials, AdminGate};
use quill::application::posts::PostService;
use quill::application::render::render_service;
use quill::application::repos::{CreatePostParams, PostsWriteRepo};
use quill::infra::http::{
    AdminState, AuthState, HttpState, RouterState, SessionCookieSettings, build_router,
};
use quill::infra::memory::InMemoryPosts;
use quill::infra::sessions::InMemorySessionStore;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_TOKEN: &str = "s3cret";
const COOKIE_NAME: &str = "quill_session";

struct TestApp {
    router: Router,
    store: Arc<InMemoryPosts>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemoryPosts::new());
        let gate = AdminGate::new(
            Arc::new(InMemorySessionStore::new()),
            AdminCredentials::from_token(ADMIN_EMAIL, ADMIN_TOKEN),
            time::Duration::hours(1),
        );

        let state = RouterState {
            http: HttpState {
                posts: Arc::new(PostService::new(store.clone(), render_service())),
                health: store.clone(),
            },
            admin: AdminState {
                posts: Arc::new(AdminPostService::new(store.clone(), store.clone())),
            },
            auth: AuthState {
                gate: Arc::new(gate),
                cookie: SessionCookieSettings {
                    name: COOKIE_NAME.to_string(),
                    secure: false,
                },
            },
        };

        Self {
            router: build_router(state),
            store,
        }
    }

    async fn seed(&self, slug: &str, title: &str, markdown: &str) {
        self.store
            .create_post(CreatePostParams {
                slug: slug.to_string(),
                title: title.to_string(),
                markdown: markdown.to_string(),
            })
            .await
            .expect("seed post");
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Logs in and returns the `name=value` pair for the session cookie.
    async fn login(&self) -> String {
        let response = self
            .send(form_request(
                "/login",
                None,
                "email=admin%40example.com&access_token=s3cret&redirect_to=%2Fposts%2Fadmin",
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/posts/admin");

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie")
            .to_str()
            .expect("ascii cookie");
        assert!(set_cookie.contains("HttpOnly"));
        set_cookie
            .split(';')
            .next()
            .expect("cookie pair")
            .to_string()
    }
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

fn get_json(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut request = get(uri, cookie);
    request.headers_mut().insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    request
}

fn form_request(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("json body")
}

#[tokio::test]
async fn root_redirects_to_post_list() {
    let app = TestApp::new();
    let response = app.send(get("/", None)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts");
}

#[tokio::test]
async fn post_list_and_detail_render_stored_posts() {
    let app = TestApp::new();
    app.seed("hello", "Hello", "# Hi\n\nSome *emphasis*.").await;

    let list = app.send(get("/posts", None)).await;
    assert_eq!(list.status(), StatusCode::OK);
    let html = body_text(list).await;
    assert!(html.contains(r#"href="/posts/hello""#));
    assert!(html.contains("Hello"));
    assert!(!html.contains("/posts/admin"));

    let detail = app.send(get("/posts/hello", None)).await;
    assert_eq!(detail.status(), StatusCode::OK);
    let html = body_text(detail).await;
    assert!(html.contains("<h1>Hi</h1>"));
    assert!(html.contains("<em>emphasis</em>"));
}

#[tokio::test]
async fn post_detail_json_carries_rendered_html() {
    let app = TestApp::new();
    app.seed("hello", "Hello", "# Hi").await;

    let response = app.send(get_json("/posts/hello", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["slug"], "hello");
    assert_eq!(json["title"], "Hello");
    assert!(json["html"].as_str().expect("html").contains("<h1>Hi</h1>"));
}

#[tokio::test]
async fn unknown_post_is_not_found_and_names_the_slug() {
    let app = TestApp::new();

    let response = app.send(get("/posts/nonexistent-slug", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response).await;
    assert!(html.contains("nonexistent-slug"));
    assert!(html.contains("does not exist"));

    let response = app.send(get_json("/posts/nonexistent-slug", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::new();
    let response = app.send(get("/no/such/page", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_routes_redirect_anonymous_visitors_to_login() {
    let app = TestApp::new();

    let response = app.send(get("/posts/admin", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/login?redirect_to="));

    let response = app.send(get_json("/posts/admin/new", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_submit_never_reaches_the_store() {
    let app = TestApp::new();

    let response = app
        .send(form_request(
            "/posts/admin/new",
            None,
            "intent=create&title=Sneaky&slug=sneaky&markdown=x",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/login"));
    assert!(app.store.is_empty().await);

    let response = app
        .send(form_request(
            "/posts/admin/new",
            Some("quill_session=forged"),
            "intent=create&title=Sneaky&slug=sneaky&markdown=x",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let app = TestApp::new();
    let response = app
        .send(form_request(
            "/login",
            None,
            "email=admin%40example.com&access_token=wrong",
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn admin_can_create_update_and_delete_a_post() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let editor = app.send(get("/posts/admin/new", Some(&cookie))).await;
    assert_eq!(editor.status(), StatusCode::OK);

    let created = app
        .send(form_request(
            "/posts/admin/new",
            Some(&cookie),
            "intent=create&title=Hello&slug=hello&markdown=%23+Hi",
        ))
        .await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&created), "/posts/admin");
    assert_eq!(app.store.len().await, 1);

    let listing = app.send(get("/posts", Some(&cookie))).await;
    assert!(body_text(listing).await.contains("/posts/admin"));

    let editor = app.send(get("/posts/admin/hello", Some(&cookie))).await;
    assert_eq!(editor.status(), StatusCode::OK);
    assert!(body_text(editor).await.contains("Delete"));

    let updated = app
        .send(form_request(
            "/posts/admin/hello",
            Some(&cookie),
            "intent=update&title=Hello+again&slug=hello&markdown=Updated",
        ))
        .await;
    assert_eq!(updated.status(), StatusCode::SEE_OTHER);
    let json = body_json(app.send(get_json("/posts/hello", None)).await).await;
    assert_eq!(json["title"], "Hello again");

    let deleted = app
        .send(form_request(
            "/posts/admin/hello",
            Some(&cookie),
            "intent=delete",
        ))
        .await;
    assert_eq!(deleted.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&deleted), "/posts/admin");
    assert!(app.store.is_empty().await);

    let gone = app.send(get("/posts/hello", None)).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_submission_reports_errors_and_stores_nothing() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(form_request(
            "/posts/admin/new",
            Some(&cookie),
            "intent=create&title=&slug=x&markdown=y",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Title is required!"));
    assert!(!html.contains("Slug is required!"));
    assert!(app.store.is_empty().await);

    let mut request = form_request("/posts/admin/new", Some(&cookie), "intent=create");
    request.headers_mut().insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Title is required!");
    assert_eq!(json["slug"], "Slug is required!");
    assert_eq!(json["markdown"], "Markdown is required!");
}

#[tokio::test]
async fn editor_submits_save_when_enter_is_pressed() {
    let app = TestApp::new();
    app.seed("hello", "Hello", "# Hi").await;
    let cookie = app.login().await;

    let html = body_text(app.send(get("/posts/admin/hello", Some(&cookie))).await).await;
    let first_intent = html
        .split(r#"name="intent""#)
        .nth(1)
        .expect("intent button");
    assert!(
        first_intent.trim_start().starts_with(r#"value="update""#),
        "default button is not the save button: {first_intent}"
    );
    assert!(html.contains(r#"value="delete""#));
}

#[tokio::test]
async fn slug_that_is_not_url_safe_is_rejected() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(form_request(
            "/posts/admin/new",
            Some(&cookie),
            "intent=create&title=Question&slug=what%3F&markdown=body",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Slug may only contain letters, digits, dashes and underscores!"));
    assert!(html.contains("<title>New post"));
    assert!(!html.contains(r#"href="/posts/what?""#));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn admin_editor_for_unknown_slug_is_not_found() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .send(get("/posts/admin/nonexistent-slug", Some(&cookie)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("nonexistent-slug"));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app.send(form_request("/logout", Some(&cookie), "")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/posts");

    let response = app.send(get("/posts/admin", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/login"));
}

#[tokio::test]
async fn health_check_reports_no_content() {
    let app = TestApp::new();
    let response = app.send(get("/_health/db", None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
