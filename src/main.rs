use std::{process, sync::Arc};

use quill::{
    application::{
        admin::posts::AdminPostService,
        auth::AdminGate,
        error::AppError,
        posts::PostService,
        render::render_service,
        repos::{HealthCheck, PostsRepo, PostsWriteRepo},
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, AuthState, HttpState, RouterState, SessionCookieSettings},
        memory::InMemoryPosts,
        sessions::InMemorySessionStore,
        telemetry,
    },
};
use time::Duration;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let state = match settings.database.url.as_deref() {
        Some(url) => {
            let repositories = init_repositories(url, &settings).await?;
            build_router_state(repositories, &settings)
        }
        None => {
            warn!(
                target = "quill::startup",
                "database.url is not configured; posts are kept in memory and lost on exit"
            );
            build_router_state(Arc::new(InMemoryPosts::new()), &settings)
        }
    };

    serve_http(&settings, state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let url = settings
        .database
        .url
        .as_deref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    init_repositories(url, &settings).await?;
    info!(target = "quill::migrate", "Migrations applied");
    Ok(())
}

async fn init_repositories(
    url: &str,
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let pool = PostgresRepositories::connect(url, settings.database.max_connections.get())
        .await
        .map_err(InfraError::from)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_router_state<R>(store: Arc<R>, settings: &config::Settings) -> RouterState
where
    R: PostsRepo + PostsWriteRepo + HealthCheck + 'static,
{
    let posts_repo: Arc<dyn PostsRepo> = store.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = store.clone();
    let health: Arc<dyn HealthCheck> = store;

    let ttl_seconds = i64::try_from(settings.session.ttl.get()).unwrap_or(i64::MAX);
    let gate = Arc::new(AdminGate::new(
        Arc::new(InMemorySessionStore::new()),
        settings.admin.credentials.clone(),
        Duration::seconds(ttl_seconds),
    ));

    RouterState {
        http: HttpState {
            posts: Arc::new(PostService::new(posts_repo.clone(), render_service())),
            health,
        },
        admin: AdminState {
            posts: Arc::new(AdminPostService::new(posts_repo, posts_write_repo)),
        },
        auth: AuthState {
            gate,
            cookie: SessionCookieSettings {
                name: settings.session.cookie_name.clone(),
                secure: settings.session.secure_cookie,
            },
        },
    }
}

async fn serve_http(settings: &config::Settings, state: RouterState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "quill::startup",
        addr = %settings.server.addr,
        "Listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "quill::startup", "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(target = "quill::startup", "Shutdown signal received");
}
