use std::process;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

use flow::application::comments::CommentService;
use flow::application::error::AppError;
use flow::application::migration::MigrationService;
use flow::application::posts::PostService;
use flow::config;
use flow::infra::db::PostgresRepositories;
use flow::infra::error::InfraError;
use flow::infra::http::{self, ApiState};
use flow::infra::local::LocalStore;
use flow::infra::telemetry;

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
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(
        &settings.database.url,
        settings.database.max_connections,
    )
    .await
    .map_err(|err| AppError::from(InfraError::database(format!("failed to connect: {err}"))))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| {
            AppError::from(InfraError::database(format!("failed to run migrations: {err}")))
        })?;

    let repositories = Arc::new(PostgresRepositories::new(pool));
    let legacy_store = Arc::new(LocalStore::new(&settings.legacy_store.dir));

    // One-time import of the superseded local store. A failure here must not
    // keep the server down: the completion flag stays unset, so the next
    // start retries.
    let migration = MigrationService::new(legacy_store, repositories.clone());
    if let Err(error) = migration.migrate_if_needed().await {
        error!(error = %error, "legacy store migration failed; will retry on next start");
    }

    let posts = Arc::new(PostService::new(repositories.clone(), repositories.clone()));
    let comments = Arc::new(CommentService::new(
        repositories.clone(),
        repositories.clone(),
        repositories.clone(),
    ));

    let router = http::build_router(ApiState {
        posts,
        comments,
        db: repositories,
    });

    let addr = settings
        .server
        .addr()
        .map_err(|err| AppError::unexpected(err.to_string()))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::unexpected(format!("failed to bind {addr}: {err}")))?;
    info!(%addr, "flow listening");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
