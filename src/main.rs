use sqlx::postgres::PgPoolOptions;
use std::process::ExitCode;
use std::sync::Arc;
use todo_service::{build_app, AppConfig, AppState, PostgresStore, TokenConfig};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Todo service failed");
            ExitCode::FAILURE
        }
    }
}

/// Startup failures (config, database, migrations, bind) are fatal: we never serve
/// traffic without storage and a signing secret.
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    info!(bind_addr = %config.bind_addr, "Starting todo service");

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout)
        .connect(&config.database_url)
        .await?;
    info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    // Storage is built once here and handed to the router
    let store = Arc::new(PostgresStore::new(pool));
    let token_config = TokenConfig::new(&config.jwt_secret, config.token_expiration_hours);
    let app_state = AppState::new(store, token_config);

    let app = build_app(app_state, config.request_timeout).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
