//! Server setup and initialization

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use recipe_common::{AppConfig, AppError, JwtService};
use recipe_core::SnowflakeGenerator;
use recipe_db::{
    create_pool, run_migrations, PgCommentRepository, PgReactionRepository, PgRecipeRepository,
    PgUserRepository, PoolConfig,
};
use recipe_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, MiddlewareConfig};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application: API routes behind the full middleware stack,
/// health probes behind the same stack minus rate limiting
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let mut middleware = MiddlewareConfig {
        rate_limit: Some(&config.rate_limit),
        cors: &config.cors,
        is_production: config.app.env.is_production(),
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
    };

    let api = apply_middleware(create_router(), &middleware)?;
    middleware.rate_limit = None;
    let health = apply_middleware(health_routes(), &middleware)?;

    Ok(api.merge(health).with_state(state))
}

/// Connect to PostgreSQL and wire the repositories into an [`AppState`]
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(format!("migrations failed: {e}")))?;
        info!("Database migrations applied");
    }

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .pool(pool.clone())
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .recipe_repo(Arc::new(PgRecipeRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .reaction_repo(Arc::new(PgReactionRepository::new(pool)))
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, addr).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
