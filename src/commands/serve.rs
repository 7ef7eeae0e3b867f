//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, RateLimiter};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Initialize database (applies pending migrations)
    let db = Arc::new(Database::connect(&config).await?);
    tracing::info!("Database connected");

    // Redis is only needed for rate limiting
    let rate_limiter = match config.redis_url.as_deref() {
        Some(url) => {
            let limiter = RateLimiter::connect(url).await.map_err(|e| {
                AppError::internal(format!("Redis connection failed: {}", e))
            })?;
            Some(Arc::new(limiter))
        }
        None => {
            tracing::warn!("REDIS_URL not set, rate limiting disabled");
            None
        }
    };

    let app_state = AppState::from_config(db, rate_limiter, &config);
    let app = create_router(app_state);

    // Start server
    let addr = config.server_addr(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!(
        payment_method = %config.default_payment_method,
        strict_order_lifecycle = config.strict_order_lifecycle,
        "Server running on http://{}",
        addr
    );

    // Connect info feeds the per-client rate limit key
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
