//! HTTP server implementation

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::Result;

/// Assemble the router with its middleware stack
pub fn build_app(state: AppState, enable_cors: bool, max_concurrency: usize) -> Router {
    let mut app = Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(ConcurrencyLimitLayer::new(max_concurrency.max(1)))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    // Add CORS if enabled
    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("🚀 Starting PincodePro API server...");

    let state = AppState::from_config(config)?;
    let app = build_app(state, enable_cors, config.server.max_concurrency);

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("📋 RESTful API available at http://{}/api", addr);
    info!("");
    info!("Available endpoints:");
    info!("  GET    /api/health                    - Health check");
    info!("  GET    /api/search?q=&ai=             - Resolve a query");
    info!("  GET    /api/insights?area=&pincode=   - Locality insights");
    info!("  GET    /api/share-location?lat=&lon=  - Live location links");
    info!("  GET    /api/states                    - List states");
    info!("  GET    /api/states/:state/districts   - Districts of a state");
    info!("  GET    /api/featured                  - Featured pincodes");
    info!("  POST   /api/sessions                  - Create session");
    info!("  GET    /api/sessions/:id              - Session snapshot");
    info!("  POST   /api/sessions/:id/search       - Search in session");
    info!("  POST   /api/sessions/:id/near         - Search by coordinates");
    info!("  POST   /api/sessions/:id/select       - Open detail view");
    info!("  DELETE /api/sessions/:id/select       - Close detail view");
    info!("  POST   /api/support                   - Support chat");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
