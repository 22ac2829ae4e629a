pub mod routes;
pub mod state;

use axum::Router;
use bgbridge_core::FuturesExchange;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the Axum application router.
pub fn build_router(exchange: Arc<dyn FuturesExchange>) -> Router {
    let app_state = Arc::new(state::AppState::new(exchange));

    routes::api_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the API server.
pub async fn start_server(exchange: Arc<dyn FuturesExchange>, bind_addr: &str) -> anyhow::Result<()> {
    let app = build_router(exchange);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("API server listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
