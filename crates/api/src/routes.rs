use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bgbridge_core::{ExchangeError, ExchangeResponse, Side};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health
        .route("/", get(root))
        // Positions
        .route("/get_positions", get(get_positions))
        // Orders
        .route("/open_order", post(open_order))
        .route("/close_order/{symbol}", post(close_order))
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failure reaching the exchange, reported to the caller as a bad gateway.
#[derive(Debug)]
pub struct ApiError(ExchangeError);

impl From<ExchangeError> for ApiError {
    fn from(e: ExchangeError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Exchange call failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

type ApiResult = Result<Json<ExchangeResponse>, ApiError>;

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Hello World" }))
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

async fn get_positions(State(state): State<Arc<AppState>>) -> ApiResult {
    let resp = state.exchange.list_positions().await?;
    Ok(Json(resp))
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Body of `POST /open_order`.
#[derive(Debug, Deserialize)]
pub struct OpenOrderRequest {
    /// Base asset, e.g. "BTC".
    pub symbol: String,
    pub amount: String,
    pub mode: Side,
    #[serde(default)]
    pub price: Option<String>,
}

async fn open_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OpenOrderRequest>,
) -> ApiResult {
    info!(
        symbol = %req.symbol,
        amount = %req.amount,
        side = %req.mode,
        price = ?req.price,
        "Opening order"
    );
    let resp = state
        .exchange
        .open_order(&req.symbol, &req.amount, req.mode, req.price.as_deref())
        .await?;
    Ok(Json(resp))
}

async fn close_order(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult {
    info!(symbol = %symbol, "Closing positions");
    let resp = state.exchange.close_order(&symbol).await?;
    Ok(Json(resp))
}
