use async_trait::async_trait;
use bgbridge_core::*;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{Credentials, RequestSigner, SignedRequest, DEFAULT_LOCALE};
use crate::types::*;

pub const DEFAULT_BASE_URL: &str = "https://api.bitget.com";

const ALL_POSITIONS_ENDPOINT: &str = "/api/v2/mix/position/all-position";
const SET_POSITION_MODE_ENDPOINT: &str = "/api/v2/mix/account/set-position-mode";
const PLACE_ORDER_ENDPOINT: &str = "/api/v2/mix/order/place-order";
const CLOSE_POSITIONS_ENDPOINT: &str = "/api/v2/mix/order/close-positions";

/// Non-secret connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitgetConfig {
    /// REST host, e.g. "https://api.bitget.com".
    pub base_url: String,
    /// Value of the `locale` header.
    pub locale: String,
}

impl Default for BitgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// Signed REST client for Bitget USDT-margined futures.
///
/// Every call builds its own HTTP session and drops it before returning, so
/// nothing is shared between concurrent calls except the read-only
/// credentials.
pub struct BitgetClient {
    config: BitgetConfig,
    signer: RequestSigner,
}

impl BitgetClient {
    pub fn new(credentials: Credentials, config: BitgetConfig) -> Self {
        let signer = RequestSigner::with_locale(credentials, config.locale.clone());
        Self { config, signer }
    }

    pub fn config(&self) -> &BitgetConfig {
        &self.config
    }

    async fn get(&self, path: &str, query: &str) -> Result<ExchangeResponse, ExchangeError> {
        let request = self
            .signer
            .sign_request(Method::GET, path, query, String::new())?;
        self.send(request).await
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ExchangeResponse, ExchangeError> {
        let body = serde_json::to_string(body).map_err(|e| ExchangeError::Encode(e.to_string()))?;
        // POST bodies are signed with an empty query
        let request = self.signer.sign_request(Method::POST, path, "", body)?;
        self.send(request).await
    }

    async fn send(&self, request: SignedRequest) -> Result<ExchangeResponse, ExchangeError> {
        let session = reqwest::Client::builder()
            .build()
            .map_err(|e| ExchangeError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        let url = request.url(&self.config.base_url);
        debug!(method = %request.method, path = %request.path, "Sending signed request");

        let mut builder = session
            .request(request.method, &url)
            .headers(request.headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            ExchangeError::Decode(format!("{} (HTTP {}): {}", e, status, text))
        })?;
        let response = ExchangeResponse::new(value);

        if !response.is_success() {
            warn!(
                path = %request.path,
                status = %status,
                code = response.code().unwrap_or("-"),
                msg = response.msg().unwrap_or("-"),
                "Exchange returned an error response"
            );
        }

        Ok(response)
    }
}

#[async_trait]
impl FuturesExchange for BitgetClient {
    async fn list_positions(&self) -> Result<ExchangeResponse, ExchangeError> {
        let query = AllPositionsQuery::default().to_query_string();
        self.get(ALL_POSITIONS_ENDPOINT, &query).await
    }

    async fn set_position_mode(
        &self,
        product_type: &str,
        pos_mode: PositionMode,
    ) -> Result<ExchangeResponse, ExchangeError> {
        let body = SetPositionModeRequest {
            product_type: product_type.to_string(),
            pos_mode,
        };
        self.post(SET_POSITION_MODE_ENDPOINT, &body).await
    }

    async fn open_order(
        &self,
        symbol: &str,
        amount: &str,
        side: Side,
        price: Option<&str>,
    ) -> Result<ExchangeResponse, ExchangeError> {
        let body = PlaceOrderRequest::open(symbol, amount, side, price);
        self.post(PLACE_ORDER_ENDPOINT, &body).await
    }

    async fn close_order(&self, symbol: &str) -> Result<ExchangeResponse, ExchangeError> {
        let body = ClosePositionsRequest::for_base(symbol);
        self.post(CLOSE_POSITIONS_ENDPOINT, &body).await
    }
}
