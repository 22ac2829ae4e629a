use crate::models::*;
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Exchange Trait
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the exchange.
///
/// Responses the exchange itself rejects are not errors; they come back as an
/// [`ExchangeResponse`] with a non-success code.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Failed to decode exchange response: {0}")]
    Decode(String),
    #[error("Failed to encode request: {0}")]
    Encode(String),
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

/// A USDT-margined futures account that positions can be listed and orders
/// placed against.
#[async_trait]
pub trait FuturesExchange: Send + Sync {
    /// List every open position.
    async fn list_positions(&self) -> Result<ExchangeResponse, ExchangeError>;

    /// Switch the account between one-way and hedge position mode.
    async fn set_position_mode(
        &self,
        product_type: &str,
        pos_mode: PositionMode,
    ) -> Result<ExchangeResponse, ExchangeError>;

    /// Open a position on `symbol` (base asset only, e.g. "BTC").
    ///
    /// A price makes it a limit order, otherwise it is sent at market.
    async fn open_order(
        &self,
        symbol: &str,
        amount: &str,
        side: Side,
        price: Option<&str>,
    ) -> Result<ExchangeResponse, ExchangeError>;

    /// Close every position held on `symbol` (base asset only).
    async fn close_order(&self, symbol: &str) -> Result<ExchangeResponse, ExchangeError>;
}
