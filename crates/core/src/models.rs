use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Lowercase wire form used by the exchange.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown side '{0}', expected buy or sell")]
pub struct ParseSideError(pub String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

/// The type of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    /// Limit when a non-empty price is supplied, market otherwise.
    pub fn for_price(price: Option<&str>) -> Self {
        match price {
            Some(p) if !p.is_empty() => OrderType::Limit,
            _ => OrderType::Market,
        }
    }
}

/// Collateral mode for futures positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginMode {
    Crossed,
    Isolated,
}

/// Whether an order opens a new position or closes an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Open,
    Close,
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// Account-level position mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionMode {
    #[serde(rename = "one_way_mode")]
    OneWay,
    #[serde(rename = "hedge_mode")]
    Hedge,
}

impl PositionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionMode::OneWay => "one_way_mode",
            PositionMode::Hedge => "hedge_mode",
        }
    }
}

impl fmt::Display for PositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown position mode '{0}', expected one_way_mode or hedge_mode")]
pub struct ParsePositionModeError(pub String);

impl FromStr for PositionMode {
    type Err = ParsePositionModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_way_mode" => Ok(PositionMode::OneWay),
            "hedge_mode" => Ok(PositionMode::Hedge),
            _ => Err(ParsePositionModeError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Success code carried in the exchange's response envelope.
pub const SUCCESS_CODE: &str = "00000";

/// A decoded exchange response.
///
/// The document is kept exactly as the exchange sent it. Exchange-side
/// failures (bad signature, insufficient balance, ...) arrive here as normal
/// responses with a non-success `code`; the accessors only read the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeResponse(serde_json::Value);

impl ExchangeResponse {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Envelope code, e.g. `"00000"` on success or `"40009"` on a bad signature.
    pub fn code(&self) -> Option<&str> {
        self.0.get("code").and_then(|c| c.as_str())
    }

    pub fn msg(&self) -> Option<&str> {
        self.0.get("msg").and_then(|m| m.as_str())
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.0.get("data")
    }

    pub fn is_success(&self) -> bool {
        self.code() == Some(SUCCESS_CODE)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for ExchangeResponse {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_side_wire_form() {
        assert_eq!(Side::Buy.as_str(), "buy");
        assert_eq!(Side::Sell.as_str(), "sell");
        assert_eq!(serde_json::to_value(Side::Sell).unwrap(), json!("sell"));
    }

    #[test]
    fn test_side_deserialize_is_lowercase_only() {
        let side: Side = serde_json::from_value(json!("buy")).unwrap();
        assert_eq!(side, Side::Buy);
        assert!(serde_json::from_value::<Side>(json!("Buy")).is_err());
        assert!(serde_json::from_value::<Side>(json!("long")).is_err());
    }

    #[test]
    fn test_side_from_str_ignores_case() {
        assert_eq!("Buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Sell);
        assert!("hold".parse::<Side>().is_err());
    }

    #[test]
    fn test_order_type_for_price() {
        assert_eq!(OrderType::for_price(None), OrderType::Market);
        assert_eq!(OrderType::for_price(Some("")), OrderType::Market);
        assert_eq!(OrderType::for_price(Some("50000")), OrderType::Limit);
    }

    #[test]
    fn test_position_mode_round_trip() {
        assert_eq!(
            "one_way_mode".parse::<PositionMode>().unwrap(),
            PositionMode::OneWay
        );
        assert_eq!(
            serde_json::to_value(PositionMode::Hedge).unwrap(),
            json!("hedge_mode")
        );
        assert!("hedge".parse::<PositionMode>().is_err());
    }

    #[test]
    fn test_exchange_response_envelope() {
        let ok = ExchangeResponse::new(json!({
            "code": "00000",
            "msg": "success",
            "data": [],
        }));
        assert!(ok.is_success());
        assert_eq!(ok.msg(), Some("success"));
        assert_eq!(ok.data(), Some(&json!([])));

        let rejected = ExchangeResponse::new(json!({
            "code": "40009",
            "msg": "sign signature error",
        }));
        assert!(!rejected.is_success());
        assert_eq!(rejected.code(), Some("40009"));
        assert!(rejected.data().is_none());
    }

    #[test]
    fn test_exchange_response_serializes_unchanged() {
        let body = json!({"code": "00000", "data": {"orderId": "1"}, "extra": 7});
        let resp = ExchangeResponse::from(body.clone());
        assert_eq!(serde_json::to_value(&resp).unwrap(), body);
    }
}
