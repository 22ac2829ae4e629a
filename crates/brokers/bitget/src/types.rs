use bgbridge_core::{MarginMode, OrderType, PositionMode, Side, TradeSide};
use serde::Serialize;
use std::collections::BTreeMap;

/// Quote currency appended to every base asset.
pub const QUOTE_SUFFIX: &str = "USDT";
pub const MARGIN_COIN: &str = "USDT";
/// Product type as the position endpoints expect it.
pub const POSITIONS_PRODUCT_TYPE: &str = "USDT-FUTURES";
/// Product type as the order endpoints expect it.
pub const ORDERS_PRODUCT_TYPE: &str = "usdt-futures";

/// "BTC" -> "BTCUSDT".
pub fn futures_symbol(base: &str) -> String {
    format!("{}{}", base, QUOTE_SUFFIX)
}

/// Join parameters as `k=v&k=v` in ascending key order.
///
/// The exchange verifies the signature against the query as sent, so the
/// order must not depend on how the caller collected the parameters.
pub fn sorted_query_string<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Query for `GET /api/v2/mix/position/all-position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllPositionsQuery {
    pub product_type: String,
    pub margin_coin: String,
}

impl Default for AllPositionsQuery {
    fn default() -> Self {
        Self {
            product_type: POSITIONS_PRODUCT_TYPE.to_string(),
            margin_coin: MARGIN_COIN.to_string(),
        }
    }
}

impl AllPositionsQuery {
    pub fn to_query_string(&self) -> String {
        sorted_query_string([
            ("productType", self.product_type.as_str()),
            ("marginCoin", self.margin_coin.as_str()),
        ])
    }
}

/// Body for `POST /api/v2/mix/account/set-position-mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPositionModeRequest {
    pub product_type: String,
    pub pos_mode: PositionMode,
}

/// Body for `POST /api/v2/mix/order/place-order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub symbol: String,
    pub product_type: String,
    pub margin_mode: MarginMode,
    pub order_type: OrderType,
    pub margin_coin: String,
    pub size: String,
    pub side: Side,
    pub trade_side: TradeSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl PlaceOrderRequest {
    /// Cross-margin order that opens a new position on `base`.
    ///
    /// An empty price counts as no price.
    pub fn open(base: &str, amount: &str, side: Side, price: Option<&str>) -> Self {
        let price = price.filter(|p| !p.is_empty());
        Self {
            symbol: futures_symbol(base),
            product_type: ORDERS_PRODUCT_TYPE.to_string(),
            margin_mode: MarginMode::Crossed,
            order_type: OrderType::for_price(price),
            margin_coin: MARGIN_COIN.to_string(),
            size: amount.to_string(),
            side,
            trade_side: TradeSide::Open,
            price: price.map(str::to_string),
        }
    }
}

/// Body for `POST /api/v2/mix/order/close-positions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePositionsRequest {
    pub symbol: String,
    pub product_type: String,
}

impl ClosePositionsRequest {
    pub fn for_base(base: &str) -> Self {
        Self {
            symbol: futures_symbol(base),
            product_type: ORDERS_PRODUCT_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_positions_query_is_sorted() {
        assert_eq!(
            AllPositionsQuery::default().to_query_string(),
            "marginCoin=USDT&productType=USDT-FUTURES"
        );
    }

    #[test]
    fn test_sorted_query_ignores_input_order() {
        let forward = sorted_query_string([("marginCoin", "USDT"), ("productType", "USDT-FUTURES")]);
        let reverse = sorted_query_string([("productType", "USDT-FUTURES"), ("marginCoin", "USDT")]);
        let mut map = HashMap::new();
        map.insert("productType", "USDT-FUTURES");
        map.insert("marginCoin", "USDT");

        assert_eq!(forward, reverse);
        assert_eq!(sorted_query_string(map), forward);
    }

    #[test]
    fn test_sorted_query_empty() {
        assert_eq!(sorted_query_string(Vec::<(String, String)>::new()), "");
    }

    #[test]
    fn test_market_buy_has_no_price() {
        let order = PlaceOrderRequest::open("BTC", "10", Side::Buy, None);
        let body = serde_json::to_value(&order).unwrap();

        assert_eq!(body["symbol"], "BTCUSDT");
        assert_eq!(body["side"], "buy");
        assert_eq!(body["orderType"], "market");
        assert_eq!(body["tradeSide"], "open");
        assert_eq!(body["marginMode"], "crossed");
        assert!(body.get("price").is_none());
    }

    #[test]
    fn test_limit_sell_carries_price() {
        let order = PlaceOrderRequest::open("BTC", "10", Side::Sell, Some("50000"));
        let body = serde_json::to_value(&order).unwrap();

        assert_eq!(body["side"], "sell");
        assert_eq!(body["orderType"], "limit");
        assert_eq!(body["price"], "50000");
    }

    #[test]
    fn test_empty_price_is_market() {
        let order = PlaceOrderRequest::open("ETH", "1", Side::Buy, Some(""));
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.price, None);
    }

    #[test]
    fn test_place_order_wire_layout() {
        let order = PlaceOrderRequest::open("1000RATS", "49", Side::Sell, None);
        assert_eq!(
            serde_json::to_string(&order).unwrap(),
            r#"{"symbol":"1000RATSUSDT","productType":"usdt-futures","marginMode":"crossed","orderType":"market","marginCoin":"USDT","size":"49","side":"sell","tradeSide":"open"}"#
        );
    }

    #[test]
    fn test_close_targets_usdt_pair() {
        let body = serde_json::to_value(ClosePositionsRequest::for_base("ETH")).unwrap();
        assert_eq!(body, json!({"symbol": "ETHUSDT", "productType": "usdt-futures"}));
    }

    #[test]
    fn test_position_mode_body() {
        let req = SetPositionModeRequest {
            product_type: "USDT-FUTURES".to_string(),
            pos_mode: PositionMode::OneWay,
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({"productType": "USDT-FUTURES", "posMode": "one_way_mode"})
        );
    }
}
