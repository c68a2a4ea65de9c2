//! Order submission requests.

use sigrelay_core::{ClientOrderId, OrderSide, Price, Size, TimeInForce};
use std::fmt;

/// Exchange order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKind {
    Market,
    Limit,
    /// Market order triggered when price reaches `stop_price` in the profit direction.
    TakeProfitMarket,
    /// Market order triggered when price reaches `stop_price` in the loss direction.
    StopMarket,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
            Self::TakeProfitMarket => "TAKE_PROFIT_MARKET",
            Self::StopMarket => "STOP_MARKET",
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single order submission.
///
/// Construct through the named constructors so each kind carries exactly the
/// parameters the exchange expects for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub kind: OrderKind,
    pub quantity: Option<Size>,
    pub price: Option<Price>,
    pub stop_price: Option<Price>,
    pub time_in_force: Option<TimeInForce>,
    pub client_order_id: Option<ClientOrderId>,
    /// Close the entire open position instead of a fixed quantity.
    pub close_position: bool,
}

impl OrderRequest {
    /// Market entry.
    pub fn market(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Size,
        client_order_id: Option<ClientOrderId>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            kind: OrderKind::Market,
            quantity: Some(quantity),
            price: None,
            stop_price: None,
            time_in_force: None,
            client_order_id,
            close_position: false,
        }
    }

    /// Good-till-cancelled limit entry.
    pub fn limit_gtc(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Size,
        price: Price,
        client_order_id: Option<ClientOrderId>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            kind: OrderKind::Limit,
            quantity: Some(quantity),
            price: Some(price),
            stop_price: None,
            time_in_force: Some(TimeInForce::GoodTilCancelled),
            client_order_id,
            close_position: false,
        }
    }

    /// Take-profit trigger that market-closes the whole position.
    pub fn take_profit_close(
        symbol: impl Into<String>,
        side: OrderSide,
        trigger: Price,
        client_order_id: Option<ClientOrderId>,
    ) -> Self {
        Self::close_trigger(symbol, side, OrderKind::TakeProfitMarket, trigger, client_order_id)
    }

    /// Stop-loss trigger that market-closes the whole position.
    pub fn stop_close(
        symbol: impl Into<String>,
        side: OrderSide,
        trigger: Price,
        client_order_id: Option<ClientOrderId>,
    ) -> Self {
        Self::close_trigger(symbol, side, OrderKind::StopMarket, trigger, client_order_id)
    }

    fn close_trigger(
        symbol: impl Into<String>,
        side: OrderSide,
        kind: OrderKind,
        trigger: Price,
        client_order_id: Option<ClientOrderId>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            kind,
            quantity: None,
            price: None,
            stop_price: Some(trigger),
            time_in_force: None,
            client_order_id,
            close_position: true,
        }
    }

    /// Request parameters in exchange wire form, in a stable order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.as_str().to_string()),
            ("type", self.kind.as_str().to_string()),
        ];
        if let Some(tif) = self.time_in_force {
            params.push(("timeInForce", tif.as_str().to_string()));
        }
        if let Some(qty) = self.quantity {
            params.push(("quantity", qty.to_wire()));
        }
        if let Some(price) = self.price {
            params.push(("price", price.to_wire()));
        }
        if let Some(stop) = self.stop_price {
            params.push(("stopPrice", stop.to_wire()));
        }
        if self.close_position {
            params.push(("closePosition", "true".to_string()));
        }
        if let Some(cloid) = &self.client_order_id {
            params.push(("newClientOrderId", cloid.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn keys(req: &OrderRequest) -> Vec<&'static str> {
        req.to_params().into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_limit_params() {
        let req = OrderRequest::limit_gtc(
            "ETHUSDT",
            OrderSide::Buy,
            Size::new(dec!(1.50)),
            Price::new(dec!(2000.0)),
            Some(ClientOrderId::from_string("tv-1".to_string())),
        );
        assert_eq!(
            req.to_params(),
            vec![
                ("symbol", "ETHUSDT".to_string()),
                ("side", "BUY".to_string()),
                ("type", "LIMIT".to_string()),
                ("timeInForce", "GTC".to_string()),
                ("quantity", "1.5".to_string()),
                ("price", "2000".to_string()),
                ("newClientOrderId", "tv-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_market_params_have_no_price() {
        let req = OrderRequest::market("ETHUSDT", OrderSide::Sell, Size::new(dec!(1)), None);
        assert_eq!(keys(&req), vec!["symbol", "side", "type", "quantity"]);
    }

    #[test]
    fn test_close_position_triggers() {
        let tp = OrderRequest::take_profit_close("ETHUSDT", OrderSide::Sell, Price::new(dec!(2100)), None);
        assert_eq!(tp.kind, OrderKind::TakeProfitMarket);
        assert!(tp.close_position);
        assert!(tp.quantity.is_none());
        assert_eq!(
            keys(&tp),
            vec!["symbol", "side", "type", "stopPrice", "closePosition"]
        );

        let sl = OrderRequest::stop_close("ETHUSDT", OrderSide::Sell, Price::new(dec!(1950)), None);
        assert_eq!(sl.to_params()[2].1, "STOP_MARKET");
        assert_eq!(sl.to_params()[3], ("stopPrice", "1950".to_string()));
    }
}
