//! Take-profit / stop-loss placement after an entry fill.

use sigrelay_core::{ClientOrderId, OrderResponse, OrderSide, Price, ProtectiveOrderResult, Size};
use sigrelay_gateway::{DynGateway, GatewayError, OrderRequest};
use sigrelay_telemetry::Metrics;
use tracing::{error, info};

use crate::error::{PlacementError, ProtectiveLeg};

/// Places the two close-position trigger orders for a filled entry.
///
/// The legs are submitted one after the other and are not atomic: a
/// failed stop-loss leaves the take-profit in place and reports it in
/// [`PlacementError::placed`].
pub struct ProtectiveOrderPlacer {
    gateway: DynGateway,
}

impl ProtectiveOrderPlacer {
    pub fn new(gateway: DynGateway) -> Self {
        Self { gateway }
    }

    pub async fn place(
        &self,
        symbol: &str,
        entry_side: OrderSide,
        take_profit: Price,
        stop_loss: Price,
        quantity: Size,
    ) -> Result<ProtectiveOrderResult, PlacementError> {
        let close_side = entry_side.opposite();
        info!(
            symbol,
            side = %close_side,
            take_profit = %take_profit,
            stop_loss = %stop_loss,
            quantity = %quantity,
            "Placing protective orders"
        );

        let tp_request =
            OrderRequest::take_profit_close(symbol, close_side, take_profit, Some(ClientOrderId::new()));
        let take_profit = self
            .submit(tp_request)
            .await
            .map_err(|source| PlacementError {
                leg: ProtectiveLeg::TakeProfit,
                placed: None,
                source,
            })?;

        let sl_request =
            OrderRequest::stop_close(symbol, close_side, stop_loss, Some(ClientOrderId::new()));
        let stop_loss = match self.submit(sl_request).await {
            Ok(resp) => resp,
            Err(source) => {
                error!(
                    symbol,
                    take_profit_order = %take_profit.handle,
                    error = %source,
                    "Stop-loss failed after take-profit was placed"
                );
                return Err(PlacementError {
                    leg: ProtectiveLeg::StopLoss,
                    placed: Some(take_profit),
                    source,
                });
            }
        };

        info!(
            take_profit_order = %take_profit.handle,
            stop_loss_order = %stop_loss.handle,
            "Protective orders placed"
        );
        Ok(ProtectiveOrderResult {
            take_profit,
            stop_loss,
        })
    }

    async fn submit(&self, request: OrderRequest) -> Result<OrderResponse, GatewayError> {
        let kind = request.kind;
        match self.gateway.submit_order(request).await {
            Ok(resp) => {
                Metrics::order_submitted(kind.as_str());
                Ok(resp)
            }
            Err(e) => {
                Metrics::gateway_error("submit", e.is_transient());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sigrelay_gateway::{MockGateway, OrderKind};
    use std::sync::Arc;

    async fn place(gateway: &Arc<MockGateway>, side: OrderSide) -> Result<ProtectiveOrderResult, PlacementError> {
        ProtectiveOrderPlacer::new(gateway.clone())
            .place(
                "ETHUSDT",
                side,
                Price::new(dec!(2100)),
                Price::new(dec!(1950)),
                Size::new(dec!(1)),
            )
            .await
    }

    #[tokio::test]
    async fn test_buy_entry_closes_with_sell_legs() {
        let gateway = Arc::new(MockGateway::new());
        let result = place(&gateway, OrderSide::Buy).await.unwrap();

        let subs = gateway.submissions();
        assert_eq!(subs.len(), 2);
        assert!(subs.iter().all(|r| r.side == OrderSide::Sell && r.close_position));
        assert_eq!(subs[0].kind, OrderKind::TakeProfitMarket);
        assert_eq!(subs[0].stop_price, Some(Price::new(dec!(2100))));
        assert_eq!(subs[1].kind, OrderKind::StopMarket);
        assert_eq!(subs[1].stop_price, Some(Price::new(dec!(1950))));
        assert_ne!(result.take_profit.handle, result.stop_loss.handle);
    }

    #[tokio::test]
    async fn test_sell_entry_closes_with_buy_legs() {
        let gateway = Arc::new(MockGateway::new());
        place(&gateway, OrderSide::Sell).await.unwrap();
        assert!(gateway.submissions().iter().all(|r| r.side == OrderSide::Buy));
    }

    #[tokio::test]
    async fn test_each_leg_gets_own_client_order_id() {
        let gateway = Arc::new(MockGateway::new());
        place(&gateway, OrderSide::Buy).await.unwrap();

        let subs = gateway.submissions();
        let tp_id = subs[0].client_order_id.clone().unwrap();
        let sl_id = subs[1].client_order_id.clone().unwrap();
        assert_ne!(tp_id, sl_id);
    }

    #[tokio::test]
    async fn test_stop_loss_failure_reports_placed_take_profit() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail_submissions_of(
            OrderKind::StopMarket,
            GatewayError::Api {
                status: 400,
                code: Some(-2021),
                message: "Order would immediately trigger.".into(),
            },
        );

        let err = place(&gateway, OrderSide::Buy).await.unwrap_err();
        assert_eq!(err.leg, ProtectiveLeg::StopLoss);
        let placed = err.placed.unwrap();
        assert_eq!(placed.handle.exchange_order_id, "1000");
        assert!(gateway.cancels().is_empty());
    }

    #[tokio::test]
    async fn test_take_profit_failure_skips_stop_loss() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail_submissions_of(
            OrderKind::TakeProfitMarket,
            GatewayError::Transport("timeout".into()),
        );

        let err = place(&gateway, OrderSide::Buy).await.unwrap_err();
        assert_eq!(err.leg, ProtectiveLeg::TakeProfit);
        assert!(err.placed.is_none());
        assert_eq!(gateway.submissions().len(), 1);
        assert!(err.to_string().starts_with("take_profit order failed"));
    }
}
