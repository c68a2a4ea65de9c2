//! Binance USDⓈ-M futures REST client.
//!
//! Implements [`ExchangeGateway`] over the signed `/fapi/v1/order` endpoint:
//! - `POST` submits, `GET` queries, `DELETE` cancels
//! - every request carries `recvWindow` + `timestamp` and an HMAC-SHA256
//!   `signature` over the exact query string sent
//! - the API key travels in the `X-MBX-APIKEY` header

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::{Client, Method, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use sigrelay_core::{OrderHandle, OrderResponse, OrderStatusSnapshot};
use tracing::{debug, info};

use crate::credentials::Credentials;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{BoxFuture, ExchangeGateway};
use crate::request::OrderRequest;
use crate::response::parse_order_response;

type HmacSha256 = Hmac<Sha256>;

pub const LIVE_BASE_URL: &str = "https://fapi.binance.com";
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

const ORDER_PATH: &str = "/fapi/v1/order";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RECV_WINDOW_MS: u64 = 5_000;

/// Which Binance futures environment to trade against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Futures testnet (test keys from testnet.binancefuture.com).
    #[default]
    Testnet,
    Live,
}

impl Network {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Testnet => TESTNET_BASE_URL,
            Self::Live => LIVE_BASE_URL,
        }
    }
}

/// Client settings.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    pub base_url: String,
    pub recv_window_ms: u64,
    pub request_timeout: Duration,
}

impl BinanceConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            base_url: network.base_url().to_string(),
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self::for_network(Network::default())
    }
}

/// Error payload returned by the API: `{"code": -2019, "msg": "..."}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    msg: Option<String>,
}

/// Signed REST client for order management.
pub struct BinanceFuturesClient {
    client: Client,
    config: BinanceConfig,
    credentials: Credentials,
}

impl BinanceFuturesClient {
    pub fn new(config: BinanceConfig, credentials: Credentials) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to create HTTP client: {e}")))?;

        info!(
            base_url = %config.base_url,
            recv_window_ms = config.recv_window_ms,
            "Binance futures client initialized"
        );

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Hex-encoded HMAC-SHA256 of `payload` keyed with the API secret.
    pub fn sign(&self, payload: &str) -> GatewayResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret().as_bytes())
            .map_err(|e| GatewayError::Signing(e.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Order endpoint URL with `params`, `recvWindow`, `timestamp` and the signature appended.
    fn signed_url(&self, params: &[(&'static str, String)], timestamp_ms: i64) -> GatewayResult<Url> {
        let endpoint = format!("{}{ORDER_PATH}", self.config.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&endpoint)
            .map_err(|e| GatewayError::Config(format!("Invalid base URL {endpoint}: {e}")))?;

        url.query_pairs_mut()
            .extend_pairs(params.iter())
            .append_pair("recvWindow", &self.config.recv_window_ms.to_string())
            .append_pair("timestamp", &timestamp_ms.to_string());

        let query = url.query().unwrap_or_default().to_string();
        let signature = self.sign(&query)?;
        url.query_pairs_mut().append_pair("signature", &signature);
        Ok(url)
    }

    async fn send_signed(
        &self,
        method: Method,
        params: &[(&'static str, String)],
    ) -> GatewayResult<Value> {
        if !self.credentials.is_complete() {
            return Err(GatewayError::Config(
                "exchange API key/secret not configured".to_string(),
            ));
        }

        let url = self.signed_url(params, chrono::Utc::now().timestamp_millis())?;
        debug!(method = %method, path = ORDER_PATH, "Sending signed request");

        let response = self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, self.credentials.api_key())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| GatewayError::Decode(format!("Failed to parse response: {e}: {body}")))
    }
}

/// Query parameters identifying an existing order.
fn order_id_params(handle: &OrderHandle) -> Vec<(&'static str, String)> {
    let id = handle.exchange_order_id.clone();
    let id_param = if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        ("orderId", id)
    } else {
        ("origClientOrderId", id)
    };
    vec![("symbol", handle.symbol.clone()), id_param]
}

fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_decode() {
        GatewayError::Decode(err.to_string())
    } else {
        GatewayError::Transport(err.to_string())
    }
}

fn api_error(status: StatusCode, body: &str) -> GatewayError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    GatewayError::Api {
        status: status.as_u16(),
        code: parsed.as_ref().and_then(|b| b.code),
        message: parsed
            .and_then(|b| b.msg)
            .unwrap_or_else(|| body.to_string()),
    }
}

impl ExchangeGateway for BinanceFuturesClient {
    fn submit_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayResult<OrderResponse>> {
        Box::pin(async move {
            debug!(
                symbol = %request.symbol,
                side = %request.side,
                kind = %request.kind,
                "Submitting order"
            );
            let raw = self.send_signed(Method::POST, &request.to_params()).await?;
            parse_order_response(raw, &request.symbol)
        })
    }

    fn order_status<'a>(
        &'a self,
        handle: &'a OrderHandle,
    ) -> BoxFuture<'a, GatewayResult<OrderStatusSnapshot>> {
        Box::pin(async move {
            let raw = self.send_signed(Method::GET, &order_id_params(handle)).await?;
            Ok(OrderStatusSnapshot::from_raw(raw))
        })
    }

    fn cancel_order<'a>(
        &'a self,
        handle: &'a OrderHandle,
    ) -> BoxFuture<'a, GatewayResult<OrderResponse>> {
        Box::pin(async move {
            let raw = self
                .send_signed(Method::DELETE, &order_id_params(handle))
                .await?;
            parse_order_response(raw, &handle.symbol)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use sigrelay_core::{ClientOrderId, OrderSide, OrderStatus, Price, Size};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Example key pair from the Binance signed-endpoint documentation.
    const DOC_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

    fn client_for(base_url: &str) -> BinanceFuturesClient {
        let config = BinanceConfig {
            base_url: base_url.to_string(),
            ..BinanceConfig::default()
        };
        BinanceFuturesClient::new(config, Credentials::new("test-key", DOC_SECRET)).unwrap()
    }

    fn handle(id: &str) -> OrderHandle {
        OrderHandle {
            exchange_order_id: id.to_string(),
            client_order_id: None,
            symbol: "ETHUSDT".to_string(),
        }
    }

    #[test]
    fn test_network_base_urls() {
        assert_eq!(Network::default(), Network::Testnet);
        assert_eq!(Network::Live.base_url(), "https://fapi.binance.com");
        assert_eq!(
            BinanceConfig::for_network(Network::Testnet).base_url,
            "https://testnet.binancefuture.com"
        );
    }

    #[test]
    fn test_sign_matches_documented_vector() {
        let client = client_for(LIVE_BASE_URL);
        let payload = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            client.sign(payload).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_signed_url_appends_signature_last() {
        let client = client_for("https://example.test/");
        let params = vec![("symbol", "ETHUSDT".to_string())];
        let url = client.signed_url(&params, 1_700_000_000_000).unwrap();
        assert_eq!(url.path(), ORDER_PATH);

        let query = url.query().unwrap();
        let (unsigned, signature) = query.rsplit_once("&signature=").unwrap();
        assert_eq!(unsigned, "symbol=ETHUSDT&recvWindow=5000&timestamp=1700000000000");
        assert_eq!(signature, client.sign(unsigned).unwrap());
    }

    #[test]
    fn test_order_id_params() {
        assert_eq!(order_id_params(&handle("123"))[1], ("orderId", "123".to_string()));
        assert_eq!(
            order_id_params(&handle("tv-1"))[1],
            ("origClientOrderId", "tv-1".to_string())
        );
    }

    #[tokio::test]
    async fn test_submit_limit_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ORDER_PATH))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(query_param("symbol", "ETHUSDT"))
            .and(query_param("type", "LIMIT"))
            .and(query_param("timeInForce", "GTC"))
            .and(query_param("price", "2000"))
            .and(query_param("newClientOrderId", "tv-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "orderId": 42,
                "symbol": "ETHUSDT",
                "status": "NEW",
                "clientOrderId": "tv-1",
                "type": "LIMIT",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let request = OrderRequest::limit_gtc(
            "ETHUSDT",
            OrderSide::Buy,
            Size::new(dec!(1)),
            Price::new(dec!(2000)),
            Some(ClientOrderId::from_string("tv-1".to_string())),
        );
        let resp = client.submit_order(request).await.unwrap();
        assert_eq!(resp.handle.exchange_order_id, "42");
        assert_eq!(resp.status, OrderStatus::New);

        let received = server.received_requests().await.unwrap();
        let query = received[0].url.query().unwrap().to_string();
        let (unsigned, signature) = query.rsplit_once("&signature=").unwrap();
        assert_eq!(signature, client.sign(unsigned).unwrap());
    }

    #[tokio::test]
    async fn test_submit_close_position_trigger() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ORDER_PATH))
            .and(query_param("type", "TAKE_PROFIT_MARKET"))
            .and(query_param("side", "SELL"))
            .and(query_param("stopPrice", "2100"))
            .and(query_param("closePosition", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "orderId": 43,
                "symbol": "ETHUSDT",
                "status": "NEW",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let request =
            OrderRequest::take_profit_close("ETHUSDT", OrderSide::Sell, Price::new(dec!(2100)), None);
        let resp = client.submit_order(request).await.unwrap();
        assert_eq!(resp.handle.exchange_order_id, "43");
    }

    #[tokio::test]
    async fn test_order_status_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ORDER_PATH))
            .and(query_param("symbol", "ETHUSDT"))
            .and(query_param("orderId", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "orderId": 42,
                "symbol": "ETHUSDT",
                "status": "FILLED",
                "avgPrice": "1999.5",
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let snapshot = client.order_status(&handle("42")).await.unwrap();
        assert_eq!(snapshot.status, OrderStatus::Filled);
        assert_eq!(snapshot.raw["avgPrice"], "1999.5");
    }

    #[tokio::test]
    async fn test_cancel_order() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(ORDER_PATH))
            .and(query_param("orderId", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "orderId": 42,
                "symbol": "ETHUSDT",
                "status": "CANCELED",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let resp = client.cancel_order(&handle("42")).await.unwrap();
        assert_eq!(resp.status, OrderStatus::Canceled);
    }

    #[tokio::test]
    async fn test_api_error_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": -2019,
                "msg": "Margin is insufficient.",
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let request = OrderRequest::market("ETHUSDT", OrderSide::Buy, Size::new(dec!(1)), None);
        let err = client.submit_order(request).await.unwrap_err();
        match &err {
            GatewayError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(*status, 400);
                assert_eq!(*code, Some(-2019));
                assert_eq!(message, "Margin is insufficient.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let err = client.order_status(&handle("42")).await.unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_request() {
        let server = MockServer::start().await;
        let config = BinanceConfig {
            base_url: server.uri(),
            ..BinanceConfig::default()
        };
        let client = BinanceFuturesClient::new(config, Credentials::new("", "")).unwrap();
        let err = client.order_status(&handle("42")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
