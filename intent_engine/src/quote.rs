use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::QuoteError;
use crate::types::{normalize_token_address, TxPayload};

/// Exact message the primary provider attaches to a routable-but-empty 404.
/// Only this failure activates the fallback swap provider.
const NO_ROUTE_MESSAGE: &str = "No available quotes for the requested transfer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteOrder {
    #[default]
    Fastest,
    Cheapest,
}

impl RouteOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteOrder::Fastest => "FASTEST",
            RouteOrder::Cheapest => "CHEAPEST",
        }
    }
}

/// Parameters for one quote. `from_chain_id == to_chain_id` denotes an
/// intra-chain swap; the aggregator itself does not care.
#[derive(Debug, Clone)]
pub struct QuoteParams {
    pub from_chain_id: u64,
    pub to_chain_id: u64,
    pub from_token: String,
    pub to_token: String,
    pub from_amount: U256,
    pub from_address: Address,
    pub to_address: Address,
    pub order: RouteOrder,
}

/// Route metadata merged with the provider's embedded transaction request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTx {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_amount_min: Option<String>,
    #[serde(flatten)]
    pub tx: TxPayload,
}

#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn fetch_quote(&self, params: &QuoteParams) -> Result<RouteTx, QuoteError>;
}

/// Request shape of the fallback swap-routing provider.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub from_address: Address,
    pub chain_id: u64,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
}

#[async_trait]
pub trait SwapProvider: Send + Sync {
    async fn fetch_swap(&self, request: &SwapRequest) -> Result<RouteTx, QuoteError>;
}

/// Queries the primary cross-chain routing provider and falls back to the
/// secondary swap router on the one classified "no route" failure.
pub struct QuoteAggregator {
    primary: Arc<dyn RouteProvider>,
    fallback: Arc<dyn SwapProvider>,
}

impl QuoteAggregator {
    pub fn new(primary: Arc<dyn RouteProvider>, fallback: Arc<dyn SwapProvider>) -> Self {
        Self { primary, fallback }
    }

    pub async fn get_quote(&self, params: QuoteParams) -> Result<RouteTx, QuoteError> {
        let params = QuoteParams {
            from_token: normalize_token_address(&params.from_token),
            to_token: normalize_token_address(&params.to_token),
            ..params
        };

        match self.primary.fetch_quote(&params).await {
            Ok(route) => Ok(route),
            Err(QuoteError::NoRoute) => {
                warn!(
                    "no route from primary provider for chain {} -> {}, trying swap fallback",
                    params.from_chain_id, params.to_chain_id
                );
                let request = SwapRequest {
                    from_address: params.from_address,
                    chain_id: params.from_chain_id,
                    token_in: params.from_token.clone(),
                    token_out: params.to_token.clone(),
                    amount_in: params.from_amount.to_string(),
                };
                self.fallback.fetch_swap(&request).await.map_err(|err| {
                    QuoteError::Exhausted(anyhow!(err).context("fallback swap provider failed"))
                })
            }
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://li.quest/v1".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Primary routing provider over HTTP: `GET {base}/quote`.
pub struct HttpRouteProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuote {
    #[serde(default)]
    tool: Option<String>,
    #[serde(default)]
    estimate: Option<RawEstimate>,
    transaction_request: TxPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEstimate {
    #[serde(default)]
    to_amount: Option<String>,
    #[serde(default)]
    to_amount_min: Option<String>,
}

impl From<RawQuote> for RouteTx {
    // Field promotion of the embedded transaction request, dropping the
    // inner object. Explicit on purpose so unexpected provider fields never
    // ride along into the payload.
    fn from(raw: RawQuote) -> Self {
        let (to_amount, to_amount_min) = match raw.estimate {
            Some(estimate) => (estimate.to_amount, estimate.to_amount_min),
            None => (None, None),
        };
        RouteTx {
            tool: raw.tool,
            to_amount,
            to_amount_min,
            tx: raw.transaction_request,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    message: String,
}

impl HttpRouteProvider {
    pub fn new(cfg: &RouterConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .context("building route provider client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl RouteProvider for HttpRouteProvider {
    async fn fetch_quote(&self, params: &QuoteParams) -> Result<RouteTx, QuoteError> {
        let url = format!("{}/quote", self.base_url);
        let mut request = self.client.get(&url).query(&[
            ("fromChain", params.from_chain_id.to_string()),
            ("toChain", params.to_chain_id.to_string()),
            ("fromToken", params.from_token.clone()),
            ("toToken", params.to_token.clone()),
            ("fromAmount", params.from_amount.to_string()),
            ("fromAddress", params.from_address.to_string()),
            ("toAddress", params.to_address.to_string()),
            ("order", params.order.as_str().to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        info!(
            "requesting quote: chain {} -> {}, {} -> {}",
            params.from_chain_id, params.to_chain_id, params.from_token, params.to_token
        );

        let response = request
            .send()
            .await
            .context("quote request")
            .map_err(QuoteError::Provider)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND {
                if let Ok(parsed) = serde_json::from_str::<ProviderErrorBody>(&body) {
                    if parsed.message == NO_ROUTE_MESSAGE {
                        return Err(QuoteError::NoRoute);
                    }
                }
            }
            return Err(QuoteError::Provider(anyhow!(
                "quote request failed with status {}: {}",
                status,
                body
            )));
        }

        let raw: RawQuote = response
            .json()
            .await
            .context("decoding quote response")
            .map_err(QuoteError::Provider)?;
        Ok(raw.into())
    }
}

#[derive(Debug, Clone)]
pub struct SwapRouterConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for SwapRouterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.enso.finance/api/v1/shortcuts/route".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Fallback swap-routing provider over HTTP.
pub struct HttpSwapProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSwap {
    #[serde(default)]
    amount_out: Option<String>,
    tx: TxPayload,
}

impl HttpSwapProvider {
    pub fn new(cfg: &SwapRouterConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .context("building swap provider client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl SwapProvider for HttpSwapProvider {
    async fn fetch_swap(&self, swap: &SwapRequest) -> Result<RouteTx, QuoteError> {
        let mut request = self.client.post(&self.base_url).json(swap);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .context("swap route request")
            .map_err(QuoteError::Provider)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuoteError::Provider(anyhow!(
                "swap route request failed with status {}: {}",
                status,
                body
            )));
        }

        let raw: RawSwap = response
            .json()
            .await
            .context("decoding swap route response")
            .map_err(QuoteError::Provider)?;
        Ok(RouteTx {
            tool: None,
            to_amount: raw.amount_out,
            to_amount_min: None,
            tx: raw.tx,
        })
    }
}
