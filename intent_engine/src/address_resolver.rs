use std::time::Duration;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

#[async_trait]
pub trait AliasResolver: Send + Sync {
    /// Looks an alias up; `Ok(None)` means "no mapping", which is not an
    /// error. Transport failures surface as `Err` and are swallowed by
    /// `resolve_receiver`.
    async fn resolve(&self, name: &str) -> Result<Option<Address>>;
}

/// Resolves a receiver reference to a hex address, degrading to pass-through
/// on miss or lookup failure. Unresolvable input is treated as already being
/// a valid address; validation happens where the payload is built.
pub async fn resolve_receiver(resolver: &dyn AliasResolver, receiver: &str) -> String {
    match resolver.resolve(receiver).await {
        Ok(Some(address)) => {
            debug!("resolved receiver {} to {}", receiver, address);
            address.to_string()
        }
        Ok(None) => receiver.to_string(),
        Err(err) => {
            warn!("alias resolution for {} failed, using input as-is: {:#}", receiver, err);
            receiver.to_string()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.ensideas.com/ens/resolve".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Name-service lookup over HTTP (`GET {base}/{name}` -> `{"address": ...}`).
pub struct HttpAliasResolver {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    address: Option<Address>,
}

impl HttpAliasResolver {
    pub fn new(cfg: &ResolverConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .context("building alias resolver client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AliasResolver for HttpAliasResolver {
    async fn resolve(&self, name: &str) -> Result<Option<Address>> {
        // Raw hex addresses need no lookup.
        if name.parse::<Address>().is_ok() {
            return Ok(None);
        }

        let url = format!("{}/{}", self.base_url, name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("alias lookup request")?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let body: ResolveResponse = response.json().await.context("alias lookup body")?;
        Ok(body.address)
    }
}
