use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use unit_util::to_base_units;

use crate::address_resolver::{resolve_receiver, AliasResolver};
use crate::error::IntentError;
use crate::quote::{QuoteAggregator, QuoteParams, RouteOrder};
use crate::token_registry::{TokenRegistry, DEFAULT_DECIMALS};
use crate::types::{Chain, Token, TxPayload};

sol! {
    /// Minimal ERC-20 surface needed to build transfer calldata.
    function transfer(address to, uint256 amount) returns (bool);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendIntent {
    pub receiver: String,
    pub token: Token,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapIntent {
    #[serde(alias = "tokenIn")]
    pub from_token: Token,
    #[serde(alias = "tokenOut")]
    pub to_token: Token,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeIntent {
    pub from_chain: Chain,
    pub to_chain: Chain,
    pub from_token: Token,
    pub to_token: Token,
    pub amount: Decimal,
}

/// A structured request describing a desired on-chain effect, independent of
/// how it will be executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Intent {
    Send(SendIntent),
    Swap(SwapIntent),
    Bridge(BridgeIntent),
}

impl Intent {
    /// Loads an intent from the caller's tagged JSON object. Unknown `type`
    /// is a hard failure; a non-positive amount is rejected here so every
    /// constructed intent satisfies `amount > 0`.
    pub fn from_json(data: serde_json::Value) -> Result<Self, IntentError> {
        let kind = data
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let intent: Intent = match kind.as_str() {
            "send" | "swap" | "bridge" => serde_json::from_value(data)
                .map_err(|err| IntentError::InvalidIntent(err.to_string()))?,
            other => return Err(IntentError::UnknownIntentType(other.to_string())),
        };

        if intent.amount() <= Decimal::ZERO {
            return Err(IntentError::InvalidIntent(format!(
                "amount must be positive, got {}",
                intent.amount()
            )));
        }

        if let Intent::Bridge(bridge) = &intent {
            // Same-chain bridges are accepted and behave as intra-chain
            // swaps at the provider; flagged because they are usually a
            // caller mistake.
            if bridge.from_chain.chain_id == bridge.to_chain.chain_id {
                warn!(
                    "bridge intent with identical source and destination chain {}",
                    bridge.from_chain.chain_id
                );
            }
        }

        Ok(intent)
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Intent::Send(send) => send.amount,
            Intent::Swap(swap) => swap.amount,
            Intent::Bridge(bridge) => bridge.amount,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Send(_) => "send",
            Intent::Swap(_) => "swap",
            Intent::Bridge(_) => "bridge",
        }
    }

    /// Human-readable one-liner for previews and logs.
    pub fn summary(&self) -> String {
        match self {
            Intent::Send(send) => format!(
                "Transfer {} {} to {}",
                send.amount, send.token.symbol, send.receiver
            ),
            Intent::Swap(swap) => format!(
                "Swap {} {} to {}",
                swap.amount, swap.from_token.symbol, swap.to_token.symbol
            ),
            Intent::Bridge(bridge) => format!(
                "Bridge {} {} from {} to {}",
                bridge.amount,
                bridge.from_token.symbol,
                bridge.from_chain.display_name(),
                bridge.to_chain.display_name()
            ),
        }
    }
}

/// Builds unsigned transaction payloads from intents. All collaborators are
/// injected so tests can substitute fakes.
pub struct IntentBuilder {
    resolver: Arc<dyn AliasResolver>,
    registry: TokenRegistry,
    quotes: QuoteAggregator,
}

impl IntentBuilder {
    pub fn new(
        resolver: Arc<dyn AliasResolver>,
        registry: TokenRegistry,
        quotes: QuoteAggregator,
    ) -> Self {
        Self {
            resolver,
            registry,
            quotes,
        }
    }

    /// Turns an intent into one unsigned transaction on the target chain.
    /// No signing, no broadcast, no nonce or gas management.
    pub async fn build_transaction(
        &self,
        intent: &Intent,
        target_chain: &Chain,
        wallet: Address,
    ) -> Result<TxPayload, IntentError> {
        match intent {
            Intent::Send(send) => self.build_send(send, target_chain, wallet).await,
            Intent::Swap(swap) => self.build_swap(swap, target_chain, wallet).await,
            Intent::Bridge(bridge) => self.build_bridge(bridge, target_chain, wallet).await,
        }
    }

    async fn build_send(
        &self,
        send: &SendIntent,
        target_chain: &Chain,
        wallet: Address,
    ) -> Result<TxPayload, IntentError> {
        let receiver = resolve_receiver(self.resolver.as_ref(), &send.receiver).await;
        let receiver: Address = receiver.parse().map_err(|_| {
            IntentError::InvalidIntent(format!("receiver {} is not a valid address", receiver))
        })?;

        if send.token.is_native() {
            let value = to_base_units(send.amount, DEFAULT_DECIMALS)
                .map_err(|err| IntentError::InvalidIntent(err.to_string()))?;
            return Ok(TxPayload {
                to: receiver,
                data: Bytes::new(),
                value,
                from: Some(wallet),
                gas_limit: None,
                chain_id: Some(target_chain.chain_id),
            });
        }

        let contract: Address = send.token.address.parse().map_err(|_| {
            IntentError::InvalidIntent(format!(
                "token address {} is not a valid contract address",
                send.token.address
            ))
        })?;
        let decimals = self.registry.decimals_or_default(&send.token.address);
        let amount = to_base_units(send.amount, decimals)
            .map_err(|err| IntentError::InvalidIntent(err.to_string()))?;
        let calldata = transferCall {
            to: receiver,
            amount,
        }
        .abi_encode();

        Ok(TxPayload {
            to: contract,
            data: calldata.into(),
            value: U256::ZERO,
            from: Some(wallet),
            gas_limit: None,
            chain_id: Some(target_chain.chain_id),
        })
    }

    async fn build_swap(
        &self,
        swap: &SwapIntent,
        target_chain: &Chain,
        wallet: Address,
    ) -> Result<TxPayload, IntentError> {
        let decimals = self.registry.decimals_or_default(&swap.from_token.address);
        let from_amount = to_base_units(swap.amount, decimals)
            .map_err(|err| IntentError::InvalidIntent(err.to_string()))?;

        let route = self
            .quotes
            .get_quote(QuoteParams {
                from_chain_id: target_chain.chain_id,
                to_chain_id: target_chain.chain_id,
                from_token: swap.from_token.address.clone(),
                to_token: swap.to_token.address.clone(),
                from_amount,
                from_address: wallet,
                to_address: wallet,
                order: RouteOrder::Fastest,
            })
            .await?;

        Ok(finalize_route_payload(
            route.tx,
            wallet,
            target_chain.chain_id,
        ))
    }

    async fn build_bridge(
        &self,
        bridge: &BridgeIntent,
        _target_chain: &Chain,
        wallet: Address,
    ) -> Result<TxPayload, IntentError> {
        let decimals = self
            .registry
            .decimals_or_default(&bridge.from_token.address);
        let from_amount = to_base_units(bridge.amount, decimals)
            .map_err(|err| IntentError::InvalidIntent(err.to_string()))?;

        let route = self
            .quotes
            .get_quote(QuoteParams {
                from_chain_id: bridge.from_chain.chain_id,
                to_chain_id: bridge.to_chain.chain_id,
                from_token: bridge.from_token.address.clone(),
                to_token: bridge.to_token.address.clone(),
                from_amount,
                from_address: wallet,
                to_address: wallet,
                order: RouteOrder::Fastest,
            })
            .await?;

        Ok(finalize_route_payload(
            route.tx,
            wallet,
            bridge.from_chain.chain_id,
        ))
    }
}

/// Providers do not always echo sender and chain id back; fill them in so
/// every built payload is self-describing for the batcher.
fn finalize_route_payload(mut tx: TxPayload, wallet: Address, origin_chain_id: u64) -> TxPayload {
    if tx.from.is_none() {
        tx.from = Some(wallet);
    }
    if tx.chain_id.is_none() {
        tx.chain_id = Some(origin_chain_id);
    }
    tx
}
