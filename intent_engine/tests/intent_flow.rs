//! End-to-end flow: structured intents -> built transactions -> per-chain
//! steps -> atomic bundle, with fake providers standing in for the network.

use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, Bytes, U256};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use intent_engine::{
    build_bundle, group_by_chain, Action, AliasResolver, Chain, Intent, IntentBuilder,
    QuoteAggregator, QuoteError, QuoteParams, RouteProvider, RouteTx, SwapProvider, SwapRequest,
    TokenRegistry, TxPayload, NATIVE_TOKEN_ADDRESS,
};

const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
const RECEIVER: &str = "0x589A698b7b7dA0Bec545177D3963A2741105C7C9";

fn wallet() -> Address {
    "0x1111111111111111111111111111111111111111".parse().unwrap()
}

struct AliasBook;

#[async_trait]
impl AliasResolver for AliasBook {
    async fn resolve(&self, name: &str) -> Result<Option<Address>> {
        if name == "alice.eth" {
            Ok(Some(RECEIVER.parse().unwrap()))
        } else {
            Ok(None)
        }
    }
}

struct FakeRouter {
    quotes: Mutex<Vec<QuoteParams>>,
}

#[async_trait]
impl RouteProvider for FakeRouter {
    async fn fetch_quote(&self, params: &QuoteParams) -> Result<RouteTx, QuoteError> {
        self.quotes.lock().unwrap().push(params.clone());
        Ok(RouteTx {
            tool: Some("across".to_string()),
            to_amount: Some(params.from_amount.to_string()),
            to_amount_min: None,
            tx: TxPayload {
                to: "0x2222222222222222222222222222222222222222".parse().unwrap(),
                data: Bytes::from(vec![0xaa, 0xbb]),
                value: U256::ZERO,
                from: None,
                gas_limit: Some(U256::from(400_000u64)),
                chain_id: Some(params.from_chain_id),
            },
        })
    }
}

struct NoFallback;

#[async_trait]
impl SwapProvider for NoFallback {
    async fn fetch_swap(&self, _request: &SwapRequest) -> Result<RouteTx, QuoteError> {
        Err(QuoteError::Provider(anyhow::anyhow!("unexpected fallback")))
    }
}

fn engine() -> (IntentBuilder, Arc<FakeRouter>) {
    let router = Arc::new(FakeRouter {
        quotes: Mutex::new(Vec::new()),
    });
    let builder = IntentBuilder::new(
        Arc::new(AliasBook),
        TokenRegistry::with_known_tokens(),
        QuoteAggregator::new(router.clone(), Arc::new(NoFallback)),
    );
    (builder, router)
}

#[tokio::test]
async fn test_send_then_bridge_bundles_per_chain() {
    let (builder, router) = engine();
    let mainnet = Chain {
        chain_id: 1,
        name: Some("ethereum".to_string()),
    };

    let send = Intent::from_json(json!({
        "type": "send",
        "receiver": "alice.eth",
        "token": {"symbol": "ETH", "address": NATIVE_TOKEN_ADDRESS},
        "amount": 0.5
    }))
    .unwrap();

    let bridge = Intent::from_json(json!({
        "type": "bridge",
        "fromChain": {"chain_id": 1, "name": "ethereum"},
        "toChain": {"chain_id": 8453, "name": "base"},
        "fromToken": {"symbol": "USDC", "address": USDC},
        "toToken": {"symbol": "USDC", "address": USDC},
        "amount": 250
    }))
    .unwrap();

    let send_tx = builder
        .build_transaction(&send, &mainnet, wallet())
        .await
        .unwrap();
    let bridge_tx = builder
        .build_transaction(&bridge, &mainnet, wallet())
        .await
        .unwrap();

    // The alias resolved before the payload was built.
    assert_eq!(send_tx.to, RECEIVER.parse::<Address>().unwrap());
    assert!(send_tx.data.is_empty());
    assert_eq!(send_tx.value, U256::from(500_000_000_000_000_000u64));

    // The router saw USDC's 6-decimal base units.
    let quotes = router.quotes.lock().unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].from_amount, U256::from(250_000_000u64));
    assert_eq!(quotes[0].to_chain_id, 8453);
    drop(quotes);

    let actions = vec![
        Action {
            tx_data: send_tx,
        },
        Action {
            tx_data: bridge_tx,
        },
    ];
    let steps = group_by_chain(&actions, 1);
    assert_eq!(steps.len(), 1, "both transactions originate on mainnet");
    assert_eq!(steps[0].chain_id, 1);
    assert_eq!(steps[0].txs.len(), 2);

    let bundle = build_bundle(steps, 10, "USDC");
    let wire = serde_json::to_value(&bundle).unwrap();
    assert_eq!(wire["feeTx"]["chainId"], 10);
    assert_eq!(wire["feeTx"]["token"], "USDC");
    assert_eq!(wire["steps"][0]["txs"].as_array().unwrap().len(), 2);
}
