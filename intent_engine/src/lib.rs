//! Turns structured send/swap/bridge intents into concrete, signable
//! transactions, and groups built transactions into atomic cross-chain
//! execution bundles. Stateless per request; signing and broadcast stay with
//! the caller's account layer.

pub mod address_resolver;
pub mod batcher;
pub mod error;
pub mod intent;
pub mod quote;
pub mod token_registry;
pub mod types;

pub use address_resolver::{resolve_receiver, AliasResolver, HttpAliasResolver, ResolverConfig};
pub use batcher::{build_bundle, group_by_chain, Action, AtomicBundle, PaymentFee, TransactionStep};
pub use error::{IntentError, QuoteError};
pub use intent::{BridgeIntent, Intent, IntentBuilder, SendIntent, SwapIntent};
pub use quote::{
    HttpRouteProvider, HttpSwapProvider, QuoteAggregator, QuoteParams, RouteOrder, RouteProvider,
    RouteTx, RouterConfig, SwapProvider, SwapRequest, SwapRouterConfig,
};
pub use token_registry::{TokenMetadata, TokenRegistry, DEFAULT_DECIMALS};
pub use types::{Chain, Token, TxPayload, NATIVE_TOKEN_ADDRESS, ZERO_ADDRESS};
