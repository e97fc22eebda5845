use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Precision assumed for tokens the registry does not know. Unknown tokens
/// are assumed to follow the common 18-decimal convention; this is a named
/// policy, not an error path.
pub const DEFAULT_DECIMALS: u8 = 18;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub symbol: String,
    pub decimals: u8,
}

/// Maps token contract addresses (lowercased) to their metadata.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: HashMap<String, TokenMetadata>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the well-known mainnet set.
    pub fn with_known_tokens() -> Self {
        let mut registry = Self::new();
        for (address, symbol, decimals) in [
            ("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "USDC", 6u8),
            ("0xdAC17F958D2ee523a2206206994597C13D831ec7", "USDT", 6),
            ("0x6B175474E89094C44Da98b954EedeAC495271d0F", "DAI", 18),
            ("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", "WETH", 18),
            ("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", "WBTC", 8),
        ] {
            registry.register(
                address,
                TokenMetadata {
                    symbol: symbol.to_string(),
                    decimals,
                },
            );
        }
        registry
    }

    pub fn register(&mut self, address: &str, metadata: TokenMetadata) {
        self.tokens.insert(address.to_lowercase(), metadata);
    }

    pub fn lookup(&self, address: &str) -> Option<&TokenMetadata> {
        self.tokens.get(&address.to_lowercase())
    }

    pub fn decimals_or_default(&self, address: &str) -> u8 {
        match self.lookup(address) {
            Some(metadata) => metadata.decimals,
            None => {
                debug!("no metadata for token {}, defaulting to {} decimals", address, DEFAULT_DECIMALS);
                DEFAULT_DECIMALS
            }
        }
    }
}
