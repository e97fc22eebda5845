use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Internal placeholder for a chain's native asset. Distinct from every real
/// contract address; translated to the zero address at provider boundaries.
pub const NATIVE_TOKEN_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// Address routing providers use to mean "native asset".
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub address: String,
}

impl Token {
    pub fn is_native(&self) -> bool {
        self.address.eq_ignore_ascii_case(NATIVE_TOKEN_ADDRESS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub chain_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Chain {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("chain {}", self.chain_id))
    }
}

/// Unsigned transaction payload, the unit consumed by a signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxPayload {
    pub to: Address,
    #[serde(default)]
    pub data: Bytes,
    #[serde(default, deserialize_with = "quantity::deserialize")]
    pub value: U256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "quantity::deserialize_opt"
    )]
    pub gas_limit: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

/// Substitutes the provider-expected zero address for the native sentinel.
pub fn normalize_token_address(address: &str) -> String {
    if address.eq_ignore_ascii_case(NATIVE_TOKEN_ADDRESS) {
        ZERO_ADDRESS.to_string()
    } else {
        address.to_string()
    }
}

/// Quantity fields come back from providers as hex strings, decimal strings
/// or plain numbers depending on the route; accept all three.
pub(crate) mod quantity {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Text(String),
    }

    impl Raw {
        fn into_u256<E: serde::de::Error>(self) -> Result<U256, E> {
            match self {
                Raw::Num(n) => Ok(U256::from(n)),
                Raw::Text(s) => U256::from_str(s.trim()).map_err(E::custom),
            }
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        Raw::deserialize(deserializer)?.into_u256()
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            Some(raw) => raw.into_u256().map(Some),
            None => Ok(None),
        }
    }
}
