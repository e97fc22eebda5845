use serde::{Deserialize, Serialize};

use crate::types::TxPayload;

/// One already-built transaction as handed over by the caller (e.g. an
/// agent's prepared action list).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "txData")]
    pub tx_data: TxPayload,
}

/// Ordered transactions that all execute on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStep {
    pub chain_id: u64,
    pub txs: Vec<TxPayload>,
}

/// Names the chain and token used to pay cross-chain execution fees. The
/// amount is computed by the execution network, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFee {
    pub chain_id: u64,
    pub token: String,
}

/// One cross-chain atomic intent: per-chain steps plus the fee instruction,
/// submitted together to the execution network with a bundle signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomicBundle {
    pub steps: Vec<TransactionStep>,
    pub fee_tx: PaymentFee,
}

/// Groups actions into per-chain steps. Step order is the first-seen order
/// of each distinct chain id; this later becomes the execution order of the
/// bundle, so it is deliberate, not incidental. Relative transaction order
/// within a chain is preserved.
pub fn group_by_chain(actions: &[Action], default_chain_id: u64) -> Vec<TransactionStep> {
    let mut steps: Vec<TransactionStep> = Vec::new();
    for action in actions {
        let chain_id = action.tx_data.chain_id.unwrap_or(default_chain_id);
        match steps.iter_mut().find(|step| step.chain_id == chain_id) {
            Some(step) => step.txs.push(action.tx_data.clone()),
            None => steps.push(TransactionStep {
                chain_id,
                txs: vec![action.tx_data.clone()],
            }),
        }
    }
    steps
}

/// Wraps ordered steps plus a fee-payment descriptor into one atomic
/// cross-chain execution request.
pub fn build_bundle(
    steps: Vec<TransactionStep>,
    fee_chain_id: u64,
    fee_token: &str,
) -> AtomicBundle {
    AtomicBundle {
        steps,
        fee_tx: PaymentFee {
            chain_id: fee_chain_id,
            token: fee_token.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, U256};

    fn action(marker: u64, chain_id: Option<u64>) -> Action {
        Action {
            tx_data: TxPayload {
                to: Address::from([0x11; 20]),
                data: Bytes::new(),
                // Marker value so flattened order can be asserted.
                value: U256::from(marker),
                from: None,
                gas_limit: Some(U256::from(21_000u64)),
                chain_id,
            },
        }
    }

    fn markers(steps: &[TransactionStep]) -> Vec<u64> {
        steps
            .iter()
            .flat_map(|step| step.txs.iter().map(|tx| tx.value.to::<u64>()))
            .collect()
    }

    #[test]
    fn test_groups_in_first_seen_chain_order() {
        let actions = vec![
            action(1, Some(1)),
            action(2, Some(10)),
            action(3, Some(1)),
        ];
        let steps = group_by_chain(&actions, 1);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].chain_id, 1);
        assert_eq!(steps[0].txs.len(), 2);
        assert_eq!(steps[1].chain_id, 10);
        assert_eq!(steps[1].txs.len(), 1);
        // Flattened chain-by-chain in first-seen order.
        assert_eq!(markers(&steps), vec![1, 3, 2]);
    }

    #[test]
    fn test_missing_chain_id_uses_default() {
        let actions = vec![action(1, None), action(2, Some(137))];
        let steps = group_by_chain(&actions, 8453);
        assert_eq!(steps[0].chain_id, 8453);
        assert_eq!(steps[1].chain_id, 137);
    }

    #[test]
    fn test_every_step_is_chain_uniform() {
        let actions = vec![
            action(1, Some(1)),
            action(2, None),
            action(3, Some(10)),
            action(4, Some(1)),
        ];
        for step in group_by_chain(&actions, 1) {
            for tx in &step.txs {
                assert_eq!(tx.chain_id.unwrap_or(1), step.chain_id);
            }
        }
    }

    #[test]
    fn test_regrouping_is_idempotent() {
        let actions = vec![
            action(1, Some(1)),
            action(2, Some(10)),
            action(3, Some(1)),
            action(4, Some(137)),
        ];
        let steps = group_by_chain(&actions, 1);

        let flattened: Vec<Action> = steps
            .iter()
            .flat_map(|step| {
                step.txs.iter().map(|tx| Action {
                    tx_data: TxPayload {
                        chain_id: Some(step.chain_id),
                        ..tx.clone()
                    },
                })
            })
            .collect();
        let regrouped = group_by_chain(&flattened, 1);

        assert_eq!(steps, regrouped);
    }

    #[test]
    fn test_bundle_shape() {
        let steps = group_by_chain(&[action(1, Some(1))], 1);
        let bundle = build_bundle(steps, 10, "USDC");
        assert_eq!(bundle.fee_tx.chain_id, 10);
        assert_eq!(bundle.fee_tx.token, "USDC");

        let value = serde_json::to_value(&bundle).unwrap();
        assert!(value.get("steps").is_some());
        assert!(value.get("feeTx").is_some());
        assert!(value["steps"][0].get("chainId").is_some());
        assert!(value["steps"][0].get("txs").is_some());
    }
}
