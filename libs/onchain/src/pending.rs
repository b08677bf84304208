//! Receipt polling for submitted transactions.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::types::H256;
use tracing::{debug, info, warn};

use crate::contracts::{PendingTx, TxConfirmation};
use crate::error::CallError;
use crate::provider::{ConfirmPolicy, NodeClient};

/// Pending transaction backed by a node client.
///
/// Holds only the hash and a client reference, so the handle can outlive the
/// call that produced it.
pub struct EthPendingTx {
    tx_hash: H256,
    client: Arc<NodeClient>,
    policy: ConfirmPolicy,
}

impl EthPendingTx {
    pub fn new(tx_hash: H256, client: Arc<NodeClient>, policy: ConfirmPolicy) -> Self {
        Self {
            tx_hash,
            client,
            policy,
        }
    }
}

#[async_trait]
impl PendingTx for EthPendingTx {
    fn tx_hash(&self) -> H256 {
        self.tx_hash
    }

    async fn confirmed(self: Box<Self>) -> Result<TxConfirmation, CallError> {
        debug!("⏳ Monitoring confirmation for tx: 0x{:x}", self.tx_hash);

        let start_time = Instant::now();
        loop {
            if start_time.elapsed() > self.policy.wait_bound {
                return Err(CallError::ConfirmationTimeout {
                    tx_hash: self.tx_hash,
                    waited_secs: self.policy.wait_bound.as_secs(),
                });
            }

            match self.client.get_transaction_receipt(self.tx_hash).await {
                Ok(Some(receipt)) => {
                    if receipt.status.map(|s| s.as_u64()) == Some(0) {
                        return Err(CallError::Reverted {
                            tx_hash: self.tx_hash,
                        });
                    }
                    info!(
                        "✅ Transaction confirmed in block {}: 0x{:x}",
                        receipt.block_number.unwrap_or_default(),
                        self.tx_hash
                    );
                    return Ok(TxConfirmation {
                        tx_hash: self.tx_hash,
                        block_number: receipt.block_number.map(|b| b.as_u64()),
                        gas_used: receipt.gas_used,
                    });
                }
                Ok(None) => {
                    // Still pending, continue polling
                    tokio::time::sleep(self.policy.poll_interval).await;
                    continue;
                }
                Err(e) => {
                    warn!("Error checking transaction receipt: {}", e);
                    tokio::time::sleep(self.policy.poll_interval).await;
                    continue;
                }
            }
        }
    }
}
