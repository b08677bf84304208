//! Error types for wallet sessions and contract calls.

use ethers::types::H256;
use thiserror::Error;

/// Failures raised while establishing a wallet session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No signing key is available in the environment.
    #[error("no wallet available: {0}")]
    NoWallet(String),

    /// A key was present but could not be used to authorize a session.
    #[error("wallet authorization failed: {0}")]
    Unauthorized(String),

    /// The RPC endpoint could not be reached or was misconfigured.
    #[error("rpc endpoint unusable: {0}")]
    Endpoint(String),
}

/// Failures raised by contract reads, writes, and confirmation waits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// Calldata could not be encoded for the target function.
    #[error("abi encoding failed: {0}")]
    Encode(String),

    /// The node rejected the request or the transport failed.
    #[error("rpc call failed: {0}")]
    Rpc(String),

    /// The node answered but the return data did not match the ABI.
    #[error("malformed contract return data: {0}")]
    ReturnData(String),

    /// The transaction was mined with a failure status.
    #[error("transaction 0x{tx_hash:x} reverted on chain")]
    Reverted { tx_hash: H256 },

    /// No receipt appeared within the configured wait bound.
    #[error("no confirmation for transaction 0x{tx_hash:x} within {waited_secs}s")]
    ConfirmationTimeout { tx_hash: H256, waited_secs: u64 },
}

impl CallError {
    /// Hash of the submitted transaction, when the failure happened after
    /// submission.
    pub fn tx_hash(&self) -> Option<H256> {
        match self {
            CallError::Reverted { tx_hash } | CallError::ConfirmationTimeout { tx_hash, .. } => {
                Some(*tx_hash)
            }
            _ => None,
        }
    }
}
