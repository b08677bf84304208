//! Wallet session establishment.
//!
//! `WalletProvider` is the seam the session layer connects through: one call
//! yields the authorized account plus signer-bound handles for both tokens
//! and the exchange. The production implementation signs locally with a key
//! taken from the environment; tests substitute scripted providers.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use tracing::info;

use crate::contracts::{ExchangeContract, TokenContract};
use crate::error::WalletError;
use crate::exchange::EthExchange;
use crate::provider::{http_provider, ConfirmPolicy};
use crate::tokens::EthToken;

/// Deployed addresses of the pair and its exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairAddresses {
    pub base_token: Address,
    pub quote_token: Address,
    pub exchange: Address,
}

/// Everything an authorized session needs to read balances and submit
/// transactions.
#[derive(Clone)]
pub struct SessionHandles {
    pub account: Address,
    pub base_token: Arc<dyn TokenContract>,
    pub quote_token: Arc<dyn TokenContract>,
    pub exchange: Arc<dyn ExchangeContract>,
}

impl fmt::Debug for SessionHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The contract handles are opaque trait objects; only the account
        // identifies a session.
        f.debug_struct("SessionHandles")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

/// Source of wallet sessions.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Requests authorization and returns signer-bound contract handles.
    ///
    /// Fails with [`WalletError::NoWallet`] when no signing key is available
    /// at all; calling again after a failure is safe.
    async fn request_session(&self) -> Result<SessionHandles, WalletError>;
}

/// Wallet provider that signs with a local key against a JSON-RPC node.
pub struct NodeWallet {
    rpc_url: String,
    key_env: String,
    chain_id: u64,
    addresses: PairAddresses,
    policy: ConfirmPolicy,
}

impl NodeWallet {
    pub fn new(
        rpc_url: impl Into<String>,
        key_env: impl Into<String>,
        chain_id: u64,
        addresses: PairAddresses,
        policy: ConfirmPolicy,
    ) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            key_env: key_env.into(),
            chain_id,
            addresses,
            policy,
        }
    }
}

#[async_trait]
impl WalletProvider for NodeWallet {
    async fn request_session(&self) -> Result<SessionHandles, WalletError> {
        let raw_key = std::env::var(&self.key_env).map_err(|_| {
            WalletError::NoWallet(format!(
                "signing key environment variable {} is not set",
                self.key_env
            ))
        })?;

        let wallet: LocalWallet = raw_key
            .trim()
            .parse()
            .map_err(|e| WalletError::Unauthorized(format!("signing key rejected: {}", e)))?;
        let wallet = wallet.with_chain_id(self.chain_id);
        let account = wallet.address();

        let provider = http_provider(&self.rpc_url)?;
        let client = Arc::new(SignerMiddleware::new(provider, wallet));

        info!(
            "✅ Wallet session authorized: 0x{:x} (chain {})",
            account, self.chain_id
        );

        Ok(SessionHandles {
            account,
            base_token: Arc::new(EthToken::new(
                self.addresses.base_token,
                Arc::clone(&client),
                self.policy,
            )),
            quote_token: Arc::new(EthToken::new(
                self.addresses.quote_token,
                Arc::clone(&client),
                self.policy,
            )),
            exchange: Arc::new(EthExchange::new(
                self.addresses.exchange,
                client,
                self.policy,
            )),
        })
    }
}
