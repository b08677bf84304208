//! JSON-RPC provider construction and confirmation policy.

use std::time::Duration;

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::LocalWallet;
use url::Url;

use crate::error::WalletError;

/// Signer-bound client every contract handle submits through.
pub type NodeClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// How long to poll for a receipt after submission, and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmPolicy {
    pub poll_interval: Duration,
    pub wait_bound: Duration,
}

impl ConfirmPolicy {
    pub fn new(poll_interval_ms: u64, wait_bound_secs: u64) -> Self {
        Self {
            poll_interval: Duration::from_millis(poll_interval_ms),
            wait_bound: Duration::from_secs(wait_bound_secs),
        }
    }
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        // 500ms keeps single-second block times responsive; five minutes is
        // long enough for a congested chain to mine or drop the transaction.
        Self::new(500, 300)
    }
}

/// Builds an HTTP provider with connection pooling so that repeated balance
/// and quote queries reuse the same TCP connection.
pub fn http_provider(rpc_url: &str) -> Result<Provider<Http>, WalletError> {
    let client = reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(60)) // Keep connections alive
        .pool_max_idle_per_host(5)
        .timeout(Duration::from_secs(30)) // Request timeout
        .tcp_keepalive(Duration::from_secs(60))
        .tcp_nodelay(true) // Disable Nagle's algorithm for low latency
        .build()
        .map_err(|e| WalletError::Endpoint(format!("failed to build HTTP client: {}", e)))?;

    let url: Url = rpc_url
        .parse()
        .map_err(|e| WalletError::Endpoint(format!("invalid RPC URL {:?}: {}", rpc_url, e)))?;
    let transport = Http::new_with_client(url, client);
    Ok(Provider::<Http>::new(transport))
}
