//! # Session Configuration - Deployment and Pair Parameters
//!
//! ## Purpose
//!
//! Configuration management for the pair console providing runtime parameter
//! control without hardcoded values. Supports environment variable overrides,
//! JSON file loading, and validation for the RPC endpoint, the token pair,
//! and the confirmation wait policy.
//!
//! ## Integration Points
//!
//! - **Input Sources**: JSON configuration files, environment variables
//! - **Output Destinations**: Wallet provider construction, amount codec
//!   scales, confirmation polling policy
//! - **Validation**: Complete parameter validation with detailed error reporting
//! - **Serialization**: JSON serialization for configuration persistence and sharing
//! - **Default Management**: Defaults matching the reference pair deployment
//!
//! ## Architecture Role
//!
//! ```text
//! Environment Variables → [Configuration Loading] → Session Components
//!        ↓                        ↓                       ↓
//! JSON Config Files      Parameter Validation     Wallet Provider
//! Deployment Addresses   Type Conversion          Amount Codec Scales
//! Runtime Overrides      Default Application      Confirmation Policy
//! ```

use onchain::{Address, ConfirmPolicy, PairAddresses};
use serde::{Deserialize, Serialize};

/// Decimal scales for the three balances the session tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairScales {
    pub base: u32,
    pub quote: u32,
    pub share: u32,
}

/// Display symbols for notifications and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSymbols {
    pub base: String,
    pub quote: String,
    pub share: String,
}

/// Complete configuration for a pair console session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Node endpoint and signing parameters
    pub network: NetworkConfig,
    /// Token pair and exchange deployment
    pub pair: PairConfig,
    /// Receipt polling parameters
    pub confirmation: ConfirmationConfig,
    /// Balance rendering parameters
    pub display: DisplayConfig,
}

/// Node endpoint and signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// RPC endpoint for blockchain interaction
    pub rpc_url: String,
    /// Chain ID the signer binds to (31337 = local devnet)
    pub chain_id: u64,
    /// Name of the environment variable holding the signing key
    pub key_env: String,
}

/// One side of the pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Display symbol for notifications and logs
    pub symbol: String,
    /// Deployed token contract address
    pub address: String, // Will be parsed to Address when needed
    /// Decimal scale used to convert between text amounts and chain units
    pub decimals: u32,
}

/// Token pair and exchange deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfig {
    /// Base token (the pair's first leg)
    pub base: TokenConfig,
    /// Quote token (the pair's second leg)
    pub quote: TokenConfig,
    /// Deployed pair exchange address
    pub exchange_address: String,
    /// Display symbol for pool shares
    pub share_symbol: String,
    /// Decimal scale of pool-share amounts
    pub share_decimals: u32,
}

/// Receipt polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    /// Receipt poll interval (milliseconds)
    pub poll_interval_ms: u64,
    /// Upper bound on the confirmation wait (seconds)
    pub wait_bound_secs: u64,
}

/// Balance rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Fractional digits shown for balances (amounts are truncated, not rounded)
    pub balance_decimals: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            pair: PairConfig::default(),
            confirmation: ConfirmationConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337, // Local devnet
            key_env: "SWAPDESK_PRIVATE_KEY".to_string(),
        }
    }
}

impl Default for PairConfig {
    fn default() -> Self {
        // Reference pair deployment
        Self {
            base: TokenConfig {
                symbol: "WC".to_string(),
                address: "0xDD175A3998D81C3Ef51aBB9c1Eab2D7a8C795F68".to_string(),
                decimals: 18,
            },
            quote: TokenConfig {
                symbol: "SONIC".to_string(),
                address: "0xfc00000000000000000000000000000000000000".to_string(),
                decimals: 18,
            },
            exchange_address: "0x7c2dbfc3b50605b5c498fec331f4b4f77d2b9822".to_string(),
            share_symbol: "LP".to_string(),
            share_decimals: 18,
        }
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            wait_bound_secs: 300, // 5 minutes
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            balance_decimals: 4,
        }
    }
}

impl SessionConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Override with environment variables if present
        if let Ok(rpc_url) = std::env::var("SWAPDESK_RPC_URL") {
            config.network.rpc_url = rpc_url;
        }

        if let Ok(chain_id) = std::env::var("SWAPDESK_CHAIN_ID") {
            if let Ok(value) = chain_id.parse::<u64>() {
                config.network.chain_id = value;
            }
        }

        if let Ok(key_env) = std::env::var("SWAPDESK_KEY_ENV") {
            config.network.key_env = key_env;
        }

        if let Ok(base) = std::env::var("SWAPDESK_BASE_TOKEN") {
            config.pair.base.address = base;
        }

        if let Ok(quote) = std::env::var("SWAPDESK_QUOTE_TOKEN") {
            config.pair.quote.address = quote;
        }

        if let Ok(exchange) = std::env::var("SWAPDESK_EXCHANGE") {
            config.pair.exchange_address = exchange;
        }

        if let Ok(wait) = std::env::var("SWAPDESK_CONFIRM_WAIT_SECS") {
            if let Ok(value) = wait.parse::<u64>() {
                config.confirmation.wait_bound_secs = value;
            }
        }

        config
    }

    /// Save configuration to a JSON file
    pub fn save_to_file(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.network.rpc_url.is_empty() {
            anyhow::bail!("rpc_url must not be empty");
        }

        if self.network.chain_id == 0 {
            anyhow::bail!("chain_id must be positive");
        }

        if self.network.key_env.is_empty() {
            anyhow::bail!("key_env must name an environment variable");
        }

        for (name, token) in [("base", &self.pair.base), ("quote", &self.pair.quote)] {
            if token.symbol.is_empty() {
                anyhow::bail!("{} token symbol must not be empty", name);
            }
            if token.address.parse::<Address>().is_err() {
                anyhow::bail!("Invalid {} token address format", name);
            }
            // 77 is the last scale at which a one-unit amount still fits in
            // a uint256
            if token.decimals > 77 {
                anyhow::bail!("{} token decimals must be <= 77", name);
            }
        }

        if self.pair.exchange_address.parse::<Address>().is_err() {
            anyhow::bail!("Invalid exchange address format");
        }

        if self.pair.base.address == self.pair.quote.address {
            anyhow::bail!("base and quote tokens must differ");
        }

        if self.pair.share_decimals > 77 {
            anyhow::bail!("share_decimals must be <= 77");
        }

        if self.confirmation.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be positive");
        }

        if self.confirmation.wait_bound_secs == 0 {
            anyhow::bail!("wait_bound_secs must be positive");
        }

        Ok(())
    }

    /// Parsed deployment addresses
    pub fn pair_addresses(&self) -> anyhow::Result<PairAddresses> {
        let base_token = self
            .pair
            .base
            .address
            .parse::<Address>()
            .map_err(|e| anyhow::anyhow!("Invalid base token address: {}", e))?;
        let quote_token = self
            .pair
            .quote
            .address
            .parse::<Address>()
            .map_err(|e| anyhow::anyhow!("Invalid quote token address: {}", e))?;
        let exchange = self
            .pair
            .exchange_address
            .parse::<Address>()
            .map_err(|e| anyhow::anyhow!("Invalid exchange address: {}", e))?;
        Ok(PairAddresses {
            base_token,
            quote_token,
            exchange,
        })
    }

    pub fn confirm_policy(&self) -> ConfirmPolicy {
        ConfirmPolicy::new(
            self.confirmation.poll_interval_ms,
            self.confirmation.wait_bound_secs,
        )
    }

    pub fn scales(&self) -> PairScales {
        PairScales {
            base: self.pair.base.decimals,
            quote: self.pair.quote.decimals,
            share: self.pair.share_decimals,
        }
    }

    pub fn symbols(&self) -> PairSymbols {
        PairSymbols {
            base: self.pair.base.symbol.clone(),
            quote: self.pair.quote.symbol.clone(),
            share: self.pair.share_symbol.clone(),
        }
    }
}
