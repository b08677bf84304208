//! # Swapdesk Onchain Library - Contract Access Layer
//!
//! ## Purpose
//!
//! Typed access to the deployed pair exchange and its two ERC-20 tokens over
//! JSON-RPC. Wraps call encoding, submission, and receipt polling behind
//! small traits so the session layer never handles raw calldata and tests
//! never need a live node.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Signing key from the environment, RPC endpoint and
//!   contract addresses from session configuration
//! - **Output Destinations**: Session controller and transaction orchestrator
//!   in `swapdesk-session`
//! - **Trait Seams**: [`WalletProvider`], [`TokenContract`],
//!   [`ExchangeContract`], [`PendingTx`]; production implementations are
//!   `ethers`-backed, test doubles are scripted
//! - **Transport**: Pooled HTTP connections reused across balance, quote, and
//!   submission traffic
//!
//! ## Architecture Role
//!
//! Everything that touches the chain lives here. Above this crate the code
//! deals in `U256` amounts and typed errors; below it is `ethabi` calldata
//! and the node's RPC surface.

pub mod abi;
pub mod contracts;
pub mod error;
pub mod exchange;
pub mod pending;
pub mod provider;
pub mod tokens;
pub mod wallet;

pub use contracts::{ExchangeContract, PendingTx, SwapDirection, TokenContract, TxConfirmation};
pub use error::{CallError, WalletError};
pub use exchange::EthExchange;
pub use pending::EthPendingTx;
pub use provider::{http_provider, ConfirmPolicy, NodeClient};
pub use tokens::EthToken;
pub use wallet::{NodeWallet, PairAddresses, SessionHandles, WalletProvider};

/// Chain primitive types, re-exported so dependents do not need a direct
/// `ethers` dependency.
pub use ethers::types::{Address, H256, U256};
