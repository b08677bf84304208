//! Contract trait seams consumed by the session layer.
//!
//! Production code talks to the chain through these traits so that the
//! orchestration logic can be exercised against scripted doubles in tests.
//! The `Eth*` implementations in this crate back them with a signer-bound
//! `ethers` client.

use std::fmt;

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};

use crate::error::CallError;

/// Which token feeds a swap. The base token is the pair's first leg, the
/// quote token its second; flipping the direction swaps source and
/// destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    BaseToQuote,
    QuoteToBase,
}

impl SwapDirection {
    pub fn flipped(self) -> Self {
        match self {
            SwapDirection::BaseToQuote => SwapDirection::QuoteToBase,
            SwapDirection::QuoteToBase => SwapDirection::BaseToQuote,
        }
    }

    /// Direction flag as the exchange's `getPrice` expects it.
    pub fn is_base_to_quote(self) -> bool {
        matches!(self, SwapDirection::BaseToQuote)
    }
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::BaseToQuote => write!(f, "base->quote"),
            SwapDirection::QuoteToBase => write!(f, "quote->base"),
        }
    }
}

/// Receipt summary for a confirmed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxConfirmation {
    pub tx_hash: H256,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
}

/// A submitted transaction that the node has acknowledged but not yet mined.
///
/// `tx_hash` is available immediately after submission; `confirmed` consumes
/// the handle and resolves once a receipt is found, failing on revert or when
/// the bounded wait expires.
#[async_trait]
pub trait PendingTx: Send {
    fn tx_hash(&self) -> H256;

    async fn confirmed(self: Box<Self>) -> Result<TxConfirmation, CallError>;
}

/// ERC-20 surface of one side of the pair.
#[async_trait]
pub trait TokenContract: Send + Sync {
    /// Authorizes `spender` to move `amount` of this token. Returns as soon
    /// as the node acknowledges the submission.
    async fn approve(&self, spender: Address, amount: U256)
        -> Result<Box<dyn PendingTx>, CallError>;

    async fn balance_of(&self, owner: Address) -> Result<U256, CallError>;

    async fn decimals(&self) -> Result<u8, CallError>;
}

/// The deployed pair exchange.
#[async_trait]
pub trait ExchangeContract: Send + Sync {
    async fn swap_base_to_quote(&self, amount: U256) -> Result<Box<dyn PendingTx>, CallError>;

    async fn swap_quote_to_base(&self, amount: U256) -> Result<Box<dyn PendingTx>, CallError>;

    /// Read-only price query: the output amount the exchange would currently
    /// return for `amount` of the direction's source token.
    async fn quote_price(&self, amount: U256, direction: SwapDirection)
        -> Result<U256, CallError>;

    async fn add_liquidity(
        &self,
        base_amount: U256,
        quote_amount: U256,
    ) -> Result<Box<dyn PendingTx>, CallError>;

    async fn remove_liquidity(&self, share_amount: U256) -> Result<Box<dyn PendingTx>, CallError>;

    /// Pool-share balance held by `owner`.
    async fn balance_of(&self, owner: Address) -> Result<U256, CallError>;
}
