//! Balance snapshot loading.

use std::sync::Arc;

use onchain::{Address, CallError, ExchangeContract, TokenContract};
use thiserror::Error;
use tracing::debug;

use crate::config::PairScales;
use crate::state::BalanceSnapshot;

/// A snapshot load failed as a whole; no partial snapshot is published and
/// the prior one stays displayed.
#[derive(Debug, Error)]
#[error("balance load failed: {0}")]
pub struct BalanceLoadError(#[from] pub CallError);

/// Fetches the three balances behind one published snapshot.
pub struct BalanceLoader {
    base_token: Arc<dyn TokenContract>,
    quote_token: Arc<dyn TokenContract>,
    exchange: Arc<dyn ExchangeContract>,
    scales: PairScales,
    display_decimals: u32,
}

impl BalanceLoader {
    pub fn new(
        base_token: Arc<dyn TokenContract>,
        quote_token: Arc<dyn TokenContract>,
        exchange: Arc<dyn ExchangeContract>,
        scales: PairScales,
        display_decimals: u32,
    ) -> Self {
        Self {
            base_token,
            quote_token,
            exchange,
            scales,
            display_decimals,
        }
    }

    /// Loads the token balances and the pool-share balance concurrently.
    ///
    /// The three queries are best-effort simultaneous, not transactionally
    /// consistent. Any single failure fails the load.
    pub async fn load(&self, account: Address) -> Result<BalanceSnapshot, BalanceLoadError> {
        let (base, quote, share) = tokio::try_join!(
            self.base_token.balance_of(account),
            self.quote_token.balance_of(account),
            self.exchange.balance_of(account),
        )?;

        let decimals = self.display_decimals as usize;
        let snapshot = BalanceSnapshot {
            base: amounts::format_display(base, self.scales.base, decimals),
            quote: amounts::format_display(quote, self.scales.quote, decimals),
            pool_share: amounts::format_display(share, self.scales.share, decimals),
        };
        debug!(
            "balances for 0x{:x}: base={} quote={} share={}",
            account, snapshot.base, snapshot.quote, snapshot.pool_share
        );
        Ok(snapshot)
    }
}
