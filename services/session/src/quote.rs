//! Read-only output estimation for the swap view.

use std::sync::Arc;

use amounts::AmountParseError;
use onchain::{CallError, ExchangeContract, SwapDirection};
use thiserror::Error;
use tracing::debug;

use crate::config::PairScales;

/// Why an estimate could not be produced.
///
/// The controller maps every variant to the neutral `"0"`; a broken quote
/// must never block input entry or raise a notification.
#[derive(Debug, Error)]
pub enum QuoteFailure {
    #[error("quote input rejected: {0}")]
    Parse(#[from] AmountParseError),

    #[error("price query failed: {0}")]
    Call(#[from] CallError),
}

/// Derives the destination-side amount from the exchange's price function.
pub struct QuoteEstimator {
    exchange: Arc<dyn ExchangeContract>,
    scales: PairScales,
}

impl QuoteEstimator {
    pub fn new(exchange: Arc<dyn ExchangeContract>, scales: PairScales) -> Self {
        Self { exchange, scales }
    }

    /// Estimated output text for `input_text` of the direction's source
    /// token, formatted at the destination token's scale.
    pub async fn estimate(
        &self,
        direction: SwapDirection,
        input_text: &str,
    ) -> Result<String, QuoteFailure> {
        let (source_scale, destination_scale) = match direction {
            SwapDirection::BaseToQuote => (self.scales.base, self.scales.quote),
            SwapDirection::QuoteToBase => (self.scales.quote, self.scales.base),
        };

        let amount = amounts::parse_units(input_text, source_scale)?;
        let output = self.exchange.quote_price(amount, direction).await?;
        let text = amounts::format_units(output, destination_scale);
        debug!("quote {}: {} -> {}", direction, input_text, text);
        Ok(text)
    }
}
