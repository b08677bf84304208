//! Session state shared across the console views.
//!
//! One `SessionState` instance, owned by the controller, holds everything the
//! original page kept in scattered component state: the connected account,
//! the swap direction, the three amount fields, and the last published
//! balance snapshot.

use amounts::AmountParseError;
use onchain::{Address, SwapDirection, U256};

/// Which leg of the pair a field or balance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSide {
    Base,
    Quote,
}

impl TokenSide {
    pub fn other(self) -> Self {
        match self {
            TokenSide::Base => TokenSide::Quote,
            TokenSide::Quote => TokenSide::Base,
        }
    }

    /// The side whose field drives a swap in `direction`.
    pub fn source_of(direction: SwapDirection) -> Self {
        match direction {
            SwapDirection::BaseToQuote => TokenSide::Base,
            SwapDirection::QuoteToBase => TokenSide::Quote,
        }
    }

    /// The side whose field is derived in `direction`.
    pub fn destination_of(direction: SwapDirection) -> Self {
        Self::source_of(direction).other()
    }
}

/// User-entered decimal text for one amount input.
///
/// Empty text means "no amount". It is never treated as zero; operations
/// must skip or reject instead of transacting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountField {
    text: String,
}

impl AmountField {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Scaled on-chain value of the entered text.
    pub fn parse_scaled(&self, scale: u32) -> Result<U256, AmountParseError> {
        amounts::parse_units(&self.text, scale)
    }
}

/// Last published balances, display-formatted. Defaults to zeros until the
/// first load succeeds; a failed load keeps the previous snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub base: String,
    pub quote: String,
    pub pool_share: String,
}

impl Default for BalanceSnapshot {
    fn default() -> Self {
        Self {
            base: "0".to_string(),
            quote: "0".to_string(),
            pool_share: "0".to_string(),
        }
    }
}

/// Everything the console renders from.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub account: Option<Address>,
    pub direction: SwapDirection,
    pub base_amount: AmountField,
    pub quote_amount: AmountField,
    pub share_amount: AmountField,
    pub balances: BalanceSnapshot,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            account: None,
            direction: SwapDirection::BaseToQuote,
            base_amount: AmountField::default(),
            quote_amount: AmountField::default(),
            share_amount: AmountField::default(),
            balances: BalanceSnapshot::default(),
        }
    }
}

impl SessionState {
    pub fn field(&self, side: TokenSide) -> &AmountField {
        match side {
            TokenSide::Base => &self.base_amount,
            TokenSide::Quote => &self.quote_amount,
        }
    }

    pub fn field_mut(&mut self, side: TokenSide) -> &mut AmountField {
        match side {
            TokenSide::Base => &mut self.base_amount,
            TokenSide::Quote => &mut self.quote_amount,
        }
    }

    pub fn source_side(&self) -> TokenSide {
        TokenSide::source_of(self.direction)
    }

    pub fn destination_side(&self) -> TokenSide {
        TokenSide::destination_of(self.direction)
    }

    /// The field driving a swap at the current direction.
    pub fn source_field(&self) -> &AmountField {
        self.field(self.source_side())
    }
}
