//! # Transaction Orchestrator - Sequenced Mutating Operations
//!
//! ## Purpose
//!
//! Runs the three mutating flows (swap, add liquidity, remove liquidity) as
//! strict step sequences against the pair contracts: validate, approve where
//! the flow requires it, submit the action call, await confirmation. One
//! advisory gate marks an operation in flight; failure at any step aborts
//! the remaining steps and reports the step that failed.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Amount text and direction from the session
//!   controller, signer-bound contract handles from the wallet session
//! - **Output Destinations**: Notification sink (user-visible outcome),
//!   operation gate (drives balance reloads in the controller)
//! - **Failure Classification**: [`ValidationRejection`] before any network
//!   call, [`TransactionFailure`] with the failing step afterwards
//!
//! ## Architecture Role
//!
//! ```text
//! Controller Command → [Validate] → [Approve] → [Action Call] → [Confirm]
//!        ↓                 ↓            ↓             ↓              ↓
//! Gate: Submitting      Rejected     Failed        Failed      Confirming
//!        ↓                 ↓            ↓             ↓              ↓
//!      ...                Idle         Idle          Idle      Idle + reload
//! ```
//!
//! Completed steps are never compensated: an approval that landed before a
//! later step failed stays in place, and the next attempt re-approves.

use std::fmt;
use std::sync::Arc;

use amounts::AmountParseError;
use onchain::{Address, CallError, ExchangeContract, SwapDirection, TokenContract, H256, U256};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{PairScales, PairSymbols};
use crate::notify::{Notification, NotificationSink};

/// Lifecycle of one mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationPhase {
    #[default]
    Idle,
    /// Steps up to and including the action call submission.
    Submitting,
    /// Waiting for the action call's receipt.
    Confirming,
}

/// The single in-flight gate.
///
/// Advisory: callers must check [`OperationGate::in_flight`] before starting
/// a mutating operation; the orchestrator serializes nothing on its own.
#[derive(Debug, Clone, Default)]
pub struct OperationGate {
    phase: Arc<RwLock<OperationPhase>>,
}

impl OperationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> OperationPhase {
        *self.phase.read()
    }

    pub fn in_flight(&self) -> bool {
        self.phase() != OperationPhase::Idle
    }

    fn set(&self, phase: OperationPhase) {
        *self.phase.write() = phase;
    }
}

/// The three mutating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Swap,
    AddLiquidity,
    RemoveLiquidity,
}

impl OperationKind {
    pub fn success_text(self) -> &'static str {
        match self {
            OperationKind::Swap => "Swap successful!",
            OperationKind::AddLiquidity => "Liquidity added!",
            OperationKind::RemoveLiquidity => "Liquidity removed!",
        }
    }

    pub fn failure_prefix(self) -> &'static str {
        match self {
            OperationKind::Swap => "Swap",
            OperationKind::AddLiquidity => "Add liquidity",
            OperationKind::RemoveLiquidity => "Remove liquidity",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Swap => write!(f, "swap"),
            OperationKind::AddLiquidity => write!(f, "add liquidity"),
            OperationKind::RemoveLiquidity => write!(f, "remove liquidity"),
        }
    }
}

/// The step at which a sequence failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStep {
    /// Approval of the named token.
    Approval { symbol: String },
    /// Submission of the action call itself.
    Action,
    /// The confirmation wait after submission.
    Confirmation,
}

impl fmt::Display for OperationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationStep::Approval { symbol } => write!(f, "approval of {}", symbol),
            OperationStep::Action => write!(f, "submission"),
            OperationStep::Confirmation => write!(f, "confirmation"),
        }
    }
}

/// Input was rejected before any network call was made.
#[derive(Debug, Error)]
pub enum ValidationRejection {
    #[error("no amount entered for {field}")]
    EmptyAmount { field: String },

    #[error("amount for {field} rejected: {source}")]
    BadAmount {
        field: String,
        #[source]
        source: AmountParseError,
    },
}

/// A step of a mutating sequence failed; the remaining steps were aborted
/// and whatever the completed steps did on chain stands.
#[derive(Debug, Error)]
#[error("{operation} failed during {step}: {source}")]
pub struct TransactionFailure {
    pub operation: OperationKind,
    pub step: OperationStep,
    #[source]
    pub source: CallError,
}

impl TransactionFailure {
    /// Step plus underlying reason, as shown in the failure notification.
    pub fn detail(&self) -> String {
        format!("{}: {}", self.step, self.source)
    }
}

/// How one orchestrated operation ended.
#[derive(Debug)]
pub enum OperationOutcome {
    /// Every step completed and the action call confirmed on chain.
    Completed { tx_hash: H256 },
    /// Validation blocked the operation; nothing was sent.
    Rejected(ValidationRejection),
    /// A later step failed; earlier steps' effects stand.
    Failed(TransactionFailure),
}

impl OperationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, OperationOutcome::Completed { .. })
    }
}

/// Sequences approval and action calls for the three mutating flows.
pub struct Orchestrator {
    base_token: Arc<dyn TokenContract>,
    quote_token: Arc<dyn TokenContract>,
    exchange: Arc<dyn ExchangeContract>,
    /// Address approvals authorize to move tokens (the exchange).
    spender: Address,
    scales: PairScales,
    symbols: PairSymbols,
    gate: OperationGate,
    notifier: Arc<dyn NotificationSink>,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base_token: Arc<dyn TokenContract>,
        quote_token: Arc<dyn TokenContract>,
        exchange: Arc<dyn ExchangeContract>,
        spender: Address,
        scales: PairScales,
        symbols: PairSymbols,
        gate: OperationGate,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            base_token,
            quote_token,
            exchange,
            spender,
            scales,
            symbols,
            gate,
            notifier,
        }
    }

    /// Swap: approve the source token, submit the directional swap call,
    /// await its confirmation.
    pub async fn swap(&self, direction: SwapDirection, source_text: &str) -> OperationOutcome {
        self.gate.set(OperationPhase::Submitting);
        let outcome = self.swap_steps(direction, source_text).await;
        self.gate.set(OperationPhase::Idle);
        self.report(OperationKind::Swap, &outcome);
        outcome
    }

    /// Add liquidity: approve both tokens sequentially, submit the add call,
    /// await its confirmation.
    pub async fn add_liquidity(&self, base_text: &str, quote_text: &str) -> OperationOutcome {
        self.gate.set(OperationPhase::Submitting);
        let outcome = self.add_liquidity_steps(base_text, quote_text).await;
        self.gate.set(OperationPhase::Idle);
        self.report(OperationKind::AddLiquidity, &outcome);
        outcome
    }

    /// Remove liquidity: submit the remove call and await its confirmation.
    /// No approval step; the call burns the caller's own pool shares.
    pub async fn remove_liquidity(&self, share_text: &str) -> OperationOutcome {
        self.gate.set(OperationPhase::Submitting);
        let outcome = self.remove_liquidity_steps(share_text).await;
        self.gate.set(OperationPhase::Idle);
        self.report(OperationKind::RemoveLiquidity, &outcome);
        outcome
    }

    async fn swap_steps(&self, direction: SwapDirection, source_text: &str) -> OperationOutcome {
        let (source_token, source_symbol, source_scale) = match direction {
            SwapDirection::BaseToQuote => {
                (&self.base_token, self.symbols.base.as_str(), self.scales.base)
            }
            SwapDirection::QuoteToBase => (
                &self.quote_token,
                self.symbols.quote.as_str(),
                self.scales.quote,
            ),
        };

        let amount = match validate_amount(source_symbol, source_text, source_scale) {
            Ok(amount) => amount,
            Err(rejection) => return OperationOutcome::Rejected(rejection),
        };

        info!("🔄 Swap {} {} ({})", source_text, source_symbol, direction);

        if let Err(source) = source_token.approve(self.spender, amount).await {
            return OperationOutcome::Failed(TransactionFailure {
                operation: OperationKind::Swap,
                step: OperationStep::Approval {
                    symbol: source_symbol.to_string(),
                },
                source,
            });
        }

        let submitted = match direction {
            SwapDirection::BaseToQuote => self.exchange.swap_base_to_quote(amount).await,
            SwapDirection::QuoteToBase => self.exchange.swap_quote_to_base(amount).await,
        };
        let pending = match submitted {
            Ok(pending) => pending,
            Err(source) => {
                return OperationOutcome::Failed(TransactionFailure {
                    operation: OperationKind::Swap,
                    step: OperationStep::Action,
                    source,
                })
            }
        };

        self.gate.set(OperationPhase::Confirming);
        match pending.confirmed().await {
            Ok(confirmation) => OperationOutcome::Completed {
                tx_hash: confirmation.tx_hash,
            },
            Err(source) => OperationOutcome::Failed(TransactionFailure {
                operation: OperationKind::Swap,
                step: OperationStep::Confirmation,
                source,
            }),
        }
    }

    async fn add_liquidity_steps(&self, base_text: &str, quote_text: &str) -> OperationOutcome {
        // Both fields are validated before the first approval goes out.
        let base_amount = match validate_amount(&self.symbols.base, base_text, self.scales.base) {
            Ok(amount) => amount,
            Err(rejection) => return OperationOutcome::Rejected(rejection),
        };
        let quote_amount =
            match validate_amount(&self.symbols.quote, quote_text, self.scales.quote) {
                Ok(amount) => amount,
                Err(rejection) => return OperationOutcome::Rejected(rejection),
            };

        info!(
            "💧 Add liquidity {} {} + {} {}",
            base_text, self.symbols.base, quote_text, self.symbols.quote
        );

        for (token, symbol, amount) in [
            (&self.base_token, &self.symbols.base, base_amount),
            (&self.quote_token, &self.symbols.quote, quote_amount),
        ] {
            if let Err(source) = token.approve(self.spender, amount).await {
                return OperationOutcome::Failed(TransactionFailure {
                    operation: OperationKind::AddLiquidity,
                    step: OperationStep::Approval {
                        symbol: symbol.to_string(),
                    },
                    source,
                });
            }
        }

        let pending = match self.exchange.add_liquidity(base_amount, quote_amount).await {
            Ok(pending) => pending,
            Err(source) => {
                return OperationOutcome::Failed(TransactionFailure {
                    operation: OperationKind::AddLiquidity,
                    step: OperationStep::Action,
                    source,
                })
            }
        };

        self.gate.set(OperationPhase::Confirming);
        match pending.confirmed().await {
            Ok(confirmation) => OperationOutcome::Completed {
                tx_hash: confirmation.tx_hash,
            },
            Err(source) => OperationOutcome::Failed(TransactionFailure {
                operation: OperationKind::AddLiquidity,
                step: OperationStep::Confirmation,
                source,
            }),
        }
    }

    async fn remove_liquidity_steps(&self, share_text: &str) -> OperationOutcome {
        let amount = match validate_amount(&self.symbols.share, share_text, self.scales.share) {
            Ok(amount) => amount,
            Err(rejection) => return OperationOutcome::Rejected(rejection),
        };

        info!("🔥 Remove liquidity {} {}", share_text, self.symbols.share);

        let pending = match self.exchange.remove_liquidity(amount).await {
            Ok(pending) => pending,
            Err(source) => {
                return OperationOutcome::Failed(TransactionFailure {
                    operation: OperationKind::RemoveLiquidity,
                    step: OperationStep::Action,
                    source,
                })
            }
        };

        self.gate.set(OperationPhase::Confirming);
        match pending.confirmed().await {
            Ok(confirmation) => OperationOutcome::Completed {
                tx_hash: confirmation.tx_hash,
            },
            Err(source) => OperationOutcome::Failed(TransactionFailure {
                operation: OperationKind::RemoveLiquidity,
                step: OperationStep::Confirmation,
                source,
            }),
        }
    }

    fn report(&self, operation: OperationKind, outcome: &OperationOutcome) {
        match outcome {
            OperationOutcome::Completed { tx_hash } => {
                self.notifier.notify(Notification::OperationSucceeded {
                    operation,
                    tx_hash: *tx_hash,
                });
            }
            OperationOutcome::Rejected(rejection) => {
                // Validation failures are logged, never alerted.
                warn!("{} rejected: {}", operation, rejection);
            }
            OperationOutcome::Failed(failure) => {
                warn!("{}", failure);
                self.notifier.notify(Notification::OperationFailed {
                    operation,
                    message: failure.detail(),
                });
            }
        }
    }
}

fn validate_amount(field: &str, text: &str, scale: u32) -> Result<U256, ValidationRejection> {
    if text.trim().is_empty() {
        return Err(ValidationRejection::EmptyAmount {
            field: field.to_string(),
        });
    }
    amounts::parse_units(text, scale).map_err(|source| ValidationRejection::BadAmount {
        field: field.to_string(),
        source,
    })
}
