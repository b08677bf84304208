//! # Swapdesk Session Service - Client Core for the WC/SONIC Exchange
//!
//! ## Purpose
//! Holds everything a front end needs to drive the exchange pair: parsed
//! amount fields, a balance snapshot, live quote estimation, and the
//! transaction orchestrator that sequences approvals ahead of swaps and
//! liquidity changes. Rendering is left to the caller; this crate owns the
//! state transitions.
//!
//! ## Integration Points
//! - **SessionController**: Facade the driver talks to; owns state and gate
//! - **Orchestrator**: Approval-then-action sequencing with phase tracking
//! - **QuoteEstimator**: Read-only price lookups for the destination field
//! - **BalanceLoader**: All-or-nothing wallet/pool-share snapshot refresh
//! - **onchain**: Wallet sessions and typed contract access underneath
//!
//! ## Architecture Role
//! ```text
//! Console/UI Driver → SessionController → Orchestrator ─┐
//!                          │        │                   ├→ ExchangeContract
//!                          │        ├──→ QuoteEstimator ┘
//!                          │        └──→ BalanceLoader ──→ TokenContract
//!                          └──→ SessionState (fields, snapshot, direction)
//! ```

pub mod balances;
pub mod config;
pub mod controller;
pub mod notify;
pub mod orchestrator;
pub mod quote;
pub mod state;

pub use balances::{BalanceLoadError, BalanceLoader};
pub use config::SessionConfig;
pub use controller::SessionController;
pub use notify::{LogNotifier, Notification, NotificationSink};
pub use orchestrator::{
    OperationGate, OperationKind, OperationOutcome, OperationPhase, OperationStep, Orchestrator,
    TransactionFailure, ValidationRejection,
};
pub use quote::{QuoteEstimator, QuoteFailure};
pub use state::{AmountField, BalanceSnapshot, SessionState, TokenSide};
