//! Session controller: wallet connection, reactive amount handling, and the
//! command surface the console driver calls into.
//!
//! Exactly two handlers re-run quote estimation (`set_source_amount` and the
//! direction setters); destination and liquidity-side writes store text
//! without estimating, which is what structurally rules out the quote
//! feedback loop.

use std::sync::Arc;

use onchain::{Address, SessionHandles, SwapDirection, WalletError, WalletProvider};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::balances::BalanceLoader;
use crate::config::{PairScales, PairSymbols, SessionConfig};
use crate::notify::NotificationSink;
use crate::orchestrator::{OperationGate, OperationOutcome, OperationPhase, Orchestrator};
use crate::quote::QuoteEstimator;
use crate::state::{SessionState, TokenSide};

/// Destination text shown when estimation fails.
const NEUTRAL_QUOTE: &str = "0";

/// Collaborators bound to one wallet session. Rebuilt on every connect.
struct ActiveSession {
    orchestrator: Orchestrator,
    loader: BalanceLoader,
    estimator: QuoteEstimator,
}

/// Owns the session state and runs every user-triggered flow.
pub struct SessionController {
    wallet: Arc<dyn WalletProvider>,
    notifier: Arc<dyn NotificationSink>,
    spender: Address,
    scales: PairScales,
    symbols: PairSymbols,
    display_decimals: u32,
    state: RwLock<SessionState>,
    gate: OperationGate,
    session: RwLock<Option<Arc<ActiveSession>>>,
}

impl SessionController {
    pub fn new(
        config: &SessionConfig,
        wallet: Arc<dyn WalletProvider>,
        notifier: Arc<dyn NotificationSink>,
    ) -> anyhow::Result<Self> {
        let addresses = config.pair_addresses()?;
        Ok(Self {
            wallet,
            notifier,
            spender: addresses.exchange,
            scales: config.scales(),
            symbols: config.symbols(),
            display_decimals: config.display.balance_decimals,
            state: RwLock::new(SessionState::default()),
            gate: OperationGate::new(),
            session: RwLock::new(None),
        })
    }

    /// Requests wallet authorization and binds the contract handles.
    ///
    /// On failure any previously connected account stays as it was.
    /// Reconnecting is allowed and rebinds everything.
    pub async fn connect(&self) -> Result<Address, WalletError> {
        let handles = self.wallet.request_session().await?;
        let account = handles.account;

        self.verify_token_scales(&handles).await;

        let session = Arc::new(ActiveSession {
            orchestrator: Orchestrator::new(
                Arc::clone(&handles.base_token),
                Arc::clone(&handles.quote_token),
                Arc::clone(&handles.exchange),
                self.spender,
                self.scales,
                self.symbols.clone(),
                self.gate.clone(),
                Arc::clone(&self.notifier),
            ),
            loader: BalanceLoader::new(
                Arc::clone(&handles.base_token),
                Arc::clone(&handles.quote_token),
                Arc::clone(&handles.exchange),
                self.scales,
                self.display_decimals,
            ),
            estimator: QuoteEstimator::new(Arc::clone(&handles.exchange), self.scales),
        });

        self.state.write().account = Some(account);
        *self.session.write() = Some(session);
        info!("📡 Session connected: 0x{:x}", account);

        self.refresh_snapshot().await;
        Ok(account)
    }

    pub fn account(&self) -> Option<Address> {
        self.state.read().account
    }

    pub fn in_flight(&self) -> bool {
        self.gate.in_flight()
    }

    pub fn phase(&self) -> OperationPhase {
        self.gate.phase()
    }

    /// Snapshot of the renderable state.
    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Writes the driven (source-side) amount and re-estimates the
    /// destination field.
    pub async fn set_source_amount(&self, text: &str) {
        let direction = {
            let mut state = self.state.write();
            let side = state.source_side();
            state.field_mut(side).set(text);
            state.direction
        };
        self.update_quote(direction).await;
    }

    /// Sets the swap direction and re-estimates for the new source field.
    pub async fn set_direction(&self, direction: SwapDirection) {
        self.state.write().direction = direction;
        self.update_quote(direction).await;
    }

    pub async fn flip_direction(&self) {
        let direction = {
            let mut state = self.state.write();
            state.direction = state.direction.flipped();
            state.direction
        };
        self.update_quote(direction).await;
    }

    /// Stores amount text for one side without estimating. Used by the
    /// add-liquidity form, which shares the per-token fields with the swap
    /// view.
    pub fn set_token_amount(&self, side: TokenSide, text: &str) {
        self.state.write().field_mut(side).set(text);
    }

    pub fn set_share_amount(&self, text: &str) {
        self.state.write().share_amount.set(text);
    }

    /// Runs the swap sequence for the current direction and source amount.
    ///
    /// Returns `None` without any effect when no session is connected.
    pub async fn swap(&self) -> Option<OperationOutcome> {
        let session = self.active_session()?;
        let (direction, text) = {
            let state = self.state.read();
            (state.direction, state.source_field().text().to_string())
        };
        let outcome = session.orchestrator.swap(direction, &text).await;
        self.refresh_snapshot().await;
        Some(outcome)
    }

    /// Runs the add-liquidity sequence with both per-token amounts.
    pub async fn add_liquidity(&self) -> Option<OperationOutcome> {
        let session = self.active_session()?;
        let (base_text, quote_text) = {
            let state = self.state.read();
            (
                state.base_amount.text().to_string(),
                state.quote_amount.text().to_string(),
            )
        };
        let outcome = session
            .orchestrator
            .add_liquidity(&base_text, &quote_text)
            .await;
        self.refresh_snapshot().await;
        Some(outcome)
    }

    /// Runs the remove-liquidity sequence with the pool-share amount.
    pub async fn remove_liquidity(&self) -> Option<OperationOutcome> {
        let session = self.active_session()?;
        let text = { self.state.read().share_amount.text().to_string() };
        let outcome = session.orchestrator.remove_liquidity(&text).await;
        self.refresh_snapshot().await;
        Some(outcome)
    }

    /// Reloads the balance snapshot, keeping the prior one on failure.
    pub async fn refresh_snapshot(&self) {
        let session = self.active_session();
        let account = self.account();
        let (Some(session), Some(account)) = (session, account) else {
            return;
        };
        match session.loader.load(account).await {
            Ok(snapshot) => self.state.write().balances = snapshot,
            Err(e) => warn!("balance reload failed, keeping prior snapshot: {}", e),
        }
    }

    fn active_session(&self) -> Option<Arc<ActiveSession>> {
        self.session.read().clone()
    }

    async fn update_quote(&self, direction: SwapDirection) {
        let input = self.state.read().source_field().text().to_string();

        // Empty input clears the destination instead of estimating.
        if input.trim().is_empty() {
            let mut state = self.state.write();
            let side = state.destination_side();
            state.field_mut(side).clear();
            return;
        }

        let Some(session) = self.active_session() else {
            return;
        };

        let text = match session.estimator.estimate(direction, &input).await {
            Ok(text) => text,
            Err(e) => {
                debug!("quote estimation failed: {}", e);
                NEUTRAL_QUOTE.to_string()
            }
        };

        // The direction may have changed while the quote was in flight; the
        // latest write wins.
        let mut state = self.state.write();
        let side = state.destination_side();
        state.field_mut(side).set(text);
    }

    async fn verify_token_scales(&self, handles: &SessionHandles) {
        for (token, symbol, configured) in [
            (&handles.base_token, &self.symbols.base, self.scales.base),
            (&handles.quote_token, &self.symbols.quote, self.scales.quote),
        ] {
            match token.decimals().await {
                Ok(reported) if u32::from(reported) != configured => warn!(
                    "{} reports {} decimals on chain but is configured with {}",
                    symbol, reported, configured
                ),
                Ok(_) => {}
                Err(e) => debug!("decimals query for {} failed: {}", symbol, e),
            }
        }
    }
}
