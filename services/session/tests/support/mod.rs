//! Scripted doubles for the contract and wallet seams.
//!
//! Every mock appends to one shared call log so tests can assert ordering
//! across contracts, not just per-contract counts. Confirmation entries only
//! appear when a pending transaction is actually awaited, which is how the
//! fire-and-forget approval behavior stays visible.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use onchain::{
    Address, CallError, ExchangeContract, PendingTx, SessionHandles, SwapDirection, TokenContract,
    TxConfirmation, WalletError, WalletProvider, H256, U256,
};
use parking_lot::Mutex;
use swapdesk_session::config::{PairScales, PairSymbols};
use swapdesk_session::notify::{Notification, NotificationSink};
use swapdesk_session::orchestrator::OperationGate;

/// Interactions across all mocks, in submission order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Low word of the transaction hash each action call reports.
pub const SWAP_TX: u64 = 0x51;
pub const ADD_TX: u64 = 0x52;
pub const REMOVE_TX: u64 = 0x53;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().clone()
}

pub fn account() -> Address {
    Address::from_low_u64_be(0xAA)
}

pub fn spender() -> Address {
    Address::from_low_u64_be(0xEC)
}

pub fn scales() -> PairScales {
    PairScales {
        base: 18,
        quote: 18,
        share: 18,
    }
}

pub fn symbols() -> PairSymbols {
    PairSymbols {
        base: "WC".to_string(),
        quote: "SONIC".to_string(),
        share: "LP".to_string(),
    }
}

/// Whole token units at the default 18-decimal scale.
pub fn units(whole: u64) -> U256 {
    U256::from(whole) * U256::exp10(18)
}

fn push(log: &CallLog, probe: &Option<OperationGate>, entry: String) {
    // With a probe attached, each entry records the gate phase at call time.
    let entry = match probe {
        Some(gate) => format!("{}@{:?}", entry, gate.phase()),
        None => entry,
    };
    log.lock().push(entry);
}

/// Pending transaction whose confirmation outcome is scripted up front.
pub struct MockPending {
    label: String,
    tx_hash: H256,
    outcome: Result<TxConfirmation, CallError>,
    log: CallLog,
    probe: Option<OperationGate>,
}

#[async_trait]
impl PendingTx for MockPending {
    fn tx_hash(&self) -> H256 {
        self.tx_hash
    }

    async fn confirmed(self: Box<Self>) -> Result<TxConfirmation, CallError> {
        push(&self.log, &self.probe, format!("confirm {}", self.label));
        self.outcome
    }
}

/// ERC-20 double for one leg of the pair.
pub struct MockToken {
    symbol: &'static str,
    log: CallLog,
    balance: U256,
    decimals: u8,
    approve_error: Option<CallError>,
    balance_error: bool,
    probe: Option<OperationGate>,
}

impl MockToken {
    pub fn new(symbol: &'static str, log: &CallLog) -> Self {
        Self {
            symbol,
            log: Arc::clone(log),
            balance: U256::zero(),
            decimals: 18,
            approve_error: None,
            balance_error: false,
            probe: None,
        }
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn failing_approval(mut self, error: CallError) -> Self {
        self.approve_error = Some(error);
        self
    }

    pub fn failing_balance(mut self) -> Self {
        self.balance_error = true;
        self
    }

    pub fn probed(mut self, gate: OperationGate) -> Self {
        self.probe = Some(gate);
        self
    }
}

#[async_trait]
impl TokenContract for MockToken {
    async fn approve(
        &self,
        _spender: Address,
        amount: U256,
    ) -> Result<Box<dyn PendingTx>, CallError> {
        push(
            &self.log,
            &self.probe,
            format!("approve {} {}", self.symbol, amount),
        );
        if let Some(error) = &self.approve_error {
            return Err(error.clone());
        }
        let tx_hash = H256::from_low_u64_be(0xA0);
        Ok(Box::new(MockPending {
            label: format!("approval {}", self.symbol),
            tx_hash,
            outcome: Ok(TxConfirmation {
                tx_hash,
                block_number: Some(1),
                gas_used: None,
            }),
            log: Arc::clone(&self.log),
            probe: self.probe.clone(),
        }))
    }

    async fn balance_of(&self, _owner: Address) -> Result<U256, CallError> {
        push(
            &self.log,
            &self.probe,
            format!("balance_of {}", self.symbol),
        );
        if self.balance_error {
            return Err(CallError::Rpc("balance query refused".to_string()));
        }
        Ok(self.balance)
    }

    async fn decimals(&self) -> Result<u8, CallError> {
        push(&self.log, &self.probe, format!("decimals {}", self.symbol));
        Ok(self.decimals)
    }
}

/// Exchange double with a linear price and scriptable failures at each step.
pub struct MockExchange {
    log: CallLog,
    price_multiplier: U256,
    quote_error: bool,
    submit_error: Option<CallError>,
    confirm_error: Option<CallError>,
    pool_shares: U256,
    balance_error: bool,
    probe: Option<OperationGate>,
}

impl MockExchange {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: Arc::clone(log),
            price_multiplier: U256::one(),
            quote_error: false,
            submit_error: None,
            confirm_error: None,
            pool_shares: U256::zero(),
            balance_error: false,
            probe: None,
        }
    }

    pub fn with_price_multiplier(mut self, factor: u64) -> Self {
        self.price_multiplier = U256::from(factor);
        self
    }

    pub fn with_pool_shares(mut self, shares: U256) -> Self {
        self.pool_shares = shares;
        self
    }

    pub fn failing_quote(mut self) -> Self {
        self.quote_error = true;
        self
    }

    pub fn failing_submission(mut self, error: CallError) -> Self {
        self.submit_error = Some(error);
        self
    }

    pub fn failing_confirmation(mut self, error: CallError) -> Self {
        self.confirm_error = Some(error);
        self
    }

    pub fn failing_balance(mut self) -> Self {
        self.balance_error = true;
        self
    }

    pub fn probed(mut self, gate: OperationGate) -> Self {
        self.probe = Some(gate);
        self
    }

    fn submit(
        &self,
        entry: String,
        label: &str,
        tx_seed: u64,
    ) -> Result<Box<dyn PendingTx>, CallError> {
        push(&self.log, &self.probe, entry);
        if let Some(error) = &self.submit_error {
            return Err(error.clone());
        }
        let tx_hash = H256::from_low_u64_be(tx_seed);
        let outcome = match &self.confirm_error {
            Some(error) => Err(error.clone()),
            None => Ok(TxConfirmation {
                tx_hash,
                block_number: Some(7),
                gas_used: None,
            }),
        };
        Ok(Box::new(MockPending {
            label: label.to_string(),
            tx_hash,
            outcome,
            log: Arc::clone(&self.log),
            probe: self.probe.clone(),
        }))
    }
}

#[async_trait]
impl ExchangeContract for MockExchange {
    async fn swap_base_to_quote(&self, amount: U256) -> Result<Box<dyn PendingTx>, CallError> {
        self.submit(format!("swap_base_to_quote {}", amount), "swap", SWAP_TX)
    }

    async fn swap_quote_to_base(&self, amount: U256) -> Result<Box<dyn PendingTx>, CallError> {
        self.submit(format!("swap_quote_to_base {}", amount), "swap", SWAP_TX)
    }

    async fn quote_price(
        &self,
        amount: U256,
        direction: SwapDirection,
    ) -> Result<U256, CallError> {
        push(
            &self.log,
            &self.probe,
            format!("quote_price {} {}", amount, direction),
        );
        if self.quote_error {
            return Err(CallError::Rpc("price endpoint down".to_string()));
        }
        Ok(amount * self.price_multiplier)
    }

    async fn add_liquidity(
        &self,
        base_amount: U256,
        quote_amount: U256,
    ) -> Result<Box<dyn PendingTx>, CallError> {
        self.submit(
            format!("add_liquidity {} {}", base_amount, quote_amount),
            "add_liquidity",
            ADD_TX,
        )
    }

    async fn remove_liquidity(&self, share_amount: U256) -> Result<Box<dyn PendingTx>, CallError> {
        self.submit(
            format!("remove_liquidity {}", share_amount),
            "remove_liquidity",
            REMOVE_TX,
        )
    }

    async fn balance_of(&self, _owner: Address) -> Result<U256, CallError> {
        push(&self.log, &self.probe, "balance_of LP".to_string());
        if self.balance_error {
            return Err(CallError::Rpc("share balance query refused".to_string()));
        }
        Ok(self.pool_shares)
    }
}

/// Builds session handles around mock contracts for the standard account.
pub fn session_handles(
    base: MockToken,
    quote: MockToken,
    exchange: MockExchange,
) -> SessionHandles {
    SessionHandles {
        account: account(),
        base_token: Arc::new(base),
        quote_token: Arc::new(quote),
        exchange: Arc::new(exchange),
    }
}

/// Wallet provider scripted to grant one fixed session or refuse.
pub struct MockWallet {
    script: Result<SessionHandles, WalletError>,
}

impl MockWallet {
    pub fn granting(handles: SessionHandles) -> Self {
        Self {
            script: Ok(handles),
        }
    }

    pub fn refusing(error: WalletError) -> Self {
        Self { script: Err(error) }
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_session(&self) -> Result<SessionHandles, WalletError> {
        self.script.clone()
    }
}

/// Sink that stores notifications for assertions.
#[derive(Default)]
pub struct RecordingSink {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}
