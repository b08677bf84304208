//! Pair exchange handle backed by a signer-bound client.

use std::sync::Arc;

use async_trait::async_trait;
use ethabi::{Function, Token};
use ethers::providers::Middleware;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, TransactionRequest, U256};
use tracing::debug;

use crate::abi;
use crate::contracts::{ExchangeContract, PendingTx, SwapDirection};
use crate::error::CallError;
use crate::pending::EthPendingTx;
use crate::provider::{ConfirmPolicy, NodeClient};

/// The deployed pair exchange, addressed by its contract account.
pub struct EthExchange {
    address: Address,
    client: Arc<NodeClient>,
    policy: ConfirmPolicy,
    swap_base_fn: Function,
    swap_quote_fn: Function,
    get_price_fn: Function,
    add_liquidity_fn: Function,
    remove_liquidity_fn: Function,
    balance_of_fn: Function,
}

impl EthExchange {
    pub fn new(address: Address, client: Arc<NodeClient>, policy: ConfirmPolicy) -> Self {
        Self {
            address,
            client,
            policy,
            swap_base_fn: abi::swap_base_to_quote(),
            swap_quote_fn: abi::swap_quote_to_base(),
            get_price_fn: abi::get_price(),
            add_liquidity_fn: abi::add_liquidity(),
            remove_liquidity_fn: abi::remove_liquidity(),
            balance_of_fn: abi::exchange_balance_of(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn read_request(&self, data: Vec<u8>) -> TypedTransaction {
        TransactionRequest::new().to(self.address).data(data).into()
    }

    /// Encodes and submits a mutating call, returning as soon as the node
    /// acknowledges it.
    async fn submit(
        &self,
        function: &Function,
        args: &[Token],
    ) -> Result<Box<dyn PendingTx>, CallError> {
        let data = function
            .encode_input(args)
            .map_err(|e| CallError::Encode(format!("{}: {}", function.name, e)))?;

        let tx = TransactionRequest::new().to(self.address).data(data);
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| CallError::Rpc(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        debug!("{} submitted: 0x{:x}", function.name, tx_hash);

        Ok(Box::new(EthPendingTx::new(
            tx_hash,
            Arc::clone(&self.client),
            self.policy,
        )))
    }
}

#[async_trait]
impl ExchangeContract for EthExchange {
    async fn swap_base_to_quote(&self, amount: U256) -> Result<Box<dyn PendingTx>, CallError> {
        self.submit(&self.swap_base_fn, &[Token::Uint(amount)]).await
    }

    async fn swap_quote_to_base(&self, amount: U256) -> Result<Box<dyn PendingTx>, CallError> {
        self.submit(&self.swap_quote_fn, &[Token::Uint(amount)])
            .await
    }

    async fn quote_price(
        &self,
        amount: U256,
        direction: SwapDirection,
    ) -> Result<U256, CallError> {
        let data = self
            .get_price_fn
            .encode_input(&[
                Token::Uint(amount),
                Token::Bool(direction.is_base_to_quote()),
            ])
            .map_err(|e| CallError::Encode(format!("getPrice: {}", e)))?;
        let raw = self
            .client
            .call(&self.read_request(data), None)
            .await
            .map_err(|e| CallError::Rpc(e.to_string()))?;
        abi::decode_single_uint(&self.get_price_fn, &raw)
    }

    async fn add_liquidity(
        &self,
        base_amount: U256,
        quote_amount: U256,
    ) -> Result<Box<dyn PendingTx>, CallError> {
        self.submit(
            &self.add_liquidity_fn,
            &[Token::Uint(base_amount), Token::Uint(quote_amount)],
        )
        .await
    }

    async fn remove_liquidity(&self, share_amount: U256) -> Result<Box<dyn PendingTx>, CallError> {
        self.submit(&self.remove_liquidity_fn, &[Token::Uint(share_amount)])
            .await
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, CallError> {
        let data = self
            .balance_of_fn
            .encode_input(&[Token::Address(owner)])
            .map_err(|e| CallError::Encode(format!("balanceOf: {}", e)))?;
        let raw = self
            .client
            .call(&self.read_request(data), None)
            .await
            .map_err(|e| CallError::Rpc(e.to_string()))?;
        abi::decode_single_uint(&self.balance_of_fn, &raw)
    }
}
