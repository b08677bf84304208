//! ERC-20 token handle backed by a signer-bound client.

use std::sync::Arc;

use async_trait::async_trait;
use ethabi::{Function, Token};
use ethers::providers::Middleware;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, TransactionRequest, U256};
use tracing::debug;

use crate::abi;
use crate::contracts::{PendingTx, TokenContract};
use crate::error::CallError;
use crate::pending::EthPendingTx;
use crate::provider::{ConfirmPolicy, NodeClient};

/// One side of the pair as seen through its ERC-20 interface.
pub struct EthToken {
    address: Address,
    client: Arc<NodeClient>,
    policy: ConfirmPolicy,
    approve_fn: Function,
    balance_of_fn: Function,
    decimals_fn: Function,
}

impl EthToken {
    pub fn new(address: Address, client: Arc<NodeClient>, policy: ConfirmPolicy) -> Self {
        Self {
            address,
            client,
            policy,
            approve_fn: abi::erc20_approve(),
            balance_of_fn: abi::erc20_balance_of(),
            decimals_fn: abi::erc20_decimals(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn read_request(&self, data: Vec<u8>) -> TypedTransaction {
        TransactionRequest::new().to(self.address).data(data).into()
    }
}

#[async_trait]
impl TokenContract for EthToken {
    async fn approve(
        &self,
        spender: Address,
        amount: U256,
    ) -> Result<Box<dyn PendingTx>, CallError> {
        let data = self
            .approve_fn
            .encode_input(&[Token::Address(spender), Token::Uint(amount)])
            .map_err(|e| CallError::Encode(format!("approve: {}", e)))?;

        let tx = TransactionRequest::new().to(self.address).data(data);
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| CallError::Rpc(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        debug!(
            "approve({}) for spender 0x{:x} submitted: 0x{:x}",
            amount, spender, tx_hash
        );

        Ok(Box::new(EthPendingTx::new(
            tx_hash,
            Arc::clone(&self.client),
            self.policy,
        )))
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

    async fn decimals(&self) -> Result<u8, CallError> {
        let data = self
            .decimals_fn
            .encode_input(&[])
            .map_err(|e| CallError::Encode(format!("decimals: {}", e)))?;
        let raw = self
            .client
            .call(&self.read_request(data), None)
            .await
            .map_err(|e| CallError::Rpc(e.to_string()))?;
        let value = abi::decode_single_uint(&self.decimals_fn, &raw)?;
        if value > U256::from(u8::MAX) {
            return Err(CallError::ReturnData(format!(
                "decimals: {} exceeds uint8",
                value
            )));
        }
        Ok(value.as_u32() as u8)
    }
}
