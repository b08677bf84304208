//! Hand-built ABI definitions for the pair exchange and its ERC-20 tokens.
//!
//! The exchange contract is already deployed and its interface is fixed, so
//! the function definitions are constructed here once instead of being parsed
//! from a JSON artifact at runtime. Selectors for the standard ERC-20 entry
//! points are pinned as constants and cross-checked against the computed
//! definitions in tests.

// ethabi still requires the deprecated `constant` field on `Function`.
#![allow(deprecated)]

use ethabi::{Function, Param, ParamType, StateMutability, Token};
use ethers::types::U256;

use crate::error::CallError;

/// ERC-20 `approve(address,uint256)` selector.
/// First four bytes of keccak256("approve(address,uint256)")
pub const ERC20_APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

/// ERC-20 `balanceOf(address)` selector.
/// First four bytes of keccak256("balanceOf(address)")
pub const ERC20_BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// ERC-20 `decimals()` selector.
/// First four bytes of keccak256("decimals()")
pub const ERC20_DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

fn param(name: &str, kind: ParamType) -> Param {
    Param {
        name: name.to_string(),
        kind,
        internal_type: None,
    }
}

// =============================================================================
// ERC-20 token functions
// =============================================================================

/// `approve(address spender, uint256 amount) returns (bool)`
pub fn erc20_approve() -> Function {
    Function {
        name: "approve".to_string(),
        inputs: vec![
            param("spender", ParamType::Address),
            param("amount", ParamType::Uint(256)),
        ],
        outputs: vec![param("", ParamType::Bool)],
        constant: None,
        state_mutability: StateMutability::NonPayable,
    }
}

/// `balanceOf(address owner) view returns (uint256)`
pub fn erc20_balance_of() -> Function {
    Function {
        name: "balanceOf".to_string(),
        inputs: vec![param("owner", ParamType::Address)],
        outputs: vec![param("", ParamType::Uint(256))],
        constant: None,
        state_mutability: StateMutability::View,
    }
}

/// `decimals() view returns (uint8)`
pub fn erc20_decimals() -> Function {
    Function {
        name: "decimals".to_string(),
        inputs: vec![],
        outputs: vec![param("", ParamType::Uint(8))],
        constant: None,
        state_mutability: StateMutability::View,
    }
}

// =============================================================================
// Pair exchange functions
// =============================================================================

/// `swapBaseToQuote(uint256 baseAmount)`
pub fn swap_base_to_quote() -> Function {
    Function {
        name: "swapBaseToQuote".to_string(),
        inputs: vec![param("baseAmount", ParamType::Uint(256))],
        outputs: vec![],
        constant: None,
        state_mutability: StateMutability::NonPayable,
    }
}

/// `swapQuoteToBase(uint256 quoteAmount)`
pub fn swap_quote_to_base() -> Function {
    Function {
        name: "swapQuoteToBase".to_string(),
        inputs: vec![param("quoteAmount", ParamType::Uint(256))],
        outputs: vec![],
        constant: None,
        state_mutability: StateMutability::NonPayable,
    }
}

/// `getPrice(uint256 inputAmount, bool isBaseToQuote) view returns (uint256)`
pub fn get_price() -> Function {
    Function {
        name: "getPrice".to_string(),
        inputs: vec![
            param("inputAmount", ParamType::Uint(256)),
            param("isBaseToQuote", ParamType::Bool),
        ],
        outputs: vec![param("", ParamType::Uint(256))],
        constant: None,
        state_mutability: StateMutability::View,
    }
}

/// `addLiquidity(uint256 baseAmount, uint256 quoteAmount)`
pub fn add_liquidity() -> Function {
    Function {
        name: "addLiquidity".to_string(),
        inputs: vec![
            param("baseAmount", ParamType::Uint(256)),
            param("quoteAmount", ParamType::Uint(256)),
        ],
        outputs: vec![],
        constant: None,
        state_mutability: StateMutability::NonPayable,
    }
}

/// `removeLiquidity(uint256 shareAmount)`
pub fn remove_liquidity() -> Function {
    Function {
        name: "removeLiquidity".to_string(),
        inputs: vec![param("shareAmount", ParamType::Uint(256))],
        outputs: vec![],
        constant: None,
        state_mutability: StateMutability::NonPayable,
    }
}

/// `balanceOf(address owner) view returns (uint256)` on the exchange,
/// reporting the caller's pool-share balance. Same shape as the ERC-20
/// function, so the definition is shared.
pub fn exchange_balance_of() -> Function {
    erc20_balance_of()
}

// =============================================================================
// Return-data decoding
// =============================================================================

/// Decodes a single `uint256` return value from raw call output.
pub fn decode_single_uint(function: &Function, raw: &[u8]) -> Result<U256, CallError> {
    let tokens = function
        .decode_output(raw)
        .map_err(|e| CallError::ReturnData(format!("{}: {}", function.name, e)))?;
    match tokens.first() {
        Some(Token::Uint(value)) => Ok(*value),
        other => Err(CallError::ReturnData(format!(
            "{}: expected uint256, got {:?}",
            function.name, other
        ))),
    }
}
