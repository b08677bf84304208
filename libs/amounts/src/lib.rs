//! # Swapdesk Amounts - Decimal Fixed-Point Codec
//!
//! Converts between the decimal strings a user types ("1.5") and the scaled
//! 256-bit integers the contract layer expects (1500000000000000000 at scale
//! 18), preserving full precision in both directions. All arithmetic is
//! integer digit manipulation; no floating point is involved anywhere, so the
//! round-trip law holds exactly:
//!
//! `parse_units(&format_units(x, scale), scale) == Ok(x)` for every `U256`.
//!
//! The scale is always caller-supplied. Token decimals differ across
//! deployments (18 for most ERC-20s, 6 for USDC-style tokens), so nothing in
//! this crate assumes a particular scale.

use ethereum_types::U256;
use thiserror::Error;

/// Structured parse failures for user-entered decimal amounts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("empty amount")]
    Empty,

    #[error("malformed decimal amount {input:?}")]
    Malformed { input: String },

    #[error("amount {input:?} has more fractional digits than the scale of {scale} allows")]
    TooManyDecimals { input: String, scale: u32 },

    #[error("amount {input:?} does not fit in 256 bits at the requested scale")]
    Overflow { input: String },
}

/// Parse a human decimal string into a scaled integer.
///
/// Accepts plain non-negative decimals: `"2"`, `"2.5"`, `".5"`, `"5."`.
/// Rejects everything else (signs, exponents, grouping separators, multiple
/// dots) with [`AmountParseError::Malformed`]. Fractional digits beyond the
/// scale are an error rather than a silent truncation: an amount the codec
/// cannot represent must never reach a transaction rounded.
pub fn parse_units(text: &str, scale: u32) -> Result<U256, AmountParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let malformed = || AmountParseError::Malformed {
        input: trimmed.to_string(),
    };

    let (int_part, frac_part) = match trimmed.split_once('.') {
        None => (trimmed, ""),
        Some((int_part, frac_part)) => {
            if frac_part.contains('.') {
                return Err(malformed());
            }
            (int_part, frac_part)
        }
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(malformed());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }
    if frac_part.len() > scale as usize {
        return Err(AmountParseError::TooManyDecimals {
            input: trimmed.to_string(),
            scale,
        });
    }

    // Join integer and fractional digits, right-padding the fraction to the
    // scale, and let the decimal parser detect 256-bit overflow.
    let mut digits = String::with_capacity(int_part.len() + scale as usize);
    digits.push_str(int_part);
    digits.push_str(frac_part);
    for _ in frac_part.len()..scale as usize {
        digits.push('0');
    }

    U256::from_dec_str(&digits).map_err(|_| AmountParseError::Overflow {
        input: trimmed.to_string(),
    })
}

/// Format a scaled integer back into a decimal string.
///
/// Total for every `U256` and every scale. Trailing fractional zeros are
/// trimmed but one fractional digit is always kept (`"5.0"`, not `"5"`) so
/// that integral and fractional amounts render uniformly; a scale of zero
/// renders the plain integer.
pub fn format_units(value: U256, scale: u32) -> String {
    let digits = value.to_string();
    if scale == 0 {
        return digits;
    }

    let scale = scale as usize;
    let (int_part, frac_digits) = if digits.len() > scale {
        let split = digits.len() - scale;
        (digits[..split].to_string(), digits[split..].to_string())
    } else {
        ("0".to_string(), format!("{:0>scale$}", digits))
    };

    let frac_part = frac_digits.trim_end_matches('0');
    if frac_part.is_empty() {
        format!("{int_part}.0")
    } else {
        format!("{int_part}.{frac_part}")
    }
}

/// Format a scaled integer for balance display with a fixed number of
/// fractional digits (truncated, not rounded).
pub fn format_display(value: U256, scale: u32, display_decimals: usize) -> String {
    let full = format_units(value, scale);
    let (int_part, frac_digits) = match full.split_once('.') {
        Some((int_part, frac_digits)) => (int_part.to_string(), frac_digits.to_string()),
        None => (full, String::new()),
    };
    if display_decimals == 0 {
        return int_part;
    }

    let mut frac_part: String = frac_digits.chars().take(display_decimals).collect();
    while frac_part.len() < display_decimals {
        frac_part.push('0');
    }
    format!("{int_part}.{frac_part}")
}
