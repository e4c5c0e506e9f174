//! Client-side input checks run before any write intent is built.

use std::str::FromStr;

use alloy_primitives::{Address, U256};

use crate::{
    basic_elements::units::{format_units, parse_units},
    error::ValidationError,
};

const ADDRESS_LEN: usize = 42;

/// Accepts `0x` + 40 hex digits. Mixed-case input must carry a valid checksum.
pub fn parse_address(input: &str) -> Result<Address, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidAddress(trimmed.to_string());

    let Some(digits) = trimmed.strip_prefix("0x") else {
        return Err(invalid());
    };
    if trimmed.len() != ADDRESS_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());

    if has_upper && has_lower {
        Address::parse_checksummed(trimmed, None).map_err(|_| invalid())
    } else {
        Address::from_str(trimmed).map_err(|_| invalid())
    }
}

/// A strictly positive decimal amount scaled to base units.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, ValidationError> {
    let amount = parse_units(input, decimals)?;
    if amount.is_zero() {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount)
}

pub fn require_field<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed)
}

/// Advisory only: the balance may be stale and the contract has the final say.
pub fn check_balance(amount: U256, available: U256, decimals: u8) -> Result<(), ValidationError> {
    if amount > available {
        return Err(ValidationError::InsufficientBalance {
            requested: format_units(amount, decimals),
            available: format_units(available, decimals),
        });
    }
    Ok(())
}
