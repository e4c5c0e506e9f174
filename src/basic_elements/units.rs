use alloy_primitives::U256;

use crate::error::ValidationError;

fn ten_pow(exponent: u8) -> U256 {
    U256::from(10).pow(U256::from(exponent))
}

fn is_digits(part: &str) -> bool {
    part.bytes().all(|byte| byte.is_ascii_digit())
}

/// Scales a decimal string to integer base units.
///
/// Accepts `12`, `12.5`, `.5` and `12.`; rejects signs, exponents and more
/// than `decimals` fractional digits instead of rounding them away.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, ValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(ValidationError::InvalidAmount(trimmed.to_string()));
    }

    if fraction.len() > decimals as usize {
        return Err(ValidationError::TooManyDecimals { max: decimals });
    }

    let whole_value = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10)
            .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))?
    };

    let fraction_value = if decimals == 0 {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        U256::from_str_radix(&padded, 10)
            .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))?
    };

    whole_value
        .checked_mul(ten_pow(decimals))
        .and_then(|scaled| scaled.checked_add(fraction_value))
        .ok_or_else(|| ValidationError::InvalidAmount(trimmed.to_string()))
}

/// Exact decimal rendering of a base-unit amount, without trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    let scale = ten_pow(decimals);
    let whole = value / scale;
    let remainder = value % scale;

    if remainder.is_zero() {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);

    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Rounds half-up to exactly `places` fractional digits for display.
pub fn format_fixed(value: U256, decimals: u8, places: u8) -> String {
    let scaled = if places >= decimals {
        value.saturating_mul(ten_pow(places - decimals))
    } else {
        let factor = ten_pow(decimals - places);
        let quotient = value / factor;
        let remainder = value % factor;

        if remainder.saturating_mul(U256::from(2)) >= factor {
            quotient.saturating_add(U256::from(1))
        } else {
            quotient
        }
    };

    if places == 0 {
        return scaled.to_string();
    }

    let place_scale = ten_pow(places);
    let whole = scaled / place_scale;
    let fraction = scaled % place_scale;

    format!(
        "{}.{:0>width$}",
        whole,
        fraction.to_string(),
        width = places as usize
    )
}
