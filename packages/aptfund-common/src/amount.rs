use std::fmt;
use std::str::FromStr;

use cosmwasm_std::{Decimal, Uint128, Uint256};
use serde::de::{self, Deserializer, Visitor};
use thiserror::Error;

/// Largest minor-unit precision we accept. `Decimal` itself carries 18 places.
pub const MAX_ASSET_DECIMALS: u32 = 18;

/// 10^18, the scaling factor of `cosmwasm_std::Decimal`.
const DECIMAL_FRACTIONAL: u128 = 1_000_000_000_000_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("{input:?} is not a valid amount")]
    Invalid { input: String },

    #[error("amount must be greater than zero")]
    NotPositive,

    #[error("amount {amount} is smaller than one minor unit ({decimals} decimals)")]
    BelowMinorUnit { amount: Decimal, decimals: u32 },

    #[error("percentage {value} is outside 0..=100")]
    PercentageOutOfRange { value: Decimal },

    #[error("asset decimals {decimals} exceed the maximum of {max}")]
    UnsupportedDecimals { decimals: u32, max: u32 },

    #[error("amount overflowed while converting to minor units")]
    Overflow,
}

/// Parse the user-entered contribution amount.
///
/// Accepts plain decimal notation only (`"12"`, `"0.5"`). Exponents, `NaN`,
/// infinities and more than 18 fractional digits are rejected as invalid;
/// negative numbers and zero are rejected as not positive.
pub fn parse_contribution_amount(input: &str) -> Result<Decimal, AmountError> {
    let trimmed = input.trim();
    let invalid = || AmountError::Invalid {
        input: trimmed.to_string(),
    };

    if let Some(magnitude) = trimmed.strip_prefix('-') {
        return match Decimal::from_str(magnitude) {
            Ok(_) => Err(AmountError::NotPositive),
            Err(_) => Err(invalid()),
        };
    }

    let amount = Decimal::from_str(trimmed).map_err(|_| invalid())?;
    if amount.is_zero() {
        return Err(AmountError::NotPositive);
    }
    Ok(amount)
}

fn check_decimals(decimals: u32) -> Result<(), AmountError> {
    if decimals > MAX_ASSET_DECIMALS {
        return Err(AmountError::UnsupportedDecimals {
            decimals,
            max: MAX_ASSET_DECIMALS,
        });
    }
    Ok(())
}

fn pow10(decimals: u32) -> Uint256 {
    Uint256::from(10u128.pow(decimals))
}

/// Convert a major-unit amount to minor units, truncating anything below
/// one minor unit.
pub fn to_minor_units(amount: Decimal, decimals: u32) -> Result<Uint128, AmountError> {
    check_decimals(decimals)?;
    let scaled = Uint256::from(amount.atomics())
        .checked_mul(pow10(decimals))
        .map_err(|_| AmountError::Overflow)?
        / Uint256::from(DECIMAL_FRACTIONAL);
    Uint128::try_from(scaled).map_err(|_| AmountError::Overflow)
}

/// A beneficiary's share of `amount`, in minor units.
///
/// `floor(amount * percentage / 100 * 10^decimals)`, evaluated on the raw
/// `Decimal` atomics in 256-bit space so the only rounding step is the final
/// truncation.
pub fn compute_share(
    amount: Decimal,
    percentage: Decimal,
    decimals: u32,
) -> Result<Uint128, AmountError> {
    check_decimals(decimals)?;
    // Decimal::percent(10_000) == 100
    if percentage > Decimal::percent(10_000) {
        return Err(AmountError::PercentageOutOfRange { value: percentage });
    }

    let numerator = amount
        .atomics()
        .full_mul(percentage.atomics())
        .checked_mul(pow10(decimals))
        .map_err(|_| AmountError::Overflow)?;
    let denominator = Uint256::from(100 * DECIMAL_FRACTIONAL) * Uint256::from(DECIMAL_FRACTIONAL);

    Uint128::try_from(numerator / denominator).map_err(|_| AmountError::Overflow)
}

/// Render a minor-unit amount in major units, e.g. `150000000` at 8 decimals
/// becomes `"1.5"`.
pub fn format_minor_units(amount: Uint128, decimals: u32) -> Result<String, AmountError> {
    check_decimals(decimals)?;
    Decimal::from_atomics(amount, decimals)
        .map(|d| d.to_string())
        .map_err(|_| AmountError::Overflow)
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative decimal as a number or string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        Decimal::from_str(v.trim()).map_err(|e| E::custom(format!("invalid decimal {v:?}: {e}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Decimal::from_atomics(v, 0).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        u64::try_from(v)
            .map_err(|_| E::custom(format!("negative decimal {v}")))
            .and_then(|v| self.visit_u64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        // f64's Display never uses exponent notation
        self.visit_str(&v.to_string())
    }
}

/// Deserialize a `Decimal` that the backend may send either as a JSON number
/// or as a string.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DecimalVisitor)
}

/// Like [`deserialize_decimal`], rejecting values above 100.
pub fn deserialize_percentage<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserialize_decimal(deserializer)?;
    if value > Decimal::percent(10_000) {
        return Err(de::Error::custom(AmountError::PercentageOutOfRange {
            value,
        }));
    }
    Ok(value)
}
