use thiserror::Error;

/// Account addresses are at most 32 bytes.
const MAX_ADDRESS_HEX_DIGITS: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address {address} must start with 0x")]
    MissingPrefix { address: String },

    #[error("address {address} has {digits} hex digits (expected 1 to 64)")]
    InvalidLength { address: String, digits: usize },

    #[error("address {address} is not valid hex")]
    InvalidHex { address: String },
}

/// Check that `address` is a `0x`-prefixed account address and return it
/// lowercased. Short forms such as `0x1` are accepted.
pub fn validate_address(address: &str) -> Result<String, AddressError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }

    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| AddressError::MissingPrefix {
            address: trimmed.to_string(),
        })?;

    if digits.is_empty() || digits.len() > MAX_ADDRESS_HEX_DIGITS {
        return Err(AddressError::InvalidLength {
            address: trimmed.to_string(),
            digits: digits.len(),
        });
    }

    // hex::decode wants whole bytes
    let padded = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    hex::decode(&padded).map_err(|_| AddressError::InvalidHex {
        address: trimmed.to_string(),
    })?;

    Ok(format!("0x{}", digits.to_ascii_lowercase()))
}

/// Display form used in donation lists: `0x1234...abcd`.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
