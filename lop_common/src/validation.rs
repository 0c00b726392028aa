//! Shape checks for caller-supplied values.
//!
//! Every check comes as a pair: an `is_valid_*` predicate and a `validate_*` function that returns a
//! [`ValidationError`] naming the offending field. None of these functions touch the network or the database, so they
//! are run before any I/O happens.
//!
//! Only the *shape* of addresses and hashes is checked (total length and `0x` prefix). Whether an address or order
//! actually exists is the remote orderbook's business.
use thiserror::Error;

/// Total length of an EVM address, including the `0x` prefix.
pub const EVM_ADDRESS_LENGTH: usize = 42;
/// Total length of a limit order hash, including the `0x` prefix.
pub const ORDER_HASH_LENGTH: usize = 66;
/// The orderbook never returns more than this many items per page.
pub const MAX_PAGE_LIMIT: u32 = 100;

const HEX_PREFIX: &str = "0x";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must be a valid EVM address ({EVM_ADDRESS_LENGTH} characters starting with 0x)")]
    InvalidAddress(String),
    #[error("{field} must be a valid {expected_length}-character hash starting with 0x")]
    InvalidHash { field: String, expected_length: usize },
    #[error("Chain ID must be a positive integer")]
    InvalidChainId,
    #[error("{0} must be a positive integer")]
    NotPositive(String),
    #[error("{field} must be a positive integer between 1 and {max}")]
    OutOfRange { field: String, max: u32 },
    #[error("{0} parameter is required")]
    Missing(String),
    #[error("{0}")]
    InvalidValue(String),
}

/// Returns true if `address` has the shape of an EVM address: 42 characters starting with `0x`.
pub fn is_valid_evm_address(address: &str) -> bool {
    address.len() == EVM_ADDRESS_LENGTH && address.starts_with(HEX_PREFIX)
}

/// Validates an EVM address.
///
/// When `required` is false, a missing or empty value is accepted; anything else must still be well-formed.
pub fn validate_evm_address(address: Option<&str>, field_name: &str, required: bool) -> Result<(), ValidationError> {
    match address {
        Some(a) if is_valid_evm_address(a) => Ok(()),
        None | Some("") if !required => Ok(()),
        _ => Err(ValidationError::InvalidAddress(field_name.to_string())),
    }
}

/// Returns true if `hash` is `expected_length` characters long (prefix included) and starts with `0x`.
pub fn is_valid_hash(hash: &str, expected_length: usize) -> bool {
    hash.len() == expected_length && hash.starts_with(HEX_PREFIX)
}

/// Validates a hash. See [`validate_evm_address`] for the meaning of `required`.
pub fn validate_hash(
    hash: Option<&str>,
    field_name: &str,
    expected_length: usize,
    required: bool,
) -> Result<(), ValidationError> {
    match hash {
        Some(h) if is_valid_hash(h, expected_length) => Ok(()),
        None | Some("") if !required => Ok(()),
        _ => Err(ValidationError::InvalidHash { field: field_name.to_string(), expected_length }),
    }
}

pub fn validate_chain_id(chain_id: u64) -> Result<(), ValidationError> {
    if chain_id == 0 {
        return Err(ValidationError::InvalidChainId);
    }
    Ok(())
}

pub fn validate_positive_amount(amount: u128, field_name: &str) -> Result<(), ValidationError> {
    if amount == 0 {
        return Err(ValidationError::NotPositive(field_name.to_string()));
    }
    Ok(())
}

pub fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page == 0 {
        return Err(ValidationError::NotPositive("Page".to_string()));
    }
    Ok(())
}

pub fn validate_limit(limit: u32) -> Result<(), ValidationError> {
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(ValidationError::OutOfRange { field: "Limit".to_string(), max: MAX_PAGE_LIMIT });
    }
    Ok(())
}
