mod secret;

pub mod validation;

pub use secret::Secret;
pub use validation::{
    is_valid_evm_address,
    is_valid_hash,
    validate_chain_id,
    validate_evm_address,
    validate_hash,
    validate_limit,
    validate_page,
    validate_positive_amount,
    ValidationError,
    EVM_ADDRESS_LENGTH,
    MAX_PAGE_LIMIT,
    ORDER_HASH_LENGTH,
};
