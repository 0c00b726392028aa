//! Helpers for tests in this crate and in crates that depend on it. Enabled with the `test_utils` feature.
mod fakes;
#[cfg(feature = "sqlite")]
pub mod prepare_env;

pub use fakes::{limit_order, order_submission, random_hash, FakeOrderSource, InMemoryOrderStore, USDC, WETH};
