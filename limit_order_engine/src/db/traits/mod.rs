//! # Order store contracts
//!
//! The engine never talks to a database directly. Anything that implements [`OrderStore`] can act as the local record
//! of orders this gateway has submitted. The SQLite backend lives in [`crate::db::sqlite`]; tests use an in-memory
//! store from `test_utils`.
//!
//! Records are keyed by `(chain_id, owner_address, order_hash)`. They are only ever created by the submission flow and
//! only ever removed by reconciliation. There is no update-in-place.
mod data_objects;
mod order_store;

pub use data_objects::InsertOrderResult;
pub use order_store::{OrderStore, OrderStoreError};
