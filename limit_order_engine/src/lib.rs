//! Limit Order Engine
//!
//! The engine keeps a local record of the limit orders submitted through this gateway and keeps it honest against the
//! 1inch orderbook, which is always the source of truth.
//!
//! The library is divided into these sections:
//! 1. Database management ([`mod@db`]). The [`OrderStore`] trait is the contract a backend has to meet. SQLite is the
//!    supported backend. The record types are in [`db_types`].
//! 2. The [`RemoteOrderSource`] port, implemented for [`orderbook_tools::OrderbookApi`].
//! 3. The public API ([`LimitOrderApi`]): listing with reconciliation, submission, and read-only queries.
mod db;

pub mod db_types;
pub mod helpers;
mod lop_api;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{db::SqliteDatabase, SqliteDatabaseError, DEFAULT_MAX_CONNECTIONS};
pub use db::traits::{InsertOrderResult, OrderStore, OrderStoreError};
pub use lop_api::{
    errors::OrderFlowError,
    order_flow_api::{validate_submission, LimitOrderApi},
    order_objects,
    reconciliation,
};
pub use traits::RemoteOrderSource;
