//! # Limit order engine public API
//!
//! [`order_flow_api::LimitOrderApi`] ties the orderbook and the local store together. An API instance is created by
//! supplying a store backend and a remote order source:
//!
//! ```rust,ignore
//! use limit_order_engine::{LimitOrderApi, SqliteDatabase};
//! use orderbook_tools::{OrderbookApi, OrderbookConfig};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let orderbook = OrderbookApi::new(OrderbookConfig::new_from_env_or_default())?;
//! let api = LimitOrderApi::new(db, orderbook);
//! let listing = api.fetch_and_reconcile_orders(1, "0x...").await?;
//! ```
//!
//! * [`reconciliation`] holds the pure set logic used when listing orders.
//! * [`order_objects`] holds the result types.
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
pub mod reconciliation;
