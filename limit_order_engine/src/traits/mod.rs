//! # Ports to the outside world
//!
//! * [`RemoteOrderSource`] is the authoritative view of orders: the orderbook. [`OrderbookApi`] implements it over
//!   HTTP; tests substitute fakes and mocks.
//!
//! The local store contract lives with the database backends, in [`crate::OrderStore`].
//!
//! [`OrderbookApi`]: orderbook_tools::OrderbookApi
mod remote_order_source;

pub use remote_order_source::RemoteOrderSource;
