//! # Orderbook tools
//!
//! A thin, typed client for the 1inch limit order protocol orderbook (v4.0) REST API.
//!
//! [`OrderbookApi`] performs exactly one HTTP round trip per call and never retries. Failures are reported as an
//! [`OrderbookApiError`], which distinguishes between the remote being unreachable and the remote rejecting the
//! request. Retry policy belongs to the caller; see [`OrderbookApiError::is_retryable`].
mod api;
mod config;
mod data_objects;
mod error;

pub use api::{OrderbookApi, OWNER_ORDERS_LIMIT, OWNER_ORDERS_PAGE};
pub use config::{OrderbookConfig, DEFAULT_ORDERBOOK_URL, DEFAULT_REQUEST_TIMEOUT};
pub use data_objects::{
    FeeExtension,
    FeeInfo,
    LimitOrder,
    LimitOrderData,
    OrderCount,
    OrderCountFilter,
    OrderDetails,
    OrderStatus,
    OrderSubmission,
    PageMeta,
    RemoteOrderHandle,
    TokenPair,
    UniquePairsPage,
};
pub use error::{error_message_from_body, OrderbookApiError};
