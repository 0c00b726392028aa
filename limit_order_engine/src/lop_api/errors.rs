use lop_common::ValidationError;
use orderbook_tools::OrderbookApiError;
use thiserror::Error;

use crate::db::traits::OrderStoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderFlowError {
    #[error("Invalid request. {0}")]
    Validation(#[from] ValidationError),
    #[error("The orderbook is unavailable. {0}")]
    RemoteUnavailable(String),
    #[error("The orderbook rejected the request. Error {status}. {message}")]
    RemoteApi { status: u16, message: String },
    /// The orderbook answered with something we could not use, or the request could not be built at all.
    #[error("Could not use the orderbook response. {0}")]
    RemoteResponse(String),
    #[error("Order store error. {0}")]
    Store(#[from] OrderStoreError),
    /// The orderbook has the order, but the local record could not be written. Resubmitting will not help.
    #[error("Order {order_hash} was accepted by the orderbook but could not be stored locally. {reason}")]
    SubmittedButNotStored { order_hash: String, reason: String },
}

impl OrderFlowError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RemoteUnavailable(_) => true,
            Self::RemoteApi { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Validation(_) | Self::RemoteResponse(_) | Self::Store(_) | Self::SubmittedButNotStored { .. } => false,
        }
    }
}

impl From<OrderbookApiError> for OrderFlowError {
    fn from(e: OrderbookApiError) -> Self {
        match e {
            OrderbookApiError::Unavailable(s) => Self::RemoteUnavailable(s),
            OrderbookApiError::QueryError { status, message } => Self::RemoteApi { status, message },
            OrderbookApiError::JsonError(s) | OrderbookApiError::InvalidRequest(s) => Self::RemoteResponse(s),
            OrderbookApiError::Initialization(s) => Self::RemoteResponse(format!("Client not initialised. {s}")),
        }
    }
}
