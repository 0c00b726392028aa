use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use limit_order_engine::OrderFlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request query: {0}")]
    InvalidQuery(String),
    #[error("The orderbook rejected the request. {message}")]
    RemoteRejected { status: u16, message: String },
    #[error("The orderbook returned an error. {0}")]
    RemoteError(String),
    #[error("The orderbook is unavailable. {0}")]
    RemoteUnavailable(String),
    #[error("Order {order_hash} was submitted to the orderbook but could not be stored. {reason}")]
    SubmittedButNotStored { order_hash: String, reason: String },
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::RemoteRejected { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(StatusCode::is_client_error)
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::RemoteError(_) => StatusCode::BAD_GATEWAY,
            Self::RemoteUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::SubmittedButNotStored { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::SubmittedButNotStored { order_hash, .. } => serde_json::json!({
                "error": self.to_string(),
                "order_hash": order_hash,
                "remote_submitted": true,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::Validation(e) => Self::InvalidRequest(e.to_string()),
            OrderFlowError::RemoteApi { status, message } if (400..500).contains(&status) => {
                Self::RemoteRejected { status, message }
            },
            OrderFlowError::RemoteApi { status, message } => Self::RemoteError(format!("Error {status}. {message}")),
            OrderFlowError::RemoteResponse(s) => Self::RemoteError(s),
            OrderFlowError::RemoteUnavailable(s) => Self::RemoteUnavailable(s),
            OrderFlowError::Store(e) => Self::BackendError(e.to_string()),
            OrderFlowError::SubmittedButNotStored { order_hash, reason } => {
                Self::SubmittedButNotStored { order_hash, reason }
            },
        }
    }
}

#[cfg(test)]
mod test {
    use actix_web::body::MessageBody;
    use limit_order_engine::OrderStoreError;
    use lop_common::ValidationError;

    use super::*;

    fn status_of(e: OrderFlowError) -> StatusCode {
        ServerError::from(e).status_code()
    }

    #[test]
    fn flow_errors_map_to_status_codes() {
        assert_eq!(status_of(ValidationError::InvalidChainId.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(OrderFlowError::RemoteApi { status: 404, message: "".into() }), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(OrderFlowError::RemoteApi { status: 429, message: "".into() }),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(status_of(OrderFlowError::RemoteApi { status: 500, message: "".into() }), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(OrderFlowError::RemoteResponse("bad json".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(OrderFlowError::RemoteUnavailable("timeout".into())), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_of(OrderFlowError::Store(OrderStoreError::DatabaseError("locked".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_stored_flags_the_remote_submission() {
        let err = ServerError::from(OrderFlowError::SubmittedButNotStored {
            order_hash: "0xabc".into(),
            reason: "disk full".into(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.error_response().into_body().try_into_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["remote_submitted"], true);
        assert_eq!(json["order_hash"], "0xabc");
    }
}
