use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use bottega_engine::{OrderFlowError, OrderQueryError};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("No user identity was supplied with the request")]
    MissingIdentityHeader,
    #[error("Could not read the user identity headers. {0}")]
    MalformedIdentityHeader(String),
    #[error("Could not read request query: {0}")]
    InvalidRequestQuery(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("{0}")]
    OrderFlow(#[from] OrderFlowError),
    #[error("{0}")]
    OrderQuery(#[from] OrderQueryError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingIdentityHeader => StatusCode::UNAUTHORIZED,
            Self::MalformedIdentityHeader(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestQuery(_) => StatusCode::BAD_REQUEST,
            Self::OrderFlow(e) => order_flow_status(e),
            Self::OrderQuery(e) => order_query_status(e),
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Internal detail stays in the logs. Clients get a bland 500.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("💻️ Internal server error: {self}");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": message }).to_string())
    }
}

fn order_flow_status(e: &OrderFlowError) -> StatusCode {
    match e {
        OrderFlowError::ValidationError(_) => StatusCode::BAD_REQUEST,
        OrderFlowError::ProductUnavailable(_) => StatusCode::BAD_REQUEST,
        OrderFlowError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
        OrderFlowError::AmountMismatch { .. } => StatusCode::BAD_REQUEST,
        OrderFlowError::InvalidOrderState { .. } => StatusCode::BAD_REQUEST,
        OrderFlowError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        OrderFlowError::Forbidden(_) => StatusCode::FORBIDDEN,
        OrderFlowError::InvalidTransition { .. } => StatusCode::FORBIDDEN,
        OrderFlowError::DuplicatePayment(_) => StatusCode::CONFLICT,
        OrderFlowError::DuplicateTransactionId(_) => StatusCode::CONFLICT,
        OrderFlowError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn order_query_status(e: &OrderQueryError) -> StatusCode {
    match e {
        OrderQueryError::QueryError(_) => StatusCode::BAD_REQUEST,
        OrderQueryError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        OrderQueryError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
        OrderQueryError::Forbidden(_) => StatusCode::FORBIDDEN,
        OrderQueryError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
