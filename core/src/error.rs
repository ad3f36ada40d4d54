//! Error types for the property-management API client.
//!
//! # Design
//! Every status code the client understands maps to its own variant, so
//! callers match on the failure they expect instead of inspecting a status
//! field. Only `UnexpectedStatus` carries the raw status and response, since it
//! is the one case where the caller has nothing else to go on.

use thiserror::Error;

use crate::http::HttpResponse;

/// Errors returned by `PmsClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The status code was outside the client's allowed set.
    #[error("{message}")]
    UnexpectedStatus {
        status: u16,
        message: String,
        response: HttpResponse,
    },

    /// The server answered 500.
    #[error("request failed with error: {body}")]
    ServerError { body: String },

    /// The server answered 400 on an endpoint without a more specific rule.
    #[error("request failed with error: {body}")]
    BadRequest { body: String },

    /// The server rejected the API key (401 or 403).
    #[error("authentication failed with status {status}: {body}")]
    InvalidCredentials { status: u16, body: String },

    /// The listing addressed by the request does not exist.
    #[error("failed to get listing with id: {listing_id} with error response: {body}")]
    PropertyNotFound { listing_id: String, body: String },

    /// The reservation addressed by the request does not exist.
    #[error("failed to get reservation with id: {reservation_id} with error response: {body}")]
    ReservationNotFound { reservation_id: String, body: String },

    /// The server refused a rates batch with 400.
    #[error("failed to post rates for listing {listing_id} with the error: {body}")]
    PostingRates { listing_id: String, body: String },

    /// A route template placeholder was not supplied.
    #[error("missing path parameter '{parameter}' for route '{template}'")]
    MissingPathParameter {
        template: &'static str,
        parameter: String,
    },

    /// The request could not be executed (connection, timeout, body read).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be decoded as JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

/// Payload-free tag for each `ApiError` variant.
///
/// Status rules and scenario expectations are written in terms of kinds so
/// they can be declared as constant tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedStatus,
    ServerError,
    BadRequest,
    InvalidCredentials,
    PropertyNotFound,
    ReservationNotFound,
    PostingRates,
    MissingPathParameter,
    Transport,
    Serialization,
    Deserialization,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            ApiError::ServerError { .. } => ErrorKind::ServerError,
            ApiError::BadRequest { .. } => ErrorKind::BadRequest,
            ApiError::InvalidCredentials { .. } => ErrorKind::InvalidCredentials,
            ApiError::PropertyNotFound { .. } => ErrorKind::PropertyNotFound,
            ApiError::ReservationNotFound { .. } => ErrorKind::ReservationNotFound,
            ApiError::PostingRates { .. } => ErrorKind::PostingRates,
            ApiError::MissingPathParameter { .. } => ErrorKind::MissingPathParameter,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Serialization(_) => ErrorKind::Serialization,
            ApiError::Deserialization(_) => ErrorKind::Deserialization,
        }
    }

    /// Status code observed on the wire, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            ApiError::ServerError { .. } => Some(500),
            ApiError::BadRequest { .. } | ApiError::PostingRates { .. } => Some(400),
            ApiError::InvalidCredentials { status, .. } => Some(*status),
            ApiError::PropertyNotFound { .. } | ApiError::ReservationNotFound { .. } => Some(404),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::UnexpectedStatus => "unexpected status",
            ErrorKind::ServerError => "server error",
            ErrorKind::BadRequest => "bad request",
            ErrorKind::InvalidCredentials => "invalid credentials",
            ErrorKind::PropertyNotFound => "property not found",
            ErrorKind::ReservationNotFound => "reservation not found",
            ErrorKind::PostingRates => "posting rates failed",
            ErrorKind::MissingPathParameter => "missing path parameter",
            ErrorKind::Transport => "transport failure",
            ErrorKind::Serialization => "serialization failure",
            ErrorKind::Deserialization => "deserialization failure",
        };
        f.write_str(name)
    }
}
