//! Application-service errors.
//!
//! Each variant maps onto one HTTP status in the API layer; the services
//! never talk HTTP themselves.

use thiserror::Error;

use vendorhub_auth::{PasswordError, TokenError};
use vendorhub_core::DomainError;

use crate::session::SessionError;
use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing/invalid credentials, failed gate, missing session.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but lacking the required capability.
    #[error("{0}")]
    Forbidden(String),

    /// Absent, or present but not visible to the caller.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidId(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::InvalidId(msg) => Self::InvalidId(msg),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => Self::Validation(err.to_string()),
            StoreError::Backend(msg) => Self::Internal(msg),
        }
    }
}

impl From<SessionError> for ServiceError {
    fn from(err: SessionError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => Self::Internal(msg),
            other => Self::Unauthorized(other.to_string()),
        }
    }
}
