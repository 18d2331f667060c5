//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a participant or a transaction does not exist.
//! - [`Forbidden`] thrown when the caller has no standing over a transaction.
//! - [`IntegrityViolation`] thrown when a participant points to nothing.
//! - [`Transient`] thrown when the storage could not be reached; safe to retry.
//! - [`InvalidConfig`] thrown by the builder on a setting out of range.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`IntegrityViolation`]: EngineError::IntegrityViolation
//!  [`Transient`]: EngineError::Transient
//!  [`InvalidConfig`]: EngineError::InvalidConfig
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Storage unavailable: {0}")]
    Transient(DbErr),
    #[error(transparent)]
    Database(DbErr),
}

impl EngineError {
    /// Whether repeating the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<DbErr> for EngineError {
    fn from(value: DbErr) -> Self {
        match value {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => Self::Transient(value),
            other => Self::Database(other),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::IntegrityViolation(a), Self::IntegrityViolation(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidConfig(a), Self::InvalidConfig(b)) => a == b,
            (Self::Transient(a), Self::Transient(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnAcquireErr, RuntimeErr};

    use super::*;

    #[test]
    fn pool_exhaustion_is_transient() {
        let err = EngineError::from(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout));
        assert!(err.is_transient());
    }

    #[test]
    fn connection_failure_is_transient() {
        let err = EngineError::from(DbErr::Conn(RuntimeErr::Internal("reset".to_string())));
        assert!(err.is_transient());
    }

    #[test]
    fn query_failure_is_not_transient() {
        let err = EngineError::from(DbErr::Custom("bad column".to_string()));
        assert!(!err.is_transient());
        assert_eq!(err, EngineError::Database(DbErr::Custom("bad column".to_string())));
    }
}
