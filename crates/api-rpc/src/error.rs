//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use waitline_core::domain::{DomainError, JoinRejection};
use waitline_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const THROTTLED: i32 = 4003;
    pub const UNAUTHORIZED: i32 = 4004;
    pub const QUEUE_EXPIRED: i32 = 4010;
    pub const QUEUE_FULL: i32 = 4011;
    pub const ALREADY_JOINED: i32 = 4012;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
///
/// Join rejections keep their contract messages ("Queue is full", ...);
/// clients display them verbatim.
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::JoinRejected(rej) => {
            let code = match rej {
                JoinRejection::InvalidInput => code::VALIDATION_ERROR,
                JoinRejection::QueueExpired => code::QUEUE_EXPIRED,
                JoinRejection::QueueFull => code::QUEUE_FULL,
                JoinRejection::AlreadyJoined => code::ALREADY_JOINED,
            };
            ErrorObjectOwned::owned(code, rej.to_string(), None::<()>)
        }
        AppError::Domain(e) => match &e {
            DomainError::ParticipantNotFound(_) => {
                ErrorObjectOwned::owned(code::NOT_FOUND, e.to_string(), None::<()>)
            }
            DomainError::InvalidStateTransition { .. } => {
                ErrorObjectOwned::owned(code::CONFLICT, e.to_string(), None::<()>)
            }
            _ => ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>),
        },
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::Unauthorized(msg) => {
            ErrorObjectOwned::owned(code::UNAUTHORIZED, msg, None::<()>)
        }
        AppError::Conflict(msg) => ErrorObjectOwned::owned(code::CONFLICT, msg, None::<()>),
        AppError::Database(msg) => ErrorObjectOwned::owned(code::DB_ERROR, msg, None::<()>),
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Io(e) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>),
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_rejections_map_to_distinct_codes() {
        let full = to_rpc_error(AppError::JoinRejected(JoinRejection::QueueFull));
        assert_eq!(full.code(), code::QUEUE_FULL);
        assert_eq!(full.message(), "Queue is full");

        let expired = to_rpc_error(AppError::JoinRejected(JoinRejection::QueueExpired));
        assert_eq!(expired.code(), code::QUEUE_EXPIRED);
        assert_eq!(expired.message(), "Queue has expired");

        let dup = to_rpc_error(AppError::JoinRejected(JoinRejection::AlreadyJoined));
        assert_eq!(dup.code(), code::ALREADY_JOINED);
        assert_eq!(dup.message(), "You are already in this queue");

        let invalid = to_rpc_error(AppError::JoinRejected(JoinRejection::InvalidInput));
        assert_eq!(invalid.code(), code::VALIDATION_ERROR);
        assert_eq!(invalid.message(), "Name and phone are required");
    }

    #[test]
    fn test_unauthorized_mapping() {
        let err = to_rpc_error(AppError::Unauthorized("Not the owner".to_string()));
        assert_eq!(err.code(), code::UNAUTHORIZED);
    }
}
