//! Error kinds of the authorization registry.

use std::num::ParseIntError;

use sylvia_iot_corelib::err::ErrResp;
use thiserror::Error;

/// 409, the token or identity has been registered.
pub const E_ALREADY_AUTHORIZED: &'static str = "err_already_authorized";
/// 501, the operation is not supported by the store.
pub const E_NOT_IMPLEMENTED: &'static str = "err_not_implemented";

#[derive(Debug, Error)]
pub enum Error {
    /// No (or malformed) bearer token was provided.
    #[error("no token provided")]
    NoToken,
    /// No scope was provided.
    #[error("no scope provided")]
    NoScope,
    /// The token is unknown, expired, revoked or lacks the required scope.
    #[error("not authorized")]
    NotAuthorized,
    #[error("already authorized")]
    AlreadyAuthorized,
    /// Empty or malformed serialized record.
    #[error("entity does not exist")]
    NoSuchEntity,
    #[error("invalid expires: {0}")]
    InvalidExpires(#[from] ParseIntError),
    #[error("not implemented")]
    NotImplemented,
    /// Failures of the underlying store.
    #[error("store error: {0}")]
    Store(String),
}

impl From<Error> for ErrResp {
    fn from(e: Error) -> Self {
        match e {
            Error::NoToken | Error::NotAuthorized => ErrResp::ErrAuth(Some(e.to_string())),
            Error::NoScope | Error::NoSuchEntity | Error::InvalidExpires(_) => {
                ErrResp::ErrParam(Some(e.to_string()))
            }
            Error::AlreadyAuthorized => {
                ErrResp::Custom(409, E_ALREADY_AUTHORIZED, Some(e.to_string()))
            }
            Error::NotImplemented => ErrResp::Custom(501, E_NOT_IMPLEMENTED, Some(e.to_string())),
            Error::Store(desc) => ErrResp::ErrDb(Some(desc)),
        }
    }
}
