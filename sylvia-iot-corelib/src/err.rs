//! To generate HTTP error response.
//!
//! ```ignore
//! use sylvia_iot_corelib::err::ErrResp;
//! // To reject a request without a valid bearer token.
//! if token.is_none() {
//!     return Err(ErrResp::ErrAuth(Some("missing token".to_string())));
//! }
//! ```

use std::{error::Error, fmt};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The standard error definitions.
#[derive(Debug)]
pub enum ErrResp {
    ErrAuth(Option<String>),
    ErrDb(Option<String>),
    ErrParam(Option<String>),
    ErrPerm(Option<String>),
    ErrUnknown(Option<String>),
    Custom(u16, &'static str, Option<String>),
}

/// Used for generating HTTP body for errors.
#[derive(Serialize)]
struct RespJson<'a> {
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

/// 401, token not authorized.
pub const E_AUTH: &'static str = "err_auth";
/// 503, database (store) error.
pub const E_DB: &'static str = "err_db";
/// 400, request (header/body) format error.
pub const E_PARAM: &'static str = "err_param";
/// 403, invalid permission.
pub const E_PERM: &'static str = "err_perm";
/// 500, unknown error.
pub const E_UNKNOWN: &'static str = "err_unknown";

/// To generate error JSON string for HTTP body.
pub fn to_json(code: &str, message: Option<&str>) -> String {
    match serde_json::to_string(&RespJson { code, message }) {
        Err(_) => format!("{{\"code\":\"{}\"}}", code),
        Ok(body) => body,
    }
}

impl ErrResp {
    fn resp_json(&'_ self) -> RespJson<'_> {
        let (code, desc) = match self {
            ErrResp::ErrAuth(desc) => (E_AUTH, desc),
            ErrResp::ErrDb(desc) => (E_DB, desc),
            ErrResp::ErrParam(desc) => (E_PARAM, desc),
            ErrResp::ErrPerm(desc) => (E_PERM, desc),
            ErrResp::ErrUnknown(desc) => (E_UNKNOWN, desc),
            ErrResp::Custom(_, code, desc) => (*code, desc),
        };
        RespJson {
            code,
            message: desc.as_deref(),
        }
    }

    /// The HTTP status code of the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrResp::ErrAuth(_) => StatusCode::UNAUTHORIZED,
            ErrResp::ErrDb(_) => StatusCode::SERVICE_UNAVAILABLE,
            ErrResp::ErrParam(_) => StatusCode::BAD_REQUEST,
            ErrResp::ErrPerm(_) => StatusCode::FORBIDDEN,
            ErrResp::ErrUnknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ErrResp::Custom(code, _, _) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl fmt::Display for ErrResp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = self.resp_json();
        write!(f, "{}", to_json(json.code, json.message))
    }
}

impl Error for ErrResp {}

impl IntoResponse for ErrResp {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.resp_json())).into_response()
    }
}
