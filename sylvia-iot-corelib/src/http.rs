//! HTTP header utilities.

use axum::http::{HeaderMap, header};

use crate::err::ErrResp;

/// The only accepted authentication scheme of the `Authorization` header.
pub const BEARER: &'static str = "Bearer";

/// Parse Authorization header content. Returns `None` means no Authorization header.
pub fn parse_header_auth(headers: &HeaderMap) -> Result<Option<String>, ErrResp> {
    let mut auth_all = headers.get_all(header::AUTHORIZATION).iter();
    let auth = match auth_all.next() {
        None => return Ok(None),
        Some(auth) => match auth.to_str() {
            Err(e) => return Err(ErrResp::ErrParam(Some(e.to_string()))),
            Ok(auth) => auth,
        },
    };
    if auth_all.next().is_some() {
        return Err(ErrResp::ErrParam(Some(
            "invalid multiple Authorization header".to_string(),
        )));
    }
    Ok(Some(auth.to_string()))
}

/// To get the token of a `Bearer <token>` header value.
///
/// The value must be exactly two parts separated by one space and the first part must be
/// [`BEARER`]. Returns `None` for empty or malformed values.
pub fn bearer_token(auth: &str) -> Option<&str> {
    if auth.len() == 0 {
        return None;
    }
    let mut parts = auth.split(' ');
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return None,
    };
    match scheme == BEARER {
        false => None,
        true => Some(token),
    }
}
