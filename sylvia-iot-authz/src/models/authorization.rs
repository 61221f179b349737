//! Traits and structs for authorizations.
//!
//! An authorization represents a user, app or bot and the permissions (scope) it has within a
//! realm. The `(realm, client_id)` pair identifies the holder and the token is the bearer
//! credential presented by requests.
//!
//! # Text record
//!
//! An authorization can be stored or transferred as one line of 7 comma-separated fields:
//!
//! ```text
//! client_id,realm,token,token_type,user_id,scope,expires
//! ```
//!
//! Fields are not escaped so they must never contain commas. `revoked`, `created` and `updated`
//! are not part of the record: a parsed authorization is never revoked and its timestamps are
//! the parsing time.

use std::{fmt, str::FromStr};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use sylvia_iot_corelib::strings;

use super::scope::SCOPE_ADMIN;
use crate::error::Error;

/// Authentication types of the credential.
pub struct AuthType;

impl AuthType {
    pub const BEARER_TOKEN: &'static str = "token";
    pub const JWT: &'static str = "jwt";
    pub const SLACK: &'static str = "slack";
}

/// Provenance of the credential. It does not change how the authorization is validated.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    User,
    App,
    Api,
    Bot,
}

/// The item content.
///
/// Two authorizations are equal when their tokens, realms, client IDs and user IDs are equal.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Authorization {
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub realm: String,
    pub token: String,
    #[serde(rename = "tokenType")]
    pub token_type: TokenType,
    /// Depends on `token_type`. For example the email of a user or the user ID of a bot.
    #[serde(rename = "userId")]
    pub user_id: String,
    pub scope: String,
    /// Seconds from Epoch. `0` means never expires.
    pub expires: i64,
    #[serde(skip)]
    pub revoked: bool,
    #[serde(skip)]
    pub created: i64,
    #[serde(skip)]
    pub updated: i64,
}

/// The login/authorization request from a user, app or bot.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthorizationRequest {
    pub realm: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// A generated short ID will be used if missing.
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,
    /// Only used by [`Authorization::import`].
    pub token: Option<String>,
    /// An empty scope will be used if missing. It grants nothing but the admin scope checks.
    pub scope: Option<String>,
}

/// Model operations.
///
/// The store keeps two indices: by token and by `realm.client_id`. Implementations must update
/// both indices atomically.
#[async_trait]
pub trait AuthorizationModel: Send + Sync {
    /// To add an item or to overwrite the items with the same token or identity.
    async fn register(&self, auth: &Authorization) -> Result<(), Error>;

    /// To get an item by the token. Returns [`Error::NoToken`] for an empty token.
    async fn find_by_token(&self, token: &str) -> Result<Option<Authorization>, Error>;

    /// To get an item by the identity.
    async fn find_by_identity(
        &self,
        realm: &str,
        client_id: &str,
    ) -> Result<Option<Authorization>, Error>;

    /// To mark an item revoked. Returns the revoked item.
    async fn revoke(&self, _token: &str) -> Result<Option<Authorization>, Error> {
        Err(Error::NotImplemented)
    }

    /// To delete an item from both indices. Returns the deleted item.
    async fn delete(
        &self,
        _realm: &str,
        _client_id: &str,
    ) -> Result<Option<Authorization>, Error> {
        Err(Error::NotImplemented)
    }
}

/// Seconds of one day.
pub const DAY_SECS: i64 = 24 * 60 * 60;

impl TokenType {
    pub const USER: &'static str = "user";
    pub const APP: &'static str = "app";
    pub const API: &'static str = "api";
    pub const BOT: &'static str = "bot";

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::User => Self::USER,
            TokenType::App => Self::APP,
            TokenType::Api => Self::API,
            TokenType::Bot => Self::BOT,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::USER => Ok(TokenType::User),
            Self::APP => Ok(TokenType::App),
            Self::API => Ok(TokenType::Api),
            Self::BOT => Ok(TokenType::Bot),
            _ => Err(Error::NoSuchEntity),
        }
    }
}

impl Authorization {
    /// To create an authorization with a generated token.
    ///
    /// The `token` of the request is ignored. `expires_in_days` `0` means never expires and a
    /// negative value creates an expired authorization. Out-of-range lifetimes saturate at the
    /// `i64` bounds.
    pub fn new(req: &AuthorizationRequest, expires_in_days: i64) -> Self {
        let now = Utc::now();
        Self::build(req, strings::long_token(&now), expires_in_days)
    }

    /// To create an authorization with the token of the request, for importing or rotating
    /// tokens issued elsewhere.
    pub fn import(req: &AuthorizationRequest, expires_in_days: i64) -> Result<Self, Error> {
        match req.token.as_deref() {
            None | Some("") => Err(Error::NoToken),
            Some(token) => Ok(Self::build(req, token.to_string(), expires_in_days)),
        }
    }

    fn build(req: &AuthorizationRequest, token: String, expires_in_days: i64) -> Self {
        let now = Utc::now();
        let now_secs = now.timestamp();
        Authorization {
            client_id: match req.client_id.as_deref() {
                None | Some("") => strings::short_id(&now),
                Some(client_id) => client_id.to_string(),
            },
            realm: req.realm.clone(),
            token,
            token_type: TokenType::default(),
            user_id: req.user_id.clone(),
            scope: req.scope.clone().unwrap_or_default(),
            expires: match expires_in_days {
                0 => 0,
                days => now_secs.saturating_add(days.saturating_mul(DAY_SECS)),
            },
            revoked: false,
            created: now_secs,
            updated: now_secs,
        }
    }

    /// Not revoked and not expired.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now().timestamp())
    }

    /// [`Authorization::is_valid`] at the specified time in seconds.
    pub fn is_valid_at(&self, now: i64) -> bool {
        if self.revoked {
            return false;
        }
        self.expires == 0 || self.expires >= now
    }

    /// Contains [`SCOPE_ADMIN`] (substring match).
    pub fn has_admin_scope(&self) -> bool {
        self.scope.contains(SCOPE_ADMIN)
    }

    /// The identity index key.
    pub fn identity_key(&self) -> String {
        identity_key(self.realm.as_str(), self.client_id.as_str())
    }
}

impl PartialEq for Authorization {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
            && self.realm == other.realm
            && self.client_id == other.client_id
            && self.user_id == other.user_id
    }
}

impl Eq for Authorization {}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{}",
            self.client_id,
            self.realm,
            self.token,
            self.token_type,
            self.user_id,
            self.scope,
            self.expires
        )
    }
}

impl FromStr for Authorization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 0 {
            return Err(Error::NoSuchEntity);
        }
        let parts: Vec<&str> = s.split(',').collect();
        let &[client_id, realm, token, token_type, user_id, scope, expires] = parts.as_slice()
        else {
            return Err(Error::NoSuchEntity);
        };
        let expires = expires.parse::<i64>()?;
        let now = Utc::now().timestamp();
        Ok(Authorization {
            client_id: client_id.to_string(),
            realm: realm.to_string(),
            token: token.to_string(),
            token_type: token_type.parse()?,
            user_id: user_id.to_string(),
            scope: scope.to_string(),
            expires,
            revoked: false,
            created: now,
            updated: now,
        })
    }
}

/// To generate the identity index key `realm.client_id`.
pub fn identity_key(realm: &str, client_id: &str) -> String {
    format!("{}.{}", realm, client_id)
}
