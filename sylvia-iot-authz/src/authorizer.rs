//! Request-time authorization decisions.
//!
//! [`Authorizer::check_authorization`] answers whether a presented bearer token is currently
//! valid and carries the required scope. Unknown, expired and revoked tokens are all denied with
//! [`Error::NotAuthorized`] so that callers cannot tell whether a token ever existed.

use std::sync::Arc;

use crate::{
    error::Error,
    models::{
        Authorization, AuthorizationModel, AuthorizationRequest,
        scope::{SCOPE_ADMIN, ScopeMatch},
    },
};

/// Authorizer options.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// The lifetime of authorizations created by [`Authorizer::issue`]. `0` means never expires.
    pub expires_in_days: i64,
    pub scope_match: ScopeMatch,
}

#[derive(Clone)]
pub struct Authorizer {
    model: Arc<dyn AuthorizationModel>,
    opts: Options,
}

pub const DEF_EXPIRES_IN_DAYS: i64 = 30;

impl Authorizer {
    pub fn new(model: Arc<dyn AuthorizationModel>, opts: Options) -> Self {
        Authorizer { model, opts }
    }

    pub fn model(&self) -> &dyn AuthorizationModel {
        self.model.as_ref()
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// To create and register an authorization with the configured lifetime.
    pub async fn issue(&self, req: &AuthorizationRequest) -> Result<Authorization, Error> {
        self.issue_for(req, self.opts.expires_in_days).await
    }

    /// To create and register an authorization with the specified lifetime.
    pub async fn issue_for(
        &self,
        req: &AuthorizationRequest,
        expires_in_days: i64,
    ) -> Result<Authorization, Error> {
        let auth = Authorization::new(req, expires_in_days);
        self.model.register(&auth).await?;
        Ok(auth)
    }

    /// To register an authorization with the token of the request.
    pub async fn import(
        &self,
        req: &AuthorizationRequest,
        expires_in_days: i64,
    ) -> Result<Authorization, Error> {
        let auth = Authorization::import(req, expires_in_days)?;
        self.model.register(&auth).await?;
        Ok(auth)
    }

    /// To validate the token and the required scope.
    ///
    /// An authorization with the admin scope is granted regardless of `scope`.
    pub async fn check_authorization(
        &self,
        token: &str,
        scope: &str,
    ) -> Result<Authorization, Error> {
        if token.len() == 0 {
            return Err(Error::NoToken);
        }

        let auth = match self.model.find_by_token(token).await {
            Ok(Some(auth)) if auth.is_valid() => auth,
            _ => return Err(Error::NotAuthorized),
        };
        if self.opts.scope_match.matches(auth.scope.as_str(), SCOPE_ADMIN) {
            return Ok(auth);
        }
        match self.opts.scope_match.matches(auth.scope.as_str(), scope) {
            false => Err(Error::NotAuthorized),
            true => Ok(auth),
        }
    }

    /// To get the client ID of the token.
    ///
    /// Neither validity nor scope is checked, so the result must not be treated as a grant.
    pub async fn resolve_client_id(&self, token: &str) -> Result<String, Error> {
        match self.model.find_by_token(token).await? {
            None => Err(Error::NotAuthorized),
            Some(auth) => Ok(auth.client_id),
        }
    }

    pub async fn find_by_identity(
        &self,
        realm: &str,
        client_id: &str,
    ) -> Result<Option<Authorization>, Error> {
        self.model.find_by_identity(realm, client_id).await
    }

    /// To revoke the token. Returns [`Error::NotAuthorized`] for unknown tokens.
    pub async fn revoke(&self, token: &str) -> Result<Authorization, Error> {
        match self.model.revoke(token).await? {
            None => Err(Error::NotAuthorized),
            Some(auth) => Ok(auth),
        }
    }

    /// To delete the authorization of the identity. Returns [`Error::NotImplemented`] if the
    /// store does not support deleting.
    pub async fn delete(
        &self,
        realm: &str,
        client_id: &str,
    ) -> Result<Option<Authorization>, Error> {
        self.model.delete(realm, client_id).await
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            expires_in_days: DEF_EXPIRES_IN_DAYS,
            scope_match: ScopeMatch::default(),
        }
    }
}
