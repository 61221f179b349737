//! Bearer token extraction and the authorization middleware.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/api/v1/device", routing::get(list).post(add))
//!     .layer(AuthService::new(&state.authorizer, SCOPE_READ).method_scope(Method::POST, SCOPE_WRITE));
//! ```

use std::{
    collections::HashMap,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use log::debug;
use tower::{Layer, Service};

use sylvia_iot_corelib::{
    err::ErrResp,
    http::{bearer_token, parse_header_auth},
};

use crate::{authorizer::Authorizer, error::Error, models::Authorization};

/// The layer that checks the bearer token and the required scope of each request.
///
/// The granted [`Authorization`] is inserted into the request extensions.
#[derive(Clone)]
pub struct AuthService {
    authorizer: Arc<Authorizer>,
    scope: String,
    method_scopes: HashMap<Method, String>,
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    authorizer: Arc<Authorizer>,
    scope: String,
    method_scopes: HashMap<Method, String>,
    service: S,
}

impl AuthService {
    /// `scope` is required by methods without their own scopes.
    pub fn new(authorizer: &Arc<Authorizer>, scope: &str) -> Self {
        AuthService {
            authorizer: authorizer.clone(),
            scope: scope.to_string(),
            method_scopes: HashMap::new(),
        }
    }

    /// To require another scope for the method.
    pub fn method_scope(mut self, method: Method, scope: &str) -> Self {
        self.method_scopes.insert(method, scope.to_string());
        self
    }
}

impl<S> Layer<S> for AuthService {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            authorizer: self.authorizer.clone(),
            scope: self.scope.clone(),
            method_scopes: self.method_scopes.clone(),
            service: inner,
        }
    }
}

impl<S> Service<Request> for AuthMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        const FN_NAME: &'static str = "AuthMiddleware::call";

        let mut svc = self.service.clone();
        let authorizer = self.authorizer.clone();
        let scope = match self.method_scopes.get(req.method()) {
            None => self.scope.clone(),
            Some(scope) => scope.clone(),
        };
        let token = get_bearer_token(req.headers());

        Box::pin(async move {
            let result = match token {
                Err(e) => Err(e),
                Ok(token) => {
                    authorizer
                        .check_authorization(token.as_str(), scope.as_str())
                        .await
                }
            };
            let auth = match result {
                Err(e) => {
                    debug!(
                        "[{}] {} {} denied: {}",
                        FN_NAME,
                        req.method(),
                        req.uri().path(),
                        e
                    );
                    return Ok(ErrResp::from(e).into_response());
                }
                Ok(auth) => auth,
            };
            req.extensions_mut().insert(auth);

            let res = svc.call(req).await?;
            Ok(res)
        })
    }
}

/// To get the bearer token of the `Authorization: Bearer <token>` header.
///
/// Missing, repeated and malformed headers are [`Error::NoToken`].
pub fn get_bearer_token(headers: &HeaderMap) -> Result<String, Error> {
    let auth = match parse_header_auth(headers) {
        Err(_) => return Err(Error::NoToken),
        Ok(auth) => match auth {
            None => return Err(Error::NoToken),
            Some(auth) => auth,
        },
    };
    match bearer_token(auth.as_str()) {
        Some(token) if token.len() > 0 => Ok(token.to_string()),
        _ => Err(Error::NoToken),
    }
}

/// To check the bearer token of the request with the required scope.
pub async fn check_request(
    authorizer: &Authorizer,
    headers: &HeaderMap,
    scope: &str,
) -> Result<Authorization, Error> {
    let token = get_bearer_token(headers)?;
    authorizer.check_authorization(token.as_str(), scope).await
}

/// To get the client ID of the bearer token of the request.
///
/// This is an identity lookup, not a permission grant. Use [`check_request`] for permissions.
pub async fn get_client_id(authorizer: &Authorizer, headers: &HeaderMap) -> Result<String, Error> {
    let token = get_bearer_token(headers)?;
    authorizer.resolve_client_id(token.as_str()).await
}
