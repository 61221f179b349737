use std::{error::Error as StdError, sync::Arc};

use log::info;

use crate::{
    authorizer::{self, Authorizer},
    libs::config::{self, Config},
    models::{self, ConflictPolicy, ConnOptions, MemoryOptions, scope::ScopeMatch},
};

pub mod middleware;

pub use middleware::AuthService;

/// The resources used by the HTTP layer.
#[derive(Clone)]
pub struct State {
    pub authorizer: Arc<Authorizer>,
}

impl State {
    /// To create the middleware that requires `scope` by default.
    pub fn auth_service(&self, scope: &str) -> AuthService {
        AuthService::new(&self.authorizer, scope)
    }
}

/// To create resources from the configuration.
pub async fn new_state(conf: &Config) -> Result<State, Box<dyn StdError>> {
    const FN_NAME: &'static str = "new_state";

    let conf = config::apply_default(conf);
    let conflict = conf
        .conflict_policy
        .as_deref()
        .and_then(ConflictPolicy::from_name)
        .unwrap_or_default();
    let opts = authorizer::Options {
        expires_in_days: conf
            .expires_in_days
            .unwrap_or(authorizer::DEF_EXPIRES_IN_DAYS),
        scope_match: conf
            .scope_match
            .as_deref()
            .and_then(ScopeMatch::from_name)
            .unwrap_or_default(),
    };

    let model = models::new(&ConnOptions::Memory(MemoryOptions { conflict })).await?;
    info!(
        "[{}] memory store with {} policy, {} scope match, expires in {} days",
        FN_NAME,
        conflict.name(),
        opts.scope_match.name(),
        opts.expires_in_days
    );
    Ok(State {
        authorizer: Arc::new(Authorizer::new(model, opts)),
    })
}
