//! Pure memory store.
//!
//! Records are kept in the token index and the identity index maps `realm.client_id` to the
//! token, so both lookups return the same record. Both indices live behind one lock.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::authorization::{Authorization, AuthorizationModel, identity_key};
use crate::error::Error;

/// How to handle registering a token or identity that already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ConflictPolicy {
    /// Last write wins. Items replaced on either index are removed from both indices.
    #[default]
    Overwrite,
    /// Returns [`Error::AlreadyAuthorized`].
    Reject,
}

pub struct Options {
    pub conflict: ConflictPolicy,
}

/// Model instance.
pub struct Model {
    conflict: ConflictPolicy,
    indices: RwLock<Indices>,
}

#[derive(Default)]
struct Indices {
    /// token -> item.
    tokens: HashMap<String, Authorization>,
    /// `realm.client_id` -> token.
    identities: HashMap<String, String>,
}

impl ConflictPolicy {
    pub const OVERWRITE: &'static str = "overwrite";
    pub const REJECT: &'static str = "reject";

    /// To parse the configuration value. Returns `None` for unknown values.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            Self::OVERWRITE => Some(ConflictPolicy::Overwrite),
            Self::REJECT => Some(ConflictPolicy::Reject),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConflictPolicy::Overwrite => Self::OVERWRITE,
            ConflictPolicy::Reject => Self::REJECT,
        }
    }
}

impl Model {
    pub fn new(opts: &Options) -> Self {
        Model {
            conflict: opts.conflict,
            indices: RwLock::new(Indices::default()),
        }
    }

    /// The number of items.
    pub async fn len(&self) -> usize {
        self.indices.read().await.tokens.len()
    }
}

impl Indices {
    /// Removes the item of the token from both indices.
    fn remove_token(&mut self, token: &str) -> Option<Authorization> {
        let auth = self.tokens.remove(token)?;
        let key = auth.identity_key();
        if self.identities.get(&key).is_some_and(|t| t == token) {
            self.identities.remove(&key);
        }
        Some(auth)
    }
}

#[async_trait]
impl AuthorizationModel for Model {
    async fn register(&self, auth: &Authorization) -> Result<(), Error> {
        if auth.token.len() == 0 {
            return Err(Error::NoToken);
        }
        let key = auth.identity_key();

        let mut lock = self.indices.write().await;
        let old_token = lock.identities.get(&key).cloned();
        if self.conflict == ConflictPolicy::Reject
            && (old_token.is_some() || lock.tokens.contains_key(&auth.token))
        {
            return Err(Error::AlreadyAuthorized);
        }
        if let Some(old_token) = old_token {
            lock.remove_token(old_token.as_str());
        }
        lock.remove_token(auth.token.as_str());
        lock.tokens.insert(auth.token.clone(), auth.clone());
        lock.identities.insert(key, auth.token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Authorization>, Error> {
        if token.len() == 0 {
            return Err(Error::NoToken);
        }
        let lock = self.indices.read().await;
        Ok(lock.tokens.get(token).cloned())
    }

    async fn find_by_identity(
        &self,
        realm: &str,
        client_id: &str,
    ) -> Result<Option<Authorization>, Error> {
        let lock = self.indices.read().await;
        let auth = lock
            .identities
            .get(&identity_key(realm, client_id))
            .and_then(|token| lock.tokens.get(token));
        Ok(auth.cloned())
    }

    async fn revoke(&self, token: &str) -> Result<Option<Authorization>, Error> {
        if token.len() == 0 {
            return Err(Error::NoToken);
        }
        let mut lock = self.indices.write().await;
        let auth = match lock.tokens.get_mut(token) {
            None => return Ok(None),
            Some(auth) => auth,
        };
        auth.revoked = true;
        auth.updated = Utc::now().timestamp();
        Ok(Some(auth.clone()))
    }

    async fn delete(&self, realm: &str, client_id: &str) -> Result<Option<Authorization>, Error> {
        let mut lock = self.indices.write().await;
        let token = match lock.identities.get(&identity_key(realm, client_id)) {
            None => return Ok(None),
            Some(token) => token.clone(),
        };
        Ok(lock.remove_token(token.as_str()))
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            conflict: ConflictPolicy::default(),
        }
    }
}
