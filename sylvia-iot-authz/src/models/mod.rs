//! Traits and implementations for storing authorizations.
//!
//! Currently we only provide the pure memory implementation. A persistent implementation only
//! needs to implement [`AuthorizationModel`] and to be added into [`ConnOptions`].

use std::sync::Arc;

pub mod authorization;
pub mod memory;
pub mod scope;

pub use authorization::{Authorization, AuthorizationModel, AuthorizationRequest, TokenType};
pub use memory::{ConflictPolicy, Model as MemoryModel, Options as MemoryOptions};

use crate::error::Error;

/// Store options for model implementation.
pub enum ConnOptions {
    /// Pure memory model implementation.
    Memory(MemoryOptions),
}

/// To create the authorization model with the specified store implementation.
pub async fn new(opts: &ConnOptions) -> Result<Arc<dyn AuthorizationModel>, Error> {
    let model: Arc<dyn AuthorizationModel> = match opts {
        ConnOptions::Memory(opts) => Arc::new(MemoryModel::new(opts)),
    };
    Ok(model)
}
