//! The bearer token authorization registry of the Sylvia-IoT platform.
//!
//! This module provides:
//!
//! - Authorization records (a user, app or bot with a scope within a realm) and their text
//!   record format.
//! - The authorization store with lookups by token and by realm/client ID.
//! - Request-time checks of bearer tokens and scopes, and an axum middleware.
//!
//! # Protect your axum App
//!
//! ```ignore
//! use axum::{Router, routing};
//! use clap::Command;
//! use sylvia_iot_authz::{libs, models::scope::SCOPE_READ, routes};
//! use sylvia_iot_corelib::logger;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cmd = logger::reg_args(Command::new("your-project-name"));
//!     let args = libs::config::reg_args(cmd).get_matches();
//!     let log_conf = logger::read_args(&args);
//!     logger::init("your-project-name", &log_conf).unwrap();
//!     let conf = libs::config::read_args(&args);
//!     let state = routes::new_state(&conf).await.unwrap();
//!     let app = Router::new()
//!         .route("/api/v1/resource", routing::get(get_resource))
//!         .layer(state.auth_service(SCOPE_READ));
//!     // serve the app...
//! }
//! ```

pub mod authorizer;
pub mod error;
pub mod libs;
pub mod models;
pub mod routes;

pub use error::Error;
