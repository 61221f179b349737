//! Common libraries of Sylvia-IoT core modules.

pub mod err;
pub mod http;
pub mod logger;
pub mod strings;
