//! la-admin Core Library
//!
//! Session handling, the backend request client, typed API wrappers, and
//! form validation for the local authority administration client.

pub mod api;
pub mod error;
pub mod http;
pub mod models;
pub mod payment;
pub mod session;
pub mod validation;

pub use error::{AdminError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
