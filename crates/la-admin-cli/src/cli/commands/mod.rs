//! Screen handlers, one module per area.

pub mod authority;
pub mod config;
pub mod dashboard;
pub mod payment;
pub mod session;
pub mod user;
