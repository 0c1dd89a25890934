//! Backend request execution.

pub mod abort;
pub mod client;

pub use abort::{AbortHandle, AbortSignal};
pub use client::{
    DEFAULT_TIMEOUT, GENERIC_ERROR_MESSAGE, Request, RequestClient, RequestError, RequestState,
};
pub use reqwest::Method;
