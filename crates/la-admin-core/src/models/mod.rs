//! Domain models exchanged with the backend.

pub mod local_authority;
pub mod transaction;
pub mod user;

pub use local_authority::*;
pub use transaction::*;
pub use user::*;
