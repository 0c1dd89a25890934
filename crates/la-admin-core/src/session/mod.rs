//! Client-side session management.

pub mod clock;
pub mod guard;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use guard::{EXPIRY_KEY, SESSION_DURATION_MS, SessionGuard, SessionState, TOKEN_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};
