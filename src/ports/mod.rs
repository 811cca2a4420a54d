//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the identifier core and a
//! collaborator it does not own (time, randomness, hashing, durable storage,
//! cookies, the embedding host). Implementations live in `src/adapters/`.

pub mod bridge;
pub mod clock;
pub mod cookies;
pub mod entropy;
pub mod hasher;
pub mod storage;

pub use bridge::{BridgeFuture, HostBridge};
pub use clock::Clock;
pub use cookies::{CookieOptions, CookieStore};
pub use entropy::EntropySource;
pub use hasher::CidHasher;
pub use storage::KeyValueStore;
