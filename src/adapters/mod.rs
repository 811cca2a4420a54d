//! Adapter implementations for port traits.
//!
//! - [`live`] talks to the real system: OS randomness, the wall clock and
//!   JSON files standing in for browser storage.
//! - [`memory`] keeps everything in process, with knobs for tests.

pub mod live;
pub mod memory;
