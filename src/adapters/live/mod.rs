//! Live adapters for real external interactions.

pub mod bridge;
pub mod clock;
pub mod cookies;
pub mod entropy;
pub mod hasher;
mod json_file;
pub mod storage;
