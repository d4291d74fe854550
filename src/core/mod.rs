//! Core primitives.
//!
//! Everything here is deterministic and free of protocol state: the hash
//! scheme, account addresses and reward amounts.

pub mod address;
pub mod coins;
pub mod hash;

// Re-export core types
pub use address::Address;
pub use coins::{Coin, Coins, CoinsError};
pub use hash::{commit_hash, solution_hash, sha256_hex, HASH_SCHEME};
