//! # Scavenge
//!
//! Commit-reveal puzzle escrow. A creator posts the hash of a secret answer
//! and locks a reward in escrow; scavengers commit to a sealed answer, then
//! reveal it. The first reveal that matches both its own commitment and the
//! puzzle hash collects the reward.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SCAVENGE                                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── hash.rs     - Solution and commit hashing (SHA-256 hex) │
//! │  ├── address.rs  - Account identities, escrow derivation     │
//! │  └── coins.rs    - Multi-denom reward amounts                │
//! │                                                              │
//! │  scavenge/       - Protocol (create → commit → reveal)       │
//! │  ├── engine.rs   - State machine and settlement              │
//! │  ├── msg.rs      - Message enum and validation               │
//! │  └── store.rs    - Scavenge and commit registries            │
//! │                                                              │
//! │  bank.rs         - Ledger collaborator                       │
//! │  app.rs          - Host: atomic delivery, queries, events    │
//! │  config.rs       - Engine policy                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Execution Model
//!
//! Operations are applied one at a time in host order. Nothing inside the
//! engine suspends, spawns or locks. Ordering between a commit and its
//! reveal is enforced only by lookups.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod app;
pub mod bank;
pub mod config;
pub mod core;
pub mod scavenge;

// Re-export commonly used types
pub use app::App;
pub use bank::{Bank, MemoryBank, TransferError};
pub use config::{EngineConfig, HashMismatchPolicy};
pub use crate::core::{Address, Coin, Coins};
pub use scavenge::{Msg, ProtocolEngine, ScavengeError, ScavengeEvent};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
