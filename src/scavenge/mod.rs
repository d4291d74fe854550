//! Scavenge Protocol
//!
//! Commit-reveal puzzle escrow:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SCAVENGE PROTOCOL                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  msg.rs        - CreateScavenge / CommitSolution / Reveal    │
//! │  engine.rs     - State machine and escrow settlement         │
//! │  commitment.rs - Commit preimage and binding hash            │
//! │  store.rs      - Scavenge and commit registries              │
//! │  types.rs      - Scavenge (Open | Solved) and Commit records │
//! │  events.rs     - Notifications for indexers                  │
//! │  query.rs      - Read-only lookups                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod engine;
pub mod error;
pub mod events;
pub mod msg;
pub mod query;
pub mod store;
pub mod types;

/// Module name, used in event attributes.
pub const MODULE_NAME: &str = "scavenge";

/// Route shared by all scavenge messages.
pub const ROUTER_KEY: &str = MODULE_NAME;

// Re-export key types
pub use commitment::CommitmentPreimage;
pub use engine::{Context, ProtocolEngine};
pub use error::{Result, ScavengeError};
pub use events::{EventManager, ScavengeCreated, ScavengeEvent, ScavengeSolved, SolutionCommitted};
pub use msg::{Msg, MsgCommitSolution, MsgCreateScavenge, MsgRevealSolution};
pub use query::{Query, QueryResponse};
pub use store::{
    CommitStore, MemoryCommitStore, MemoryScavengeStore, ScavengeStore, StoreCache, StoreError,
};
pub use types::{Commit, Scavenge, ScavengeStatus};
