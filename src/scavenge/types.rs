//! Scavenge and Commit Records
//!
//! The two record kinds held by the protocol stores. A scavenge moves from
//! `Open` to `Solved` exactly once; a commit never changes after it is
//! recorded.

use serde::{Serialize, Deserialize};

use crate::core::{Address, Coins};
use crate::scavenge::error::{Result, ScavengeError};

// =============================================================================
// SCAVENGE
// =============================================================================

/// Whether a scavenge still pays out.
///
/// Solver and revealed solution live together in `Solved`, so one can never
/// be present without the other.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScavengeStatus {
    /// Waiting for a valid reveal.
    #[default]
    Open,
    /// Paid out to `solver`, who revealed `solution`.
    Solved {
        /// Winning scavenger.
        solver: Address,
        /// Revealed plaintext.
        solution: String,
    },
}

/// A posted puzzle with its escrowed reward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scavenge {
    /// Who posted the puzzle and funded the reward.
    pub creator: Address,
    /// Free-form question text.
    pub description: String,
    /// Hex SHA-256 of the solution; store key.
    pub solution_hash: String,
    /// Amount held in escrow until solved.
    pub reward: Coins,
    /// Open or solved.
    pub status: ScavengeStatus,
}

impl Scavenge {
    /// Create an open scavenge.
    pub fn new(creator: Address, description: String, solution_hash: String, reward: Coins) -> Self {
        Self {
            creator,
            description,
            solution_hash,
            reward,
            status: ScavengeStatus::Open,
        }
    }

    /// True once a reveal has been accepted.
    pub fn is_solved(&self) -> bool {
        matches!(self.status, ScavengeStatus::Solved { .. })
    }

    /// Winning scavenger, if any.
    pub fn solver(&self) -> Option<&Address> {
        match &self.status {
            ScavengeStatus::Solved { solver, .. } => Some(solver),
            ScavengeStatus::Open => None,
        }
    }

    /// Revealed plaintext, if any.
    pub fn revealed_solution(&self) -> Option<&str> {
        match &self.status {
            ScavengeStatus::Solved { solution, .. } => Some(solution),
            ScavengeStatus::Open => None,
        }
    }

    /// Transition `Open -> Solved`. Fails if already solved.
    pub fn mark_solved(&mut self, solver: Address, solution: String) -> Result<()> {
        if self.is_solved() {
            return Err(ScavengeError::AlreadySolved(self.solution_hash.clone()));
        }
        self.status = ScavengeStatus::Solved { solver, solution };
        Ok(())
    }
}

// =============================================================================
// COMMIT
// =============================================================================

/// A scavenger's sealed claim on a solution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Scavenger who made the commitment.
    pub committer: Address,
    /// Puzzle the commitment says it targets. Informational only.
    pub solution_hash: String,
    /// Hex SHA-256 of `solution || committer`; store key.
    pub commit_hash: String,
}

impl Commit {
    /// Create a commit record.
    pub fn new(committer: Address, solution_hash: String, commit_hash: String) -> Self {
        Self {
            committer,
            solution_hash,
            commit_hash,
        }
    }
}
