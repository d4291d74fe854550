//! Solution Commitments
//!
//! Commit to a solution before revealing it.
//! The commitment binds the plaintext to the scavenger's address so a
//! revealed answer cannot be replayed by anyone else.

use serde::{Serialize, Deserialize};

use crate::core::{commit_hash, solution_hash, Address};

/// The secret half of a commitment, kept by the scavenger until reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentPreimage {
    /// Plaintext candidate solution.
    pub solution: String,
    /// Scavenger the commitment belongs to.
    pub scavenger: Address,
}

impl CommitmentPreimage {
    /// Create a preimage.
    pub fn new(solution: impl Into<String>, scavenger: Address) -> Self {
        Self {
            solution: solution.into(),
            scavenger,
        }
    }

    /// Binding hash, `sha256(solution || scavenger)`.
    pub fn commit_hash(&self) -> String {
        commit_hash(&self.solution, &self.scavenger)
    }

    /// Puzzle hash, `sha256(solution)`.
    pub fn solution_hash(&self) -> String {
        solution_hash(&self.solution)
    }
}
