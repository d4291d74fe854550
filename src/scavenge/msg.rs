//! Protocol Messages
//!
//! The three messages a caller can submit, as one closed enum.
//! Messages are serialized as JSON on the wire; sign bytes are the same JSON
//! with keys sorted.

use serde::{Serialize, Deserialize};

use crate::core::{solution_hash, Address, Coins};
use crate::scavenge::commitment::CommitmentPreimage;
use crate::scavenge::error::{Result, ScavengeError};
use crate::scavenge::ROUTER_KEY;

// =============================================================================
// MESSAGE ENVELOPE
// =============================================================================

/// Any protocol message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Msg {
    /// Post a puzzle and escrow its reward.
    CreateScavenge(MsgCreateScavenge),
    /// Record a sealed claim on a solution.
    CommitSolution(MsgCommitSolution),
    /// Reveal a solution and collect the reward.
    RevealSolution(MsgRevealSolution),
}

impl Msg {
    /// Module route for every scavenge message.
    pub fn route(&self) -> &'static str {
        ROUTER_KEY
    }

    /// Message type name.
    pub fn msg_type(&self) -> &'static str {
        match self {
            Msg::CreateScavenge(_) => MsgCreateScavenge::TYPE,
            Msg::CommitSolution(_) => MsgCommitSolution::TYPE,
            Msg::RevealSolution(_) => MsgRevealSolution::TYPE,
        }
    }

    /// Accounts that must have signed the message.
    pub fn signers(&self) -> Vec<&Address> {
        match self {
            Msg::CreateScavenge(m) => vec![&m.creator],
            Msg::CommitSolution(m) => vec![&m.scavenger],
            Msg::RevealSolution(m) => vec![&m.scavenger],
        }
    }

    /// Stateless checks run before the message touches any store.
    pub fn validate_basic(&self) -> Result<()> {
        match self {
            Msg::CreateScavenge(m) => m.validate_basic(),
            Msg::CommitSolution(m) => m.validate_basic(),
            Msg::RevealSolution(m) => m.validate_basic(),
        }
    }

    /// Canonical bytes for the signer to sign: JSON with sorted keys.
    pub fn sign_bytes(&self) -> Result<Vec<u8>> {
        // serde_json::Value keeps object keys in a BTreeMap.
        let value = serde_json::to_value(self)?;
        Ok(serde_json::to_vec(&value)?)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl From<MsgCreateScavenge> for Msg {
    fn from(msg: MsgCreateScavenge) -> Self {
        Msg::CreateScavenge(msg)
    }
}

impl From<MsgCommitSolution> for Msg {
    fn from(msg: MsgCommitSolution) -> Self {
        Msg::CommitSolution(msg)
    }
}

impl From<MsgRevealSolution> for Msg {
    fn from(msg: MsgRevealSolution) -> Self {
        Msg::RevealSolution(msg)
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ScavengeError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(())
}

fn require_address(address: &Address, field: &str) -> Result<()> {
    if address.is_empty() {
        return Err(ScavengeError::InvalidInput(format!("missing {} address", field)));
    }
    Ok(())
}

// =============================================================================
// CREATE
// =============================================================================

/// Post a puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgCreateScavenge {
    /// Poster, who also funds the reward.
    pub creator: Address,
    /// Question text.
    pub description: String,
    /// Hex SHA-256 of the secret solution.
    pub solution_hash: String,
    /// Reward paid to the first valid reveal.
    pub reward: Coins,
}

impl MsgCreateScavenge {
    /// Message type name.
    pub const TYPE: &'static str = "CreateScavenge";

    /// Create a new message from an already computed hash.
    pub fn new(creator: Address, description: impl Into<String>, solution_hash: impl Into<String>, reward: Coins) -> Self {
        Self {
            creator,
            description: description.into(),
            solution_hash: solution_hash.into(),
            reward,
        }
    }

    /// Create a new message, hashing the plaintext solution locally.
    pub fn with_solution(creator: Address, description: impl Into<String>, solution: &str, reward: Coins) -> Self {
        Self::new(creator, description, solution_hash(solution), reward)
    }

    /// Stateless checks.
    pub fn validate_basic(&self) -> Result<()> {
        require_address(&self.creator, "creator")?;
        require_non_empty(&self.solution_hash, "solutionHash")?;
        Ok(())
    }
}

// =============================================================================
// COMMIT
// =============================================================================

/// Commit to a solution without revealing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgCommitSolution {
    /// Committing scavenger.
    pub scavenger: Address,
    /// Puzzle the commitment targets.
    pub solution_hash: String,
    /// Hex SHA-256 of `solution || scavenger`.
    pub commit_hash: String,
}

impl MsgCommitSolution {
    /// Message type name.
    pub const TYPE: &'static str = "CommitSolution";

    /// Create a new message from precomputed hashes.
    pub fn new(scavenger: Address, solution_hash: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        Self {
            scavenger,
            solution_hash: solution_hash.into(),
            commit_hash: commit_hash.into(),
        }
    }

    /// Build the commit for a preimage the scavenger keeps secret.
    pub fn from_preimage(preimage: &CommitmentPreimage) -> Self {
        Self::new(preimage.scavenger.clone(), preimage.solution_hash(), preimage.commit_hash())
    }

    /// Stateless checks.
    pub fn validate_basic(&self) -> Result<()> {
        require_address(&self.scavenger, "scavenger")?;
        require_non_empty(&self.solution_hash, "solutionHash")?;
        require_non_empty(&self.commit_hash, "commitHash")?;
        Ok(())
    }
}

// =============================================================================
// REVEAL
// =============================================================================

/// Reveal a committed solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsgRevealSolution {
    /// Revealing scavenger; bound into the commit hash.
    pub scavenger: Address,
    /// Puzzle hash hint; the hash of `solution` is authoritative.
    pub solution_hash: String,
    /// Plaintext solution.
    pub solution: String,
}

impl MsgRevealSolution {
    /// Message type name.
    pub const TYPE: &'static str = "RevealSolution";

    /// Create a new message.
    pub fn new(scavenger: Address, solution_hash: impl Into<String>, solution: impl Into<String>) -> Self {
        Self {
            scavenger,
            solution_hash: solution_hash.into(),
            solution: solution.into(),
        }
    }

    /// Reveal a previously committed preimage.
    pub fn from_preimage(preimage: CommitmentPreimage) -> Self {
        let hash = preimage.solution_hash();
        Self::new(preimage.scavenger, hash, preimage.solution)
    }

    /// Stateless checks.
    pub fn validate_basic(&self) -> Result<()> {
        require_address(&self.scavenger, "scavenger")?;
        require_non_empty(&self.solution_hash, "solutionHash")?;
        require_non_empty(&self.solution, "solution")?;
        Ok(())
    }
}
