use thiserror::Error;

use crate::bank::TransferError;
use crate::scavenge::store::StoreError;

/// Protocol errors. A failed operation leaves every store as it was.
#[derive(Error, Debug)]
pub enum ScavengeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Scavenge with solution hash {0} already exists")]
    DuplicateScavenge(String),

    #[error("Commit with hash {0} already exists")]
    DuplicateCommit(String),

    #[error("No commit with hash {0}")]
    CommitNotFound(String),

    #[error("No scavenge with solution hash {0}")]
    ScavengeNotFound(String),

    #[error("Scavenge {0} has already been solved")]
    AlreadySolved(String),

    #[error("Solution hash mismatch: supplied {supplied}, derived {derived}")]
    HashMismatch { supplied: String, derived: String },

    #[error("Escrow transfer failed: {0}")]
    EscrowTransferFailed(#[from] TransferError),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Codec error: {0}")]
    Codec(String),
}

impl ScavengeError {
    /// Stable short name of the error kind, used in logs and responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::DuplicateScavenge(_) => "duplicate_scavenge",
            Self::DuplicateCommit(_) => "duplicate_commit",
            Self::CommitNotFound(_) => "commit_not_found",
            Self::ScavengeNotFound(_) => "scavenge_not_found",
            Self::AlreadySolved(_) => "already_solved",
            Self::HashMismatch { .. } => "hash_mismatch",
            Self::EscrowTransferFailed(_) => "escrow_transfer_failed",
            Self::Store(_) => "store",
            Self::Codec(_) => "codec",
        }
    }
}

impl From<serde_json::Error> for ScavengeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScavengeError>;
