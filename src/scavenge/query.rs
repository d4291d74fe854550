//! Read-only lookups over the stores.

use serde::{Serialize, Deserialize};

use crate::scavenge::error::{Result, ScavengeError};
use crate::scavenge::store::{CommitStore, ScavengeStore, StoreError};
use crate::scavenge::types::{Commit, Scavenge};

/// A read request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    /// One scavenge by solution hash.
    GetScavenge { solution_hash: String },
    /// All scavenges, ordered by solution hash.
    ListScavenges,
    /// One commit by commit hash.
    GetCommit { commit_hash: String },
    /// All commits, ordered by commit hash.
    ListCommits,
}

/// Answer to a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "data", rename_all = "snake_case")]
pub enum QueryResponse {
    Scavenge(Scavenge),
    Scavenges(Vec<Scavenge>),
    Commit(Commit),
    Commits(Vec<Commit>),
}

/// Fetch one scavenge.
pub fn get_scavenge(store: &dyn ScavengeStore, solution_hash: &str) -> Result<Scavenge> {
    store.get(solution_hash).map_err(|e| match e {
        StoreError::NotFound(key) => ScavengeError::ScavengeNotFound(key),
        other => ScavengeError::Store(other),
    })
}

/// Fetch one commit.
pub fn get_commit(store: &dyn CommitStore, commit_hash: &str) -> Result<Commit> {
    store.get(commit_hash).map_err(|e| match e {
        StoreError::NotFound(key) => ScavengeError::CommitNotFound(key),
        other => ScavengeError::Store(other),
    })
}

/// Answer a query against the two stores.
pub fn query(scavenges: &dyn ScavengeStore, commits: &dyn CommitStore, query: &Query) -> Result<QueryResponse> {
    let response = match query {
        Query::GetScavenge { solution_hash } => QueryResponse::Scavenge(get_scavenge(scavenges, solution_hash)?),
        Query::ListScavenges => QueryResponse::Scavenges(scavenges.list().map_err(ScavengeError::Store)?),
        Query::GetCommit { commit_hash } => QueryResponse::Commit(get_commit(commits, commit_hash)?),
        Query::ListCommits => QueryResponse::Commits(commits.list().map_err(ScavengeError::Store)?),
    };
    Ok(response)
}
