//! Protocol Events
//!
//! Notifications emitted on each successful operation, for indexers and UIs.
//! Not needed for correctness; nothing in the protocol reads them back.

use serde::{Serialize, Deserialize};

use crate::core::{Address, Coins};
use crate::scavenge::msg::{MsgCommitSolution, MsgCreateScavenge, MsgRevealSolution};
use crate::scavenge::MODULE_NAME;

/// Attribute key for the module name.
pub const ATTRIBUTE_MODULE: &str = "module";
/// Attribute key for the message type.
pub const ATTRIBUTE_ACTION: &str = "action";
/// Attribute key for the signer.
pub const ATTRIBUTE_SENDER: &str = "sender";
/// Attribute key for the question text.
pub const ATTRIBUTE_DESCRIPTION: &str = "description";
/// Attribute key for the puzzle hash.
pub const ATTRIBUTE_SOLUTION_HASH: &str = "solution_hash";
/// Attribute key for the commit binding hash.
pub const ATTRIBUTE_COMMIT_HASH: &str = "solution_scavenger_hash";
/// Attribute key for the revealed plaintext.
pub const ATTRIBUTE_SOLUTION: &str = "solution";
/// Attribute key for the winner.
pub const ATTRIBUTE_SCAVENGER: &str = "scavenger";
/// Attribute key for the reward.
pub const ATTRIBUTE_REWARD: &str = "reward";

/// A scavenge was posted and its reward escrowed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScavengeCreated {
    /// Poster of the puzzle.
    pub creator: Address,
    /// Question text.
    pub description: String,
    /// Puzzle hash.
    pub solution_hash: String,
    /// Amount moved into escrow.
    pub reward: Coins,
}

/// A commitment was recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionCommitted {
    /// Account that sent the commit.
    pub scavenger: Address,
    /// Puzzle the commit claims to answer.
    pub solution_hash: String,
    /// Binding hash, the commit's key.
    pub commit_hash: String,
}

/// A scavenge was solved and its reward paid out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScavengeSolved {
    /// Winner and payee.
    pub scavenger: Address,
    /// Puzzle hash, derived from the solution.
    pub solution_hash: String,
    /// Question text.
    pub description: String,
    /// Revealed plaintext.
    pub solution: String,
    /// Amount paid out of escrow.
    pub reward: Coins,
}

/// Any protocol event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScavengeEvent {
    /// See [`ScavengeCreated`].
    ScavengeCreated(ScavengeCreated),
    /// See [`SolutionCommitted`].
    SolutionCommitted(SolutionCommitted),
    /// See [`ScavengeSolved`].
    ScavengeSolved(ScavengeSolved),
}

impl ScavengeEvent {
    /// Message type that produced this event.
    pub fn action(&self) -> &'static str {
        match self {
            Self::ScavengeCreated(_) => MsgCreateScavenge::TYPE,
            Self::SolutionCommitted(_) => MsgCommitSolution::TYPE,
            Self::ScavengeSolved(_) => MsgRevealSolution::TYPE,
        }
    }

    /// Flat key/value rendering: module, action, sender, then payload.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![
            (ATTRIBUTE_MODULE, MODULE_NAME.to_string()),
            (ATTRIBUTE_ACTION, self.action().to_string()),
        ];

        match self {
            Self::ScavengeCreated(e) => {
                attrs.push((ATTRIBUTE_SENDER, e.creator.to_string()));
                attrs.push((ATTRIBUTE_DESCRIPTION, e.description.clone()));
                attrs.push((ATTRIBUTE_SOLUTION_HASH, e.solution_hash.clone()));
                attrs.push((ATTRIBUTE_REWARD, e.reward.to_string()));
            }
            Self::SolutionCommitted(e) => {
                attrs.push((ATTRIBUTE_SENDER, e.scavenger.to_string()));
                attrs.push((ATTRIBUTE_SOLUTION_HASH, e.solution_hash.clone()));
                attrs.push((ATTRIBUTE_COMMIT_HASH, e.commit_hash.clone()));
            }
            Self::ScavengeSolved(e) => {
                attrs.push((ATTRIBUTE_SENDER, e.scavenger.to_string()));
                attrs.push((ATTRIBUTE_SOLUTION_HASH, e.solution_hash.clone()));
                attrs.push((ATTRIBUTE_DESCRIPTION, e.description.clone()));
                attrs.push((ATTRIBUTE_SOLUTION, e.solution.clone()));
                attrs.push((ATTRIBUTE_SCAVENGER, e.scavenger.to_string()));
                attrs.push((ATTRIBUTE_REWARD, e.reward.to_string()));
            }
        }

        attrs
    }
}

impl From<ScavengeCreated> for ScavengeEvent {
    fn from(e: ScavengeCreated) -> Self {
        Self::ScavengeCreated(e)
    }
}

impl From<SolutionCommitted> for ScavengeEvent {
    fn from(e: SolutionCommitted) -> Self {
        Self::SolutionCommitted(e)
    }
}

impl From<ScavengeSolved> for ScavengeEvent {
    fn from(e: ScavengeSolved) -> Self {
        Self::ScavengeSolved(e)
    }
}

/// Collects events emitted during one or more operations.
#[derive(Clone, Debug, Default)]
pub struct EventManager {
    events: Vec<ScavengeEvent>,
}

impl EventManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event.
    pub fn emit(&mut self, event: impl Into<ScavengeEvent>) {
        self.events.push(event.into());
    }

    /// Events in emission order.
    pub fn events(&self) -> &[ScavengeEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the manager empty.
    pub fn drain(&mut self) -> Vec<ScavengeEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solved_attributes() {
        let event: ScavengeEvent = ScavengeSolved {
            scavenger: Address::new("bob"),
            solution_hash: "aa".into(),
            description: "what is 2+2".into(),
            solution: "4".into(),
            reward: Coins::single("token", 100).unwrap(),
        }
        .into();

        let attrs = event.attributes();
        assert_eq!(attrs[0], ("module", "scavenge".to_string()));
        assert_eq!(attrs[1], ("action", "RevealSolution".to_string()));
        assert_eq!(attrs[2], ("sender", "bob".to_string()));
        assert!(attrs.contains(&("reward", "100token".to_string())));
    }

    #[test]
    fn test_event_manager_drain() {
        let mut manager = EventManager::new();
        manager.emit(SolutionCommitted {
            scavenger: Address::new("bob"),
            solution_hash: "aa".into(),
            commit_hash: "bb".into(),
        });

        assert_eq!(manager.events().len(), 1);
        assert_eq!(manager.events()[0].action(), "CommitSolution");
        assert_eq!(manager.drain().len(), 1);
        assert!(manager.events().is_empty());
    }
}
