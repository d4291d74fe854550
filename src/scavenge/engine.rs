//! Protocol Engine
//!
//! Applies Create, Commit and Reveal against the stores and the bank.
//!
//! Every operation checks all of its preconditions and lookups before the
//! first mutating call, and calls the bank before writing any record. The
//! host is responsible for discarding the bank transfer if the record write
//! that follows it fails.

use tracing::{debug, info, instrument, warn};

use crate::bank::Bank;
use crate::config::{EngineConfig, HashMismatchPolicy};
use crate::core::Address;
use crate::scavenge::commitment::CommitmentPreimage;
use crate::scavenge::error::{Result, ScavengeError};
use crate::scavenge::events::{
    EventManager, ScavengeCreated, ScavengeEvent, ScavengeSolved, SolutionCommitted,
};
use crate::scavenge::msg::{Msg, MsgCommitSolution, MsgCreateScavenge, MsgRevealSolution};
use crate::scavenge::store::{CommitStore, ScavengeStore, StoreError};
use crate::scavenge::types::{Commit, Scavenge};

/// Handles to everything one operation may read or write.
pub struct Context<'a> {
    /// Scavenge registry.
    pub scavenges: &'a mut dyn ScavengeStore,
    /// Commit registry.
    pub commits: &'a mut dyn CommitStore,
    /// Ledger used for escrow deposits and payouts.
    pub bank: &'a mut dyn Bank,
    /// Sink for emitted events.
    pub events: &'a mut EventManager,
}

impl<'a> Context<'a> {
    /// Bundle the handles for one operation.
    pub fn new(
        scavenges: &'a mut dyn ScavengeStore,
        commits: &'a mut dyn CommitStore,
        bank: &'a mut dyn Bank,
        events: &'a mut EventManager,
    ) -> Self {
        Self {
            scavenges,
            commits,
            bank,
            events,
        }
    }
}

/// The create / commit / reveal state machine.
#[derive(Clone, Debug)]
pub struct ProtocolEngine {
    config: EngineConfig,
    escrow: Address,
}

impl ProtocolEngine {
    /// Create an engine. The escrow account is derived once from the config.
    pub fn new(config: EngineConfig) -> Self {
        let escrow = config.escrow_account();
        Self { config, escrow }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Account holding rewards of unsolved scavenges.
    pub fn escrow_account(&self) -> &Address {
        &self.escrow
    }

    /// Dispatch any message to its operation.
    pub fn handle(&self, ctx: &mut Context<'_>, msg: Msg) -> Result<ScavengeEvent> {
        match msg {
            Msg::CreateScavenge(m) => self.create_scavenge(ctx, m).map(Into::into),
            Msg::CommitSolution(m) => self.commit_solution(ctx, m).map(Into::into),
            Msg::RevealSolution(m) => self.reveal_solution(ctx, m).map(Into::into),
        }
    }

    /// Post a puzzle and move its reward into escrow.
    #[instrument(skip_all, fields(creator = %msg.creator, solution_hash = %msg.solution_hash))]
    pub fn create_scavenge(&self, ctx: &mut Context<'_>, msg: MsgCreateScavenge) -> Result<ScavengeCreated> {
        msg.validate_basic()?;
        if msg.reward.is_zero() && !self.config.allow_zero_reward {
            return Err(ScavengeError::InvalidInput("reward cannot be zero".into()));
        }

        if ctx.scavenges.has(&msg.solution_hash) {
            warn!("duplicate scavenge rejected");
            return Err(ScavengeError::DuplicateScavenge(msg.solution_hash));
        }

        ctx.bank.transfer(&msg.creator, &self.escrow, &msg.reward)?;

        let scavenge = Scavenge::new(
            msg.creator.clone(),
            msg.description.clone(),
            msg.solution_hash.clone(),
            msg.reward.clone(),
        );
        ctx.scavenges.set(scavenge).map_err(ScavengeError::Store)?;

        let event = ScavengeCreated {
            creator: msg.creator,
            description: msg.description,
            solution_hash: msg.solution_hash,
            reward: msg.reward,
        };
        ctx.events.emit(event.clone());

        info!(reward = %event.reward, "scavenge created");
        Ok(event)
    }

    /// Record a sealed commitment. The target scavenge need not exist yet.
    #[instrument(skip_all, fields(scavenger = %msg.scavenger, commit_hash = %msg.commit_hash))]
    pub fn commit_solution(&self, ctx: &mut Context<'_>, msg: MsgCommitSolution) -> Result<SolutionCommitted> {
        msg.validate_basic()?;

        if ctx.commits.has(&msg.commit_hash) {
            warn!("duplicate commit rejected");
            return Err(ScavengeError::DuplicateCommit(msg.commit_hash));
        }

        let commit = Commit::new(
            msg.scavenger.clone(),
            msg.solution_hash.clone(),
            msg.commit_hash.clone(),
        );
        ctx.commits.set(commit).map_err(ScavengeError::Store)?;

        let event = SolutionCommitted {
            scavenger: msg.scavenger,
            solution_hash: msg.solution_hash,
            commit_hash: msg.commit_hash,
        };
        ctx.events.emit(event.clone());

        info!("solution committed");
        Ok(event)
    }

    /// Verify a reveal against its commitment and the puzzle, then pay out.
    #[instrument(skip_all, fields(scavenger = %msg.scavenger, solution_hash = %msg.solution_hash))]
    pub fn reveal_solution(&self, ctx: &mut Context<'_>, msg: MsgRevealSolution) -> Result<ScavengeSolved> {
        msg.validate_basic()?;

        let preimage = CommitmentPreimage::new(msg.solution, msg.scavenger);

        // 1. The scavenger must have committed to exactly this plaintext.
        let commit_hash = preimage.commit_hash();
        let commit = match ctx.commits.get(&commit_hash) {
            Ok(commit) => commit,
            Err(StoreError::NotFound(_)) => return Err(ScavengeError::CommitNotFound(commit_hash)),
            Err(e) => return Err(ScavengeError::Store(e)),
        };
        // `committer` is audit data only.
        debug!(committer = %commit.committer, "commit found");

        // 2. The hash of the plaintext is authoritative; the supplied one is a hint.
        let solution_hash = preimage.solution_hash();
        if solution_hash != msg.solution_hash {
            match self.config.hash_policy {
                HashMismatchPolicy::Strict => {
                    return Err(ScavengeError::HashMismatch {
                        supplied: msg.solution_hash,
                        derived: solution_hash,
                    });
                }
                HashMismatchPolicy::Lenient => {
                    warn!(derived = %solution_hash, "supplied solution hash ignored");
                }
            }
        }

        let mut scavenge = match ctx.scavenges.get(&solution_hash) {
            Ok(scavenge) => scavenge,
            Err(StoreError::NotFound(_)) => return Err(ScavengeError::ScavengeNotFound(solution_hash)),
            Err(e) => return Err(ScavengeError::Store(e)),
        };

        // 3. First valid reveal wins.
        if scavenge.is_solved() {
            warn!("reveal on solved scavenge rejected");
            return Err(ScavengeError::AlreadySolved(solution_hash));
        }

        // 4. Pay out before touching the record.
        ctx.bank.transfer(&self.escrow, &preimage.scavenger, &scavenge.reward)?;

        // 5. Record the winner.
        scavenge.mark_solved(preimage.scavenger.clone(), preimage.solution.clone())?;
        let event = ScavengeSolved {
            scavenger: preimage.scavenger,
            solution_hash,
            description: scavenge.description.clone(),
            solution: preimage.solution,
            reward: scavenge.reward.clone(),
        };
        ctx.scavenges.set(scavenge).map_err(ScavengeError::Store)?;
        ctx.events.emit(event.clone());

        info!(reward = %event.reward, "scavenge solved");
        Ok(event)
    }
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
