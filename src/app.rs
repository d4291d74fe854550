//! Host Application
//!
//! Owns the stores, the ledger and the event log, and delivers messages to
//! the protocol engine one at a time. Each delivery runs against write
//! buffers over the state, which are applied only if the whole operation
//! succeeds, so an escrow transfer is never kept without the record write
//! that follows it.

use tracing::{debug, warn};

use crate::bank::{BankCache, MemoryBank};
use crate::config::EngineConfig;
use crate::core::Address;
use crate::scavenge::{
    query, Commit, CommitStore, Context, EventManager, MemoryCommitStore, MemoryScavengeStore, Msg,
    ProtocolEngine, Query, QueryResponse, Result, Scavenge, ScavengeError, ScavengeEvent,
    ScavengeStore, StoreCache,
};

/// Single-threaded host for the scavenge protocol.
#[derive(Debug)]
pub struct App<S = MemoryScavengeStore, C = MemoryCommitStore> {
    engine: ProtocolEngine,
    scavenges: S,
    commits: C,
    bank: MemoryBank,
    events: Vec<ScavengeEvent>,
    height: u64,
}

impl App {
    /// Create an app with an empty ledger.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_bank(config, MemoryBank::new())
    }

    /// Create an app over an existing ledger (e.g. genesis balances).
    pub fn with_bank(config: EngineConfig, bank: MemoryBank) -> Self {
        Self::with_stores(config, MemoryScavengeStore::new(), MemoryCommitStore::new(), bank)
    }
}

impl<S: ScavengeStore, C: CommitStore> App<S, C> {
    /// Create an app over caller-provided stores.
    pub fn with_stores(config: EngineConfig, scavenges: S, commits: C, bank: MemoryBank) -> Self {
        Self {
            engine: ProtocolEngine::new(config),
            scavenges,
            commits,
            bank,
            events: Vec::new(),
            height: 0,
        }
    }

    /// Validate and apply one message atomically.
    pub fn deliver(&mut self, msg: Msg) -> Result<ScavengeEvent> {
        let msg_type = msg.msg_type();
        if let Err(e) = msg.validate_basic() {
            warn!(msg_type, kind = e.kind(), error = %e, "message rejected");
            return Err(e);
        }

        match self.apply(msg) {
            Ok(event) => {
                self.height += 1;
                debug!(msg_type, height = self.height, "delivery committed");
                Ok(event)
            }
            Err(e) => {
                warn!(msg_type, kind = e.kind(), error = %e, "delivery rejected");
                Err(e)
            }
        }
    }

    /// Run the engine against write buffers, then flush them on success.
    fn apply(&mut self, msg: Msg) -> Result<ScavengeEvent> {
        let mut scavenges: StoreCache<'_, S, Scavenge> = StoreCache::new(&self.scavenges);
        let mut commits: StoreCache<'_, C, Commit> = StoreCache::new(&self.commits);
        let mut bank = BankCache::new(&self.bank);
        let mut events = EventManager::new();

        let event = {
            let mut ctx = Context::new(&mut scavenges, &mut commits, &mut bank, &mut events);
            self.engine.handle(&mut ctx, msg)?
        };

        let scavenge_writes = scavenges.into_writes();
        let commit_writes = commits.into_writes();
        let balances = bank.into_balances();

        // Each operation writes at most one record, so a failed flush here
        // leaves the stores as they were and the bank is not yet touched.
        for scavenge in scavenge_writes {
            self.scavenges.set(scavenge).map_err(ScavengeError::Store)?;
        }
        for commit in commit_writes {
            self.commits.set(commit).map_err(ScavengeError::Store)?;
        }
        self.bank.apply(balances);
        self.events.extend(events.drain());

        Ok(event)
    }

    /// Decode a JSON wire message and deliver it.
    pub fn deliver_json(&mut self, json: &str) -> Result<ScavengeEvent> {
        let msg = Msg::from_json(json)?;
        self.deliver(msg)
    }

    /// Answer a read-only query.
    pub fn query(&self, request: &Query) -> Result<QueryResponse> {
        query::query(&self.scavenges, &self.commits, request)
    }

    /// Answer a JSON query with a JSON response.
    pub fn query_json(&self, json: &str) -> Result<String> {
        let request: Query = serde_json::from_str(json)?;
        let response = self.query(&request)?;
        Ok(serde_json::to_string(&response)?)
    }

    /// Ledger state.
    pub fn bank(&self) -> &MemoryBank {
        &self.bank
    }

    /// Mutable ledger access for genesis funding.
    pub fn bank_mut(&mut self) -> &mut MemoryBank {
        &mut self.bank
    }

    /// Escrow account used by the engine.
    pub fn escrow_account(&self) -> &Address {
        self.engine.escrow_account()
    }

    /// Every event from committed deliveries, oldest first.
    pub fn events(&self) -> &[ScavengeEvent] {
        &self.events
    }

    /// Number of committed deliveries.
    pub fn height(&self) -> u64 {
        self.height
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
