//! Scavenge Demo
//!
//! Runs a short create / commit / reveal session against an in-memory host
//! and logs every outcome.

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use scavenge::{
    core::hash::HASH_SCHEME,
    scavenge::{CommitmentPreimage, MsgCommitSolution, MsgCreateScavenge, MsgRevealSolution},
    Address, App, Bank, Coins, EngineConfig, Msg, MemoryBank, VERSION,
};

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = EngineConfig::from_env();
    info!("Scavenge v{}", VERSION);
    info!("Hash scheme: {}", HASH_SCHEME);
    info!("Hash policy: {:?}", config.hash_policy);

    demo_session(config)
}

/// Demo function to walk through the protocol.
fn demo_session(config: EngineConfig) -> Result<()> {
    let alice = Address::new("alice");
    let bob = Address::new("bob");
    let carol = Address::new("carol");

    let mut genesis = MemoryBank::new();
    genesis.mint(&alice, &Coins::parse("1000token")?)?;

    let mut app = App::with_bank(config, genesis);
    info!("Escrow account: {}", app.escrow_account());

    info!("=== Create ===");
    let create = MsgCreateScavenge::with_solution(alice.clone(), "what is 2+2", "4", Coins::parse("100token")?);
    submit(&mut app, create.into());

    info!("=== Commit ===");
    let bob_secret = CommitmentPreimage::new("4", bob.clone());
    submit(&mut app, MsgCommitSolution::from_preimage(&bob_secret).into());
    submit(&mut app, MsgCommitSolution::from_preimage(&bob_secret).into());

    info!("=== Reveal ===");
    submit(&mut app, MsgRevealSolution::from_preimage(bob_secret.clone()).into());
    submit(&mut app, MsgRevealSolution::from_preimage(bob_secret).into());
    submit(&mut app, MsgRevealSolution::from_preimage(CommitmentPreimage::new("4", carol)).into());

    info!("=== Balances ===");
    for (address, coins) in app.bank().balances() {
        info!("{}: {}", address, coins);
    }
    info!("Escrow: {}", app.bank().balance(app.escrow_account()));
    info!("Committed deliveries: {}", app.height());

    Ok(())
}

fn submit(app: &mut App, msg: Msg) {
    let msg_type = msg.msg_type();
    match app.deliver(msg) {
        Ok(event) => {
            let attrs: Vec<String> = event
                .attributes()
                .into_iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            info!("{} ok: {}", msg_type, attrs.join(" "));
        }
        Err(e) => warn!("{} failed ({}): {}", msg_type, e.kind(), e),
    }
}
