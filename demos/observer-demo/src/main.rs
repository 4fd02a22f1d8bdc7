//! Cadence Observer Demo
//!
//! Runs two protocols against a scripted controller over a noisy transport:
//! - Connect to a peer, discover its primary services, disconnect
//! - Three observation rounds collecting advertising reports
//!
//! Usage: `observer-demo [config.json] [seed]`

use std::error::Error;
use std::fs;

use cadence_core::Tier;
use cadence_runtime::{logging, ProtocolStatus, RuntimeConfig};
use cadence_test::integration::{
    connection_established, disconnected, observation_round, services_discovered,
};
use cadence_test::{ConnectAndDiscover, Harness, NoiseConfig, Observe};
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => serde_json::from_str::<RuntimeConfig>(&fs::read_to_string(path)?)?,
        None => RuntimeConfig::default(),
    };
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 7,
    };

    logging::init(&config.log);
    info!(seed, capacity = config.production.tier_capacity, "observer demo starting");

    let mut harness =
        Harness::with_noise(config.clone(), NoiseConfig::noisy(), seed)?.with_diagnostics()?;

    println!("== connect and discover ==");
    harness.recorder.respond("create_connection", connection_established());
    harness.recorder.respond("discover_services", services_discovered(4));
    harness.recorder.respond("terminate", disconnected());

    let status = harness.start(ConnectAndDiscover)?;
    if status != ProtocolStatus::Advanced {
        println!("protocol ended early: {:?}", status);
    }
    harness.run_until_idle();

    println!(
        "connection handle: {}",
        harness
            .recorder
            .connection_handle
            .map(|h| format!("0x{:04x}", h))
            .unwrap_or_else(|| "none".into())
    );
    for (i, report) in harness.recorder.reports.iter().enumerate() {
        println!("  service {}: {:02x?}", i, report);
    }

    println!("== observe ==");
    harness.script(
        observation_round(3)
            .then(observation_round(1))
            .then(observation_round(2)),
    );
    harness.start(Observe::new(3))?;
    harness.run_until_idle();
    println!(
        "advertising reports: {}",
        harness.recorder.fired.iter().filter(|tag| **tag == "report").count()
    );

    let runtime = harness.registry.stats();
    let production = harness.registry.production().stats();
    let transport = harness.transport.stats();
    println!("== stats ==");
    println!(
        "protocols: {} started, {} completed, {} aborted",
        runtime.protocols_started, runtime.protocols_completed, runtime.protocols_aborted
    );
    println!(
        "frames: {} dispatched, {} ignored, {} rejected by the decoder",
        production.frames, production.ignored_frames, runtime.malformed_frames
    );
    println!(
        "matches: {} exclusive, {} normal, {} global",
        production.exclusive_matches, production.normal_matches, production.global_matches
    );
    println!(
        "transport: {} scripted, {} injected",
        transport.scripted, transport.injected
    );
    println!(
        "global rules still installed: {}",
        harness.registry.production().tier(Tier::Global).len()
    );

    Ok(())
}
