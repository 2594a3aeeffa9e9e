//! Landlord multi-trial simulation driver.
//!
//! Runs many independent games of the core engine, streams the selected
//! data category to a file and prints outcome statistics.

use clap::Parser;
use landlord_core::{Game, RngStreams, TrialOutcome};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod report;

use config::{Args, SimConfig};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let sim = SimConfig::load(&args)?;

    println!(
        "Players: {}  Turns: {}  Games: {}  Seed: {:?}",
        sim.game.players, sim.game.turns, sim.trials, sim.seed
    );

    let started = Instant::now();
    let mut writer = report::DataWriter::create(&args.data_file, sim.game.collect)?;
    let mut outcomes: Vec<TrialOutcome> = Vec::with_capacity(sim.trials as usize);

    for trial in 0..sim.trials {
        let rng = match sim.seed {
            Some(seed) => RngStreams::seeded(seed.wrapping_add(u64::from(trial))),
            None => RngStreams::from_entropy(),
        };
        let mut game = Game::new(&sim.game, rng)?;
        let outcome = game.run();
        info!(trial = trial + 1, final_cash = ?outcome.final_cash, "trial finished");
        writer.record(&outcome, sim.game.collect)?;
        outcomes.push(outcome);
    }

    report::summarize(&sim, &outcomes);
    println!("Done in {:.2}s", started.elapsed().as_secs_f64());
    Ok(())
}
