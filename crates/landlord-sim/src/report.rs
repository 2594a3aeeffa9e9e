//! Result aggregation: the data stream file and the end-of-batch summary.

use crate::config::SimConfig;
use landlord_core::{DataCategory, TrialOutcome};
use std::collections::BTreeMap;
use std::io::Write;

const OUT_WIDTH: usize = 80;

/// Writes the selected data category as plain text lines, one file per
/// batch, for external aggregation and plotting.
pub struct DataWriter {
    file: Option<std::fs::File>,
}

impl DataWriter {
    /// Open the data file, or a no-op writer when nothing is collected.
    pub fn create(path: &std::path::Path, category: DataCategory) -> std::io::Result<Self> {
        let file = if category == DataCategory::None {
            None
        } else {
            Some(std::fs::File::create(path)?)
        };
        Ok(Self { file })
    }

    /// Append one trial's lines. For the remaining-players category the
    /// line is derived here from the final balances.
    pub fn record(&mut self, outcome: &TrialOutcome, category: DataCategory) -> std::io::Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        for line in &outcome.data {
            writeln!(file, "{line}")?;
        }
        if category == DataCategory::RemainingPlayers {
            let solvent = outcome.final_cash.iter().filter(|&&c| c > 0).count();
            writeln!(file, "{solvent}")?;
        }
        Ok(())
    }
}

/// Print the end-of-batch summary: the remaining-player histogram and,
/// for name-keyed data categories, a frequency table with a 95% margin
/// and the experimental-vs-control differential.
pub fn summarize(sim: &SimConfig, outcomes: &[TrialOutcome]) {
    println!("{}", "=".repeat(OUT_WIDTH));

    let players = sim.game.players;
    let mut remaining = vec![0u32; players];
    for outcome in outcomes {
        let alive = outcome.final_cash.iter().filter(|&&c| c > 0).count();
        if alive > 0 {
            remaining[alive - 1] += 1;
        }
    }
    println!("Remaining: {remaining:?}");

    match sim.game.collect {
        DataCategory::LosersNames => {
            let counts = count_lines(outcomes);
            frequency_table(sim, &counts, true);
        }
        DataCategory::RemainingPlayers => {
            let mut counts: BTreeMap<String, u32> = BTreeMap::new();
            for outcome in outcomes {
                let alive = outcome.final_cash.iter().filter(|&&c| c > 0).count();
                *counts.entry(alive.to_string()).or_insert(0) += 1;
            }
            frequency_table(sim, &counts, false);
        }
        _ => {}
    }
}

fn count_lines(outcomes: &[TrialOutcome]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for outcome in outcomes {
        for line in &outcome.data {
            *counts.entry(line.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// One line per key: rate over all trials with a 95% normal-approximation
/// margin. For the losers category the rate reported is survival.
fn frequency_table(sim: &SimConfig, counts: &BTreeMap<String, u32>, invert: bool) {
    let trials = sim.trials as f64;
    if trials == 0.0 {
        return;
    }

    let mut experiment = 0.0;
    let mut control = 0.0;
    for (key, &n) in counts {
        let mut rate = f64::from(n) / trials;
        if invert {
            rate = 1.0 - rate;
        }
        if key == "exp" {
            experiment = rate;
        } else {
            control += rate;
        }
        let margin = 1.96 * (rate * (1.0 - rate) / trials).sqrt();
        println!("{key}: {:.1}% +- {:.1}%", rate * 100.0, margin * 100.0);
    }

    if experiment != 0.0 && sim.game.players > 1 {
        let diff = experiment - control / (sim.game.players as f64 - 1.0);
        println!("Exp result: {:.1}%", diff * 100.0);
    }
}
