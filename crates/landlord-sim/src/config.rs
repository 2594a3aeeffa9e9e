//! Driver configuration: the flat options file and the CLI flags that
//! override it.

use anyhow::{bail, Context, Result};
use clap::Parser;
use landlord_core::{DataCategory, GameConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Simulate property-trading games and report outcome statistics.
#[derive(Debug, Parser)]
#[command(name = "landlord-sim", version, about)]
pub struct Args {
    /// Path to a JSON configuration file; omitted options keep defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Number of games to simulate
    #[arg(short, long)]
    pub trials: Option<u32>,
    /// Number of players (2-8)
    #[arg(short, long)]
    pub players: Option<usize>,
    /// Maximum rounds per game
    #[arg(long)]
    pub turns: Option<u32>,
    /// Base seed for reproducible batches (trial i runs on seed + i)
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Data stream to record: popular_cells, losers_names, last_turn,
    /// net_worth or remaining_players
    #[arg(short, long)]
    pub data: Option<String>,
    /// File the data stream is written to
    #[arg(long, default_value = "data.txt")]
    pub data_file: PathBuf,
}

/// The full simulation configuration: the game rules plus the driver's
/// trial count and seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of games to simulate.
    pub trials: u32,
    /// Base seed; `None` draws fresh entropy per trial.
    pub seed: Option<u64>,
    /// Everything the engine needs, flattened into the same file.
    #[serde(flatten)]
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            seed: None,
            game: GameConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load the configuration file (if any) and fold the CLI overrides in.
    pub fn load(args: &Args) -> Result<Self> {
        let mut sim = match &args.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => SimConfig::default(),
        };

        if let Some(trials) = args.trials {
            sim.trials = trials;
        }
        if let Some(players) = args.players {
            sim.game.players = players;
        }
        if let Some(turns) = args.turns {
            sim.game.turns = turns;
        }
        if args.seed.is_some() {
            sim.seed = args.seed;
        }
        if let Some(data) = &args.data {
            sim.game.collect = parse_data_category(data)?;
        }
        Ok(sim)
    }
}

fn parse_data_category(name: &str) -> Result<DataCategory> {
    Ok(match name {
        "none" => DataCategory::None,
        "popular_cells" => DataCategory::PopularCells,
        "losers_names" => DataCategory::LosersNames,
        "last_turn" => DataCategory::LastTurn,
        "net_worth" => DataCategory::NetWorth,
        "remaining_players" => DataCategory::RemainingPlayers,
        other => bail!("unknown data category {other:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_from(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("landlord-sim").chain(argv.iter().copied()))
    }

    #[test]
    fn test_defaults_without_file_or_flags() {
        let sim = SimConfig::load(&args_from(&[])).unwrap();
        assert_eq!(sim.trials, 1000);
        assert_eq!(sim.seed, None);
        assert_eq!(sim.game.players, 4);
    }

    #[test]
    fn test_cli_flags_override_defaults() {
        let sim =
            SimConfig::load(&args_from(&["-t", "50", "-p", "6", "-s", "7", "-d", "losers_names"]))
                .unwrap();
        assert_eq!(sim.trials, 50);
        assert_eq!(sim.game.players, 6);
        assert_eq!(sim.seed, Some(7));
        assert_eq!(sim.game.collect, DataCategory::LosersNames);
    }

    #[test]
    fn test_unknown_data_category_is_rejected() {
        assert!(SimConfig::load(&args_from(&["-d", "everything"])).is_err());
    }

    #[test]
    fn test_flattened_file_options() {
        let sim: SimConfig = serde_json::from_str(
            r#"{ "trials": 3, "players": 5, "jail_fine": 75 }"#,
        )
        .unwrap();
        assert_eq!(sim.trials, 3);
        assert_eq!(sim.game.players, 5);
        assert_eq!(sim.game.jail_fine, 75);
    }
}
