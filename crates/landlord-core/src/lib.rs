//! Landlord - a property-trading board game simulation engine
//!
//! This crate provides the core game logic for Landlord, including:
//! - The fixed 40-cell board and property table
//! - Chance and community chest card decks
//! - Player state and the per-turn state machine
//! - The economic decision policies: building, mortgage management and
//!   two-way / three-way property trading
//! - Bankruptcy resolution and the bounded game loop
//!
//! # Architecture
//!
//! The engine is deterministic given its two RNG streams and runs one
//! trial start-to-finish with no I/O; the multi-trial driver, data
//! stream files and statistics live in the `landlord-sim` binary crate.
//!
//! # Modules
//!
//! - [`board`]: the cell layout, rent and monopoly computation
//! - [`cards`]: the two card decks and their effects tables
//! - [`config`]: the immutable rule and behaviour configuration
//! - [`player`]: per-player mutable state
//! - [`economy`]: the money-management decision policies
//! - [`game`]: the turn state machine and game loop

pub mod board;
pub mod cards;
pub mod config;
pub mod economy;
pub mod game;
pub mod player;

// Re-export commonly used types
pub use board::{Board, Cell, CellKind, PlayerId, Property, PropertyGroup, PropertyId};
pub use cards::{ChanceCard, CommunityCard, Deck};
pub use config::{BuildOrder, DataCategory, ExperimentConfig, GameConfig};
pub use economy::BuildCandidate;
pub use game::{Game, GameError, RngStreams, TrialOutcome};
pub use player::{Mortgage, Player, PlayerProfile};
