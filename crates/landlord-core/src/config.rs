//! Game rule and player behaviour configuration.
//!
//! All knobs live in a single immutable [`GameConfig`] value that is built
//! once at startup and passed by reference into [`crate::game::Game`]
//! construction. Every field has a documented default, so a partial
//! configuration file only overrides what it names.

use crate::board::PropertyGroup;
use serde::{Deserialize, Serialize};

/// Order in which build candidates are attempted when improving property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BuildOrder {
    /// Improve the most expensive affordable property first.
    #[default]
    ExpensiveFirst,
    /// Improve the cheapest affordable property first.
    CheapestFirst,
    /// Shuffle the candidate list on every refresh.
    Random,
}

/// Which auxiliary data stream a game records, if any.
///
/// Each category produces plain text lines meant for external aggregation
/// and plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    /// Record nothing.
    #[default]
    None,
    /// Cell index at the start of every move and at each bankruptcy.
    PopularCells,
    /// Name of each eliminated player, in order of elimination.
    LosersNames,
    /// Number of completed rounds when the game ended.
    LastTurn,
    /// Tab-separated per-player net worth, one line per round.
    NetWorth,
    /// Number of solvent players left at the end of each trial.
    RemainingPlayers,
}

/// Behaviour overrides for the experimental player.
///
/// When enabled, exactly one seat plays with these overrides instead of the
/// shared behaviour settings, so a rule or strategy variant can be measured
/// against an otherwise identical field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Give one seat the experimental profile.
    pub enabled: bool,
    /// Never participate in trades.
    pub refuse_trade: bool,
    /// Never buy property from this group.
    pub refuse_group: Option<PropertyGroup>,
    /// Stop improving a property once it holds this many houses.
    pub house_build_limit: u8,
    /// Cash floor for the experimental seat.
    pub cash_floor: i64,
    /// Build ordering override for the experimental seat.
    pub build_order: Option<BuildOrder>,
    /// Bring every candidate to three houses before building further.
    pub build_below_three_first: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            refuse_trade: false,
            refuse_group: None,
            // Higher than any reachable improvement level, so no cap.
            house_build_limit: 100,
            cash_floor: 0,
            build_order: None,
            build_below_three_first: false,
        }
    }
}

/// Complete rule set and behaviour settings for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of players (2-8).
    pub players: usize,
    /// Maximum number of rounds before a game is cut off.
    pub turns: u32,
    /// Shuffle seating order at the start of each game.
    pub shuffle_seating: bool,
    /// Cash each player starts with.
    pub starting_cash: i64,
    /// Per-seat starting cash, cycled over the seats. Empty means disabled.
    pub starting_cash_per_seat: Vec<i64>,
    /// Salary collected for passing Go.
    pub salary: i64,
    /// Fixed luxury tax.
    pub luxury_tax: i64,
    /// Cap on the income tax (the lesser of this and a tenth of net worth).
    pub income_tax_cap: i64,
    /// Fine paid to leave jail after three failed rolls.
    pub jail_fine: i64,
    /// Total houses in the bank.
    pub house_limit: u32,
    /// Total hotels in the bank.
    pub hotel_limit: u32,
    /// Allow improvement levels within a group to diverge.
    pub allow_unequal_development: bool,
    /// Cash a player refuses to spend below.
    pub cash_floor: i64,
    /// Redeem a mortgage once cash exceeds this multiple of the redemption price.
    pub unmortgage_multiplier: i64,
    /// Whether players trade property at all.
    pub trading_enabled: bool,
    /// Whether three-way trades are attempted when no two-way trade matched.
    pub three_way_trades: bool,
    /// Order in which build candidates are attempted.
    pub build_order: BuildOrder,
    /// Experimental player overrides.
    pub experiment: ExperimentConfig,
    /// Auxiliary data stream to record.
    pub collect: DataCategory,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: 4,
            turns: 1000,
            shuffle_seating: true,
            starting_cash: 1500,
            starting_cash_per_seat: Vec::new(),
            salary: 200,
            luxury_tax: 75,
            income_tax_cap: 200,
            jail_fine: 50,
            house_limit: 32,
            hotel_limit: 12,
            allow_unequal_development: false,
            cash_floor: 0,
            unmortgage_multiplier: 3,
            trading_enabled: true,
            three_way_trades: true,
            build_order: BuildOrder::default(),
            experiment: ExperimentConfig::default(),
            collect: DataCategory::default(),
        }
    }
}
