//! Per-player state.
//!
//! A [`Player`] is mutable for the lifetime of one game: position, cash,
//! jail status, held jail-free cards, the mortgage ledger, and the cached
//! decision lists the economic policies work from. The cached lists are
//! derived state, recomputed after every ownership change; they are never
//! authoritative.

use crate::board::{PlayerId, PropertyId};
use crate::economy::BuildCandidate;
use serde::{Deserialize, Serialize};

/// Which behaviour settings a seat plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerProfile {
    /// The shared behaviour settings.
    Standard,
    /// The experimental overrides from the configuration.
    Experimental,
}

/// One entry in a player's mortgage ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mortgage {
    pub property: PropertyId,
    /// What it costs to redeem: half the base cost plus a 10% premium,
    /// both rounded down.
    pub redemption_price: i64,
}

/// A single player's state.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    /// Seat index into the game's player list.
    pub id: PlayerId,
    /// Display name, also the key for the eliminated-player data stream.
    pub name: String,
    pub profile: PlayerProfile,
    /// May go transiently negative; bankruptcy resolution brings it back
    /// above zero or eliminates the player.
    pub cash: i64,
    /// Board position 0-39.
    pub position: usize,
    pub in_jail: bool,
    /// Consecutive failed jail rolls (0-2); the third pays the fine.
    pub days_in_jail: u8,
    /// Consecutive doubles this turn sequence (0-2); the third jails.
    pub consecutive_doubles: u8,
    pub has_chance_jail_card: bool,
    pub has_community_jail_card: bool,
    /// Terminal: once set the player never takes another turn.
    pub is_bankrupt: bool,
    /// Outstanding mortgages with their redemption prices.
    pub mortgages: Vec<Mortgage>,
    /// Properties that would complete one of this player's groups.
    pub wanted: Vec<PropertyId>,
    /// Lone-in-group properties this player would give up in a trade.
    pub offered: Vec<PropertyId>,
    /// Improvable properties in priority order.
    pub build_candidates: Vec<BuildCandidate>,
    /// Cash this player's policy refuses to spend below.
    pub cash_floor: i64,
    /// Last dice roll; card-triggered utility rent reads it.
    pub dice: (u8, u8),
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: String,
        profile: PlayerProfile,
        cash: i64,
        cash_floor: i64,
    ) -> Self {
        Self {
            id,
            name,
            profile,
            cash,
            position: 0,
            in_jail: false,
            days_in_jail: 0,
            consecutive_doubles: 0,
            has_chance_jail_card: false,
            has_community_jail_card: false,
            is_bankrupt: false,
            mortgages: Vec::new(),
            wanted: Vec::new(),
            offered: Vec::new(),
            build_candidates: Vec::new(),
            cash_floor,
            dice: (0, 0),
        }
    }

    /// The outstanding mortgage with the lowest redemption price.
    pub fn cheapest_mortgage(&self) -> Option<&Mortgage> {
        self.mortgages.iter().reduce(|best, m| {
            if m.redemption_price < best.redemption_price {
                m
            } else {
                best
            }
        })
    }

    /// Whether the player still takes turns and owes rent.
    pub fn is_active(&self) -> bool {
        !self.is_bankrupt
    }
}

/// Redemption price for mortgaging a deed of the given base cost: the
/// half-cost loan plus a 10% premium, rounded down at each step.
pub fn redemption_price(cost_base: i64) -> i64 {
    let half = cost_base / 2;
    half + half / 10
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_redemption_price_rounds_down() {
        assert_eq!(redemption_price(60), 33);
        assert_eq!(redemption_price(150), 82);
        assert_eq!(redemption_price(200), 110);
        assert_eq!(redemption_price(350), 192);
        assert_eq!(redemption_price(400), 220);
    }

    #[test]
    fn test_cheapest_mortgage_keeps_first_on_ties() {
        let mut player = Player::new(0, "Player 1".into(), PlayerProfile::Standard, 1500, 0);
        assert!(player.cheapest_mortgage().is_none());

        player.mortgages.push(Mortgage {
            property: 3,
            redemption_price: 110,
        });
        player.mortgages.push(Mortgage {
            property: 5,
            redemption_price: 33,
        });
        player.mortgages.push(Mortgage {
            property: 8,
            redemption_price: 33,
        });
        let cheapest = player.cheapest_mortgage().unwrap();
        assert_eq!(cheapest.property, 5);
        assert_eq!(cheapest.redemption_price, 33);
    }

    #[test]
    fn test_new_player_starts_clean() {
        let player = Player::new(2, "Player 3".into(), PlayerProfile::Standard, 1500, 0);
        assert_eq!(player.position, 0);
        assert_eq!(player.cash, 1500);
        assert!(player.is_active());
        assert!(!player.in_jail);
        assert!(player.wanted.is_empty());
        assert!(player.build_candidates.is_empty());
    }
}
