//! Board representation: the fixed 40-cell layout and the property table.
//!
//! This module contains:
//! - Cell kinds and the closed dispatch tag for every board position
//! - The dense property table (costs, rents, groups, ownership state)
//! - Rent and monopoly computation
//! - The global house/hotel supply counters
//! - Asset queries used by liquidation and net-worth valuation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Player identifier: the seat index into the game's player list.
pub type PlayerId = usize;

/// Property identifier: an index into the board's property table.
pub type PropertyId = usize;

/// Number of cells on the board.
pub const BOARD_SIZE: usize = 40;

/// Board position of the jail cell.
pub const JAIL_POSITION: usize = 10;

/// Rent per railroad owned by the landing cell's owner.
pub const RAILROAD_RENT_STEP: i64 = 25;

/// Property color group. Owning every member unlocks monopoly rent and,
/// for the color groups, improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyGroup {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    Indigo,
    Railroad,
    Utility,
}

impl PropertyGroup {
    /// Whether members of this group can carry houses and hotels.
    pub fn improvable(&self) -> bool {
        !matches!(self, PropertyGroup::Railroad | PropertyGroup::Utility)
    }
}

/// What a board cell is. Dispatch over this tag is exhaustive: there is no
/// cell the engine does not know how to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    /// The Go corner. Landing here has no effect beyond the salary already
    /// paid for reaching it.
    Go,
    /// A purchasable property; the id points into the board's property table.
    Property(PropertyId),
    /// Income tax: a tenth of net worth, capped.
    IncomeTax,
    /// Fixed luxury tax.
    LuxuryTax,
    /// Draw a chance card.
    Chance,
    /// Draw a community chest card.
    Community,
    /// Straight to jail.
    GoToJail,
    FreeParking,
    /// The jail corner as a landing spot ("just visiting").
    Jail,
}

/// A single board cell.
#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    /// Display label; not load-bearing for game logic.
    pub name: &'static str,
    pub kind: CellKind,
}

/// A purchasable property (streets, railroads and utilities alike).
#[derive(Debug, Clone, Serialize)]
pub struct Property {
    /// Board position of this property's cell.
    pub cell: usize,
    pub name: &'static str,
    /// Purchase price; also the base of mortgage and trade valuations.
    pub cost_base: i64,
    /// Unimproved rent (doubled under a monopoly).
    pub rent_base: i64,
    /// Price of one house; a hotel costs the same on top of four houses.
    pub cost_house: i64,
    /// Rent at improvement level 1-5 (level 5 is the hotel).
    pub rent_house: [i64; 5],
    pub group: PropertyGroup,
    /// Owning seat, if any. `None` means the property is on the open market.
    pub owner: Option<PlayerId>,
    /// A mortgaged property yields no rent and cannot be improved.
    pub is_mortgaged: bool,
    /// True iff one player owns the whole group. Recomputed after every
    /// ownership change.
    pub is_monopoly: bool,
    /// Improvement level 0-5 (1-4 houses, 5 a hotel).
    pub houses: u8,
}

/// The game board: the fixed cell layout, the property table and the
/// house/hotel bank.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub cells: Vec<Cell>,
    pub properties: Vec<Property>,
    /// Houses currently standing, bank-limited.
    pub houses_built: u32,
    /// Hotels currently standing, bank-limited.
    pub hotels_built: u32,
}

impl Board {
    /// The standard US-edition board layout. This table is part of the
    /// external contract: outcomes are only comparable across simulators
    /// that agree on it.
    pub fn standard() -> Self {
        use PropertyGroup::*;

        let mut board = Board {
            cells: Vec::with_capacity(BOARD_SIZE),
            properties: Vec::new(),
            houses_built: 0,
            hotels_built: 0,
        };

        // 0-4
        board.cell("Go", CellKind::Go);
        board.property("Mediterranean Avenue", 60, 2, 50, [10, 30, 90, 160, 250], Brown);
        board.cell("Community Chest", CellKind::Community);
        board.property("Baltic Avenue", 60, 4, 50, [20, 60, 180, 320, 450], Brown);
        board.cell("Income Tax", CellKind::IncomeTax);
        // 5-9
        board.property("Reading Railroad", 200, 0, 0, [0, 0, 0, 0, 0], Railroad);
        board.property("Oriental Avenue", 100, 6, 50, [30, 90, 270, 400, 550], LightBlue);
        board.cell("Chance", CellKind::Chance);
        board.property("Vermont Avenue", 100, 6, 50, [30, 90, 270, 400, 550], LightBlue);
        board.property("Connecticut Avenue", 120, 8, 50, [40, 100, 300, 450, 600], LightBlue);
        // 10-14
        board.cell("Jail", CellKind::Jail);
        board.property("St. Charles Place", 140, 10, 100, [50, 150, 450, 625, 750], Pink);
        board.property("Electric Company", 150, 0, 0, [0, 0, 0, 0, 0], Utility);
        board.property("States Avenue", 140, 10, 100, [50, 150, 450, 625, 750], Pink);
        board.property("Virginia Avenue", 160, 12, 100, [60, 180, 500, 700, 900], Pink);
        // 15-19
        board.property("Pennsylvania Railroad", 200, 0, 0, [0, 0, 0, 0, 0], Railroad);
        board.property("St. James Place", 180, 14, 100, [70, 200, 550, 700, 950], Orange);
        board.cell("Community Chest", CellKind::Community);
        board.property("Tennessee Avenue", 180, 14, 100, [70, 200, 550, 700, 950], Orange);
        board.property("New York Avenue", 200, 16, 100, [80, 220, 600, 800, 1000], Orange);
        // 20-24
        board.cell("Free Parking", CellKind::FreeParking);
        board.property("Kentucky Avenue", 220, 18, 150, [90, 250, 700, 875, 1050], Red);
        board.cell("Chance", CellKind::Chance);
        board.property("Indiana Avenue", 220, 18, 150, [90, 250, 700, 875, 1050], Red);
        board.property("Illinois Avenue", 240, 20, 150, [100, 300, 750, 925, 1100], Red);
        // 25-29
        board.property("B&O Railroad", 200, 0, 0, [0, 0, 0, 0, 0], Railroad);
        board.property("Atlantic Avenue", 260, 22, 150, [110, 330, 800, 975, 1150], Yellow);
        board.property("Ventnor Avenue", 260, 22, 150, [110, 330, 800, 975, 1150], Yellow);
        board.property("Water Works", 150, 0, 0, [0, 0, 0, 0, 0], Utility);
        board.property("Marvin Gardens", 280, 24, 150, [120, 360, 850, 1025, 1200], Yellow);
        // 30-34
        board.cell("Go To Jail", CellKind::GoToJail);
        board.property("Pacific Avenue", 300, 26, 200, [130, 390, 900, 1100, 1275], Green);
        board.property("North Carolina Avenue", 300, 26, 200, [130, 390, 900, 1100, 1275], Green);
        board.cell("Community Chest", CellKind::Community);
        board.property("Pennsylvania Avenue", 320, 28, 200, [150, 450, 1000, 1200, 1400], Green);
        // 35-39
        board.property("Short Line", 200, 0, 0, [0, 0, 0, 0, 0], Railroad);
        board.cell("Chance", CellKind::Chance);
        board.property("Park Place", 350, 35, 200, [175, 500, 1100, 1300, 1500], Indigo);
        board.cell("Luxury Tax", CellKind::LuxuryTax);
        board.property("Boardwalk", 400, 50, 200, [200, 600, 1400, 1700, 2000], Indigo);

        board
    }

    fn cell(&mut self, name: &'static str, kind: CellKind) {
        self.cells.push(Cell { name, kind });
    }

    fn property(
        &mut self,
        name: &'static str,
        cost_base: i64,
        rent_base: i64,
        cost_house: i64,
        rent_house: [i64; 5],
        group: PropertyGroup,
    ) {
        let id = self.properties.len();
        let cell = self.cells.len();
        self.properties.push(Property {
            cell,
            name,
            cost_base,
            rent_base,
            cost_house,
            rent_house,
            group,
            owner: None,
            is_mortgaged: false,
            is_monopoly: false,
            houses: 0,
        });
        self.cells.push(Cell {
            name,
            kind: CellKind::Property(id),
        });
    }

    /// The property at a board position, if that cell is one.
    pub fn property_at(&self, position: usize) -> Option<&Property> {
        match self.cells[position].kind {
            CellKind::Property(id) => Some(&self.properties[id]),
            _ => None,
        }
    }

    /// How many railroads a player owns.
    pub fn railroads_owned(&self, player: PlayerId) -> u32 {
        self.properties
            .iter()
            .filter(|p| p.group == PropertyGroup::Railroad && p.owner == Some(player))
            .count() as u32
    }

    /// Rent due for landing on `position` with the given dice total.
    ///
    /// `doubled_by_card` marks the card-triggered relocations that double
    /// railroad rent and force the 10x utility rate. No side effects; the
    /// caller decides whether the rent actually changes hands.
    pub fn rent(&self, position: usize, dice_total: u32, doubled_by_card: bool) -> i64 {
        let Some(prop) = self.property_at(position) else {
            return 0;
        };
        match prop.group {
            PropertyGroup::Utility => {
                if prop.is_monopoly || doubled_by_card {
                    i64::from(dice_total) * 10
                } else {
                    i64::from(dice_total) * 4
                }
            }
            PropertyGroup::Railroad => {
                let owned = prop.owner.map_or(0, |o| self.railroads_owned(o));
                let rent = RAILROAD_RENT_STEP * i64::from(owned);
                if doubled_by_card {
                    rent * 2
                } else {
                    rent
                }
            }
            _ => {
                if prop.houses > 0 {
                    prop.rent_house[prop.houses as usize - 1]
                } else if prop.is_monopoly {
                    2 * prop.rent_base
                } else {
                    prop.rent_base
                }
            }
        }
    }

    /// Refresh the monopoly flag on every property: a group is a monopoly
    /// iff a single owner holds every member. Idempotent; must run after
    /// every ownership-changing event before the next rent or build
    /// decision.
    pub fn recompute_monopolies(&mut self) {
        let mut holder: HashMap<PropertyGroup, Option<PlayerId>> = HashMap::new();
        for prop in &self.properties {
            let entry = holder.entry(prop.group).or_insert(prop.owner);
            if prop.owner.is_none() || *entry != prop.owner {
                *entry = None;
            }
        }
        for prop in &mut self.properties {
            prop.is_monopoly = holder[&prop.group].is_some();
        }
    }

    /// Fraction of a group's members the player owns.
    pub fn share_of_group(&self, group: PropertyGroup, player: PlayerId) -> f64 {
        let mut total = 0u32;
        let mut owned = 0u32;
        for prop in &self.properties {
            if prop.group == group {
                total += 1;
                if prop.owner == Some(player) {
                    owned += 1;
                }
            }
        }
        f64::from(owned) / f64::from(total)
    }

    /// The player's least valuable liquidatable asset: lowest group
    /// ownership share first, ties broken by the most improved property.
    /// `None` once everything left is mortgaged (or nothing is owned),
    /// which is the bankruptcy condition.
    pub fn liquidation_target(&self, player: PlayerId) -> Option<PropertyId> {
        let mut owned: Vec<(PropertyId, f64, u8)> = self
            .properties
            .iter()
            .enumerate()
            .filter(|(_, p)| p.owner == Some(player) && !p.is_mortgaged)
            .map(|(id, p)| (id, self.share_of_group(p.group, player), p.houses))
            .collect();
        owned.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.2.cmp(&a.2))
        });
        owned.first().map(|&(id, _, _)| id)
    }

    /// Liquidation-equivalent value of everything the player owns:
    /// half price for mortgaged deeds, full price plus improvements
    /// otherwise.
    pub fn holdings_value(&self, player: PlayerId) -> i64 {
        self.properties
            .iter()
            .filter(|p| p.owner == Some(player))
            .map(|p| {
                if p.is_mortgaged {
                    p.cost_base / 2
                } else {
                    p.cost_base + p.cost_house * i64::from(p.houses)
                }
            })
            .sum()
    }

    /// Return every property the player owns to the open market. Called on
    /// bankruptcy; by then each of them is mortgaged and unimproved.
    pub fn release_holdings(&mut self, player: PlayerId) {
        for prop in &mut self.properties {
            if prop.owner == Some(player) {
                prop.owner = None;
                prop.is_mortgaged = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_layout_shape() {
        let board = Board::standard();
        assert_eq!(board.cells.len(), BOARD_SIZE);
        assert_eq!(board.properties.len(), 28);
        assert_eq!(board.cells[JAIL_POSITION].kind, CellKind::Jail);
        assert_eq!(board.cells[30].kind, CellKind::GoToJail);

        let count = |g| board.properties.iter().filter(|p| p.group == g).count();
        assert_eq!(count(PropertyGroup::Brown), 2);
        assert_eq!(count(PropertyGroup::Railroad), 4);
        assert_eq!(count(PropertyGroup::Utility), 2);
        assert_eq!(count(PropertyGroup::Green), 3);
        assert_eq!(count(PropertyGroup::Indigo), 2);
    }

    #[test]
    fn test_property_cells_point_back_at_their_table_entry() {
        let board = Board::standard();
        for (id, prop) in board.properties.iter().enumerate() {
            assert_eq!(board.cells[prop.cell].kind, CellKind::Property(id));
            assert_eq!(board.cells[prop.cell].name, prop.name);
        }
    }

    #[test]
    fn test_base_rent_without_monopoly() {
        let mut board = Board::standard();
        board.properties[1].owner = Some(0); // Baltic Avenue, position 3
        board.recompute_monopolies();
        assert_eq!(board.rent(3, 7, false), 4);
    }

    #[test]
    fn test_monopoly_doubles_base_rent() {
        let mut board = Board::standard();
        board.properties[0].owner = Some(0);
        board.properties[1].owner = Some(0);
        board.recompute_monopolies();
        assert_eq!(board.rent(1, 7, false), 4);
        assert_eq!(board.rent(3, 7, false), 8);
    }

    #[test]
    fn test_improved_rent_ignores_monopoly_flag() {
        let mut board = Board::standard();
        board.properties[0].owner = Some(0);
        board.properties[1].owner = Some(0);
        board.recompute_monopolies();
        board.properties[1].houses = 3;
        assert_eq!(board.rent(3, 7, false), 180);
        board.properties[1].houses = 5;
        assert_eq!(board.rent(3, 7, false), 450);
    }

    #[test]
    fn test_railroad_rent_scales_with_count() {
        let mut board = Board::standard();
        board.properties[2].owner = Some(1); // Reading Railroad, position 5
        assert_eq!(board.rent(5, 7, false), 25);
        board.properties[10].owner = Some(1); // Pennsylvania Railroad
        board.properties[17].owner = Some(1); // B&O Railroad
        assert_eq!(board.rent(5, 7, false), 75);
        assert_eq!(board.rent(5, 7, true), 150);
    }

    #[test]
    fn test_utility_rent_rates() {
        let mut board = Board::standard();
        board.properties[7].owner = Some(0); // Electric Company, position 12
        board.recompute_monopolies();
        assert_eq!(board.rent(12, 7, false), 28);
        // Card-triggered landings always pay the 10x rate.
        assert_eq!(board.rent(12, 7, true), 70);
        board.properties[20].owner = Some(0); // Water Works
        board.recompute_monopolies();
        assert_eq!(board.rent(12, 7, false), 70);
    }

    #[test]
    fn test_recompute_monopolies_is_idempotent() {
        let mut board = Board::standard();
        board.properties[0].owner = Some(0);
        board.properties[1].owner = Some(0);
        board.properties[3].owner = Some(1);
        board.recompute_monopolies();
        let first: Vec<bool> = board.properties.iter().map(|p| p.is_monopoly).collect();
        board.recompute_monopolies();
        let second: Vec<bool> = board.properties.iter().map(|p| p.is_monopoly).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mixed_or_partial_ownership_is_not_a_monopoly() {
        let mut board = Board::standard();
        board.properties[0].owner = Some(0);
        board.recompute_monopolies();
        assert!(!board.properties[0].is_monopoly);
        board.properties[1].owner = Some(1);
        board.recompute_monopolies();
        assert!(!board.properties[0].is_monopoly);
        assert!(!board.properties[1].is_monopoly);
    }

    #[test]
    fn test_liquidation_prefers_smallest_group_share_then_most_houses() {
        let mut board = Board::standard();
        // Full brown monopoly with houses, plus a lone orange deed.
        board.properties[0].owner = Some(0);
        board.properties[1].owner = Some(0);
        board.properties[11].owner = Some(0); // St. James Place
        board.recompute_monopolies();
        board.properties[0].houses = 2;
        board.properties[1].houses = 3;

        // The lone deed has the smallest group share.
        assert_eq!(board.liquidation_target(0), Some(11));
        board.properties[11].is_mortgaged = true;
        // Within the brown group, the more improved member goes first.
        assert_eq!(board.liquidation_target(0), Some(1));
    }

    #[test]
    fn test_liquidation_target_none_when_everything_is_mortgaged() {
        let mut board = Board::standard();
        board.properties[0].owner = Some(0);
        board.properties[0].is_mortgaged = true;
        assert_eq!(board.liquidation_target(0), None);
        assert_eq!(board.liquidation_target(3), None);
    }

    #[test]
    fn test_holdings_value() {
        let mut board = Board::standard();
        board.properties[0].owner = Some(0); // Mediterranean, $60
        board.properties[1].owner = Some(0); // Baltic, $60
        board.properties[1].houses = 2; // + 2 x $50
        board.properties[11].owner = Some(0); // St. James, $180, mortgaged
        board.properties[11].is_mortgaged = true;
        assert_eq!(board.holdings_value(0), 60 + 60 + 100 + 90);
        assert_eq!(board.holdings_value(5), 0);
    }

    #[test]
    fn test_release_holdings_clears_owner_and_mortgage() {
        let mut board = Board::standard();
        board.properties[0].owner = Some(0);
        board.properties[0].is_mortgaged = true;
        board.properties[1].owner = Some(1);
        board.release_holdings(0);
        assert_eq!(board.properties[0].owner, None);
        assert!(!board.properties[0].is_mortgaged);
        assert_eq!(board.properties[1].owner, Some(1));
    }
}
