//! The per-trial game: turn state machine, cell actions, card effects,
//! bankruptcy resolution and the bounded game loop.
//!
//! One [`Game`] owns the board, the players, both card decks and the two
//! RNG streams for exactly one trial. Turns run strictly sequentially in
//! the once-shuffled seating order until at most one player is solvent or
//! the turn budget runs out.

use crate::board::{Board, CellKind, PropertyId, BOARD_SIZE, JAIL_POSITION};
use crate::cards::{ChanceCard, CommunityCard, Deck};
use crate::config::{DataCategory, GameConfig};
use crate::economy;
use crate::player::{Player, PlayerProfile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur when setting up a game.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("unsupported player count {count}: must be 2-8")]
    InvalidPlayerCount { count: usize },
}

/// The two random streams a trial runs on: `dice` drives everything that
/// affects in-game outcomes (dice rolls, deck shuffles, randomized build
/// ordering), `seating` only the player-order shuffle. Keeping them apart
/// makes seating-independent comparisons reproducible.
#[derive(Debug, Clone)]
pub struct RngStreams {
    pub dice: StdRng,
    pub seating: StdRng,
}

impl RngStreams {
    /// Both streams seeded from the same value, for reproducible trials.
    pub fn seeded(seed: u64) -> Self {
        Self {
            dice: StdRng::seed_from_u64(seed),
            seating: StdRng::seed_from_u64(seed),
        }
    }

    /// Fresh entropy for both streams.
    pub fn from_entropy() -> Self {
        Self {
            dice: StdRng::from_entropy(),
            seating: StdRng::from_entropy(),
        }
    }
}

/// What one finished trial reports back to the driver.
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    /// Final cash per seat, in seating order. Non-positive means the
    /// player was eliminated.
    pub final_cash: Vec<i64>,
    /// Player names in seating order.
    pub names: Vec<String>,
    /// Lines of the selected auxiliary data stream, in emission order.
    pub data: Vec<String>,
}

/// One complete game of property trading.
#[derive(Debug)]
pub struct Game<'cfg> {
    cfg: &'cfg GameConfig,
    pub board: Board,
    pub players: Vec<Player>,
    chance: Deck<ChanceCard>,
    community: Deck<CommunityCard>,
    rng: RngStreams,
    data: Vec<String>,
}

impl<'cfg> Game<'cfg> {
    /// Set up a fresh game: seat and shuffle the players, shuffle both
    /// decks, lay out the standard board. Fails fast on an unsupported
    /// player count.
    pub fn new(cfg: &'cfg GameConfig, mut rng: RngStreams) -> Result<Self, GameError> {
        if !(2..=8).contains(&cfg.players) {
            return Err(GameError::InvalidPlayerCount { count: cfg.players });
        }

        let mut seats: Vec<(String, i64, PlayerProfile)> = (0..cfg.players)
            .map(|i| {
                let profile = if cfg.experiment.enabled && i == 0 {
                    PlayerProfile::Experimental
                } else {
                    PlayerProfile::Standard
                };
                let name = match profile {
                    PlayerProfile::Experimental => "exp".to_string(),
                    PlayerProfile::Standard => format!("Player {}", i + 1),
                };
                let cash = if cfg.starting_cash_per_seat.is_empty() {
                    cfg.starting_cash
                } else {
                    cfg.starting_cash_per_seat[i % cfg.starting_cash_per_seat.len()]
                };
                (name, cash, profile)
            })
            .collect();
        if cfg.shuffle_seating {
            use rand::seq::SliceRandom;
            seats.shuffle(&mut rng.seating);
        }
        let players: Vec<Player> = seats
            .into_iter()
            .enumerate()
            .map(|(id, (name, cash, profile))| {
                let floor = match profile {
                    PlayerProfile::Experimental => cfg.experiment.cash_floor,
                    PlayerProfile::Standard => cfg.cash_floor,
                };
                Player::new(id, name, profile, cash, floor)
            })
            .collect();

        let chance = Deck::new(ChanceCard::standard_deck(), &mut rng.dice);
        let community = Deck::new(CommunityCard::standard_deck(), &mut rng.dice);

        let mut game = Self {
            cfg,
            board: Board::standard(),
            players,
            chance,
            community,
            rng,
            data: Vec::new(),
        };
        economy::refresh_ownership_caches(
            &mut game.board,
            &mut game.players,
            game.cfg,
            &mut game.rng.dice,
        );
        Ok(game)
    }

    /// Number of players still in the game.
    pub fn solvent_players(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// The game ends when at most one player is solvent.
    pub fn is_over(&self) -> bool {
        self.solvent_players() <= 1
    }

    /// Cash plus the liquidation-equivalent value of all holdings.
    pub fn net_worth(&self, idx: usize) -> i64 {
        self.players[idx].cash + self.board.holdings_value(self.players[idx].id)
    }

    /// Play the game to its end: a bounded number of rounds, each giving
    /// every solvent player one turn (plus doubles repeats), until one
    /// player remains or the budget runs out.
    pub fn run(&mut self) -> TrialOutcome {
        if self.cfg.collect == DataCategory::NetWorth {
            self.record_net_worth();
        }

        for round in 0..self.cfg.turns {
            if self.is_over() {
                if self.cfg.collect == DataCategory::LastTurn {
                    self.data.push((round as i64 - 1).to_string());
                }
                break;
            }
            trace!(round = round + 1, "round starts");
            for idx in 0..self.players.len() {
                if !self.is_over() {
                    while self.take_turn(idx) {}
                }
            }
            if self.cfg.collect == DataCategory::NetWorth {
                self.record_net_worth();
            }
        }

        TrialOutcome {
            final_cash: self.players.iter().map(|p| p.cash).collect(),
            names: self.players.iter().map(|p| p.name.clone()).collect(),
            data: std::mem::take(&mut self.data),
        }
    }

    /// One turn for one player: pre-roll economics, then the dice.
    /// Returns whether the player goes again (doubles).
    pub fn take_turn(&mut self, idx: usize) -> bool {
        if self.players[idx].is_bankrupt {
            return false;
        }
        if self.cfg.collect == DataCategory::PopularCells {
            self.data.push(self.players[idx].position.to_string());
        }
        debug!(player = %self.players[idx].name, cash = self.players[idx].cash, "takes a turn");

        self.pre_roll_economics(idx);

        let die1 = self.rng.dice.gen_range(1..=6u8);
        let die2 = self.rng.dice.gen_range(1..=6u8);
        trace!(player = %self.players[idx].name, die1, die2, "rolls");
        self.resolve_roll(idx, die1, die2)
    }

    /// The money management that happens before the dice: redeem
    /// mortgages while comfortably affordable, then build while spendable
    /// cash remains, then trade. Order matters: redemption frees cash for
    /// building, and every success refreshes the decision caches the next
    /// step reads.
    fn pre_roll_economics(&mut self, idx: usize) {
        while economy::redeem_cheapest_mortgage(&mut self.board, &mut self.players, idx, self.cfg)
        {
            economy::refresh_ownership_caches(
                &mut self.board,
                &mut self.players,
                self.cfg,
                &mut self.rng.dice,
            );
        }

        while economy::build_improvement(
            &mut self.board,
            &mut self.players,
            idx,
            self.cfg,
            &mut self.rng.dice,
        ) {}

        let refuses = self.players[idx].profile == PlayerProfile::Experimental
            && self.cfg.experiment.refuse_trade;
        if self.cfg.trading_enabled && !refuses {
            let traded = economy::two_way_trade(
                &mut self.board,
                &mut self.players,
                idx,
                self.cfg,
                &mut self.rng.dice,
            );
            if !traded && self.solvent_players() >= 3 && self.cfg.three_way_trades {
                economy::three_way_trade(
                    &mut self.board,
                    &mut self.players,
                    idx,
                    self.cfg,
                    &mut self.rng.dice,
                );
            }
        }
    }

    /// Resolve a turn with a fixed dice roll: doubles bookkeeping, jail,
    /// movement, the landing cell's action and the bankruptcy check.
    /// Split from [`Game::take_turn`] so scripted turns can be driven in
    /// tests and replays. Returns whether the player goes again.
    pub fn resolve_roll(&mut self, idx: usize, die1: u8, die2: u8) -> bool {
        self.players[idx].dice = (die1, die2);

        let mut go_again = false;
        if die1 == die2 && !self.players[idx].in_jail {
            go_again = true;
            self.players[idx].consecutive_doubles += 1;
            if self.players[idx].consecutive_doubles == 3 {
                debug!(player = %self.players[idx].name, "jailed for three consecutive doubles");
                self.send_to_jail(idx);
                return false;
            }
        } else {
            self.players[idx].consecutive_doubles = 0;
        }

        if self.players[idx].in_jail {
            if self.players[idx].has_chance_jail_card {
                self.players[idx].has_chance_jail_card = false;
                self.chance.requeue(ChanceCard::GetOutOfJailFree);
                debug!(player = %self.players[idx].name, "leaves jail on the chance card");
            } else if self.players[idx].has_community_jail_card {
                self.players[idx].has_community_jail_card = false;
                self.community.requeue(CommunityCard::GetOutOfJailFree);
                debug!(player = %self.players[idx].name, "leaves jail on the community card");
            } else if die1 != die2 {
                self.players[idx].days_in_jail += 1;
                if self.players[idx].days_in_jail < 3 {
                    debug!(player = %self.players[idx].name, "stays in jail");
                    return false;
                }
                // Third failed roll: pay the fine and walk.
                self.players[idx].cash -= self.cfg.jail_fine;
                self.players[idx].days_in_jail = 0;
                debug!(player = %self.players[idx].name, "pays the fine and leaves jail");
            } else {
                // Doubles release, but without the usual extra turn.
                self.players[idx].days_in_jail = 0;
                go_again = false;
                debug!(player = %self.players[idx].name, "rolls doubles and leaves jail");
            }
            self.players[idx].in_jail = false;
        }

        let mut position = self.players[idx].position + usize::from(die1 + die2);
        if position >= BOARD_SIZE {
            position -= BOARD_SIZE;
            self.players[idx].cash += self.cfg.salary;
            trace!(player = %self.players[idx].name, "collects salary for passing Go");
        }
        self.players[idx].position = position;
        trace!(
            player = %self.players[idx].name,
            position,
            cell = self.board.cells[position].name,
            "moves"
        );

        self.cell_action(idx, false);
        self.resolve_debts(idx);

        go_again && !self.players[idx].in_jail && !self.players[idx].is_bankrupt
    }

    /// Put a player behind bars. Entering jail always clears the doubles
    /// streak.
    fn send_to_jail(&mut self, idx: usize) {
        self.players[idx].position = JAIL_POSITION;
        self.players[idx].in_jail = true;
        self.players[idx].consecutive_doubles = 0;
    }

    /// Act on the cell the player stands on. `doubled_by_card` marks the
    /// chance relocations that double railroad rent and force the 10x
    /// utility rate.
    fn cell_action(&mut self, idx: usize, doubled_by_card: bool) {
        let position = self.players[idx].position;
        let kind = self.board.cells[position].kind;
        match kind {
            CellKind::Go | CellKind::FreeParking | CellKind::Jail => {}
            CellKind::GoToJail => {
                debug!(player = %self.players[idx].name, "goes to jail");
                self.send_to_jail(idx);
            }
            CellKind::LuxuryTax => {
                debug!(player = %self.players[idx].name, amount = self.cfg.luxury_tax, "pays luxury tax");
                self.players[idx].cash -= self.cfg.luxury_tax;
            }
            CellKind::IncomeTax => {
                let due = self.cfg.income_tax_cap.min(self.net_worth(idx).div_euclid(10));
                debug!(player = %self.players[idx].name, amount = due, "pays income tax");
                self.players[idx].cash -= due;
            }
            CellKind::Chance => self.draw_chance(idx),
            CellKind::Community => self.draw_community(idx),
            CellKind::Property(id) => {
                let (die1, die2) = self.players[idx].dice;
                let rent = self
                    .board
                    .rent(position, u32::from(die1) + u32::from(die2), doubled_by_card);
                self.property_action(idx, id, rent);
            }
        }
    }

    /// Landing on a property: nothing if it is the player's own or
    /// mortgaged, a purchase offer if unowned, rent otherwise. Declined
    /// property simply stays on the open market.
    fn property_action(&mut self, idx: usize, id: PropertyId, rent: i64) {
        let me = self.players[idx].id;
        let owner = self.board.properties[id].owner;
        if owner == Some(me) || self.board.properties[id].is_mortgaged {
            trace!("no rent this time");
            return;
        }
        match owner {
            None => {
                let price = self.board.properties[id].cost_base;
                let group = self.board.properties[id].group;
                if economy::wants_to_buy(&self.players[idx], self.cfg, price, group) {
                    debug!(
                        player = %self.players[idx].name,
                        property = self.board.properties[id].name,
                        price,
                        "buys property"
                    );
                    self.players[idx].cash -= price;
                    self.board.properties[id].owner = Some(me);
                    economy::refresh_ownership_caches(
                        &mut self.board,
                        &mut self.players,
                        self.cfg,
                        &mut self.rng.dice,
                    );
                } else {
                    debug!(
                        player = %self.players[idx].name,
                        property = self.board.properties[id].name,
                        "declines to buy"
                    );
                }
            }
            Some(owner) => {
                debug!(
                    player = %self.players[idx].name,
                    to = %self.players[owner].name,
                    rent,
                    "pays rent"
                );
                self.players[idx].cash -= rent;
                self.players[owner].cash += rent;
            }
        }
    }

    /// Relocate to `destination`, paying the salary iff the move passes
    /// Go (destination at or behind the current position), then act on
    /// the cell reached.
    fn advance_to(&mut self, idx: usize, destination: usize) {
        if self.players[idx].position >= destination {
            self.players[idx].cash += self.cfg.salary;
            trace!(player = %self.players[idx].name, "collects salary for passing Go");
        }
        self.players[idx].position = destination;
        self.cell_action(idx, false);
    }

    /// Per-improvement repair bill over everything the player owns.
    fn pay_repairs(&mut self, idx: usize, per_house: i64, per_hotel: i64) {
        let me = self.players[idx].id;
        let mut bill = 0;
        for prop in &self.board.properties {
            if prop.owner == Some(me) {
                bill += if prop.houses == 5 {
                    per_hotel
                } else {
                    per_house * i64::from(prop.houses)
                };
            }
        }
        debug!(player = %self.players[idx].name, bill, "pays repairs");
        self.players[idx].cash -= bill;
    }

    fn draw_chance(&mut self, idx: usize) {
        let Some(card) = self.chance.draw() else {
            return;
        };
        debug!(player = %self.players[idx].name, ?card, "draws a chance card");
        match card {
            ChanceCard::AdvanceToStCharles => self.advance_to(idx, 11),
            ChanceCard::GetOutOfJailFree => self.players[idx].has_chance_jail_card = true,
            ChanceCard::RideTheReading => self.advance_to(idx, 5),
            ChanceCard::AdvanceToNearestRailroad => {
                // The next railroad ahead; railroads sit at 5, 15, 25, 35.
                let position = self.players[idx].position;
                self.players[idx].position = ((position + 4) / 10 * 10 + 5) % BOARD_SIZE;
                self.cell_action(idx, true);
            }
            ChanceCard::AdvanceToIllinois => self.advance_to(idx, 24),
            ChanceCard::GeneralRepairs => self.pay_repairs(idx, 25, 100),
            ChanceCard::AdvanceToGo => {
                self.players[idx].cash += self.cfg.salary;
                self.players[idx].position = 0;
            }
            ChanceCard::BankDividend => self.players[idx].cash += 50,
            ChanceCard::PoorTax => self.players[idx].cash -= 15,
            ChanceCard::AdvanceToNearestUtility => {
                let position = self.players[idx].position;
                self.players[idx].position = if position > 12 && position <= 28 { 28 } else { 12 };
                self.cell_action(idx, true);
            }
            ChanceCard::GoToJail => self.send_to_jail(idx),
            ChanceCard::ElectedChairman => {
                for other in 0..self.players.len() {
                    if other != idx && self.players[other].is_active() {
                        self.players[idx].cash -= 50;
                        self.players[other].cash += 50;
                    }
                }
            }
            ChanceCard::AdvanceToBoardwalk => self.advance_to(idx, 39),
            ChanceCard::GoBackThreeSpaces => {
                self.players[idx].position -= 3;
                self.cell_action(idx, false);
            }
            ChanceCard::BuildingLoanMatures => self.players[idx].cash += 150,
            ChanceCard::CrosswordCompetition => self.players[idx].cash += 100,
        }
        if card != ChanceCard::GetOutOfJailFree {
            self.chance.requeue(card);
        }
    }

    fn draw_community(&mut self, idx: usize) {
        let Some(card) = self.community.draw() else {
            return;
        };
        debug!(player = %self.players[idx].name, ?card, "draws a community chest card");
        match card {
            CommunityCard::SchoolTax => self.players[idx].cash -= 150,
            CommunityCard::OperaNight => {
                // Everyone pays on the spot, settling debts immediately.
                for other in 0..self.players.len() {
                    if other != idx && self.players[other].is_active() {
                        self.players[idx].cash += 50;
                        self.players[other].cash -= 50;
                        self.resolve_debts(other);
                    }
                }
            }
            CommunityCard::Inheritance => self.players[idx].cash += 100,
            CommunityCard::HospitalFee => self.players[idx].cash -= 100,
            CommunityCard::TaxRefund => self.players[idx].cash += 20,
            CommunityCard::GoToJail => self.send_to_jail(idx),
            CommunityCard::GetOutOfJailFree => self.players[idx].has_community_jail_card = true,
            CommunityCard::BeautyContest => self.players[idx].cash += 10,
            CommunityCard::StreetRepairs => self.pay_repairs(idx, 40, 115),
            CommunityCard::BankError => self.players[idx].cash += 200,
            CommunityCard::AdvanceToGo => {
                self.players[idx].cash += self.cfg.salary;
                self.players[idx].position = 0;
            }
            CommunityCard::XmasFund => self.players[idx].cash += 100,
            CommunityCard::DoctorsFee => self.players[idx].cash -= 50,
            CommunityCard::StockSale => self.players[idx].cash += 45,
            CommunityCard::ServicesFee => self.players[idx].cash += 25,
            CommunityCard::LifeInsurance => self.players[idx].cash += 100,
        }
        if card != CommunityCard::GetOutOfJailFree {
            self.community.requeue(card);
        }
    }

    /// While cash is negative, liquidate one asset at a time; once
    /// nothing liquidatable remains, the player is bankrupt and their
    /// holdings return to the open market. Each step strictly increases
    /// cash or empties the asset set, so this always terminates.
    fn resolve_debts(&mut self, idx: usize) {
        if self.players[idx].cash >= 0 {
            return;
        }
        debug!(player = %self.players[idx].name, cash = self.players[idx].cash, "cannot cover debts");
        while self.players[idx].cash < 0 {
            match self.board.liquidation_target(self.players[idx].id) {
                Some(id) => {
                    self.liquidate_step(idx, id);
                    economy::refresh_ownership_caches(
                        &mut self.board,
                        &mut self.players,
                        self.cfg,
                        &mut self.rng.dice,
                    );
                }
                None => {
                    self.players[idx].is_bankrupt = true;
                    self.board.release_holdings(self.players[idx].id);
                    // Held jail-free cards go back into circulation.
                    if std::mem::take(&mut self.players[idx].has_chance_jail_card) {
                        self.chance.requeue(ChanceCard::GetOutOfJailFree);
                    }
                    if std::mem::take(&mut self.players[idx].has_community_jail_card) {
                        self.community.requeue(CommunityCard::GetOutOfJailFree);
                    }
                    economy::refresh_ownership_caches(
                        &mut self.board,
                        &mut self.players,
                        self.cfg,
                        &mut self.rng.dice,
                    );
                    debug!(
                        player = %self.players[idx].name,
                        "is bankrupt; their property returns to the market"
                    );
                    if self.cfg.collect == DataCategory::LosersNames {
                        self.data.push(self.players[idx].name.clone());
                    }
                    if self.cfg.collect == DataCategory::PopularCells {
                        self.data.push(self.players[idx].position.to_string());
                    }
                    return;
                }
            }
        }
    }

    /// One liquidation step on one property: sell the hotel, else sell
    /// one house, else mortgage the deed.
    fn liquidate_step(&mut self, idx: usize, id: PropertyId) {
        let houses = self.board.properties[id].houses;
        let cost_house = self.board.properties[id].cost_house;
        if houses == 5 {
            self.players[idx].cash += cost_house * 5 / 2;
            self.board.properties[id].houses = 0;
            self.board.hotels_built -= 1;
            debug!(player = %self.players[idx].name, property = self.board.properties[id].name, "sells hotel");
        } else if houses > 0 {
            self.players[idx].cash += cost_house / 2;
            self.board.properties[id].houses -= 1;
            self.board.houses_built -= 1;
            debug!(player = %self.players[idx].name, property = self.board.properties[id].name, "sells house");
        } else {
            economy::mortgage_property(&mut self.board, &mut self.players, idx, id);
        }
    }

    /// One tab-separated net-worth snapshot line across all seats.
    fn record_net_worth(&mut self) {
        let line = (0..self.players.len())
            .map(|idx| self.net_worth(idx).to_string())
            .collect::<Vec<_>>()
            .join("\t");
        self.data.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PropertyGroup;
    use pretty_assertions::assert_eq;

    fn make_game(cfg: &GameConfig) -> Game<'_> {
        Game::new(cfg, RngStreams::seeded(42)).unwrap()
    }

    fn unshuffled_config(players: usize) -> GameConfig {
        GameConfig {
            players,
            shuffle_seating: false,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_player_count_is_validated() {
        let mut cfg = GameConfig::default();
        cfg.players = 1;
        assert_eq!(
            Game::new(&cfg, RngStreams::seeded(1)).unwrap_err(),
            GameError::InvalidPlayerCount { count: 1 }
        );
        cfg.players = 9;
        assert!(Game::new(&cfg, RngStreams::seeded(1)).is_err());
        cfg.players = 8;
        assert!(Game::new(&cfg, RngStreams::seeded(1)).is_ok());
    }

    #[test]
    fn test_third_consecutive_double_jails_without_moving() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        game.players[0].consecutive_doubles = 2;
        game.players[0].position = 24;

        let go_again = game.resolve_roll(0, 4, 4);
        assert!(!go_again);
        assert!(game.players[0].in_jail);
        assert_eq!(game.players[0].position, JAIL_POSITION);
        assert_eq!(game.players[0].consecutive_doubles, 0);
        // Cash untouched: no cell action ran.
        assert_eq!(game.players[0].cash, 1500);
    }

    #[test]
    fn test_doubles_grant_an_extra_roll() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        let go_again = game.resolve_roll(0, 2, 2);
        assert!(go_again);
        assert_eq!(game.players[0].consecutive_doubles, 1);
        assert_eq!(game.players[0].position, 4); // Income tax, no property effects
    }

    #[test]
    fn test_jail_card_releases_without_fine_and_returns_to_deck() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        // Hold the chance jail card while in jail.
        game.players[0].in_jail = true;
        game.players[0].position = JAIL_POSITION;
        game.players[0].has_chance_jail_card = true;
        let deck_before = game.chance.len();

        let go_again = game.resolve_roll(0, 4, 6);
        assert!(!go_again);
        assert!(!game.players[0].in_jail);
        assert!(!game.players[0].has_chance_jail_card);
        assert_eq!(game.chance.len(), deck_before + 1);
        // The dice still move the player: 10 + 10 = 20 (Free Parking).
        assert_eq!(game.players[0].position, 20);
        // No fine was paid.
        assert_eq!(game.players[0].cash, 1500);
    }

    #[test]
    fn test_third_day_in_jail_pays_the_fine() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        game.players[0].in_jail = true;
        game.players[0].position = JAIL_POSITION;

        assert!(!game.resolve_roll(0, 2, 5));
        assert!(game.players[0].in_jail);
        assert_eq!(game.players[0].days_in_jail, 1);
        assert_eq!(game.players[0].position, JAIL_POSITION);

        assert!(!game.resolve_roll(0, 2, 5));
        assert_eq!(game.players[0].days_in_jail, 2);

        // Third failed roll: fine paid, released, moved to Free Parking.
        game.resolve_roll(0, 4, 6);
        assert!(!game.players[0].in_jail);
        assert_eq!(game.players[0].days_in_jail, 0);
        assert_eq!(game.players[0].position, 20);
        assert_eq!(game.players[0].cash, 1500 - 50);
    }

    #[test]
    fn test_doubles_release_from_jail_without_extra_turn() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        game.players[0].in_jail = true;
        game.players[0].days_in_jail = 1;
        game.players[0].position = JAIL_POSITION;

        let go_again = game.resolve_roll(0, 3, 3);
        assert!(!go_again);
        assert!(!game.players[0].in_jail);
        assert_eq!(game.players[0].days_in_jail, 0);
        assert_eq!(game.players[0].position, 16);
    }

    #[test]
    fn test_passing_go_pays_the_salary() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        game.players[0].position = 36;
        game.players[0].cash = 0;
        game.resolve_roll(0, 1, 3); // 36 + 4 = 40 -> Go
        assert_eq!(game.players[0].position, 0);
        assert_eq!(game.players[0].cash, 200);
    }

    #[test]
    fn test_unowned_property_is_bought_when_affordable() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        game.resolve_roll(0, 2, 4); // lands on Oriental Avenue
        assert_eq!(game.players[0].position, 6);
        assert_eq!(game.board.properties[3].owner, Some(0));
        assert_eq!(game.players[0].cash, 1500 - 100);
    }

    #[test]
    fn test_unowned_property_declined_stays_on_the_market() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        game.players[0].cash = 100; // not above cost + floor
        game.resolve_roll(0, 2, 4);
        assert_eq!(game.players[0].position, 6);
        assert_eq!(game.board.properties[3].owner, None);
        assert_eq!(game.players[0].cash, 100);
    }

    #[test]
    fn test_landing_on_a_monopoly_member_pays_double_base_rent() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        // Player 1 owns the whole orange group, unimproved.
        for id in [11, 12, 13] {
            game.board.properties[id].owner = Some(1);
        }
        economy::refresh_ownership_caches(
            &mut game.board,
            &mut game.players,
            &cfg,
            &mut game.rng.dice,
        );
        game.players[0].position = 12;
        game.resolve_roll(0, 1, 3); // lands on St. James Place (16)
        assert_eq!(game.players[0].position, 16);
        assert_eq!(game.players[0].cash, 1500 - 28);
        assert_eq!(game.players[1].cash, 1500 + 28);
    }

    #[test]
    fn test_mortgaged_property_charges_no_rent() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        game.board.properties[11].owner = Some(1);
        game.board.properties[11].is_mortgaged = true;
        economy::refresh_ownership_caches(
            &mut game.board,
            &mut game.players,
            &cfg,
            &mut game.rng.dice,
        );
        game.players[0].position = 12;
        game.resolve_roll(0, 1, 3); // lands on St. James Place (16)
        assert_eq!(game.players[0].cash, 1500);
        assert_eq!(game.players[1].cash, 1500);
    }

    #[test]
    fn test_income_tax_takes_the_smaller_of_cap_and_tenth() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        game.players[0].cash = 900; // tenth of net worth = 90 < 200
        game.players[0].position = 2;
        game.resolve_roll(0, 1, 1);
        assert_eq!(game.players[0].position, 4);
        assert_eq!(game.players[0].cash, 900 - 90);

        game.players[1].cash = 5000; // capped at 200
        game.players[1].position = 2;
        game.resolve_roll(1, 1, 1);
        assert_eq!(game.players[1].cash, 5000 - 200);
    }

    #[test]
    fn test_go_to_jail_cell() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        game.players[0].position = 26;
        let go_again = game.resolve_roll(0, 2, 2); // doubles onto Go To Jail (30)
        assert!(!go_again, "a jailing cancels the doubles turn");
        assert!(game.players[0].in_jail);
        assert_eq!(game.players[0].position, JAIL_POSITION);
    }

    #[test]
    fn test_debt_resolution_liquidates_until_cash_recovers() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        // A brown monopoly with a house on each, plus debt.
        game.board.properties[0].owner = Some(0);
        game.board.properties[1].owner = Some(0);
        game.board.properties[0].houses = 1;
        game.board.properties[1].houses = 1;
        game.board.houses_built = 2;
        economy::refresh_ownership_caches(
            &mut game.board,
            &mut game.players,
            &cfg,
            &mut game.rng.dice,
        );
        game.players[0].cash = -40;

        game.resolve_debts(0);
        assert!(game.players[0].cash >= 0);
        assert!(!game.players[0].is_bankrupt);
        // Two house sales at $25 each covered the debt.
        assert_eq!(game.players[0].cash, -40 + 25 + 25);
        assert_eq!(game.board.houses_built, 0);
    }

    #[test]
    fn test_unpayable_debt_bankrupts_and_releases_holdings() {
        let cfg = unshuffled_config(3);
        let mut game = make_game(&cfg);
        game.board.properties[0].owner = Some(0);
        game.board.properties[1].owner = Some(0);
        economy::refresh_ownership_caches(
            &mut game.board,
            &mut game.players,
            &cfg,
            &mut game.rng.dice,
        );
        game.players[0].has_community_jail_card = true;
        let deck_before = game.community.len();
        game.players[0].cash = -10_000;

        game.resolve_debts(0);
        assert!(game.players[0].is_bankrupt);
        assert_eq!(game.board.properties[0].owner, None);
        assert_eq!(game.board.properties[1].owner, None);
        assert!(!game.board.properties[0].is_mortgaged);
        assert!(!game.board.properties[1].is_mortgaged);
        // The held jail-free card went back into its deck.
        assert!(!game.players[0].has_community_jail_card);
        assert_eq!(game.community.len(), deck_before + 1);
        assert_eq!(game.solvent_players(), 2);
    }

    #[test]
    fn test_propertyless_debtor_is_immediately_bankrupt() {
        let cfg = unshuffled_config(2);
        let mut game = make_game(&cfg);
        game.players[0].cash = -1;
        game.resolve_debts(0);
        assert!(game.players[0].is_bankrupt);
        assert!(game.is_over());
    }

    #[test]
    fn test_experimental_seat_gets_name_profile_and_floor() {
        let mut cfg = unshuffled_config(3);
        cfg.experiment.enabled = true;
        cfg.experiment.cash_floor = 250;
        let game = make_game(&cfg);
        assert_eq!(game.players[0].name, "exp");
        assert_eq!(game.players[0].profile, PlayerProfile::Experimental);
        assert_eq!(game.players[0].cash_floor, 250);
        assert_eq!(game.players[1].profile, PlayerProfile::Standard);
    }

    #[test]
    fn test_per_seat_starting_cash_cycles() {
        let mut cfg = unshuffled_config(4);
        cfg.starting_cash_per_seat = vec![1370, 1460, 1540];
        let game = make_game(&cfg);
        let cash: Vec<i64> = game.players.iter().map(|p| p.cash).collect();
        assert_eq!(cash, vec![1370, 1460, 1540, 1370]);
    }

    #[test]
    fn test_refused_group_is_never_bought() {
        let mut cfg = unshuffled_config(2);
        cfg.experiment.enabled = true;
        cfg.experiment.refuse_group = Some(PropertyGroup::LightBlue);
        let mut game = make_game(&cfg);
        game.resolve_roll(0, 2, 4); // exp lands on Oriental Avenue
        assert_eq!(game.players[0].position, 6);
        assert_eq!(game.board.properties[3].owner, None);
    }
}
