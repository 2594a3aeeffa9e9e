//! Chance and community chest cards.
//!
//! Both decks hold 16 distinct cards drawn from the front and re-queued at
//! the back, except Get Out Of Jail Free: that card is held by the drawing
//! player and only re-enters its deck when spent (or when its holder goes
//! bankrupt). The card tables are a fixed part of the external contract;
//! changing them changes game semantics.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The 16 chance cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChanceCard {
    /// Advance to St. Charles Place, salary when passing Go.
    AdvanceToStCharles,
    GetOutOfJailFree,
    /// Take a ride on the Reading Railroad, salary when passing Go.
    RideTheReading,
    /// Advance to the nearest railroad and pay double rent. No salary.
    AdvanceToNearestRailroad,
    /// Advance to Illinois Avenue, salary when passing Go.
    AdvanceToIllinois,
    /// Make general repairs: $25 per house, $100 per hotel.
    GeneralRepairs,
    AdvanceToGo,
    /// Bank pays you a dividend of $50.
    BankDividend,
    /// Pay poor tax of $15.
    PoorTax,
    /// Advance to the nearest utility and pay ten times the dice. No salary.
    AdvanceToNearestUtility,
    GoToJail,
    /// Elected chairman of the board: pay each player $50.
    ElectedChairman,
    AdvanceToBoardwalk,
    GoBackThreeSpaces,
    /// Your building loan matures: receive $150.
    BuildingLoanMatures,
    /// You have won a crossword competition: collect $100.
    CrosswordCompetition,
}

impl ChanceCard {
    /// The full chance deck, in canonical order.
    pub fn standard_deck() -> Vec<ChanceCard> {
        vec![
            ChanceCard::AdvanceToStCharles,
            ChanceCard::GetOutOfJailFree,
            ChanceCard::RideTheReading,
            ChanceCard::AdvanceToNearestRailroad,
            ChanceCard::AdvanceToIllinois,
            ChanceCard::GeneralRepairs,
            ChanceCard::AdvanceToGo,
            ChanceCard::BankDividend,
            ChanceCard::PoorTax,
            ChanceCard::AdvanceToNearestUtility,
            ChanceCard::GoToJail,
            ChanceCard::ElectedChairman,
            ChanceCard::AdvanceToBoardwalk,
            ChanceCard::GoBackThreeSpaces,
            ChanceCard::BuildingLoanMatures,
            ChanceCard::CrosswordCompetition,
        ]
    }
}

/// The 16 community chest cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunityCard {
    /// Pay school tax of $150.
    SchoolTax,
    /// Opera night: collect $50 from every player.
    OperaNight,
    /// You inherit $100.
    Inheritance,
    /// Pay hospital $100.
    HospitalFee,
    /// Income tax refund: collect $20.
    TaxRefund,
    GoToJail,
    GetOutOfJailFree,
    /// Second prize in a beauty contest: collect $10.
    BeautyContest,
    /// Assigned for street repairs: $40 per house, $115 per hotel.
    StreetRepairs,
    /// Bank error in your favour: collect $200.
    BankError,
    AdvanceToGo,
    /// Xmas fund matures: collect $100.
    XmasFund,
    /// Pay doctor's fee of $50.
    DoctorsFee,
    /// From sale of stock you get $45.
    StockSale,
    /// Receive for services $25.
    ServicesFee,
    /// Life insurance matures: collect $100.
    LifeInsurance,
}

impl CommunityCard {
    /// The full community chest deck, in canonical order.
    pub fn standard_deck() -> Vec<CommunityCard> {
        vec![
            CommunityCard::SchoolTax,
            CommunityCard::OperaNight,
            CommunityCard::Inheritance,
            CommunityCard::HospitalFee,
            CommunityCard::TaxRefund,
            CommunityCard::GoToJail,
            CommunityCard::GetOutOfJailFree,
            CommunityCard::BeautyContest,
            CommunityCard::StreetRepairs,
            CommunityCard::BankError,
            CommunityCard::AdvanceToGo,
            CommunityCard::XmasFund,
            CommunityCard::DoctorsFee,
            CommunityCard::StockSale,
            CommunityCard::ServicesFee,
            CommunityCard::LifeInsurance,
        ]
    }
}

/// A circular deck: draw from the front, re-queue at the back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck<C> {
    cards: VecDeque<C>,
}

impl<C: Copy> Deck<C> {
    /// Shuffle the given cards into a fresh deck.
    pub fn new<R: Rng>(mut cards: Vec<C>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        Self {
            cards: cards.into(),
        }
    }

    /// Remove and return the front card. The caller re-queues it unless it
    /// leaves circulation (the jail-free card while held).
    pub fn draw(&mut self) -> Option<C> {
        self.cards.pop_front()
    }

    /// Put a card at the back of the deck.
    pub fn requeue(&mut self, card: C) {
        self.cards.push_back(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
