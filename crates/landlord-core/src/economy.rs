//! The economic decision policies layered on the board and player state.
//!
//! This module contains:
//! - The ownership-cache refresh run after every ownership change
//! - Mortgage redemption
//! - The one-improvement build step with supply caps and uniform development
//! - The buy-or-decline rule for unowned property
//! - Two-way and three-way property trading
//!
//! All policies are opportunistic rather than optimal: they take the first
//! valid action found and finding nothing is normal control flow.

use crate::board::{Board, PlayerId, PropertyGroup, PropertyId};
use crate::config::{BuildOrder, GameConfig};
use crate::player::{redemption_price, Mortgage, Player, PlayerProfile};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One improvable property, snapshotted when the candidate list was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCandidate {
    pub property: PropertyId,
    pub houses: u8,
    pub cost_house: i64,
    pub cost_base: i64,
    pub group: PropertyGroup,
}

/// Recompute everything derived from ownership: the monopoly flags and every
/// player's wanted / offered / build-candidate lists. Must run after every
/// purchase, trade, mortgage change, build and bankruptcy before the next
/// rent or policy decision.
pub fn refresh_ownership_caches(
    board: &mut Board,
    players: &mut [Player],
    cfg: &GameConfig,
    rng: &mut StdRng,
) {
    board.recompute_monopolies();
    for idx in 0..players.len() {
        players[idx].wanted = wanted_properties(board, players[idx].id);
        players[idx].offered = offered_properties(board, players[idx].id);
        players[idx].build_candidates = build_candidates(board, &players[idx], cfg, rng);
    }
}

/// Properties that would complete one of the player's groups: every member
/// the player does not own, in any group where exactly one member is
/// missing. Utilities are never worth chasing.
pub fn wanted_properties(board: &Board, player: PlayerId) -> Vec<PropertyId> {
    let mut tally: HashMap<PropertyGroup, (u32, u32)> = HashMap::new();
    for prop in &board.properties {
        let entry = tally.entry(prop.group).or_insert((0, 0));
        entry.0 += 1;
        if prop.owner == Some(player) {
            entry.1 += 1;
        }
    }
    board
        .properties
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            let (total, owned) = tally[&p.group];
            p.group != PropertyGroup::Utility && total - owned == 1 && p.owner != Some(player)
        })
        .map(|(id, _)| id)
        .collect()
}

/// Properties the player would give up in a trade: the lone unmortgaged
/// member of any group where the player owns exactly one.
pub fn offered_properties(board: &Board, player: PlayerId) -> Vec<PropertyId> {
    let mut owned_per_group: HashMap<PropertyGroup, u32> = HashMap::new();
    for prop in &board.properties {
        let owned = owned_per_group.entry(prop.group).or_insert(0);
        if prop.owner == Some(player) {
            *owned += 1;
        }
    }
    board
        .properties
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            p.group != PropertyGroup::Utility
                && owned_per_group[&p.group] == 1
                && p.owner == Some(player)
                && !p.is_mortgaged
        })
        .map(|(id, _)| id)
        .collect()
}

/// List the properties the player could put the next house or hotel on, in
/// the order they should be tried.
///
/// Candidates come from completed color-group monopolies below level 5 with
/// no mortgaged member, restricted to the group's minimum improvement level
/// unless unequal development is allowed, then ordered by the configured
/// build preference. Ties resolve toward the higher board position.
pub fn build_candidates(
    board: &Board,
    player: &Player,
    cfg: &GameConfig,
    rng: &mut StdRng,
) -> Vec<BuildCandidate> {
    let experimental = player.profile == PlayerProfile::Experimental;

    let mortgaged_groups: HashSet<PropertyGroup> = board
        .properties
        .iter()
        .filter(|p| p.is_mortgaged)
        .map(|p| p.group)
        .collect();

    let mut min_level: HashMap<PropertyGroup, u8> = HashMap::new();
    let mut candidates: Vec<BuildCandidate> = Vec::new();
    for (id, prop) in board.properties.iter().enumerate() {
        if prop.is_monopoly
            && prop.owner == Some(player.id)
            && prop.group.improvable()
            && prop.houses < 5
            && !mortgaged_groups.contains(&prop.group)
            && !(experimental && cfg.experiment.house_build_limit == prop.houses)
        {
            candidates.push(BuildCandidate {
                property: id,
                houses: prop.houses,
                cost_house: prop.cost_house,
                cost_base: prop.cost_base,
                group: prop.group,
            });
            min_level
                .entry(prop.group)
                .and_modify(|m| *m = (*m).min(prop.houses))
                .or_insert(prop.houses);
        }
    }

    if !cfg.allow_unequal_development {
        candidates.retain(|c| c.houses == min_level[&c.group]);
    }

    let order = if experimental {
        cfg.experiment.build_order.unwrap_or(cfg.build_order)
    } else {
        cfg.build_order
    };
    match order {
        BuildOrder::Random => candidates.shuffle(rng),
        BuildOrder::CheapestFirst => candidates.sort_by(|a, b| {
            (a.cost_house, a.cost_base, b.property).cmp(&(b.cost_house, b.cost_base, a.property))
        }),
        BuildOrder::ExpensiveFirst => candidates.sort_by(|a, b| {
            (b.cost_house, b.cost_base, b.property).cmp(&(a.cost_house, a.cost_base, a.property))
        }),
    }

    if experimental && cfg.experiment.build_below_three_first {
        if candidates.iter().any(|c| c.houses < 3) {
            candidates.retain(|c| c.houses < 3);
        }
        candidates.sort_by(|a, b| {
            (b.houses, b.cost_house, b.cost_base, b.property)
                .cmp(&(a.houses, a.cost_house, a.cost_base, a.property))
        });
    }

    candidates
}

/// Redeem the cheapest outstanding mortgage if cash comfortably covers it
/// (the configured multiple of the redemption price). Returns whether a
/// mortgage was redeemed; the caller refreshes caches and retries.
pub fn redeem_cheapest_mortgage(
    board: &mut Board,
    players: &mut [Player],
    idx: usize,
    cfg: &GameConfig,
) -> bool {
    let Some(&Mortgage {
        property,
        redemption_price: price,
    }) = players[idx].cheapest_mortgage()
    else {
        return false;
    };
    if players[idx].cash <= price * cfg.unmortgage_multiplier {
        return false;
    }
    board.properties[property].is_mortgaged = false;
    players[idx].cash -= price;
    players[idx].mortgages.retain(|m| m.property != property);
    debug!(
        player = %players[idx].name,
        property = board.properties[property].name,
        price,
        "redeems mortgage"
    );
    true
}

/// Build one improvement from the player's candidate list, spending no more
/// than `cash - cash_floor` and respecting the global house/hotel supply.
/// Returns whether something was built; the caller loops while it can.
pub fn build_improvement(
    board: &mut Board,
    players: &mut [Player],
    idx: usize,
    cfg: &GameConfig,
    rng: &mut StdRng,
) -> bool {
    let available = players[idx].cash - players[idx].cash_floor;
    let Some(candidate) = players[idx]
        .build_candidates
        .iter()
        .find(|c| c.cost_house <= available)
        .copied()
    else {
        return false;
    };

    let property = candidate.property;
    let builds_hotel = board.properties[property].houses == 4;
    if builds_hotel {
        if board.hotels_built == cfg.hotel_limit {
            debug!("hotel supply exhausted");
            return false;
        }
    } else if board.houses_built == cfg.house_limit {
        debug!("house supply exhausted");
        return false;
    }

    board.properties[property].houses += 1;
    if builds_hotel {
        board.hotels_built += 1;
        // The four houses under the hotel go back to the bank.
        board.houses_built -= 4;
    } else {
        board.houses_built += 1;
    }
    players[idx].cash -= board.properties[property].cost_house;
    debug!(
        player = %players[idx].name,
        property = board.properties[property].name,
        level = board.properties[property].houses,
        "builds improvement"
    );
    players[idx].build_candidates = build_candidates(board, &players[idx], cfg, rng);
    true
}

/// Whether the player buys an unowned property they landed on.
pub fn wants_to_buy(player: &Player, cfg: &GameConfig, cost: i64, group: PropertyGroup) -> bool {
    if player.profile == PlayerProfile::Experimental
        && cfg.experiment.refuse_group == Some(group)
    {
        debug!(player = %player.name, ?group, "refuses to buy into group");
        return false;
    }
    player.cash > cost + player.cash_floor
}

/// A matched two-way trade, ready to execute.
struct TwoWayMatch {
    cheap: PropertyId,
    cheap_owner: PlayerId,
    dear: PropertyId,
    dear_owner: PlayerId,
    price_diff: i64,
}

/// Find the first executable two-way match for `idx`: a property they want
/// whose owner reciprocally wants one of `idx`'s offered properties from a
/// different group, where the party receiving the dearer deed can pay the
/// base-cost difference without dropping below its cash floor.
fn find_two_way(board: &Board, players: &[Player], idx: usize) -> Option<TwoWayMatch> {
    let me = players[idx].id;
    for &want in players[idx].wanted.iter().rev() {
        let Some(owner) = board.properties[want].owner else {
            continue;
        };
        for &their_want in players[owner].wanted.iter().rev() {
            if !players[idx].offered.contains(&their_want)
                || board.properties[want].group == board.properties[their_want].group
            {
                continue;
            }
            // `want` is theirs, `their_want` is mine; the cheaper deed's
            // owner pays the difference and receives the dearer deed.
            let (cheap, cheap_owner, dear, dear_owner) =
                if board.properties[want].cost_base < board.properties[their_want].cost_base {
                    (want, owner, their_want, me)
                } else {
                    (their_want, me, want, owner)
                };
            let price_diff =
                board.properties[dear].cost_base - board.properties[cheap].cost_base;
            if players[cheap_owner].cash - price_diff >= players[cheap_owner].cash_floor {
                return Some(TwoWayMatch {
                    cheap,
                    cheap_owner,
                    dear,
                    dear_owner,
                    price_diff,
                });
            }
        }
    }
    None
}

/// Hand a deed to a new owner. An outstanding mortgage follows the deed:
/// its ledger entry moves to the new owner unchanged.
fn transfer_deed(board: &mut Board, players: &mut [Player], id: PropertyId, to: PlayerId) {
    if let Some(from) = board.properties[id].owner {
        if let Some(pos) = players[from].mortgages.iter().position(|m| m.property == id) {
            let entry = players[from].mortgages.remove(pos);
            players[to].mortgages.push(entry);
        }
    }
    board.properties[id].owner = Some(to);
}

/// Run two-way trades for `idx` until no further match exists. Every
/// executed trade refreshes all ownership caches before the next match is
/// sought, so a pass never works from stale lists. Returns whether any
/// trade happened.
pub fn two_way_trade(
    board: &mut Board,
    players: &mut [Player],
    idx: usize,
    cfg: &GameConfig,
    rng: &mut StdRng,
) -> bool {
    let mut traded = false;
    while let Some(m) = find_two_way(board, players, idx) {
        debug!(
            buyer = %players[m.cheap_owner].name,
            seller = %players[m.dear_owner].name,
            gives = board.properties[m.cheap].name,
            receives = board.properties[m.dear].name,
            price_diff = m.price_diff,
            "two-way trade"
        );
        players[m.cheap_owner].cash -= m.price_diff;
        players[m.dear_owner].cash += m.price_diff;
        transfer_deed(board, players, m.cheap, m.dear_owner);
        transfer_deed(board, players, m.dear, m.cheap_owner);
        refresh_ownership_caches(board, players, cfg, rng);
        traded = true;
    }
    traded
}

/// A matched three-way rotation, ready to execute.
struct ThreeWayMatch {
    /// The properties rotating: `first` goes to `idx`, `second` to
    /// `first`'s owner, `third` to `second`'s owner.
    first: PropertyId,
    second: PropertyId,
    third: PropertyId,
    first_owner: PlayerId,
    second_owner: PlayerId,
    pay_me: i64,
    pay_first_owner: i64,
    pay_second_owner: i64,
}

/// Find the first executable three-way rotation starting from `idx`'s
/// want-list. The three properties must span three distinct groups, and
/// every participant must stay strictly above its cash floor after paying
/// its leg of the pairwise base-cost differences.
fn find_three_way(board: &Board, players: &[Player], idx: usize) -> Option<ThreeWayMatch> {
    for &first in players[idx].wanted.iter().rev() {
        let Some(first_owner) = board.properties[first].owner else {
            continue;
        };
        for &second in players[first_owner].wanted.iter().rev() {
            let Some(second_owner) = board.properties[second].owner else {
                continue;
            };
            for &third in players[second_owner].wanted.iter().rev() {
                if !players[idx].offered.contains(&third) {
                    continue;
                }
                // Three distinct groups, or someone gives and takes within
                // the same group in one rotation.
                let groups: HashSet<PropertyGroup> = [first, second, third]
                    .iter()
                    .map(|&p| board.properties[p].group)
                    .collect();
                if groups.len() < 3 {
                    continue;
                }
                let pay_me =
                    board.properties[first].cost_base - board.properties[third].cost_base;
                let pay_first_owner =
                    board.properties[second].cost_base - board.properties[first].cost_base;
                let pay_second_owner =
                    board.properties[third].cost_base - board.properties[second].cost_base;
                if players[idx].cash - pay_me > players[idx].cash_floor
                    && players[first_owner].cash - pay_first_owner
                        > players[first_owner].cash_floor
                    && players[second_owner].cash - pay_second_owner
                        > players[second_owner].cash_floor
                {
                    return Some(ThreeWayMatch {
                        first,
                        second,
                        third,
                        first_owner,
                        second_owner,
                        pay_me,
                        pay_first_owner,
                        pay_second_owner,
                    });
                }
            }
        }
    }
    None
}

/// Run three-way trades for `idx` until no further rotation exists, with
/// the same refresh-before-rematch rule as [`two_way_trade`]. Returns
/// whether any trade happened.
pub fn three_way_trade(
    board: &mut Board,
    players: &mut [Player],
    idx: usize,
    cfg: &GameConfig,
    rng: &mut StdRng,
) -> bool {
    let me = players[idx].id;
    let mut traded = false;
    while let Some(m) = find_three_way(board, players, idx) {
        debug!(
            initiator = %players[idx].name,
            receives = board.properties[m.first].name,
            via = %players[m.first_owner].name,
            and = %players[m.second_owner].name,
            "three-way trade"
        );
        transfer_deed(board, players, m.first, me);
        transfer_deed(board, players, m.second, m.first_owner);
        transfer_deed(board, players, m.third, m.second_owner);
        players[idx].cash -= m.pay_me;
        players[m.first_owner].cash -= m.pay_first_owner;
        players[m.second_owner].cash -= m.pay_second_owner;
        refresh_ownership_caches(board, players, cfg, rng);
        traded = true;
    }
    traded
}

/// Record a fresh mortgage on the ledger and hand the player the loan.
/// Shared by the liquidation step in the game loop.
pub fn mortgage_property(board: &mut Board, players: &mut [Player], idx: usize, property: PropertyId) {
    let cost_base = board.properties[property].cost_base;
    board.properties[property].is_mortgaged = true;
    players[idx].cash += cost_base / 2;
    players[idx].mortgages.push(Mortgage {
        property,
        redemption_price: redemption_price(cost_base),
    });
    debug!(
        player = %players[idx].name,
        property = board.properties[property].name,
        "mortgages property"
    );
}
