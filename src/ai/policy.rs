//! Heuristic and random turn policies.
//!
//! The heuristic functions only read state and return a decision; the caller
//! applies it through the engine exactly as a human move would be applied.
//! They evaluate hands with the greedy meld finder, which the thresholds in
//! [`AiConfig`] are tuned against.
//!
//! - `decide_draw`: take the top discard only when it lowers deadwood by more
//!   than the draw margin.
//! - `select_discard`: shed the deadwood card least likely to form a meld.
//! - `should_knock`: knock on gin or on low deadwood.
//! - `select_knock_discard`: the removal that leaves the least deadwood
//!   within the knock limit.

use serde::{Deserialize, Serialize};

use crate::core::{Action, Card, CardId, GameRng, Phase, PlayerId, RoundState};
use crate::melds::find_melds;
use crate::rules::RummyEngine;

// =============================================================================
// Configuration
// =============================================================================

/// Tuning knobs for the heuristic player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Deadwood improvement the top discard must beat to be taken.
    pub draw_margin: u32,

    /// Knock once deadwood is at or below this.
    pub knock_threshold: u32,

    /// Discard-score reduction for one same-rank partner.
    pub pair_bonus: u32,

    /// Discard-score reduction for two or more same-rank partners.
    pub double_pair_bonus: u32,

    /// Discard-score reduction for one nearby suited card.
    pub near_run_bonus: u32,

    /// Discard-score reduction for two or more nearby suited cards.
    pub double_near_run_bonus: u32,

    /// Rank distance within which a suited card counts as nearby.
    pub near_run_distance: u8,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            draw_margin: 1,
            knock_threshold: 5,
            pair_bonus: 5,
            double_pair_bonus: 10,
            near_run_bonus: 3,
            double_near_run_bonus: 8,
            near_run_distance: 2,
        }
    }
}

impl AiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the knock threshold.
    pub fn with_knock_threshold(mut self, threshold: u32) -> Self {
        self.knock_threshold = threshold;
        self
    }

    /// Set the draw margin.
    pub fn with_draw_margin(mut self, margin: u32) -> Self {
        self.draw_margin = margin;
        self
    }
}

// =============================================================================
// Heuristics
// =============================================================================

/// Where to draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawSource {
    Pile,
    Discard,
}

/// Decide whether `player` should take the top discard.
///
/// Simulates taking it and shedding the best card afterwards, then compares
/// the resulting deadwood with the current hand's.
#[must_use]
pub fn decide_draw(state: &RoundState, player: PlayerId, config: &AiConfig) -> DrawSource {
    let Some(top) = state.top_discard() else {
        return DrawSource::Pile;
    };

    let hand = state.hand(player);
    let current = find_melds(hand).deadwood_points;

    let mut with_top = hand.to_vec();
    with_top.push(*top);
    let after = deadwood_after_best_shed(&with_top);

    if i64::from(current) - i64::from(after) > i64::from(config.draw_margin) {
        DrawSource::Discard
    } else {
        DrawSource::Pile
    }
}

/// Deadwood left after dropping the most useful card from `hand`: the best
/// deadwood card, or the cheapest melded card if nothing is deadwood.
fn deadwood_after_best_shed(hand: &[Card]) -> u32 {
    let melds = find_melds(hand);
    let candidates: Vec<usize> = if melds.deadwood.is_empty() {
        cheapest(hand).into_iter().collect()
    } else {
        (0..hand.len())
            .filter(|&i| !melds.is_melded(hand[i].id))
            .collect()
    };

    candidates
        .into_iter()
        .map(|i| find_melds(&without(hand, i)).deadwood_points)
        .min()
        .unwrap_or(melds.deadwood_points)
}

/// Pick the card to discard from `hand`.
///
/// Melded cards are never discarded while deadwood remains. Each deadwood
/// card scores its point value minus bonuses for same-rank partners and
/// nearby suited cards; the highest score goes, earliest in hand order on a
/// tie. A fully melded hand sheds its highest-value card.
#[must_use]
pub fn select_discard(hand: &[Card], config: &AiConfig) -> Option<CardId> {
    let melds = find_melds(hand);
    if melds.deadwood.is_empty() {
        return first_max_by_key(hand, |c| i64::from(c.points())).map(|c| c.id);
    }

    first_max_by_key(&melds.deadwood, |c| discard_score(c, hand, config)).map(|c| c.id)
}

fn discard_score(card: &Card, hand: &[Card], config: &AiConfig) -> i64 {
    let mut partners = 0;
    let mut nearby = 0;
    for other in hand.iter().filter(|o| o.id != card.id) {
        if other.rank == card.rank {
            partners += 1;
        } else if other.suit == card.suit
            && other.rank.value().abs_diff(card.rank.value()) <= config.near_run_distance
        {
            nearby += 1;
        }
    }

    let pair_bonus = match partners {
        0 => 0,
        1 => config.pair_bonus,
        _ => config.double_pair_bonus,
    };
    let run_bonus = match nearby {
        0 => 0,
        1 => config.near_run_bonus,
        _ => config.double_near_run_bonus,
    };

    i64::from(card.points()) - i64::from(pair_bonus) - i64::from(run_bonus)
}

/// Knock on a gin hand or once deadwood is within the threshold.
///
/// `hand` is the hand that would remain after the knocking discard.
#[must_use]
pub fn should_knock(hand: &[Card], config: &AiConfig) -> bool {
    let deadwood = find_melds(hand).deadwood_points;
    deadwood == 0 || deadwood <= config.knock_threshold
}

/// The discard from an 11-card hand that leaves the lowest deadwood, provided
/// that deadwood is within `knock_limit`.
#[must_use]
pub fn select_knock_discard(hand: &[Card], knock_limit: u32) -> Option<CardId> {
    let mut best: Option<(u32, CardId)> = None;
    for i in 0..hand.len() {
        let deadwood = find_melds(&without(hand, i)).deadwood_points;
        if deadwood <= knock_limit && best.is_none_or(|(d, _)| deadwood < d) {
            best = Some((deadwood, hand[i].id));
        }
    }
    best.map(|(_, id)| id)
}

fn without(hand: &[Card], index: usize) -> Vec<Card> {
    let mut rest = hand.to_vec();
    rest.remove(index);
    rest
}

fn cheapest(hand: &[Card]) -> Option<usize> {
    (0..hand.len()).min_by_key(|&i| hand[i].points())
}

fn first_max_by_key<'a>(cards: &'a [Card], key: impl Fn(&Card) -> i64) -> Option<&'a Card> {
    let mut best: Option<(&Card, i64)> = None;
    for card in cards {
        let score = key(card);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((card, score));
        }
    }
    best.map(|(card, _)| card)
}

// =============================================================================
// Turn Policies
// =============================================================================

/// Chooses the next action for a player.
pub trait TurnPolicy: Send + Sync {
    /// Choose an action for `player`, or `None` if they cannot act.
    fn choose_action(
        &self,
        engine: &RummyEngine,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Action>;
}

/// The heuristic player.
#[derive(Clone, Debug, Default)]
pub struct HeuristicPolicy {
    pub config: AiConfig,
}

impl HeuristicPolicy {
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }
}

impl TurnPolicy for HeuristicPolicy {
    fn choose_action(
        &self,
        engine: &RummyEngine,
        player: PlayerId,
        _rng: &mut GameRng,
    ) -> Option<Action> {
        let state = engine.state();
        if state.current_player != player {
            return None;
        }
        let hand = state.hand(player);
        let knock_limit = engine.config().knock_limit;

        match state.phase {
            Phase::Draw => Some(match decide_draw(state, player, &self.config) {
                DrawSource::Pile => Action::DrawFromPile,
                DrawSource::Discard => Action::DrawFromDiscard,
            }),
            Phase::Discard => {
                let knock = select_knock_discard(hand, knock_limit).filter(|&card| {
                    let rest: Vec<Card> = hand.iter().filter(|c| c.id != card).copied().collect();
                    should_knock(&rest, &self.config)
                });
                match knock {
                    Some(card) => Some(Action::KnockWithDiscard(card)),
                    None => select_discard(hand, &self.config).map(Action::Discard),
                }
            }
            Phase::KnockDiscard => Some(
                select_knock_discard(hand, knock_limit)
                    .map_or(Action::CancelKnock, Action::KnockWithDiscard),
            ),
            Phase::Gin | Phase::RoundOver | Phase::Finished => None,
        }
    }
}

/// Uniform random choice among legal actions.
#[derive(Clone, Debug, Default)]
pub struct RandomPolicy;

impl TurnPolicy for RandomPolicy {
    fn choose_action(
        &self,
        engine: &RummyEngine,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Action> {
        if engine.state().current_player != player {
            return None;
        }
        let actions = engine.legal_actions();
        rng.choose(&actions).copied()
    }
}
