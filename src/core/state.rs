//! Round state: hands, piles, turn, phase and cumulative scores.
//!
//! `RoundState` is plain data with no cycles, so it serializes directly for
//! a network mirror. The engine owns the only mutable copy; everyone else
//! sees `&RoundState`.
//!
//! ## Invariants
//!
//! Checked by [`RoundState::check_invariants`] after every engine mutation:
//! - all 52 cards are present exactly once across hands and piles, and each
//!   card's suit and rank match its id
//! - the transient `Gin` phase never survives an engine call
//! - each hand holds `hand_size` cards, plus one for the active player while
//!   they hold a freshly drawn card
//! - `Finished` implies the winner is the player `match_winner` picks
//! - a knocker is only recorded once a round has ended by knock or gin, never
//!   for a drawn round

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::card::{Card, CardId};
use super::config::EngineConfig;
use super::deck::{Deal, DECK_SIZE};
use super::error::EngineError;
use super::player::{PlayerId, PlayerPair};
use crate::rules::match_winner;

/// Turn phase of the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Active player must draw.
    Draw,
    /// Active player holds a drawn card and must discard.
    Discard,
    /// Active player announced a knock and must pick the knocking discard.
    KnockDiscard,
    /// A plain discard completed a gin hand; resolved within the same call.
    Gin,
    /// Round scored (or drawn); waiting for `new_round`.
    RoundOver,
    /// Someone reached the target score.
    Finished,
}

impl Phase {
    /// Phases in which the active player holds an extra card.
    #[must_use]
    pub const fn holding_drawn_card(self) -> bool {
        matches!(self, Phase::Discard | Phase::KnockDiscard)
    }

    /// Phases in which no turn action is legal.
    #[must_use]
    pub const fn is_round_end(self) -> bool {
        matches!(self, Phase::RoundOver | Phase::Finished)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Draw => "draw",
            Phase::Discard => "discard",
            Phase::KnockDiscard => "knock discard",
            Phase::Gin => "gin",
            Phase::RoundOver => "round over",
            Phase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    Gin,
    Knock,
    Undercut,
    /// Stock exhausted; nobody scores.
    Drawn,
}

/// Scored result of a finished round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub kind: OutcomeKind,
    /// Player credited with `points`; `None` for a drawn round.
    pub awarded_to: Option<PlayerId>,
    pub points: u32,
    /// Deadwood totals at resolution (zero for a drawn round).
    pub deadwood: PlayerPair<u32>,
}

impl RoundOutcome {
    /// Outcome of a round abandoned because the stock ran out.
    #[must_use]
    pub fn drawn() -> Self {
        Self {
            kind: OutcomeKind::Drawn,
            awarded_to: None,
            points: 0,
            deadwood: PlayerPair::default(),
        }
    }
}

/// A broken state invariant. Only reachable through an engine bug or a
/// hand-edited snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("expected {DECK_SIZE} cards, found {0}", DECK_SIZE = DECK_SIZE)]
    CardCount(usize),
    #[error("card {0} appears more than once")]
    DuplicateCard(CardId),
    #[error("card {0} does not match its suit and rank")]
    CardMismatch(CardId),
    #[error("the gin phase cannot persist between actions")]
    TransientPhase,
    #[error("{player} holds {len} cards during the {phase} phase")]
    HandSize {
        player: PlayerId,
        len: usize,
        phase: Phase,
    },
    #[error("match finished without a winner at the target score")]
    MissingWinner,
    #[error("winner recorded as {found:?}, scores say {expected}")]
    WrongWinner {
        expected: PlayerId,
        found: Option<PlayerId>,
    },
    #[error("knocker recorded during the {0} phase")]
    StrayKnocker(Phase),
    #[error("knocker recorded for a drawn round")]
    DrawnRoundKnocker,
}

/// Complete state of the current round plus match-level scores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    /// Hands, index 0 = primary player.
    pub hands: PlayerPair<Vec<Card>>,

    /// Stock, drawn from the end.
    pub draw_pile: Vec<Card>,

    /// Discards, top is the end.
    pub discard_pile: Vec<Card>,

    pub current_player: PlayerId,
    pub phase: Phase,

    /// Cumulative across rounds.
    pub scores: PlayerPair<u32>,

    /// Player who ended the round by knock or gin.
    pub knocker: Option<PlayerId>,

    /// Human-readable description of the most recent action.
    pub last_action: String,

    /// Human-readable round summary once the round has ended.
    pub round_result: Option<String>,

    /// Structured round summary once the round has ended.
    pub outcome: Option<RoundOutcome>,

    /// Match winner, set with `Phase::Finished`.
    pub winner: Option<PlayerId>,

    /// 1-based round counter within the match.
    pub round_number: u32,

    /// Player who took the first turn of this round.
    pub starting_player: PlayerId,
}

impl RoundState {
    /// Fresh round from a deal. `starting_player` moves first.
    #[must_use]
    pub fn from_deal(
        deal: Deal,
        scores: PlayerPair<u32>,
        starting_player: PlayerId,
        round_number: u32,
    ) -> Self {
        Self {
            hands: deal.hands,
            draw_pile: deal.draw_pile,
            discard_pile: deal.discard_pile,
            current_player: starting_player,
            phase: Phase::Draw,
            scores,
            knocker: None,
            last_action: format!("Round {round_number} dealt"),
            round_result: None,
            outcome: None,
            winner: None,
            round_number,
            starting_player,
        }
    }

    /// A player's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Card] {
        &self.hands[player]
    }

    /// The active player's hand.
    #[must_use]
    pub fn active_hand(&self) -> &[Card] {
        &self.hands[self.current_player]
    }

    /// Top of the discard pile.
    #[must_use]
    pub fn top_discard(&self) -> Option<&Card> {
        self.discard_pile.last()
    }

    /// Position of a card in a player's hand.
    #[must_use]
    pub fn position_in_hand(&self, player: PlayerId, id: CardId) -> Option<usize> {
        self.hands[player].iter().position(|c| c.id == id)
    }

    /// Every card in the round, hands first.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.hands[PlayerId::ZERO]
            .iter()
            .chain(&self.hands[PlayerId::ONE])
            .chain(&self.draw_pile)
            .chain(&self.discard_pile)
    }

    /// Every card id in the round, hands first.
    pub fn all_card_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.all_cards().map(|c| c.id)
    }

    /// Verify the structural invariants listed in the module docs.
    pub fn check_invariants(&self, config: &EngineConfig) -> Result<(), InvariantViolation> {
        let mut seen = FxHashSet::default();
        let mut count = 0;
        for card in self.all_cards() {
            count += 1;
            if card.id.index() >= CardId::COUNT
                || card.suit != card.id.suit()
                || card.rank != card.id.rank()
            {
                return Err(InvariantViolation::CardMismatch(card.id));
            }
            if !seen.insert(card.id) {
                return Err(InvariantViolation::DuplicateCard(card.id));
            }
        }
        if count != DECK_SIZE {
            return Err(InvariantViolation::CardCount(count));
        }

        if self.phase == Phase::Gin {
            return Err(InvariantViolation::TransientPhase);
        }

        for (player, hand) in self.hands.iter() {
            let extra =
                usize::from(player == self.current_player && self.phase.holding_drawn_card());
            if hand.len() != config.hand_size + extra {
                return Err(InvariantViolation::HandSize {
                    player,
                    len: hand.len(),
                    phase: self.phase,
                });
            }
        }

        if self.phase == Phase::Finished {
            match match_winner(&self.scores, config.target_score) {
                None => return Err(InvariantViolation::MissingWinner),
                Some(expected) if self.winner != Some(expected) => {
                    return Err(InvariantViolation::WrongWinner {
                        expected,
                        found: self.winner,
                    });
                }
                Some(_) => {}
            }
        }

        if self.knocker.is_some() {
            if !self.phase.is_round_end() {
                return Err(InvariantViolation::StrayKnocker(self.phase));
            }
            if self.outcome.as_ref().is_some_and(|o| o.kind == OutcomeKind::Drawn) {
                return Err(InvariantViolation::DrawnRoundKnocker);
            }
        }

        Ok(())
    }

    /// Encode for transport.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        bincode::serialize(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Decode a snapshot produced by [`RoundState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        bincode::deserialize(bytes).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}
