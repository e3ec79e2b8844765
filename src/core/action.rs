//! Action representation.
//!
//! One variant per engine action. Actions let a turn orchestrator or a
//! policy describe a move as data, and let the engine record a replayable
//! history of what was applied.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::card::CardId;
use super::player::PlayerId;

/// A move available to the active player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Take the top card of the draw pile.
    DrawFromPile,
    /// Take the top card of the discard pile.
    DrawFromDiscard,
    /// Discard a card and end the turn.
    Discard(CardId),
    /// Announce a knock; the knocking discard follows.
    EnterKnock,
    /// Withdraw a knock announcement.
    CancelKnock,
    /// Discard a card and knock in one step.
    KnockWithDiscard(CardId),
}

impl Action {
    /// Short verb used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Action::DrawFromPile => "draw from pile",
            Action::DrawFromDiscard => "draw from discard",
            Action::Discard(_) => "discard",
            Action::EnterKnock => "knock",
            Action::CancelKnock => "cancel knock",
            Action::KnockWithDiscard(_) => "knock with discard",
        }
    }

    /// The card this action moves out of the hand, if any.
    #[must_use]
    pub const fn card(&self) -> Option<CardId> {
        match self {
            Action::Discard(id) | Action::KnockWithDiscard(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.card() {
            Some(id) => write!(f, "{} {}", self.name(), id),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// An applied action with ordering metadata, for replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Round number the action belongs to (starts at 1).
    pub round: u32,

    /// Position within the match (starts at 0).
    pub sequence: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::{Rank, Suit};

    #[test]
    fn test_action_card() {
        let id = CardId::of(Suit::Spades, Rank::Two);
        assert_eq!(Action::Discard(id).card(), Some(id));
        assert_eq!(Action::KnockWithDiscard(id).card(), Some(id));
        assert_eq!(Action::DrawFromPile.card(), None);
    }

    #[test]
    fn test_action_display() {
        let id = CardId::of(Suit::Spades, Rank::Two);
        assert_eq!(Action::Discard(id).to_string(), "discard 2S");
        assert_eq!(Action::CancelKnock.to_string(), "cancel knock");
    }

    #[test]
    fn test_action_record_serialization() {
        let record = ActionRecord {
            player: PlayerId::ONE,
            action: Action::KnockWithDiscard(CardId::of(Suit::Hearts, Rank::King)),
            round: 2,
            sequence: 17,
        };

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
