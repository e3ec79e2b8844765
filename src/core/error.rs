//! Engine error taxonomy.
//!
//! Every rejected action reports one of these and leaves the round untouched,
//! with one exception: `EmptyPile` from a stock draw arrives after the round
//! has been closed as a draw.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::card::CardId;
use super::config::ConfigError;
use super::player::PlayerId;
use super::state::{InvariantViolation, Phase};

/// The two shared piles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    Draw,
    Discard,
}

impl fmt::Display for Pile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pile::Draw => write!(f, "draw"),
            Pile::Discard => write!(f, "discard"),
        }
    }
}

/// Errors returned by `RummyEngine` actions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("can't {action} during the {phase} phase")]
    WrongPhase { action: &'static str, phase: Phase },
    #[error("not {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("card {0} not found")]
    CardNotFound(CardId),
    #[error("can't knock with {deadwood} deadwood (limit {limit})")]
    InvalidKnock { deadwood: u32, limit: u32 },
    #[error("{0} pile is empty")]
    EmptyPile(Pile),
    #[error("snapshot encoding failed: {0}")]
    Snapshot(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("inconsistent round state: {0}")]
    InvalidState(#[from] InvariantViolation),
}
