//! Core types: cards, deck, players, RNG, configuration, actions, state.
//!
//! Everything here is plain data. The rules that move cards between hands
//! and piles live in `rules`.

pub mod action;
pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use card::{parse_cards, Card, CardId, ParseCardIdError, Rank, Suit};
pub use config::{ConfigError, EngineConfig};
pub use deck::{deal, full_deck, sort_hand, Deal, DECK_SIZE};
pub use error::{EngineError, Pile};
pub use player::{PlayerId, PlayerPair};
pub use rng::{GameRng, GameRngState};
pub use state::{InvariantViolation, OutcomeKind, Phase, RoundOutcome, RoundState};
