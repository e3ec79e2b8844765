//! # gin-rummy
//!
//! A two-player Gin Rummy rule engine: meld detection, the turn-phase state
//! machine, round scoring and a heuristic computer player.
//!
//! ## Design Principles
//!
//! 1. **One Owner**: `RummyEngine` owns the `RoundState`. Callers read it
//!    through `state()` and change it only through engine actions.
//!
//! 2. **No Partial Moves**: every action validates before it mutates. A
//!    rejected action leaves the state exactly as it was.
//!
//! 3. **Deterministic**: all shuffling goes through an injected `GameRng`, so
//!    a seed plus an action list replays a match.
//!
//! ## Modules
//!
//! - `core`: Cards, deck, players, RNG, configuration, actions, state, errors
//! - `melds`: Greedy meld finder and the opt-in exact search
//! - `rules`: `RummyEngine`, scoring, state-change listeners
//! - `ai`: Heuristic and random policies, headless self-play
//!
//! ## Example
//!
//! ```
//! use gin_rummy::{Action, Phase, RummyEngine};
//!
//! let mut engine = RummyEngine::with_seed(42);
//! engine.apply(Action::DrawFromPile).unwrap();
//! assert_eq!(engine.state().phase, Phase::Discard);
//!
//! let card = engine.state().active_hand()[0].id;
//! engine.discard(card).unwrap();
//! assert_eq!(engine.state().phase, Phase::Draw);
//! ```

pub mod ai;
pub mod core;
pub mod melds;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord,
    Card, CardId, Rank, Suit,
    EngineConfig, ConfigError,
    EngineError, Pile,
    GameRng, GameRngState,
    Phase, PlayerId, PlayerPair,
    RoundOutcome, OutcomeKind, RoundState, InvariantViolation,
};

pub use crate::melds::{
    can_knock, find_melds, find_melds_exhaustive, is_gin,
    Meld, MeldKind, MeldResult, MeldStrategy,
};

pub use crate::rules::{GameResult, ListenerControl, ListenerId, RummyEngine};

pub use crate::ai::{
    AiConfig, DrawSource, HeuristicPolicy, RandomPolicy, TurnPolicy,
    MatchSummary, SelfPlayConfig, play_match,
};
