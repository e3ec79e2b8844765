//! Gin Rummy rules: the turn state machine, round scoring and state-change
//! listeners.
//!
//! `RummyEngine` is the only place state is mutated. Scoring and match-end
//! checks are free functions so the AI and tests can evaluate hypothetical
//! rounds without an engine.

pub mod engine;
pub mod observer;
pub mod scoring;

pub use engine::{GameResult, RummyEngine};
pub use observer::{ListenerControl, ListenerId, Listeners};
pub use scoring::{describe, match_winner, score_round};
