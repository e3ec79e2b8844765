//! Computer players.
//!
//! - `policy`: heuristic decision functions and the `TurnPolicy` trait
//! - `self_play`: headless AI-vs-AI matches

pub mod policy;
pub mod self_play;

pub use policy::{
    decide_draw, select_discard, select_knock_discard, should_knock, AiConfig, DrawSource,
    HeuristicPolicy, RandomPolicy, TurnPolicy,
};
pub use self_play::{play_match, tally, MatchSummary, SelfPlayConfig};
