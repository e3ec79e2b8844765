//! Headless AI-vs-AI matches.
//!
//! Drives a `RummyEngine` with two `TurnPolicy` players until someone wins
//! or the action budget runs out. There is no turn timing here; every action
//! is applied as soon as it is chosen.

use crate::core::{EngineConfig, EngineError, GameRng, Phase, Pile, PlayerPair, RoundOutcome};
use crate::rules::{GameResult, RummyEngine};

use super::policy::TurnPolicy;

/// Configuration for self-play.
#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    /// Rules for the simulated match.
    pub engine: EngineConfig,

    /// Maximum actions per match (to prevent endless games).
    pub max_actions: usize,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            max_actions: 20_000,
        }
    }
}

impl SelfPlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rules.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Set maximum actions per match.
    pub fn with_max_actions(mut self, max: usize) -> Self {
        self.max_actions = max;
        self
    }
}

/// What happened in one self-play match.
#[derive(Clone, Debug)]
pub struct MatchSummary {
    pub seed: u64,

    /// `None` if the action budget ran out first.
    pub result: Option<GameResult>,

    pub scores: PlayerPair<u32>,

    /// Every completed round, in order.
    pub rounds: Vec<RoundOutcome>,

    /// Actions applied across the match.
    pub actions: usize,
}

impl MatchSummary {
    /// Whether the match reached a winner.
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Rounds that ended with the stock exhausted.
    pub fn drawn_rounds(&self) -> usize {
        self.rounds.iter().filter(|r| r.awarded_to.is_none()).count()
    }
}

/// Play one match between `policies[0]` (player 0) and `policies[1]`.
///
/// The deal sequence depends only on `seed`; policies draw from a separate
/// forked stream. An action a policy proposes that the engine rejects is
/// returned as an error.
pub fn play_match(
    config: &SelfPlayConfig,
    seed: u64,
    policies: [&dyn TurnPolicy; 2],
) -> Result<MatchSummary, EngineError> {
    let mut deal_rng = GameRng::new(seed);
    let mut policy_rng = deal_rng.fork();
    let mut engine = RummyEngine::new(config.engine.clone(), deal_rng)?;

    let mut rounds = Vec::new();
    let mut actions = 0;

    while actions < config.max_actions {
        match engine.state().phase {
            Phase::Finished => break,
            Phase::RoundOver => {
                engine.new_round()?;
                continue;
            }
            _ => {}
        }

        let player = engine.state().current_player;
        let Some(action) = policies[player.index()].choose_action(&engine, player, &mut policy_rng)
        else {
            break;
        };

        match engine.apply_as(player, action) {
            Ok(()) | Err(EngineError::EmptyPile(Pile::Draw)) => {}
            Err(err) => return Err(err),
        }
        actions += 1;

        if engine.state().phase.is_round_end() {
            if let Some(outcome) = &engine.state().outcome {
                rounds.push(outcome.clone());
            }
        }
    }

    let result = engine.result();
    if let Some(result) = &result {
        log::info!(
            "self-play seed {seed}: {} won after {} rounds",
            result.winner,
            result.rounds
        );
    }

    Ok(MatchSummary {
        seed,
        result,
        scores: engine.state().scores.clone(),
        rounds,
        actions,
    })
}

/// Count wins per seat over `seeds`.
pub fn tally(
    config: &SelfPlayConfig,
    seeds: impl IntoIterator<Item = u64>,
    policies: [&dyn TurnPolicy; 2],
) -> Result<PlayerPair<u32>, EngineError> {
    let mut wins = PlayerPair::default();
    for seed in seeds {
        if let Some(result) = play_match(config, seed, policies)?.result {
            wins[result.winner] += 1;
        }
    }
    Ok(wins)
}
