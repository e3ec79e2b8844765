//! Round scoring.
//!
//! - Gin: knocker scores the gin bonus plus the opponent's deadwood.
//! - Knock: knocker scores the deadwood difference if strictly lower.
//! - Undercut: otherwise the opponent scores the difference plus the
//!   undercut bonus.

use crate::core::{EngineConfig, OutcomeKind, PlayerId, PlayerPair, RoundOutcome};

/// Score a round ended by `knocker`.
#[must_use]
pub fn score_round(
    knocker: PlayerId,
    knocker_deadwood: u32,
    opponent_deadwood: u32,
    gin: bool,
    config: &EngineConfig,
) -> RoundOutcome {
    let opponent = knocker.opponent();
    let mut deadwood = PlayerPair::default();
    deadwood[knocker] = knocker_deadwood;
    deadwood[opponent] = opponent_deadwood;

    let (kind, awarded_to, points) = if gin {
        (OutcomeKind::Gin, knocker, config.gin_bonus + opponent_deadwood)
    } else if knocker_deadwood < opponent_deadwood {
        (OutcomeKind::Knock, knocker, opponent_deadwood - knocker_deadwood)
    } else {
        (
            OutcomeKind::Undercut,
            opponent,
            knocker_deadwood - opponent_deadwood + config.undercut_bonus,
        )
    };

    RoundOutcome {
        kind,
        awarded_to: Some(awarded_to),
        points,
        deadwood,
    }
}

/// Match winner once either score reaches the target: the higher score,
/// player 0 on an exact tie.
#[must_use]
pub fn match_winner(scores: &PlayerPair<u32>, target: u32) -> Option<PlayerId> {
    let (a, b) = (scores[PlayerId::ZERO], scores[PlayerId::ONE]);
    if a < target && b < target {
        return None;
    }
    Some(if b > a { PlayerId::ONE } else { PlayerId::ZERO })
}

/// One-line summary of a scored round for `RoundState::round_result`.
#[must_use]
pub fn describe(outcome: &RoundOutcome) -> String {
    let headline = match (outcome.kind, outcome.awarded_to) {
        (OutcomeKind::Gin, Some(p)) => format!("{p} went gin"),
        (OutcomeKind::Knock, Some(p)) => format!("{p} won the knock"),
        (OutcomeKind::Undercut, Some(p)) => format!("{p} undercut the knock"),
        _ => return "Draw pile exhausted: round is a draw".to_string(),
    };
    format!(
        "{headline} and scores {} (deadwood {} vs {})",
        outcome.points,
        outcome.deadwood[PlayerId::ZERO],
        outcome.deadwood[PlayerId::ONE]
    )
}
