//! Integration tests for round resolution, failure atomicity and replay.

use std::cell::RefCell;
use std::rc::Rc;

use gin_rummy::core::parse_cards;
use gin_rummy::{
    Action, Card, CardId, EngineConfig, EngineError, GameRng, InvariantViolation, ListenerControl,
    OutcomeKind, Phase, PlayerId, PlayerPair, RoundState, RummyEngine,
};

// =============================================================================
// Helpers
// =============================================================================

/// Engine where player 0 holds `active` (11 cards, mid-turn) and player 1
/// holds `other`. The remaining cards form the piles.
fn rigged(active: &str, other: &str, scores: [u32; 2]) -> RummyEngine {
    let mut state = RummyEngine::with_seed(99).state().clone();
    let active = parse_cards(active).unwrap();
    let other = parse_cards(other).unwrap();

    let mut pool: Vec<Card> = Vec::new();
    for player in PlayerId::both() {
        pool.append(&mut state.hands[player]);
    }
    pool.append(&mut state.draw_pile);
    pool.append(&mut state.discard_pile);
    pool.retain(|c| !active.contains(c) && !other.contains(c));

    state.hands[PlayerId::ZERO] = active;
    state.hands[PlayerId::ONE] = other;
    state.discard_pile = pool.pop().into_iter().collect();
    state.draw_pile = pool;
    state.current_player = PlayerId::ZERO;
    state.phase = Phase::Discard;
    state.scores = PlayerPair::new(scores[0], scores[1]);

    RummyEngine::from_state(EngineConfig::default(), state, GameRng::new(99)).unwrap()
}

fn id(card: &str) -> CardId {
    card.parse().unwrap()
}

/// Gin after dropping KH.
const GIN_HAND: &str = "AC 2C 3C 4D 4H 4S 8S 9S 10S JS KH";
/// 31 deadwood: 5C-7C and three 7s melded, KD 2D 9H QC left.
const THIRTY_ONE: &str = "5C 6C 7C 7D 7H 7S KD 2D 9H QC";
/// 8 deadwood (8H) after dropping KD.
const EIGHT_HAND: &str = "3C 4C 5C 7D 7H 7S 9S 10S JS 8H KD";

// =============================================================================
// Round Resolution
// =============================================================================

#[test]
fn test_gin_by_knock_scores_56() {
    let mut engine = rigged(GIN_HAND, THIRTY_ONE, [0, 0]);
    engine.knock_with_discard(id("KH")).unwrap();

    let state = engine.state();
    assert_eq!(state.phase, Phase::RoundOver);
    assert_eq!(state.knocker, Some(PlayerId::ZERO));
    assert_eq!(state.scores.clone().into_array(), [56, 0]);

    let outcome = state.outcome.as_ref().unwrap();
    assert_eq!(outcome.kind, OutcomeKind::Gin);
    assert_eq!(outcome.deadwood.clone().into_array(), [0, 31]);
}

#[test]
fn test_gin_by_plain_discard() {
    let mut engine = rigged(GIN_HAND, THIRTY_ONE, [0, 0]);
    assert!(engine.is_gin());
    engine.discard(id("KH")).unwrap();

    let state = engine.state();
    assert_eq!(state.phase, Phase::RoundOver);
    assert_eq!(state.scores[PlayerId::ZERO], 56);
    assert_eq!(
        state.round_result.as_deref(),
        Some("Player 0 went gin and scores 56 (deadwood 0 vs 31)")
    );
}

#[test]
fn test_knock_scores_difference() {
    // Opponent: aces and sixes melded, 5H 5S 2H 3S = 15.
    let mut engine = rigged(EIGHT_HAND, "AC AD AS 6C 6D 6H 5H 5S 2H 3S", [0, 0]);
    assert!(engine.can_knock());
    assert!(!engine.is_gin());
    engine.knock_with_discard(id("KD")).unwrap();

    let state = engine.state();
    assert_eq!(state.outcome.as_ref().map(|o| o.kind), Some(OutcomeKind::Knock));
    assert_eq!(state.scores.clone().into_array(), [7, 0]);
    assert_eq!(state.top_discard().map(|c| c.id), Some(id("KD")));
}

#[test]
fn test_undercut_rewards_defender() {
    // Knocker keeps 9H (9); opponent holds two four-card sets plus 2H 4S (6).
    let mut engine = rigged(
        "3C 4C 5C 7D 7H 7S 9S 10S JS 9H KD",
        "AC AD AS AH 6C 6D 6H 6S 2H 4S",
        [0, 0],
    );
    engine.knock_with_discard(id("KD")).unwrap();

    let state = engine.state();
    assert_eq!(state.knocker, Some(PlayerId::ZERO));
    assert_eq!(
        state.outcome.as_ref().map(|o| o.kind),
        Some(OutcomeKind::Undercut)
    );
    assert_eq!(state.scores.clone().into_array(), [0, 28]);
}

#[test]
fn test_reaching_target_finishes_match() {
    // 8 vs 13 deadwood: +5 on top of 97.
    let mut engine = rigged(EIGHT_HAND, "AC AD AS AH 6C 6D 6H 6S 5H 8C", [97, 0]);
    engine.knock_with_discard(id("KD")).unwrap();

    let state = engine.state();
    assert_eq!(state.scores.clone().into_array(), [102, 0]);
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.winner, Some(PlayerId::ZERO));

    let result = engine.result().unwrap();
    assert!(result.is_winner(PlayerId::ZERO));
    assert!(engine.legal_actions().is_empty());
    assert!(matches!(
        engine.new_round(),
        Err(EngineError::WrongPhase { phase: Phase::Finished, .. })
    ));
}

// =============================================================================
// Failure Atomicity
// =============================================================================

#[test]
fn test_failed_knock_is_byte_identical() {
    let mut engine = rigged(
        "2C 9C KC 3D 8D QD 4H 7H JH 5S 10S",
        "AC 3C 5C 7C AD 4D 6D 9D 2H 5H",
        [0, 0],
    );
    let notified = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&notified);
    engine.subscribe(move |_| {
        *counter.borrow_mut() += 1;
        ListenerControl::Keep
    });

    let before = engine.state().to_bytes().unwrap();
    for card in ["2C", "QD", "10S"] {
        let err = engine.knock_with_discard(id(card)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidKnock { limit: 10, .. }));
        assert_eq!(engine.state().to_bytes().unwrap(), before);
    }

    engine.enter_knock_phase().unwrap();
    assert!(engine.knock_with_discard(id("KC")).is_err());
    assert_eq!(engine.state().phase, Phase::KnockDiscard);
    assert_eq!(*notified.borrow(), 1);
}

#[test]
fn test_rejected_actions_leave_state_untouched() {
    let mut engine = RummyEngine::with_seed(21);
    let before = engine.state().clone();
    let foreign = engine.state().hand(PlayerId::ONE)[0].id;

    assert!(engine.discard(foreign).is_err());
    assert!(engine.enter_knock_phase().is_err());
    assert!(engine.knock_with_discard(foreign).is_err());
    assert!(engine.apply_as(PlayerId::ONE, Action::DrawFromPile).is_err());
    assert!(engine.new_round().is_err());

    assert_eq!(engine.state(), &before);
    assert!(engine.history().is_empty());

    engine.draw_from_pile().unwrap();
    assert_eq!(
        engine.discard(foreign),
        Err(EngineError::CardNotFound(foreign))
    );
    assert_eq!(engine.state().active_hand().len(), 11);
}

// =============================================================================
// Rounds and Listeners
// =============================================================================

#[test]
fn test_stock_exhaustion_draws_round_and_keeps_starter() {
    let mut state: RoundState = RummyEngine::with_seed(8).state().clone();
    let stock: Vec<Card> = state.draw_pile.drain(..).collect();
    state.discard_pile.extend(stock);
    let mut engine =
        RummyEngine::from_state(EngineConfig::default(), state, GameRng::new(8)).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    engine.subscribe(move |s| {
        log.borrow_mut().push(s.phase);
        ListenerControl::Keep
    });

    assert!(matches!(
        engine.draw_from_pile(),
        Err(EngineError::EmptyPile(_))
    ));
    assert_eq!(engine.state().phase, Phase::RoundOver);
    assert_eq!(engine.state().knocker, None);

    engine.new_round().unwrap();
    assert_eq!(engine.state().current_player, PlayerId::ZERO);
    assert_eq!(engine.state().round_number, 2);
    assert_eq!(*seen.borrow(), vec![Phase::RoundOver, Phase::Draw]);
}

#[test]
fn test_listener_unsubscribe() {
    let mut engine = RummyEngine::with_seed(3);
    let calls = Rc::new(RefCell::new(0));

    let counter = Rc::clone(&calls);
    let id = engine.subscribe(move |_| {
        *counter.borrow_mut() += 1;
        ListenerControl::Keep
    });
    let once = Rc::clone(&calls);
    engine.subscribe(move |_| {
        *once.borrow_mut() += 100;
        ListenerControl::Unsubscribe
    });

    engine.draw_from_pile().unwrap();
    assert_eq!(*calls.borrow(), 101);

    assert!(engine.unsubscribe(id));
    let card = engine.state().active_hand()[0].id;
    engine.discard(card).unwrap();
    assert_eq!(*calls.borrow(), 101);
}

// =============================================================================
// Replay and Snapshots
// =============================================================================

#[test]
fn test_history_replays_to_same_state() {
    let mut original = RummyEngine::with_seed(77);
    let mut rng = GameRng::new(1);
    for _ in 0..300 {
        match original.state().phase {
            Phase::Finished => break,
            Phase::RoundOver => original.new_round().unwrap(),
            _ => {
                let actions = original.legal_actions();
                let action = *rng.choose(&actions).unwrap();
                let _ = original.apply(action);
            }
        }
    }

    let mut replay = RummyEngine::with_seed(77);
    let mut round = 1;
    for record in original.history().iter() {
        if record.round != round {
            replay.new_round().unwrap();
            round = record.round;
        }
        let result = replay.apply_as(record.player, record.action);
        assert!(result.is_ok() || matches!(result, Err(EngineError::EmptyPile(_))));
    }
    while replay.state().round_number < original.state().round_number {
        replay.new_round().unwrap();
    }

    assert_eq!(replay.state(), original.state());
    assert_eq!(replay.rng_state(), original.rng_state());
}

#[test]
fn test_snapshot_resumes_mid_turn() {
    let mut engine = RummyEngine::with_seed(12);
    engine.draw_from_discard().unwrap();

    let bytes = engine.state().to_bytes().unwrap();
    let state = RoundState::from_bytes(&bytes).unwrap();
    let mut resumed =
        RummyEngine::from_state(EngineConfig::default(), state, GameRng::new(12)).unwrap();

    assert_eq!(resumed.state().phase, Phase::Discard);
    let card = resumed.state().active_hand()[0].id;
    resumed.discard(card).unwrap();
    assert_eq!(resumed.state().current_player, PlayerId::ONE);
}

#[test]
fn test_snapshot_with_broken_rules_rejected() {
    let resume = |state: RoundState| {
        RummyEngine::from_state(EngineConfig::default(), state, GameRng::new(4)).map(|_| ())
    };
    let base = RummyEngine::with_seed(4).state().clone();

    let mut gin = base.clone();
    gin.phase = Phase::Gin;
    assert_eq!(
        resume(gin),
        Err(EngineError::InvalidState(InvariantViolation::TransientPhase))
    );

    let mut finished = base.clone();
    finished.phase = Phase::Finished;
    finished.scores = PlayerPair::new(100, 150);
    finished.winner = Some(PlayerId::ZERO);
    assert!(matches!(
        resume(finished),
        Err(EngineError::InvalidState(InvariantViolation::WrongWinner { .. }))
    ));

    // A stock card whose faces were swapped for another card's.
    let mut forged = base;
    let stock_card = forged.draw_pile[0].id;
    let other = forged.hands[PlayerId::ZERO][0];
    forged.draw_pile[0].suit = other.suit;
    forged.draw_pile[0].rank = other.rank;
    assert_eq!(
        resume(forged),
        Err(EngineError::InvalidState(InvariantViolation::CardMismatch(stock_card)))
    );
}
