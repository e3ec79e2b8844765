//! Property tests: card conservation under random play, meld partition
//! validity and knock/gin eligibility.

use proptest::prelude::*;
use proptest::sample::subsequence;
use rustc_hash::FxHashSet;

use gin_rummy::{
    can_knock, find_melds, find_melds_exhaustive, is_gin, Card, CardId, EngineError, Meld,
    MeldResult, Phase, RummyEngine,
};

fn hand_strategy(max: usize) -> impl Strategy<Value = Vec<Card>> {
    let ids: Vec<u8> = (0..52).collect();
    (subsequence(ids, 0..=max), any::<u64>()).prop_map(|(ids, salt)| {
        let mut cards: Vec<Card> = ids.into_iter().map(|i| Card::from_id(CardId(i))).collect();
        // Vary hand order so the finder never relies on sorted input.
        let len = cards.len();
        if len > 1 {
            cards.rotate_left((salt % len as u64) as usize);
        }
        cards
    })
}

fn assert_partition(hand: &[Card], result: &MeldResult) -> Result<(), TestCaseError> {
    let mut seen = FxHashSet::default();
    for meld in &result.melds {
        prop_assert!(Meld::is_valid(meld.kind, &meld.cards), "{meld:?}");
        for card in &meld.cards {
            prop_assert!(seen.insert(card.id), "card {} in two melds", card.id);
        }
    }
    for card in &result.deadwood {
        prop_assert!(seen.insert(card.id), "card {} melded and deadwood", card.id);
    }

    let hand_ids: FxHashSet<CardId> = hand.iter().map(|c| c.id).collect();
    prop_assert_eq!(seen, hand_ids);
    prop_assert_eq!(
        result.deadwood_points,
        result.deadwood.iter().map(Card::points).sum::<u32>()
    );
    Ok(())
}

proptest! {
    #[test]
    fn greedy_partition_is_valid(hand in hand_strategy(11)) {
        assert_partition(&hand, &find_melds(&hand))?;
    }

    #[test]
    fn exhaustive_partition_is_valid_and_no_worse(hand in hand_strategy(11)) {
        let exact = find_melds_exhaustive(&hand);
        assert_partition(&hand, &exact)?;
        prop_assert!(exact.deadwood_points <= find_melds(&hand).deadwood_points);
    }

    #[test]
    fn gin_and_knock_follow_deadwood(hand in hand_strategy(11), limit in 0u32..=20) {
        let deadwood = find_melds(&hand).deadwood_points;
        prop_assert_eq!(is_gin(&hand), deadwood == 0);
        prop_assert_eq!(can_knock(&hand, limit), deadwood <= limit);
    }

    #[test]
    fn random_play_conserves_cards(
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<usize>(), 0..300),
    ) {
        let mut engine = RummyEngine::with_seed(seed);

        for choice in choices {
            match engine.state().phase {
                Phase::Finished => break,
                Phase::RoundOver => {
                    engine.new_round().unwrap();
                    continue;
                }
                _ => {}
            }

            let actions = engine.legal_actions();
            prop_assert!(!actions.is_empty());
            let action = actions[choice % actions.len()];
            match engine.apply(action) {
                Ok(()) | Err(EngineError::EmptyPile(_)) => {}
                Err(err) => prop_assert!(false, "legal action {action} rejected: {err}"),
            }

            let state = engine.state();
            prop_assert_eq!(state.check_invariants(engine.config()), Ok(()));
            let ids: FxHashSet<CardId> = state.all_card_ids().collect();
            prop_assert_eq!(ids.len(), 52);
        }
    }
}
