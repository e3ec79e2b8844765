//! The 52-card deck and the opening deal.

use super::card::{Card, Rank, Suit};
use super::player::{PlayerId, PlayerPair};
use super::rng::GameRng;

/// Size of a standard deck.
pub const DECK_SIZE: usize = 52;

/// All 52 cards, face down, in canonical order.
#[must_use]
pub fn full_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(suit, rank)))
        .collect()
}

/// Sort a hand into canonical suit/rank order.
pub fn sort_hand(hand: &mut [Card]) {
    hand.sort_unstable();
}

/// Result of dealing a fresh shuffled deck.
#[derive(Clone, Debug)]
pub struct Deal {
    pub hands: PlayerPair<Vec<Card>>,
    pub discard_pile: Vec<Card>,
    pub draw_pile: Vec<Card>,
}

/// Shuffle a full deck and deal `hand_size` cards to each player.
///
/// Cards come off the top (end) of the shuffled deck alternately, `first`
/// receiving the first card. The next card starts the face-up discard pile
/// and the rest stays face down as the draw pile. Hands are sorted.
#[must_use]
pub fn deal(rng: &mut GameRng, hand_size: usize, first: PlayerId) -> Deal {
    let mut deck = full_deck();
    rng.shuffle(&mut deck);

    let mut hands: PlayerPair<Vec<Card>> =
        PlayerPair::from_fn(|_| Vec::with_capacity(hand_size + 1));
    let mut receiver = first;
    for _ in 0..hand_size * 2 {
        if let Some(card) = deck.pop() {
            hands[receiver].push(card.turned(true));
        }
        receiver = receiver.opponent();
    }

    for player in PlayerId::both() {
        sort_hand(&mut hands[player]);
    }

    let discard_pile = deck.pop().map(|c| vec![c.turned(true)]).unwrap_or_default();

    Deal {
        hands,
        discard_pile,
        draw_pile: deck,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_full_deck_unique() {
        let deck = full_deck();
        assert_eq!(deck.len(), DECK_SIZE);
        let ids: FxHashSet<_> = deck.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), DECK_SIZE);
        assert!(deck.iter().all(|c| !c.face_up));
    }

    #[test]
    fn test_deal_sizes() {
        let mut rng = GameRng::new(42);
        let deal = deal(&mut rng, 10, PlayerId::ZERO);

        assert_eq!(deal.hands[PlayerId::ZERO].len(), 10);
        assert_eq!(deal.hands[PlayerId::ONE].len(), 10);
        assert_eq!(deal.discard_pile.len(), 1);
        assert_eq!(deal.draw_pile.len(), 31);
    }

    #[test]
    fn test_deal_orientation_and_order() {
        let mut rng = GameRng::new(9);
        let deal = deal(&mut rng, 10, PlayerId::ONE);

        for (_, hand) in deal.hands.iter() {
            assert!(hand.iter().all(|c| c.face_up));
            assert!(hand.windows(2).all(|w| w[0] < w[1]));
        }
        assert!(deal.discard_pile[0].face_up);
        assert!(deal.draw_pile.iter().all(|c| !c.face_up));
    }

    #[test]
    fn test_deal_conserves_cards() {
        let mut rng = GameRng::new(3);
        let deal = deal(&mut rng, 10, PlayerId::ZERO);

        let mut ids: Vec<_> = deal
            .hands
            .iter()
            .flat_map(|(_, h)| h.iter())
            .chain(&deal.discard_pile)
            .chain(&deal.draw_pile)
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DECK_SIZE);
    }

    #[test]
    fn test_deal_is_seeded() {
        let a = deal(&mut GameRng::new(5), 10, PlayerId::ZERO);
        let b = deal(&mut GameRng::new(5), 10, PlayerId::ZERO);
        assert_eq!(a.hands, b.hands);
        assert_eq!(a.draw_pile, b.draw_pile);
    }
}
