//! Meld detection.
//!
//! Partitions a hand into sets, runs and leftover deadwood.
//!
//! - `finder`: the two-pass greedy heuristic. This is the default, and the
//!   AI thresholds are tuned against its output.
//! - `exhaustive`: exact minimum-deadwood search, opt-in via
//!   [`MeldStrategy::Exhaustive`].
//!
//! ```
//! use gin_rummy::core::parse_cards;
//! use gin_rummy::melds::find_melds;
//!
//! let hand = parse_cards("3C 4C 5C 7D 7H 7S KS 2D 9H QC").unwrap();
//! let result = find_melds(&hand);
//! assert_eq!(result.melds.len(), 2);
//! assert_eq!(result.deadwood_points, 31);
//! ```

pub mod exhaustive;
pub mod finder;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Card, CardId};

pub use exhaustive::find_melds_exhaustive;
pub use finder::{can_knock, find_melds, is_gin};

/// Minimum cards in any meld.
pub const MIN_MELD: usize = 3;

/// Kind of meld.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    /// 3-4 cards of one rank.
    Set,
    /// 3+ consecutive cards of one suit, ace low.
    Run,
}

/// A set or run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub kind: MeldKind,
    pub cards: SmallVec<[Card; 4]>,
}

impl Meld {
    /// Whether `cards` form a legal meld of `kind`.
    #[must_use]
    pub fn is_valid(kind: MeldKind, cards: &[Card]) -> bool {
        if cards.len() < MIN_MELD {
            return false;
        }
        match kind {
            MeldKind::Set => cards.len() <= 4 && cards.iter().all(|c| c.rank == cards[0].rank),
            MeldKind::Run => {
                cards.iter().all(|c| c.suit == cards[0].suit)
                    && cards
                        .windows(2)
                        .all(|w| w[1].rank.value() == w[0].rank.value() + 1)
            }
        }
    }

    /// Point value the meld removes from deadwood.
    #[must_use]
    pub fn points(&self) -> u32 {
        self.cards.iter().map(Card::points).sum()
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|c| c.id == id)
    }
}

/// Partition of a hand into melds and deadwood.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeldResult {
    pub melds: Vec<Meld>,
    /// Unmelded cards, in hand order.
    pub deadwood: Vec<Card>,
    pub deadwood_points: u32,
}

impl MeldResult {
    /// Build a result from chosen melds; everything else in `hand` is deadwood.
    #[must_use]
    pub fn from_melds(hand: &[Card], melds: Vec<Meld>) -> Self {
        let deadwood: Vec<Card> = hand
            .iter()
            .filter(|c| !melds.iter().any(|m| m.contains(c.id)))
            .copied()
            .collect();
        let deadwood_points = deadwood_points(&deadwood);
        Self {
            melds,
            deadwood,
            deadwood_points,
        }
    }

    /// Whether a card was assigned to a meld.
    #[must_use]
    pub fn is_melded(&self, id: CardId) -> bool {
        self.melds.iter().any(|m| m.contains(id))
    }

    /// Cards assigned to melds, in meld order.
    pub fn melded_cards(&self) -> impl Iterator<Item = &Card> {
        self.melds.iter().flat_map(|m| m.cards.iter())
    }
}

/// Sum of card point values.
#[must_use]
pub fn deadwood_points(cards: &[Card]) -> u32 {
    cards.iter().map(Card::points).sum()
}

/// Selectable meld partitioning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldStrategy {
    /// Two greedy passes (sets-first, runs-first), lower deadwood wins.
    #[default]
    Greedy,
    /// Exact search for minimum deadwood.
    Exhaustive,
}

impl MeldStrategy {
    /// Partition `hand` with this strategy.
    #[must_use]
    pub fn find(self, hand: &[Card]) -> MeldResult {
        match self {
            MeldStrategy::Greedy => find_melds(hand),
            MeldStrategy::Exhaustive => find_melds_exhaustive(hand),
        }
    }

    /// Deadwood of `hand` under this strategy.
    #[must_use]
    pub fn deadwood(self, hand: &[Card]) -> u32 {
        self.find(hand).deadwood_points
    }
}
