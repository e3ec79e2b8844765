//! Exact minimum-deadwood partition.
//!
//! Enumerates every candidate set (each 3-subset of a rank group plus the
//! full 4-set) and every run segment of length three or more, then searches
//! for the cover with the lowest deadwood. Hands are addressed by bitmask,
//! so this handles up to 64 cards; larger inputs fall back to the greedy
//! finder.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::finder::find_melds;
use super::{Meld, MeldKind, MeldResult, MIN_MELD};
use crate::core::{Card, Suit};

type Mask = u64;

#[derive(Clone, Copy, Debug)]
struct Candidate {
    mask: Mask,
    kind: MeldKind,
}

/// Partition `hand` with the lowest achievable deadwood.
#[must_use]
pub fn find_melds_exhaustive(hand: &[Card]) -> MeldResult {
    if hand.len() > Mask::BITS as usize {
        return find_melds(hand);
    }

    let mut search = Search::new(hand);
    let full: Mask = if hand.is_empty() {
        0
    } else {
        Mask::MAX >> (Mask::BITS as usize - hand.len())
    };
    search.best(full);

    let melds = search
        .reconstruct(full)
        .into_iter()
        .map(|c| search.to_meld(c))
        .collect();
    MeldResult::from_melds(hand, melds)
}

struct Search<'a> {
    hand: &'a [Card],
    /// Candidates containing each card index.
    by_card: Vec<Vec<Candidate>>,
    memo: FxHashMap<Mask, u32>,
}

impl<'a> Search<'a> {
    fn new(hand: &'a [Card]) -> Self {
        let mut by_card = vec![Vec::new(); hand.len()];
        for candidate in candidates(hand) {
            for (i, slot) in by_card.iter_mut().enumerate() {
                if candidate.mask & (1 << i) != 0 {
                    slot.push(candidate);
                }
            }
        }
        Self {
            hand,
            by_card,
            memo: FxHashMap::default(),
        }
    }

    /// Minimum deadwood over the cards in `remaining`.
    fn best(&mut self, remaining: Mask) -> u32 {
        if remaining == 0 {
            return 0;
        }
        if let Some(&points) = self.memo.get(&remaining) {
            return points;
        }

        let i = remaining.trailing_zeros() as usize;
        let mut best = self.hand[i].points() + self.best(remaining & !(1 << i));
        for k in 0..self.by_card[i].len() {
            let candidate = self.by_card[i][k];
            if candidate.mask & remaining == candidate.mask {
                best = best.min(self.best(remaining & !candidate.mask));
            }
        }

        self.memo.insert(remaining, best);
        best
    }

    /// Walk the memo table to recover one optimal cover.
    fn reconstruct(&mut self, mut remaining: Mask) -> Vec<Candidate> {
        let mut chosen = Vec::new();
        while remaining != 0 {
            let target = self.best(remaining);
            let i = remaining.trailing_zeros() as usize;
            let without = remaining & !(1 << i);
            if self.hand[i].points() + self.best(without) == target {
                remaining = without;
                continue;
            }
            let pick = self.by_card[i]
                .clone()
                .into_iter()
                .find(|c| c.mask & remaining == c.mask && self.best(remaining & !c.mask) == target);
            match pick {
                Some(candidate) => {
                    chosen.push(candidate);
                    remaining &= !candidate.mask;
                }
                None => remaining = without,
            }
        }
        chosen
    }

    fn to_meld(&self, candidate: Candidate) -> Meld {
        let mut cards: SmallVec<[Card; 4]> = (0..self.hand.len())
            .filter(|i| candidate.mask & (1 << i) != 0)
            .map(|i| self.hand[i])
            .collect();
        if candidate.kind == MeldKind::Run {
            cards.sort_unstable_by_key(|c| c.rank);
        }
        Meld {
            kind: candidate.kind,
            cards,
        }
    }
}

fn candidates(hand: &[Card]) -> Vec<Candidate> {
    let mut out = Vec::new();

    let mut by_rank: [SmallVec<[usize; 4]>; 13] = Default::default();
    for (i, card) in hand.iter().enumerate() {
        by_rank[usize::from(card.rank.value() - 1)].push(i);
    }
    for group in &by_rank {
        if group.len() < MIN_MELD {
            continue;
        }
        let full: Mask = group.iter().fold(0, |m, &i| m | (1 << i));
        out.push(Candidate {
            mask: full,
            kind: MeldKind::Set,
        });
        if group.len() == 4 {
            for &skip in group {
                out.push(Candidate {
                    mask: full & !(1 << skip),
                    kind: MeldKind::Set,
                });
            }
        }
    }

    for suit in Suit::ALL {
        let mut suited: SmallVec<[usize; 13]> =
            (0..hand.len()).filter(|&i| hand[i].suit == suit).collect();
        suited.sort_unstable_by_key(|&i| hand[i].rank);

        let mut start = 0;
        while start < suited.len() {
            let mut end = start + 1;
            while end < suited.len()
                && hand[suited[end]].rank.value() == hand[suited[end - 1]].rank.value() + 1
            {
                end += 1;
            }
            // Every sub-segment of the stretch suited[start..end].
            for lo in start..end {
                for hi in (lo + MIN_MELD)..=end {
                    let mask = suited[lo..hi].iter().fold(0, |m, &i| m | (1 << i));
                    out.push(Candidate {
                        mask,
                        kind: MeldKind::Run,
                    });
                }
            }
            start = end;
        }
    }

    out
}
