//! Greedy two-pass meld finder.
//!
//! Pass one takes sets first and then runs from what is left; pass two takes
//! runs first and then sets. Whichever leaves strictly less deadwood wins,
//! ties going to the sets-first pass.
//!
//! This is an approximation, not an exact cover. Known blind spots:
//! - a four-card set is always taken whole, even when lending one card to a
//!   run would be better
//! - a card usable by both a set and a run goes to whichever the pass
//!   visits first
//!
//! Knock/gin eligibility and AI thresholds are defined against this output,
//! so it must not be silently upgraded. Use `MeldStrategy::Exhaustive` for
//! an exact partition.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::{Meld, MeldKind, MeldResult, MIN_MELD};
use crate::core::{Card, CardId, Suit};

/// Best-effort partition of `hand` into melds and deadwood.
#[must_use]
pub fn find_melds(hand: &[Card]) -> MeldResult {
    let sets_first = partition(hand, Order::SetsFirst);
    let runs_first = partition(hand, Order::RunsFirst);

    if runs_first.deadwood_points < sets_first.deadwood_points {
        runs_first
    } else {
        sets_first
    }
}

/// Deadwood of `hand` is within `knock_limit` (10 under standard rules).
#[must_use]
pub fn can_knock(hand: &[Card], knock_limit: u32) -> bool {
    find_melds(hand).deadwood_points <= knock_limit
}

/// Every card of `hand` is melded.
#[must_use]
pub fn is_gin(hand: &[Card]) -> bool {
    find_melds(hand).deadwood_points == 0
}

#[derive(Clone, Copy)]
enum Order {
    SetsFirst,
    RunsFirst,
}

fn partition(hand: &[Card], order: Order) -> MeldResult {
    let mut used: FxHashSet<CardId> = FxHashSet::default();
    let mut melds = Vec::new();

    match order {
        Order::SetsFirst => {
            take_sets(hand, &mut used, &mut melds);
            take_runs(hand, &mut used, &mut melds);
        }
        Order::RunsFirst => {
            take_runs(hand, &mut used, &mut melds);
            take_sets(hand, &mut used, &mut melds);
        }
    }

    MeldResult::from_melds(hand, melds)
}

/// Commit every rank group of three or more unused cards as a set.
fn take_sets(hand: &[Card], used: &mut FxHashSet<CardId>, melds: &mut Vec<Meld>) {
    let mut by_rank: [SmallVec<[Card; 4]>; 13] = Default::default();
    for card in hand.iter().filter(|c| !used.contains(&c.id)) {
        by_rank[usize::from(card.rank.value() - 1)].push(*card);
    }

    for group in by_rank {
        if group.len() < MIN_MELD {
            continue;
        }
        let cards: SmallVec<[Card; 4]> = group.into_iter().take(4).collect();
        used.extend(cards.iter().map(|c| c.id));
        melds.push(Meld {
            kind: MeldKind::Set,
            cards,
        });
    }
}

/// Per suit, sort unused cards by rank and commit each maximal consecutive
/// stretch of three or more as a run.
fn take_runs(hand: &[Card], used: &mut FxHashSet<CardId>, melds: &mut Vec<Meld>) {
    for suit in Suit::ALL {
        let mut suited: SmallVec<[Card; 13]> = hand
            .iter()
            .filter(|c| c.suit == suit && !used.contains(&c.id))
            .copied()
            .collect();
        suited.sort_unstable_by_key(|c| c.rank);

        let mut run: SmallVec<[Card; 4]> = SmallVec::new();
        for card in suited {
            let extends = run
                .last()
                .is_some_and(|last| card.rank.value() == last.rank.value() + 1);
            if !extends {
                commit_run(&mut run, used, melds);
            }
            run.push(card);
        }
        commit_run(&mut run, used, melds);
    }
}

fn commit_run(run: &mut SmallVec<[Card; 4]>, used: &mut FxHashSet<CardId>, melds: &mut Vec<Meld>) {
    if run.len() >= MIN_MELD {
        used.extend(run.iter().map(|c| c.id));
        melds.push(Meld {
            kind: MeldKind::Run,
            cards: std::mem::take(run),
        });
    } else {
        run.clear();
    }
}
