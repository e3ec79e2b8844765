//! The Gin Rummy state machine.
//!
//! ```text
//!  Draw ──draw──▶ Discard ──discard──▶ Draw (other player)
//!                 │   ▲  ╲
//!        enter    │   │   ╲ discard completes gin ─▶ Gin ─▶ RoundOver | Finished
//!        knock    ▼   │ cancel
//!              KnockDiscard
//!                 │
//!                 └─knock with discard─▶ RoundOver | Finished
//! ```
//!
//! Every action validates phase and arguments before touching state, and a
//! rejected action leaves the round exactly as it was. Knocking is the one
//! speculative step: the discard is taken out of the hand, the remainder is
//! measured, and on failure the card goes back to its original index.
//!
//! Listeners are notified once per successful mutation.

use im::Vector;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::{
    deal, Action, ActionRecord, Card, CardId, ConfigError, EngineConfig, EngineError, GameRng,
    GameRngState, Phase, Pile, PlayerId, PlayerPair, RoundOutcome, RoundState,
};
use crate::melds::MeldResult;

use super::observer::{ListenerControl, ListenerId, Listeners};
use super::scoring::{describe, match_winner, score_round};

/// Final result of a finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: PlayerId,
    pub scores: PlayerPair<u32>,
    /// Rounds played, including the deciding one.
    pub rounds: u32,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner == player
    }

    /// Winner's lead over the loser.
    #[must_use]
    pub fn margin(&self) -> u32 {
        self.scores[self.winner].saturating_sub(self.scores[self.winner.opponent()])
    }
}

/// Gin Rummy rules engine owning one match.
#[derive(Debug)]
pub struct RummyEngine {
    config: EngineConfig,
    state: RoundState,
    rng: GameRng,
    listeners: Listeners,
    history: Vector<ActionRecord>,
}

impl RummyEngine {
    /// Create an engine and deal the first round.
    ///
    /// `rng` is the only source of randomness; the same seed and the same
    /// actions reproduce the same match.
    pub fn new(config: EngineConfig, rng: GameRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    /// Standard rules with a seeded RNG.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::build(EngineConfig::default(), GameRng::new(seed))
    }

    /// Resume from a snapshot, e.g. one received from a mirrored client.
    ///
    /// The state must satisfy every round invariant under `config`. History
    /// starts empty.
    pub fn from_state(
        config: EngineConfig,
        state: RoundState,
        rng: GameRng,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        state.check_invariants(&config)?;
        Ok(Self {
            config,
            state,
            rng,
            listeners: Listeners::new(),
            history: Vector::new(),
        })
    }

    fn build(config: EngineConfig, mut rng: GameRng) -> Self {
        let first = deal(&mut rng, config.hand_size, PlayerId::ZERO);
        let state = RoundState::from_deal(first, PlayerPair::default(), PlayerId::ZERO, 1);
        Self {
            config,
            state,
            rng,
            listeners: Listeners::new(),
            history: Vector::new(),
        }
    }

    // === Lifecycle ===

    /// Start a new match: fresh deal, scores reset, player 0 to move.
    pub fn initialize(&mut self) {
        let fresh = deal(&mut self.rng, self.config.hand_size, PlayerId::ZERO);
        self.state = RoundState::from_deal(fresh, PlayerPair::default(), PlayerId::ZERO, 1);
        self.history = Vector::new();
        info!("match started");
        self.notify();
    }

    /// Deal the next round, keeping cumulative scores.
    ///
    /// The player who did not score last round moves first; after a drawn
    /// round the previous starter moves first again.
    pub fn new_round(&mut self) -> Result<(), EngineError> {
        if self.state.phase != Phase::RoundOver {
            return Err(EngineError::WrongPhase {
                action: "start a new round",
                phase: self.state.phase,
            });
        }

        let starter = match self.state.outcome.as_ref().and_then(|o| o.awarded_to) {
            Some(scorer) => scorer.opponent(),
            None => self.state.starting_player,
        };
        let round_number = self.state.round_number + 1;
        let scores = self.state.scores.clone();

        let fresh = deal(&mut self.rng, self.config.hand_size, starter);
        self.state = RoundState::from_deal(fresh, scores, starter, round_number);
        info!("round {round_number} dealt, {starter} to move");
        self.notify();
        Ok(())
    }

    // === Read access ===

    /// Read-only view of the current state.
    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Every action applied this match, in order.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Position of the shuffle stream, for replay.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Match result once a player has reached the target score.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if self.state.phase != Phase::Finished {
            return None;
        }
        self.state.winner.map(|winner| GameResult {
            winner,
            scores: self.state.scores.clone(),
            rounds: self.state.round_number,
        })
    }

    /// Meld partition of a player's hand under the configured strategy.
    #[must_use]
    pub fn melds(&self, player: PlayerId) -> MeldResult {
        self.config.meld_strategy.find(&self.state.hands[player])
    }

    /// Whether some single discard from the active 11-card hand knocks.
    #[must_use]
    pub fn can_knock(&self) -> bool {
        self.best_knock_deadwood()
            .is_some_and(|deadwood| deadwood <= self.config.knock_limit)
    }

    /// Whether some single discard from the active 11-card hand is gin.
    #[must_use]
    pub fn is_gin(&self) -> bool {
        self.best_knock_deadwood() == Some(0)
    }

    /// Lowest deadwood reachable by discarding one card. `None` unless the
    /// active player holds a drawn card.
    fn best_knock_deadwood(&self) -> Option<u32> {
        if !self.state.phase.holding_drawn_card() {
            return None;
        }
        let hand = self.state.active_hand();
        (0..hand.len())
            .map(|i| self.deadwood_without(hand, i))
            .min()
    }

    fn deadwood_without(&self, hand: &[Card], index: usize) -> u32 {
        let mut rest = hand.to_vec();
        rest.remove(index);
        self.config.meld_strategy.deadwood(&rest)
    }

    /// Actions the active player may take now.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        match self.state.phase {
            Phase::Draw => {
                let mut actions = vec![Action::DrawFromPile];
                if !self.state.discard_pile.is_empty() {
                    actions.push(Action::DrawFromDiscard);
                }
                actions
            }
            Phase::Discard => {
                let mut actions: Vec<Action> = self
                    .state
                    .active_hand()
                    .iter()
                    .map(|c| Action::Discard(c.id))
                    .collect();
                let knocks = self.knock_discards();
                if !knocks.is_empty() {
                    actions.push(Action::EnterKnock);
                    actions.extend(knocks);
                }
                actions
            }
            Phase::KnockDiscard => {
                let mut actions = vec![Action::CancelKnock];
                actions.extend(self.knock_discards());
                actions
            }
            Phase::Gin | Phase::RoundOver | Phase::Finished => Vec::new(),
        }
    }

    fn knock_discards(&self) -> Vec<Action> {
        let hand = self.state.active_hand();
        (0..hand.len())
            .filter(|&i| self.deadwood_without(hand, i) <= self.config.knock_limit)
            .map(|i| Action::KnockWithDiscard(hand[i].id))
            .collect()
    }

    // === Subscriptions ===

    /// Register a state-change listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&RoundState) -> ListenerControl + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // === Actions ===

    /// Apply an action for whoever is active.
    pub fn apply(&mut self, action: Action) -> Result<(), EngineError> {
        match action {
            Action::DrawFromPile => self.draw_from_pile(),
            Action::DrawFromDiscard => self.draw_from_discard(),
            Action::Discard(card) => self.discard(card),
            Action::EnterKnock => self.enter_knock_phase(),
            Action::CancelKnock => self.cancel_knock(),
            Action::KnockWithDiscard(card) => self.knock_with_discard(card),
        }
    }

    /// Apply an action on behalf of `player`, rejecting out-of-turn moves.
    pub fn apply_as(&mut self, player: PlayerId, action: Action) -> Result<(), EngineError> {
        if player != self.state.current_player {
            return Err(EngineError::NotYourTurn(player));
        }
        self.apply(action)
    }

    /// Take the top of the draw pile.
    ///
    /// With an empty draw pile the round ends as a draw: the state moves to
    /// `RoundOver`, listeners are notified, and `EmptyPile` is returned.
    pub fn draw_from_pile(&mut self) -> Result<(), EngineError> {
        let action = Action::DrawFromPile;
        let player = self.require_phase(action, &[Phase::Draw])?;

        let Some(card) = self.state.draw_pile.pop() else {
            self.state.phase = Phase::RoundOver;
            self.state.outcome = Some(RoundOutcome::drawn());
            self.state.round_result = self.state.outcome.as_ref().map(describe);
            self.state.last_action = format!("{player} found the draw pile empty");
            info!("round {} drawn: stock exhausted", self.state.round_number);
            self.commit(player, action);
            return Err(EngineError::EmptyPile(Pile::Draw));
        };

        self.state.hands[player].push(card.turned(true));
        self.state.phase = Phase::Discard;
        self.state.last_action = format!("{player} drew from the draw pile");
        self.commit(player, action);
        Ok(())
    }

    /// Take the top of the discard pile.
    pub fn draw_from_discard(&mut self) -> Result<(), EngineError> {
        let action = Action::DrawFromDiscard;
        let player = self.require_phase(action, &[Phase::Draw])?;

        let card = self
            .state
            .discard_pile
            .pop()
            .ok_or(EngineError::EmptyPile(Pile::Discard))?;

        self.state.hands[player].push(card);
        self.state.phase = Phase::Discard;
        self.state.last_action = format!("{player} took {} from the discard pile", card.id);
        self.commit(player, action);
        Ok(())
    }

    /// Discard a card, ending the turn. A discard that leaves a gin hand
    /// ends the round.
    pub fn discard(&mut self, card: CardId) -> Result<(), EngineError> {
        let action = Action::Discard(card);
        let player = self.require_phase(action, &[Phase::Discard])?;
        let index = self
            .state
            .position_in_hand(player, card)
            .ok_or(EngineError::CardNotFound(card))?;

        let discarded = self.state.hands[player].remove(index);
        self.state.discard_pile.push(discarded.turned(true));
        self.state.last_action = format!("{player} discarded {card}");

        if self.config.meld_strategy.deadwood(&self.state.hands[player]) == 0 {
            self.state.phase = Phase::Gin;
            self.resolve_round(player, true);
        } else {
            self.state.current_player = player.opponent();
            self.state.phase = Phase::Draw;
        }

        self.commit(player, action);
        Ok(())
    }

    /// Announce a knock. The knocking discard must follow.
    pub fn enter_knock_phase(&mut self) -> Result<(), EngineError> {
        let action = Action::EnterKnock;
        let player = self.require_phase(action, &[Phase::Discard])?;

        self.state.phase = Phase::KnockDiscard;
        self.state.last_action = format!("{player} is knocking");
        self.commit(player, action);
        Ok(())
    }

    /// Withdraw a knock announcement.
    pub fn cancel_knock(&mut self) -> Result<(), EngineError> {
        let action = Action::CancelKnock;
        let player = self.require_phase(action, &[Phase::KnockDiscard])?;

        self.state.phase = Phase::Discard;
        self.state.last_action = format!("{player} cancelled the knock");
        self.commit(player, action);
        Ok(())
    }

    /// Discard `card` and knock.
    ///
    /// Fails with `InvalidKnock` if the remaining hand has more deadwood
    /// than the knock limit; the hand, discard pile and phase are then
    /// exactly as before the call.
    pub fn knock_with_discard(&mut self, card: CardId) -> Result<(), EngineError> {
        let action = Action::KnockWithDiscard(card);
        let player = self.require_phase(action, &[Phase::Discard, Phase::KnockDiscard])?;
        let index = self
            .state
            .position_in_hand(player, card)
            .ok_or(EngineError::CardNotFound(card))?;

        let removed = self.state.hands[player].remove(index);
        let deadwood = self.config.meld_strategy.deadwood(&self.state.hands[player]);
        if deadwood > self.config.knock_limit {
            self.state.hands[player].insert(index, removed);
            warn!("{player} tried to knock with {deadwood} deadwood by discarding {card}");
            return Err(EngineError::InvalidKnock {
                deadwood,
                limit: self.config.knock_limit,
            });
        }

        self.state.discard_pile.push(removed.turned(true));
        self.state.last_action = if deadwood == 0 {
            format!("{player} discarded {card} and went gin")
        } else {
            format!("{player} discarded {card} and knocked with {deadwood}")
        };
        self.resolve_round(player, deadwood == 0);
        self.commit(player, action);
        Ok(())
    }

    // === Internals ===

    fn require_phase(&self, action: Action, allowed: &[Phase]) -> Result<PlayerId, EngineError> {
        if allowed.contains(&self.state.phase) {
            Ok(self.state.current_player)
        } else {
            Err(EngineError::WrongPhase {
                action: action.name(),
                phase: self.state.phase,
            })
        }
    }

    /// Score the round ended by `knocker` and move to `RoundOver` or
    /// `Finished`.
    fn resolve_round(&mut self, knocker: PlayerId, gin: bool) {
        let strategy = self.config.meld_strategy;
        let knocker_deadwood = strategy.deadwood(&self.state.hands[knocker]);
        let opponent_deadwood = strategy.deadwood(&self.state.hands[knocker.opponent()]);

        let outcome = score_round(knocker, knocker_deadwood, opponent_deadwood, gin, &self.config);
        if let Some(scorer) = outcome.awarded_to {
            self.state.scores[scorer] += outcome.points;
        }

        let summary = describe(&outcome);
        info!("round {}: {summary}", self.state.round_number);
        self.state.knocker = Some(knocker);
        self.state.round_result = Some(summary);
        self.state.outcome = Some(outcome);

        match match_winner(&self.state.scores, self.config.target_score) {
            Some(winner) => {
                self.state.phase = Phase::Finished;
                self.state.winner = Some(winner);
                info!(
                    "match over: {winner} wins {} to {}",
                    self.state.scores[winner],
                    self.state.scores[winner.opponent()]
                );
            }
            None => self.state.phase = Phase::RoundOver,
        }
    }

    fn commit(&mut self, player: PlayerId, action: Action) {
        debug!("{player}: {action} -> {} phase", self.state.phase);
        debug_assert_eq!(self.state.check_invariants(&self.config), Ok(()));

        self.history.push_back(ActionRecord {
            player,
            action,
            round: self.state.round_number,
            sequence: self.history.len() as u32,
        });
        self.notify();
    }

    fn notify(&mut self) {
        self.listeners.notify(&self.state);
    }
}
