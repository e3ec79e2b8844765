//! Engine configuration.
//!
//! `EngineConfig::default()` is standard two-player Gin Rummy: ten-card
//! hands, knock on 10 or less, 25-point gin and undercut bonuses, game to 100.
//! Hosts may load a config from any serde format and call `validate()`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::deck::DECK_SIZE;
use crate::melds::MeldStrategy;

/// Rejected configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("target score must be positive")]
    ZeroTarget,
    #[error("hand size {0} cannot be dealt from a 52-card deck")]
    HandTooLarge(usize),
    #[error("hand size must be positive")]
    EmptyHand,
}

/// Rules constants for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cumulative score that ends the match.
    pub target_score: u32,

    /// Highest deadwood total allowed when knocking.
    pub knock_limit: u32,

    /// Bonus awarded on top of the opponent's deadwood for going gin.
    pub gin_bonus: u32,

    /// Bonus awarded to the defender when a knock is undercut.
    pub undercut_bonus: u32,

    /// Cards dealt to each player.
    pub hand_size: usize,

    /// Meld partitioning used for knock, gin and scoring decisions.
    pub meld_strategy: MeldStrategy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_score: 100,
            knock_limit: 10,
            gin_bonus: 25,
            undercut_bonus: 25,
            hand_size: 10,
            meld_strategy: MeldStrategy::Greedy,
        }
    }
}

impl EngineConfig {
    /// Standard rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_target_score(mut self, target: u32) -> Self {
        self.target_score = target;
        self
    }

    #[must_use]
    pub fn with_knock_limit(mut self, limit: u32) -> Self {
        self.knock_limit = limit;
        self
    }

    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    #[must_use]
    pub fn with_meld_strategy(mut self, strategy: MeldStrategy) -> Self {
        self.meld_strategy = strategy;
        self
    }

    /// Check that a match can be played with these settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_score == 0 {
            return Err(ConfigError::ZeroTarget);
        }
        if self.hand_size == 0 {
            return Err(ConfigError::EmptyHand);
        }
        // Both hands, one upcard and one card to draw.
        let needed = self.hand_size.checked_mul(2).and_then(|n| n.checked_add(2));
        if needed.is_none_or(|n| n > DECK_SIZE) {
            return Err(ConfigError::HandTooLarge(self.hand_size));
        }
        Ok(())
    }
}
