//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Gin Rummy is strictly two-handed: `PlayerId(0)` is the primary (local)
//! player and `PlayerId(1)` the opponent.
//!
//! ## PlayerPair
//!
//! Fixed two-slot storage indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier, always 0 or 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    /// The primary player.
    pub const ZERO: PlayerId = PlayerId(0);
    /// The opponent.
    pub const ONE: PlayerId = PlayerId(1);

    /// Create a player ID, returning `None` outside 0..=1.
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if id < 2 {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both players, primary first.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [Self::ZERO, Self::ONE].into_iter()
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("player index {value} out of range"))
    }
}

impl From<PlayerId> for u8 {
    fn from(player: PlayerId) -> Self {
        player.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data for exactly two players.
///
/// ```
/// use gin_rummy::core::{PlayerId, PlayerPair};
///
/// let mut scores: PlayerPair<u32> = PlayerPair::default();
/// scores[PlayerId::ONE] += 25;
/// assert_eq!(scores.into_array(), [0, 25]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    data: [T; 2],
}

impl<T> PlayerPair<T> {
    /// Create from explicit values, primary player first.
    pub const fn new(first: T, second: T) -> Self {
        Self {
            data: [first, second],
        }
    }

    /// Create with values from a factory function.
    pub fn from_fn(factory: impl Fn(PlayerId) -> T) -> Self {
        Self::new(factory(PlayerId::ZERO), factory(PlayerId::ONE))
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::both().zip(self.data.iter())
    }

    /// Unwrap into a plain array.
    pub fn into_array(self) -> [T; 2] {
        self.data
    }
}

impl<T> Index<PlayerId> for PlayerPair<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerPair<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}
