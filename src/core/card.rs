//! Card model: suits, ranks and dealt card values.
//!
//! A `Card` is identified by its `CardId`, a compact stable identity derived
//! from suit and rank. Equality, hashing and ordering all go through the id,
//! never through the mutable `face_up` flag.
//!
//! ```
//! use gin_rummy::core::{Card, CardId, Rank, Suit};
//!
//! let card = Card::new(Suit::Hearts, Rank::Seven);
//! assert_eq!(card.id.to_string(), "7H");
//! assert_eq!("7H".parse::<CardId>().unwrap(), card.id);
//! assert_eq!(card.points(), 7);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card suit, in canonical sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    /// All suits in canonical order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// 0-based position in canonical order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-letter code used in card ids.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }

    fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'C' => Some(Suit::Clubs),
            'D' => Some(Suit::Diamonds),
            'H' => Some(Suit::Hearts),
            'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Card rank. Aces are always low.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// All ranks, ace first.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Sequence value used for runs (A = 1 .. K = 13).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Rank for a sequence value, if in 1..=13.
    #[must_use]
    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value).checked_sub(1)?).copied()
    }

    /// Deadwood point value: face value, capped at 10 for court cards.
    #[must_use]
    pub const fn points(self) -> u32 {
        let v = self as u32;
        if v > 10 {
            10
        } else {
            v
        }
    }

    /// Short code used in card ids.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.code().eq_ignore_ascii_case(code))
    }
}

/// Stable card identity.
///
/// Ids run 0..52 in canonical order (suit-major, then rank), so sorting by
/// id is the canonical hand order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl CardId {
    /// Number of distinct ids in a standard deck.
    pub const COUNT: usize = 52;

    /// Id for a suit/rank pair.
    #[must_use]
    pub const fn of(suit: Suit, rank: Rank) -> Self {
        Self(suit as u8 * 13 + (rank as u8 - 1))
    }

    /// The suit encoded in this id.
    #[must_use]
    pub const fn suit(self) -> Suit {
        Suit::ALL[(self.0 / 13) as usize % 4]
    }

    /// The rank encoded in this id.
    #[must_use]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 % 13) as usize]
    }

    /// Index into a 52-slot table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().code(), self.suit().code())
    }
}

/// Failure to parse a card id string such as `"10H"`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid card id {0:?}")]
pub struct ParseCardIdError(pub String);

impl FromStr for CardId {
    type Err = ParseCardIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCardIdError(s.to_string());
        let suit_code = s.chars().last().ok_or_else(err)?;
        let suit = Suit::from_code(suit_code).ok_or_else(err)?;
        let rank = Rank::from_code(&s[..s.len() - suit_code.len_utf8()]).ok_or_else(err)?;
        Ok(CardId::of(suit, rank))
    }
}

/// A dealt card.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    pub face_up: bool,
    pub id: CardId,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self {
            suit,
            rank,
            face_up: false,
            id: CardId::of(suit, rank),
        }
    }

    /// Rebuild the card for an id.
    #[must_use]
    pub const fn from_id(id: CardId) -> Self {
        Self::new(id.suit(), id.rank())
    }

    /// Deadwood point value.
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.rank.points()
    }

    /// Copy of this card with the given orientation.
    #[must_use]
    pub fn turned(mut self, face_up: bool) -> Self {
        self.face_up = face_up;
        self
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

/// Parse a whitespace-separated list of card ids into face-up cards.
///
/// Convenience for tests and tooling: `parse_cards("3C 4C 5C")`.
pub fn parse_cards(text: &str) -> Result<Vec<Card>, ParseCardIdError> {
    text.split_whitespace()
        .map(|code| code.parse::<CardId>().map(|id| Card::from_id(id).turned(true)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_points() {
        assert_eq!(Rank::Ace.points(), 1);
        assert_eq!(Rank::Nine.points(), 9);
        assert_eq!(Rank::Ten.points(), 10);
        assert_eq!(Rank::Jack.points(), 10);
        assert_eq!(Rank::King.points(), 10);
    }

    #[test]
    fn test_rank_from_value() {
        assert_eq!(Rank::from_value(1), Some(Rank::Ace));
        assert_eq!(Rank::from_value(13), Some(Rank::King));
        assert_eq!(Rank::from_value(0), None);
        assert_eq!(Rank::from_value(14), None);
    }

    #[test]
    fn test_card_id_roundtrip_all() {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                let id = CardId::of(suit, rank);
                assert_eq!(id.suit(), suit);
                assert_eq!(id.rank(), rank);
                assert_eq!(id.to_string().parse::<CardId>(), Ok(id));
            }
        }
    }

    #[test]
    fn test_card_id_parse() {
        assert_eq!("10h".parse::<CardId>(), Ok(CardId::of(Suit::Hearts, Rank::Ten)));
        assert_eq!("AS".parse::<CardId>(), Ok(CardId::of(Suit::Spades, Rank::Ace)));
        assert!("1H".parse::<CardId>().is_err());
        assert!("7X".parse::<CardId>().is_err());
        assert!("".parse::<CardId>().is_err());
    }

    #[test]
    fn test_card_equality_ignores_orientation() {
        let down = Card::new(Suit::Clubs, Rank::Queen);
        let up = down.turned(true);
        assert_eq!(down, up);
        assert_ne!(down, Card::new(Suit::Spades, Rank::Queen));
    }

    #[test]
    fn test_canonical_order() {
        let mut cards = parse_cards("KS 2C AH 3C").unwrap();
        cards.sort();
        let ids: Vec<_> = cards.iter().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["2C", "3C", "AH", "KS"]);
    }
}
