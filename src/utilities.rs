//! Helper types and functions shared across the engine.
//!
//! The card types here only exist so that hands, boards and decks can be
//! carried around, printed and serialized. Nothing in this module knows how
//! strong a hand is; that is the job of a [`crate::ranking::HandRanking`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{Display, EnumIter, EnumString};

/// Chip amounts. Every quantity of money in the engine is a whole number of chips.
pub type Chips = i64;

/// Represents the rank of a card.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, EnumString, EnumIter, Display)]
pub enum Rank {
    #[strum(serialize = "2")]
    Deuce,
    #[strum(serialize = "3")]
    Trey,
    #[strum(serialize = "4")]
    Four,
    #[strum(serialize = "5")]
    Five,
    #[strum(serialize = "6")]
    Six,
    #[strum(serialize = "7")]
    Seven,
    #[strum(serialize = "8")]
    Eight,
    #[strum(serialize = "9")]
    Nine,
    #[strum(serialize = "T")]
    Ten,
    #[strum(serialize = "J")]
    Jack,
    #[strum(serialize = "Q")]
    Queen,
    #[strum(serialize = "K")]
    King,
    #[strum(serialize = "A")]
    Ace,
}

/// Represents the suit of a card.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, EnumString, EnumIter, Display)]
pub enum Suit {
    #[strum(serialize = "c")]
    Club,
    #[strum(serialize = "d")]
    Diamond,
    #[strum(serialize = "h")]
    Heart,
    #[strum(serialize = "s")]
    Spade,
}

/// Represents a playing card with a rank and a suit.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Parses a run of cards such as `"AsKs"`, `"As Ks"` or `"10h, 9h"`.
    pub fn parse_cards(s: &str) -> Result<Vec<Card>, String> {
        let s = s.replace("10", "T").replace(',', " ");
        let mut cards = Vec::new();
        for content in s.split_whitespace() {
            let chars: Vec<char> = content.chars().collect();
            if chars.len() % 2 != 0 {
                return Err(format!(
                    "The length of a card string must be a multiple of 2, but got '{}'",
                    content
                ));
            }
            for pair in chars.chunks(2) {
                let rank = Rank::from_str(&pair[0].to_string())
                    .map_err(|_| format!("Invalid rank: '{}'", pair[0]))?;
                let suit = Suit::from_str(&pair[1].to_string())
                    .map_err(|_| format!("Invalid suit: '{}'", pair[1]))?;
                cards.push(Card::new(rank, suit));
            }
        }
        Ok(cards)
    }

    /// Formats a slice of cards without separators, e.g. `AsKs`.
    pub fn join(cards: &[Card]) -> String {
        cards.iter().join("")
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Card::parse_cards(s)?.as_slice() {
            [card] => Ok(*card),
            _ => Err(format!("Expected a single card, got '{}'", s)),
        }
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Card::from_str(&raw).map_err(D::Error::custom)
    }
}

/// Represents a deck of cards.
pub struct Deck;

impl Deck {
    /// The 52 standard cards, deuces first.
    pub fn standard() -> Vec<Card> {
        use strum::IntoEnumIterator;

        Rank::iter()
            .cartesian_product(Suit::iter())
            .map(|(rank, suit)| Card::new(rank, suit))
            .collect()
    }

    /// The standard deck minus every card in `used`.
    pub fn excluding(used: &[Card]) -> Vec<Card> {
        Self::standard()
            .into_iter()
            .filter(|card| !used.contains(card))
            .collect()
    }
}

/// "Cleans" a sparse map of per-player values into a vector of a fixed size.
pub fn clean_values(values: &BTreeMap<usize, Chips>, count: usize) -> Vec<Chips> {
    let mut cleaned = vec![0; count];
    for (&k, &v) in values {
        if k < count {
            cleaned[k] = v;
        }
    }
    cleaned
}

pub fn shuffled<T: Clone>(values: &[T]) -> Vec<T> {
    shuffled_with(values, &mut thread_rng())
}

/// Like [`shuffled`], with a caller-supplied source of randomness.
pub fn shuffled_with<T: Clone, R: Rng + ?Sized>(values: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled_values = values.to_vec();
    shuffled_values.shuffle(rng);
    shuffled_values
}

/// Integer division with remainder. The divisor must be positive.
pub fn div_mod(dividend: Chips, divisor: Chips) -> (Chips, Chips) {
    (dividend.div_euclid(divisor), dividend.rem_euclid(divisor))
}

/// Successive differences of an ascending sequence: `[10, 20, 20, 45]`
/// becomes `[10, 10, 0, 25]`.
pub fn inverse_cumulative_sum(sorted: &[Chips]) -> Vec<Chips> {
    let mut previous = 0;
    sorted
        .iter()
        .map(|&value| {
            let increment = value - previous;
            previous = value;
            increment
        })
        .collect()
}
