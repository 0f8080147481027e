//! Poker variant definitions, acting as factories for `State`.
//!
//! A variant is plain data: how many hole cards each player gets, how the
//! board is dealt street by street, and how big a bet may be. The only
//! behaviour a variant does not describe is hand strength, which is injected
//! as a [`HandRanking`].

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::error::ConfigError;
use crate::ranking::HandRanking;
use crate::state::{State, StateBuilder};
use crate::utilities::{Card, Chips};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Serialize)]
pub enum BettingStructure {
    #[strum(serialize = "Pot-limit")]
    PotLimit,
    #[strum(serialize = "No-limit")]
    NoLimit,
}

impl BettingStructure {
    /// The largest wager the actor may put in now.
    ///
    /// Pot-limit allows calling and then raising by the resulting pot,
    /// `2 × amount_to_call + pot`. Both structures are capped by the stack.
    pub fn max_bet(self, stack: Chips, amount_to_call: Chips, pot_total: Chips) -> Chips {
        match self {
            BettingStructure::NoLimit => stack,
            BettingStructure::PotLimit => (2 * amount_to_call + pot_total).min(stack),
        }
    }
}

/// Represents a single street (betting round) in a poker game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Street {
    pub name: &'static str,
    pub board_dealing_count: usize,
}

impl Street {
    pub const fn new(name: &'static str, board_dealing_count: usize) -> Self {
        Self { name, board_dealing_count }
    }
}

/// Preflop, flop, turn and river.
pub const COMMUNITY_STREETS: [Street; 4] = [
    Street::new("preflop", 0),
    Street::new("flop", 3),
    Street::new("turn", 1),
    Street::new("river", 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub name: &'static str,
    pub hole_card_count: usize,
    pub betting_structure: BettingStructure,
    pub streets: &'static [Street],
}

impl Variant {
    /// The street index at which the hand goes to showdown.
    pub fn showdown_street(&self) -> usize {
        self.streets.len()
    }

    pub fn street_name(&self, street: usize) -> &'static str {
        self.streets.get(street).map_or("showdown", |s| s.name)
    }

    /// Cards on a complete board.
    pub fn board_card_count(&self) -> usize {
        self.streets.iter().map(|s| s.board_dealing_count).sum()
    }

    /// Cards on the board once `street` has been dealt.
    pub fn board_cards_through(&self, street: usize) -> usize {
        self.streets
            .iter()
            .take(street + 1)
            .map(|s| s.board_dealing_count)
            .sum()
    }

    /// The first player to act on `street`.
    ///
    /// Preflop that is the button heads-up (seat 1) and under the gun
    /// otherwise (seat 2); after the flop it is the lowest seat. Players for
    /// whom `can_act` is false are skipped in seat order.
    pub fn starting_actor(
        &self,
        street: usize,
        player_count: usize,
        can_act: impl Fn(usize) -> bool,
    ) -> Option<usize> {
        let first = match (street, player_count) {
            (0, 2) => 1,
            (0, n) => 2 % n,
            _ => 0,
        };
        (0..player_count)
            .map(|offset| (first + offset) % player_count)
            .find(|&player| can_act(player))
    }

    pub fn max_bet(&self, stack: Chips, amount_to_call: Chips, pot_total: Chips) -> Chips {
        self.betting_structure.max_bet(stack, amount_to_call, pot_total)
    }
}

macro_rules! community_variant {
    ($(#[$meta:meta])* $game:ident, $name:expr, $hole_card_count:expr, $structure:expr) => {
        $(#[$meta])*
        pub struct $game;

        impl $game {
            pub const VARIANT: Variant = Variant {
                name: $name,
                hole_card_count: $hole_card_count,
                betting_structure: $structure,
                streets: &COMMUNITY_STREETS,
            };

            /// A builder preset for this variant; everything else is configured on it.
            pub fn builder(player_count: usize) -> StateBuilder {
                StateBuilder::new(Self::VARIANT, player_count)
            }

            pub fn create_state(
                ante: Chips,
                blinds: Vec<Chips>,
                starting_stacks: Vec<Chips>,
                hands: Vec<Vec<Card>>,
                deck: Vec<Card>,
                ranking: impl HandRanking + 'static,
            ) -> Result<State, ConfigError> {
                Self::builder(starting_stacks.len())
                    .ante(ante)
                    .blinds(blinds)
                    .starting_stacks(starting_stacks)
                    .hands(hands)
                    .deck(deck)
                    .ranking(ranking)
                    .build()
            }
        }
    };
}

community_variant!(
    /// No-limit Texas hold'em.
    NoLimitTexasHoldem, "NLHE", 2, BettingStructure::NoLimit
);
community_variant!(
    /// No-limit Omaha hold'em.
    NoLimitOmahaHoldem, "NLO", 4, BettingStructure::NoLimit
);
community_variant!(
    /// Pot-limit Omaha hold'em.
    PotLimitOmahaHoldem, "PLO", 4, BettingStructure::PotLimit
);
