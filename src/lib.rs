//! A variant-agnostic poker betting engine.
//!
//! A [`State`] enforces turn order and legal bet sizing for one hand, decides
//! when each street's betting is over and, at showdown, splits the pot into
//! side pots, chops ties, takes rake and averages all-in runouts. Variants
//! only contribute data ([`Variant`]); who wins a showdown is answered by an
//! injected [`HandRanking`].
//!
//! ```
//! use pokerkit::{ActionKind, Card, NoLimitTexasHoldem, StrengthRanking};
//!
//! let hands = ["AsAd", "KsKd"].iter().map(|h| Card::parse_cards(h).unwrap()).collect();
//! let mut state = NoLimitTexasHoldem::builder(2)
//!     .blinds(vec![2, 1])
//!     .starting_stacks(vec![100, 100])
//!     .hands(hands)
//!     .deck(Card::parse_cards("2c7d9hJc3s").unwrap())
//!     .ranking(StrengthRanking::new(|_board: &[Card], hole: &[Card]| hole[0].rank))
//!     .build()
//!     .unwrap();
//!
//! state.act(1, ActionKind::Raise, Some(99)).unwrap();
//! state.act(0, ActionKind::Call, None).unwrap();
//! assert!(state.is_complete());
//! assert_eq!(state.pnl()[&0], 100);
//! ```

pub mod action;
pub mod closure;
pub mod error;
pub mod games;
pub mod pot;
pub mod ranking;
pub mod state;
pub mod utilities;
pub mod view;

pub use action::{Action, ActionKind, ActionRecord};
pub use error::{ActionError, ConfigError, Error, RejectedAction};
pub use games::{BettingStructure, NoLimitOmahaHoldem, NoLimitTexasHoldem, PotLimitOmahaHoldem, Street, Variant};
pub use pot::{Pot, RakePolicy, Settlement, SidePotLayer};
pub use ranking::{HandRanking, StrengthRanking};
pub use state::{Operation, Pointer, State, StateBuilder};
pub use utilities::{Card, Chips, Deck, Rank, Suit};
pub use view::PlayerView;
