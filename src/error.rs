//! Error types.
//!
//! Rejections are the caller's fault and always leave the state untouched.
//! Broken engine invariants are not represented here; they panic.

use thiserror::Error;

use crate::action::ActionKind;
use crate::utilities::{Card, Chips};

/// An action value that can never be valid, whatever the state of the hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("amount must be >= 0, received {0}")]
    NegativeAmount(Chips),
    #[error("amount must be 0 for actions of type {kind}, received {amount}")]
    NonZeroAmount { kind: ActionKind, amount: Chips },
    #[error("amount must be > 0 for actions of type {kind}, received {amount}")]
    NonPositiveAmount { kind: ActionKind, amount: Chips },
    #[error("amount cannot be omitted for actions of type {0}")]
    MissingAmount(ActionKind),
    #[error("invalid action '{0}'")]
    UnknownKind(String),
}

/// An action refused by the state machine in its current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectedAction {
    #[error("cannot act after the hand is complete")]
    HandComplete,
    #[error("the action is on {expected:?}, but the action comes from player {actual}")]
    WrongPlayer { expected: Option<usize>, actual: usize },
    #[error("it is {amount_to_call} to call, so {kind} is invalid")]
    IllegalKind { kind: ActionKind, amount_to_call: Chips },
    #[error("player {player} only has {stack} in stack, less than the desired wager of {amount}")]
    InsufficientStack { player: usize, stack: Chips, amount: Chips },
    #[error("a call must put in exactly {amount_to_call}, not {amount}")]
    CallAmount { amount: Chips, amount_to_call: Chips },
    #[error("invalid {kind} size: amount {amount} is less than the minimum of {min_bet}")]
    BelowMinimum { kind: ActionKind, amount: Chips, min_bet: Chips },
    #[error("invalid {kind} size: amount {amount} is greater than the limit of {max_bet}")]
    AboveMaximum { kind: ActionKind, amount: Chips, max_bet: Chips },
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// A hand that cannot be set up from the supplied configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("poker is a game of more than 1 player, got {0}")]
    TooFewPlayers(usize),
    #[error("expected exactly one {what} per player ({expected}), got {actual}")]
    PerPlayerCount { what: &'static str, expected: usize, actual: usize },
    #[error("player {player} holds {actual} hole cards, {variant} deals {expected}")]
    HoleCardCount { variant: &'static str, player: usize, expected: usize, actual: usize },
    #[error("player {0} has a negative stack")]
    NegativeStack(usize),
    #[error("forced bets cannot be negative")]
    NegativeForcedBet,
    #[error("there must be either an ante or blinds to play poker")]
    NoForcedBets,
    #[error("a board of {actual} cards is longer than the {max} cards this variant deals")]
    BoardTooLong { max: usize, actual: usize },
    #[error("the deck holds {actual} cards but up to {required} may be dealt")]
    DeckTooSmall { required: usize, actual: usize },
    #[error("{0} appears more than once among the hole cards, board and deck")]
    DuplicateCard(Card),
    #[error("at least one all-in runout is required")]
    NoRunouts,
    #[error("rake fraction must lie in [0, 1) and the rake cap must be non-negative")]
    InvalidRake,
    #[error("no hand ranking was supplied")]
    MissingRanking,
}

/// Umbrella error for building a hand from a persisted action list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("action #{index} could not be replayed: {source}")]
    Replay {
        index: usize,
        #[source]
        source: RejectedAction,
    },
}
