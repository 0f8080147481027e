//! Player decisions and their static legality rules.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumProperty;
use strum_macros::{Display, EnumIter, EnumProperty, EnumString};

use crate::error::ActionError;
use crate::utilities::Chips;

/// What a player decided to do.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    EnumString, Display, EnumIter, EnumProperty, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    // when the action is open or checked to you
    #[strum(props(abbreviation = "k"))]
    Check,
    #[strum(props(abbreviation = "b"))]
    Bet,
    // when there is a bet to you
    #[strum(props(abbreviation = "f"))]
    Fold,
    #[strum(props(abbreviation = "c"))]
    Call,
    #[strum(props(abbreviation = "r"))]
    Raise,
    // drawing games
    #[strum(props(abbreviation = "d"))]
    Draw,
}

/// Whether a kind of action carries chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountKind {
    Zero,
    Positive,
}

const ZERO_TO_CALL: [ActionKind; 3] = [ActionKind::Bet, ActionKind::Check, ActionKind::Draw];
const NONZERO_TO_CALL: [ActionKind; 3] = [ActionKind::Fold, ActionKind::Call, ActionKind::Raise];

impl ActionKind {
    pub fn amount_kind(self) -> AmountKind {
        match self {
            ActionKind::Check | ActionKind::Fold | ActionKind::Draw => AmountKind::Zero,
            ActionKind::Bet | ActionKind::Call | ActionKind::Raise => AmountKind::Positive,
        }
    }

    /// Parses `"CALL"`, `"call"`, ... into a kind.
    pub fn parse(raw: &str) -> Result<Self, ActionError> {
        Self::from_str(raw).map_err(|_| ActionError::UnknownKind(raw.to_string()))
    }

    /// Bets and raises.
    pub fn is_aggression(self) -> bool {
        matches!(self, ActionKind::Bet | ActionKind::Raise)
    }

    /// Actions that move chips into the pot.
    pub fn is_wager(self) -> bool {
        self.amount_kind() == AmountKind::Positive
    }

    pub fn closes(self) -> bool {
        matches!(self, ActionKind::Fold | ActionKind::Call)
    }

    pub fn passes(self) -> bool {
        matches!(self, ActionKind::Check | ActionKind::Fold)
    }

    /// The kinds a player may choose from, given what they owe.
    pub fn legal_when(amount_to_call: Chips) -> &'static [ActionKind] {
        if amount_to_call == 0 {
            &ZERO_TO_CALL
        } else {
            &NONZERO_TO_CALL
        }
    }

    pub fn abbreviation(self) -> &'static str {
        self.get_str("abbreviation").unwrap_or("?")
    }
}

/// A validated, immutable player decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    player: usize,
    kind: ActionKind,
    amount: Chips,
}

impl Action {
    pub fn new(player: usize, kind: ActionKind, amount: Chips) -> Result<Self, ActionError> {
        if amount < 0 {
            return Err(ActionError::NegativeAmount(amount));
        }
        match kind.amount_kind() {
            AmountKind::Zero if amount != 0 => {
                return Err(ActionError::NonZeroAmount { kind, amount });
            }
            AmountKind::Positive if amount <= 0 => {
                return Err(ActionError::NonPositiveAmount { kind, amount });
            }
            _ => {}
        }
        Ok(Self { player, kind, amount })
    }

    pub fn player(&self) -> usize {
        self.player
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn amount(&self) -> Chips {
        self.amount
    }
}

/// The persisted form of an action, e.g. `{"player": 2, "action": "RAISE", "amount": 6}`.
///
/// `amount` may be left out for calls and zero-amount kinds when replaying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: usize,
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Chips>,
}

impl ActionRecord {
    pub fn new(player: usize, action: ActionKind, amount: Option<Chips>) -> Self {
        Self { player, action, amount }
    }
}

impl From<&Action> for ActionRecord {
    fn from(action: &Action) -> Self {
        Self {
            player: action.player,
            action: action.kind,
            amount: Some(action.amount),
        }
    }
}
