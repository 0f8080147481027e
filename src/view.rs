//! What one player is allowed to see of a hand.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::action::{ActionKind, ActionRecord};
use crate::pot::SidePotLayer;
use crate::state::{Operation, State};
use crate::utilities::{Card, Chips};

/// Betting limits shown to the player whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToAct {
    pub legal_actions: Vec<ActionKind>,
    pub amount_to_call: Chips,
    pub min_bet: Chips,
    pub max_bet: Chips,
    pub pot_sized_bet: Chips,
}

/// A serializable projection of [`State`] for one seat.
///
/// Opponents' hole cards only appear once the hand is complete, and only
/// for the players who reached showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub variant: &'static str,
    pub player: usize,
    pub hand: Vec<Card>,
    pub board: Vec<Card>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runouts: Vec<Vec<Card>>,
    pub street: usize,
    pub action_pointer: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_act: Option<ToAct>,
    pub actions: Vec<ActionRecord>,
    pub pot_balances: Vec<Chips>,
    pub stacks: Vec<Chips>,
    pub side_pots: Vec<SidePotLayer>,
    pub showdown_hands: BTreeMap<usize, Vec<Card>>,
    pub payouts: BTreeMap<usize, Chips>,
    pub rake: BTreeMap<usize, Chips>,
    pub is_complete: bool,
}

impl PlayerView {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl State {
    /// Board cards that have been revealed so far.
    pub fn visible_board(&self) -> &[Card] {
        if self.is_complete() {
            return self.board();
        }
        let dealt = self.variant().board_cards_through(self.street());
        &self.board()[..dealt.min(self.board().len())]
    }

    /// The hand as seen from `player`'s seat, or `None` for a seat that is not at the table.
    pub fn view(&self, player: usize) -> Option<PlayerView> {
        let hand = self.hands().get(player)?.clone();
        let contenders = self.non_folded_players();
        let showdown_hands = if self.is_complete() && contenders.len() >= 2 {
            contenders.iter().map(|&p| (p, self.hands()[p].clone())).collect()
        } else {
            BTreeMap::new()
        };
        let to_act = (self.action_pointer().actor() == Some(player) && !self.is_complete()).then(|| ToAct {
            legal_actions: self.legal_actions().to_vec(),
            amount_to_call: self.amount_to_call(),
            min_bet: self.min_bet(),
            max_bet: self.max_bet(),
            pot_sized_bet: self.pot_sized_bet(),
        });

        Some(PlayerView {
            variant: self.variant().name,
            player,
            hand,
            board: self.visible_board().to_vec(),
            runouts: self.runouts().to_vec(),
            street: self.street(),
            action_pointer: self.action_pointer().actor(),
            to_act,
            actions: self.action_records(),
            pot_balances: self.pot().balances().to_vec(),
            stacks: self.stacks().to_vec(),
            side_pots: self.pot().side_pots(&contenders),
            showdown_hands,
            payouts: self.payouts().clone(),
            rake: self.rake().clone(),
            is_complete: self.is_complete(),
        })
    }

    /// A compact one-line description of the hand from `player`'s seat:
    /// `NLHE3:AsKs|2s3s4s|r[6]fc|0-1/2|200,200,200`.
    ///
    /// Bets and raises print as `p` when they were exactly pot-sized and as
    /// `[amount]` otherwise; every other kind prints its abbreviation.
    /// Returns `None` for a seat that is not at the table.
    pub fn state_string(&self, player: usize) -> Option<String> {
        let hand = self.hands().get(player)?;
        let boards = if self.runouts().is_empty() {
            Card::join(self.visible_board())
        } else {
            self.runouts().iter().map(|board| Card::join(board)).join(",")
        };
        let actions = self
            .operations()
            .iter()
            .filter_map(|op| match op {
                Operation::Acting(acting) if !acting.kind.is_aggression() => {
                    Some(acting.kind.abbreviation().to_string())
                }
                Operation::Acting(acting) if acting.amount == acting.pot_sized_bet => Some("p".to_string()),
                Operation::Acting(acting) => Some(format!("[{}]", acting.amount)),
                _ => None,
            })
            .join("");
        let blind_count = self.blinds().iter().rposition(|&b| b > 0).map_or(0, |last| last + 1);
        Some(format!(
            "{}{}:{}|{}|{}|{}-{}|{}",
            self.variant().name,
            self.player_count(),
            Card::join(hand),
            boards,
            actions,
            self.ante(),
            self.blinds()[..blind_count].iter().join("/"),
            self.starting_stacks().iter().join(","),
        ))
    }
}
