//! Decides whether the betting on the current street is finished.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::action::ActionKind;
use crate::utilities::Chips;

/// Most recent action of each player on the current street.
pub type LastActions = BTreeMap<usize, ActionKind>;

/// What the closure rules need to know about one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatView {
    pub last_action: Option<ActionKind>,
    pub is_all_in: bool,
    pub balance: Chips,
}

impl SeatView {
    fn has_folded(&self) -> bool {
        self.last_action == Some(ActionKind::Fold)
    }

    /// Still holding cards and still holding chips.
    fn is_live(&self) -> bool {
        !self.has_folded() && !self.is_all_in
    }
}

/// Builds the per-player views from the state's parallel collections.
pub fn seat_views(last_actions: &LastActions, stacks: &[Chips], balances: &[Chips]) -> Vec<SeatView> {
    stacks
        .iter()
        .zip(balances)
        .enumerate()
        .map(|(player, (&stack, &balance))| SeatView {
            last_action: last_actions.get(&player).copied(),
            is_all_in: stack == 0,
            balance,
        })
        .collect()
}

/// Whether nobody can or needs to act any further on this street.
///
/// The rules are tried in order and the first that applies decides:
///
/// 1. everyone but one player folded: closed, the hand is over;
/// 2. a live player owes chips to the pot: open;
/// 3. at most one live player is left and owes nothing: closed, there is
///    nobody to bet against;
/// 4. everyone folded, checked, or was all-in before the street began: closed;
/// 5. otherwise closed once every live player has acted on this street.
pub fn is_action_closed(seats: &[SeatView]) -> bool {
    let folded = seats.iter().filter(|s| s.has_folded()).count();
    if folded + 1 == seats.len() {
        return true;
    }

    let max_balance = seats.iter().map(|s| s.balance).max().unwrap_or(0);
    let live = seats.iter().filter(|s| s.is_live()).collect::<Vec<_>>();
    let matched = live
        .iter()
        .map(|s| s.balance)
        .chain(std::iter::once(max_balance))
        .all_equal();
    if !matched {
        return false;
    }

    if live.len() <= 1 {
        return true;
    }

    let checked = seats
        .iter()
        .filter(|s| s.last_action == Some(ActionKind::Check))
        .count();
    let idle_all_in = seats
        .iter()
        .filter(|s| s.is_all_in && s.last_action.is_none())
        .count();
    if folded + checked + idle_all_in == seats.len() {
        return true;
    }

    live.iter().all(|s| s.last_action.is_some())
}

/// The street transition for [`LastActions`].
///
/// Before: the actions recorded on the street that just closed.
/// After: only the fold markers remain, so folded players stay out of the
/// hand while everyone else must act again on the new street.
pub fn carry_forward_folds(last_actions: &LastActions) -> LastActions {
    last_actions
        .iter()
        .filter(|&(_, &kind)| kind == ActionKind::Fold)
        .map(|(&player, &kind)| (player, kind))
        .collect()
}
