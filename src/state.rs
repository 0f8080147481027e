// Implements the core poker state machine and related data structures.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use log::{debug, info, warn};

use crate::action::{Action, ActionKind, ActionRecord, AmountKind};
use crate::closure::{carry_forward_folds, is_action_closed, seat_views, LastActions};
use crate::error::{ActionError, ConfigError, Error, RejectedAction};
use crate::games::Variant;
use crate::pot::{Pot, RakePolicy, Settlement};
use crate::ranking::HandRanking;
use crate::utilities::{clean_values, shuffled, Card, Chips, Deck};

/// Whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Actor(usize),
    /// Nobody may act: the street closed and no street opened after it.
    Closed,
}

impl Pointer {
    pub fn actor(self) -> Option<usize> {
        match self {
            Pointer::Actor(player) => Some(player),
            Pointer::Closed => None,
        }
    }
}

// Represents all possible operations within a game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    AntePosting(AntePosting),
    BlindPosting(BlindPosting),
    Acting(Acting),
    BoardDealing(BoardDealing),
    RunoutDealing(RunoutDealing),
    ChipsPushing(ChipsPushing),
}

#[derive(Debug, Clone, PartialEq, Eq)] pub struct AntePosting { pub player: usize, pub amount: Chips }
#[derive(Debug, Clone, PartialEq, Eq)] pub struct BlindPosting { pub player: usize, pub amount: Chips }
#[derive(Debug, Clone, PartialEq, Eq)] pub struct Acting { pub street: usize, pub player: usize, pub kind: ActionKind, pub amount: Chips, pub pot_sized_bet: Chips }
#[derive(Debug, Clone, PartialEq, Eq)] pub struct BoardDealing { pub street: usize, pub cards: Vec<Card> }
#[derive(Debug, Clone, PartialEq, Eq)] pub struct RunoutDealing { pub runout: usize, pub cards: Vec<Card> }
#[derive(Debug, Clone, PartialEq, Eq)] pub struct ChipsPushing { pub settlement: Settlement }

/// The state of one poker hand.
///
/// Built by [`StateBuilder`]; afterwards it only changes through [`State::act`]
/// or a replay of persisted actions.
#[derive(Clone)]
pub struct State {
    // Configuration
    variant: Variant,
    ranking: Arc<dyn HandRanking>,
    player_count: usize,
    ante: Chips,
    blinds: Vec<Chips>,
    starting_stacks: Vec<Chips>,
    hands: Vec<Vec<Card>>,
    starting_board: Vec<Card>,
    starting_deck: Vec<Card>,
    rake_policy: RakePolicy,
    all_in_runouts: usize,

    // Game state
    deck: VecDeque<Card>,
    board: Vec<Card>,
    runouts: Vec<Vec<Card>>,
    stacks: Vec<Chips>,
    pot: Pot,
    last_actions: LastActions,
    street: usize,
    pointer: Pointer,
    actions: Vec<Action>,
    operations: Vec<Operation>,
    flop_seen: bool,
    is_complete: bool,
    payouts: BTreeMap<usize, Chips>,
    rake: BTreeMap<usize, Chips>,
}

pub struct StateBuilder {
    variant: Variant,
    player_count: usize,
    ante: Chips,
    blinds: Vec<Chips>,
    starting_stacks: Vec<Chips>,
    hands: Vec<Vec<Card>>,
    board: Vec<Card>,
    deck: Option<Vec<Card>>,
    rake_policy: RakePolicy,
    all_in_runouts: usize,
    ranking: Option<Arc<dyn HandRanking>>,
}

impl StateBuilder {
    pub fn new(variant: Variant, player_count: usize) -> Self {
        Self {
            variant,
            player_count,
            ante: 0,
            blinds: Vec::new(),
            starting_stacks: Vec::new(),
            hands: Vec::new(),
            board: Vec::new(),
            deck: None,
            rake_policy: RakePolicy::default(),
            all_in_runouts: 1,
            ranking: None,
        }
    }

    pub fn ante(mut self, ante: Chips) -> Self { self.ante = ante; self }
    /// Blinds by seat, e.g. `[1, 2]` for small blind 1 and big blind 2 in seats 0 and 1.
    pub fn blinds(mut self, blinds: Vec<Chips>) -> Self { self.blinds = blinds; self }
    pub fn raw_blinds(mut self, raw_blinds: BTreeMap<usize, Chips>) -> Self { self.blinds = clean_values(&raw_blinds, self.player_count); self }
    pub fn starting_stacks(mut self, starting_stacks: Vec<Chips>) -> Self { self.starting_stacks = starting_stacks; self }
    pub fn raw_starting_stacks(mut self, raw_starting_stacks: BTreeMap<usize, Chips>) -> Self { self.starting_stacks = clean_values(&raw_starting_stacks, self.player_count); self }
    pub fn hands(mut self, hands: Vec<Vec<Card>>) -> Self { self.hands = hands; self }
    /// Board cards already known before the hand starts.
    pub fn board(mut self, board: Vec<Card>) -> Self { self.board = board; self }
    /// A pre-shuffled deck; cards are dealt from its front.
    pub fn deck(mut self, deck: Vec<Card>) -> Self { self.deck = Some(deck); self }
    pub fn rake_policy(mut self, rake_policy: RakePolicy) -> Self { self.rake_policy = rake_policy; self }
    pub fn all_in_runouts(mut self, all_in_runouts: usize) -> Self { self.all_in_runouts = all_in_runouts; self }
    pub fn ranking(mut self, ranking: impl HandRanking + 'static) -> Self { self.ranking = Some(Arc::new(ranking)); self }
    pub fn shared_ranking(mut self, ranking: Arc<dyn HandRanking>) -> Self { self.ranking = Some(ranking); self }

    pub fn build(self) -> Result<State, ConfigError> {
        let n = self.player_count;
        if n < 2 {
            return Err(ConfigError::TooFewPlayers(n));
        }
        if self.starting_stacks.len() != n {
            return Err(ConfigError::PerPlayerCount { what: "starting stack", expected: n, actual: self.starting_stacks.len() });
        }
        if self.hands.len() != n {
            return Err(ConfigError::PerPlayerCount { what: "hand", expected: n, actual: self.hands.len() });
        }
        if self.blinds.len() > n {
            return Err(ConfigError::PerPlayerCount { what: "blind", expected: n, actual: self.blinds.len() });
        }
        for (player, hand) in self.hands.iter().enumerate() {
            if hand.len() != self.variant.hole_card_count {
                return Err(ConfigError::HoleCardCount {
                    variant: self.variant.name,
                    player,
                    expected: self.variant.hole_card_count,
                    actual: hand.len(),
                });
            }
        }
        if let Some(player) = self.starting_stacks.iter().position(|&s| s < 0) {
            return Err(ConfigError::NegativeStack(player));
        }
        if self.ante < 0 || self.blinds.iter().any(|&b| b < 0) {
            return Err(ConfigError::NegativeForcedBet);
        }
        if self.ante == 0 && self.blinds.iter().all(|&b| b == 0) {
            return Err(ConfigError::NoForcedBets);
        }
        let board_card_count = self.variant.board_card_count();
        if self.board.len() > board_card_count {
            return Err(ConfigError::BoardTooLong { max: board_card_count, actual: self.board.len() });
        }
        if self.all_in_runouts == 0 {
            return Err(ConfigError::NoRunouts);
        }
        self.rake_policy.validate()?;
        let ranking = self.ranking.ok_or(ConfigError::MissingRanking)?;

        let deck = match self.deck {
            Some(deck) => deck,
            None => {
                let used = self.hands.iter().flatten().chain(&self.board).copied().collect::<Vec<_>>();
                shuffled(&Deck::excluding(&used))
            }
        };
        let required = (board_card_count - self.board.len()) * self.all_in_runouts;
        if deck.len() < required {
            return Err(ConfigError::DeckTooSmall { required, actual: deck.len() });
        }
        if let Some(card) = self.hands.iter().flatten().chain(&self.board).chain(&deck).duplicates().next() {
            return Err(ConfigError::DuplicateCard(*card));
        }

        let mut blinds = self.blinds;
        blinds.resize(n, 0);

        let mut state = State {
            variant: self.variant,
            ranking,
            player_count: n,
            ante: self.ante,
            blinds,
            starting_stacks: self.starting_stacks.clone(),
            hands: self.hands,
            starting_board: self.board.clone(),
            starting_deck: deck.clone(),
            rake_policy: self.rake_policy,
            all_in_runouts: self.all_in_runouts,
            deck: VecDeque::from(deck),
            board: self.board,
            runouts: Vec::new(),
            stacks: self.starting_stacks,
            pot: Pot::new(n),
            last_actions: LastActions::new(),
            street: 0,
            pointer: Pointer::Closed,
            actions: Vec::new(),
            operations: Vec::new(),
            flop_seen: false,
            is_complete: false,
            payouts: BTreeMap::new(),
            rake: BTreeMap::new(),
        };

        state.begin();
        Ok(state)
    }

    /// Builds the hand and replays a persisted action list on it.
    pub fn build_from_action_records(self, records: &[ActionRecord]) -> Result<State, Error> {
        let mut state = self.build()?;
        state.reset_state_from_action_records(records)?;
        Ok(state)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("variant", &self.variant.name)
            .field("street", &self.street)
            .field("pointer", &self.pointer)
            .field("board", &Card::join(&self.board))
            .field("stacks", &self.stacks)
            .field("pot", &self.pot.balances())
            .field("last_actions", &self.last_actions)
            .field("is_complete", &self.is_complete)
            .field("payouts", &self.payouts)
            .finish_non_exhaustive()
    }
}

impl State {
    // Core state machine logic
    fn begin(&mut self) {
        self.extract_antes_and_blinds();
        self.street = 0;
        if self.is_action_closed() {
            self.pointer = Pointer::Closed;
            self.close_streets();
        } else {
            self.pointer = Pointer::Actor(self.get_starting_action());
        }
    }

    fn reset(&mut self) {
        self.deck = self.starting_deck.iter().copied().collect();
        self.board = self.starting_board.clone();
        self.runouts.clear();
        self.stacks = self.starting_stacks.clone();
        self.pot = Pot::new(self.player_count);
        self.last_actions.clear();
        self.actions.clear();
        self.operations.clear();
        self.flop_seen = false;
        self.is_complete = false;
        self.payouts.clear();
        self.rake.clear();
        self.begin();
    }

    /// Rebuilds the hand from the forced bets and replays `records` in order.
    ///
    /// Idempotent. When any record is rejected the state is left exactly as
    /// it was before the call.
    pub fn reset_state_from_action_records(&mut self, records: &[ActionRecord]) -> Result<(), Error> {
        let mut replayed = self.clone();
        replayed.reset();
        for (index, record) in records.iter().enumerate() {
            replayed
                .act(record.player, record.action, record.amount)
                .map_err(|source| Error::Replay { index, source })?;
        }
        *self = replayed;
        Ok(())
    }

    fn put_money_in_pot(&mut self, player: usize, amount: Chips) {
        assert!(
            amount <= self.stacks[player],
            "player {} only has {} chips, but trying to put {} in pot",
            player, self.stacks[player], amount
        );
        self.stacks[player] -= amount;
        self.pot.put_money_in(player, amount);
    }

    fn extract_antes_and_blinds(&mut self) {
        for player in 0..self.player_count {
            let amount = self.ante.min(self.stacks[player]);
            if amount > 0 {
                self.put_money_in_pot(player, amount);
                self.operations.push(Operation::AntePosting(AntePosting { player, amount }));
            }
        }
        for player in 0..self.player_count {
            let amount = self.blinds[player].min(self.stacks[player]);
            if amount > 0 {
                self.put_money_in_pot(player, amount);
                self.operations.push(Operation::BlindPosting(BlindPosting { player, amount }));
            }
        }
    }

    /// Validates, applies and advances one player decision.
    ///
    /// `amount` may be left out for calls (the exact amount to call is used)
    /// and for zero-amount kinds. On error nothing changes.
    pub fn act(&mut self, player: usize, kind: ActionKind, amount: Option<Chips>) -> Result<Action, RejectedAction> {
        let action = self.build_action(player, kind, amount).map_err(|rejection| {
            warn!("rejected {} from player {}: {}", kind, player, rejection);
            rejection
        })?;
        self.update_state_with_action(action);
        self.advance_action();
        debug_assert!(self.chips_are_conserved(), "chips were created or destroyed: {:?}", self);
        Ok(action)
    }

    fn build_action(&self, player: usize, kind: ActionKind, amount: Option<Chips>) -> Result<Action, RejectedAction> {
        if self.is_complete {
            return Err(RejectedAction::HandComplete);
        }
        let expected = self.pointer.actor();
        if expected != Some(player) {
            return Err(RejectedAction::WrongPlayer { expected, actual: player });
        }

        let amount_to_call = self.amount_to_call();
        let amount = match (amount, kind.amount_kind()) {
            (Some(amount), _) => amount,
            (None, _) if kind == ActionKind::Call => amount_to_call,
            (None, AmountKind::Zero) => 0,
            (None, AmountKind::Positive) => return Err(ActionError::MissingAmount(kind).into()),
        };
        let action = Action::new(player, kind, amount)?;

        if !ActionKind::legal_when(amount_to_call).contains(&kind) {
            return Err(RejectedAction::IllegalKind { kind, amount_to_call });
        }
        let stack = self.stacks[player];
        if stack < amount {
            return Err(RejectedAction::InsufficientStack { player, stack, amount });
        }
        if kind == ActionKind::Call && amount != amount_to_call {
            return Err(RejectedAction::CallAmount { amount, amount_to_call });
        }
        if kind.is_aggression() {
            let min_bet = self.min_bet();
            if amount < min_bet {
                return Err(RejectedAction::BelowMinimum { kind, amount, min_bet });
            }
            let max_bet = self.max_bet();
            if amount > max_bet {
                return Err(RejectedAction::AboveMaximum { kind, amount, max_bet });
            }
        }
        Ok(action)
    }

    fn update_state_with_action(&mut self, action: Action) {
        let pot_sized_bet = self.pot_sized_bet();
        let (player, kind, amount) = (action.player(), action.kind(), action.amount());
        if kind.is_wager() {
            self.put_money_in_pot(player, amount);
        }
        self.last_actions.insert(player, kind);
        self.actions.push(action);
        self.operations.push(Operation::Acting(Acting { street: self.street, player, kind, amount, pot_sized_bet }));
        debug!("street {}: player {} {} {}", self.street, player, kind, amount);
    }

    fn advance_action(&mut self) {
        if self.is_action_closed() {
            self.close_streets();
        } else {
            self.move_action();
        }
    }

    /// Moves through every street that is already closed, then settles the
    /// hand if that reached showdown.
    fn close_streets(&mut self) {
        let showdown_street = self.variant.showdown_street();
        let mut closed = true;
        while closed && self.street < showdown_street {
            self.move_street();
            closed = self.is_action_closed();
        }
        if self.street >= showdown_street {
            self.finish();
        }
    }

    fn can_act(&self, player: usize) -> bool {
        self.stacks[player] > 0 && self.last_actions.get(&player) != Some(&ActionKind::Fold)
    }

    fn move_action(&mut self) {
        let current = self.pointer.actor().unwrap_or(0);
        let next = (1..=self.player_count)
            .map(|offset| (current + offset) % self.player_count)
            .find(|&player| self.can_act(player));
        match next {
            Some(player) => self.pointer = Pointer::Actor(player),
            None => panic!("the action is not closed, but no player can act: {:?}", self),
        }
    }

    fn move_street(&mut self) {
        self.street += 1;
        self.last_actions = carry_forward_folds(&self.last_actions);
        if self.non_folded_players().len() >= 2 {
            self.flop_seen = true;
        }
        info!("moving to the {}", self.variant.street_name(self.street));

        if self.street >= self.variant.showdown_street() || self.is_action_closed() {
            self.pointer = Pointer::Closed;
            return;
        }

        self.deal_flop_turn_river();
        self.pointer = Pointer::Actor(self.get_starting_action());
    }

    fn get_starting_action(&self) -> usize {
        self.variant
            .starting_actor(self.street, self.player_count, |player| self.can_act(player))
            .unwrap_or_else(|| {
                panic!(
                    "the action is not closed, but we could not find the player \
                     who starts the action: {:?}",
                    self
                )
            })
    }

    fn is_action_closed(&self) -> bool {
        is_action_closed(&seat_views(&self.last_actions, &self.stacks, self.pot.balances()))
    }

    /// Deals the current street's board cards, skipping any that were known
    /// before the hand started.
    fn deal_flop_turn_river(&mut self) {
        let target = self.variant.board_cards_through(self.street);
        let count = target.saturating_sub(self.board.len());
        if count == 0 {
            return;
        }
        let cards = self.deck.drain(..count).collect::<Vec<_>>();
        self.board.extend_from_slice(&cards);
        self.operations.push(Operation::BoardDealing(BoardDealing { street: self.street, cards }));
    }

    fn cards_remaining(&self) -> usize {
        self.variant.board_card_count() - self.board.len()
    }

    fn runout_all_in_board(&mut self, cards_remaining: usize) {
        let cards = self.deck.drain(..cards_remaining).collect::<Vec<_>>();
        self.board.extend_from_slice(&cards);
        self.runouts.push(self.board.clone());
        let runout = self.runouts.len() - 1;
        self.operations.push(Operation::RunoutDealing(RunoutDealing { runout, cards }));
    }

    fn reset_all_in_board(&mut self, cards_remaining: usize) {
        self.board.truncate(self.board.len() - cards_remaining);
    }

    fn should_rake_pot(&self) -> bool {
        !self.rake_policy.is_free() && (!self.rake_policy.no_flop_no_drop || self.flop_seen)
    }

    fn finish(&mut self) {
        let settlement = self.get_payouts_and_rake();
        info!(
            "hand complete: paid {:?}, raked {}",
            settlement.payouts, settlement.total_rake()
        );
        self.payouts = settlement.payouts.clone();
        self.rake = settlement.rake.clone();
        self.operations.push(Operation::ChipsPushing(ChipsPushing { settlement }));
        self.pointer = Pointer::Closed;
        self.is_complete = true;
    }

    /// Runs out the board as many times as agreed when players are all in,
    /// then ranks the hands and ships the pot on each board.
    fn get_payouts_and_rake(&mut self) -> Settlement {
        let rake_pot = self.should_rake_pot();
        let players_at_showdown = self.non_folded_players();
        if players_at_showdown.len() < 2 {
            let mut pot = self.pot.clone();
            return pot.settle_showdown(&[players_at_showdown], &self.rake_policy, rake_pot);
        }

        let cards_remaining = self.cards_remaining();
        let runout_count = if cards_remaining > 0 { self.all_in_runouts } else { 1 };
        let mut runs = Vec::with_capacity(runout_count);
        for _ in 0..runout_count {
            if cards_remaining > 0 {
                self.runout_all_in_board(cards_remaining);
            }
            let winners = self.ranking.order_hands(&self.board, &self.hands, &players_at_showdown);
            debug!("showdown on {}: {:?}", Card::join(&self.board), winners);
            let mut pot = self.pot.clone();
            runs.push(pot.settle_showdown(&winners, &self.rake_policy, rake_pot));
            if cards_remaining > 0 {
                self.reset_all_in_board(cards_remaining);
            }
        }
        Settlement::average(&runs)
    }

    fn chips_are_conserved(&self) -> bool {
        let put_in = self
            .starting_stacks
            .iter()
            .zip(&self.stacks)
            .map(|(starting, current)| starting - current)
            .sum::<Chips>();
        put_in == self.pot.total_money() && self.stacks.iter().all(|&s| s >= 0)
    }

    // Betting limits for the player on the action.

    /// `min(stack, max balance − own balance)`; zero when nobody is on the action.
    pub fn amount_to_call(&self) -> Chips {
        self.pointer.actor().map_or(0, |player| {
            (self.pot.max_balance() - self.pot.balance(player)).min(self.stacks[player])
        })
    }

    /// The smallest legal bet or raise: the last raise (at least the biggest
    /// forced bet) on top of the call, capped at the stack.
    pub fn min_bet(&self) -> Chips {
        let Some(player) = self.pointer.actor() else {
            return 0;
        };
        let biggest_forced_bet = self.blinds.iter().copied().chain([self.ante]).max().unwrap_or(0);
        let raise = biggest_forced_bet.max(self.pot.last_raise_delta());
        (raise + self.amount_to_call()).min(self.stacks[player])
    }

    pub fn max_bet(&self) -> Chips {
        self.pointer.actor().map_or(0, |player| {
            self.variant.max_bet(self.stacks[player], self.amount_to_call(), self.pot.total_money())
        })
    }

    /// Calling and then raising by the size of the pot.
    pub fn pot_sized_bet(&self) -> Chips {
        2 * self.amount_to_call() + self.pot.total_money()
    }

    pub fn legal_actions(&self) -> &'static [ActionKind] {
        if self.is_complete {
            return &[];
        }
        ActionKind::legal_when(self.amount_to_call())
    }

    // Results

    pub fn player_pnl(&self, player: usize) -> Chips {
        self.payouts.get(&player).copied().unwrap_or(0) + self.stacks[player] - self.starting_stacks[player]
    }

    pub fn pnl(&self) -> BTreeMap<usize, Chips> {
        (0..self.player_count).map(|p| (p, self.player_pnl(p))).collect()
    }

    // Accessors

    pub fn variant(&self) -> &Variant { &self.variant }
    pub fn player_count(&self) -> usize { self.player_count }
    pub fn ante(&self) -> Chips { self.ante }
    pub fn blinds(&self) -> &[Chips] { &self.blinds }
    pub fn starting_stacks(&self) -> &[Chips] { &self.starting_stacks }
    pub fn stacks(&self) -> &[Chips] { &self.stacks }
    pub fn hands(&self) -> &[Vec<Card>] { &self.hands }
    pub fn board(&self) -> &[Card] { &self.board }
    pub fn runouts(&self) -> &[Vec<Card>] { &self.runouts }
    pub fn deck(&self) -> &VecDeque<Card> { &self.deck }
    pub fn pot(&self) -> &Pot { &self.pot }
    pub fn last_actions(&self) -> &LastActions { &self.last_actions }
    pub fn street(&self) -> usize { self.street }
    pub fn action_pointer(&self) -> Pointer { self.pointer }
    pub fn actions(&self) -> &[Action] { &self.actions }
    pub fn operations(&self) -> &[Operation] { &self.operations }
    pub fn rake_policy(&self) -> &RakePolicy { &self.rake_policy }
    pub fn is_complete(&self) -> bool { self.is_complete }
    /// Empty until the hand is complete.
    pub fn payouts(&self) -> &BTreeMap<usize, Chips> { &self.payouts }
    pub fn rake(&self) -> &BTreeMap<usize, Chips> { &self.rake }

    pub fn is_all_in(&self, player: usize) -> bool {
        self.stacks[player] == 0
    }

    pub fn has_folded(&self, player: usize) -> bool {
        self.last_actions.get(&player) == Some(&ActionKind::Fold)
    }

    /// Players still holding cards.
    pub fn non_folded_players(&self) -> Vec<usize> {
        (0..self.player_count).filter(|&p| !self.has_folded(p)).collect()
    }

    pub fn action_records(&self) -> Vec<ActionRecord> {
        self.actions.iter().map(ActionRecord::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{NoLimitTexasHoldem, PotLimitOmahaHoldem};
    use crate::ranking::tiers_by_strength;
    use crate::action::ActionKind::*;

    fn hands(raw: &[&str]) -> Vec<Vec<Card>> {
        raw.iter().map(|h| Card::parse_cards(h).unwrap()).collect()
    }

    /// Seat order decides the winner: lower seats hold stronger hands.
    fn seat_order(_board: &[Card], _hands: &[Vec<Card>], players: &[usize]) -> Vec<Vec<usize>> {
        tiers_by_strength(players, |p| std::cmp::Reverse(p))
    }

    fn three_handed() -> State {
        NoLimitTexasHoldem::builder(3)
            .blinds(vec![1, 2])
            .starting_stacks(vec![200, 200, 200])
            .hands(hands(&["AsKs", "QhQd", "7c2d"]))
            .deck(Card::parse_cards("2s3s4s5s6s7s8s").unwrap())
            .ranking(seat_order)
            .build()
            .unwrap()
    }

    #[test]
    fn forced_bets_and_first_actor() {
        let state = three_handed();
        assert_eq!(state.pot().balances(), &[1, 2, 0]);
        assert_eq!(state.stacks(), &[199, 198, 200]);
        assert_eq!(state.action_pointer(), Pointer::Actor(2));
        assert_eq!(state.amount_to_call(), 2);
        assert_eq!(state.min_bet(), 4);
        assert_eq!(state.max_bet(), 200);
        assert_eq!(state.pot_sized_bet(), 7);
        assert_eq!(state.legal_actions(), &[Fold, Call, Raise]);
        assert_eq!(state.operations().len(), 2);
    }

    #[test]
    fn blinds_are_capped_by_the_stack() {
        let state = NoLimitTexasHoldem::builder(3)
            .ante(1)
            .blinds(vec![1, 2])
            .starting_stacks(vec![200, 2, 200])
            .hands(hands(&["AsKs", "QhQd", "7c2d"]))
            .ranking(seat_order)
            .build()
            .unwrap();
        assert_eq!(state.pot().balances(), &[2, 2, 1]);
        assert!(state.is_all_in(1));
    }

    #[test]
    fn rejections_leave_the_state_untouched() {
        let mut state = three_handed();
        let before = format!("{:?}", state);
        assert_eq!(
            state.act(0, Call, None),
            Err(RejectedAction::WrongPlayer { expected: Some(2), actual: 0 })
        );
        assert_eq!(state.act(2, Check, None), Err(RejectedAction::IllegalKind { kind: Check, amount_to_call: 2 }));
        assert_eq!(state.act(2, Call, Some(3)), Err(RejectedAction::CallAmount { amount: 3, amount_to_call: 2 }));
        assert_eq!(state.act(2, Raise, Some(3)), Err(RejectedAction::BelowMinimum { kind: Raise, amount: 3, min_bet: 4 }));
        assert_eq!(
            state.act(2, Raise, Some(201)),
            Err(RejectedAction::InsufficientStack { player: 2, stack: 200, amount: 201 })
        );
        assert_eq!(state.act(2, Raise, None), Err(RejectedAction::Action(ActionError::MissingAmount(Raise))));
        assert_eq!(state.act(2, Fold, Some(2)), Err(ActionError::NonZeroAmount { kind: Fold, amount: 2 }.into()));
        assert_eq!(format!("{:?}", state), before);
        assert!(state.actions().is_empty());
    }

    #[test]
    fn raise_reopens_and_call_closes_preflop() {
        let mut state = three_handed();
        state.act(2, Raise, Some(6)).unwrap();
        assert_eq!(state.action_pointer(), Pointer::Actor(0));
        assert_eq!(state.amount_to_call(), 5);
        // last raise was 4 on top of the blind
        assert_eq!(state.min_bet(), 9);
        state.act(0, Fold, None).unwrap();
        state.act(1, Call, None).unwrap();

        assert_eq!(state.street(), 1);
        assert_eq!(Card::join(state.board()), "2s3s4s");
        assert_eq!(state.action_pointer(), Pointer::Actor(1));
        assert_eq!(state.last_actions(), &LastActions::from([(0, Fold)]));
        assert_eq!(state.pot().total_money(), 13);
    }

    #[test]
    fn big_blind_gets_the_option() {
        let mut state = three_handed();
        state.act(2, Call, None).unwrap();
        state.act(0, Call, None).unwrap();
        assert_eq!(state.street(), 0);
        assert_eq!(state.action_pointer(), Pointer::Actor(1));
        assert_eq!(state.legal_actions(), &[Bet, Check, Draw]);
        state.act(1, Check, None).unwrap();
        assert_eq!(state.street(), 1);
        assert_eq!(state.action_pointer(), Pointer::Actor(0));
    }

    #[test]
    fn uncontested_hand_pays_the_last_player() {
        let mut state = three_handed();
        state.act(2, Fold, None).unwrap();
        state.act(0, Fold, None).unwrap();
        assert!(state.is_complete());
        assert_eq!(state.action_pointer(), Pointer::Closed);
        assert_eq!(state.payouts()[&1], 3);
        assert_eq!(state.pnl(), BTreeMap::from([(0, -1), (1, 1), (2, 0)]));
        assert!(state.board().is_empty());
        assert_eq!(state.act(1, Check, None), Err(RejectedAction::HandComplete));
    }

    #[test]
    fn pot_limit_caps_the_opening_raise() {
        let state = PotLimitOmahaHoldem::builder(3)
            .blinds(vec![1, 2])
            .starting_stacks(vec![200, 200, 200])
            .hands(hands(&["AsKsQsJs", "AhKhQhJh", "AdKdQdJd"]))
            .ranking(seat_order)
            .build()
            .unwrap();
        assert_eq!(state.max_bet(), 7);
        let mut rejected = state.clone();
        assert_eq!(
            rejected.act(2, Raise, Some(8)),
            Err(RejectedAction::AboveMaximum { kind: Raise, amount: 8, max_bet: 7 })
        );
    }

    #[test]
    fn builder_validation() {
        let base = || {
            NoLimitTexasHoldem::builder(2)
                .blinds(vec![2, 1])
                .starting_stacks(vec![100, 100])
                .hands(hands(&["AsKs", "QhQd"]))
                .ranking(seat_order)
        };
        assert!(base().build().is_ok());
        assert_eq!(base().blinds(vec![0, 0]).build().unwrap_err(), ConfigError::NoForcedBets);
        assert_eq!(base().ante(-1).build().unwrap_err(), ConfigError::NegativeForcedBet);
        assert_eq!(base().starting_stacks(vec![100, -1]).build().unwrap_err(), ConfigError::NegativeStack(1));
        assert_eq!(base().all_in_runouts(0).build().unwrap_err(), ConfigError::NoRunouts);
        assert_eq!(
            base().starting_stacks(vec![100]).build().unwrap_err(),
            ConfigError::PerPlayerCount { what: "starting stack", expected: 2, actual: 1 }
        );
        assert_eq!(
            base().hands(hands(&["AsKs", "Qh"])).build().unwrap_err(),
            ConfigError::HoleCardCount { variant: "NLHE", player: 1, expected: 2, actual: 1 }
        );
        assert_eq!(
            base().deck(Card::parse_cards("2c3c4c").unwrap()).build().unwrap_err(),
            ConfigError::DeckTooSmall { required: 5, actual: 3 }
        );
        assert_eq!(
            base().board(Card::parse_cards("2c3c4c5c6c7c").unwrap()).build().unwrap_err(),
            ConfigError::BoardTooLong { max: 5, actual: 6 }
        );
        assert_eq!(
            NoLimitTexasHoldem::builder(1).build().unwrap_err(),
            ConfigError::TooFewPlayers(1)
        );
    }

    #[test]
    fn known_cards_cannot_be_dealt_twice() {
        let base = || {
            NoLimitTexasHoldem::builder(2)
                .blinds(vec![2, 1])
                .starting_stacks(vec![100, 100])
                .hands(hands(&["AsKs", "QhQd"]))
                .ranking(seat_order)
        };
        let card = |raw: &str| Card::parse_cards(raw).unwrap()[0];
        assert_eq!(
            base().deck(Card::parse_cards("2c3c4c5cQh").unwrap()).build().unwrap_err(),
            ConfigError::DuplicateCard(card("Qh"))
        );
        assert_eq!(
            base()
                .board(Card::parse_cards("2c3c4c").unwrap())
                .deck(Card::parse_cards("4c5c").unwrap())
                .build()
                .unwrap_err(),
            ConfigError::DuplicateCard(card("4c"))
        );
        assert_eq!(
            base().hands(hands(&["AsKs", "AsQd"])).build().unwrap_err(),
            ConfigError::DuplicateCard(card("As"))
        );
        assert!(base().deck(Card::parse_cards("2c3c4c5c6c").unwrap()).build().is_ok());
    }

    #[test]
    fn raw_values_are_cleaned() {
        let state = NoLimitTexasHoldem::builder(3)
            .raw_blinds(BTreeMap::from([(0, 1), (1, 2)]))
            .raw_starting_stacks(BTreeMap::from([(0, 50), (1, 60), (2, 70)]))
            .hands(hands(&["AsKs", "QhQd", "7c2d"]))
            .ranking(seat_order)
            .build()
            .unwrap();
        assert_eq!(state.blinds(), &[1, 2, 0]);
        assert_eq!(state.stacks(), &[49, 58, 70]);
    }

    #[test]
    fn default_deck_excludes_known_cards() {
        let state = three_handed();
        let defaulted = NoLimitTexasHoldem::builder(3)
            .blinds(vec![1, 2])
            .starting_stacks(vec![200, 200, 200])
            .hands(state.hands().to_vec())
            .ranking(seat_order)
            .build()
            .unwrap();
        assert_eq!(defaulted.deck().len(), 46);
        assert!(state.hands().iter().flatten().all(|card| !defaulted.deck().contains(card)));
    }
}
