//! Pot bookkeeping and showdown settlement.
//!
//! A [`Pot`] only remembers how much each player has put in over the whole
//! hand. Side pots are never stored; they fall out of the contribution levels
//! when the pot is settled:
//!
//! 1. rake is charged band by band, lowest contribution level first, until the
//!    house cap is reached; a band's charge is split evenly between the
//!    players who paid into it, odd chips to the lower seats;
//! 2. each tier of winners (strongest first) takes every layer it is eligible
//!    for, chopping layers evenly between tied players;
//! 3. whatever is left goes to the next tier, until the pot is empty.

use std::collections::BTreeMap;

use itertools::Itertools;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::utilities::{div_mod, inverse_cumulative_sum, Chips};

/// House commission rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RakePolicy {
    /// Share of the pot taken, in `[0, 1)`.
    pub fraction: Decimal,
    /// Cap on the total rake of one pot.
    pub max_rake: Chips,
    /// Skip the rake entirely when the hand ends before the flop.
    #[serde(default)]
    pub no_flop_no_drop: bool,
}

impl RakePolicy {
    pub fn new(fraction: Decimal, max_rake: Chips) -> Result<Self, ConfigError> {
        let policy = Self { fraction, max_rake, no_flop_no_drop: false };
        policy.validate()?;
        Ok(policy)
    }

    pub fn no_flop_no_drop(mut self, status: bool) -> Self {
        self.no_flop_no_drop = status;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fraction < Decimal::ZERO || self.fraction >= Decimal::ONE || self.max_rake < 0 {
            return Err(ConfigError::InvalidRake);
        }
        Ok(())
    }

    pub fn is_free(&self) -> bool {
        self.fraction.is_zero() || self.max_rake == 0
    }

    /// `min(max_rake, fraction × pot)`, rounded down to whole chips.
    pub fn max_total_rake(&self, pot_total: Chips) -> Chips {
        self.max_rake.min(self.fraction_of(pot_total))
    }

    fn fraction_of(&self, amount: Chips) -> Chips {
        (self.fraction * Decimal::from(amount))
            .floor()
            .to_i64()
            .unwrap_or(0)
    }
}

/// The outcome of settling a pot: what each player receives and what each
/// player paid to the house.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Settlement {
    pub payouts: BTreeMap<usize, Chips>,
    pub rake: BTreeMap<usize, Chips>,
}

impl Settlement {
    fn empty(player_count: usize) -> Self {
        Self {
            payouts: (0..player_count).map(|p| (p, 0)).collect(),
            rake: (0..player_count).map(|p| (p, 0)).collect(),
        }
    }

    pub fn total_paid(&self) -> Chips {
        self.payouts.values().sum()
    }

    pub fn total_rake(&self) -> Chips {
        self.rake.values().sum()
    }

    /// Averages the settlements of several runouts of the same pot.
    ///
    /// Every per-player total is divided by the number of runouts, rounding
    /// down. The chips lost to rounding go one at a time to the players with
    /// the largest remainders (ties: larger total payout, then lower seat), so
    /// the average pays out exactly what one runout would.
    pub fn average(runs: &[Settlement]) -> Settlement {
        let Some(first) = runs.first() else {
            return Settlement::default();
        };
        if runs.len() == 1 {
            return first.clone();
        }

        let count = runs.len() as Chips;
        let total = |player: usize, raked: bool| -> Chips {
            runs.iter()
                .map(|run| if raked { &run.rake } else { &run.payouts })
                .map(|amounts| amounts.get(&player).copied().unwrap_or(0))
                .sum()
        };

        let mut averaged = Settlement::default();
        let mut remainders = Vec::new();
        let mut lost = 0;
        for &player in first.payouts.keys() {
            let (rake, rake_remainder) = div_mod(total(player, true), count);
            let payout_total = total(player, false);
            let (payout, remainder) = div_mod(payout_total, count);
            averaged.rake.insert(player, rake);
            averaged.payouts.insert(player, payout);
            lost += rake_remainder + remainder;
            if payout_total > 0 {
                remainders.push((player, remainder, payout_total));
            }
        }

        let leftover = (lost / count) as usize;
        debug_assert!(leftover == 0 || !remainders.is_empty());
        let order = remainders
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)).then(a.0.cmp(&b.0)))
            .map(|(player, _, _)| player)
            .collect::<Vec<_>>();
        for player in order.iter().cycle().take(leftover) {
            *averaged.payouts.entry(*player).or_insert(0) += 1;
        }
        averaged
    }
}

/// One band of the pot: the chips every player put in between
/// `previous_level` and `level`, and who may win them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidePotLayer {
    pub previous_level: Chips,
    pub level: Chips,
    pub owed: BTreeMap<usize, Chips>,
    pub eligible: Vec<usize>,
}

impl SidePotLayer {
    pub fn amount(&self) -> Chips {
        self.owed.values().sum()
    }
}

/// Cumulative contributions of every player for one hand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pot {
    balances: Vec<Chips>,
}

impl From<Vec<Chips>> for Pot {
    fn from(balances: Vec<Chips>) -> Self {
        Self { balances }
    }
}

impl Pot {
    pub fn new(player_count: usize) -> Self {
        Self { balances: vec![0; player_count] }
    }

    pub fn player_count(&self) -> usize {
        self.balances.len()
    }

    pub fn put_money_in(&mut self, player: usize, amount: Chips) {
        self.balances[player] += amount;
    }

    pub fn balance(&self, player: usize) -> Chips {
        self.balances[player]
    }

    pub fn balances(&self) -> &[Chips] {
        &self.balances
    }

    /// Sum of all the money in the pot from each player.
    pub fn total_money(&self) -> Chips {
        self.balances.iter().sum()
    }

    pub fn max_balance(&self) -> Chips {
        self.balances.iter().copied().max().unwrap_or(0)
    }

    /// The size of the last bet or raise: the gap between the two largest balances.
    pub fn last_raise_delta(&self) -> Chips {
        match self.balances.iter().sorted_unstable_by(|a, b| b.cmp(a)).as_slice() {
            [first, second, ..] => **first - **second,
            [first] => **first,
            [] => 0,
        }
    }

    /// Non-zero increments between the sorted balances of `players`.
    pub fn incremental_amounts(&self, players: &[usize]) -> Vec<Chips> {
        let levels = players
            .iter()
            .map(|&p| self.balances[p])
            .sorted_unstable()
            .collect::<Vec<_>>();
        inverse_cumulative_sum(&levels)
            .into_iter()
            .filter(|&increment| increment > 0)
            .collect()
    }

    /// Decomposes the contributions into side pots, main pot first.
    ///
    /// `contenders` are the players still holding cards; only they appear in
    /// a layer's `eligible` list.
    pub fn side_pots(&self, contenders: &[usize]) -> Vec<SidePotLayer> {
        let mut previous_level = 0;
        let mut layers = Vec::new();
        for level in self.balances.iter().copied().filter(|&b| b > 0).sorted_unstable().dedup() {
            let owed = self
                .balances
                .iter()
                .enumerate()
                .map(|(p, &b)| (p, b.min(level) - b.min(previous_level)))
                .filter(|&(_, amount)| amount > 0)
                .collect::<BTreeMap<_, _>>();
            let eligible = contenders
                .iter()
                .copied()
                .filter(|&p| self.balances[p] >= level)
                .sorted_unstable()
                .collect();
            layers.push(SidePotLayer { previous_level, level, owed, eligible });
            previous_level = level;
        }
        layers
    }

    /// Ships the pot to the winners.
    ///
    /// `winning_players` lists the players who reached showdown grouped into
    /// tiers of equal strength, strongest first. When `rake_pot` is set the
    /// house is paid before any distribution.
    ///
    /// # Panics
    ///
    /// Panics if money is left after every tier was paid, which means the
    /// tiers left out a player who still has chips in the pot.
    pub fn settle_showdown(
        &mut self,
        winning_players: &[Vec<usize>],
        policy: &RakePolicy,
        rake_pot: bool,
    ) -> Settlement {
        let mut settlement = Settlement::empty(self.player_count());
        if rake_pot {
            self.extract_rake(policy, &mut settlement);
        }
        if self.total_money() == 0 {
            return settlement;
        }

        for tier in winning_players {
            let tier = tier.iter().copied().sorted_unstable().collect::<Vec<_>>();
            for increment in self.incremental_amounts(&tier) {
                let chopping = tier
                    .iter()
                    .copied()
                    .filter(|&w| self.balances[w] >= increment)
                    .collect::<Vec<_>>();
                let layer = self.balances.iter().map(|&b| b.min(increment)).sum::<Chips>();
                let (share, odd_chips) = div_mod(layer, chopping.len() as Chips);
                log::trace!(
                    "layer of {} ({} per player) to {:?}, {} odd chips",
                    layer, increment, chopping, odd_chips
                );
                for (i, &winner) in chopping.iter().enumerate() {
                    let bonus = Chips::from((i as Chips) < odd_chips);
                    *settlement.payouts.entry(winner).or_insert(0) += share + bonus;
                }
                for balance in self.balances.iter_mut() {
                    *balance -= (*balance).min(increment);
                }
            }
            if self.total_money() == 0 {
                return settlement;
            }
        }

        panic!(
            "reached the end of settlement with {} still in the pot: \
             the winning tiers {:?} do not cover every contributing player",
            self.total_money(),
            winning_players
        );
    }

    fn extract_rake(&mut self, policy: &RakePolicy, settlement: &mut Settlement) {
        let mut budget = policy.max_total_rake(self.total_money());
        if budget <= 0 {
            return;
        }

        let contributed = self.balances.clone();
        let mut previous_level = 0;
        for level in contributed.iter().copied().filter(|&b| b > 0).sorted_unstable().dedup() {
            let payers = (0..contributed.len())
                .filter(|&p| contributed[p] >= level)
                .collect::<Vec<_>>();
            let band = (level - previous_level) * payers.len() as Chips;
            let charge = policy.fraction_of(band).min(budget);
            let (share, odd_chips) = div_mod(charge, payers.len() as Chips);
            log::trace!(
                "rake band {}..{}: {} from {:?}, {} odd chips",
                previous_level, level, charge, payers, odd_chips
            );
            // the floor keeps every share strictly below the band, so the odd chip still fits
            for (i, &p) in payers.iter().enumerate() {
                let paid = share + Chips::from((i as Chips) < odd_chips);
                self.balances[p] -= paid;
                *settlement.rake.entry(p).or_insert(0) += paid;
            }
            budget -= charge;
            if budget <= 0 {
                break;
            }
            previous_level = level;
        }
    }
}
