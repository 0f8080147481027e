//! The showdown collaborator: whoever knows how to compare hands.

use crate::utilities::Card;

/// Orders the players who reached showdown by hand strength.
///
/// The result is a list of tiers, strongest first; players in one tier tie.
/// Every player in `players` must appear in exactly one tier.
pub trait HandRanking: Send + Sync {
    fn order_hands(&self, board: &[Card], hands: &[Vec<Card>], players: &[usize]) -> Vec<Vec<usize>>;
}

impl<F> HandRanking for F
where
    F: Fn(&[Card], &[Vec<Card>], &[usize]) -> Vec<Vec<usize>> + Send + Sync,
{
    fn order_hands(&self, board: &[Card], hands: &[Vec<Card>], players: &[usize]) -> Vec<Vec<usize>> {
        self(board, hands, players)
    }
}

/// Adapts a per-hand strength function (board, hole cards) into a ranking.
/// Greater keys are stronger; equal keys chop.
pub struct StrengthRanking<F> {
    strength: F,
}

impl<F, K> StrengthRanking<F>
where
    F: Fn(&[Card], &[Card]) -> K + Send + Sync,
    K: Ord,
{
    pub fn new(strength: F) -> Self {
        Self { strength }
    }
}

impl<F, K> HandRanking for StrengthRanking<F>
where
    F: Fn(&[Card], &[Card]) -> K + Send + Sync,
    K: Ord,
{
    fn order_hands(&self, board: &[Card], hands: &[Vec<Card>], players: &[usize]) -> Vec<Vec<usize>> {
        tiers_by_strength(players, |p| (self.strength)(board, &hands[p]))
    }
}

/// Groups players into tiers of equal strength, strongest first, seats
/// ascending within a tier.
pub fn tiers_by_strength<K: Ord>(players: &[usize], strength: impl Fn(usize) -> K) -> Vec<Vec<usize>> {
    let mut scored = players.iter().map(|&p| (strength(p), p)).collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut tiers: Vec<(K, Vec<usize>)> = Vec::new();
    for (key, player) in scored {
        match tiers.last_mut() {
            Some((strongest, tier)) if *strongest == key => tier.push(player),
            _ => tiers.push((key, vec![player])),
        }
    }
    tiers.into_iter().map(|(_, tier)| tier).collect()
}
