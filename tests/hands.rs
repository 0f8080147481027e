//! Full hands played through the public API.

use pokerkit::ranking::tiers_by_strength;
use pokerkit::state::Operation;
use pokerkit::{
    ActionKind::*, Card, HandRanking, NoLimitOmahaHoldem, NoLimitTexasHoldem, Pointer,
    RejectedAction, State, StrengthRanking,
};
use std::collections::BTreeMap;

fn hands(raw: &[&str]) -> Vec<Vec<Card>> {
    raw.iter().map(|h| Card::parse_cards(h).unwrap()).collect()
}

/// Fixed strength per seat; the board is ignored.
fn by_strength(strengths: Vec<u32>) -> impl HandRanking {
    move |_: &[Card], _: &[Vec<Card>], players: &[usize]| tiers_by_strength(players, |p| strengths[p])
}

fn total_chips(state: &State) -> i64 {
    state.stacks().iter().sum::<i64>() + state.payouts().values().sum::<i64>() + state.rake().values().sum::<i64>()
}

fn three_way() -> State {
    NoLimitTexasHoldem::builder(3)
        .blinds(vec![1, 2])
        .starting_stacks(vec![200, 200, 200])
        .hands(hands(&["AsKs", "QhQd", "7c2d"]))
        .deck(Card::parse_cards("2s3s4s5s6s").unwrap())
        .ranking(by_strength(vec![3, 2, 1]))
        .build()
        .unwrap()
}

#[test]
fn three_way_hand_ends_with_a_river_fold() {
    let mut state = three_way();

    state.act(2, Raise, Some(6)).unwrap();
    state.act(0, Call, None).unwrap();
    state.act(1, Call, None).unwrap();
    assert_eq!(state.street(), 1);
    assert_eq!(state.pot().total_money(), 18);

    state.act(0, Check, None).unwrap();
    state.act(1, Bet, Some(10)).unwrap();
    state.act(2, Call, None).unwrap();
    state.act(0, Fold, None).unwrap();
    assert_eq!(state.street(), 2);
    assert_eq!(state.action_pointer(), Pointer::Actor(1));

    state.act(1, Check, None).unwrap();
    state.act(2, Bet, Some(30)).unwrap();
    state.act(1, Call, None).unwrap();
    assert_eq!(state.street(), 3);

    state.act(1, Bet, Some(50)).unwrap();
    state.act(2, Fold, None).unwrap();

    assert!(state.is_complete());
    assert_eq!(state.payouts(), &BTreeMap::from([(0, 0), (1, 148), (2, 0)]));
    assert_eq!(state.stacks(), &[194, 104, 154]);
    assert_eq!(state.pnl(), BTreeMap::from([(0, -6), (1, 52), (2, -46)]));
    assert_eq!(total_chips(&state), 600);
    assert!(state.runouts().is_empty());
    assert_eq!(
        state.state_string(1).as_deref(),
        Some("NLHE3:QhQd|2s3s4s5s6s|[6]cck[10]cfk[30]c[50]f|0-1/2|200,200,200")
    );
}

#[test]
fn checked_down_hand_goes_to_showdown() {
    let mut state = three_way();
    state.act(2, Call, None).unwrap();
    state.act(0, Call, None).unwrap();
    state.act(1, Check, None).unwrap();
    for _ in 0..3 {
        for player in 0..3 {
            state.act(player, Check, None).unwrap();
        }
    }
    assert!(state.is_complete());
    assert_eq!(state.street(), 4);
    assert_eq!(Card::join(state.board()), "2s3s4s5s6s");
    assert_eq!(state.payouts()[&0], 6);
    assert_eq!(state.player_pnl(0), 4);
    assert_eq!(state.act(0, Check, None), Err(RejectedAction::HandComplete));
}

#[test]
fn all_ins_of_unequal_depth_build_side_pots() {
    let mut state = NoLimitTexasHoldem::builder(4)
        .blinds(vec![1, 2])
        .starting_stacks(vec![50, 100, 150, 200])
        .hands(hands(&["2c2d", "AcAd", "KcKd", "QcQd"]))
        .deck(Card::parse_cards("3h4h5h6h8s").unwrap())
        .ranking(by_strength(vec![1, 4, 3, 2]))
        .build()
        .unwrap();

    state.act(2, Raise, Some(150)).unwrap();
    state.act(3, Call, None).unwrap();
    state.act(0, Call, None).unwrap();
    assert_eq!(state.action_pointer(), Pointer::Actor(1));
    state.act(1, Call, None).unwrap();

    // the covering player has nobody left to bet against
    assert!(state.is_complete());
    assert_eq!(state.pot().balances(), &[50, 100, 150, 150]);
    let layers = state.pot().side_pots(&[0, 1, 2, 3]);
    assert_eq!(layers.iter().map(|l| l.amount()).collect::<Vec<_>>(), vec![200, 150, 100]);
    assert_eq!(layers[2].eligible, vec![2, 3]);

    assert_eq!(state.payouts(), &BTreeMap::from([(0, 0), (1, 350), (2, 100), (3, 0)]));
    assert_eq!(state.pnl(), BTreeMap::from([(0, -50), (1, 250), (2, -50), (3, -150)]));
    assert_eq!(state.runouts().len(), 1);
    assert_eq!(Card::join(&state.runouts()[0]), "3h4h5h6h8s");
    assert_eq!(total_chips(&state), 500);
}

#[test]
fn heads_up_all_in_on_a_known_board() {
    let mut state = NoLimitTexasHoldem::builder(2)
        .blinds(vec![2, 1])
        .starting_stacks(vec![100, 100])
        .hands(hands(&["KsKd", "AsAd"]))
        .board(Card::parse_cards("2c7d9hJc3s").unwrap())
        .deck(Vec::new())
        .all_in_runouts(3)
        .ranking(StrengthRanking::new(|_board: &[Card], hole: &[Card]| hole[0].rank))
        .build()
        .unwrap();

    assert_eq!(state.action_pointer(), Pointer::Actor(1));
    assert!(state.view(0).unwrap().board.is_empty());
    state.act(1, Raise, Some(99)).unwrap();
    state.act(0, Call, None).unwrap();

    assert!(state.is_complete());
    assert!(state.runouts().is_empty());
    assert_eq!(state.payouts(), &BTreeMap::from([(0, 0), (1, 200)]));
    assert_eq!(state.pnl(), BTreeMap::from([(0, -100), (1, 100)]));
}

#[test]
fn ante_only_game_opens_with_a_check() {
    let mut state = NoLimitTexasHoldem::builder(3)
        .ante(1)
        .starting_stacks(vec![20, 20, 20])
        .hands(hands(&["AsKs", "QhQd", "7c2d"]))
        .ranking(by_strength(vec![1, 1, 1]))
        .build()
        .unwrap();
    assert_eq!(state.action_pointer(), Pointer::Actor(2));
    assert_eq!(state.amount_to_call(), 0);
    assert_eq!(state.min_bet(), 1);

    for street in 0..4 {
        assert_eq!(state.street(), street);
        let order = if street == 0 { [2, 0, 1] } else { [0, 1, 2] };
        for player in order {
            state.act(player, Check, None).unwrap();
        }
    }
    assert!(state.is_complete());
    // a three-way chop of 3 chips
    assert_eq!(state.payouts(), &BTreeMap::from([(0, 1), (1, 1), (2, 1)]));
}

#[test]
fn omaha_factory_builds_a_playable_hand() {
    let mut state = NoLimitOmahaHoldem::create_state(
        0,
        vec![1, 2],
        vec![100, 100, 100],
        hands(&["AsKsQsJs", "AhKhQhJh", "2c3c4c5c"]),
        Card::parse_cards("9d8d7d6d2d").unwrap(),
        by_strength(vec![2, 2, 1]),
    )
    .unwrap();

    state.act(2, Fold, None).unwrap();
    state.act(0, Raise, Some(100 - 1)).unwrap();
    state.act(1, Call, None).unwrap();

    assert!(state.is_complete());
    // seats 0 and 1 tie and chop the 200 they put in
    assert_eq!(state.payouts(), &BTreeMap::from([(0, 100), (1, 100), (2, 0)]));
    let runouts = state
        .operations()
        .iter()
        .filter(|op| matches!(op, Operation::RunoutDealing(_)))
        .count();
    assert_eq!(runouts, 1);
}
