//! Round resolution: evaluates every wager against a winning number.
//!
//! Pure and total. The caller owns balance updates and history.

use crate::games::payout::payout_for;
use crate::games::types::{Bet, BetCategory, BetResult, RoundSettlement};
use crate::games::wheel::{color_of, Color};

/// Whether `bet` wins when the ball lands on `winning`
pub fn bet_wins(bet: &Bet, winning: u8) -> bool {
    match bet.category {
        BetCategory::Straight => bet.target.number() == Some(winning),
        BetCategory::Red => color_of(winning) == Color::Red,
        BetCategory::Black => color_of(winning) == Color::Black,
        // Zero is neither even nor odd at the table
        BetCategory::Even => winning != 0 && winning % 2 == 0,
        BetCategory::Odd => winning % 2 == 1,
        BetCategory::Low => (1..=18).contains(&winning),
        BetCategory::High => (19..=36).contains(&winning),
    }
}

/// Evaluate a single bet against the winning number
pub fn evaluate_bet(bet: &Bet, winning: u8) -> BetResult {
    let won = bet_wins(bet, winning);
    let payout = if won { payout_for(bet.category, bet.amount) } else { 0 };

    BetResult {
        bet: bet.clone(),
        won,
        payout,
    }
}

/// Resolve a whole round. Every bet is consumed, winners and losers alike.
pub fn resolve_round(round_id: u64, bets: Vec<Bet>, outcome: u8) -> RoundSettlement {
    let total_staked = bets.iter().fold(0u64, |acc, b| acc.saturating_add(b.amount));

    let results: Vec<BetResult> = bets.iter()
        .map(|bet| evaluate_bet(bet, outcome))
        .collect();

    let total_winnings = results.iter().fold(0u64, |acc, r| acc.saturating_add(r.payout));

    RoundSettlement {
        round_id,
        outcome,
        color: color_of(outcome),
        results,
        total_staked,
        total_winnings,
    }
}
