//! Fixed European payout table (net profit per chip staked)

use crate::games::types::BetCategory;

impl BetCategory {
    /// Net multiplier, paid on top of the returned stake
    pub fn multiplier(&self) -> u64 {
        match self {
            BetCategory::Straight => 35,
            BetCategory::Red
            | BetCategory::Black
            | BetCategory::Even
            | BetCategory::Odd
            | BetCategory::Low
            | BetCategory::High => 1,
        }
    }
}

/// Amount returned for a winning stake: stake + stake * multiplier
pub fn payout_for(category: BetCategory, amount: u64) -> u64 {
    amount.saturating_add(amount.saturating_mul(category.multiplier()))
}
