//! Bet ledger: the player's balance and the wagers currently on the table.
//!
//! Every stake is debited when placed and leaves the ledger exactly once,
//! either refunded by `clear` or handed to the round engine by `take_bets`.

use crate::games::types::{Bet, BetCategory, BetTarget};
use tracing::{debug, warn};

/// Reasons a wager is refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Bet amount must be > 0")]
    ZeroAmount,

    #[error("Invalid number: {0} (must be 0-36)")]
    InvalidNumber(u8),

    #[error("Straight bets need a number")]
    MissingNumber,

    #[error("Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u64, available: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetLedger {
    balance: u64,
    bets: Vec<Bet>,
}

impl BetLedger {
    pub fn new(balance: u64) -> Self {
        Self {
            balance,
            bets: Vec::new(),
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    /// Sum of all active stakes
    pub fn total_staked(&self) -> u64 {
        self.bets.iter().map(|b| b.amount).sum()
    }

    /// Debit the stake and record the wager
    pub fn place(&mut self, bet: Bet) -> Result<(), LedgerError> {
        validate_bet(&bet)?;

        let remaining = self.balance.checked_sub(bet.amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: bet.amount,
                available: self.balance,
            })?;

        debug!(category = %bet.category, target = %bet.target, amount = bet.amount, "bet placed");
        self.balance = remaining;
        self.bets.push(bet);
        Ok(())
    }

    /// Refund every active stake. Returns the amount refunded.
    pub fn clear(&mut self) -> u64 {
        let refunded = self.total_staked();
        self.balance = self.balance.saturating_add(refunded);
        self.bets.clear();
        debug!(refunded, "bets cleared");
        refunded
    }

    /// Hand the active wagers to round resolution. Stakes are not refunded.
    pub fn take_bets(&mut self) -> Vec<Bet> {
        std::mem::take(&mut self.bets)
    }

    /// Add round winnings to the balance
    pub fn credit(&mut self, amount: u64) {
        match self.balance.checked_add(amount) {
            Some(balance) => self.balance = balance,
            None => {
                warn!(balance = self.balance, amount, "balance saturated, winnings truncated");
                self.balance = u64::MAX;
            }
        }
    }
}

/// Shape checks that do not depend on the balance
pub fn validate_bet(bet: &Bet) -> Result<(), LedgerError> {
    if bet.amount == 0 {
        return Err(LedgerError::ZeroAmount);
    }

    // Outside bets carry a display label only
    if bet.category == BetCategory::Straight {
        match bet.target {
            BetTarget::Number(n) if n > 36 => return Err(LedgerError::InvalidNumber(n)),
            BetTarget::Number(_) => {}
            BetTarget::Label(_) => return Err(LedgerError::MissingNumber),
        }
    }

    Ok(())
}
