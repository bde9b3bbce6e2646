use crate::games::wheel::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported wager categories on a single-zero table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum BetCategory {
    Straight,
    Red,
    Black,
    Even,
    Odd,
    /// 1-18
    Low,
    /// 19-36
    High,
}

impl BetCategory {
    pub const ALL: [BetCategory; 7] = [
        BetCategory::Straight,
        BetCategory::Red,
        BetCategory::Black,
        BetCategory::Even,
        BetCategory::Odd,
        BetCategory::Low,
        BetCategory::High,
    ];

    /// Label printed on the betting surface for this category
    pub fn label(&self) -> &'static str {
        match self {
            BetCategory::Straight => "STRAIGHT",
            BetCategory::Red => "RED",
            BetCategory::Black => "BLACK",
            BetCategory::Even => "EVEN",
            BetCategory::Odd => "ODD",
            BetCategory::Low => "1-18",
            BetCategory::High => "19-36",
        }
    }
}

impl fmt::Display for BetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetCategory::Straight => write!(f, "STRAIGHT"),
            BetCategory::Red => write!(f, "RED"),
            BetCategory::Black => write!(f, "BLACK"),
            BetCategory::Even => write!(f, "EVEN"),
            BetCategory::Odd => write!(f, "ODD"),
            BetCategory::Low => write!(f, "LOW"),
            BetCategory::High => write!(f, "HIGH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown bet category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for BetCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "straight" | "number" => Ok(BetCategory::Straight),
            "red" => Ok(BetCategory::Red),
            "black" => Ok(BetCategory::Black),
            "even" => Ok(BetCategory::Even),
            "odd" => Ok(BetCategory::Odd),
            "low" | "1-18" => Ok(BetCategory::Low),
            "high" | "19-36" => Ok(BetCategory::High),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// What a wager points at: a pocket for straight bets, otherwise a display label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BetTarget {
    Number(u8),
    Label(String),
}

impl BetTarget {
    /// Default target shown for a category
    pub fn for_category(category: BetCategory) -> Self {
        BetTarget::Label(category.label().to_string())
    }

    pub fn number(&self) -> Option<u8> {
        match self {
            BetTarget::Number(n) => Some(*n),
            BetTarget::Label(_) => None,
        }
    }
}

impl fmt::Display for BetTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetTarget::Number(n) => write!(f, "{}", n),
            BetTarget::Label(label) => write!(f, "{}", label),
        }
    }
}

/// A placed wager. The stake has already left the balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bet {
    pub category: BetCategory,
    pub target: BetTarget,
    pub amount: u64,
}

impl Bet {
    pub fn new(category: BetCategory, target: BetTarget, amount: u64) -> Self {
        Self { category, target, amount }
    }

    /// Single-number bet
    pub fn straight(number: u8, amount: u64) -> Self {
        Self::new(BetCategory::Straight, BetTarget::Number(number), amount)
    }

    /// Even-money bet labelled with its category
    pub fn outside(category: BetCategory, amount: u64) -> Self {
        Self::new(category, BetTarget::for_category(category), amount)
    }
}

/// Outcome of one wager in a resolved round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BetResult {
    pub bet: Bet,
    pub won: bool,
    /// 0 if lost, includes the returned stake if won
    pub payout: u64,
}

/// Everything a resolved round produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundSettlement {
    pub round_id: u64,
    pub outcome: u8,
    pub color: Color,
    pub results: Vec<BetResult>,
    pub total_staked: u64,
    pub total_winnings: u64,
}

impl RoundSettlement {
    /// Winnings minus stakes; negative when the house came out ahead
    pub fn net_result(&self) -> i128 {
        i128::from(self.total_winnings) - i128::from(self.total_staked)
    }

    pub fn is_win(&self) -> bool {
        self.total_winnings > 0
    }
}

/// Observable game state handed to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub balance: u64,
    pub active_bets: Vec<Bet>,
    pub is_spinning: bool,
    pub last_result: Option<u8>,
    /// Most recent first
    pub history: Vec<u8>,
    pub message: String,
    /// Wheel rotation in degrees; only ever grows
    pub rotation: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_settlement: Option<RoundSettlement>,
}

impl SessionState {
    /// Sum of stakes currently on the table
    pub fn total_staked(&self) -> u64 {
        self.active_bets.iter().map(|b| b.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("red".parse::<BetCategory>(), Ok(BetCategory::Red));
        assert_eq!("STRAIGHT".parse::<BetCategory>(), Ok(BetCategory::Straight));
        assert_eq!("19-36".parse::<BetCategory>(), Ok(BetCategory::High));
        assert!("column".parse::<BetCategory>().is_err());
    }

    #[test]
    fn test_default_targets() {
        assert_eq!(Bet::outside(BetCategory::Low, 5).target.to_string(), "1-18");
        assert_eq!(Bet::outside(BetCategory::Red, 5).target.to_string(), "RED");
        assert_eq!(Bet::straight(17, 5).target.number(), Some(17));
    }

    #[test]
    fn test_bet_serialization() {
        let json = serde_json::to_string(&Bet::straight(0, 25)).unwrap();
        assert_eq!(json, r#"{"category":"STRAIGHT","target":0,"amount":25}"#);

        let bet: Bet = serde_json::from_str(r#"{"category":"RED","target":"RED","amount":10}"#).unwrap();
        assert_eq!(bet, Bet::outside(BetCategory::Red, 10));
    }
}
