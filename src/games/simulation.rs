//! Batch simulation
//!
//! Plays the same wager round after round on a fresh session and reports what
//! the table paid back. Useful for checking the payout table against the
//! expected single-zero house edge of 1/37.

use crate::config::{ConfigBuilder, RoyaleConfig};
use crate::games::ledger::{validate_bet, LedgerError};
use crate::games::session::GameSession;
use crate::games::types::Bet;
use crate::games::wheel::OutcomeSource;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// What to simulate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub rounds: usize,
    pub bet: Bet,
    pub starting_balance: u64,
}

/// Aggregated simulation results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub rounds_requested: usize,
    pub rounds_played: usize,
    pub rounds_won: usize,
    pub total_staked: u64,
    pub total_returned: u64,
    pub win_rate: f64,
    pub house_edge: f64,
    pub final_balance: u64,
    /// Balance ran out before all rounds were played
    pub stopped_early: bool,
    pub execution_time: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Simulation needs at least one round")]
    NoRounds,

    #[error("Invalid wager: {0}")]
    InvalidBet(#[from] LedgerError),
}

/// Run the simulation with the given outcome source
pub fn run_simulation(
    config: &SimulationConfig,
    outcomes: impl OutcomeSource + 'static,
) -> Result<SimulationReport, SimulationError> {
    if config.rounds == 0 {
        return Err(SimulationError::NoRounds);
    }

    validate_bet(&config.bet)?;

    let table_config: RoyaleConfig = ConfigBuilder::new()
        .starting_balance(config.starting_balance)
        .build();
    let mut session = GameSession::with_outcomes(&table_config, outcomes);

    let start_time = Instant::now();
    let mut report = SimulationReport {
        rounds_requested: config.rounds,
        rounds_played: 0,
        rounds_won: 0,
        total_staked: 0,
        total_returned: 0,
        win_rate: 0.0,
        house_edge: 0.0,
        final_balance: config.starting_balance,
        stopped_early: false,
        execution_time: Duration::ZERO,
    };

    for _ in 0..config.rounds {
        if session.balance() < config.bet.amount {
            report.stopped_early = true;
            break;
        }

        let bet = config.bet.clone();
        session.place_bet(bet.category, bet.target, bet.amount);

        let Some(ticket) = session.spin() else {
            report.stopped_early = true;
            break;
        };
        let Some(settlement) = session.complete_spin(ticket.round_id) else {
            report.stopped_early = true;
            break;
        };

        report.rounds_played += 1;
        report.total_staked = report.total_staked.saturating_add(settlement.total_staked);
        report.total_returned = report.total_returned.saturating_add(settlement.total_winnings);
        if settlement.is_win() {
            report.rounds_won += 1;
        }
    }

    report.final_balance = session.balance();
    report.execution_time = start_time.elapsed();
    if report.rounds_played > 0 {
        report.win_rate = report.rounds_won as f64 / report.rounds_played as f64;
    }
    if report.total_staked > 0 {
        report.house_edge =
            (report.total_staked as f64 - report.total_returned as f64) / report.total_staked as f64;
    }

    info!(
        rounds = report.rounds_played,
        win_rate = report.win_rate,
        house_edge = report.house_edge,
        "simulation finished"
    );

    Ok(report)
}

impl SimulationReport {
    /// Human readable summary
    pub fn render(&self) -> String {
        let mut report = String::new();

        report.push_str("Simulation Results\n");
        report.push_str(&format!("{}\n", "=".repeat(40)));
        report.push_str(&format!("Rounds: {} of {} played\n", self.rounds_played, self.rounds_requested));
        if self.stopped_early {
            report.push_str("Stopped early: balance exhausted\n");
        }
        report.push_str(&format!("Win Rate: {:.2}%\n", self.win_rate * 100.0));
        report.push_str(&format!("House Edge: {:.2}%\n", self.house_edge * 100.0));
        report.push_str(&format!("Total Staked: {}, Total Returned: {}\n", self.total_staked, self.total_returned));
        report.push_str(&format!("Final Balance: {}\n", self.final_balance));
        report.push_str(&format!("Execution Time: {:?}\n", self.execution_time));

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::types::BetCategory;
    use crate::games::wheel::{FixedOutcomes, RandomOutcome};

    fn config(rounds: usize, bet: Bet, starting_balance: u64) -> SimulationConfig {
        SimulationConfig { rounds, bet, starting_balance }
    }

    #[test]
    fn test_scripted_simulation() {
        // red, black, zero
        let outcomes = FixedOutcomes::sequence([32, 15, 0]);
        let report = run_simulation(&config(6, Bet::outside(BetCategory::Red, 10), 1000), outcomes).unwrap();

        assert_eq!(report.rounds_played, 6);
        assert_eq!(report.rounds_won, 2);
        assert_eq!(report.total_staked, 60);
        assert_eq!(report.total_returned, 40);
        assert_eq!(report.final_balance, 980);
        assert!(!report.stopped_early);
    }

    #[test]
    fn test_stops_when_broke() {
        let report = run_simulation(
            &config(100, Bet::straight(1, 10), 30),
            FixedOutcomes::always(0),
        ).unwrap();

        assert_eq!(report.rounds_played, 3);
        assert!(report.stopped_early);
        assert_eq!(report.final_balance, 0);
        assert_eq!(report.house_edge, 1.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            run_simulation(&config(0, Bet::straight(1, 10), 30), FixedOutcomes::always(0)),
            Err(SimulationError::NoRounds)
        ));
        assert!(matches!(
            run_simulation(&config(5, Bet::straight(40, 10), 30), FixedOutcomes::always(0)),
            Err(SimulationError::InvalidBet(LedgerError::InvalidNumber(40)))
        ));
    }

    #[test]
    fn test_huge_stakes_do_not_overflow_totals() {
        let report = run_simulation(
            &config(5, Bet::outside(BetCategory::Red, u64::MAX / 2), u64::MAX),
            FixedOutcomes::always(32),
        ).unwrap();

        assert_eq!(report.rounds_played, 5);
        assert_eq!(report.rounds_won, 5);
        assert_eq!(report.total_staked, u64::MAX);
        assert_eq!(report.total_returned, u64::MAX);
    }

    #[test]
    fn test_even_money_edge_converges() {
        let report = run_simulation(
            &config(50_000, Bet::outside(BetCategory::Black, 1), 1_000_000),
            RandomOutcome::from_seed(11),
        ).unwrap();

        // Expected edge is 1/37, about 2.7%
        assert!(report.house_edge > -0.01 && report.house_edge < 0.07, "edge {}", report.house_edge);
        assert!(report.render().contains("Rounds: 50000 of 50000"));
    }
}
