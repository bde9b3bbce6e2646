//! Game session: the single owner of balance, bets and round lifecycle.
//!
//! A round is two steps. `spin` locks the table, draws the winning number and
//! hands back a [`PendingSpin`] ticket; `complete_spin` applies that ticket
//! once the wheel has finished turning. Only the ticket of the round in flight
//! is honoured, so a round resolves exactly once.
//!
//! Player mistakes never produce errors. They leave the state untouched apart
//! from the status message.

use crate::config::RoyaleConfig;
use crate::games::engine::resolve_round;
use crate::games::ledger::{BetLedger, LedgerError};
use crate::games::types::{Bet, BetCategory, BetTarget, RoundSettlement, SessionState};
use crate::games::wheel::{rotation_for, OutcomeSource, RandomOutcome, POCKETS};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Past winning numbers kept for display
pub const HISTORY_LIMIT: usize = 10;

pub const INSUFFICIENT_BALANCE_MESSAGE: &str = "Insufficient balance!";
pub const CLEARED_MESSAGE: &str = "All bets cleared.";
pub const NO_BETS_MESSAGE: &str = "Please place a bet first!";
pub const SPINNING_MESSAGE: &str = "The wheel is spinning...";

/// Handle for an accepted spin awaiting resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSpin {
    pub round_id: u64,
    /// Rotation the wheel should animate to
    pub rotation: f64,
}

struct InFlight {
    round_id: u64,
    outcome: u8,
}

pub struct GameSession {
    ledger: BetLedger,
    outcomes: Box<dyn OutcomeSource>,
    in_flight: Option<InFlight>,
    last_result: Option<u8>,
    history: VecDeque<u8>,
    message: String,
    rotation: f64,
    full_rotations: u32,
    rounds_started: u64,
    last_settlement: Option<RoundSettlement>,
}

impl GameSession {
    /// Session with outcomes drawn from the configured generator
    pub fn new(config: &RoyaleConfig) -> Self {
        Self::with_outcomes(config, RandomOutcome::from_optional_seed(config.rng.seed))
    }

    /// Session with an injected outcome source
    pub fn with_outcomes(config: &RoyaleConfig, outcomes: impl OutcomeSource + 'static) -> Self {
        Self {
            ledger: BetLedger::new(config.table.starting_balance),
            outcomes: Box::new(outcomes),
            in_flight: None,
            last_result: None,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            message: config.table.welcome_message.clone(),
            rotation: 0.0,
            full_rotations: config.spin.full_rotations,
            rounds_started: 0,
            last_settlement: None,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Put a wager on the table.
    ///
    /// Ignored entirely while the wheel is spinning.
    pub fn place_bet(&mut self, category: BetCategory, target: BetTarget, amount: u64) -> SessionState {
        if self.is_spinning() {
            return self.state();
        }

        let bet = Bet::new(category, target, amount);
        let label = bet.target.to_string();

        self.message = match self.ledger.place(bet) {
            Ok(()) => format!("Placed {} on {}", amount, label),
            Err(LedgerError::InsufficientBalance { .. }) => INSUFFICIENT_BALANCE_MESSAGE.to_string(),
            Err(e) => format!("Invalid bet: {}", e),
        };

        self.state()
    }

    /// Take every bet back, refunding the stakes
    pub fn clear_bets(&mut self) -> SessionState {
        if self.is_spinning() {
            return self.state();
        }

        self.ledger.clear();
        self.message = CLEARED_MESSAGE.to_string();
        self.state()
    }

    /// Start a round. The winning number is drawn now and applied by
    /// [`GameSession::complete_spin`].
    pub fn spin(&mut self) -> Option<PendingSpin> {
        if self.is_spinning() {
            return None;
        }

        if self.ledger.is_empty() {
            self.message = NO_BETS_MESSAGE.to_string();
            return None;
        }

        let outcome = self.draw_outcome();
        self.rounds_started += 1;
        let round_id = self.rounds_started;

        self.rotation = rotation_for(self.rotation, outcome, self.full_rotations);
        self.in_flight = Some(InFlight { round_id, outcome });
        self.last_result = None;
        self.message = SPINNING_MESSAGE.to_string();

        info!(round_id, bets = self.ledger.bets().len(), staked = self.ledger.total_staked(), "spin accepted");

        Some(PendingSpin {
            round_id,
            rotation: self.rotation,
        })
    }

    /// Draw from the outcome source, folding anything off the wheel back onto it
    fn draw_outcome(&mut self) -> u8 {
        let drawn = self.outcomes.draw();
        if usize::from(drawn) < POCKETS {
            return drawn;
        }

        let outcome = drawn % POCKETS as u8;
        warn!(drawn, outcome, "outcome source drew a number off the wheel");
        outcome
    }

    /// Resolve the round in flight. Returns `None` for a stale or unknown ticket.
    pub fn complete_spin(&mut self, round_id: u64) -> Option<RoundSettlement> {
        let outcome = match &self.in_flight {
            Some(flight) if flight.round_id == round_id => flight.outcome,
            _ => {
                warn!(round_id, "ignoring resolution for a round that is not in flight");
                return None;
            }
        };
        self.in_flight = None;

        let settlement = resolve_round(round_id, self.ledger.take_bets(), outcome);
        self.ledger.credit(settlement.total_winnings);

        self.history.push_front(outcome);
        self.history.truncate(HISTORY_LIMIT);
        self.last_result = Some(outcome);

        self.message = if settlement.is_win() {
            format!(
                "Winner! Number {} ({}). Won {} chips!",
                outcome,
                settlement.color.to_string().to_uppercase(),
                settlement.total_winnings
            )
        } else {
            format!("Better luck next time. Number was {}.", outcome)
        };

        info!(
            round_id,
            outcome,
            color = %settlement.color,
            staked = settlement.total_staked,
            won = settlement.total_winnings,
            balance = self.ledger.balance(),
            "round resolved"
        );
        debug!(results = ?settlement.results, "bet results");

        self.last_settlement = Some(settlement.clone());
        Some(settlement)
    }

    /// Read-only snapshot of the session
    pub fn state(&self) -> SessionState {
        SessionState {
            balance: self.ledger.balance(),
            active_bets: self.ledger.bets().to_vec(),
            is_spinning: self.is_spinning(),
            last_result: self.last_result,
            history: self.history.iter().copied().collect(),
            message: self.message.clone(),
            rotation: self.rotation,
            last_settlement: self.last_settlement.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::games::wheel::FixedOutcomes;

    fn session(balance: u64, outcomes: FixedOutcomes) -> GameSession {
        let config = ConfigBuilder::new().starting_balance(balance).build();
        GameSession::with_outcomes(&config, outcomes)
    }

    fn play_round(session: &mut GameSession) -> Option<RoundSettlement> {
        let ticket = session.spin()?;
        session.complete_spin(ticket.round_id)
    }

    #[test]
    fn test_initial_state() {
        let state = session(1000, FixedOutcomes::always(0)).state();
        assert_eq!(state.balance, 1000);
        assert!(state.active_bets.is_empty());
        assert!(!state.is_spinning);
        assert_eq!(state.last_result, None);
        assert!(state.history.is_empty());
        assert_eq!(state.message, "Welcome to Monte Carlo Royale. Place your bets!");
    }

    #[test]
    fn test_place_bet_message() {
        let mut session = session(1000, FixedOutcomes::always(0));

        let state = session.place_bet(BetCategory::Straight, BetTarget::Number(17), 10);
        assert_eq!(state.message, "Placed 10 on 17");
        assert_eq!(state.balance, 990);

        let state = session.place_bet(BetCategory::Low, BetTarget::for_category(BetCategory::Low), 5);
        assert_eq!(state.message, "Placed 5 on 1-18");
        assert_eq!(state.total_staked(), 15);
    }

    #[test]
    fn test_invalid_bet_is_rejected() {
        let mut session = session(100, FixedOutcomes::always(0));
        let state = session.place_bet(BetCategory::Straight, BetTarget::Number(40), 10);

        assert_eq!(state.balance, 100);
        assert!(state.active_bets.is_empty());
        assert!(state.message.starts_with("Invalid bet:"));
    }

    #[test]
    fn test_spin_draws_before_resolution() {
        let mut session = session(1000, FixedOutcomes::sequence([17, 32]));
        session.place_bet(BetCategory::Straight, BetTarget::Number(17), 10);

        let ticket = session.spin().expect("spin accepted");
        let spinning = session.state();
        assert!(spinning.is_spinning);
        assert_eq!(spinning.last_result, None);
        assert_eq!(spinning.message, SPINNING_MESSAGE);
        assert!(spinning.rotation > 0.0);

        let settlement = session.complete_spin(ticket.round_id).expect("round resolves");
        assert_eq!(settlement.outcome, 17);
        assert_eq!(session.balance(), 1350);
    }

    #[test]
    fn test_spinning_guards() {
        let mut session = session(1000, FixedOutcomes::always(5));
        session.place_bet(BetCategory::Odd, BetTarget::for_category(BetCategory::Odd), 100);
        let ticket = session.spin().expect("spin accepted");
        let before = session.state();

        assert_eq!(session.place_bet(BetCategory::Red, BetTarget::for_category(BetCategory::Red), 10), before);
        assert_eq!(session.clear_bets(), before);
        assert!(session.spin().is_none());
        assert_eq!(session.state(), before);

        assert!(session.complete_spin(ticket.round_id).is_some());
        assert_eq!(session.balance(), 1100);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut session = session(1000, FixedOutcomes::always(5));
        session.place_bet(BetCategory::Odd, BetTarget::for_category(BetCategory::Odd), 100);
        let ticket = session.spin().expect("spin accepted");

        assert!(session.complete_spin(ticket.round_id + 1).is_none());
        assert!(session.is_spinning());

        assert!(session.complete_spin(ticket.round_id).is_some());
        // A second delivery of the same ticket does nothing
        let after = session.state();
        assert!(session.complete_spin(ticket.round_id).is_none());
        assert_eq!(session.state(), after);
    }

    #[test]
    fn test_empty_spin_only_sets_message() {
        let mut session = session(1000, FixedOutcomes::always(5));
        let before = session.state();

        assert!(session.spin().is_none());
        let after = session.state();

        assert_eq!(after.message, NO_BETS_MESSAGE);
        assert_eq!(SessionState { message: before.message.clone(), ..after }, before);
    }

    #[test]
    fn test_win_and_loss_messages() {
        let mut session = session(1000, FixedOutcomes::sequence([32, 17]));

        session.place_bet(BetCategory::Red, BetTarget::for_category(BetCategory::Red), 50);
        play_round(&mut session);
        assert_eq!(session.message(), "Winner! Number 32 (RED). Won 100 chips!");

        session.place_bet(BetCategory::Even, BetTarget::for_category(BetCategory::Even), 20);
        play_round(&mut session);
        assert_eq!(session.message(), "Better luck next time. Number was 17.");
        assert_eq!(session.balance(), 1030);
    }

    #[test]
    fn test_history_is_capped_most_recent_first() {
        let mut session = session(1000, FixedOutcomes::sequence(0..15));

        for _ in 0..12 {
            session.place_bet(BetCategory::Straight, BetTarget::Number(36), 1);
            play_round(&mut session);
        }

        let state = session.state();
        assert_eq!(state.history.len(), HISTORY_LIMIT);
        assert_eq!(state.history[0], 11);
        assert_eq!(state.history[9], 2);
        assert_eq!(state.last_result, Some(11));
    }

    #[test]
    fn test_round_consumes_all_bets() {
        let mut session = session(1000, FixedOutcomes::always(0));
        session.place_bet(BetCategory::Straight, BetTarget::Number(0), 10);
        session.place_bet(BetCategory::Red, BetTarget::for_category(BetCategory::Red), 10);

        let settlement = play_round(&mut session).expect("round resolves");
        assert_eq!(settlement.results.len(), 2);
        assert!(session.state().active_bets.is_empty());
        assert_eq!(session.balance(), 980 + 360);
        assert_eq!(session.state().last_settlement, Some(settlement));
    }

    struct OffTheWheel;

    impl OutcomeSource for OffTheWheel {
        fn draw(&mut self) -> u8 {
            99
        }
    }

    #[test]
    fn test_out_of_range_draw_stays_on_wheel() {
        let config = ConfigBuilder::new().build();
        let mut session = GameSession::with_outcomes(&config, OffTheWheel);
        session.place_bet(BetCategory::Straight, BetTarget::Number(25), 10);

        let settlement = play_round(&mut session).unwrap();
        let state = session.state();

        assert_eq!(settlement.outcome, 25);
        assert_eq!(state.last_result, Some(25));
        assert_eq!(state.history, vec![25]);
        assert_eq!(state.balance, 990 + 360);
    }
}
