pub mod types;
pub mod wheel;
pub mod payout;
pub mod ledger;
pub mod engine;
pub mod session;
pub mod table;
pub mod simulation;

pub use types::*;
pub use wheel::{color_of, Color, FixedOutcomes, OutcomeSource, RandomOutcome};
pub use ledger::{BetLedger, LedgerError};
pub use session::{GameSession, PendingSpin, HISTORY_LIMIT};
pub use table::{RouletteTable, TableHandle};
pub use simulation::{run_simulation, SimulationConfig, SimulationReport};
