//! Royale - single-player European roulette
//!
//! Bet resolution and round lifecycle engine. A [`GameSession`] owns the
//! balance and the wagers on the table; [`RouletteTable`] runs a session on a
//! single task so that a spin can resolve after the wheel has visibly turned
//! without any bet sneaking in meanwhile.

pub mod config;
pub mod errors;
pub mod games;

pub use config::{ConfigBuilder, ConfigLoader, RoyaleConfig};
pub use errors::{RoyaleError, RoyaleResult};
pub use games::{
    Bet, BetCategory, BetTarget, GameSession, OutcomeSource, RouletteTable, SessionState,
    TableHandle,
};
