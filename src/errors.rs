//! Error types for the Royale roulette engine
//!
//! Player mistakes (insufficient balance, betting mid-spin, spinning without
//! bets) are not errors: the session rejects them and reports through its
//! status message. The types here cover the surface around the engine:
//! configuration, batch simulation and the table's event queue.

use crate::games::simulation::SimulationError;
use std::fmt;

/// Root error type for all Royale operations
#[derive(Debug)]
pub enum RoyaleError {
    /// Configuration related errors
    Configuration(ConfigurationError),

    /// Table event queue errors
    Table(TableError),

    /// Simulation refused to run
    Simulation(SimulationError),

    /// Terminal / file I/O errors
    Io(std::io::Error),
}

/// Configuration and validation errors
#[derive(Debug)]
pub enum ConfigurationError {
    MissingRequired(String),
    InvalidValue { field: String, value: String, reason: String },
    LoadFailed(String),
    SaveFailed(String),
}

/// Errors talking to a running table task
#[derive(Debug)]
pub enum TableError {
    /// The table task has stopped and no longer accepts commands
    Closed,
    /// The table task dropped a reply channel before answering
    NoReply,
    /// The table task panicked or was cancelled
    TaskFailed(String),
}

impl fmt::Display for RoyaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoyaleError::Configuration(e) => write!(f, "Configuration error: {}", e),
            RoyaleError::Table(e) => write!(f, "Table error: {}", e),
            RoyaleError::Simulation(e) => write!(f, "Simulation error: {}", e),
            RoyaleError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MissingRequired(field) => write!(f, "Missing required field: {}", field),
            ConfigurationError::InvalidValue { field, value, reason } => {
                write!(f, "Invalid value for {}: '{}' ({})", field, value, reason)
            }
            ConfigurationError::LoadFailed(msg) => write!(f, "Failed to load configuration: {}", msg),
            ConfigurationError::SaveFailed(msg) => write!(f, "Failed to save configuration: {}", msg),
        }
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Closed => write!(f, "Table is closed"),
            TableError::NoReply => write!(f, "Table did not reply"),
            TableError::TaskFailed(msg) => write!(f, "Table task failed: {}", msg),
        }
    }
}

impl std::error::Error for RoyaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoyaleError::Configuration(e) => Some(e),
            RoyaleError::Table(e) => Some(e),
            RoyaleError::Simulation(e) => Some(e),
            RoyaleError::Io(e) => Some(e),
        }
    }
}

impl std::error::Error for ConfigurationError {}
impl std::error::Error for TableError {}

impl From<ConfigurationError> for RoyaleError {
    fn from(e: ConfigurationError) -> Self {
        RoyaleError::Configuration(e)
    }
}

impl From<TableError> for RoyaleError {
    fn from(e: TableError) -> Self {
        RoyaleError::Table(e)
    }
}

impl From<SimulationError> for RoyaleError {
    fn from(e: SimulationError) -> Self {
        RoyaleError::Simulation(e)
    }
}

impl From<std::io::Error> for RoyaleError {
    fn from(e: std::io::Error) -> Self {
        RoyaleError::Io(e)
    }
}

impl From<serde_json::Error> for RoyaleError {
    fn from(e: serde_json::Error) -> Self {
        RoyaleError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// Convenience type alias for Results
pub type RoyaleResult<T> = Result<T, RoyaleError>;
