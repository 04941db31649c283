//! Error types surfaced to the player
//!
//! Nothing here is fatal to the process: the worst outcome is an unsaved
//! score or a stale leaderboard.

use crate::ledger::LedgerError;
use crate::wallet::WalletError;

/// Error type for session-level operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// A wallet must be connected before a run can start
    #[error("Please connect your wallet first!")]
    IdentityNotConnected,

    /// The ledger rejected or never received the score
    #[error("Error saving score: {0}")]
    WriteFailed(#[source] LedgerError),

    /// The leaderboard query itself failed
    #[error("Error loading leaderboard: {0}")]
    QueryFailed(#[source] LedgerError),

    /// One leaderboard record could not be resolved
    #[error("Error fetching score data for {id}: {source}")]
    PayloadFetchFailed {
        id: String,
        #[source]
        source: LedgerError,
    },

    /// Connect or fund failed
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// Invalid settings
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::Config(e.to_string())
    }
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, GameError>;
