//! Score ledger: the external append-only store holding every saved score
//!
//! The game only needs two seams: [`LedgerWriter`] to append one record and
//! [`LedgerQuery`] to list records by tag and resolve their payloads.
//! Transport, signing and transaction formats live behind those traits.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::consts::GAME_ID;

#[cfg(target_arch = "wasm32")]
pub mod bridge;
pub mod memory;

pub use memory::MemoryLedger;

/// Display name written when the player never set one
pub const ANONYMOUS: &str = "Anonymous";

/// Tag names attached to every score write
pub mod tags {
    pub const APPLICATION_ID: &str = "application-id";
    pub const WALLET: &str = "wallet";
    pub const USERNAME: &str = "username";
    pub const SCORE: &str = "score";
    pub const CONTENT_TYPE: &str = "Content-Type";
}

/// Errors reported by a ledger collaborator
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("account is not funded")]
    Unfunded,

    #[error("record {0} not found")]
    NotFound(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::InvalidPayload(e.to_string())
    }
}

/// One finished run, ready to be written. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    wallet: String,
    username: Option<String>,
    score: u64,
    timestamp: u64,
    game: String,
}

/// Wire shape of a record payload
#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    wallet: String,
    username: String,
    score: u64,
    timestamp: u64,
    #[serde(default = "default_game")]
    game: String,
}

fn default_game() -> String {
    GAME_ID.to_string()
}

impl ScoreRecord {
    pub fn new(
        wallet: impl Into<String>,
        username: Option<String>,
        score: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            wallet: wallet.into(),
            username,
            score,
            timestamp,
            game: GAME_ID.to_string(),
        }
    }

    /// Same record under a different game id (page-configured deployments)
    pub fn with_game(mut self, game: impl Into<String>) -> Self {
        self.game = game.into();
        self
    }

    pub fn wallet(&self) -> &str {
        &self.wallet
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Name shown to other players
    pub fn display_name(&self) -> &str {
        self.username().unwrap_or(ANONYMOUS)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    /// Serialize to the JSON payload stored on the ledger
    pub fn to_payload(&self) -> Result<String, LedgerError> {
        let payload = Payload {
            wallet: self.wallet.clone(),
            username: self.display_name().to_string(),
            score: self.score,
            timestamp: self.timestamp,
            game: self.game.clone(),
        };
        Ok(serde_json::to_string(&payload)?)
    }

    /// Parse a payload fetched from the ledger
    pub fn from_payload(json: &str) -> Result<Self, LedgerError> {
        let payload: Payload = serde_json::from_str(json)?;
        let username = (payload.username != ANONYMOUS).then_some(payload.username);
        Ok(Self {
            wallet: payload.wallet,
            username,
            score: payload.score,
            timestamp: payload.timestamp,
            game: payload.game,
        })
    }
}

/// Key/value pair attached to a ledger record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Flat tag set for a score write
pub fn score_tags(record: &ScoreRecord) -> Vec<Tag> {
    vec![
        Tag::new(tags::APPLICATION_ID, record.game()),
        Tag::new(tags::WALLET, record.wallet()),
        Tag::new(tags::USERNAME, record.display_name()),
        Tag::new(tags::SCORE, record.score().to_string()),
        Tag::new(tags::CONTENT_TYPE, "application/json"),
    ]
}

/// Confirmation of a successful write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
}

/// One row of a tag query; the payload is fetched separately
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub id: String,
}

/// Query ordering by ledger insertion time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Match records carrying this exact tag
pub type TagFilter = Tag;

/// Appends score records
pub trait LedgerWriter {
    fn write(
        &self,
        record: &ScoreRecord,
        tags: &[Tag],
    ) -> impl Future<Output = Result<Receipt, LedgerError>>;
}

/// Lists records by tag and resolves their payloads
pub trait LedgerQuery {
    fn query(
        &self,
        filter: &TagFilter,
        sort: SortOrder,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<QueryResult>, LedgerError>>;

    fn fetch_payload(&self, id: &str) -> impl Future<Output = Result<ScoreRecord, LedgerError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_uses_anonymous_for_missing_name() {
        let record = ScoreRecord::new("0xabc", None, 420, 1_700_000_000_000);
        let json = record.to_payload().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["username"], "Anonymous");
        assert_eq!(value["score"], 420);
        assert_eq!(value["game"], "PixelInvaders");

        let parsed = ScoreRecord::from_payload(&json).unwrap();
        assert_eq!(parsed, record);
        assert_eq!(parsed.username(), None);
    }

    #[test]
    fn test_score_tags() {
        let record = ScoreRecord::new("0xabc", Some("ace".into()), 90, 1);
        let tags = score_tags(&record);
        assert_eq!(tags[0], Tag::new("application-id", "PixelInvaders"));
        assert!(tags.contains(&Tag::new("username", "ace")));
        assert!(tags.contains(&Tag::new("score", "90")));
        assert!(tags.contains(&Tag::new("Content-Type", "application/json")));
    }

    #[test]
    fn test_malformed_payload_rejected() {
        let err = ScoreRecord::from_payload(r#"{"wallet": "0x1"}"#).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPayload(_)));
    }
}
