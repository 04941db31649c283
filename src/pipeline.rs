//! Score pipeline: package a finished run and write it to the ledger once
//!
//! There is no retry and no local queue. A failed write loses that score;
//! the player is told and the game carries on.

use crate::error::{GameError, Result};
use crate::ledger::{LedgerWriter, Receipt, ScoreRecord, Tag, score_tags};
use crate::settings::LedgerSettings;
use crate::wallet::Identity;

/// A write waiting to be sent, stamped with the session generation that
/// produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSubmission {
    pub generation: u64,
    pub record: ScoreRecord,
    pub tags: Vec<Tag>,
}

/// Progress of the save shown on the game-over screen
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    /// No wallet, or nothing scored
    NotAttempted,
    Saving,
    Saved { receipt_id: String },
    Failed { reason: String },
}

impl SaveStatus {
    pub fn label(&self) -> String {
        match self {
            SaveStatus::NotAttempted => "Score not saved".to_string(),
            SaveStatus::Saving => "Saving score...".to_string(),
            SaveStatus::Saved { receipt_id } => format!("Saved (tx {})", receipt_id),
            SaveStatus::Failed { reason } => format!("Save failed: {}", reason),
        }
    }
}

/// Build the record for a finished run.
///
/// Returns `None` when there is no identity or nothing was scored.
pub fn prepare_submission(
    identity: Option<&Identity>,
    score: u64,
    timestamp: u64,
    generation: u64,
    settings: &LedgerSettings,
) -> Option<ScoreSubmission> {
    let identity = identity?;
    if score == 0 {
        return None;
    }
    let record = ScoreRecord::new(
        identity.address.clone(),
        identity.username.clone(),
        score,
        timestamp,
    )
    .with_game(settings.game_id.clone());
    let tags = score_tags(&record);
    Some(ScoreSubmission {
        generation,
        record,
        tags,
    })
}

/// Send one submission. Called exactly once per submission.
pub async fn submit<W: LedgerWriter>(writer: &W, submission: &ScoreSubmission) -> Result<Receipt> {
    log::info!(
        "Uploading score {} for {}",
        submission.record.score(),
        submission.record.wallet()
    );
    match writer.write(&submission.record, &submission.tags).await {
        Ok(receipt) => {
            log::info!("Score uploaded successfully: {}", receipt.id);
            Ok(receipt)
        }
        Err(e) => {
            log::warn!("Error uploading score: {}", e);
            Err(GameError::WriteFailed(e))
        }
    }
}
