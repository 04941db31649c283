//! Leaderboard view model
//!
//! Rebuilt in full from the ledger on every refresh, top 10 by score. The
//! previously shown list stays on screen until a newer refresh lands.

use chrono::{DateTime, Utc};

use crate::error::{GameError, Result};
use crate::ledger::{LedgerQuery, SortOrder, Tag, tags};
use crate::settings::LedgerSettings;

/// One leaderboard row
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// Ledger record id
    pub id: String,
    pub wallet: String,
    pub score: u64,
    /// Epoch ms when the run ended
    pub timestamp: u64,
}

/// Top scores as currently displayed
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    /// A refresh is in flight
    pub loading: bool,
    /// Last refresh failed; `entries` is from an earlier one
    pub stale: bool,
    latest_ticket: u64,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh; the returned ticket identifies its result
    pub fn begin_refresh(&mut self) -> u64 {
        self.latest_ticket += 1;
        self.loading = true;
        self.latest_ticket
    }

    /// Apply a finished refresh. Results from superseded tickets are dropped.
    /// On error the current entries are kept. Returns whether it was applied.
    pub fn apply_refresh(&mut self, ticket: u64, result: &Result<Vec<LeaderboardEntry>>) -> bool {
        if ticket != self.latest_ticket {
            log::debug!(
                "Dropping leaderboard refresh {} (latest is {})",
                ticket,
                self.latest_ticket
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(entries) => {
                self.entries = entries.clone();
                self.stale = false;
            }
            Err(e) => {
                log::warn!("Error loading leaderboard: {}", e);
                self.stale = true;
            }
        }
        true
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Rank `score` would take if saved now (1-indexed)
    pub fn potential_rank(&self, score: u64, size: usize) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
            + 1;
        (rank <= size).then_some(rank)
    }
}

/// Query the ledger and rebuild the top list.
///
/// Every payload fetch is started before the first one is awaited. Records
/// whose payload cannot be fetched or parsed are dropped.
pub async fn fetch_leaderboard<Q: LedgerQuery>(
    query: &Q,
    settings: &LedgerSettings,
) -> Result<Vec<LeaderboardEntry>> {
    let filter = Tag::new(tags::APPLICATION_ID, settings.game_id.clone());
    let rows = query
        .query(&filter, SortOrder::Desc, settings.query_limit)
        .await
        .map_err(GameError::QueryFailed)?;

    let pending: Vec<_> = rows
        .iter()
        .map(|row| (row.id.as_str(), query.fetch_payload(&row.id)))
        .collect();

    let mut entries = Vec::with_capacity(pending.len());
    for (id, fetch) in pending {
        match fetch.await {
            Ok(record) => entries.push(LeaderboardEntry {
                id: id.to_string(),
                wallet: record.wallet().to_string(),
                score: record.score(),
                timestamp: record.timestamp(),
            }),
            Err(source) => {
                let err = GameError::PayloadFetchFailed {
                    id: id.to_string(),
                    source,
                };
                log::warn!("{}", err);
            }
        }
    }

    let ranked = rank_entries(entries, settings.leaderboard_size);
    log::info!(
        "Leaderboard rebuilt: {} of {} records",
        ranked.len(),
        rows.len()
    );
    Ok(ranked)
}

/// Dedupe by id, sort by score (newer first on ties, then id) and truncate
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>, size: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    entries.dedup_by(|a, b| a.id == b.id);
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(b.timestamp.cmp(&a.timestamp))
            .then(a.id.cmp(&b.id))
    });
    entries.truncate(size);
    entries
}

/// Medal for the podium, `#n` for everyone else
pub fn rank_label(rank: usize) -> String {
    match rank {
        1 => "🏆".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("#{}", n),
    }
}

/// Group digits with commas, e.g. `12,340`
pub fn format_score(score: u64) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a timestamp relative to `now` (both epoch ms)
pub fn format_date(timestamp: u64, now: u64) -> String {
    let diff_mins = now.saturating_sub(timestamp) / 60_000;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    if diff_days >= 1 {
        if diff_days == 1 {
            "Yesterday".to_string()
        } else if diff_days < 7 {
            format!("{} days ago", diff_days)
        } else {
            match DateTime::<Utc>::from_timestamp_millis(timestamp as i64) {
                Some(date) => date.format("%-m/%-d/%y").to_string(),
                None => "N/A".to_string(),
            }
        }
    } else if diff_hours >= 1 {
        if diff_hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", diff_hours)
        }
    } else if diff_mins >= 1 {
        if diff_mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", diff_mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerError, LedgerWriter, MemoryLedger, ScoreRecord, score_tags};

    fn entry(id: &str, score: u64, timestamp: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            id: id.into(),
            wallet: "0x1".into(),
            score,
            timestamp,
        }
    }

    fn seed(ledger: &MemoryLedger, scores: &[u64]) -> Vec<String> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                let record = ScoreRecord::new(format!("0x{:040}", i), None, score, i as u64);
                pollster::block_on(ledger.write(&record, &score_tags(&record)))
                    .unwrap()
                    .id
            })
            .collect()
    }

    #[test]
    fn test_rank_entries_orders_and_truncates() {
        let ranked = rank_entries(
            vec![
                entry("a", 10, 1),
                entry("b", 30, 1),
                entry("c", 30, 5),
                entry("b", 30, 1),
                entry("d", 20, 1),
            ],
            3,
        );
        let ids: Vec<&str> = ranked.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "d"]);
    }

    #[test]
    fn test_failed_payloads_are_dropped() {
        let ledger = MemoryLedger::new();
        let ids = seed(&ledger, &[5, 80, 40, 10, 90, 60, 70, 20, 30, 50, 100, 15]);
        ledger.break_payload(&ids[4]); // 90
        ledger.break_payload(&ids[10]); // 100

        let entries =
            pollster::block_on(fetch_leaderboard(&ledger, &LedgerSettings::default())).unwrap();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].score, 80);
        assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(entries.iter().all(|e| e.id != ids[4] && e.id != ids[10]));
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let ledger = MemoryLedger::new();
        seed(&ledger, &[3, 1, 4, 1, 5, 9, 2, 6]);
        let settings = LedgerSettings::default();
        let first = pollster::block_on(fetch_leaderboard(&ledger, &settings)).unwrap();
        let second = pollster::block_on(fetch_leaderboard(&ledger, &settings)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_query_failure_keeps_previous_entries() {
        let ledger = MemoryLedger::new();
        seed(&ledger, &[10, 20]);
        let settings = LedgerSettings::default();
        let mut board = Leaderboard::new();

        let ticket = board.begin_refresh();
        let result = pollster::block_on(fetch_leaderboard(&ledger, &settings));
        assert!(board.apply_refresh(ticket, &result));
        assert_eq!(board.top_score(), Some(20));

        ledger.fail_queries(Some(LedgerError::Network("down".into())));
        let ticket = board.begin_refresh();
        let result = pollster::block_on(fetch_leaderboard(&ledger, &settings));
        assert!(matches!(result, Err(GameError::QueryFailed(_))));
        board.apply_refresh(ticket, &result);
        assert_eq!(board.entries.len(), 2);
        assert!(board.stale);
        assert!(!board.loading);
    }

    #[test]
    fn test_superseded_refresh_ignored() {
        let mut board = Leaderboard::new();
        let old = board.begin_refresh();
        let new = board.begin_refresh();
        assert!(board.apply_refresh(new, &Ok(vec![entry("a", 1, 1)])));
        assert!(!board.apply_refresh(old, &Ok(vec![])));
        assert_eq!(board.entries.len(), 1);
    }

    #[test]
    fn test_potential_rank() {
        let mut board = Leaderboard::new();
        board.entries = vec![entry("a", 50, 1), entry("b", 30, 1)];
        assert_eq!(board.potential_rank(40, 10), Some(2));
        assert_eq!(board.potential_rank(10, 2), None);
        assert_eq!(board.potential_rank(0, 10), None);
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(rank_label(1), "🏆");
        assert_eq!(rank_label(4), "#4");
        assert_eq!(format_score(1234567), "1,234,567");
        assert_eq!(format_score(999), "999");

        let now = 1_700_000_000_000;
        assert_eq!(format_date(now - 10_000, now), "Just now");
        assert_eq!(format_date(now - 5 * 60_000, now), "5 mins ago");
        assert_eq!(format_date(now - 3_600_000, now), "1 hour ago");
        assert_eq!(format_date(now - 86_400_000, now), "Yesterday");
        assert_eq!(format_date(now - 3 * 86_400_000, now), "3 days ago");
        // 2023-11-14T22:13:20Z
        assert_eq!(format_date(now, now + 30 * 86_400_000), "11/14/23");
        // 2001-09-09T01:46:40Z, no zero padding
        assert_eq!(format_date(1_000_000_000_000, now), "9/9/01");
    }
}
