//! In-process ledger
//!
//! Backs the native demo and the tests. Failures can be injected per
//! operation so the error paths run without a network.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::future::{Future, ready};

use super::{
    LedgerError, LedgerQuery, LedgerWriter, QueryResult, Receipt, ScoreRecord, SortOrder, Tag,
    TagFilter,
};

#[derive(Debug, Clone)]
struct StoredRecord {
    id: String,
    tags: Vec<Tag>,
    payload: String,
}

/// Append-only ledger held in memory
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: RefCell<Vec<StoredRecord>>,
    fail_writes: RefCell<Option<LedgerError>>,
    fail_queries: RefCell<Option<LedgerError>>,
    broken_payloads: RefCell<HashSet<String>>,
    writes_attempted: Cell<usize>,
    next_id: Cell<u64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail with `error` (`None` to heal)
    pub fn fail_writes(&self, error: Option<LedgerError>) {
        *self.fail_writes.borrow_mut() = error;
    }

    /// Make every following query fail with `error` (`None` to heal)
    pub fn fail_queries(&self, error: Option<LedgerError>) {
        *self.fail_queries.borrow_mut() = error;
    }

    /// Make payload fetches for `id` fail
    pub fn break_payload(&self, id: &str) {
        self.broken_payloads.borrow_mut().insert(id.to_string());
    }

    /// Number of write calls, successful or not
    pub fn writes_attempted(&self) -> usize {
        self.writes_attempted.get()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Store a raw payload under `tags`, bypassing validation
    pub fn insert_raw(&self, tags: Vec<Tag>, payload: impl Into<String>) -> String {
        let id = self.allocate_id();
        self.records.borrow_mut().push(StoredRecord {
            id: id.clone(),
            tags,
            payload: payload.into(),
        });
        id
    }

    fn allocate_id(&self) -> String {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        format!("mem-{:06}", n)
    }

    fn write_now(&self, record: &ScoreRecord, tags: &[Tag]) -> Result<Receipt, LedgerError> {
        self.writes_attempted.set(self.writes_attempted.get() + 1);
        if let Some(err) = self.fail_writes.borrow().clone() {
            return Err(err);
        }
        let payload = record.to_payload()?;
        let id = self.insert_raw(tags.to_vec(), payload);
        log::debug!("MemoryLedger stored {}", id);
        Ok(Receipt { id })
    }

    fn query_now(
        &self,
        filter: &TagFilter,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Vec<QueryResult>, LedgerError> {
        if let Some(err) = self.fail_queries.borrow().clone() {
            return Err(err);
        }
        let records = self.records.borrow();
        let matching = records.iter().filter(|r| r.tags.contains(filter));
        let ids: Vec<QueryResult> = match sort {
            SortOrder::Asc => matching
                .take(limit)
                .map(|r| QueryResult { id: r.id.clone() })
                .collect(),
            SortOrder::Desc => matching
                .rev()
                .take(limit)
                .map(|r| QueryResult { id: r.id.clone() })
                .collect(),
        };
        Ok(ids)
    }

    fn fetch_now(&self, id: &str) -> Result<ScoreRecord, LedgerError> {
        if self.broken_payloads.borrow().contains(id) {
            return Err(LedgerError::Network(format!("gateway timeout for {}", id)));
        }
        let records = self.records.borrow();
        let record = records
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        ScoreRecord::from_payload(&record.payload)
    }
}

impl LedgerWriter for MemoryLedger {
    fn write(
        &self,
        record: &ScoreRecord,
        tags: &[Tag],
    ) -> impl Future<Output = Result<Receipt, LedgerError>> {
        ready(self.write_now(record, tags))
    }
}

impl LedgerQuery for MemoryLedger {
    fn query(
        &self,
        filter: &TagFilter,
        sort: SortOrder,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<QueryResult>, LedgerError>> {
        ready(self.query_now(filter, sort, limit))
    }

    fn fetch_payload(&self, id: &str) -> impl Future<Output = Result<ScoreRecord, LedgerError>> {
        ready(self.fetch_now(id))
    }
}
