//! Browser ledger client
//!
//! Forwards to `window.pixelInvaders`, a page-provided object wrapping the
//! storage network's upload and query SDK. Every call crosses the boundary as
//! JSON strings; each promise is created when the Rust method is called, so
//! callers can start several requests before awaiting any of them.

use std::future::Future;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{
    LedgerError, LedgerQuery, LedgerWriter, QueryResult, Receipt, ScoreRecord, SortOrder, Tag,
    TagFilter,
};

#[wasm_bindgen(inline_js = "
    function api() {
        const api = window.pixelInvaders;
        if (!api) {
            throw new Error('window.pixelInvaders is not installed');
        }
        return api;
    }

    export function ledger_write(payload, tags) {
        return Promise.resolve()
            .then(() => api().write(payload, JSON.parse(tags)))
            .then((receipt) => JSON.stringify({ id: receipt.id }));
    }

    export function ledger_query(filter, sort, limit) {
        return Promise.resolve()
            .then(() => api().query(JSON.parse(filter), sort, limit))
            .then((rows) => JSON.stringify(rows.map((r) => ({ id: r.id }))));
    }

    export function ledger_fetch_payload(id) {
        return Promise.resolve()
            .then(() => api().fetchPayload(id))
            .then((data) => typeof data === 'string' ? data : JSON.stringify(data));
    }
")]
extern "C" {
    fn ledger_write(payload: &str, tags: &str) -> js_sys::Promise;
    fn ledger_query(filter: &str, sort: &str, limit: u32) -> js_sys::Promise;
    fn ledger_fetch_payload(id: &str) -> js_sys::Promise;
}

/// Ledger backed by the page's JavaScript SDK
#[derive(Debug, Default, Clone, Copy)]
pub struct JsLedger;

impl JsLedger {
    pub fn new() -> Self {
        Self
    }
}

/// Turn a rejected promise into a ledger error
fn js_error(value: JsValue) -> LedgerError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));

    let lower = message.to_lowercase();
    if lower.contains("insufficient") || lower.contains("not enough balance") {
        LedgerError::Unfunded
    } else if lower.contains("rejected") || lower.contains("denied") {
        LedgerError::Rejected(message)
    } else {
        LedgerError::Network(message)
    }
}

/// Resolved value of a bridge promise, which is always a string
fn js_string(value: JsValue) -> Result<String, LedgerError> {
    value
        .as_string()
        .ok_or_else(|| LedgerError::InvalidPayload("bridge returned a non-string".into()))
}

impl LedgerWriter for JsLedger {
    fn write(
        &self,
        record: &ScoreRecord,
        tags: &[Tag],
    ) -> impl Future<Output = Result<Receipt, LedgerError>> {
        let started = record.to_payload().and_then(|payload| {
            let tags = serde_json::to_string(tags)?;
            Ok(JsFuture::from(ledger_write(&payload, &tags)))
        });
        async move {
            let value = started?.await.map_err(js_error)?;
            let receipt: Receipt = serde_json::from_str(&js_string(value)?)?;
            Ok(receipt)
        }
    }
}

impl LedgerQuery for JsLedger {
    fn query(
        &self,
        filter: &TagFilter,
        sort: SortOrder,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<QueryResult>, LedgerError>> {
        let sort = match sort {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        let started = serde_json::to_string(filter)
            .map(|filter| JsFuture::from(ledger_query(&filter, sort, limit as u32)));
        async move {
            let value = started?.await.map_err(js_error)?;
            let rows: Vec<QueryResult> = serde_json::from_str(&js_string(value)?)?;
            Ok(rows)
        }
    }

    fn fetch_payload(&self, id: &str) -> impl Future<Output = Result<ScoreRecord, LedgerError>> {
        let pending = JsFuture::from(ledger_fetch_payload(id));
        async move {
            let value = pending.await.map_err(js_error)?;
            ScoreRecord::from_payload(&js_string(value)?)
        }
    }
}
