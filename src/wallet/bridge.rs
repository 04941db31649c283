//! Browser wallet client, forwarding to `window.pixelInvaders`

use std::future::Future;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{Connection, FundReceipt, Wallet, WalletError};

#[wasm_bindgen(inline_js = "
    function api() {
        const api = window.pixelInvaders;
        if (!api) {
            throw new Error('window.pixelInvaders is not installed');
        }
        return api;
    }

    export function wallet_connect() {
        return Promise.resolve()
            .then(() => api().connect())
            .then((c) => JSON.stringify({ address: c.address, balance: String(c.balance) }));
    }

    export function wallet_fund(amount) {
        return Promise.resolve()
            .then(() => api().fund(amount))
            .then((r) => JSON.stringify({ funded: String(r.funded), balance: String(r.balance) }));
    }

    export function wallet_balance() {
        return Promise.resolve()
            .then(() => api().balance())
            .then((b) => String(b));
    }

    export function wallet_disconnect() {
        const api = window.pixelInvaders;
        if (api && api.disconnect) {
            api.disconnect();
        }
    }
")]
extern "C" {
    fn wallet_connect() -> js_sys::Promise;
    fn wallet_fund(amount: &str) -> js_sys::Promise;
    fn wallet_balance() -> js_sys::Promise;
    fn wallet_disconnect();
}

/// Wallet backed by the page's injected provider
#[derive(Debug, Default, Clone, Copy)]
pub struct JsWallet;

impl JsWallet {
    pub fn new() -> Self {
        Self
    }
}

fn js_error(value: JsValue) -> WalletError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value));

    let lower = message.to_lowercase();
    if lower.contains("metamask not found") || lower.contains("not installed") {
        WalletError::NotInstalled
    } else if lower.contains("not initialized") || lower.contains("not connected") {
        WalletError::NotConnected
    } else if lower.contains("rejected") || lower.contains("denied") {
        WalletError::Rejected(message)
    } else {
        WalletError::Failed(message)
    }
}

async fn resolve_string(pending: JsFuture) -> Result<String, WalletError> {
    pending
        .await
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| WalletError::Failed("wallet bridge returned a non-string".into()))
}

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, WalletError> {
    serde_json::from_str(json).map_err(|e| WalletError::Failed(e.to_string()))
}

impl Wallet for JsWallet {
    fn connect(&self) -> impl Future<Output = Result<Connection, WalletError>> {
        let pending = JsFuture::from(wallet_connect());
        async move { parse(&resolve_string(pending).await?) }
    }

    fn fund(&self, amount: &str) -> impl Future<Output = Result<FundReceipt, WalletError>> {
        let pending = JsFuture::from(wallet_fund(amount));
        async move { parse(&resolve_string(pending).await?) }
    }

    fn balance(&self) -> impl Future<Output = Result<String, WalletError>> {
        resolve_string(JsFuture::from(wallet_balance()))
    }

    fn disconnect(&self) {
        wallet_disconnect();
    }
}
