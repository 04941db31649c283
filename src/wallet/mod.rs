//! Player identity: wallet connection, funding and display name
//!
//! The game never signs anything itself. It needs a resolved address to tag
//! scores with, and a balance to tell the player whether saving will work.

use std::cell::{Cell, RefCell};
use std::future::{Future, ready};

#[cfg(target_arch = "wasm32")]
pub mod bridge;

/// Longest display name accepted
pub const MAX_USERNAME_LEN: usize = 20;

/// Errors reported by a wallet collaborator
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("no wallet extension found")]
    NotInstalled,

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("wallet not connected")]
    NotConnected,

    #[error("{0}")]
    Failed(String),
}

/// Result of a successful connect
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Connection {
    pub address: String,
    /// Loaded storage balance as a decimal string
    pub balance: String,
}

/// Result of a successful fund request
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct FundReceipt {
    /// Amount actually credited
    pub funded: String,
    /// Balance after funding
    pub balance: String,
}

/// Connect / fund / disconnect
pub trait Wallet {
    fn connect(&self) -> impl Future<Output = Result<Connection, WalletError>>;

    fn fund(&self, amount: &str) -> impl Future<Output = Result<FundReceipt, WalletError>>;

    fn balance(&self) -> impl Future<Output = Result<String, WalletError>>;

    fn disconnect(&self);
}

/// The connected player as the session sees it
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub address: String,
    pub balance: String,
    pub username: Option<String>,
}

impl Identity {
    pub fn new(connection: Connection) -> Self {
        Self {
            address: connection.address,
            balance: connection.balance,
            username: None,
        }
    }

    /// Whether the storage balance is above zero
    pub fn funded(&self) -> bool {
        self.balance.trim().parse::<f64>().is_ok_and(|b| b > 0.0)
    }
}

/// Trim and bound a display name; blank means anonymous
pub fn sanitize_username(raw: &str) -> Option<String> {
    let name: String = raw.trim().chars().take(MAX_USERNAME_LEN).collect();
    let name = name.trim_end().to_string();
    (!name.is_empty()).then_some(name)
}

/// Short form of an address, e.g. `0x1234...abcd`
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Wallet that lives entirely in memory
#[derive(Debug)]
pub struct MemoryWallet {
    address: String,
    balance: Cell<f64>,
    connected: Cell<bool>,
    failure: RefCell<Option<WalletError>>,
}

impl MemoryWallet {
    pub fn new(address: impl Into<String>, balance: f64) -> Self {
        Self {
            address: address.into(),
            balance: Cell::new(balance),
            connected: Cell::new(false),
            failure: RefCell::new(None),
        }
    }

    /// Make every following connect/fund fail with `error` (`None` to heal)
    pub fn fail_with(&self, error: Option<WalletError>) {
        *self.failure.borrow_mut() = error;
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn check_failure(&self) -> Result<(), WalletError> {
        match self.failure.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn connect_now(&self) -> Result<Connection, WalletError> {
        self.check_failure()?;
        self.connected.set(true);
        Ok(Connection {
            address: self.address.clone(),
            balance: self.balance.get().to_string(),
        })
    }

    fn fund_now(&self, amount: &str) -> Result<FundReceipt, WalletError> {
        self.check_failure()?;
        if !self.connected.get() {
            return Err(WalletError::NotConnected);
        }
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| WalletError::Failed(format!("invalid amount {:?}", amount)))?;
        self.balance.set(self.balance.get() + amount);
        Ok(FundReceipt {
            funded: amount.to_string(),
            balance: self.balance.get().to_string(),
        })
    }
}

impl Wallet for MemoryWallet {
    fn connect(&self) -> impl Future<Output = Result<Connection, WalletError>> {
        ready(self.connect_now())
    }

    fn fund(&self, amount: &str) -> impl Future<Output = Result<FundReceipt, WalletError>> {
        ready(self.fund_now(amount))
    }

    fn balance(&self) -> impl Future<Output = Result<String, WalletError>> {
        let result = if self.connected.get() {
            Ok(self.balance.get().to_string())
        } else {
            Err(WalletError::NotConnected)
        };
        ready(result)
    }

    fn disconnect(&self) {
        self.connected.set(false);
    }
}
