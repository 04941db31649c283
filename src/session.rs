//! Session controller: screens, identity gating and async result routing
//!
//! The browser loop and the native demo both drive a [`Session`]. It never
//! awaits anything itself: callers launch collaborator calls and hand the
//! results back through the `complete_*` methods, tagged with the generation
//! that was current at launch.

use crate::error::{GameError, Result};
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::ledger::Receipt;
use crate::notify::{Notification, Notifications};
use crate::pipeline::{SaveStatus, ScoreSubmission, prepare_submission};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, TickInput, tick};
use crate::wallet::{Connection, FundReceipt, Identity, WalletError, sanitize_username};

/// What the player is looking at
#[derive(Debug, Clone)]
pub enum Screen {
    Menu,
    Playing(GameState),
    GameOver { state: GameState, save: SaveStatus },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu => "menu",
            Screen::Playing(_) => "playing",
            Screen::GameOver { .. } => "gameOver",
        }
    }

    /// The run being shown, if any
    pub fn game(&self) -> Option<&GameState> {
        match self {
            Screen::Menu => None,
            Screen::Playing(state) | Screen::GameOver { state, .. } => Some(state),
        }
    }
}

/// One player's session: everything between page load and page close
#[derive(Debug)]
pub struct Session {
    pub settings: Settings,
    pub screen: Screen,
    pub identity: Option<Identity>,
    pub notifications: Notifications,
    pub leaderboard: Leaderboard,
    /// Bumped whenever a run is left; async results from older runs are stale
    generation: u64,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            screen: Screen::Menu,
            identity: None,
            notifications: Notifications::default(),
            leaderboard: Leaderboard::new(),
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_connected(&self) -> bool {
        self.identity.is_some()
    }

    /// Fail with a blocking prompt unless a wallet is connected
    pub fn require_identity(&mut self) -> Result<()> {
        if self.identity.is_some() {
            return Ok(());
        }
        let err = GameError::IdentityNotConnected;
        self.notifications
            .push(Notification::error("Connect Wallet", &err));
        Err(err)
    }

    /// Enter Playing with a fresh run. Requires a connected wallet.
    pub fn start_game(&mut self, seed: u64) -> Result<()> {
        self.require_identity()?;
        if matches!(self.screen, Screen::Playing(_)) {
            return Ok(());
        }
        self.return_to_menu();
        log::info!("Starting run {} with seed {}", self.generation, seed);
        self.screen = Screen::Playing(GameState::new(seed, self.settings.tuning));
        Ok(())
    }

    /// Leave the current run. Pending results for it become stale.
    pub fn return_to_menu(&mut self) {
        if matches!(self.screen, Screen::Menu) {
            return;
        }
        self.generation += 1;
        self.screen = Screen::Menu;
    }

    /// Pause a live run (tab hidden, focus lost)
    pub fn pause(&mut self) {
        if let Screen::Playing(state) = &mut self.screen {
            if state.phase == GamePhase::Playing {
                state.phase = GamePhase::Paused;
                log::info!("Auto-paused");
            }
        }
    }

    /// Advance the live run by one fixed step.
    ///
    /// Returns the score write to launch when this step ended the run.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Option<ScoreSubmission> {
        let Screen::Playing(state) = &mut self.screen else {
            return None;
        };
        tick(state, input, dt);
        if !state.is_over() {
            return None;
        }

        let Screen::Playing(state) = std::mem::replace(&mut self.screen, Screen::Menu) else {
            return None;
        };
        let submission = prepare_submission(
            self.identity.as_ref(),
            state.wave.score,
            crate::epoch_millis(),
            self.generation,
            &self.settings.ledger,
        );
        let save = match submission {
            Some(_) => SaveStatus::Saving,
            None => SaveStatus::NotAttempted,
        };
        if submission.is_some() && !self.identity.as_ref().is_some_and(Identity::funded) {
            self.notifications.push(Notification::info(
                "Account Not Funded",
                "Fund your storage account or the score may not be saved",
            ));
        }
        self.screen = Screen::GameOver { state, save };
        submission
    }

    /// Route the outcome of a score write. Returns true when the leaderboard
    /// should be refreshed.
    ///
    /// A result from an earlier run is only logged: no toast, no screen change.
    pub fn complete_score_write(
        &mut self,
        generation: u64,
        score: u64,
        result: Result<Receipt>,
    ) -> bool {
        if generation != self.generation {
            match &result {
                Ok(receipt) => log::info!(
                    "Score {} from run {} saved as {} after run {} began",
                    score,
                    generation,
                    receipt.id,
                    self.generation
                ),
                Err(e) => log::warn!(
                    "Score {} from run {} failed after run {} began: {}",
                    score,
                    generation,
                    self.generation,
                    e
                ),
            }
            return result.is_ok();
        }

        let save = match &result {
            Ok(receipt) => {
                self.notifications.push(Notification::success(
                    "Score Saved!",
                    format!("Your score of {} has been saved to the ledger", score),
                ));
                SaveStatus::Saved {
                    receipt_id: receipt.id.clone(),
                }
            }
            Err(e) => {
                self.notifications
                    .push(Notification::error("Error Saving Score", e));
                SaveStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        if let Screen::GameOver { save: status, .. } = &mut self.screen {
            *status = save;
        }
        result.is_ok()
    }

    /// Mark a leaderboard refresh as started
    pub fn begin_leaderboard_refresh(&mut self) -> u64 {
        self.leaderboard.begin_refresh()
    }

    pub fn complete_leaderboard_refresh(
        &mut self,
        ticket: u64,
        result: Result<Vec<LeaderboardEntry>>,
    ) {
        let applied = self.leaderboard.apply_refresh(ticket, &result);
        if let (true, Err(e)) = (applied, &result) {
            self.notifications
                .push(Notification::error("Error Loading Leaderboard", e));
        }
    }

    pub fn complete_connect(&mut self, result: std::result::Result<Connection, WalletError>) {
        match result {
            Ok(connection) => {
                log::info!("Wallet connected: {}", connection.address);
                let username = self.identity.take().and_then(|i| i.username);
                let mut identity = Identity::new(connection);
                identity.username = username;
                self.identity = Some(identity);
                self.notifications.push(Notification::success(
                    "Wallet Connected!",
                    "Successfully connected to the score ledger",
                ));
            }
            Err(e) => self
                .notifications
                .push(Notification::error("Connection Failed", &GameError::from(e))),
        }
    }

    pub fn complete_fund(&mut self, result: std::result::Result<FundReceipt, WalletError>) {
        match result {
            Ok(receipt) => {
                if let Some(identity) = &mut self.identity {
                    identity.balance = receipt.balance.clone();
                }
                self.notifications.push(Notification::success(
                    "Account Funded!",
                    format!("Added {} ETH to your storage account", receipt.funded),
                ));
            }
            Err(e) => self
                .notifications
                .push(Notification::error("Funding Failed", &GameError::from(e))),
        }
    }

    pub fn update_balance(&mut self, balance: String) {
        if let Some(identity) = &mut self.identity {
            identity.balance = balance;
        }
    }

    pub fn disconnect(&mut self) {
        if self.identity.take().is_some() {
            self.notifications.push(Notification::info(
                "Wallet Disconnected",
                "Successfully disconnected from the score ledger",
            ));
        }
    }

    /// Set the display name written with future scores
    pub fn set_username(&mut self, raw: &str) -> Result<()> {
        self.require_identity()?;
        if let Some(identity) = &mut self.identity {
            identity.username = sanitize_username(raw);
        }
        self.notifications.push(Notification::success(
            "Username Updated!",
            "Your username has been saved",
        ));
        Ok(())
    }
}
