//! Game settings
//!
//! Defaults are compiled in; a page may override any subset through a JSON
//! `<script id="game-config" type="application/json">` element. Nothing is
//! written back: the ledger is the only persistent store.

use serde::{Deserialize, Serialize};

use crate::consts::{GAME_ID, LEADERBOARD_QUERY_LIMIT, LEADERBOARD_SIZE};
use crate::error::{GameError, Result};
use crate::tuning::Tuning;

/// Ledger-facing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSettings {
    /// Value of the `application-id` tag on every record
    pub game_id: String,
    /// Page size of the leaderboard query
    pub query_limit: usize,
    /// Number of rows shown on the leaderboard
    pub leaderboard_size: usize,
    /// Amount requested by the "Fund Account" action
    pub fund_amount: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            game_id: GAME_ID.to_string(),
            query_limit: LEADERBOARD_QUERY_LIMIT,
            leaderboard_size: LEADERBOARD_SIZE,
            fund_amount: "0.01".to_string(),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gameplay balance
    pub tuning: Tuning,
    /// Ledger parameters
    pub ledger: LedgerSettings,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Pause when the tab is hidden or the window loses focus
    pub auto_pause: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            ledger: LedgerSettings::default(),
            show_fps: true,
            auto_pause: true,
        }
    }
}

impl Settings {
    /// Element holding optional JSON overrides
    const CONFIG_ELEMENT_ID: &'static str = "game-config";

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.tuning.validate().map_err(GameError::Config)?;
        if self.ledger.game_id.trim().is_empty() {
            return Err(GameError::Config("ledger.game_id cannot be empty".into()));
        }
        if self.ledger.leaderboard_size == 0 {
            return Err(GameError::Config(
                "ledger.leaderboard_size must be at least 1".into(),
            ));
        }
        if self.ledger.query_limit < self.ledger.leaderboard_size {
            return Err(GameError::Config(format!(
                "ledger.query_limit ({}) is smaller than leaderboard_size ({})",
                self.ledger.query_limit, self.ledger.leaderboard_size
            )));
        }
        Ok(())
    }

    /// Load overrides from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from #{}", Self::CONFIG_ELEMENT_ID);
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring #{}: {}", Self::CONFIG_ELEMENT_ID, e);
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Native builds always use the compiled-in defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No #{} element outside the browser", Self::CONFIG_ELEMENT_ID);
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{"tuning": {"alien_base_speed": 80.0}, "show_fps": false}"#)
                .unwrap();
        assert_eq!(settings.tuning.alien_base_speed, 80.0);
        assert_eq!(settings.tuning.grid_cols, 10);
        assert_eq!(settings.ledger.game_id, GAME_ID);
        assert!(!settings.show_fps);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = Settings::from_json("{not json").unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json(r#"{"ledger": {"leaderboard_size": 0}}"#).unwrap_err();
        assert!(matches!(err, GameError::Config(_)));

        let err = Settings::from_json(r#"{"tuning": {"grid_rows": 0}}"#).unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }
}
