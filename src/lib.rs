//! Pixel Invaders - a Space Invaders arcade game with a permanent leaderboard
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, collisions, wave state)
//! - `session`: Menu / Playing / GameOver screen machine and async result gating
//! - `pipeline`: Score submission to the external ledger
//! - `leaderboard`: Top-10 view model rebuilt from ledger queries
//! - `ledger`, `wallet`: External collaborator seams
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`, `settings`: Data-driven game balance and configuration

pub mod error;
pub mod leaderboard;
pub mod ledger;
pub mod notify;
pub mod pipeline;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod wallet;

pub use error::{GameError, Result};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use session::{Screen, Session};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (pixels, origin top-left, y down)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Actor sizes (width, height)
    pub const PLAYER_SIZE: (f32, f32) = (40.0, 20.0);
    pub const ALIEN_SIZE: (f32, f32) = (30.0, 20.0);
    pub const BULLET_SIZE: (f32, f32) = (4.0, 10.0);

    /// Player spawn point
    pub const PLAYER_START: (f32, f32) = (400.0, 550.0);
    /// Horizontal player speed (px/s)
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Bullet spawn offset from the shooter's centre
    pub const MUZZLE_OFFSET: f32 = 20.0;

    pub const PLAYER_BULLET_SPEED: f32 = 400.0;
    pub const ALIEN_BULLET_SPEED: f32 = 200.0;

    /// Alien flock defaults
    pub const ALIEN_BASE_SPEED: f32 = 50.0;
    pub const ALIEN_BOUNCE_SPEEDUP: f32 = 10.0;
    pub const ALIEN_WAVE_SPEEDUP: f32 = 20.0;
    pub const ALIEN_DROP_DISTANCE: f32 = 30.0;
    pub const ALIEN_LEFT_BOUND: f32 = 30.0;
    pub const ALIEN_RIGHT_BOUND: f32 = 770.0;
    /// Any alien below this line ends the run
    pub const ALIEN_LOSS_Y: f32 = 500.0;
    pub const ALIEN_FIRE_INTERVAL_MS: f64 = 1000.0;

    /// Alien grid layout
    pub const GRID_ROWS: u32 = 5;
    pub const GRID_COLS: u32 = 10;
    pub const GRID_ORIGIN: (f32, f32) = (100.0, 50.0);
    pub const GRID_SPACING: (f32, f32) = (60.0, 50.0);

    /// Scoring
    pub const ALIEN_POINTS: u64 = 10;
    pub const WAVE_CLEAR_BONUS: u64 = 100;
    pub const STARTING_LIVES: u8 = 3;

    /// Red tint duration after the player is hit
    pub const HIT_FLASH_MS: f32 = 1000.0;

    /// Ledger identity of this game
    pub const GAME_ID: &str = "PixelInvaders";
    pub const LEADERBOARD_SIZE: usize = 10;
    pub const LEADERBOARD_QUERY_LIMIT: usize = 100;
}

/// Wall-clock time in epoch milliseconds
#[cfg(target_arch = "wasm32")]
pub fn epoch_millis() -> u64 {
    js_sys::Date::now() as u64
}

/// Wall-clock time in epoch milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn epoch_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
