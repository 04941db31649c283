//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads goes through [`Tuning`], so a
//! page can ship overrides without a rebuild. Defaults mirror `crate::consts`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield_width: f32,
    pub playfield_height: f32,

    pub player_speed: f32,
    pub player_bullet_speed: f32,
    pub alien_bullet_speed: f32,

    /// Flock speed at the start of a run (px/s)
    pub alien_base_speed: f32,
    /// Added to the flock speed on every edge bounce
    pub alien_bounce_speedup: f32,
    /// Added to the flock speed on every wave clear
    pub alien_wave_speedup: f32,
    pub alien_drop_distance: f32,
    pub alien_left_bound: f32,
    pub alien_right_bound: f32,
    pub alien_loss_y: f32,
    pub alien_fire_interval_ms: f64,

    pub grid_rows: u32,
    pub grid_cols: u32,
    pub grid_origin: Vec2,
    pub grid_spacing: Vec2,

    pub alien_points: u64,
    pub wave_clear_bonus: u64,
    pub starting_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            player_speed: PLAYER_SPEED,
            player_bullet_speed: PLAYER_BULLET_SPEED,
            alien_bullet_speed: ALIEN_BULLET_SPEED,

            alien_base_speed: ALIEN_BASE_SPEED,
            alien_bounce_speedup: ALIEN_BOUNCE_SPEEDUP,
            alien_wave_speedup: ALIEN_WAVE_SPEEDUP,
            alien_drop_distance: ALIEN_DROP_DISTANCE,
            alien_left_bound: ALIEN_LEFT_BOUND,
            alien_right_bound: ALIEN_RIGHT_BOUND,
            alien_loss_y: ALIEN_LOSS_Y,
            alien_fire_interval_ms: ALIEN_FIRE_INTERVAL_MS,

            grid_rows: GRID_ROWS,
            grid_cols: GRID_COLS,
            grid_origin: Vec2::new(GRID_ORIGIN.0, GRID_ORIGIN.1),
            grid_spacing: Vec2::new(GRID_SPACING.0, GRID_SPACING.1),

            alien_points: ALIEN_POINTS,
            wave_clear_bonus: WAVE_CLEAR_BONUS,
            starting_lives: STARTING_LIVES,
        }
    }
}

impl Tuning {
    /// Check the values describe a playable game
    pub fn validate(&self) -> Result<(), String> {
        if self.playfield_width <= 0.0 || self.playfield_height <= 0.0 {
            return Err("playfield must have a positive size".into());
        }
        if self.alien_left_bound >= self.alien_right_bound {
            return Err(format!(
                "alien bounds are inverted ({} >= {})",
                self.alien_left_bound, self.alien_right_bound
            ));
        }
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err("alien grid must have at least one row and column".into());
        }
        if self.starting_lives == 0 {
            return Err("starting_lives must be at least 1".into());
        }
        if self.alien_fire_interval_ms <= 0.0 {
            return Err("alien_fire_interval_ms must be positive".into());
        }
        if self.alien_bounce_speedup < 0.0 || self.alien_wave_speedup < 0.0 {
            return Err("alien speed increments cannot be negative".into());
        }
        Ok(())
    }

    /// Number of aliens in a freshly spawned grid
    pub fn grid_size(&self) -> usize {
        (self.grid_rows * self.grid_cols) as usize
    }
}
