//! Game state and core simulation types
//!
//! One [`GameState`] per run. It owns the entity store, the wave/lives
//! counters and the seeded RNG; `tick` is the only thing that mutates it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::store::EntityStore;
use crate::consts::PLAYER_START;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen until unpaused
    Paused,
    /// Run ended; terminal
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// Lives reached zero
    OutOfLives,
    /// An alien crossed the loss line
    Invaded,
}

/// Things that happened during a tick, for HUD/feedback
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerFired,
    AlienDestroyed { alien_id: u32, points: u64 },
    PlayerHit { lives_left: u8 },
    FlockBounced { alien_speed: f32 },
    AlienFired { alien_id: u32 },
    WaveCleared { wave: u32, bonus: u64 },
    GameOver { score: u64, wave: u32, cause: GameOverCause },
}

/// Score, lives and alien aggression for one run
#[derive(Debug, Clone, PartialEq)]
pub struct WaveState {
    /// Never decreases within a run
    pub score: u64,
    pub lives: u8,
    /// Never decreases within a run
    pub alien_speed: f32,
    /// +1.0 = right, -1.0 = left
    pub alien_direction: f32,
    /// 1-based wave number
    pub wave: u32,
    /// Edge bounces so far
    pub bounces: u32,
    /// Game time of the last alien shot (ms)
    pub last_alien_shot_ms: f64,
}

impl WaveState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            alien_speed: tuning.alien_base_speed,
            alien_direction: 1.0,
            wave: 1,
            bounces: 0,
            last_alien_shot_ms: 0.0,
        }
    }

    /// Horizontal velocity every alien should currently have
    pub fn alien_velocity_x(&self) -> f32 {
        self.alien_speed * self.alien_direction
    }

    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Reverse the flock and escalate its speed
    pub fn register_bounce(&mut self, tuning: &Tuning) {
        self.alien_direction = -self.alien_direction;
        self.alien_speed += tuning.alien_bounce_speedup;
        self.bounces += 1;
    }

    /// Bonus, next wave, bigger speed bump
    pub fn register_wave_clear(&mut self, tuning: &Tuning) -> u64 {
        self.award(tuning.wave_clear_bonus);
        self.wave += 1;
        self.alien_speed += tuning.alien_wave_speedup;
        tuning.wave_clear_bonus
    }

    /// Take one life; returns true when none remain
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub wave: WaveState,
    pub store: EntityStore,
    pub phase: GamePhase,
    /// Game time (ms); stops while paused or over
    pub time_ms: f64,
    /// Remaining red tint after a hit (ms, visual only)
    pub hit_flash_ms: f32,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameState {
    /// Create a fresh run with the first alien grid in place
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let wave = WaveState::new(&tuning);
        let mut state = Self {
            seed,
            store: EntityStore::new(Vec2::new(PLAYER_START.0, PLAYER_START.1)),
            wave,
            tuning,
            phase: GamePhase::Playing,
            time_ms: 0.0,
            hit_flash_ms: 0.0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.spawn_wave();
        state
    }

    /// Spawn a full alien grid moving at the current flock velocity
    pub fn spawn_wave(&mut self) -> usize {
        let t = &self.tuning;
        let spawned = self.store.spawn_alien_grid(
            t.grid_rows,
            t.grid_cols,
            t.grid_origin,
            t.grid_spacing,
            self.wave.alien_velocity_x(),
        );
        log::info!(
            "Wave {}: {} aliens at speed {}",
            self.wave.wave,
            spawned,
            self.wave.alien_speed
        );
        spawned
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enter the terminal phase (idempotent)
    pub fn end(&mut self, cause: GameOverCause) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over ({:?}): score {} on wave {}",
            cause,
            self.wave.score,
            self.wave.wave
        );
        self.events.push(GameEvent::GameOver {
            score: self.wave.score,
            wave: self.wave.wave,
            cause,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_reset() {
        let state = GameState::new(7, Tuning::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave.score, 0);
        assert_eq!(state.wave.lives, 3);
        assert_eq!(state.wave.wave, 1);
        assert_eq!(state.wave.alien_speed, 50.0);
        assert_eq!(state.store.alien_count(), 50);
        assert!(state.store.player_bullets.is_empty());
    }

    #[test]
    fn test_escalation_accumulates() {
        let tuning = Tuning::default();
        let mut wave = WaveState::new(&tuning);
        wave.register_bounce(&tuning);
        wave.register_bounce(&tuning);
        assert_eq!(wave.alien_direction, 1.0);
        assert_eq!(wave.alien_speed, 70.0);
        assert_eq!(wave.register_wave_clear(&tuning), 100);
        assert_eq!(wave.alien_speed, 90.0);
        assert_eq!(wave.wave, 2);
        assert_eq!(wave.score, 100);
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut state = GameState::new(7, Tuning::default());
        state.end(GameOverCause::Invaded);
        state.end(GameOverCause::OutOfLives);
        let events = state.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            GameEvent::GameOver { cause: GameOverCause::Invaded, .. }
        ));
    }
}
