//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use rand::Rng;

use super::collision::{HitResponse, resolve_player_bullets, resolve_player_hits};
use super::state::{GameEvent, GameOverCause, GamePhase, GameState};
use super::store::BulletDirection;
use crate::consts::{HIT_FLASH_MS, MUZZLE_OFFSET};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Fire (pressed this tick)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    let tuning = state.tuning;
    state.store.begin_tick();
    state.time_ms += dt as f64 * 1000.0;
    state.hit_flash_ms = (state.hit_flash_ms - dt * 1000.0).max(0.0);

    // Player
    let mut vx = 0.0;
    if input.left {
        vx -= tuning.player_speed;
    }
    if input.right {
        vx += tuning.player_speed;
    }
    state.store.player.vel.x = vx;

    if input.fire {
        let origin = state.store.player.pos - Vec2::new(0.0, MUZZLE_OFFSET);
        if state
            .store
            .spawn_bullet(origin, BulletDirection::Up, tuning.player_bullet_speed)
            .is_some()
        {
            state.events.push(GameEvent::PlayerFired);
        }
    }

    // Integrate, then keep the player on screen
    state.store.integrate(dt);
    let player = &mut state.store.player;
    let half_w = player.size.x * 0.5;
    player.pos.x = player.pos.x.clamp(half_w, tuning.playfield_width - half_w);

    state
        .store
        .cull_bullets(tuning.playfield_width, tuning.playfield_height);

    // Player bullets vs aliens
    for kill in resolve_player_bullets(&mut state.store) {
        state.wave.award(tuning.alien_points);
        state.events.push(GameEvent::AlienDestroyed {
            alien_id: kill.alien_id,
            points: tuning.alien_points,
        });
    }

    // Alien bullets and alien bodies vs player
    let mut out_of_lives = false;
    {
        let wave = &mut state.wave;
        let events = &mut state.events;
        let flash = &mut state.hit_flash_ms;
        resolve_player_hits(&mut state.store, |hit| {
            let dead = wave.lose_life();
            *flash = HIT_FLASH_MS;
            log::debug!("Player hit by {:?}, {} lives left", hit, wave.lives);
            events.push(GameEvent::PlayerHit {
                lives_left: wave.lives,
            });
            if dead {
                out_of_lives = true;
                HitResponse::Stop
            } else {
                HitResponse::Continue
            }
        });
    }
    if out_of_lives {
        state.end(GameOverCause::OutOfLives);
        state.store.sweep();
        return;
    }

    update_flock(state);
    alien_fire(state);

    // Wave clear
    state.store.sweep();
    if state.store.alien_count() == 0 {
        let bonus = state.wave.register_wave_clear(&tuning);
        state.events.push(GameEvent::WaveCleared {
            wave: state.wave.wave,
            bonus,
        });
        state.spawn_wave();
    }

    // Invasion
    if state
        .store
        .alive_aliens()
        .any(|a| a.pos.y > tuning.alien_loss_y)
    {
        state.end(GameOverCause::Invaded);
    }
}

/// Reverse and drop the flock when it reaches the bound it is heading for
fn update_flock(state: &mut GameState) {
    let tuning = state.tuning;
    let dir = state.wave.alien_direction;
    let at_bound = state.store.alive_aliens().any(|a| {
        (dir > 0.0 && a.pos.x >= tuning.alien_right_bound)
            || (dir < 0.0 && a.pos.x <= tuning.alien_left_bound)
    });
    if !at_bound {
        return;
    }

    state.wave.register_bounce(&tuning);
    for alien in state.store.aliens.iter_mut().filter(|a| a.alive) {
        alien.pos.y += tuning.alien_drop_distance;
    }
    state.store.set_alien_velocity(state.wave.alien_velocity_x());
    log::debug!(
        "Flock bounce #{}, speed now {}",
        state.wave.bounces,
        state.wave.alien_speed
    );
    state.events.push(GameEvent::FlockBounced {
        alien_speed: state.wave.alien_speed,
    });
}

/// At most one alien shot per interval, from a uniformly random live alien
fn alien_fire(state: &mut GameState) {
    let tuning = state.tuning;
    if state.time_ms <= state.wave.last_alien_shot_ms + tuning.alien_fire_interval_ms {
        return;
    }

    let shooters: Vec<(u32, Vec2)> = state.store.alive_aliens().map(|a| (a.id, a.pos)).collect();
    if shooters.is_empty() {
        return;
    }
    let (alien_id, pos) = shooters[state.rng_mut().random_range(0..shooters.len())];

    let origin = pos + Vec2::new(0.0, MUZZLE_OFFSET);
    if state
        .store
        .spawn_bullet(origin, BulletDirection::Down, tuning.alien_bullet_speed)
        .is_some()
    {
        state.wave.last_alien_shot_ms = state.time_ms;
        log::debug!("Alien {} fired at t={:.0}ms", alien_id, state.time_ms);
        state.events.push(GameEvent::AlienFired { alien_id });
    }
}

/// Demo AI: dodge incoming fire, otherwise line up under the lowest alien
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.store.player;

    let threat = state
        .store
        .alien_bullets
        .iter()
        .filter(|b| b.alive && b.pos.y < player.pos.y && player.pos.y - b.pos.y < 120.0)
        .find(|b| (b.pos.x - player.pos.x).abs() < player.size.x);
    if let Some(bullet) = threat {
        let dodge_right = bullet.pos.x <= player.pos.x;
        input.left = !dodge_right;
        input.right = dodge_right;
        input.fire = false;
        return;
    }

    let target = state.store.alive_aliens().max_by(|a, b| {
        let key_a = (a.pos.y, -(a.pos.x - player.pos.x).abs());
        let key_b = (b.pos.y, -(b.pos.x - player.pos.x).abs());
        key_a
            .partial_cmp(&key_b)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let Some(target) = target else {
        return;
    };

    let dx = target.pos.x - player.pos.x;
    input.left = dx < -4.0;
    input.right = dx > 4.0;
    input.fire = dx.abs() < 12.0 && state.store.player_bullets.iter().all(|b| !b.alive);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::ActorKind;
    use crate::sim::actor::Actor;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn new_state(seed: u64) -> GameState {
        GameState::new(seed, Tuning::default())
    }

    #[test]
    fn test_tick_pause() {
        let mut state = new_state(12345);
        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Frozen while paused
        let before = state.store.aliens[0].pos;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.store.aliens[0].pos, before);
        assert_eq!(state.time_ms, 0.0);

        // Unpause
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.time_ms > 0.0);
    }

    #[test]
    fn test_fire_spawns_above_player() {
        let mut state = new_state(1);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.store.player_bullets.len(), 1);
        let bullet = &state.store.player_bullets[0];
        let expected_y = 550.0 - MUZZLE_OFFSET - 400.0 * SIM_DT;
        assert!((bullet.pos.y - expected_y).abs() < 1e-3);
        assert!(state.drain_events().contains(&GameEvent::PlayerFired));
    }

    #[test]
    fn test_player_clamped_to_playfield() {
        let mut state = new_state(1);
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..400 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.store.player.pos.x, 20.0);
    }

    #[test]
    fn test_full_grid_clear_scores_and_respawns() {
        let mut state = new_state(42);
        let targets: Vec<Vec2> = state.store.aliens.iter().map(|a| a.pos).collect();
        assert_eq!(targets.len(), 50);
        for pos in targets {
            state
                .store
                .spawn_bullet(pos, BulletDirection::Up, 400.0)
                .unwrap();
        }

        tick(&mut state, &TickInput::default(), SIM_DT);

        // 50 kills at 10 each, then the clear bonus
        assert_eq!(state.wave.score, 600);
        assert_eq!(state.wave.wave, 2);
        assert_eq!(state.wave.alien_speed, 70.0);
        assert_eq!(state.store.alien_count(), 50);
        assert_eq!(state.phase, GamePhase::Playing);

        let events = state.drain_events();
        let kill_points: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::AlienDestroyed { points, .. } => Some(*points),
                _ => None,
            })
            .collect();
        assert_eq!(kill_points.len(), 50);
        assert_eq!(kill_points.iter().sum::<u64>(), 500);
        let bonuses: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::WaveCleared { bonus, .. } => Some(*bonus),
                _ => None,
            })
            .collect();
        assert_eq!(bonuses, [100]);
        assert!(events.contains(&GameEvent::WaveCleared { wave: 2, bonus: 100 }));
    }

    #[test]
    fn test_flock_bounces_at_right_bound() {
        let mut state = new_state(3);
        for alien in &mut state.store.aliens {
            alien.pos.x += 769.0 - 640.0;
        }
        let y_before = state.store.aliens[0].pos.y;

        // One tick moves the rightmost column onto the bound
        tick(&mut state, &TickInput::default(), 0.05);
        assert_eq!(state.wave.alien_direction, -1.0);
        assert_eq!(state.wave.alien_speed, 60.0);
        assert_eq!(state.store.aliens[0].pos.y, y_before + 30.0);
        assert!(state.store.aliens.iter().all(|a| a.vel.x == -60.0));

        // Still at the bound but heading away: no second bounce
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.wave.bounces, 1);
    }

    #[test]
    fn test_flock_bounces_at_left_bound() {
        let mut state = new_state(3);
        state.wave.alien_direction = -1.0;
        state.store.set_alien_velocity(state.wave.alien_velocity_x());
        for alien in &mut state.store.aliens {
            alien.pos.x -= 100.0 - 31.0;
        }
        let y_before = state.store.aliens[0].pos.y;

        tick(&mut state, &TickInput::default(), 0.05);
        assert_eq!(state.wave.alien_direction, 1.0);
        assert_eq!(state.wave.alien_speed, 60.0);
        assert_eq!(state.wave.bounces, 1);
        assert_eq!(state.store.aliens[0].pos.y, y_before + 30.0);
        assert!(state.store.aliens.iter().all(|a| a.vel.x == 60.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.wave.bounces, 1);
    }

    #[test]
    fn test_alien_killed_this_tick_does_not_touch_player() {
        let mut state = new_state(8);
        state.tuning.alien_loss_y = 1000.0;
        let pos = state.store.player.pos;
        let id = state.store.next_entity_id();
        state
            .store
            .aliens
            .push(Actor::new(id, ActorKind::Alien, pos, Vec2::ZERO));
        state
            .store
            .spawn_bullet(pos, BulletDirection::Up, 0.0)
            .unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.wave.score, 10);
        assert_eq!(state.wave.lives, 3);
        assert_eq!(state.hit_flash_ms, 0.0);
        assert!(!state.store.aliens.iter().any(|a| a.id == id && a.alive));
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerHit { .. }))
        );
    }

    #[test]
    fn test_alien_fire_interval() {
        let mut state = new_state(9);
        // Keep shots away from the player
        state.store.player.pos.x = 20.0;
        let mut shots = 0;
        for _ in 0..590 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            shots += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::AlienFired { .. }))
                .count();
        }
        // First shot after 1000ms, then one per interval
        assert_eq!(shots, 4);
    }

    #[test]
    fn test_last_life_ends_game_atomically() {
        let mut state = new_state(5);
        state.wave.lives = 1;
        let player = state.store.player.pos;
        state
            .store
            .spawn_bullet(player, BulletDirection::Down, 0.0)
            .unwrap();
        state
            .store
            .spawn_bullet(player + Vec2::new(1.0, 0.0), BulletDirection::Down, 0.0)
            .unwrap();

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.wave.lives, 0);
        let hits = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(hits, 1);

        // Nothing moves or scores after the end
        let score = state.wave.score;
        let alien = state.store.aliens[0].pos;
        for _ in 0..10 {
            tick(
                &mut state,
                &TickInput {
                    fire: true,
                    ..Default::default()
                },
                SIM_DT,
            );
        }
        assert_eq!(state.wave.score, score);
        assert_eq!(state.wave.lives, 0);
        assert_eq!(state.store.aliens[0].pos, alien);
    }

    #[test]
    fn test_alien_contact_costs_life_but_alien_survives() {
        let mut state = new_state(5);
        let id = state.store.next_entity_id();
        let pos = state.store.player.pos;
        state
            .store
            .aliens
            .push(Actor::new(id, ActorKind::Alien, pos, Vec2::ZERO));
        state.tuning.alien_loss_y = 1000.0;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.wave.lives, 2);
        assert!(state.store.aliens.iter().any(|a| a.id == id));
        assert!(state.hit_flash_ms > 0.0);
    }

    #[test]
    fn test_invasion_ends_game() {
        let mut state = new_state(5);
        state.store.aliens[49].pos.y = 501.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::GameOver {
                cause: GameOverCause::Invaded,
                ..
            }
        )));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state(99999);
        let mut state2 = new_state(99999);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..2000 {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.wave, state2.wave);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.store.alien_count(), state2.store.alien_count());
        assert_eq!(state1.store.player.pos, state2.store.player.pos);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_speed_tracks_escalations(seed in any::<u64>(), ticks in 1usize..3000) {
            let mut state = new_state(seed);
            let mut last_score = 0;
            let mut last_lives = state.wave.lives;
            let input = TickInput { idle_mode: true, ..Default::default() };

            for _ in 0..ticks {
                tick(&mut state, &input, SIM_DT);
                prop_assert!(state.wave.score >= last_score);
                prop_assert!(state.wave.lives <= last_lives);
                last_score = state.wave.score;
                last_lives = state.wave.lives;
            }

            let t = &state.tuning;
            let expected = t.alien_base_speed
                + state.wave.bounces as f32 * t.alien_bounce_speedup
                + (state.wave.wave - 1) as f32 * t.alien_wave_speedup;
            prop_assert!((state.wave.alien_speed - expected).abs() < 1e-3);
            prop_assert!(state.wave.lives > 0 || state.phase == GamePhase::GameOver);
        }

        #[test]
        fn prop_lives_drop_only_on_player_hits(seed in any::<u64>(), ticks in 1usize..6000) {
            // A stationary player sits under the middle column and takes fire
            let mut state = new_state(seed);
            let mut lives = state.wave.lives;

            for _ in 0..ticks {
                tick(&mut state, &TickInput::default(), SIM_DT);
                let hits = state
                    .drain_events()
                    .iter()
                    .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
                    .count();
                prop_assert_eq!((lives - state.wave.lives) as usize, hits);
                lives = state.wave.lives;
            }
        }
    }
}
