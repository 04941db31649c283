//! Entity store: active actors partitioned by kind
//!
//! Iteration order is insertion order. Collision tie-breaks depend on it, so
//! nothing here may reorder a collection.

use glam::Vec2;

use super::actor::{Actor, ActorKind};

/// Which way a bullet travels along the y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletDirection {
    /// Toward the top of the playfield (player shots)
    Up,
    /// Toward the bottom of the playfield (alien shots)
    Down,
}

impl BulletDirection {
    pub fn kind(&self) -> ActorKind {
        match self {
            BulletDirection::Up => ActorKind::PlayerBullet,
            BulletDirection::Down => ActorKind::AlienBullet,
        }
    }

    fn sign(&self) -> f32 {
        match self {
            BulletDirection::Up => -1.0,
            BulletDirection::Down => 1.0,
        }
    }
}

/// All live actors of one session
#[derive(Debug, Clone)]
pub struct EntityStore {
    pub player: Actor,
    pub aliens: Vec<Actor>,
    pub player_bullets: Vec<Actor>,
    pub alien_bullets: Vec<Actor>,
    /// Bullet origins spawned during the current tick
    tick_origins: Vec<(ActorKind, Vec2)>,
    next_id: u32,
}

impl EntityStore {
    /// Create a store holding only the player
    pub fn new(player_pos: Vec2) -> Self {
        Self {
            player: Actor::new(1, ActorKind::Player, player_pos, Vec2::ZERO),
            aliens: Vec::new(),
            player_bullets: Vec::new(),
            alien_bullets: Vec::new(),
            tick_origins: Vec::new(),
            next_id: 2,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Forget the bullet origins of the previous tick
    pub fn begin_tick(&mut self) {
        self.tick_origins.clear();
    }

    /// Populate a `rows` x `cols` grid starting at `origin`, every alien moving
    /// horizontally at `velocity_x`. Returns the number spawned.
    pub fn spawn_alien_grid(
        &mut self,
        rows: u32,
        cols: u32,
        origin: Vec2,
        spacing: Vec2,
        velocity_x: f32,
    ) -> usize {
        let before = self.aliens.len();
        for row in 0..rows {
            for col in 0..cols {
                let id = self.next_entity_id();
                let pos = origin + Vec2::new(col as f32 * spacing.x, row as f32 * spacing.y);
                self.aliens.push(Actor::new(
                    id,
                    ActorKind::Alien,
                    pos,
                    Vec2::new(velocity_x, 0.0),
                ));
            }
        }
        self.aliens.len() - before
    }

    /// Spawn a bullet at `origin` moving at `speed` along y.
    ///
    /// Returns `None` when a bullet of the same kind already left this exact
    /// origin during the current tick.
    pub fn spawn_bullet(
        &mut self,
        origin: Vec2,
        direction: BulletDirection,
        speed: f32,
    ) -> Option<u32> {
        let kind = direction.kind();
        if self
            .tick_origins
            .iter()
            .any(|&(k, o)| k == kind && o == origin)
        {
            return None;
        }
        self.tick_origins.push((kind, origin));

        let id = self.next_entity_id();
        let bullet = Actor::new(id, kind, origin, Vec2::new(0.0, direction.sign() * speed));
        match direction {
            BulletDirection::Up => self.player_bullets.push(bullet),
            BulletDirection::Down => self.alien_bullets.push(bullet),
        }
        Some(id)
    }

    /// Set every alien's horizontal velocity
    pub fn set_alien_velocity(&mut self, velocity_x: f32) {
        for alien in &mut self.aliens {
            alien.vel.x = velocity_x;
        }
    }

    /// Move every live actor by velocity * dt
    pub fn integrate(&mut self, dt: f32) {
        self.player.integrate(dt);
        for actor in self
            .aliens
            .iter_mut()
            .chain(self.player_bullets.iter_mut())
            .chain(self.alien_bullets.iter_mut())
            .filter(|a| a.alive)
        {
            actor.integrate(dt);
        }
    }

    /// Destroy bullets whose centre left the `width` x `height` playfield
    pub fn cull_bullets(&mut self, width: f32, height: f32) -> usize {
        let mut culled = 0;
        for bullet in self
            .player_bullets
            .iter_mut()
            .chain(self.alien_bullets.iter_mut())
            .filter(|b| b.alive)
        {
            let p = bullet.pos;
            if p.x < 0.0 || p.x > width || p.y < 0.0 || p.y > height {
                bullet.destroy();
                culled += 1;
            }
        }
        culled
    }

    pub fn alive_aliens(&self) -> impl Iterator<Item = &Actor> {
        self.aliens.iter().filter(|a| a.alive)
    }

    pub fn alien_count(&self) -> usize {
        self.alive_aliens().count()
    }

    /// Drop destroyed actors, keeping insertion order
    pub fn sweep(&mut self) {
        self.aliens.retain(|a| a.alive);
        self.player_bullets.retain(|b| b.alive);
        self.alien_bullets.retain(|b| b.alive);
    }

    /// Iterate every actor, player first
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        std::iter::once(&self.player)
            .chain(self.aliens.iter())
            .chain(self.player_bullets.iter())
            .chain(self.alien_bullets.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EntityStore {
        EntityStore::new(Vec2::new(400.0, 550.0))
    }

    #[test]
    fn test_spawn_grid_layout() {
        let mut s = store();
        let n = s.spawn_alien_grid(5, 10, Vec2::new(100.0, 50.0), Vec2::new(60.0, 50.0), -50.0);
        assert_eq!(n, 50);
        assert_eq!(s.aliens[0].pos, Vec2::new(100.0, 50.0));
        assert_eq!(s.aliens[9].pos, Vec2::new(640.0, 50.0));
        assert_eq!(s.aliens[49].pos, Vec2::new(640.0, 250.0));
        assert!(s.aliens.iter().all(|a| a.vel == Vec2::new(-50.0, 0.0)));
        // Row-major insertion order
        assert!(s.aliens.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_duplicate_origin_rejected_within_tick() {
        let mut s = store();
        let origin = Vec2::new(400.0, 530.0);
        assert!(s.spawn_bullet(origin, BulletDirection::Up, 400.0).is_some());
        assert!(s.spawn_bullet(origin, BulletDirection::Up, 400.0).is_none());
        // Other kind, same origin is fine
        assert!(s.spawn_bullet(origin, BulletDirection::Down, 200.0).is_some());
        assert_eq!(s.player_bullets.len(), 1);

        s.begin_tick();
        assert!(s.spawn_bullet(origin, BulletDirection::Up, 400.0).is_some());
        assert_eq!(s.player_bullets.len(), 2);
    }

    #[test]
    fn test_bullet_velocity_direction() {
        let mut s = store();
        s.spawn_bullet(Vec2::new(10.0, 10.0), BulletDirection::Up, 400.0);
        s.spawn_bullet(Vec2::new(20.0, 10.0), BulletDirection::Down, 200.0);
        assert_eq!(s.player_bullets[0].vel, Vec2::new(0.0, -400.0));
        assert_eq!(s.alien_bullets[0].vel, Vec2::new(0.0, 200.0));
        assert!(s.player_bullets[0].kind.is_bullet());
    }

    #[test]
    fn test_cull_and_sweep() {
        let mut s = store();
        s.spawn_bullet(Vec2::new(100.0, 2.0), BulletDirection::Up, 400.0);
        s.spawn_bullet(Vec2::new(100.0, 300.0), BulletDirection::Up, 400.0);
        s.integrate(0.01); // first bullet moves to y = -2
        assert_eq!(s.cull_bullets(800.0, 600.0), 1);
        s.sweep();
        assert_eq!(s.player_bullets.len(), 1);
        assert_eq!(s.player_bullets[0].pos.y, 296.0);
    }
}
