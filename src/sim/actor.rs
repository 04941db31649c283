//! Actors and their bounding boxes

use glam::Vec2;

use crate::consts::{ALIEN_SIZE, BULLET_SIZE, PLAYER_SIZE};

/// What an actor is; the entity store is partitioned by this tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    Alien,
    PlayerBullet,
    AlienBullet,
}

impl ActorKind {
    /// Sprite size in pixels
    pub fn size(&self) -> Vec2 {
        let (w, h) = match self {
            ActorKind::Player => PLAYER_SIZE,
            ActorKind::Alien => ALIEN_SIZE,
            ActorKind::PlayerBullet | ActorKind::AlienBullet => BULLET_SIZE,
        };
        Vec2::new(w, h)
    }

    pub fn is_bullet(&self) -> bool {
        matches!(self, ActorKind::PlayerBullet | ActorKind::AlienBullet)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap: boxes that only share an edge do not touch
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// A moving rectangle on the playfield
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: u32,
    pub kind: ActorKind,
    /// Centre position (pixels)
    pub pos: Vec2,
    /// Velocity (pixels/second)
    pub vel: Vec2,
    pub size: Vec2,
    /// Cleared the moment the actor is destroyed; swept at end of tick
    pub alive: bool,
}

impl Actor {
    pub fn new(id: u32, kind: ActorKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            size: kind.size(),
            alive: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Advance position by velocity * dt
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Both alive and overlapping
    pub fn touches(&self, other: &Actor) -> bool {
        self.alive && other.alive && self.bounds().overlaps(&other.bounds())
    }

    pub fn destroy(&mut self) {
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_center(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_center(Vec2::new(8.0, 0.0), Vec2::new(10.0, 10.0));
        let c = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Shared edge only
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_dead_actors_never_touch() {
        let mut bullet = Actor::new(1, ActorKind::PlayerBullet, Vec2::new(100.0, 100.0), Vec2::ZERO);
        let alien = Actor::new(2, ActorKind::Alien, Vec2::new(100.0, 100.0), Vec2::ZERO);
        assert!(bullet.touches(&alien));
        bullet.destroy();
        assert!(!bullet.touches(&alien));
    }

    #[test]
    fn test_integrate() {
        let mut a = Actor::new(1, ActorKind::AlienBullet, Vec2::new(10.0, 10.0), Vec2::new(0.0, 200.0));
        a.integrate(0.5);
        assert_eq!(a.pos, Vec2::new(10.0, 110.0));
    }
}
