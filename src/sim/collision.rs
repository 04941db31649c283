//! Collision detection and response
//!
//! All checks are AABB overlaps between live actors. Resolution marks actors
//! dead immediately, so anything destroyed earlier in a pass is invisible to
//! every later check in the same tick.

use super::actor::Actor;
use super::store::EntityStore;

/// A player bullet destroyed an alien
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlienKill {
    pub bullet_id: u32,
    pub alien_id: u32,
}

/// What hit the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerHit {
    /// An alien bullet (consumed by the hit)
    Bullet { bullet_id: u32 },
    /// Direct contact with an alien (the alien survives)
    Contact { alien_id: u32 },
}

/// Whether to keep resolving after a player hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResponse {
    Continue,
    Stop,
}

/// First live alien overlapping `bullet`, in store order
pub fn first_overlap<'a>(bullet: &Actor, aliens: &'a mut [Actor]) -> Option<&'a mut Actor> {
    aliens.iter_mut().find(|alien| bullet.touches(alien))
}

/// Resolve player bullets against aliens.
///
/// Each bullet destroys at most one alien: the first overlapping one in store
/// order. Destroyed aliens cannot be claimed by later bullets.
pub fn resolve_player_bullets(store: &mut EntityStore) -> Vec<AlienKill> {
    let mut kills = Vec::new();
    for bullet in store.player_bullets.iter_mut().filter(|b| b.alive) {
        if let Some(alien) = first_overlap(bullet, &mut store.aliens) {
            alien.destroy();
            bullet.destroy();
            kills.push(AlienKill {
                bullet_id: bullet.id,
                alien_id: alien.id,
            });
        }
    }
    kills
}

/// Resolve alien bullets, then alien bodies, against the player.
///
/// `on_hit` is called once per hit in resolution order; returning
/// [`HitResponse::Stop`] ends processing immediately (the player is out of
/// lives). Returns the number of hits delivered.
pub fn resolve_player_hits<F>(store: &mut EntityStore, mut on_hit: F) -> u32
where
    F: FnMut(PlayerHit) -> HitResponse,
{
    let player = &store.player;
    let mut hits = 0;

    for bullet in store.alien_bullets.iter_mut() {
        if !bullet.touches(player) {
            continue;
        }
        bullet.destroy();
        hits += 1;
        if on_hit(PlayerHit::Bullet { bullet_id: bullet.id }) == HitResponse::Stop {
            return hits;
        }
    }

    for alien in store.aliens.iter() {
        if !alien.touches(player) {
            continue;
        }
        hits += 1;
        if on_hit(PlayerHit::Contact { alien_id: alien.id }) == HitResponse::Stop {
            return hits;
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::store::BulletDirection;
    use glam::Vec2;
    use proptest::prelude::*;

    fn store() -> EntityStore {
        EntityStore::new(Vec2::new(400.0, 550.0))
    }

    #[test]
    fn test_bullet_kills_first_alien_in_store_order() {
        let mut s = store();
        // Two aliens stacked on the same spot
        s.spawn_alien_grid(2, 1, Vec2::new(200.0, 100.0), Vec2::new(0.0, 0.0), 0.0);
        s.spawn_bullet(Vec2::new(200.0, 100.0), BulletDirection::Up, 400.0);

        let kills = resolve_player_bullets(&mut s);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].alien_id, s.aliens[0].id);
        assert!(!s.aliens[0].alive);
        assert!(s.aliens[1].alive);
        assert!(!s.player_bullets[0].alive);
    }

    #[test]
    fn test_dead_alien_not_claimed_twice() {
        let mut s = store();
        s.spawn_alien_grid(1, 1, Vec2::new(200.0, 100.0), Vec2::ZERO, 0.0);
        s.spawn_bullet(Vec2::new(200.0, 100.0), BulletDirection::Up, 400.0);
        s.spawn_bullet(Vec2::new(201.0, 100.0), BulletDirection::Up, 400.0);

        let kills = resolve_player_bullets(&mut s);
        assert_eq!(kills.len(), 1);
        // Second bullet flies on
        assert!(s.player_bullets[1].alive);
    }

    #[test]
    fn test_alien_bullet_hits_player() {
        let mut s = store();
        s.spawn_bullet(Vec2::new(400.0, 550.0), BulletDirection::Down, 200.0);
        let mut seen = Vec::new();
        let hits = resolve_player_hits(&mut s, |hit| {
            seen.push(hit);
            HitResponse::Continue
        });
        assert_eq!(hits, 1);
        assert!(matches!(seen[0], PlayerHit::Bullet { .. }));
        assert!(!s.alien_bullets[0].alive);
    }

    #[test]
    fn test_alien_contact_keeps_alien() {
        let mut s = store();
        s.spawn_alien_grid(1, 1, Vec2::new(400.0, 550.0), Vec2::ZERO, 0.0);
        let hits = resolve_player_hits(&mut s, |_| HitResponse::Continue);
        assert_eq!(hits, 1);
        assert!(s.aliens[0].alive);
    }

    #[test]
    fn test_stop_halts_resolution() {
        let mut s = store();
        s.spawn_bullet(Vec2::new(400.0, 550.0), BulletDirection::Down, 200.0);
        s.spawn_bullet(Vec2::new(401.0, 550.0), BulletDirection::Down, 200.0);
        s.spawn_alien_grid(1, 1, Vec2::new(400.0, 550.0), Vec2::ZERO, 0.0);

        let hits = resolve_player_hits(&mut s, |_| HitResponse::Stop);
        assert_eq!(hits, 1);
        // The second bullet was never examined
        assert!(s.alien_bullets[1].alive);
    }

    proptest! {
        #[test]
        fn prop_bullet_destroys_at_most_one_alien(
            alien_xs in prop::collection::vec(180.0f32..220.0, 1..12),
            bullet_xs in prop::collection::vec(180.0f32..220.0, 1..6),
        ) {
            let mut s = store();
            for x in &alien_xs {
                let id = s.next_entity_id();
                s.aliens.push(Actor::new(id, crate::sim::ActorKind::Alien, Vec2::new(*x, 100.0), Vec2::ZERO));
            }
            for (i, x) in bullet_xs.iter().enumerate() {
                // Distinct origins so none are rejected
                s.spawn_bullet(Vec2::new(*x, 100.0 + i as f32 * 0.001), BulletDirection::Up, 400.0);
            }
            let spawned = s.player_bullets.len();

            let kills = resolve_player_bullets(&mut s);

            // One kill per consumed bullet, never more
            prop_assert!(kills.len() <= spawned);
            let dead_aliens = s.aliens.iter().filter(|a| !a.alive).count();
            let dead_bullets = s.player_bullets.iter().filter(|b| !b.alive).count();
            prop_assert_eq!(dead_aliens, kills.len());
            prop_assert_eq!(dead_bullets, kills.len());

            // No alien claimed twice
            let mut ids: Vec<u32> = kills.iter().map(|k| k.alien_id).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), kills.len());
        }
    }
}
