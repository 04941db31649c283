//! Shape generation: everything on screen is an axis-aligned rectangle

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::sim::{Actor, ActorKind, GameState};

/// Two triangles covering a `size` rectangle centred on `center`
pub fn rect(center: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let half = size * 0.5;
    let min = center - half;
    let max = center + half;
    [
        Vertex::at(Vec2::new(min.x, min.y), color),
        Vertex::at(Vec2::new(max.x, min.y), color),
        Vertex::at(Vec2::new(min.x, max.y), color),
        Vertex::at(Vec2::new(min.x, max.y), color),
        Vertex::at(Vec2::new(max.x, min.y), color),
        Vertex::at(Vec2::new(max.x, max.y), color),
    ]
}

/// Fill color for an actor
fn actor_color(actor: &Actor, hit_flash: bool) -> [f32; 4] {
    match actor.kind {
        ActorKind::Player if hit_flash => colors::PLAYER_HIT,
        ActorKind::Player => colors::PLAYER,
        ActorKind::Alien => colors::ALIEN,
        ActorKind::PlayerBullet => colors::PLAYER_BULLET,
        ActorKind::AlienBullet => colors::ALIEN_BULLET,
    }
}

/// Vertices for the whole playfield, in playfield pixel coordinates
pub fn scene(state: &GameState) -> Vec<Vertex> {
    let actor_count = state.store.actors().count();
    let mut vertices = Vec::with_capacity((actor_count + 1) * 6);

    let t = &state.tuning;
    vertices.extend(rect(
        Vec2::new(t.playfield_width * 0.5, t.alien_loss_y),
        Vec2::new(t.playfield_width, 1.0),
        colors::LOSS_LINE,
    ));

    let hit_flash = state.hit_flash_ms > 0.0;
    for actor in state.store.actors().filter(|a| a.alive) {
        vertices.extend(rect(actor.pos, actor.size, actor_color(actor, hit_flash)));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_rect_covers_bounds() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(4.0, 10.0), colors::ALIEN);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 8.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 12.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 15.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 25.0);
    }

    #[test]
    fn test_scene_has_quad_per_actor() {
        let mut state = GameState::new(1, Tuning::default());
        // Loss line + player + 50 aliens
        assert_eq!(scene(&state).len(), 52 * 6);

        state.hit_flash_ms = 500.0;
        let verts = scene(&state);
        // Player quad follows the loss line
        assert_eq!(verts[6].color, colors::PLAYER_HIT);
    }
}
