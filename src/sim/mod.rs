//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod state;
pub mod store;
pub mod tick;

pub use actor::{Aabb, Actor, ActorKind};
pub use collision::{AlienKill, HitResponse, PlayerHit, resolve_player_bullets, resolve_player_hits};
pub use state::{GameEvent, GameOverCause, GamePhase, GameState, WaveState};
pub use store::{BulletDirection, EntityStore};
pub use tick::{TickInput, tick};
