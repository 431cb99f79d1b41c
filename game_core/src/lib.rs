//! Authoritative simulation for two-player networked Pong.
//!
//! Only the host peer runs [`SimulationEngine`]; the client mirrors the
//! [`Snapshot`]s it produces.

pub mod components;
pub mod config;
pub mod court;
pub mod engine;
pub mod params;
pub mod resources;
pub mod snapshot;
pub mod systems;

pub use components::*;
pub use config::*;
pub use engine::*;
pub use params::*;
pub use resources::*;
pub use snapshot::*;

use hecs::World;
use systems::*;

/// Run one fixed tick of ball physics: integrate, walls, paddles, shields, goals
pub fn step(
    world: &mut World,
    config: &Config,
    power: &PowerUps,
    score: &mut Score,
    events: &mut Events,
) {
    // 1. Move ball
    move_ball(world);

    // 2. Top/bottom walls
    check_walls(world, config, events);

    // 3. Swept paddle collisions
    check_paddles(world, config, events);

    // 4. Shields in front of each goal
    check_shields(world, config, power, events);

    // 5. Goal lines
    check_scoring(world, config, score, events);
}

/// Helper to create a paddle entity
pub fn create_paddle(world: &mut World, side: Side, y: f32) -> hecs::Entity {
    world.spawn((Paddle::new(side, y),))
}

/// Helper to create the ball entity
pub fn create_ball(
    world: &mut World,
    pos: glam::Vec2,
    vel: glam::Vec2,
    base_speed: f32,
) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel, base_speed),))
}
