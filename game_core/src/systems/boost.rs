use crate::{Ball, Config};
use hecs::World;

/// Spike the ball to boost speed along its current heading.
///
/// No-op while a boost is already running, so the restoration deadline is
/// never duplicated. Returns true if the boost took effect.
pub fn apply_ball_boost(world: &mut World, config: &Config, now_ms: u64) -> bool {
    let mut applied = false;
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if ball.boost.active {
            continue;
        }
        let speed = ball.speed();
        let direction = ball.vel.normalize_or_zero();
        if direction == glam::Vec2::ZERO {
            continue;
        }

        ball.boost.original_speed = speed;
        ball.vel = direction * config.ball_boost_speed;
        ball.boost.active = true;
        ball.boost.timer.schedule(now_ms, config.boost_duration_ms);
        applied = true;
    }
    applied
}

/// Restore the pre-boost speed once the boost window has elapsed.
///
/// The heading is taken from the current velocity, which may have changed
/// through bounces during the boost.
pub fn restore_ball_boost(world: &mut World, now_ms: u64) -> bool {
    let mut restored = false;
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if !ball.boost.timer.fire(now_ms) || !ball.boost.active {
            continue;
        }
        ball.vel = ball.vel.normalize_or_zero() * ball.boost.original_speed;
        ball.boost.active = false;
        restored = true;
    }
    restored
}

/// Drop any running boost without restoring speed (used on serve)
pub fn cancel_ball_boost(ball: &mut Ball) {
    ball.boost.active = false;
    ball.boost.timer.cancel();
}
