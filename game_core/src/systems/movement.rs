use crate::{Ball, Config, ControlState, Paddle, Side};
use hecs::World;

/// Apply held-direction input to one side's paddle. Returns true if it moved.
pub fn move_paddle(
    world: &mut World,
    side: Side,
    controls: &ControlState,
    now_ms: u64,
    config: &Config,
) -> bool {
    let mut moved = false;
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        if paddle.side == side {
            moved = paddle.integrate(controls, now_ms, config);
        }
    }
    moved
}

/// Set a paddle position reported by the remote peer
pub fn place_paddle(world: &mut World, side: Side, y: f32, config: &Config) {
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        if paddle.side == side {
            paddle.y = config.clamp_paddle_y(y);
        }
    }
}

/// Advance ball by one tick of velocity
pub fn move_ball(world: &mut World) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.prev = ball.pos;
        ball.pos += ball.vel;
    }
}
