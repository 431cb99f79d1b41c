use crate::court::{contact_time, paddle_rect, Aabb};
use crate::{Ball, Config, Events, Paddle, Side, SoundKind};
use glam::Vec2;
use hecs::World;

/// Reflect the ball off the top and bottom walls
pub fn check_walls(world: &mut World, config: &Config, events: &mut Events) {
    let floor = config.court_height - config.ball_size;

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if ball.pos.y <= 0.0 || ball.pos.y >= floor {
            // Clamp position to prevent sticking in the wall
            ball.pos.y = ball.pos.y.clamp(0.0, floor);
            ball.vel.y = -ball.vel.y;
            events.ball_hit_wall = true;
            events.sound(SoundKind::Hit, 0.5);
        }
    }
}

/// Swept ball-vs-paddle test.
///
/// The ball's path for the tick is treated as one box spanning its previous
/// and current positions, so a fast ball cannot tunnel through a 10px paddle.
pub fn check_paddles(world: &mut World, config: &Config, events: &mut Events) {
    // Collect paddle data without holding borrows
    let paddles: Vec<(Side, f32)> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, paddle)| (paddle.side, paddle.y))
        .collect();

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let path = Aabb::swept(ball.prev, ball.pos, config.ball_size);

        for &(side, paddle_y) in &paddles {
            // Only bounce if the ball is heading toward this paddle's goal
            if ball.vel.x * side.goal_direction() <= 0.0 {
                continue;
            }
            if !path.intersects(&paddle_rect(config, side, paddle_y)) {
                continue;
            }

            bounce_off_paddle(ball, side, paddle_y, config);
            events.ball_hit_paddle = Some(side);
            events.sound(SoundKind::Hit, 1.0);
            return;
        }
    }
}

/// Outgoing angle for a contact at `contact_y` (ball top edge).
///
/// Positive angles send the ball upward. Result is within `±max_deflection`
/// and zero when the ball centre meets the paddle centre.
pub fn deflection_angle(contact_y: f32, paddle_y: f32, config: &Config) -> f32 {
    let half_height = config.paddle_height / 2.0;
    let relative = (paddle_y + half_height) - (contact_y + config.ball_size / 2.0);
    (relative / half_height).clamp(-1.0, 1.0) * config.max_deflection
}

fn bounce_off_paddle(ball: &mut Ball, side: Side, paddle_y: f32, config: &Config) {
    let paddle_x = config.paddle_x(side);

    // (leading edge offset, paddle face, resting x flush with the face)
    let (leading, face_x, rest_x) = match side {
        Side::Host => (config.ball_size, paddle_x, paddle_x - config.ball_size),
        Side::Client => (
            0.0,
            paddle_x + config.paddle_width,
            paddle_x + config.paddle_width,
        ),
    };

    let t = contact_time(ball.prev, ball.pos, leading, face_x).unwrap_or(1.0);
    let contact_y = ball.prev.y + (ball.pos.y - ball.prev.y) * t;
    ball.pos = Vec2::new(rest_x, contact_y);

    ball.base_speed = (ball.base_speed + config.ball_speed_increase).min(config.ball_speed_max);

    let angle = deflection_angle(contact_y, paddle_y, config);
    ball.vel = Vec2::new(
        -side.goal_direction() * ball.base_speed * angle.cos(),
        -ball.base_speed * angle.sin(),
    );
}
