use crate::{cancel_ball_boost, Ball, Config, Events, Score, Side, SoundKind};
use hecs::World;

/// Check if the ball crossed a goal line.
///
/// The conceding side's opponent scores and the ball is served from the
/// centre toward the side that conceded.
pub fn check_scoring(world: &mut World, config: &Config, score: &mut Score, events: &mut Events) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let conceded = if ball.pos.x + config.ball_size >= config.court_width {
            Side::Host
        } else if ball.pos.x <= 0.0 {
            Side::Client
        } else {
            continue;
        };

        let scorer = conceded.opponent();
        score.increment(scorer);
        events.scored = Some(scorer);
        events.sound(SoundKind::Score, 1.0);

        cancel_ball_boost(ball);
        ball.reset(conceded, config);
    }
}
