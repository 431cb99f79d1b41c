use crate::{Ball, Config, Events, PowerUps, Side, SoundKind};
use hecs::World;

/// Reflect a ball that enters an active shield's band in front of a goal.
///
/// Any ball inside the band bounces, whatever its height relative to the
/// paddle. The band ends at the paddle plane; a ball already past it is lost. Reflection never spends a charge; the shield stays up until its
/// own timer runs out.
pub fn check_shields(world: &mut World, config: &Config, power: &PowerUps, events: &mut Events) {
    let host_face = config.paddle_x(Side::Host);
    let client_face = config.paddle_x(Side::Client) + config.paddle_width;

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if power.shield_active(Side::Host)
            && ball.vel.x > 0.0
            && ball.pos.x + config.ball_size >= host_face - config.shield_band
            && ball.pos.x <= host_face
        {
            ball.vel.x = -ball.vel.x.abs();
            ball.pos.x = host_face - config.shield_band - config.ball_size;
            events.shield_reflected = Some(Side::Host);
            events.sound(SoundKind::Shield, 0.3);
        } else if power.shield_active(Side::Client)
            && ball.vel.x < 0.0
            && ball.pos.x <= client_face + config.shield_band
            && ball.pos.x + config.ball_size >= client_face
        {
            ball.vel.x = ball.vel.x.abs();
            ball.pos.x = client_face + config.shield_band;
            events.shield_reflected = Some(Side::Client);
            events.sound(SoundKind::Shield, 0.3);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_ball;
    use glam::Vec2;

    fn shielded(side: Side) -> (Config, PowerUps) {
        let config = Config::new();
        let mut power = PowerUps::new(&config);
        power.activate_shield(side, 0, config.shield_duration_ms);
        (config, power)
    }

    fn only_ball(world: &World) -> Ball {
        let mut query = world.query::<&Ball>();
        let (_e, ball) = query.iter().next().expect("ball should exist");
        *ball
    }

    #[test]
    fn test_host_shield_reflects_regardless_of_height() {
        let (config, power) = shielded(Side::Host);
        let mut world = World::new();
        let mut events = Events::new();
        // Far above where any paddle would be
        create_ball(&mut world, Vec2::new(1565.0, 3.0), Vec2::new(9.0, 4.0), 9.0);

        check_shields(&mut world, &config, &power, &mut events);

        let ball = only_ball(&world);
        assert_eq!(ball.vel.x, -9.0, "dx sign flips");
        assert_eq!(ball.vel.y, 4.0, "dy is untouched");
        assert_eq!(ball.pos.x, 1560.0, "Ball sits just outside the band");
        assert_eq!(events.shield_reflected, Some(Side::Host));
        assert_eq!(events.sounds[0].sound, SoundKind::Shield);
    }

    #[test]
    fn test_client_shield_reflects() {
        let (config, power) = shielded(Side::Client);
        let mut world = World::new();
        let mut events = Events::new();
        create_ball(&mut world, Vec2::new(5.0, 800.0), Vec2::new(-7.0, -3.0), 7.0);

        check_shields(&mut world, &config, &power, &mut events);

        let ball = only_ball(&world);
        assert_eq!(ball.vel.x, 7.0);
        assert_eq!(ball.vel.y, -3.0);
        assert_eq!(ball.pos.x, 30.0);
    }

    #[test]
    fn test_reflection_does_not_spend_charge() {
        let (config, power) = shielded(Side::Host);
        let charges = power.shields[Side::Host];
        let mut world = World::new();
        let mut events = Events::new();
        create_ball(&mut world, Vec2::new(1575.0, 500.0), Vec2::new(7.0, 0.0), 7.0);

        check_shields(&mut world, &config, &power, &mut events);

        assert_eq!(power.shields[Side::Host], charges);
        assert!(power.shield_active(Side::Host), "Shield stays up after a reflection");
    }

    #[test]
    fn test_inactive_or_outside_band_does_nothing() {
        let (config, power) = shielded(Side::Host);
        let mut world = World::new();
        let mut events = Events::new();
        // Outside the band
        create_ball(&mut world, Vec2::new(1500.0, 500.0), Vec2::new(7.0, 0.0), 7.0);
        // Client side has no shield
        create_ball(&mut world, Vec2::new(5.0, 500.0), Vec2::new(-7.0, 0.0), 7.0);

        check_shields(&mut world, &config, &power, &mut events);

        assert!(events.shield_reflected.is_none());
        for (_e, ball) in world.query::<&Ball>().iter() {
            assert_eq!(ball.vel.x.abs(), 7.0);
            assert_eq!(ball.vel.x.signum(), if ball.pos.x > 800.0 { 1.0 } else { -1.0 });
        }
    }

    #[test]
    fn test_ball_behind_paddle_plane_is_not_saved() {
        let config = Config::new();
        let mut power = PowerUps::new(&config);
        power.activate_shield(Side::Host, 0, config.shield_duration_ms);
        power.activate_shield(Side::Client, 0, config.shield_duration_ms);
        let mut world = World::new();
        let mut events = Events::new();
        // Host: left edge past x = 1590
        create_ball(&mut world, Vec2::new(1592.0, 300.0), Vec2::new(7.0, 0.0), 7.0);
        // Client: right edge short of x = 10
        create_ball(&mut world, Vec2::new(-2.0, 300.0), Vec2::new(-7.0, 0.0), 7.0);

        check_shields(&mut world, &config, &power, &mut events);

        assert!(events.shield_reflected.is_none());
        assert!(events.sounds.is_empty());
        let mut xs: Vec<f32> = world.query::<&Ball>().iter().map(|(_e, b)| b.pos.x).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(xs, vec![-2.0, 1592.0], "Neither ball is pulled back into the court");
    }

    #[test]
    fn test_ball_leaving_band_is_ignored() {
        let (config, power) = shielded(Side::Host);
        let mut world = World::new();
        let mut events = Events::new();
        create_ball(&mut world, Vec2::new(1575.0, 500.0), Vec2::new(-7.0, 0.0), 7.0);

        check_shields(&mut world, &config, &power, &mut events);

        assert_eq!(only_ball(&world).vel.x, -7.0);
    }
}
