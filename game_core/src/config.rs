use crate::components::Side;
use crate::params::Params;

/// Game configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub court_width: f32,
    pub court_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_boost_speed: f32,
    pub ball_size: f32,
    pub ball_speed_initial: f32,
    pub ball_speed_max: f32,
    pub ball_speed_increase: f32,
    pub ball_boost_speed: f32,
    pub max_deflection: f32,
    pub max_boosts: u8,
    pub max_shields: u8,
    pub boost_duration_ms: u64,
    pub shield_duration_ms: u64,
    pub shield_band: f32,
    pub win_score: u8,
    pub match_seconds: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            court_width: Params::COURT_WIDTH,
            court_height: Params::COURT_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_speed: Params::PADDLE_SPEED,
            paddle_boost_speed: Params::PADDLE_BOOST_SPEED,
            ball_size: Params::BALL_SIZE,
            ball_speed_initial: Params::BALL_SPEED_INITIAL,
            ball_speed_max: Params::BALL_SPEED_MAX,
            ball_speed_increase: Params::BALL_SPEED_INCREASE,
            ball_boost_speed: Params::BALL_BOOST_SPEED,
            max_deflection: Params::MAX_DEFLECTION,
            max_boosts: Params::MAX_BOOSTS,
            max_shields: Params::MAX_SHIELDS,
            boost_duration_ms: Params::BOOST_DURATION_MS,
            shield_duration_ms: Params::SHIELD_DURATION_MS,
            shield_band: Params::SHIELD_BAND,
            win_score: Params::WIN_SCORE,
            match_seconds: Params::MATCH_SECONDS,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// X of the paddle's left edge. Host defends the right goal, client the left.
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Host => self.court_width - self.paddle_width,
            Side::Client => 0.0,
        }
    }

    /// Clamp paddle top Y to court bounds
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        y.clamp(0.0, self.court_height - self.paddle_height)
    }

    /// Paddle top Y that centres the paddle vertically
    pub fn paddle_spawn_y(&self) -> f32 {
        self.court_height / 2.0 - self.paddle_height / 2.0
    }

    /// Serve position: the ball's top-left corner sits on the court midpoint
    pub fn ball_spawn(&self) -> glam::Vec2 {
        glam::Vec2::new(self.court_width / 2.0, self.court_height / 2.0)
    }
}
