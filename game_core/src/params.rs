/// Game tuning parameters for networked Pong
///
/// Distances are court pixels, speeds are pixels per tick.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Court
    pub const COURT_WIDTH: f32 = 1600.0;
    pub const COURT_HEIGHT: f32 = 1000.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    pub const PADDLE_BOOST_SPEED: f32 = 12.0;

    // Ball
    pub const BALL_SIZE: f32 = 10.0;
    pub const BALL_SPEED_INITIAL: f32 = 7.0;
    pub const BALL_SPEED_MAX: f32 = 12.0;
    pub const BALL_SPEED_INCREASE: f32 = 0.4; // Added on every paddle hit
    pub const BALL_BOOST_SPEED: f32 = 15.0;
    pub const MAX_DEFLECTION: f32 = std::f32::consts::FRAC_PI_3; // 60°

    // Power-ups
    pub const MAX_BOOSTS: u8 = 5;
    pub const MAX_SHIELDS: u8 = 3;
    pub const BOOST_DURATION_MS: u64 = 1000;
    pub const SHIELD_DURATION_MS: u64 = 1000;
    pub const SHIELD_BAND: f32 = 20.0;

    // Match
    pub const WIN_SCORE: u8 = 11;
    pub const MATCH_SECONDS: u32 = 90;

    // Loop
    pub const TICK_MS: u64 = 16; // ~60 Hz
}
