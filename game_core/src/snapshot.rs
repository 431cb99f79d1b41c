use serde::{Deserialize, Serialize};

use crate::components::Side;
use crate::config::Config;

/// Full authoritative state sent host → client once per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_dx: f32,
    pub ball_dy: f32,
    pub host_paddle_y: f32,
    pub client_paddle_y: f32,
    pub host_score: u8,
    pub client_score: u8,
    pub time_remaining: u32,
    pub host_boosts: u8,
    pub client_boosts: u8,
    pub host_shields: u8,
    pub client_shields: u8,
    pub host_shield_active: bool,
    pub client_shield_active: bool,
    pub ball_boost_active: bool,
    pub host_boost_pressed: bool,
}

impl Snapshot {
    /// State right after a start: centred serve toward the host, full power-ups
    pub fn initial(config: &Config) -> Self {
        let ball = config.ball_spawn();
        let paddle_y = config.paddle_spawn_y();
        Self {
            ball_x: ball.x,
            ball_y: ball.y,
            ball_dx: Side::Host.goal_direction() * config.ball_speed_initial,
            ball_dy: 0.0,
            host_paddle_y: paddle_y,
            client_paddle_y: paddle_y,
            host_score: 0,
            client_score: 0,
            time_remaining: config.match_seconds,
            host_boosts: config.max_boosts,
            client_boosts: config.max_boosts,
            host_shields: config.max_shields,
            client_shields: config.max_shields,
            host_shield_active: false,
            client_shield_active: false,
            ball_boost_active: false,
            host_boost_pressed: false,
        }
    }

    pub fn score(&self, side: Side) -> u8 {
        match side {
            Side::Host => self.host_score,
            Side::Client => self.client_score,
        }
    }

    pub fn paddle_y(&self, side: Side) -> f32 {
        match side {
            Side::Host => self.host_paddle_y,
            Side::Client => self.client_paddle_y,
        }
    }

    pub fn shield_active(&self, side: Side) -> bool {
        match side {
            Side::Host => self.host_shield_active,
            Side::Client => self.client_shield_active,
        }
    }

    pub fn boosts(&self, side: Side) -> u8 {
        match side {
            Side::Host => self.host_boosts,
            Side::Client => self.client_boosts,
        }
    }

    pub fn shields(&self, side: Side) -> u8 {
        match side {
            Side::Host => self.host_shields,
            Side::Client => self.client_shields,
        }
    }
}

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Side),
    /// Level scores when the clock ran out
    Draw,
}

impl GameOutcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            GameOutcome::Winner(side) => Some(side),
            GameOutcome::Draw => None,
        }
    }

    pub fn from_winner(winner: Option<Side>) -> Self {
        winner.map_or(GameOutcome::Draw, GameOutcome::Winner)
    }
}
