use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::config::Config;
use crate::resources::Timer;

/// Which end of the court a peer defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Host,
    Client,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Host => Side::Client,
            Side::Client => Side::Host,
        }
    }

    /// Sign of the x velocity of a ball travelling toward this side's goal
    pub fn goal_direction(self) -> f32 {
        match self {
            Side::Host => 1.0,
            Side::Client => -1.0,
        }
    }
}

/// A value kept once per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerSide<T> {
    pub host: T,
    pub client: T,
}

impl<T: Copy> PerSide<T> {
    pub fn splat(value: T) -> Self {
        Self {
            host: value,
            client: value,
        }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Host => &self.host,
            Side::Client => &self.client,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Host => &mut self.host,
            Side::Client => &mut self.client,
        }
    }
}

/// Paddle component - one per side
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub side: Side,
    pub y: f32, // Top edge, clamped to the court
    /// Paddle speed-up window opened by a boost
    pub boost_window: Timer,
}

impl Paddle {
    pub fn new(side: Side, y: f32) -> Self {
        Self {
            side,
            y,
            boost_window: Timer::new(),
        }
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_window.is_pending()
    }

    /// Apply held direction input for one tick. Returns true if the paddle moved.
    pub fn integrate(&mut self, controls: &ControlState, now_ms: u64, config: &Config) -> bool {
        self.boost_window.fire(now_ms);

        let speed = if self.is_boosted() {
            config.paddle_boost_speed
        } else {
            config.paddle_speed
        };

        let mut y = self.y;
        if controls.up {
            y -= speed;
        }
        if controls.down {
            y += speed;
        }
        let y = config.clamp_paddle_y(y);

        let moved = y != self.y;
        self.y = y;
        moved
    }
}

/// Ball boost bookkeeping
#[derive(Debug, Clone, Copy, Default)]
pub struct BallBoost {
    pub active: bool,
    pub original_speed: f32,
    pub timer: Timer,
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,  // Top-left corner
    pub prev: Vec2, // Position before this tick's move
    pub vel: Vec2,  // Pixels per tick
    /// Speed used for the next paddle return, in `[initial, max]`
    pub base_speed: f32,
    pub boost: BallBoost,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, base_speed: f32) -> Self {
        Self {
            pos,
            prev: pos,
            vel,
            base_speed,
            boost: BallBoost::default(),
        }
    }

    /// Serve from the centre toward `toward` at the initial speed
    pub fn reset(&mut self, toward: Side, config: &Config) {
        self.pos = config.ball_spawn();
        self.prev = self.pos;
        self.base_speed = config.ball_speed_initial;
        self.vel = Vec2::new(toward.goal_direction() * config.ball_speed_initial, 0.0);
        self.boost = BallBoost::default();
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Local input flags. Never sent over the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub up: bool,
    pub down: bool,
    pub boost: bool,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
