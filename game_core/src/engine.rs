//! Host-side match driver.
//!
//! Owns the authoritative world and every timer tied to it: ball boost
//! restoration, shield expiry, paddle boost windows and the match clock.
//! Dropping the engine tears all of them down.

use glam::Vec2;
use hecs::World;

use crate::systems::{apply_ball_boost, move_paddle, place_paddle, restore_ball_boost};
use crate::{
    create_ball, create_paddle, step, Ball, Config, ControlState, Events, GameOutcome, Paddle,
    PowerUps, Score, Side, Snapshot, SoundEvent, SoundKind,
};

const SECOND_MS: u64 = 1000;

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for an opponent
    Idle,
    /// Both peers present; host may start
    Ready,
    Running,
    Ended,
}

/// Everything one tick produced
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub snapshot: Snapshot,
    pub sounds: Vec<SoundEvent>,
    /// Set on the tick the match ends
    pub outcome: Option<GameOutcome>,
    /// Shields whose timers ran out this tick
    pub shields_expired: Vec<Side>,
    /// The host's own paddle moved this tick
    pub host_paddle_moved: bool,
}

pub struct SimulationEngine {
    world: World,
    config: Config,
    score: Score,
    power: PowerUps,
    events: Events,
    phase: GamePhase,
    time_remaining: u32,
    next_second_ms: u64,
    outcome: Option<GameOutcome>,
}

impl SimulationEngine {
    pub fn new(config: Config) -> Self {
        let mut world = World::new();
        let spawn_y = config.paddle_spawn_y();
        create_paddle(&mut world, Side::Host, spawn_y);
        create_paddle(&mut world, Side::Client, spawn_y);

        let mut ball = Ball::new(Vec2::ZERO, Vec2::ZERO, config.ball_speed_initial);
        ball.reset(Side::Host, &config);
        create_ball(&mut world, ball.pos, ball.vel, ball.base_speed);

        Self {
            power: PowerUps::new(&config),
            time_remaining: config.match_seconds,
            world,
            config,
            score: Score::new(),
            events: Events::new(),
            phase: GamePhase::Idle,
            next_second_ms: 0,
            outcome: None,
        }
    }

    /// Rebuild authority from the last mirrored snapshot (client promotion).
    ///
    /// The engine starts paused in `Idle`: the peer that held authority is
    /// gone, so play resumes only after a new opponent arrives.
    pub fn from_snapshot(config: Config, snapshot: &Snapshot, now_ms: u64) -> Self {
        let mut engine = Self::new(config);

        let vel = Vec2::new(snapshot.ball_dx, snapshot.ball_dy);
        let base_speed = vel
            .length()
            .clamp(engine.config.ball_speed_initial, engine.config.ball_speed_max);
        for (_entity, ball) in engine.world.query_mut::<&mut Ball>() {
            ball.pos = Vec2::new(snapshot.ball_x, snapshot.ball_y);
            ball.prev = ball.pos;
            ball.vel = vel;
            ball.base_speed = base_speed;
        }
        for side in [Side::Host, Side::Client] {
            place_paddle(&mut engine.world, side, snapshot.paddle_y(side), &engine.config);
        }

        engine.score = Score {
            host: snapshot.host_score,
            client: snapshot.client_score,
        };
        for side in [Side::Host, Side::Client] {
            engine.power.boosts[side] = snapshot.boosts(side).min(engine.config.max_boosts);
            engine.power.shields[side] = snapshot.shields(side).min(engine.config.max_shields);
            if snapshot.shield_active(side) {
                let shield = &mut engine.power.shield[side];
                shield.active = true;
                shield.timer.schedule(now_ms, engine.config.shield_duration_ms);
            }
        }
        engine.time_remaining = snapshot.time_remaining.min(engine.config.match_seconds);
        engine
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn power(&self) -> &PowerUps {
        &self.power
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn ball(&self) -> Option<Ball> {
        self.world
            .query::<&Ball>()
            .iter()
            .next()
            .map(|(_e, ball)| *ball)
    }

    pub fn paddle(&self, side: Side) -> Option<Paddle> {
        self.world
            .query::<&Paddle>()
            .iter()
            .find(|(_e, paddle)| paddle.side == side)
            .map(|(_e, paddle)| *paddle)
    }

    /// Second peer arrived: Idle → Ready
    pub fn mark_ready(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Ready;
        true
    }

    /// Opponent left: pause and wait for a new one
    pub fn mark_waiting(&mut self) {
        self.reset();
        self.phase = GamePhase::Idle;
    }

    /// Host's start action: Ready → Running with everything reset
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.phase != GamePhase::Ready {
            return false;
        }
        self.reset();
        self.next_second_ms = now_ms.saturating_add(SECOND_MS);
        self.phase = GamePhase::Running;
        true
    }

    /// Host's restart action: Ended → Idle
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::Ended {
            return false;
        }
        self.reset();
        self.phase = GamePhase::Idle;
        true
    }

    fn reset(&mut self) {
        self.score = Score::new();
        self.power.reset(&self.config);
        self.time_remaining = self.config.match_seconds;
        self.outcome = None;
        self.events.clear();

        let spawn_y = self.config.paddle_spawn_y();
        for (_entity, paddle) in self.world.query_mut::<&mut Paddle>() {
            paddle.y = spawn_y;
            paddle.boost_window.cancel();
        }
        for (_entity, ball) in self.world.query_mut::<&mut Ball>() {
            ball.reset(Side::Host, &self.config);
        }
    }

    /// Paddle position reported by the client peer
    pub fn set_remote_paddle(&mut self, y: f32) {
        place_paddle(&mut self.world, Side::Client, y, &self.config);
    }

    /// Spend a boost for `side`: spike the ball and open that side's paddle
    /// speed window. No-op (and no charge spent) while a boost is running.
    pub fn use_boost(&mut self, side: Side, now_ms: u64) -> bool {
        if self.phase != GamePhase::Running || self.power.boosts[side] == 0 {
            return false;
        }
        if self.ball().is_some_and(|ball| ball.boost.active) {
            return false;
        }
        if !apply_ball_boost(&mut self.world, &self.config, now_ms) {
            return false;
        }
        self.power.spend_boost(side);

        let duration = self.config.boost_duration_ms;
        for (_entity, paddle) in self.world.query_mut::<&mut Paddle>() {
            if paddle.side == side {
                paddle.boost_window.schedule(now_ms, duration);
            }
        }
        true
    }

    pub fn activate_shield(&mut self, side: Side, now_ms: u64) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.power
            .activate_shield(side, now_ms, self.config.shield_duration_ms)
    }

    pub fn deactivate_shield(&mut self, side: Side) {
        self.power.deactivate_shield(side);
    }

    /// One fixed tick. Returns `None` unless the match is running.
    pub fn tick(&mut self, now_ms: u64, controls: &ControlState) -> Option<TickOutput> {
        if self.phase != GamePhase::Running {
            return None;
        }
        self.events.clear();

        // Timers due since the last tick
        let shields_expired = self.power.expire_shields(now_ms);
        restore_ball_boost(&mut self.world, now_ms);

        let host_paddle_moved =
            move_paddle(&mut self.world, Side::Host, controls, now_ms, &self.config);

        step(
            &mut self.world,
            &self.config,
            &self.power,
            &mut self.score,
            &mut self.events,
        );

        if let Some(winner) = self.score.has_winner(self.config.win_score) {
            self.end(GameOutcome::Winner(winner));
        } else {
            self.run_clock(now_ms);
        }

        Some(TickOutput {
            snapshot: self.snapshot(controls),
            sounds: self.events.sounds.clone(),
            outcome: self.outcome.filter(|_| self.phase == GamePhase::Ended),
            shields_expired,
            host_paddle_moved,
        })
    }

    fn run_clock(&mut self, now_ms: u64) {
        while self.time_remaining > 0 && now_ms >= self.next_second_ms {
            self.time_remaining -= 1;
            self.next_second_ms = self.next_second_ms.saturating_add(SECOND_MS);
        }
        if self.time_remaining == 0 {
            self.end(GameOutcome::from_winner(self.score.leader()));
        }
    }

    fn end(&mut self, outcome: GameOutcome) {
        self.phase = GamePhase::Ended;
        self.outcome = Some(outcome);
        self.events.sound(SoundKind::GameOver, 1.0);
    }

    /// Current authoritative state
    pub fn snapshot(&self, controls: &ControlState) -> Snapshot {
        let ball = self
            .ball()
            .unwrap_or_else(|| Ball::new(self.config.ball_spawn(), Vec2::ZERO, 0.0));
        let spawn_y = self.config.paddle_spawn_y();
        let host_paddle = self.paddle(Side::Host);
        let client_paddle = self.paddle(Side::Client);

        Snapshot {
            ball_x: ball.pos.x,
            ball_y: ball.pos.y,
            ball_dx: ball.vel.x,
            ball_dy: ball.vel.y,
            host_paddle_y: host_paddle.map_or(spawn_y, |p| p.y),
            client_paddle_y: client_paddle.map_or(spawn_y, |p| p.y),
            host_score: self.score.host,
            client_score: self.score.client,
            time_remaining: self.time_remaining,
            host_boosts: self.power.boosts.host,
            client_boosts: self.power.boosts.client,
            host_shields: self.power.shields.host,
            client_shields: self.power.shields.client,
            host_shield_active: self.power.shield_active(Side::Host),
            client_shield_active: self.power.shield_active(Side::Client),
            ball_boost_active: ball.boost.active,
            host_boost_pressed: controls.boost || host_paddle.is_some_and(|p| p.is_boosted()),
        }
    }
}
