//! Per-peer session
//!
//! Owns the role, the phase machine and either the authoritative engine
//! (host) or a mirror of it (client). Incoming frames and the 16 ms tick
//! are fed in; outgoing frames collect in an outbox for the transport.

use crate::fsm::{FsmState, GameAction, GameFsm};
use crate::input::{apply_key, InputKey};
use crate::mirror::ClientMirror;
use game_core::{
    Config, ControlState, GameOutcome, Paddle, Side, SimulationEngine, SoundEvent, SoundKind,
    Timer,
};
use proto::{Message, Role};

/// Something the page layer should react to
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RoleAssigned(Role),
    /// Room full; show the message inline
    JoinRejected(String),
    OpponentLeft,
    /// Our own relay connection dropped
    Disconnected,
    PhaseChanged(FsmState),
    PlaySound(SoundEvent),
    GameOver(GameOutcome),
}

pub struct Session {
    config: Config,
    role: Option<Role>,
    room_id: Option<String>,
    fsm: GameFsm,
    controls: ControlState,
    /// Present only while this peer is host
    engine: Option<SimulationEngine>,
    /// Host feeds its own snapshots in too, so rendering reads one place
    mirror: ClientMirror,
    /// Client's own paddle, integrated locally
    own_paddle: Paddle,
    /// Client's own shield; the activating peer sends the deactivate
    shield_timer: Timer,
    peer_present: bool,
    outbox: Vec<Message>,
    effects: Vec<Effect>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            mirror: ClientMirror::new(&config),
            own_paddle: Paddle::new(Side::Client, config.paddle_spawn_y()),
            config,
            role: None,
            room_id: None,
            fsm: GameFsm::new(),
            controls: ControlState::new(),
            engine: None,
            shield_timer: Timer::new(),
            peer_present: false,
            outbox: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_host(&self) -> bool {
        self.role == Some(Role::Host)
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn phase(&self) -> FsmState {
        self.fsm.state()
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn engine(&self) -> Option<&SimulationEngine> {
        self.engine.as_ref()
    }

    pub fn mirror(&self) -> &ClientMirror {
        &self.mirror
    }

    /// Paddle top edge for rendering. The client's own paddle is local.
    pub fn paddle_y(&self, side: Side) -> f32 {
        match (self.role, side) {
            (Some(Role::Client), Side::Client) => self.own_paddle.y,
            _ => self.mirror.paddle_y(side),
        }
    }

    fn own_side(&self) -> Side {
        self.role.map_or(Side::Host, Role::side)
    }

    /// Frames waiting for the transport, in send order
    pub fn drain_outbox(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    fn send(&mut self, msg: Message) {
        self.outbox.push(msg);
    }

    fn transition(&mut self, action: GameAction) {
        if let Some(state) = self.fsm.transition(action).to {
            self.effects.push(Effect::PhaseChanged(state));
        }
    }

    fn sound(&mut self, sound: SoundKind, intensity: f32) {
        self.effects
            .push(Effect::PlaySound(SoundEvent::new(sound, intensity)));
    }

    // ------------------------------------------------------------------
    // Local actions
    // ------------------------------------------------------------------

    pub fn join(&mut self, room_id: &str) {
        self.send(Message::Join {
            room_id: room_id.to_string(),
        });
    }

    pub fn press(&mut self, key: InputKey, now_ms: u64) {
        apply_key(&mut self.controls, key, true);
        match key {
            InputKey::Boost => {
                self.use_boost(now_ms);
            }
            InputKey::Shield => {
                self.activate_shield(now_ms);
            }
            InputKey::Up | InputKey::Down => {}
        }
    }

    pub fn release(&mut self, key: InputKey) {
        apply_key(&mut self.controls, key, false);
    }

    /// Host only: Ready → Running
    pub fn request_start(&mut self, now_ms: u64) -> bool {
        if !self.fsm.can_initiate(GameAction::Start, self.is_host()) {
            return false;
        }
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        if !engine.start(now_ms) {
            return false;
        }

        let snapshot = engine.snapshot(&self.controls);
        self.mirror.reset(&self.config);
        self.mirror.apply(snapshot, now_ms);
        self.send(Message::Start);
        self.transition(GameAction::Start);
        true
    }

    /// Host only: Ended → Idle, then Ready again if the opponent stayed
    pub fn request_restart(&mut self) -> bool {
        if !self.fsm.can_initiate(GameAction::Restart, self.is_host()) {
            return false;
        }
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        if !engine.restart() {
            return false;
        }
        if self.peer_present {
            engine.mark_ready();
        }

        self.mirror.reset(&self.config);
        self.send(Message::Restart);
        self.transition(GameAction::Restart);
        if self.peer_present {
            self.transition(GameAction::PeerJoined);
        }
        true
    }

    pub fn use_boost(&mut self, now_ms: u64) -> bool {
        if !self.fsm.is_playing() {
            return false;
        }
        let side = self.own_side();

        match self.engine.as_mut() {
            Some(engine) => {
                if !engine.use_boost(side, now_ms) {
                    return false;
                }
            }
            None => {
                // Engine enforces this on the host; skip frames it would reject
                if self.mirror.boosts(side) == 0 || self.mirror.ball_boost_active() {
                    return false;
                }
                self.own_paddle
                    .boost_window
                    .schedule(now_ms, self.config.boost_duration_ms);
            }
        }

        self.mirror.note_boost_used(side);
        self.send(Message::BoostUse { player: side });
        self.sound(SoundKind::Boost, 0.8);
        true
    }

    pub fn activate_shield(&mut self, now_ms: u64) -> bool {
        if !self.fsm.is_playing() {
            return false;
        }
        let side = self.own_side();

        match self.engine.as_mut() {
            Some(engine) => {
                if engine.power().shield_active(side) || !engine.activate_shield(side, now_ms) {
                    return false;
                }
            }
            None => {
                if self.mirror.shields(side) == 0 || self.mirror.shield_active(side) {
                    return false;
                }
                self.shield_timer
                    .schedule(now_ms, self.config.shield_duration_ms);
            }
        }

        self.mirror.note_shield_used(side);
        self.mirror.set_shield(side, true);
        self.send(Message::ShieldActivate { player: side });
        self.sound(SoundKind::Shield, 0.5);
        true
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Fixed 16 ms step
    pub fn on_tick(&mut self, now_ms: u64) -> Vec<Effect> {
        if self.engine.is_some() {
            self.tick_host(now_ms);
        } else if self.role == Some(Role::Client) {
            self.tick_client(now_ms);
        }
        self.mirror.advance(now_ms);
        std::mem::take(&mut self.effects)
    }

    fn tick_host(&mut self, now_ms: u64) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let Some(out) = engine.tick(now_ms, &self.controls) else {
            return;
        };

        if out.shields_expired.contains(&Side::Host) {
            self.send(Message::ShieldDeactivate { player: Side::Host });
        }
        if out.host_paddle_moved {
            self.send(Message::PaddleUpdate {
                y: out.snapshot.host_paddle_y,
                is_boost_pressed: out.snapshot.host_boost_pressed,
                boosts_remaining: out.snapshot.host_boosts,
            });
        }

        self.send(Message::StateSnapshot(out.snapshot));
        self.mirror.apply(out.snapshot, now_ms);

        for sound in out.sounds {
            self.send(Message::sound(sound));
            self.effects.push(Effect::PlaySound(sound));
        }

        if let Some(outcome) = out.outcome {
            self.send(Message::game_over(
                outcome,
                out.snapshot.host_score,
                out.snapshot.client_score,
            ));
            self.mirror.set_outcome(
                outcome,
                out.snapshot.host_score,
                out.snapshot.client_score,
            );
            self.transition(GameAction::GameOver);
            self.effects.push(Effect::GameOver(outcome));
        }
    }

    fn tick_client(&mut self, now_ms: u64) {
        if !self.fsm.is_playing() {
            return;
        }

        if self.shield_timer.fire(now_ms) {
            self.mirror.set_shield(Side::Client, false);
            self.send(Message::ShieldDeactivate {
                player: Side::Client,
            });
        }

        if self.own_paddle.integrate(&self.controls, now_ms, &self.config) {
            self.send(Message::PaddleUpdate {
                y: self.own_paddle.y,
                is_boost_pressed: self.controls.boost || self.own_paddle.is_boosted(),
                boosts_remaining: self.mirror.boosts(Side::Client),
            });
        }
    }

    // ------------------------------------------------------------------
    // Incoming frames
    // ------------------------------------------------------------------

    pub fn on_message(&mut self, msg: Message, now_ms: u64) -> Vec<Effect> {
        match msg {
            Message::Joined { role, room_id, .. } => self.on_joined(role, room_id, now_ms),
            Message::Ready => self.on_ready(),
            Message::Error { message } => self.effects.push(Effect::JoinRejected(message)),
            Message::PlayerLeft => self.on_player_left(),
            Message::Start => self.on_start(now_ms),
            Message::Restart => self.on_restart(),
            Message::PaddleUpdate { y, .. } => match self.engine.as_mut() {
                Some(engine) => engine.set_remote_paddle(y),
                None => self.mirror.set_paddle(Side::Host, y),
            },
            Message::StateSnapshot(snapshot) => {
                if self.engine.is_none() {
                    self.mirror.apply(snapshot, now_ms);
                }
            }
            Message::BoostUse { player } => self.on_boost_use(player, now_ms),
            Message::ShieldActivate { player } => self.on_shield(player, true, now_ms),
            Message::ShieldDeactivate { player } => self.on_shield(player, false, now_ms),
            Message::SoundEvent { sound, intensity } => {
                if self.engine.is_none() {
                    self.sound(sound, intensity);
                }
            }
            Message::GameOver {
                winner,
                host_score,
                client_score,
            } => self.on_game_over(GameOutcome::from_winner(winner), host_score, client_score),
            // Sent by peers, never received
            Message::Join { .. } => {}
        }
        std::mem::take(&mut self.effects)
    }

    fn on_joined(&mut self, role: Role, room_id: String, now_ms: u64) {
        let promoted = self.role == Some(Role::Client) && role == Role::Host;
        self.role = Some(role);
        self.room_id = Some(room_id);

        match role {
            Role::Host if promoted => {
                // Authority moves here, seeded from what we last saw
                let engine = SimulationEngine::from_snapshot(
                    self.config.clone(),
                    self.mirror.latest(),
                    now_ms,
                );
                self.engine = Some(engine);
                self.shield_timer.cancel();
                self.fsm.reset();
            }
            Role::Host => {
                if self.engine.is_none() {
                    self.engine = Some(SimulationEngine::new(self.config.clone()));
                }
            }
            Role::Client => self.engine = None,
        }
        self.effects.push(Effect::RoleAssigned(role));
    }

    fn on_ready(&mut self) {
        self.peer_present = true;
        if let Some(engine) = self.engine.as_mut() {
            engine.mark_ready();
        }
        self.transition(GameAction::PeerJoined);
    }

    fn on_player_left(&mut self) {
        self.peer_present = false;
        if let Some(engine) = self.engine.as_mut() {
            engine.mark_waiting();
            self.mirror.reset(&self.config);
        }
        self.controls.clear();
        self.transition(GameAction::PeerLeft);
        self.effects.push(Effect::OpponentLeft);
    }

    /// The relay socket closed under us. Stops the match and any timers;
    /// the room is gone so the peer waits until it joins again.
    pub fn on_disconnected(&mut self) -> Vec<Effect> {
        self.peer_present = false;
        if let Some(engine) = self.engine.as_mut() {
            engine.mark_waiting();
            self.mirror.reset(&self.config);
        }
        self.controls.clear();
        self.shield_timer.cancel();
        self.own_paddle.boost_window.cancel();
        self.mirror.set_shield(Side::Client, false);
        // Nothing queued can reach anyone now
        self.outbox.clear();
        self.transition(GameAction::PeerLeft);
        self.effects.push(Effect::Disconnected);
        std::mem::take(&mut self.effects)
    }

    fn on_start(&mut self, now_ms: u64) {
        if self.is_host() || !self.fsm.can_transition(GameAction::Start) {
            return;
        }
        self.mirror.reset(&self.config);
        self.mirror.advance(now_ms);
        self.own_paddle = Paddle::new(Side::Client, self.config.paddle_spawn_y());
        self.shield_timer.cancel();
        self.transition(GameAction::Start);
    }

    fn on_restart(&mut self) {
        if self.is_host() || !self.fsm.can_transition(GameAction::Restart) {
            return;
        }
        self.mirror.reset(&self.config);
        self.transition(GameAction::Restart);
        if self.peer_present {
            self.transition(GameAction::PeerJoined);
        }
    }

    fn on_boost_use(&mut self, player: Side, now_ms: u64) {
        // A peer only speaks for its own side
        if player == self.own_side() {
            return;
        }
        let applied = match self.engine.as_mut() {
            Some(engine) => engine.use_boost(player, now_ms),
            None => {
                self.mirror.note_boost_used(player);
                true
            }
        };
        if applied {
            self.sound(SoundKind::Boost, 0.8);
        }
    }

    fn on_shield(&mut self, player: Side, active: bool, now_ms: u64) {
        if player == self.own_side() {
            return;
        }
        match (self.engine.as_mut(), active) {
            (Some(engine), true) => {
                engine.activate_shield(player, now_ms);
            }
            (Some(engine), false) => engine.deactivate_shield(player),
            (None, _) => self.mirror.set_shield(player, active),
        }
    }

    fn on_game_over(&mut self, outcome: GameOutcome, host_score: u8, client_score: u8) {
        if self.is_host() {
            return;
        }
        self.mirror.set_outcome(outcome, host_score, client_score);
        self.shield_timer.cancel();
        self.transition(GameAction::GameOver);
        self.effects.push(Effect::GameOver(outcome));
    }
}
