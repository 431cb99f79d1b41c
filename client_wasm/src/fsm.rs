//! Match phase machine
//!
//! Idle → Ready → Running → Ended → Idle, mirrored on both peers. The host
//! initiates start and restart; the client follows the matching messages.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmState {
    /// Waiting for an opponent
    Idle,
    /// Room is full; host may start
    Ready,
    Running,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    PeerJoined,
    PeerLeft,
    Start,
    GameOver,
    Restart,
}

impl GameAction {
    /// Only the host may initiate this action locally
    pub fn host_only(self) -> bool {
        matches!(self, GameAction::Start | GameAction::Restart)
    }
}

/// Outcome of one transition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub from: FsmState,
    /// `None` when the action is not allowed from `from`
    pub to: Option<FsmState>,
}

impl TransitionResult {
    pub fn success(&self) -> bool {
        self.to.is_some()
    }
}

/// Match phase shared by both peers
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
#[derive(Debug)]
pub struct GameFsm {
    state: FsmState,
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl GameFsm {
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(constructor))]
    pub fn new() -> Self {
        Self {
            state: FsmState::Idle,
        }
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    pub fn state(&self) -> FsmState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == FsmState::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.state == FsmState::Ended
    }
}

impl GameFsm {
    pub fn can_transition(&self, action: GameAction) -> bool {
        next_state(self.state, action).is_some()
    }

    /// Whether this peer may trigger `action` itself
    pub fn can_initiate(&self, action: GameAction, is_host: bool) -> bool {
        (is_host || !action.host_only()) && self.can_transition(action)
    }

    pub fn transition(&mut self, action: GameAction) -> TransitionResult {
        let from = self.state;
        let to = next_state(from, action);
        if let Some(to) = to {
            self.state = to;
        }
        TransitionResult { from, to }
    }

    pub fn reset(&mut self) {
        self.state = FsmState::Idle;
    }
}

impl Default for GameFsm {
    fn default() -> Self {
        Self::new()
    }
}

fn next_state(state: FsmState, action: GameAction) -> Option<FsmState> {
    use FsmState::*;

    match (state, action) {
        (Idle, GameAction::PeerJoined) => Some(Ready),
        (Ready, GameAction::Start) => Some(Running),
        (Running, GameAction::GameOver) => Some(Ended),
        (Ended, GameAction::Restart) => Some(Idle),
        // Losing the opponent always drops back to waiting
        (Ready | Running | Ended, GameAction::PeerLeft) => Some(Idle),
        _ => None,
    }
}
