//! Browser bindings
//!
//! The page owns the canvas, audio and the 16 ms interval; it calls
//! [`PongClient::tick`] and reads render state back through getters.

use crate::fsm::FsmState;
use crate::input::key_from_str;
use crate::network::{flush, parse_frame, Transport};
use crate::session::{Effect, Session};
use game_core::{Config, GameOutcome, Side, SoundEvent, SoundKind};
use proto::{Message, Role};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

impl Transport for WebSocket {
    fn is_open(&self) -> bool {
        self.ready_state() == WebSocket::OPEN
    }

    fn send_text(&self, text: &str) -> Result<(), String> {
        self.send_with_str(text).map_err(|e| format!("{e:?}"))
    }
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn now_ms() -> u64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() as u64)
        .unwrap_or(0)
}

fn sound_name(sound: SoundKind) -> &'static str {
    match sound {
        SoundKind::Hit => "hit",
        SoundKind::Score => "score",
        SoundKind::Boost => "boost",
        SoundKind::Shield => "shield",
        SoundKind::GameOver => "game-over",
    }
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Host => "host",
        Side::Client => "client",
    }
}

#[wasm_bindgen]
pub struct PongClient {
    session: Session,
    socket: Option<WebSocket>,
    // Filled by the socket callbacks, drained on tick
    inbox: Rc<RefCell<VecDeque<String>>>,
    connected: Rc<RefCell<bool>>,
    // Set by the close callback, consumed on the next tick
    closed: Rc<RefCell<bool>>,
    sounds: Vec<SoundEvent>,
    notices: Vec<String>,
    _on_open: Option<Closure<dyn FnMut(Event)>>,
    _on_message: Option<Closure<dyn FnMut(MessageEvent)>>,
    _on_close: Option<Closure<dyn FnMut(CloseEvent)>>,
}

#[wasm_bindgen]
impl PongClient {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self {
            session: Session::new(Config::new()),
            socket: None,
            inbox: Rc::new(RefCell::new(VecDeque::new())),
            connected: Rc::new(RefCell::new(false)),
            closed: Rc::new(RefCell::new(false)),
            sounds: Vec::new(),
            notices: Vec::new(),
            _on_open: None,
            _on_message: None,
            _on_close: None,
        }
    }

    /// Open the relay socket and join `room_id` once it is up
    pub fn connect(&mut self, url: &str, room_id: &str) -> Result<(), JsValue> {
        let ws = WebSocket::new(url)?;

        let join = Message::Join {
            room_id: room_id.to_string(),
        }
        .to_text()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let connected = self.connected.clone();
        let socket = ws.clone();
        let on_open = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            *connected.borrow_mut() = true;
            if let Err(e) = socket.send_text(&join) {
                log(&format!("join failed: {e}"));
            }
        });
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        let inbox = self.inbox.clone();
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            // Binary frames are not part of the protocol
            if let Some(text) = event.data().as_string() {
                inbox.borrow_mut().push_back(text);
            }
        });
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let connected = self.connected.clone();
        let closed = self.closed.clone();
        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            *connected.borrow_mut() = false;
            *closed.borrow_mut() = true;
            log(&format!("relay closed: code={}", event.code()));
        });
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        self.socket = Some(ws);
        self._on_open = Some(on_open);
        self._on_message = Some(on_message);
        self._on_close = Some(on_close);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// One fixed step: apply received frames, advance, send
    pub fn tick(&mut self) {
        let now = now_ms();

        let frames: Vec<String> = self.inbox.borrow_mut().drain(..).collect();
        for text in frames {
            match parse_frame(&text) {
                Some(msg) => {
                    let effects = self.session.on_message(msg, now);
                    self.handle_effects(effects);
                }
                None => log(&format!("ignoring frame: {text}")),
            }
        }

        if std::mem::take(&mut *self.closed.borrow_mut()) {
            let effects = self.session.on_disconnected();
            self.handle_effects(effects);
        }

        let effects = self.session.on_tick(now);
        self.handle_effects(effects);

        let outbox = self.session.drain_outbox();
        if let Some(socket) = &self.socket {
            flush(outbox, socket);
        }
    }

    fn handle_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let notice = match effect {
                Effect::PlaySound(sound) => {
                    self.sounds.push(sound);
                    continue;
                }
                Effect::RoleAssigned(Role::Host) => "role:host".to_string(),
                Effect::RoleAssigned(Role::Client) => "role:client".to_string(),
                Effect::JoinRejected(message) => format!("rejected:{message}"),
                Effect::OpponentLeft => "opponent-left".to_string(),
                Effect::Disconnected => "disconnected".to_string(),
                Effect::PhaseChanged(state) => format!("phase:{state:?}"),
                Effect::GameOver(GameOutcome::Winner(side)) => {
                    format!("game-over:{}", side_name(side))
                }
                Effect::GameOver(GameOutcome::Draw) => "game-over:draw".to_string(),
            };
            log(&notice);
            self.notices.push(notice);
        }
    }

    /// Returns true when the key is bound, so the page can prevent default
    pub fn key_down(&mut self, key: &str) -> bool {
        match key_from_str(key) {
            Some(key) => {
                self.session.press(key, now_ms());
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match key_from_str(key) {
            Some(key) => {
                self.session.release(key);
                true
            }
            None => false,
        }
    }

    pub fn start(&mut self) -> bool {
        self.session.request_start(now_ms())
    }

    pub fn restart(&mut self) -> bool {
        self.session.request_restart()
    }

    /// `[{sound, intensity}]` since the last call
    pub fn take_sounds(&mut self) -> js_sys::Array {
        let out = js_sys::Array::new();
        for event in self.sounds.drain(..) {
            let obj = js_sys::Object::new();
            let fields = [
                ("sound", JsValue::from_str(sound_name(event.sound))),
                ("intensity", JsValue::from_f64(event.intensity as f64)),
            ];
            for (key, value) in fields {
                if let Err(e) = js_sys::Reflect::set(&obj, &JsValue::from_str(key), &value) {
                    log(&format!("sound field {key} not set: {e:?}"));
                }
            }
            out.push(&obj);
        }
        out
    }

    /// Status strings (`role:host`, `phase:Running`, ...) since the last call
    pub fn take_notices(&mut self) -> js_sys::Array {
        self.notices
            .drain(..)
            .map(|notice| JsValue::from_str(&notice))
            .collect()
    }

    // Render state

    pub fn phase(&self) -> FsmState {
        self.session.phase()
    }

    pub fn is_host(&self) -> bool {
        self.session.is_host()
    }

    pub fn ball_x(&self) -> f32 {
        self.session.mirror().ball_pos().x
    }

    pub fn ball_y(&self) -> f32 {
        self.session.mirror().ball_pos().y
    }

    pub fn host_paddle_y(&self) -> f32 {
        self.session.paddle_y(Side::Host)
    }

    pub fn client_paddle_y(&self) -> f32 {
        self.session.paddle_y(Side::Client)
    }

    pub fn host_score(&self) -> u8 {
        self.session.mirror().score(Side::Host)
    }

    pub fn client_score(&self) -> u8 {
        self.session.mirror().score(Side::Client)
    }

    pub fn time_remaining(&self) -> u32 {
        self.session.mirror().time_remaining()
    }

    pub fn host_shield_active(&self) -> bool {
        self.session.mirror().shield_active(Side::Host)
    }

    pub fn client_shield_active(&self) -> bool {
        self.session.mirror().shield_active(Side::Client)
    }

    pub fn power_orb_visible(&self) -> bool {
        self.session.mirror().power_orb_visible()
    }

    pub fn boosts(&self, host: bool) -> u8 {
        let side = if host { Side::Host } else { Side::Client };
        self.session.mirror().boosts(side)
    }

    pub fn shields(&self, host: bool) -> u8 {
        let side = if host { Side::Host } else { Side::Client };
        self.session.mirror().shields(side)
    }
}

impl Default for PongClient {
    fn default() -> Self {
        Self::new()
    }
}
