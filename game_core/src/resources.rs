use serde::{Deserialize, Serialize};

use crate::components::{PerSide, Side};
use crate::config::Config;

/// A single-shot wall-clock deadline.
///
/// Scheduling always replaces any pending deadline, so one effect never has
/// two restorations in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline_ms: Option<u64>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: u64, duration_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(duration_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.deadline_ms.map(|d| d.saturating_sub(now_ms))
    }

    /// Clear the deadline and return true if it has been reached
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// Game score tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub host: u8,
    pub client: u8,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Side) -> u8 {
        match side {
            Side::Host => self.host,
            Side::Client => self.client,
        }
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Host => self.host = self.host.saturating_add(1),
            Side::Client => self.client = self.client.saturating_add(1),
        }
    }

    pub fn has_winner(&self, win_score: u8) -> Option<Side> {
        if self.host >= win_score {
            Some(Side::Host)
        } else if self.client >= win_score {
            Some(Side::Client)
        } else {
            None
        }
    }

    /// Side with the strictly higher score
    pub fn leader(&self) -> Option<Side> {
        match self.host.cmp(&self.client) {
            std::cmp::Ordering::Greater => Some(Side::Host),
            std::cmp::Ordering::Less => Some(Side::Client),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Timed shield flag for one side
#[derive(Debug, Clone, Copy, Default)]
pub struct ShieldState {
    pub active: bool,
    pub timer: Timer,
}

/// Consumable boost and shield charges plus live shield state
#[derive(Debug, Clone, Copy)]
pub struct PowerUps {
    pub boosts: PerSide<u8>,
    pub shields: PerSide<u8>,
    pub shield: PerSide<ShieldState>,
}

impl PowerUps {
    pub fn new(config: &Config) -> Self {
        Self {
            boosts: PerSide::splat(config.max_boosts),
            shields: PerSide::splat(config.max_shields),
            shield: PerSide::default(),
        }
    }

    pub fn reset(&mut self, config: &Config) {
        *self = Self::new(config);
    }

    /// Spend one boost charge. False when none are left.
    pub fn spend_boost(&mut self, side: Side) -> bool {
        if self.boosts[side] == 0 {
            return false;
        }
        self.boosts[side] -= 1;
        true
    }

    /// Spend a shield charge and raise the shield until `duration_ms` from now
    pub fn activate_shield(&mut self, side: Side, now_ms: u64, duration_ms: u64) -> bool {
        if self.shields[side] == 0 {
            return false;
        }
        self.shields[side] -= 1;
        let shield = &mut self.shield[side];
        shield.active = true;
        shield.timer.schedule(now_ms, duration_ms);
        true
    }

    pub fn deactivate_shield(&mut self, side: Side) {
        let shield = &mut self.shield[side];
        shield.active = false;
        shield.timer.cancel();
    }

    pub fn shield_active(&self, side: Side) -> bool {
        self.shield[side].active
    }

    /// Drop shields whose timers elapsed; returns the sides that expired
    pub fn expire_shields(&mut self, now_ms: u64) -> Vec<Side> {
        let mut expired = Vec::new();
        for side in [Side::Host, Side::Client] {
            let shield = &mut self.shield[side];
            if shield.timer.fire(now_ms) {
                shield.active = false;
                expired.push(side);
            }
        }
        expired
    }
}

/// Feedback cue kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundKind {
    Hit,
    Score,
    Boost,
    Shield,
    GameOver,
}

/// A (kind, intensity) feedback cue. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundEvent {
    pub sound: SoundKind,
    pub intensity: f32,
}

impl SoundEvent {
    pub fn new(sound: SoundKind, intensity: f32) -> Self {
        Self {
            sound,
            intensity: intensity.clamp(0.0, 1.0),
        }
    }
}

/// Events that occurred during this tick
#[derive(Debug, Clone, Default)]
pub struct Events {
    pub sounds: Vec<SoundEvent>,
    pub scored: Option<Side>,
    pub ball_hit_paddle: Option<Side>,
    pub ball_hit_wall: bool,
    pub shield_reflected: Option<Side>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.sounds.clear();
        self.scored = None;
        self.ball_hit_paddle = None;
        self.ball_hit_wall = false;
        self.shield_reflected = None;
    }

    pub fn sound(&mut self, sound: SoundKind, intensity: f32) {
        self.sounds.push(SoundEvent::new(sound, intensity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_increment() {
        let mut score = Score::new();
        score.increment(Side::Host);
        score.increment(Side::Host);
        score.increment(Side::Client);
        assert_eq!(score.host, 2);
        assert_eq!(score.client, 1);
        assert_eq!(score.get(Side::Client), 1);
    }

    #[test]
    fn test_score_has_winner() {
        let mut score = Score::new();
        for _ in 0..10 {
            score.increment(Side::Client);
        }
        assert_eq!(score.has_winner(11), None, "No winner below threshold");
        score.increment(Side::Client);
        assert_eq!(score.has_winner(11), Some(Side::Client));
    }

    #[test]
    fn test_score_leader() {
        let mut score = Score::new();
        assert_eq!(score.leader(), None, "Level scores have no leader");
        score.increment(Side::Host);
        assert_eq!(score.leader(), Some(Side::Host));
    }

    #[test]
    fn test_timer_fires_once() {
        let mut timer = Timer::new();
        timer.schedule(100, 50);
        assert!(!timer.fire(149));
        assert_eq!(timer.remaining_ms(120), Some(30));
        assert!(timer.fire(150));
        assert!(!timer.fire(500), "A fired timer stays cleared");
    }

    #[test]
    fn test_timer_reschedule_replaces_deadline() {
        let mut timer = Timer::new();
        timer.schedule(0, 1000);
        timer.schedule(500, 1000);
        assert!(!timer.fire(1000), "Old deadline must not fire");
        assert!(timer.fire(1500));
    }

    #[test]
    fn test_boost_counter_never_negative() {
        let config = Config::new();
        let mut power = PowerUps::new(&config);
        for _ in 0..config.max_boosts {
            assert!(power.spend_boost(Side::Host));
        }
        assert!(!power.spend_boost(Side::Host));
        assert_eq!(power.boosts[Side::Host], 0);
        assert_eq!(power.boosts[Side::Client], config.max_boosts);
    }

    #[test]
    fn test_shield_activation_and_expiry() {
        let config = Config::new();
        let mut power = PowerUps::new(&config);

        assert!(power.activate_shield(Side::Client, 0, config.shield_duration_ms));
        assert!(power.shield_active(Side::Client));
        assert_eq!(power.shields[Side::Client], config.max_shields - 1);

        assert!(power.expire_shields(999).is_empty());
        assert_eq!(power.expire_shields(1000), vec![Side::Client]);
        assert!(!power.shield_active(Side::Client));
    }

    #[test]
    fn test_shields_exhaust() {
        let config = Config::new();
        let mut power = PowerUps::new(&config);
        for _ in 0..config.max_shields {
            assert!(power.activate_shield(Side::Host, 0, 10));
        }
        assert!(!power.activate_shield(Side::Host, 0, 10));
        assert_eq!(power.shields[Side::Host], 0);
    }

    #[test]
    fn test_events_clear() {
        let mut events = Events::new();
        events.sound(SoundKind::Hit, 0.5);
        events.scored = Some(Side::Host);
        events.ball_hit_wall = true;
        events.clear();
        assert!(events.sounds.is_empty());
        assert!(events.scored.is_none());
        assert!(!events.ball_hit_wall);
    }
}
