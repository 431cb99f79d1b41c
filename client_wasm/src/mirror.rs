//! Shadow copy of the host's state with interpolation

use game_core::{Config, GameOutcome, Params, Side, Snapshot};
use glam::Vec2;

/// Snapshots arrive once per host tick; blend across one tick
const INTERPOLATION_MS: f32 = Params::TICK_MS as f32;

/// Last-write-wins store of host snapshots.
///
/// Never integrates ball physics. The only local edits are display hints
/// from discrete events, overwritten by the next snapshot.
#[derive(Debug, Clone)]
pub struct ClientMirror {
    // Latest snapshot received
    current: Snapshot,
    // Snapshot it replaced, for interpolation
    previous: Snapshot,
    // 0.0 = previous, 1.0 = current
    alpha: f32,
    received_at_ms: u64,
    outcome: Option<GameOutcome>,
}

impl ClientMirror {
    pub fn new(config: &Config) -> Self {
        let initial = Snapshot::initial(config);
        Self {
            current: initial,
            previous: initial,
            alpha: 1.0,
            received_at_ms: 0,
            outcome: None,
        }
    }

    /// Back to the start-of-match state
    pub fn reset(&mut self, config: &Config) {
        *self = Self::new(config);
    }

    /// Replace the shadow state wholesale
    pub fn apply(&mut self, snapshot: Snapshot, now_ms: u64) {
        self.previous = self.current;
        self.current = snapshot;
        self.received_at_ms = now_ms;
        self.alpha = 0.0;
    }

    pub fn advance(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.received_at_ms) as f32;
        self.alpha = (elapsed / INTERPOLATION_MS).min(1.0);
    }

    fn lerp(&self, prev: f32, curr: f32) -> f32 {
        prev + (curr - prev) * self.alpha
    }

    pub fn latest(&self) -> &Snapshot {
        &self.current
    }

    pub fn ball_pos(&self) -> Vec2 {
        // A score teleports the ball to centre; don't smear it across the court
        if self.current.host_score != self.previous.host_score
            || self.current.client_score != self.previous.client_score
        {
            return Vec2::new(self.current.ball_x, self.current.ball_y);
        }
        Vec2::new(
            self.lerp(self.previous.ball_x, self.current.ball_x),
            self.lerp(self.previous.ball_y, self.current.ball_y),
        )
    }

    pub fn paddle_y(&self, side: Side) -> f32 {
        self.lerp(self.previous.paddle_y(side), self.current.paddle_y(side))
    }

    pub fn score(&self, side: Side) -> u8 {
        self.current.score(side)
    }

    pub fn time_remaining(&self) -> u32 {
        self.current.time_remaining
    }

    pub fn boosts(&self, side: Side) -> u8 {
        self.current.boosts(side)
    }

    pub fn shields(&self, side: Side) -> u8 {
        self.current.shields(side)
    }

    pub fn shield_active(&self, side: Side) -> bool {
        self.current.shield_active(side)
    }

    pub fn ball_boost_active(&self) -> bool {
        self.current.ball_boost_active
    }

    /// The renderer's power orb shows while the ball is boosted
    pub fn power_orb_visible(&self) -> bool {
        self.current.ball_boost_active
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn set_outcome(&mut self, outcome: GameOutcome, host_score: u8, client_score: u8) {
        self.outcome = Some(outcome);
        self.current.host_score = host_score;
        self.current.client_score = client_score;
    }

    /// Informational paddle position from a `paddle-update`
    pub fn set_paddle(&mut self, side: Side, y: f32) {
        match side {
            Side::Host => {
                self.current.host_paddle_y = y;
                self.previous.host_paddle_y = y;
            }
            Side::Client => {
                self.current.client_paddle_y = y;
                self.previous.client_paddle_y = y;
            }
        }
    }

    pub fn set_shield(&mut self, side: Side, active: bool) {
        match side {
            Side::Host => self.current.host_shield_active = active,
            Side::Client => self.current.client_shield_active = active,
        }
    }

    pub fn note_boost_used(&mut self, side: Side) {
        let boosts = match side {
            Side::Host => &mut self.current.host_boosts,
            Side::Client => &mut self.current.client_boosts,
        };
        *boosts = boosts.saturating_sub(1);
    }

    pub fn note_shield_used(&mut self, side: Side) {
        let shields = match side {
            Side::Host => &mut self.current.host_shields,
            Side::Client => &mut self.current.client_shields,
        };
        *shields = shields.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, host_paddle_y: f32) -> Snapshot {
        Snapshot {
            ball_x: x,
            host_paddle_y,
            ..Snapshot::initial(&Config::new())
        }
    }

    #[test]
    fn test_starts_at_initial_state() {
        let mirror = ClientMirror::new(&Config::new());
        assert_eq!(mirror.ball_pos(), Vec2::new(800.0, 500.0));
        assert_eq!(mirror.time_remaining(), 90);
        assert_eq!(mirror.boosts(Side::Client), 5);
        assert_eq!(mirror.outcome(), None);
    }

    #[test]
    fn test_interpolates_between_snapshots() {
        let mut mirror = ClientMirror::new(&Config::new());
        mirror.apply(moved(800.0, 450.0), 0);
        mirror.apply(moved(816.0, 466.0), 16);

        assert_eq!(mirror.ball_pos().x, 800.0, "Alpha starts at previous");

        mirror.advance(24);
        assert!((mirror.ball_pos().x - 808.0).abs() < 1e-3);
        assert!((mirror.paddle_y(Side::Host) - 458.0).abs() < 1e-3);

        mirror.advance(100);
        assert_eq!(mirror.ball_pos().x, 816.0, "Alpha clamps at current");
    }

    #[test]
    fn test_last_write_wins() {
        let mut mirror = ClientMirror::new(&Config::new());
        let newer = moved(900.0, 450.0);
        let stale = moved(850.0, 450.0);

        mirror.apply(newer, 16);
        mirror.apply(stale, 32);
        assert_eq!(mirror.latest().ball_x, 850.0, "Out-of-order snapshot still overwrites");

        mirror.apply(newer, 48);
        mirror.advance(100);
        assert_eq!(mirror.ball_pos().x, 900.0, "Converges once the newest arrives");
    }

    #[test]
    fn test_score_change_skips_interpolation() {
        let mut mirror = ClientMirror::new(&Config::new());
        mirror.apply(moved(1590.0, 450.0), 0);
        let mut served = moved(800.0, 450.0);
        served.client_score = 1;
        mirror.apply(served, 16);

        assert_eq!(mirror.ball_pos().x, 800.0);
    }

    #[test]
    fn test_display_hints_never_underflow() {
        let mut mirror = ClientMirror::new(&Config::new());
        for _ in 0..10 {
            mirror.note_boost_used(Side::Host);
            mirror.note_shield_used(Side::Client);
        }
        assert_eq!(mirror.boosts(Side::Host), 0);
        assert_eq!(mirror.shields(Side::Client), 0);

        mirror.set_shield(Side::Client, true);
        assert!(mirror.shield_active(Side::Client));
        assert!(!mirror.shield_active(Side::Host));
    }

    #[test]
    fn test_game_over_records_outcome() {
        let mut mirror = ClientMirror::new(&Config::new());
        mirror.set_outcome(GameOutcome::Winner(Side::Client), 7, 11);

        assert_eq!(mirror.outcome(), Some(GameOutcome::Winner(Side::Client)));
        assert_eq!(mirror.score(Side::Client), 11);
    }
}
