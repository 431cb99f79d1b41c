use glam::Vec2;

use crate::components::Side;
use crate::config::Config;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_corner_size(corner: Vec2, size: Vec2) -> Self {
        Self {
            min: corner,
            max: corner + size,
        }
    }

    /// Box covering a square of side `size` as it moves from `from` to `to`
    pub fn swept(from: Vec2, to: Vec2, size: f32) -> Self {
        Self {
            min: from.min(to),
            max: from.max(to) + Vec2::splat(size),
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Paddle rectangle for `side` with its top edge at `paddle_y`
pub fn paddle_rect(config: &Config, side: Side, paddle_y: f32) -> Aabb {
    Aabb::from_corner_size(
        Vec2::new(config.paddle_x(side), paddle_y),
        Vec2::new(config.paddle_width, config.paddle_height),
    )
}

/// Fraction of the tick's motion at which the ball's leading edge reaches
/// `face_x`. `None` when the ball is not moving horizontally.
pub fn contact_time(from: Vec2, to: Vec2, leading_offset: f32, face_x: f32) -> Option<f32> {
    let dx = to.x - from.x;
    if dx == 0.0 {
        return None;
    }
    Some(((face_x - (from.x + leading_offset)) / dx).clamp(0.0, 1.0))
}
