/*!
 * Minimal float geometry used by the fitting engine.
 *
 * Rectangles are stored as top-left origin plus size, matching the
 * screen-space coordinates text areas are captured in.
 */

use serde::{Deserialize, Serialize};

/// 2D vector of f32 components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2f {
    /// Horizontal component
    pub x: f32,
    /// Vertical component
    pub y: f32,
}

impl Vec2f {
    /// Create a new vector
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectf {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Width, expected positive
    pub width: f32,
    /// Height, expected positive
    pub height: f32,
}

impl Rectf {
    /// Create a rectangle from position and size
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Rectangle at the origin with the given size
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Top-left corner
    pub fn top_left(&self) -> Vec2f {
        Vec2f::new(self.left, self.top)
    }

    /// Size as a vector
    pub fn size(&self) -> Vec2f {
        Vec2f::new(self.width, self.height)
    }

    /// Whether both dimensions are strictly positive
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Whether a point falls inside this rectangle
    pub fn contains(&self, point: Vec2f) -> bool {
        point.x >= self.left
            && point.x < self.left + self.width
            && point.y >= self.top
            && point.y < self.top + self.height
    }

    /// Scale both dimensions in place, keeping the top-left corner fixed
    pub fn scale_size(&self, factor: f32) -> Self {
        Self {
            left: self.left,
            top: self.top,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}
