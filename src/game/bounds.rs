//! World extents and the screen-space viewport.

use serde::{Deserialize, Serialize};

use crate::game::constants::world;
use crate::game::interfaces::Rect;
use crate::util::vec2::Vec2;

/// Toroidal world rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            left: world::LEFT,
            top: world::TOP,
            right: world::RIGHT,
            bottom: world::BOTTOM,
        }
    }
}

impl WorldBounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Wrap a position that crossed an edge back in from the opposite one.
    ///
    /// Overshoot is carried across, one wrap per axis. In-bounds positions
    /// are returned unchanged.
    pub fn wrap(&self, mut position: Vec2) -> Vec2 {
        if position.x > self.right {
            position.x = self.left + (position.x - self.right);
        } else if position.x < self.left {
            position.x = self.right - (self.left - position.x);
        }

        if position.y > self.bottom {
            position.y = self.top + (position.y - self.bottom);
        } else if position.y < self.top {
            position.y = self.bottom - (self.top - position.y);
        }

        position
    }

    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= self.left
            && position.x <= self.right
            && position.y >= self.top
            && position.y <= self.bottom
    }
}

/// Screen rectangle anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: world::VIEWPORT_WIDTH,
            height: world::VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Sprite bounding box centred on `position`
    pub fn bounds_of(position: Vec2, size: Vec2) -> Rect {
        let half = size * 0.5;
        Rect {
            min: position - half,
            max: position + half,
        }
    }

    /// Culling test: does a sprite of `size` at `position` overlap the screen
    pub fn is_visible(&self, position: Vec2, size: Vec2) -> bool {
        let rect = Self::bounds_of(position, size);
        rect.max.x > 0.0 && rect.min.x < self.width && rect.max.y > 0.0 && rect.min.y < self.height
    }
}
