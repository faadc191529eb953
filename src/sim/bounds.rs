//! Axis-aligned bounding boxes for hit testing and edge bounces

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// An axis-aligned box in play-area coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Point containment, edges included. Empty boxes contain nothing.
    pub fn contains(&self, point: Vec2) -> bool {
        if self.width() <= 0.0 || self.height() <= 0.0 {
            return false;
        }
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Which axes a flying duck must reverse on this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

/// Check a duck center against the bounce band of the play area
pub fn edge_bounce(pos: Vec2) -> Bounce {
    Bounce {
        x: pos.x < BOUNCE_MARGIN || pos.x > PLAY_WIDTH - BOUNCE_MARGIN,
        y: pos.y < BOUNCE_MARGIN || pos.y > PLAY_HEIGHT - BOUNCE_MARGIN,
    }
}
