//! Playfield geometry.
//!
//! All layout-dependent positions (zones, wander regions, parade route,
//! spawn area) are fractions of the playfield resolved here.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    LANDSCAPE_HEIGHT, LANDSCAPE_WIDTH, PORTRAIT_HEIGHT, PORTRAIT_WIDTH, REFERENCE_FRAME_SECS,
    SAFE_INSET,
};

/// Screen orientation the session was laid out for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Layout {
    #[default]
    Landscape,
    Portrait,
}

impl Layout {
    pub fn size(self) -> Vec2 {
        match self {
            Layout::Landscape => Vec2::new(LANDSCAPE_WIDTH, LANDSCAPE_HEIGHT),
            Layout::Portrait => Vec2::new(PORTRAIT_WIDTH, PORTRAIT_HEIGHT),
        }
    }

    /// Zone centres as playfield fractions, in zone order
    pub fn zone_fractions(self) -> [(f32, f32); 3] {
        match self {
            Layout::Landscape => [(0.15, 0.50), (0.85, 0.50), (0.50, 0.80)],
            Layout::Portrait => [(0.25, 0.25), (0.75, 0.50), (0.25, 0.75)],
        }
    }
}

/// Rectangular game area, origin top-left, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn for_layout(layout: Layout) -> Self {
        let size = layout.size();
        Self::new(size.x, size.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Point at the given fractions of width and height
    pub fn frac(&self, fx: f32, fy: f32) -> Vec2 {
        Vec2::new(self.width * fx, self.height * fy)
    }

    /// Clamp into the safe inset used for avatar and monster movement
    pub fn clamp_inset(&self, position: Vec2) -> Vec2 {
        self.clamp_margin(position, SAFE_INSET)
    }

    pub fn clamp_margin(&self, position: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            position.x.clamp(margin, (self.width - margin).max(margin)),
            position.y.clamp(margin, (self.height - margin).max(margin)),
        )
    }

    /// True once `position` is more than `margin` beyond any edge
    pub fn is_beyond(&self, position: Vec2, margin: f32) -> bool {
        position.x < -margin
            || position.x > self.width + margin
            || position.y < -margin
            || position.y > self.height + margin
    }

    /// Default spawn box: the central 70% of the playfield
    pub fn spawn_area(&self) -> (Vec2, Vec2) {
        (self.frac(0.15, 0.15), self.frac(0.85, 0.85))
    }
}

/// Convert a per-frame easing factor (tuned at 60 fps) into the factor for `dt`.
pub fn frame_ease(per_frame: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    let frames = dt / REFERENCE_FRAME_SECS;
    (1.0 - (1.0 - per_frame).powf(frames)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes() {
        assert_eq!(Layout::Landscape.size(), Vec2::new(800.0, 600.0));
        assert_eq!(Layout::Portrait.size(), Vec2::new(400.0, 700.0));
        assert_eq!(Layout::default(), Layout::Landscape);
    }

    #[test]
    fn test_clamp_inset() {
        let field = Playfield::new(800.0, 600.0);
        assert_eq!(field.clamp_inset(Vec2::new(-10.0, 900.0)), Vec2::new(30.0, 570.0));
        assert_eq!(field.clamp_inset(Vec2::new(400.0, 300.0)), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_is_beyond() {
        let field = Playfield::new(800.0, 600.0);
        assert!(!field.is_beyond(Vec2::new(-59.0, 300.0), 60.0));
        assert!(field.is_beyond(Vec2::new(-61.0, 300.0), 60.0));
        assert!(field.is_beyond(Vec2::new(400.0, 661.0), 60.0));
    }

    #[test]
    fn test_frame_ease_matches_reference_frame() {
        let f = frame_ease(0.1, REFERENCE_FRAME_SECS);
        assert!((f - 0.1).abs() < 1e-5);
        assert_eq!(frame_ease(0.1, 0.0), 0.0);
        // two frames of 10% easing leave 81% of the gap
        let two = frame_ease(0.1, REFERENCE_FRAME_SECS * 2.0);
        assert!((two - 0.19).abs() < 1e-4);
    }

    #[test]
    fn test_zone_fractions_resolve() {
        let field = Playfield::for_layout(Layout::Landscape);
        let [a, _, c] = Layout::Landscape.zone_fractions();
        assert_eq!(field.frac(a.0, a.1), Vec2::new(120.0, 300.0));
        assert_eq!(field.frac(c.0, c.1), Vec2::new(400.0, 480.0));
    }
}
