//! The static track: wall mask, AI racing line and start/finish zone.
//!
//! The layout (waypoints, start line, grid) is authored against a fixed
//! 1920×1080 reference resolution and scaled to the actual display size once,
//! when the [`Track`] resource is built.  Nothing here changes during a race.

use crate::constants::{PLACEHOLDER_TRACK_BORDER, REFERENCE_HEIGHT, REFERENCE_WIDTH};
use crate::mask::CollisionMask;
use bevy::prelude::*;

/// One point of the AI racing line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Vec2,
    /// Speed (pixels/tick) the AI aims to carry through this point.
    pub target_speed: f32,
}

impl Waypoint {
    pub const fn new(x: f32, y: f32, target_speed: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            target_speed,
        }
    }
}

/// Racing line of the default circuit in reference coordinates.  The course is
/// closed: the last point sits on the first.
pub const REFERENCE_WAYPOINTS: [Waypoint; 42] = [
    Waypoint::new(540.0, 260.0, 18.0),
    Waypoint::new(440.0, 270.0, 16.0),
    Waypoint::new(355.0, 280.0, 12.0),
    Waypoint::new(275.0, 310.0, 10.0),
    Waypoint::new(235.0, 365.0, 10.0),
    Waypoint::new(180.0, 425.0, 10.0),
    Waypoint::new(155.0, 525.0, 14.0),
    Waypoint::new(150.0, 640.0, 18.0),
    Waypoint::new(200.0, 750.0, 22.0),
    Waypoint::new(280.0, 830.0, 22.0),
    Waypoint::new(380.0, 890.0, 22.0),
    Waypoint::new(500.0, 920.0, 22.0),
    Waypoint::new(630.0, 930.0, 22.0),
    Waypoint::new(760.0, 930.0, 22.0),
    Waypoint::new(880.0, 930.0, 22.0),
    Waypoint::new(990.0, 930.0, 22.0),
    Waypoint::new(1120.0, 930.0, 22.0),
    Waypoint::new(1230.0, 925.0, 22.0),
    Waypoint::new(1350.0, 920.0, 22.0),
    Waypoint::new(1460.0, 910.0, 18.0),
    Waypoint::new(1580.0, 870.0, 14.0),
    Waypoint::new(1660.0, 780.0, 12.0),
    Waypoint::new(1725.0, 670.0, 10.0),
    Waypoint::new(1775.0, 565.0, 10.0),
    Waypoint::new(1810.0, 460.0, 8.0),
    Waypoint::new(1805.0, 350.0, 8.0),
    Waypoint::new(1750.0, 270.0, 8.0),
    Waypoint::new(1660.0, 230.0, 8.0),
    Waypoint::new(1560.0, 245.0, 8.0),
    Waypoint::new(1515.0, 300.0, 8.0),
    Waypoint::new(1480.0, 365.0, 8.0),
    Waypoint::new(1405.0, 445.0, 8.0),
    Waypoint::new(1300.0, 500.0, 8.0),
    Waypoint::new(1215.0, 500.0, 8.0),
    Waypoint::new(1160.0, 480.0, 8.0),
    Waypoint::new(1115.0, 440.0, 8.0),
    Waypoint::new(1060.0, 370.0, 8.0),
    Waypoint::new(950.0, 310.0, 8.0),
    Waypoint::new(840.0, 270.0, 10.0),
    Waypoint::new(740.0, 260.0, 18.0),
    Waypoint::new(650.0, 255.0, 18.0),
    Waypoint::new(540.0, 260.0, 18.0),
];

/// Start/finish zone of the default circuit in reference coordinates.
pub const REFERENCE_START_LINE: (Vec2, Vec2) = (Vec2::new(550.0, 163.0), Vec2::new(580.0, 415.0));

/// Centre of the starting grid in reference coordinates.
pub const REFERENCE_GRID_ORIGIN: Vec2 = Vec2::new(700.0, 300.0);

/// Immutable track resource.
#[derive(Resource, Debug, Clone)]
pub struct Track {
    walls: CollisionMask,
    waypoints: Vec<Waypoint>,
    start_zone: Rect,
    /// Display pixels per reference pixel on each axis.
    scale: Vec2,
}

impl Track {
    /// Build a track from a wall mask and an explicit layout (display coordinates).
    ///
    /// `waypoints` must not be empty.
    pub fn new(walls: CollisionMask, waypoints: Vec<Waypoint>, start_zone: Rect) -> Self {
        debug_assert!(!waypoints.is_empty(), "a track needs at least one waypoint");
        let scale = Vec2::new(
            walls.width() as f32 / REFERENCE_WIDTH,
            walls.height() as f32 / REFERENCE_HEIGHT,
        );
        Self {
            walls,
            waypoints,
            start_zone,
            scale,
        }
    }

    /// The default circuit layout scaled onto a wall mask that already has the
    /// display's dimensions.
    pub fn with_reference_layout(walls: CollisionMask) -> Self {
        let scale = Vec2::new(
            walls.width() as f32 / REFERENCE_WIDTH,
            walls.height() as f32 / REFERENCE_HEIGHT,
        );
        let waypoints = REFERENCE_WAYPOINTS
            .iter()
            .map(|wp| Waypoint {
                position: wp.position * scale,
                target_speed: wp.target_speed,
            })
            .collect();
        let (min, max) = REFERENCE_START_LINE;
        let start_zone = Rect::from_corners(min * scale, max * scale);
        Self {
            walls,
            waypoints,
            start_zone,
            scale,
        }
    }

    /// Fallback when `track.png` is unavailable: a solid border around an
    /// otherwise open display, with the default circuit layout.
    pub fn placeholder(width: u32, height: u32) -> Self {
        Self::with_reference_layout(border_mask(width, height, PLACEHOLDER_TRACK_BORDER))
    }

    pub fn walls(&self) -> &CollisionMask {
        &self.walls
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Waypoint at `index`, wrapping around the closed course.
    pub fn waypoint(&self, index: usize) -> Waypoint {
        self.waypoints[index % self.waypoints.len()]
    }

    /// Index following `index` on the closed course.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.waypoints.len()
    }

    pub fn start_zone(&self) -> Rect {
        self.start_zone
    }

    /// Display size in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.walls.width() as f32, self.walls.height() as f32)
    }

    /// Convert a reference-resolution point to display pixels.
    pub fn from_reference(&self, point: Vec2) -> Vec2 {
        point * self.scale
    }

    /// Distance from `origin` along `heading` (degrees) to the first wall
    /// pixel, sampled every `step` pixels.  Returns `max_dist` when nothing
    /// is hit, including when the ray leaves the display.
    pub fn raycast(&self, origin: Vec2, heading: f32, max_dist: f32, step: f32) -> f32 {
        let dir = crate::vehicle::heading_vector(heading);
        let size = self.size();
        let mut d = 0.0;
        while d < max_dist {
            let p = origin + dir * d;
            if p.x < 0.0 || p.y < 0.0 || p.x >= size.x || p.y >= size.y {
                return max_dist;
            }
            if self.walls.get(p.x as i32, p.y as i32) {
                return d;
            }
            d += step;
        }
        max_dist
    }
}

/// A `width` × `height` mask with a solid frame `thickness` pixels wide.
pub fn border_mask(width: u32, height: u32, thickness: u32) -> CollisionMask {
    let mut mask = CollisionMask::new(width, height);
    mask.fill_rect(0, 0, width, thickness);
    mask.fill_rect(0, height.saturating_sub(thickness), width, thickness);
    mask.fill_rect(0, 0, thickness, height);
    mask.fill_rect(width.saturating_sub(thickness), 0, thickness, height);
    mask
}
