//! AI driver: waypoint pursuit with opponent and wall avoidance.
//!
//! The AI does not go through [`crate::vehicle::DriveIntent`]; it rotates the
//! heading directly and applies throttle/brake impulses, then the shared
//! integrator moves the car like any other.
//!
//! ## Per-tick pipeline
//!
//! 1. Turn toward the current waypoint (plus this driver's lateral offset),
//!    at most `ai_steering_rate` degrees.
//! 2. Veer away from every car within `ai_avoid_radius`.
//! 3. Cast three rays (left, right, ahead); side hits steer away from the wall,
//!    a front hit caps the throttle.
//! 4. Blend the target speed between this and the next waypoint, then coast,
//!    brake or accelerate toward it.

use crate::config::RaceConfig;
use crate::damage::DebuffTable;
use crate::track::Track;
use crate::vehicle::{angle_diff, bearing, Vehicle};
use bevy::math::Vec2;
use rand::Rng;

/// Per-car AI state fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiDriver {
    /// Horizontal shift of every waypoint target, so the pack spreads across
    /// the racing line.
    pub line_offset: f32,
}

impl AiDriver {
    pub fn new(config: &RaceConfig, rng: &mut impl Rng) -> Self {
        let range = config.ai_line_offset_range;
        let line_offset = if range > 0.0 {
            rng.gen_range(-range..=range)
        } else {
            0.0
        };
        Self { line_offset }
    }
}

/// Progress along the racing line.  Every car carries one: the AI chases it
/// and the standings use it to order cars on the same lap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaypointCursor {
    pub index: usize,
    last_advance_tick: Option<u64>,
}

impl WaypointCursor {
    /// Move to the next waypoint once `position` is inside `radius` of the
    /// current one.  At most one advance per `tick`.
    pub fn advance(&mut self, position: Vec2, track: &Track, radius: f32, tick: u64) -> bool {
        if self.last_advance_tick == Some(tick) {
            return false;
        }
        let target = track.waypoint(self.index).position;
        if position.distance(target) < radius {
            self.index = track.next_index(self.index);
            self.last_advance_tick = Some(tick);
            true
        } else {
            false
        }
    }
}

/// What the AI decided this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiCommand {
    /// Fraction of effective thrust applied, in `[0, 1]`.
    pub throttle: f32,
    pub braking: bool,
    /// Total avoidance steer from nearby cars (degrees), after any clamp.
    pub avoidance: f32,
}

/// Steer and throttle one AI car.  `others` holds the positions of every
/// other car on track.
pub fn steer(
    vehicle: &mut Vehicle,
    driver: &AiDriver,
    others: &[Vec2],
    track: &Track,
    config: &RaceConfig,
    table: &DebuffTable,
) -> AiCommand {
    let stats = vehicle.effective_stats(table, config.damage_enabled);
    let waypoint = track.waypoint(vehicle.waypoint.index);
    let target = waypoint.position + Vec2::new(driver.line_offset, 0.0);
    let dist_to_target = vehicle.position.distance(target);

    // Pursuit
    let to_target = bearing(vehicle.position, target);
    let diff = angle_diff(vehicle.heading, to_target);
    let rate = config.ai_steering_rate;
    if diff > rate {
        vehicle.heading += rate;
    } else if diff < -rate {
        vehicle.heading -= rate;
    } else {
        vehicle.heading = to_target;
    }

    // Opponents
    let mut avoidance = 0.0;
    for other in others {
        let dist = vehicle.position.distance(*other);
        if dist > 0.0 && dist < config.ai_avoid_radius {
            let rel = angle_diff(vehicle.heading, bearing(vehicle.position, *other));
            let closeness = (config.ai_avoid_radius - dist) / config.ai_avoid_radius;
            avoidance -= rel.signum() * closeness * config.ai_avoid_strength;
        }
    }
    if let Some(max) = config.ai_max_avoidance_per_tick {
        avoidance = avoidance.clamp(-max, max);
    }
    vehicle.heading += avoidance;

    // Walls
    let look = config.ai_ray_lookahead;
    let cast = |heading: f32| track.raycast(vehicle.position, heading, look, config.ai_ray_step);
    let left = cast(vehicle.heading + config.ai_ray_spread);
    let right = cast(vehicle.heading - config.ai_ray_spread);
    let front = cast(vehicle.heading);

    let mut wall_steer = 0.0;
    if left < look {
        wall_steer -= (look - left) / look * config.ai_wall_steer_strength;
    }
    if right < look {
        wall_steer += (look - right) / look * config.ai_wall_steer_strength;
    }
    vehicle.heading += wall_steer;
    let wall_factor = if front < look {
        0.5 + 0.5 * front / look
    } else {
        1.0
    };

    // Speed
    let next = track.waypoint(track.next_index(vehicle.waypoint.index));
    let blend = (dist_to_target / config.waypoint_capture_radius).clamp(0.0, 1.0);
    let target_speed = waypoint.target_speed * blend + next.target_speed * (1.0 - blend);
    let speed = vehicle.speed();
    let mut braking = false;
    let speed_factor = if speed > target_speed {
        if speed > target_speed * config.ai_overspeed_ratio {
            vehicle.impulse(-config.ai_brake_strength);
            braking = true;
        }
        0.0
    } else if speed < target_speed * config.ai_underspeed_ratio {
        1.0
    } else {
        0.5
    };

    let throttle = wall_factor.min(speed_factor);
    vehicle.impulse(stats.thrust * throttle);

    AiCommand {
        throttle,
        braking,
        avoidance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::CollisionMask;
    use crate::track::Waypoint;
    use crate::vehicle::tests::test_car;
    use bevy::math::Rect;

    fn open_track(waypoints: Vec<Waypoint>) -> Track {
        Track::new(
            CollisionMask::new(1920, 1080),
            waypoints,
            Rect::new(0.0, 0.0, 10.0, 10.0),
        )
    }

    fn no_offset() -> AiDriver {
        AiDriver { line_offset: 0.0 }
    }

    #[test]
    fn pursuit_turn_is_rate_limited() {
        let track = open_track(vec![Waypoint::new(1000.0, 100.0, 10.0)]);
        let config = RaceConfig::default();
        // Waypoint straight up from the car; car faces +X.
        let mut car = test_car(Vec2::new(1000.0, 900.0), 0.0);
        steer(&mut car, &no_offset(), &[], &track, &config, &DebuffTable::default());
        assert!((car.heading - 2.5).abs() < 1e-4);
    }

    #[test]
    fn pursuit_snaps_when_nearly_aligned() {
        let track = open_track(vec![Waypoint::new(1000.0, 99.0, 10.0)]);
        let config = RaceConfig::default();
        let mut car = test_car(Vec2::new(100.0, 100.0), 0.0);
        steer(&mut car, &no_offset(), &[], &track, &config, &DebuffTable::default());
        let expected = bearing(Vec2::new(100.0, 100.0), Vec2::new(1000.0, 99.0));
        assert!((car.heading - expected).abs() < 1e-4);
    }

    #[test]
    fn car_on_the_left_pushes_heading_right() {
        let track = open_track(vec![Waypoint::new(1800.0, 500.0, 10.0)]);
        let config = RaceConfig::default();
        let mut car = test_car(Vec2::new(500.0, 500.0), 0.0);
        // 40 px up the screen is to the car's left when facing +X.
        let others = [Vec2::new(500.0, 460.0)];
        let cmd = steer(&mut car, &no_offset(), &others, &track, &config, &DebuffTable::default());
        assert!((cmd.avoidance + 2.0).abs() < 1e-4, "avoidance {}", cmd.avoidance);
        assert!(car.heading < 0.0);
    }

    #[test]
    fn avoidance_clamp_limits_pack_response() {
        let track = open_track(vec![Waypoint::new(1800.0, 500.0, 10.0)]);
        let config = RaceConfig {
            ai_max_avoidance_per_tick: Some(1.0),
            ..Default::default()
        };
        let mut car = test_car(Vec2::new(500.0, 500.0), 0.0);
        let others = [
            Vec2::new(500.0, 470.0),
            Vec2::new(510.0, 470.0),
            Vec2::new(490.0, 480.0),
        ];
        let cmd = steer(&mut car, &no_offset(), &others, &track, &config, &DebuffTable::default());
        assert_eq!(cmd.avoidance, -1.0);
    }

    #[test]
    fn wall_ahead_cuts_throttle() {
        let mut walls = CollisionMask::new(1920, 1080);
        walls.fill_rect(530, 0, 100, 1080);
        let track = Track::new(walls, vec![Waypoint::new(1800.0, 500.0, 20.0)], Rect::default());
        let config = RaceConfig::default();
        let mut car = test_car(Vec2::new(500.0, 500.0), 0.0);
        let cmd = steer(&mut car, &no_offset(), &[], &track, &config, &DebuffTable::default());
        // Front ray hits after 30 px of a 60 px lookahead.
        assert!((cmd.throttle - 0.75).abs() < 1e-4, "throttle {}", cmd.throttle);
    }

    #[test]
    fn overspeed_brakes_and_cuts_throttle() {
        let track = open_track(vec![Waypoint::new(1800.0, 500.0, 8.0)]);
        let config = RaceConfig::default();
        let mut car = test_car(Vec2::new(500.0, 500.0), 0.0);
        car.velocity = Vec2::new(15.0, 0.0);
        let cmd = steer(&mut car, &no_offset(), &[], &track, &config, &DebuffTable::default());
        assert!(cmd.braking);
        assert_eq!(cmd.throttle, 0.0);
        assert!((car.velocity.x - 14.7).abs() < 1e-4);
    }

    #[test]
    fn underspeed_floors_throttle() {
        let track = open_track(vec![Waypoint::new(1800.0, 500.0, 20.0)]);
        let config = RaceConfig::default();
        let mut car = test_car(Vec2::new(500.0, 500.0), 0.0);
        let cmd = steer(&mut car, &no_offset(), &[], &track, &config, &DebuffTable::default());
        assert_eq!(cmd.throttle, 1.0);
        assert!(!cmd.braking);
    }

    #[test]
    fn waypoint_advance_is_idempotent_per_tick() {
        let track = open_track(vec![
            Waypoint::new(100.0, 100.0, 10.0),
            Waypoint::new(120.0, 100.0, 10.0),
            Waypoint::new(140.0, 100.0, 10.0),
        ]);
        let mut cursor = WaypointCursor::default();
        let pos = Vec2::new(110.0, 100.0);
        assert!(cursor.advance(pos, &track, 150.0, 5));
        assert!(!cursor.advance(pos, &track, 150.0, 5));
        assert_eq!(cursor.index, 1);
        assert!(cursor.advance(pos, &track, 150.0, 6));
        assert_eq!(cursor.index, 2);
    }

    #[test]
    fn waypoint_index_wraps_at_end_of_course() {
        let track = open_track(vec![
            Waypoint::new(100.0, 100.0, 10.0),
            Waypoint::new(120.0, 100.0, 10.0),
        ]);
        let mut cursor = WaypointCursor {
            index: 1,
            last_advance_tick: None,
        };
        assert!(cursor.advance(Vec2::new(120.0, 100.0), &track, 150.0, 1));
        assert_eq!(cursor.index, 0);
    }
}
