//! Per-car motion state and the per-tick integrator.
//!
//! A [`Vehicle`] is plain data with no ECS types, so the whole race step can be
//! driven from tests without an `App`.  The ECS wraps it in
//! [`crate::race::Car`].
//!
//! ## Tick order for one car
//!
//! | Step | Where | What |
//! |------|-------|------|
//! | 1 | [`Vehicle::effective_stats`] | debuffed thrust / max speed / turn rate |
//! | 2 | [`Vehicle::apply_intent`] | human steering and throttle (AI steers in [`crate::ai`]) |
//! | 3 | [`Vehicle::integrate`] | velocity alignment, position, drag, mask refresh |
//! | 4 | [`crate::collision`] | wall and car contact response |

use crate::ai::WaypointCursor;
use crate::collision::ContactState;
use crate::config::{CarTuning, RaceConfig};
use crate::damage::DebuffTable;
use crate::lap::LapTimer;
use crate::mask::CollisionMask;
use bevy::math::{IVec2, Vec2};
use rand::Rng;
use std::sync::Arc;

/// Unit vector for a heading in degrees (0 = +X, CCW positive, +Y down).
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    let (sin, cos) = heading.to_radians().sin_cos();
    Vec2::new(cos, -sin)
}

/// Heading in degrees pointing from `from` toward `to`.
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    (-d.y).atan2(d.x).to_degrees()
}

/// Signed shortest angular difference `to - from`, in `[-180, 180)`.
#[inline]
pub fn angle_diff(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Driver input for one tick, sampled from the keyboard for the human car.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveIntent {
    /// Target steer: `+1` full left, `-1` full right.
    pub steer: f32,
    pub accelerate: bool,
    pub brake: bool,
}

/// Tuning values after the damage debuff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveStats {
    pub thrust: f32,
    pub max_speed: f32,
    pub turn_rate: f32,
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub position: Vec2,
    /// Degrees, kept in `[0, 360)`.
    pub heading: f32,
    pub velocity: Vec2,
    /// Randomised once at spawn, then fixed.
    pub tuning: CarTuning,
    /// Smoothed steering input in `[-1, 1]`.
    pub steer: f32,
    /// Fraction of effective max speed currently allowed, in `[0.1, 1]`.
    pub speed_limit: f32,
    /// Turn-rate multiplier.  Starts at the tuned grip factor, drops against
    /// walls (floor 0.3) and recovers toward 1 when clear.
    pub grip: f32,
    pub damage: f32,
    /// Damage taken since the last start-line crossing.
    pub lap_damage_increase: f32,
    pub contact: ContactState,
    pub lap: LapTimer,
    pub waypoint: WaypointCursor,
    sprite_mask: Arc<CollisionMask>,
    mask: CollisionMask,
    mask_heading: f32,
}

impl Vehicle {
    /// Place a car on the grid with its tuning perturbed by `± tuning.randomness`.
    pub fn spawn(
        tuning: CarTuning,
        position: Vec2,
        heading: f32,
        sprite_mask: Arc<CollisionMask>,
        rng: &mut impl Rng,
    ) -> Self {
        let heading = heading.rem_euclid(360.0);
        let mask = sprite_mask.rotated(heading);
        let tuning = vary(tuning, rng);
        Self {
            position,
            heading,
            velocity: Vec2::ZERO,
            tuning,
            steer: 0.0,
            speed_limit: 1.0,
            grip: tuning.grip_factor,
            damage: 0.0,
            lap_damage_increase: 0.0,
            contact: ContactState::Clear,
            lap: LapTimer::default(),
            waypoint: WaypointCursor::default(),
            sprite_mask,
            mask,
            mask_heading: heading,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    #[inline]
    pub fn forward(&self) -> Vec2 {
        heading_vector(self.heading)
    }

    pub fn effective_stats(&self, table: &DebuffTable, damage_enabled: bool) -> EffectiveStats {
        let factor = if damage_enabled {
            table.factor(self.damage)
        } else {
            1.0
        };
        EffectiveStats {
            thrust: self.tuning.thrust * factor,
            max_speed: self.tuning.max_speed * factor,
            turn_rate: self.tuning.base_turn_rate * factor,
        }
    }

    /// Apply human steering, throttle and brake.
    pub fn apply_intent(&mut self, intent: &DriveIntent, stats: &EffectiveStats) {
        let target = intent.steer.clamp(-1.0, 1.0);
        self.steer += (target - self.steer) * self.tuning.steer_response;
        self.steer = self.steer.clamp(-1.0, 1.0);

        let turn = stats.turn_rate * self.grip
            / (1.0 + self.speed() * self.tuning.turn_speed_factor);
        self.heading += self.steer * turn;

        let forward = self.forward();
        if intent.accelerate {
            self.velocity += forward * stats.thrust;
        }
        if intent.brake {
            self.velocity -= forward * stats.thrust;
        }
    }

    /// Push along the current heading (negative values brake).
    #[inline]
    pub fn impulse(&mut self, amount: f32) {
        self.velocity += self.forward() * amount;
    }

    /// Advance one tick: align velocity with the heading, move, apply drag and
    /// rebuild the collision mask.
    pub fn integrate(&mut self, config: &RaceConfig) {
        self.heading = self.heading.rem_euclid(360.0);
        let speed = self.speed();
        let aligned = self.forward() * speed;
        if speed < config.low_speed_threshold {
            self.velocity = aligned;
        } else {
            self.velocity += (aligned - self.velocity) * config.align_strength;
        }

        self.position += self.velocity;
        self.velocity *= self.tuning.drag;
        self.refresh_mask();

        if config.healing_enabled {
            self.damage = (self.damage - config.damage_recovery_per_tick).max(0.0);
        }
    }

    /// Scale velocity down (never up) to at most `max`.
    pub fn cap_speed(&mut self, max: f32) {
        let speed = self.speed();
        if speed > max && speed > 0.0 {
            self.velocity *= max / speed;
        }
    }

    /// Rebuild the rotated mask if the heading moved since it was built.
    pub fn refresh_mask(&mut self) {
        self.heading = self.heading.rem_euclid(360.0);
        if self.mask_heading != self.heading {
            self.mask = self.sprite_mask.rotated(self.heading);
            self.mask_heading = self.heading;
        }
    }

    pub fn mask(&self) -> &CollisionMask {
        &self.mask
    }

    pub fn mask_is_current(&self) -> bool {
        self.mask_heading == self.heading
    }

    /// Top-left pixel of the rotated sprite's bounding box.
    pub fn rect_origin(&self) -> IVec2 {
        let half = self.mask.size().as_vec2() / 2.0;
        (self.position - half).floor().as_ivec2()
    }

    pub fn add_damage(&mut self, amount: f32) {
        self.damage = crate::damage::accrue(self.damage, amount);
        self.lap_damage_increase += amount;
    }
}

fn vary(tuning: CarTuning, rng: &mut impl Rng) -> CarTuning {
    let r = tuning.randomness;
    if r <= 0.0 {
        return tuning;
    }
    let mut jitter = |value: f32| value * rng.gen_range(1.0 - r..=1.0 + r);
    CarTuning {
        thrust: jitter(tuning.thrust),
        drag: jitter(tuning.drag).min(1.0),
        max_speed: jitter(tuning.max_speed),
        base_turn_rate: jitter(tuning.base_turn_rate),
        turn_speed_factor: jitter(tuning.turn_speed_factor),
        steer_response: jitter(tuning.steer_response).min(1.0),
        grip_factor: jitter(tuning.grip_factor),
        randomness: r,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub(crate) fn test_car(position: Vec2, heading: f32) -> Vehicle {
        let tuning = CarTuning {
            randomness: 0.0,
            ..CarTuning::player()
        };
        let mut rng = StdRng::seed_from_u64(7);
        Vehicle::spawn(
            tuning,
            position,
            heading,
            Arc::new(CollisionMask::filled(50, 30)),
            &mut rng,
        )
    }

    #[test]
    fn heading_vector_points_up_at_ninety() {
        let v = heading_vector(90.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn bearing_and_angle_diff_agree() {
        let b = bearing(Vec2::ZERO, Vec2::new(0.0, -10.0));
        assert!((b - 90.0).abs() < 1e-4);
        assert!((angle_diff(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((angle_diff(10.0, 350.0) + 20.0).abs() < 1e-4);
    }

    #[test]
    fn spawn_variation_stays_within_randomness() {
        let mut rng = StdRng::seed_from_u64(42);
        let tuning = CarTuning {
            randomness: 0.1,
            ..CarTuning::player()
        };
        for _ in 0..50 {
            let car = Vehicle::spawn(
                tuning,
                Vec2::ZERO,
                0.0,
                Arc::new(CollisionMask::filled(4, 4)),
                &mut rng,
            );
            let ratio = car.tuning.max_speed / tuning.max_speed;
            assert!((0.9..=1.1).contains(&ratio), "ratio {ratio}");
            assert!(car.tuning.drag <= 1.0);
        }
    }

    #[test]
    fn accelerating_moves_forward() {
        let config = RaceConfig::default();
        let table = DebuffTable::default();
        let mut car = test_car(Vec2::new(500.0, 500.0), 0.0);
        let intent = DriveIntent {
            accelerate: true,
            ..Default::default()
        };
        for _ in 0..30 {
            let stats = car.effective_stats(&table, true);
            car.apply_intent(&intent, &stats);
            car.integrate(&config);
        }
        assert!(car.position.x > 500.0);
        assert!((car.position.y - 500.0).abs() < 1e-3);
    }

    #[test]
    fn steering_left_turns_counter_clockwise() {
        let config = RaceConfig::default();
        let table = DebuffTable::default();
        let mut car = test_car(Vec2::new(500.0, 500.0), 0.0);
        let intent = DriveIntent {
            steer: 1.0,
            ..Default::default()
        };
        let stats = car.effective_stats(&table, true);
        car.apply_intent(&intent, &stats);
        car.integrate(&config);
        // steer 0.4 × 5°/tick × 1.5 grip factor at standstill.
        assert!((car.heading - 3.0).abs() < 1e-4, "heading {}", car.heading);
        assert!(car.mask_is_current());
    }

    #[test]
    fn low_speed_velocity_snaps_to_heading() {
        let config = RaceConfig::default();
        let mut car = test_car(Vec2::ZERO, 90.0);
        car.velocity = Vec2::new(1.0, 0.0);
        car.integrate(&config);
        assert!(car.velocity.x.abs() < 1e-5);
        assert!(car.velocity.y < 0.0);
    }

    #[test]
    fn damage_debuffs_effective_stats() {
        let table = DebuffTable::default();
        let mut car = test_car(Vec2::ZERO, 0.0);
        car.damage = 30.0;
        let stats = car.effective_stats(&table, true);
        assert!((stats.max_speed - car.tuning.max_speed * 0.95).abs() < 1e-5);
        let stats = car.effective_stats(&table, false);
        assert_eq!(stats.max_speed, car.tuning.max_speed);
    }

    #[test]
    fn healing_decays_damage_to_zero() {
        let config = RaceConfig {
            healing_enabled: true,
            ..Default::default()
        };
        let mut car = test_car(Vec2::ZERO, 0.0);
        car.damage = 0.15;
        car.integrate(&config);
        car.integrate(&config);
        assert_eq!(car.damage, 0.0);
    }

    #[test]
    fn rect_origin_centres_the_mask() {
        let car = test_car(Vec2::new(100.0, 100.0), 0.0);
        assert_eq!(car.rect_origin(), IVec2::new(75, 85));
    }
}
