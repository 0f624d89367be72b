//! Wall and car-to-car contact response.
//!
//! Both tests are pixel-exact: a car's rotated mask is checked against the
//! track's wall mask at the car's bounding-box origin, and against every other
//! car's mask at their relative offset.
//!
//! | Event | speed_limit | grip | damage |
//! |-------|-------------|------|--------|
//! | wall overlap | set to `wall_speed_limit` | `-grip_loss_per_tick`, floor `min_grip` | `+wall_damage_per_tick` |
//! | wall clear | `+speed_limit_recovery`, cap 1 | `+grip_recovery`, cap 1 | — |
//! | car overlap | `-car_contact_speed_penalty`, floor `car_contact_speed_floor` | — | `+car_collision_damage` each |
//!
//! A car spawns with `grip` at its tuned grip factor (1.5 by default); the
//! first clear tick caps it at 1, so grip lives in `[min_grip, 1]` from then on.

use crate::config::RaceConfig;
use crate::damage::DebuffTable;
use crate::track::Track;
use crate::vehicle::Vehicle;
use bevy::math::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Per-car contact state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactState {
    /// Full speed limit and grip.
    #[default]
    Clear,
    /// Touching a wall or another car this tick.
    Contact,
    /// Free again but speed limit or grip still below 1.
    Recovering,
}

impl ContactState {
    fn settle(self, vehicle_recovered: bool) -> Self {
        match self {
            ContactState::Clear => ContactState::Clear,
            _ if vehicle_recovered => ContactState::Clear,
            _ => ContactState::Recovering,
        }
    }
}

/// Test one car against the walls and apply the response.  Returns whether
/// the car touched a wall.
pub fn resolve_track_contact(
    vehicle: &mut Vehicle,
    track: &Track,
    config: &RaceConfig,
    table: &DebuffTable,
) -> bool {
    let hit = track
        .walls()
        .overlaps(vehicle.mask(), vehicle.rect_origin());

    if hit {
        vehicle.speed_limit = config.wall_speed_limit;
        vehicle.grip = (vehicle.grip - config.grip_loss_per_tick).max(config.min_grip);
        if config.damage_enabled {
            vehicle.add_damage(config.wall_damage_per_tick);
        }
        vehicle.contact = ContactState::Contact;
    } else {
        vehicle.speed_limit = (vehicle.speed_limit + config.speed_limit_recovery).min(1.0);
        vehicle.grip = (vehicle.grip + config.grip_recovery).min(1.0);
        let recovered = vehicle.speed_limit >= 1.0 && vehicle.grip >= 1.0;
        vehicle.contact = vehicle.contact.settle(recovered);
    }

    let stats = vehicle.effective_stats(table, config.damage_enabled);
    vehicle.cap_speed(stats.max_speed * vehicle.speed_limit);
    hit
}

/// Test one pair of cars and, if their masks overlap, push them apart and
/// exchange momentum along the line between their centres.
pub fn resolve_car_pair(
    a: &mut Vehicle,
    b: &mut Vehicle,
    config: &RaceConfig,
    rng: &mut impl Rng,
) -> bool {
    let offset = b.rect_origin() - a.rect_origin();
    if !a.mask().overlaps(b.mask(), offset) {
        return false;
    }

    if config.damage_enabled {
        a.add_damage(config.car_collision_damage);
        b.add_damage(config.car_collision_damage);
    }

    let delta = b.position - a.position;
    let dist = delta.length();
    let normal = if dist > 0.0 {
        delta / dist
    } else {
        Vec2::from_angle(rng.gen_range(0.0..TAU))
    };

    let depth = config.car_diameter - dist;
    if depth > 0.0 {
        let push = normal * (depth / 2.0);
        a.position -= push;
        b.position += push;
    }

    let impulse = (a.velocity - b.velocity).dot(normal) * normal;
    a.velocity -= impulse * config.car_bounciness;
    b.velocity += impulse * config.car_bounciness;

    for car in [a, b] {
        car.speed_limit = (car.speed_limit - config.car_contact_speed_penalty)
            .max(config.car_contact_speed_floor);
        car.contact = ContactState::Contact;
    }
    true
}

/// Run [`resolve_car_pair`] over every unordered pair.  Returns the number of
/// contacts.
pub fn resolve_car_contacts(
    cars: &mut [&mut Vehicle],
    config: &RaceConfig,
    rng: &mut impl Rng,
) -> usize {
    let mut contacts = 0;
    for i in 0..cars.len() {
        let (head, tail) = cars.split_at_mut(i + 1);
        let a = &mut *head[i];
        for b in tail.iter_mut() {
            if resolve_car_pair(a, b, config, rng) {
                contacts += 1;
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::CollisionMask;
    use crate::track::Waypoint;
    use crate::vehicle::tests::test_car;
    use crate::vehicle::DriveIntent;
    use bevy::math::Rect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn walled_track() -> Track {
        let mut walls = CollisionMask::new(1000, 1000);
        walls.fill_rect(0, 0, 1000, 100);
        Track::new(walls, vec![Waypoint::new(500.0, 500.0, 10.0)], Rect::default())
    }

    #[test]
    fn wall_contact_limits_speed_and_grip() {
        let track = walled_track();
        let config = RaceConfig::default();
        let table = DebuffTable::default();
        let mut car = test_car(Vec2::new(500.0, 100.0), 0.0);
        car.velocity = Vec2::new(10.0, 0.0);

        assert!(resolve_track_contact(&mut car, &track, &config, &table));
        assert_eq!(car.speed_limit, 0.1);
        assert!((car.grip - 1.45).abs() < 1e-6);
        assert_eq!(car.contact, ContactState::Contact);
        assert!((car.speed() - car.tuning.max_speed * 0.1).abs() < 1e-4);
        assert!((car.damage - config.wall_damage_per_tick).abs() < 1e-6);
    }

    #[test]
    fn grip_never_drops_below_floor() {
        let track = walled_track();
        let config = RaceConfig::default();
        let table = DebuffTable::default();
        let mut car = test_car(Vec2::new(500.0, 100.0), 0.0);
        for _ in 0..100 {
            resolve_track_contact(&mut car, &track, &config, &table);
            assert!((0.3..=car.tuning.grip_factor).contains(&car.grip));
            assert!((0.1..=1.0).contains(&car.speed_limit));
        }
        assert_eq!(car.grip, 0.3);
    }

    #[test]
    fn tuned_grip_settles_to_one_after_the_first_clear_tick() {
        let track = walled_track();
        let config = RaceConfig::default();
        let table = DebuffTable::default();
        let mut car = test_car(Vec2::new(500.0, 500.0), 0.0);
        let intent = DriveIntent {
            steer: 1.0,
            ..Default::default()
        };
        assert_eq!(car.grip, 1.5);

        for _ in 0..2 {
            let stats = car.effective_stats(&table, config.damage_enabled);
            car.apply_intent(&intent, &stats);
            car.integrate(&config);
            assert!(!resolve_track_contact(&mut car, &track, &config, &table));
            assert_eq!(car.grip, 1.0);
        }
        // 0.4 × 5° × 1.5, then 0.64 × 5° × 1.0.
        assert!((car.heading - 6.2).abs() < 1e-4, "heading {}", car.heading);
    }

    #[test]
    fn clear_of_walls_recovers_through_recovering_state() {
        let track = walled_track();
        let config = RaceConfig::default();
        let table = DebuffTable::default();
        let mut car = test_car(Vec2::new(500.0, 100.0), 0.0);
        resolve_track_contact(&mut car, &track, &config, &table);

        car.position = Vec2::new(500.0, 500.0);
        assert!(!resolve_track_contact(&mut car, &track, &config, &table));
        assert_eq!(car.contact, ContactState::Recovering);
        assert!((car.speed_limit - 0.12).abs() < 1e-6);

        for _ in 0..60 {
            resolve_track_contact(&mut car, &track, &config, &table);
        }
        assert_eq!(car.speed_limit, 1.0);
        assert_eq!(car.grip, 1.0);
        assert_eq!(car.contact, ContactState::Clear);
    }

    #[test]
    fn disabled_damage_leaves_damage_untouched() {
        let track = walled_track();
        let config = RaceConfig {
            damage_enabled: false,
            ..Default::default()
        };
        let mut car = test_car(Vec2::new(500.0, 100.0), 0.0);
        resolve_track_contact(&mut car, &track, &config, &DebuffTable::default());
        assert_eq!(car.damage, 0.0);
    }

    #[test]
    fn overlapping_cars_separate_and_exchange_momentum() {
        let config = RaceConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut a = test_car(Vec2::new(500.0, 500.0), 0.0);
        let mut b = test_car(Vec2::new(520.0, 500.0), 0.0);
        a.velocity = Vec2::new(5.0, 0.0);

        assert!(resolve_car_pair(&mut a, &mut b, &config, &mut rng));
        assert!((a.position.x - 490.0).abs() < 1e-4);
        assert!((b.position.x - 530.0).abs() < 1e-4);
        assert!((a.velocity.x - 1.0).abs() < 1e-4);
        assert!((b.velocity.x - 4.0).abs() < 1e-4);
        assert!((a.speed_limit - 0.85).abs() < 1e-6);
        assert!((a.damage - b.damage).abs() < 1e-6);
    }

    #[test]
    fn car_contact_lifts_a_wall_limit_to_its_own_floor() {
        let config = RaceConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut a = test_car(Vec2::new(500.0, 500.0), 0.0);
        let mut b = test_car(Vec2::new(510.0, 500.0), 0.0);
        a.speed_limit = 0.1;
        resolve_car_pair(&mut a, &mut b, &config, &mut rng);
        assert_eq!(a.speed_limit, config.car_contact_speed_floor);
        assert!((b.speed_limit - 0.85).abs() < 1e-6);
    }

    #[test]
    fn coincident_cars_get_pushed_apart() {
        let config = RaceConfig::default();
        let mut rng = StdRng::seed_from_u64(99);
        let mut a = test_car(Vec2::new(500.0, 500.0), 0.0);
        let mut b = test_car(Vec2::new(500.0, 500.0), 0.0);
        assert!(resolve_car_pair(&mut a, &mut b, &config, &mut rng));
        let gap = a.position.distance(b.position);
        assert!((gap - config.car_diameter).abs() < 1e-3, "gap {gap}");
    }

    #[test]
    fn distant_cars_do_not_interact() {
        let config = RaceConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut a = test_car(Vec2::new(100.0, 100.0), 0.0);
        let mut b = test_car(Vec2::new(400.0, 100.0), 0.0);
        let mut c = test_car(Vec2::new(700.0, 100.0), 0.0);
        let mut cars = [&mut a, &mut b, &mut c];
        assert_eq!(resolve_car_contacts(&mut cars, &config, &mut rng), 0);
    }
}
