//! Race session: mode, grid, roster, standings and lap-time formatting.

use crate::ai::AiDriver;
use crate::config::RaceConfig;
use crate::constants::{GRID_HEADING, MAX_AI_CARS};
use crate::mask::CollisionMask;
use crate::track::{Track, REFERENCE_GRID_ORIGIN};
use crate::vehicle::Vehicle;
use bevy::prelude::*;
use rand::Rng;
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Unlimited laps, single-file grid.
    #[default]
    Practice,
    /// First car past `target_laps` wins.
    Race,
}

/// Who drives a car.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Controller {
    Human,
    Ai(AiDriver),
}

impl Controller {
    pub fn is_human(&self) -> bool {
        matches!(self, Controller::Human)
    }
}

/// One car on track.
#[derive(Component, Debug, Clone)]
pub struct Car {
    pub name: String,
    pub livery: Color,
    /// Grid slot; 0 is the player's, left empty in watch mode.
    pub slot: usize,
    pub controller: Controller,
    pub vehicle: Vehicle,
}

/// Settings chosen in the menus plus the state of the running session.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct RaceSession {
    pub mode: GameMode,
    pub target_laps: u32,
    pub ai_count: usize,
    pub player_active: bool,
    /// Fixed ticks simulated since the green light.
    pub tick: u64,
    /// Real-time timestamp at which the countdown ends.
    pub countdown_ends_ms: Option<u64>,
    pub winner: Option<String>,
}

impl RaceSession {
    pub fn new(config: &RaceConfig) -> Self {
        Self {
            mode: GameMode::Practice,
            target_laps: config.default_race_laps,
            ai_count: config.default_ai_count.min(MAX_AI_CARS),
            player_active: true,
            tick: 0,
            countdown_ends_ms: None,
            winner: None,
        }
    }

    /// Clear per-race progress, keeping the menu choices.
    pub fn reset_progress(&mut self) {
        self.tick = 0;
        self.countdown_ends_ms = None;
        self.winner = None;
    }

    /// Whether reaching `lap` ends the race.
    pub fn is_winning_lap(&self, lap: u32) -> bool {
        self.mode == GameMode::Race && lap > self.target_laps
    }

    /// HUD lap label: `n` in practice, `n/N` in a race.
    pub fn lap_label(&self, lap: u32) -> String {
        match self.mode {
            GameMode::Practice => lap.to_string(),
            GameMode::Race => format!("{}/{}", lap, self.target_laps),
        }
    }
}

impl FromWorld for RaceSession {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<RaceConfig>().cloned().unwrap_or_default();
        Self::new(&config)
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Staggered two-wide grid, reference pixels from the grid origin.
const RACE_GRID: [Vec2; MAX_AI_CARS + 1] = [
    Vec2::new(-40.0, 40.0),
    Vec2::new(40.0, 20.0),
    Vec2::new(-40.0, -20.0),
    Vec2::new(40.0, -40.0),
    Vec2::new(-80.0, -60.0),
    Vec2::new(80.0, -80.0),
    Vec2::new(-40.0, -100.0),
    Vec2::new(40.0, -120.0),
];

/// Single file, 50 reference pixels apart.
const PRACTICE_SPACING: f32 = 50.0;

/// Grid position of `slot` in display pixels.
pub fn grid_position(track: &Track, mode: GameMode, slot: usize) -> Vec2 {
    let slot = slot.min(MAX_AI_CARS);
    let offset = match mode {
        GameMode::Race => RACE_GRID[slot],
        GameMode::Practice => Vec2::new(0.0, -PRACTICE_SPACING * slot as f32),
    };
    track.from_reference(REFERENCE_GRID_ORIGIN + offset)
}

/// Livery colour for a grid slot.
pub fn livery(slot: usize) -> Color {
    const AI_LIVERIES: [(u8, u8, u8); MAX_AI_CARS] = [
        (30, 30, 30),
        (230, 40, 40),
        (245, 220, 20),
        (90, 110, 210),
        (250, 150, 20),
        (150, 90, 50),
        (150, 150, 150),
    ];
    match slot {
        0 => Color::WHITE,
        n => {
            let (r, g, b) = AI_LIVERIES[(n - 1) % MAX_AI_CARS];
            Color::srgb_u8(r, g, b)
        }
    }
}

/// Build every car for a new session: the player first (unless watching),
/// then `session.ai_count` AI cars in slots 1 onward.
pub fn build_roster(
    session: &RaceSession,
    config: &RaceConfig,
    track: &Track,
    sprite_mask: &Arc<CollisionMask>,
    rng: &mut impl Rng,
) -> Vec<Car> {
    let mut cars = Vec::with_capacity(session.ai_count + 1);

    if session.player_active {
        let position = grid_position(track, session.mode, 0);
        cars.push(Car {
            name: config.player_name.clone(),
            livery: livery(0),
            slot: 0,
            controller: Controller::Human,
            vehicle: Vehicle::spawn(config.player, position, GRID_HEADING, sprite_mask.clone(), rng),
        });
    }

    for ai_slot in 0..session.ai_count.min(MAX_AI_CARS) {
        let slot = ai_slot + 1;
        let position = grid_position(track, session.mode, slot);
        let vehicle = Vehicle::spawn(
            config.ai_tuning(ai_slot),
            position,
            GRID_HEADING,
            sprite_mask.clone(),
            rng,
        );
        cars.push(Car {
            name: config.ai_name(ai_slot),
            livery: livery(slot),
            slot,
            controller: Controller::Ai(AiDriver::new(config, rng)),
            vehicle,
        });
    }
    cars
}

// ── Standings ─────────────────────────────────────────────────────────────────

/// Race order: more laps first, then further along the racing line, then
/// closer to the next waypoint.
pub fn compare_progress(a: &Vehicle, b: &Vehicle, track: &Track) -> Ordering {
    let gap = |v: &Vehicle| v.position.distance(track.waypoint(v.waypoint.index).position);
    b.lap
        .lap
        .cmp(&a.lap.lap)
        .then(b.waypoint.index.cmp(&a.waypoint.index))
        .then(gap(a).total_cmp(&gap(b)))
}

/// Sort cars into race order.
pub fn standings<'a>(cars: impl IntoIterator<Item = &'a Car>, track: &Track) -> Vec<&'a Car> {
    let mut order: Vec<&Car> = cars.into_iter().collect();
    order.sort_by(|a, b| compare_progress(&a.vehicle, &b.vehicle, track));
    order
}

/// `MM:SS.mmm`, or `--:--.---` when there is no time yet.
pub fn format_lap_time(ms: Option<u64>) -> String {
    match ms {
        Some(ms) => {
            let minutes = ms / 60_000;
            let seconds = (ms / 1000) % 60;
            format!("{:02}:{:02}.{:03}", minutes, seconds, ms % 1000)
        }
        None => "--:--.---".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sprite() -> Arc<CollisionMask> {
        Arc::new(CollisionMask::filled(50, 30))
    }

    #[test]
    fn formats_lap_times() {
        assert_eq!(format_lap_time(Some(83_456)), "01:23.456");
        assert_eq!(format_lap_time(Some(999)), "00:00.999");
        assert_eq!(format_lap_time(None), "--:--.---");
    }

    #[test]
    fn winning_lap_only_in_race_mode() {
        let mut session = RaceSession::new(&RaceConfig::default());
        session.target_laps = 5;
        assert!(!session.is_winning_lap(6));
        session.mode = GameMode::Race;
        assert!(!session.is_winning_lap(5));
        assert!(session.is_winning_lap(6));
        assert_eq!(session.lap_label(3), "3/5");
    }

    #[test]
    fn roster_matches_session_choices() {
        let config = RaceConfig::default();
        let track = Track::placeholder(1920, 1080);
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = RaceSession::new(&config);
        session.ai_count = 4;
        session.mode = GameMode::Race;

        let cars = build_roster(&session, &config, &track, &sprite(), &mut rng);
        assert_eq!(cars.len(), 5);
        assert!(cars[0].controller.is_human());
        assert!(cars[1..].iter().all(|c| !c.controller.is_human()));
        assert_eq!(cars[0].vehicle.position, Vec2::new(660.0, 340.0));
        assert_eq!(cars[1].name, config.ai_name(0));
        assert_eq!(cars[2].vehicle.heading, GRID_HEADING);
    }

    #[test]
    fn watch_mode_leaves_the_player_slot_empty() {
        let config = RaceConfig::default();
        let track = Track::placeholder(1920, 1080);
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = RaceSession::new(&config);
        session.player_active = false;
        session.ai_count = 2;

        let cars = build_roster(&session, &config, &track, &sprite(), &mut rng);
        assert_eq!(cars.len(), 2);
        assert!(cars.iter().all(|c| matches!(c.controller, Controller::Ai(_))));
        assert_eq!(cars[0].slot, 1);
    }

    #[test]
    fn practice_grid_is_single_file() {
        let track = Track::placeholder(1920, 1080);
        let a = grid_position(&track, GameMode::Practice, 0);
        let b = grid_position(&track, GameMode::Practice, 3);
        assert_eq!(a.x, b.x);
        assert_eq!(a.y - b.y, 150.0);
    }

    #[test]
    fn standings_order_by_lap_then_waypoint_then_gap() {
        let config = RaceConfig::default();
        let track = Track::placeholder(1920, 1080);
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = RaceSession::new(&config);
        session.ai_count = 3;
        let mut cars = build_roster(&session, &config, &track, &sprite(), &mut rng);

        cars[0].vehicle.lap.lap = 1;
        cars[0].vehicle.waypoint.index = 10;
        cars[1].vehicle.lap.lap = 2;
        cars[1].vehicle.waypoint.index = 1;
        cars[2].vehicle.lap.lap = 1;
        cars[2].vehicle.waypoint.index = 10;
        cars[3].vehicle.lap.lap = 1;
        cars[3].vehicle.waypoint.index = 12;

        let target = track.waypoint(10).position;
        cars[0].vehicle.position = target + Vec2::new(100.0, 0.0);
        cars[2].vehicle.position = target + Vec2::new(10.0, 0.0);

        let order: Vec<usize> = standings(&cars, &track).iter().map(|c| c.slot).collect();
        assert_eq!(order, vec![1, 3, 2, 0]);
    }
}
