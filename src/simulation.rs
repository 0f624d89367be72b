//! Simulation plugin: the fixed-rate race tick.
//!
//! All race logic lives in [`step_race`], a plain function over `&mut Car`
//! that integration tests call directly.  The ECS side only gathers the
//! inputs, runs one step per `FixedUpdate` and reacts to the report.
//!
//! ## Systems (registered by `SimulationPlugin`)
//!
//! | System                | Schedule                       | Purpose                          |
//! |-----------------------|--------------------------------|----------------------------------|
//! | `sample_driver_input` | `FixedUpdate / in Racing`      | Keyboard → [`DriveIntent`]       |
//! | `race_tick_system`    | `FixedUpdate / in Racing`      | One [`step_race`], winner check  |

use crate::ai;
use crate::collision;
use crate::config::RaceConfig;
use crate::constants::TICK_HZ;
use crate::damage::DebuffTable;
use crate::lap::{settle_lap_damage, LapCrossing};
use crate::menu::GameState;
use crate::race::{Car, Controller, RaceSession};
use crate::track::Track;
use crate::vehicle::{DriveIntent, Vehicle};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use rand::Rng;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .init_resource::<DriverInput>()
            .add_systems(
                FixedUpdate,
                (sample_driver_input, race_tick_system)
                    .chain()
                    .run_if(in_state(GameState::Racing)),
            );
    }
}

/// The human driver's input, sampled once per tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct DriverInput(pub DriveIntent);

/// Read-only inputs to one race tick.
pub struct TickInput<'a> {
    pub track: &'a Track,
    pub config: &'a RaceConfig,
    pub debuffs: &'a DebuffTable,
    pub session: &'a RaceSession,
    pub intent: DriveIntent,
    /// Wall-clock milliseconds, used for lap timing.
    pub now_ms: u64,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub wall_contacts: usize,
    pub car_contacts: usize,
    /// `(index into cars, crossing)` for every start-line crossing.
    pub crossings: Vec<(usize, LapCrossing)>,
    /// Index of the car that just won the race.
    pub winner: Option<usize>,
}

/// Advance every car by one tick.
///
/// Order: AI steering, integration and wall contact per car, car-to-car
/// contact over every pair, waypoint advance, lap crossings.  In a race the
/// first car to complete its final lap stops the crossing pass.
pub fn step_race(cars: &mut [&mut Car], input: &TickInput, rng: &mut impl Rng) -> TickReport {
    let mut report = TickReport::default();
    let config = input.config;

    // ── AI ───────────────────────────────────────────────────────────────────
    let positions: Vec<Vec2> = cars.iter().map(|c| c.vehicle.position).collect();
    let mut others = Vec::with_capacity(positions.len());
    for (i, car) in cars.iter_mut().enumerate() {
        if let Controller::Ai(driver) = car.controller {
            others.clear();
            others.extend(
                positions
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, p)| *p),
            );
            ai::steer(
                &mut car.vehicle,
                &driver,
                &others,
                input.track,
                config,
                input.debuffs,
            );
        }
    }

    // ── Motion and walls ─────────────────────────────────────────────────────
    for car in cars.iter_mut() {
        let vehicle = &mut car.vehicle;
        if car.controller.is_human() {
            let stats = vehicle.effective_stats(input.debuffs, config.damage_enabled);
            vehicle.apply_intent(&input.intent, &stats);
        }
        vehicle.integrate(config);
        if collision::resolve_track_contact(vehicle, input.track, config, input.debuffs) {
            report.wall_contacts += 1;
        }
    }

    // ── Car pairs ────────────────────────────────────────────────────────────
    {
        let mut vehicles: Vec<&mut Vehicle> = cars.iter_mut().map(|c| &mut c.vehicle).collect();
        report.car_contacts = collision::resolve_car_contacts(&mut vehicles, config, rng);
    }

    // ── Waypoints ────────────────────────────────────────────────────────────
    let tick = input.session.tick;
    for car in cars.iter_mut() {
        let position = car.vehicle.position;
        car.vehicle
            .waypoint
            .advance(position, input.track, config.waypoint_capture_radius, tick);
    }

    // ── Laps ─────────────────────────────────────────────────────────────────
    let zone = input.track.start_zone();
    for (i, car) in cars.iter_mut().enumerate() {
        let in_zone = zone.contains(car.vehicle.position);
        let Some(crossing) = car.vehicle.lap.update(in_zone, input.now_ms) else {
            continue;
        };
        settle_lap_damage(&mut car.vehicle, config);
        report.crossings.push((i, crossing));
        if input.session.is_winning_lap(crossing.lap) {
            report.winner = Some(i);
            break;
        }
    }

    report
}

/// Sample the keyboard into [`DriverInput`].
///
/// Left/Right steer, Left Ctrl accelerates, Space brakes.
pub fn sample_driver_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<DriverInput>) {
    let mut steer = 0.0;
    if keys.pressed(KeyCode::ArrowLeft) {
        steer += 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        steer -= 1.0;
    }
    input.0 = DriveIntent {
        steer,
        accelerate: keys.pressed(KeyCode::ControlLeft),
        brake: keys.pressed(KeyCode::Space),
    };
}

/// Run one [`step_race`] over every car, in grid order.
#[allow(clippy::too_many_arguments)]
pub fn race_tick_system(
    mut cars: Query<&mut Car>,
    track: Res<Track>,
    config: Res<RaceConfig>,
    debuffs: Res<DebuffTable>,
    input: Res<DriverInput>,
    time: Res<Time<Real>>,
    mut session: ResMut<RaceSession>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let mut handles: Vec<Mut<Car>> = cars.iter_mut().collect();
    handles.sort_by_key(|c| c.slot);
    let mut refs: Vec<&mut Car> = handles.iter_mut().map(|c| &mut **c).collect();

    let tick_input = TickInput {
        track: &track,
        config: &config,
        debuffs: &debuffs,
        session: &session,
        intent: input.0,
        now_ms: time.elapsed().as_millis() as u64,
    };
    let report = step_race(&mut refs, &tick_input, &mut rand::thread_rng());

    for (i, crossing) in &report.crossings {
        if let Some(ms) = crossing.lap_time_ms {
            debug!(
                "{} lap {} in {}",
                refs[*i].name,
                crossing.lap - 1,
                crate::race::format_lap_time(Some(ms))
            );
        }
    }

    session.tick += 1;
    if let Some(i) = report.winner {
        let name = refs[i].name.clone();
        info!("{name} wins after {} laps", session.target_laps);
        session.winner = Some(name);
        next_state.set(GameState::RaceEnd);
    }
}
