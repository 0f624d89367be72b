use super::*;
use crate::graphics::{car_sprite, screen_to_world, RaceAssets};
use crate::race::build_roster;
use crate::rendering::{spawn_hud, HudRoot};
use crate::track::Track;

/// Spawn the grid and the HUD for the choices made in the pickers.
///
/// Runs on `OnTransition { PlayerToggle → Countdown }` and
/// `OnTransition { PlayerToggle → Racing }`.
pub fn start_session(
    mut commands: Commands,
    mut session: ResMut<RaceSession>,
    config: Res<RaceConfig>,
    track: Res<Track>,
    assets: Res<RaceAssets>,
) {
    session.reset_progress();
    let cars = build_roster(
        &session,
        &config,
        &track,
        &assets.car_mask,
        &mut rand::thread_rng(),
    );
    info!(
        "Session start: {:?}, {} cars, player {}",
        session.mode,
        cars.len(),
        if session.player_active { "racing" } else { "watching" }
    );

    let display = config.display_size();
    for car in cars {
        let transform = Transform::from_translation(
            screen_to_world(car.vehicle.position, display).extend(1.0),
        )
        .with_rotation(Quat::from_rotation_z(car.vehicle.heading.to_radians()));
        commands.spawn((car_sprite(&assets, car.livery), transform, car));
    }
    spawn_hud(&mut commands, &config);
}

/// Despawn every car and HUD node and clear per-race progress so the next
/// session starts clean.  Runs on `OnEnter(Menu)`.
pub fn cleanup_race(
    mut commands: Commands,
    cars: Query<Entity, With<Car>>,
    hud: Query<Entity, With<HudRoot>>,
    mut session: ResMut<RaceSession>,
) {
    for e in cars.iter().chain(hud.iter()) {
        commands.entity(e).despawn();
    }
    session.reset_progress();
}
