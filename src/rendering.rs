//! In-race HUD: driver panel, speed-limit indicator and leaderboard.
//!
//! ## Layout
//!
//! | Element                | Position   | Content                                        |
//! |------------------------|------------|------------------------------------------------|
//! | Speed-limit indicator  | top-left   | 20 px square, red while `speed_limit < 1`      |
//! | Driver panel           | top-left   | speed %, lap, current/last/best lap, damage    |
//! | Leaderboard            | top-right  | `pos. name lap` per car, in livery colours     |
//!
//! The panel follows the human car; in watch mode it follows the leader.
//!
//! ## Systems
//!
//! | System              | Schedule                          | Purpose                     |
//! |---------------------|-----------------------------------|-----------------------------|
//! | `spawn_hud`         | called from session start         | Spawn all HUD nodes         |
//! | `hud_update_system` | `Update / Countdown, Racing, Paused` | Refresh panel and board |

use crate::config::RaceConfig;
use crate::constants::MAX_AI_CARS;
use crate::race::{format_lap_time, standings, Car, RaceSession};
use crate::track::Track;
use bevy::prelude::*;

/// Root of every HUD node; despawned when the session ends.
#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct SpeedLimitIndicator;

#[derive(Component)]
pub struct DriverPanelText;

/// Leaderboard line `n` (0-based position).
#[derive(Component)]
pub struct LeaderboardRow(pub usize);

fn panel_color() -> Color {
    Color::srgb(0.95, 0.95, 0.95)
}
fn limited_color() -> Color {
    Color::srgb(1.0, 0.0, 0.0)
}
fn free_color() -> Color {
    Color::srgb(0.0, 1.0, 0.0)
}

/// Spawn the HUD for a new session.
pub fn spawn_hud(commands: &mut Commands, config: &RaceConfig) {
    let font_size = config.hud_font_size;

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
            ZIndex(100),
            HudRoot,
        ))
        .with_children(|panel| {
            panel.spawn((
                Node {
                    width: Val::Px(20.0),
                    height: Val::Px(20.0),
                    ..default()
                },
                BackgroundColor(free_color()),
                SpeedLimitIndicator,
            ));
            panel.spawn((
                Text::new(""),
                TextFont {
                    font_size,
                    ..default()
                },
                TextColor(panel_color()),
                DriverPanelText,
            ));
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(20.0),
                top: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            ZIndex(100),
            HudRoot,
        ))
        .with_children(|board| {
            for i in 0..=MAX_AI_CARS {
                board.spawn((
                    Text::new(""),
                    TextFont {
                        font_size,
                        ..default()
                    },
                    TextColor(panel_color()),
                    LeaderboardRow(i),
                ));
            }
        });
}

/// Multi-line driver panel text.
pub fn driver_panel(car: &Car, session: &RaceSession, config: &RaceConfig, now_ms: u64) -> String {
    let vehicle = &car.vehicle;
    let max_speed = vehicle.tuning.max_speed;
    let speed = vehicle.speed();
    let percent = if max_speed > 0.0 {
        speed / max_speed * 100.0
    } else {
        0.0
    };
    let timer = &vehicle.lap;
    let mut lines = vec![
        car.name.clone(),
        format!("Speed: {percent:.0}% ({speed:.1})"),
        format!("Lap: {}", session.lap_label(timer.lap)),
        format!("Current: {}", format_lap_time(timer.current_lap_ms(now_ms))),
        format!("Last: {}", format_lap_time(timer.last_lap_ms)),
        format!("Best: {}", format_lap_time(timer.best_lap_ms)),
    ];
    if config.damage_enabled {
        lines.push(format!("Damage: {:.0}%", vehicle.damage));
    }
    lines.join("\n")
}

/// Refresh the driver panel, the speed-limit indicator and the leaderboard.
#[allow(clippy::type_complexity)]
pub fn hud_update_system(
    cars: Query<&Car>,
    track: Res<Track>,
    session: Res<RaceSession>,
    config: Res<RaceConfig>,
    time: Res<Time<Real>>,
    mut indicator: Query<&mut BackgroundColor, With<SpeedLimitIndicator>>,
    mut panel: Query<&mut Text, (With<DriverPanelText>, Without<LeaderboardRow>)>,
    mut rows: Query<(&LeaderboardRow, &mut Text, &mut TextColor), Without<DriverPanelText>>,
) {
    let order = standings(cars.iter(), &track);
    let focus = order
        .iter()
        .find(|c| c.controller.is_human())
        .or_else(|| order.first())
        .copied();
    let now_ms = time.elapsed().as_millis() as u64;

    if let Some(car) = focus {
        for mut background in indicator.iter_mut() {
            background.0 = if car.vehicle.speed_limit < 1.0 {
                limited_color()
            } else {
                free_color()
            };
        }
        for mut text in panel.iter_mut() {
            text.0 = driver_panel(car, &session, &config, now_ms);
        }
    }

    for (row, mut text, mut color) in rows.iter_mut() {
        match order.get(row.0) {
            Some(car) => {
                text.0 = format!(
                    "{}. {} {}",
                    row.0 + 1,
                    car.name,
                    session.lap_label(car.vehicle.lap.lap)
                );
                color.0 = car.livery;
            }
            None => text.0.clear(),
        }
    }
}
