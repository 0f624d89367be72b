//! Game-state machine, keyboard menus and the race lifecycle screens.
//!
//! ## States
//!
//! | State          | Description                                  |
//! |----------------|----------------------------------------------|
//! | `Menu`         | Title screen; initial state                  |
//! | `LapSelect`    | Race length, steps of 5 (race mode only)     |
//! | `AiSelect`     | Number of AI opponents, 0–7, wraps           |
//! | `PlayerToggle` | Race yourself or watch the AI                |
//! | `Countdown`    | "Ready", "Set", "Go" (race mode only)        |
//! | `Racing`       | Simulation running                           |
//! | `Paused`       | Simulation frozen; lap timers stopped        |
//! | `RaceEnd`      | Results table                                |
//!
//! Escape returns to `Menu` from anywhere; P toggles `Racing`/`Paused`.
//!
//! ## Systems (registered by `MenuPlugin`)
//!
//! | System               | Schedule                              | Purpose                      |
//! |----------------------|---------------------------------------|------------------------------|
//! | `menu_input_system`  | `Update`                              | Keys → [`navigate`]          |
//! | `cleanup_race`       | `OnEnter(Menu)`                       | Despawn cars and HUD         |
//! | `start_session`      | `OnTransition { PlayerToggle → _ }`   | Spawn the grid and HUD       |
//! | `countdown_system`   | `Update / in Countdown`               | Caption, green light         |
//! | `begin_pause`        | `OnEnter(Paused)`                     | Stop lap timers              |
//! | `end_pause`          | `OnExit(Paused)`                      | Credit paused time           |
//! | `hud_update_system`  | `Update / Countdown, Racing, Paused`  | Refresh HUD                  |
//! | `sync_car_sprites`   | `Update / Countdown, Racing, Paused`  | Car transforms               |

use crate::config::RaceConfig;
use crate::graphics::sync_car_sprites;
use crate::race::{Car, RaceSession};
use crate::rendering::hud_update_system;
use bevy::prelude::*;

mod cleanup;
mod common;
mod countdown;
mod main_menu;
mod navigation;
mod pause;
mod race_end;
mod types;

pub use cleanup::{cleanup_race, start_session};
pub use countdown::countdown_label;
pub use navigation::{navigate, MenuKey, Navigation, MENU_OPTIONS};
pub use types::*;

use common::*;

/// Registers `GameState`, every menu screen and the session lifecycle.
///
/// Must be added before [`crate::simulation::SimulationPlugin`], whose systems
/// run under `in_state(GameState::Racing)`.
pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<MenuSelection>()
            .init_resource::<RaceSession>()
            .add_systems(Update, menu_input_system)
            // Title
            .add_systems(
                OnEnter(GameState::Menu),
                (cleanup_race, main_menu::setup_main_menu),
            )
            .add_systems(OnExit(GameState::Menu), despawn_with::<MainMenuRoot>)
            .add_systems(
                Update,
                main_menu::refresh_main_menu.run_if(in_state(GameState::Menu)),
            )
            // Pickers
            .add_systems(OnEnter(GameState::LapSelect), main_menu::setup_selector)
            .add_systems(OnEnter(GameState::AiSelect), main_menu::setup_selector)
            .add_systems(OnEnter(GameState::PlayerToggle), main_menu::setup_selector)
            .add_systems(OnExit(GameState::LapSelect), despawn_with::<SelectorRoot>)
            .add_systems(OnExit(GameState::AiSelect), despawn_with::<SelectorRoot>)
            .add_systems(OnExit(GameState::PlayerToggle), despawn_with::<SelectorRoot>)
            .add_systems(
                Update,
                main_menu::refresh_selector.run_if(in_selector_state),
            )
            // Session start
            .add_systems(
                OnTransition {
                    exited: GameState::PlayerToggle,
                    entered: GameState::Countdown,
                },
                start_session,
            )
            .add_systems(
                OnTransition {
                    exited: GameState::PlayerToggle,
                    entered: GameState::Racing,
                },
                start_session,
            )
            // Countdown
            .add_systems(OnEnter(GameState::Countdown), countdown::setup_countdown)
            .add_systems(OnExit(GameState::Countdown), despawn_with::<CountdownRoot>)
            .add_systems(
                Update,
                countdown::countdown_system.run_if(in_state(GameState::Countdown)),
            )
            // Pause
            .add_systems(
                OnEnter(GameState::Paused),
                (pause::begin_pause, pause::setup_pause_menu),
            )
            .add_systems(
                OnExit(GameState::Paused),
                (pause::end_pause, despawn_with::<PauseMenuRoot>),
            )
            // Results
            .add_systems(OnEnter(GameState::RaceEnd), race_end::setup_race_end)
            .add_systems(OnExit(GameState::RaceEnd), despawn_with::<RaceEndRoot>)
            // In-race
            .add_systems(
                Update,
                (hud_update_system, sync_car_sprites).run_if(
                    in_state(GameState::Countdown)
                        .or(in_state(GameState::Racing))
                        .or(in_state(GameState::Paused)),
                ),
            );
    }
}

fn in_selector_state(state: Res<State<GameState>>) -> bool {
    state.get().is_selector()
}

/// Keys pressed this frame, in the order they are handled.
fn pressed_menu_keys(keys: &ButtonInput<KeyCode>) -> Vec<MenuKey> {
    let mut pressed = Vec::new();
    if keys.just_pressed(KeyCode::Escape) {
        pressed.push(MenuKey::Back);
    }
    if keys.just_pressed(KeyCode::KeyP) {
        pressed.push(MenuKey::Pause);
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        pressed.push(MenuKey::Up);
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        pressed.push(MenuKey::Down);
    }
    if keys.any_just_pressed([KeyCode::Enter, KeyCode::NumpadEnter, KeyCode::Space]) {
        pressed.push(MenuKey::Confirm);
    }
    pressed
}

/// Translate key presses into state transitions.  At most one transition is
/// requested per frame.
pub fn menu_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    config: Res<RaceConfig>,
    mut selection: ResMut<MenuSelection>,
    mut session: ResMut<RaceSession>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    for key in pressed_menu_keys(&keys) {
        match navigate(*state.get(), key, &mut selection.0, &mut session, &config) {
            Navigation::Stay => {}
            Navigation::Goto(next) => {
                next_state.set(next);
                return;
            }
            Navigation::Quit => {
                info!("Quit selected");
                exit.write(AppExit::Success);
                return;
            }
        }
    }
}
