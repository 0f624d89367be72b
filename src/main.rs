use bevy::prelude::*;
use bevy::window::{MonitorSelection, WindowMode, WindowResolution};

use sprint::config::{self, RaceConfig, CONFIG_PATH};
use sprint::graphics;
use sprint::menu::MenuPlugin;
use sprint::race::RaceSession;
use sprint::simulation::SimulationPlugin;

fn main() {
    // The window size comes from the config, so it is read before the App
    // exists rather than in a Startup system.
    let (config, source) = RaceConfig::load_or_default(CONFIG_PATH);
    let debuffs = config.debuff_table().unwrap_or_default();

    let mode = if config.fullscreen {
        WindowMode::BorderlessFullscreen(MonitorSelection::Primary)
    } else {
        WindowMode::Windowed
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Sprint".into(),
                resolution: WindowResolution::new(config.display_width, config.display_height),
                mode,
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.1)))
        .insert_resource(RaceSession::new(&config))
        .insert_resource(debuffs)
        .insert_resource(source)
        .insert_resource(config)
        // MenuPlugin owns GameState; SimulationPlugin's systems are gated on it.
        .add_plugins(MenuPlugin)
        .add_plugins(SimulationPlugin)
        .add_systems(
            Startup,
            (
                config::log_config_source,
                graphics::setup_camera,
                graphics::setup_race_assets,
            ),
        )
        .run();
}
