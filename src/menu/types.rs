use bevy::prelude::*;

/// Top-level application state machine.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Title screen: Practice / Race / Quit.
    #[default]
    Menu,
    /// Race length picker (race mode only).
    LapSelect,
    /// Number of AI opponents, 0–7.
    AiSelect,
    /// Race yourself or watch the AI.
    PlayerToggle,
    /// "Ready", "Set", "Go" before a race.
    Countdown,
    /// Simulation running.
    Racing,
    /// Simulation frozen; pause overlay visible.
    Paused,
    /// Results table after a car wins.
    RaceEnd,
}

impl GameState {
    /// The three pre-race pickers share one screen layout.
    pub fn is_selector(self) -> bool {
        matches!(
            self,
            GameState::LapSelect | GameState::AiSelect | GameState::PlayerToggle
        )
    }
}

/// Highlighted entry of the title screen.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuSelection(pub usize);

/// Root node of the title screen; despawned on `OnExit(Menu)`.
#[derive(Component)]
pub struct MainMenuRoot;

/// One title-screen entry, by index into [`MENU_OPTIONS`](super::MENU_OPTIONS).
#[derive(Component)]
pub struct MenuOptionText(pub usize);

/// Root node of a picker screen.
#[derive(Component)]
pub struct SelectorRoot;

/// The picker's current value.
#[derive(Component)]
pub struct SelectorValueText;

/// Centred countdown caption.
#[derive(Component)]
pub struct CountdownRoot;

#[derive(Component)]
pub struct CountdownText;

/// Pause overlay root; despawned on `OnExit(Paused)`.
#[derive(Component)]
pub struct PauseMenuRoot;

/// Results table root; despawned on `OnExit(RaceEnd)`.
#[derive(Component)]
pub struct RaceEndRoot;
