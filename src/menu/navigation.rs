//! Keyboard navigation between menu states, free of ECS types so the whole
//! flow can be unit tested.

use super::types::GameState;
use crate::config::RaceConfig;
use crate::constants::MAX_AI_CARS;
use crate::race::{GameMode, RaceSession};

/// Title-screen entries in display order.
pub const MENU_OPTIONS: [&str; 3] = ["Practice", "Race", "Quit"];

/// A menu-relevant key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKey {
    Up,
    Down,
    /// Enter or Space.
    Confirm,
    /// Escape: back to the title screen from anywhere.
    Back,
    /// P: pause toggle.
    Pause,
}

/// Result of one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Stay,
    Goto(GameState),
    Quit,
}

/// Apply `key` in `state`, updating the selection and session choices.
pub fn navigate(
    state: GameState,
    key: MenuKey,
    selected: &mut usize,
    session: &mut RaceSession,
    config: &RaceConfig,
) -> Navigation {
    if key == MenuKey::Back {
        return if state == GameState::Menu {
            Navigation::Stay
        } else {
            Navigation::Goto(GameState::Menu)
        };
    }

    let ai_choices = MAX_AI_CARS + 1;
    match (state, key) {
        (GameState::Menu, MenuKey::Up) => {
            *selected = (*selected + MENU_OPTIONS.len() - 1) % MENU_OPTIONS.len();
            Navigation::Stay
        }
        (GameState::Menu, MenuKey::Down) => {
            *selected = (*selected + 1) % MENU_OPTIONS.len();
            Navigation::Stay
        }
        (GameState::Menu, MenuKey::Confirm) => match *selected {
            0 => {
                session.mode = GameMode::Practice;
                Navigation::Goto(GameState::AiSelect)
            }
            1 => Navigation::Goto(GameState::LapSelect),
            _ => Navigation::Quit,
        },

        (GameState::LapSelect, MenuKey::Up) => {
            session.target_laps = session
                .target_laps
                .saturating_sub(config.lap_step)
                .max(config.min_race_laps);
            Navigation::Stay
        }
        (GameState::LapSelect, MenuKey::Down) => {
            session.target_laps += config.lap_step;
            Navigation::Stay
        }
        (GameState::LapSelect, MenuKey::Confirm) => {
            session.mode = GameMode::Race;
            Navigation::Goto(GameState::AiSelect)
        }

        (GameState::AiSelect, MenuKey::Up) => {
            session.ai_count = (session.ai_count + ai_choices - 1) % ai_choices;
            Navigation::Stay
        }
        (GameState::AiSelect, MenuKey::Down) => {
            session.ai_count = (session.ai_count + 1) % ai_choices;
            Navigation::Stay
        }
        (GameState::AiSelect, MenuKey::Confirm) => Navigation::Goto(GameState::PlayerToggle),

        (GameState::PlayerToggle, MenuKey::Up | MenuKey::Down) => {
            session.player_active = !session.player_active;
            Navigation::Stay
        }
        (GameState::PlayerToggle, MenuKey::Confirm) => match session.mode {
            GameMode::Race => Navigation::Goto(GameState::Countdown),
            GameMode::Practice => Navigation::Goto(GameState::Racing),
        },

        (GameState::Racing, MenuKey::Pause) => Navigation::Goto(GameState::Paused),
        (GameState::Paused, MenuKey::Pause) => Navigation::Goto(GameState::Racing),

        (GameState::RaceEnd, MenuKey::Confirm) => Navigation::Goto(GameState::Menu),

        _ => Navigation::Stay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (usize, RaceSession, RaceConfig) {
        let config = RaceConfig::default();
        (0, RaceSession::new(&config), config)
    }

    #[test]
    fn title_selection_wraps() {
        let (mut sel, mut session, config) = fixture();
        navigate(GameState::Menu, MenuKey::Up, &mut sel, &mut session, &config);
        assert_eq!(sel, 2);
        navigate(GameState::Menu, MenuKey::Down, &mut sel, &mut session, &config);
        assert_eq!(sel, 0);
    }

    #[test]
    fn practice_skips_lap_select() {
        let (mut sel, mut session, config) = fixture();
        let nav = navigate(GameState::Menu, MenuKey::Confirm, &mut sel, &mut session, &config);
        assert_eq!(nav, Navigation::Goto(GameState::AiSelect));
        assert_eq!(session.mode, GameMode::Practice);
        let nav = navigate(GameState::PlayerToggle, MenuKey::Confirm, &mut sel, &mut session, &config);
        assert_eq!(nav, Navigation::Goto(GameState::Racing));
    }

    #[test]
    fn race_goes_through_lap_select_and_countdown() {
        let (mut sel, mut session, config) = fixture();
        sel = 1;
        let nav = navigate(GameState::Menu, MenuKey::Confirm, &mut sel, &mut session, &config);
        assert_eq!(nav, Navigation::Goto(GameState::LapSelect));
        let nav = navigate(GameState::LapSelect, MenuKey::Confirm, &mut sel, &mut session, &config);
        assert_eq!(nav, Navigation::Goto(GameState::AiSelect));
        assert_eq!(session.mode, GameMode::Race);
        let nav = navigate(GameState::PlayerToggle, MenuKey::Confirm, &mut sel, &mut session, &config);
        assert_eq!(nav, Navigation::Goto(GameState::Countdown));
    }

    #[test]
    fn lap_count_steps_by_five_with_floor() {
        let (mut sel, mut session, config) = fixture();
        assert_eq!(session.target_laps, 5);
        navigate(GameState::LapSelect, MenuKey::Up, &mut sel, &mut session, &config);
        assert_eq!(session.target_laps, 5);
        navigate(GameState::LapSelect, MenuKey::Down, &mut sel, &mut session, &config);
        navigate(GameState::LapSelect, MenuKey::Down, &mut sel, &mut session, &config);
        assert_eq!(session.target_laps, 15);
        navigate(GameState::LapSelect, MenuKey::Up, &mut sel, &mut session, &config);
        assert_eq!(session.target_laps, 10);
    }

    #[test]
    fn ai_count_wraps_between_zero_and_seven() {
        let (mut sel, mut session, config) = fixture();
        session.ai_count = 7;
        navigate(GameState::AiSelect, MenuKey::Down, &mut sel, &mut session, &config);
        assert_eq!(session.ai_count, 0);
        navigate(GameState::AiSelect, MenuKey::Up, &mut sel, &mut session, &config);
        assert_eq!(session.ai_count, 7);
    }

    #[test]
    fn player_toggle_flips() {
        let (mut sel, mut session, config) = fixture();
        navigate(GameState::PlayerToggle, MenuKey::Down, &mut sel, &mut session, &config);
        assert!(!session.player_active);
        navigate(GameState::PlayerToggle, MenuKey::Up, &mut sel, &mut session, &config);
        assert!(session.player_active);
    }

    #[test]
    fn escape_returns_to_menu_from_anywhere() {
        let (mut sel, mut session, config) = fixture();
        for state in [
            GameState::LapSelect,
            GameState::Countdown,
            GameState::Racing,
            GameState::Paused,
            GameState::RaceEnd,
        ] {
            let nav = navigate(state, MenuKey::Back, &mut sel, &mut session, &config);
            assert_eq!(nav, Navigation::Goto(GameState::Menu));
        }
        let nav = navigate(GameState::Menu, MenuKey::Back, &mut sel, &mut session, &config);
        assert_eq!(nav, Navigation::Stay);
    }

    #[test]
    fn p_toggles_pause_only_while_racing() {
        let (mut sel, mut session, config) = fixture();
        let nav = navigate(GameState::Racing, MenuKey::Pause, &mut sel, &mut session, &config);
        assert_eq!(nav, Navigation::Goto(GameState::Paused));
        let nav = navigate(GameState::Paused, MenuKey::Pause, &mut sel, &mut session, &config);
        assert_eq!(nav, Navigation::Goto(GameState::Racing));
        let nav = navigate(GameState::Countdown, MenuKey::Pause, &mut sel, &mut session, &config);
        assert_eq!(nav, Navigation::Stay);
    }

    #[test]
    fn quit_option_requests_exit() {
        let (mut sel, mut session, config) = fixture();
        sel = 2;
        let nav = navigate(GameState::Menu, MenuKey::Confirm, &mut sel, &mut session, &config);
        assert_eq!(nav, Navigation::Quit);
    }
}
