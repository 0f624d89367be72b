use super::*;

/// Spawn the title screen.
///
/// Layout:
/// ```text
/// ┌─────────────────────────────────────────────┐
/// │                  SPRINT                     │
/// │                                             │
/// │                 Practice                    │
/// │                   Race                      │
/// │                   Quit                      │
/// │                                             │
/// │   ↑/↓ select · Enter start · P pause        │
/// └─────────────────────────────────────────────┘
/// ```
pub(super) fn setup_main_menu(mut commands: Commands, selection: Res<MenuSelection>) {
    commands
        .spawn((
            fullscreen_column(),
            BackgroundColor(Color::BLACK),
            MainMenuRoot,
        ))
        .with_children(|root| {
            root.spawn(label("SPRINT", 64.0, title_color()));
            spacer(root, 48.0);

            for (i, option) in MENU_OPTIONS.iter().enumerate() {
                let color = if i == selection.0 {
                    selected_color()
                } else {
                    option_color()
                };
                root.spawn((label(*option, 32.0, color), MenuOptionText(i)));
                spacer(root, 10.0);
            }

            spacer(root, 48.0);
            root.spawn(label(
                "Up/Down select  ·  Enter start  ·  Left Ctrl accelerate  ·  Space brake  ·  P pause",
                14.0,
                hint_color(),
            ));
        });
}

/// Keep the highlighted title entry in sync with [`MenuSelection`].
pub(super) fn refresh_main_menu(
    selection: Res<MenuSelection>,
    mut options: Query<(&MenuOptionText, &mut TextColor)>,
) {
    if !selection.is_changed() {
        return;
    }
    for (option, mut color) in options.iter_mut() {
        *color = TextColor(if option.0 == selection.0 {
            selected_color()
        } else {
            option_color()
        });
    }
}

/// Spawn a picker screen (lap count, AI count or player toggle).
pub(super) fn setup_selector(
    mut commands: Commands,
    state: Res<State<GameState>>,
    session: Res<RaceSession>,
) {
    let title = match state.get() {
        GameState::LapSelect => "Number of laps",
        GameState::AiSelect => "AI opponents",
        _ => "Driver",
    };
    commands
        .spawn((
            fullscreen_column(),
            BackgroundColor(Color::BLACK),
            SelectorRoot,
        ))
        .with_children(|root| {
            root.spawn(label(title, 40.0, title_color()));
            spacer(root, 24.0);
            root.spawn((
                label(selector_value(*state.get(), &session), 32.0, selected_color()),
                SelectorValueText,
            ));
            spacer(root, 24.0);
            root.spawn(label(
                "Up/Down change  ·  Enter confirm  ·  Esc back",
                14.0,
                hint_color(),
            ));
        });
}

pub(super) fn refresh_selector(
    state: Res<State<GameState>>,
    session: Res<RaceSession>,
    mut values: Query<&mut Text, With<SelectorValueText>>,
) {
    if !session.is_changed() {
        return;
    }
    for mut text in values.iter_mut() {
        text.0 = selector_value(*state.get(), &session);
    }
}

fn selector_value(state: GameState, session: &RaceSession) -> String {
    match state {
        GameState::LapSelect => format!("< {} >", session.target_laps),
        GameState::AiSelect => format!("< {} >", session.ai_count),
        _ if session.player_active => "< Racing >".to_string(),
        _ => "< Watching >".to_string(),
    }
}
