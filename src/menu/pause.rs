use super::*;

/// Stamp the pause start on every car's lap timer.
pub(super) fn begin_pause(time: Res<Time<Real>>, mut cars: Query<&mut Car>) {
    let now = time.elapsed().as_millis() as u64;
    for mut car in cars.iter_mut() {
        car.vehicle.lap.begin_pause(now);
    }
}

/// Credit the time spent paused to each car's current lap.
pub(super) fn end_pause(time: Res<Time<Real>>, mut cars: Query<&mut Car>) {
    let now = time.elapsed().as_millis() as u64;
    for mut car in cars.iter_mut() {
        car.vehicle.lap.end_pause(now);
    }
}

/// Spawn the pause overlay over the frozen race.
///
/// ```text
/// ┌─────────────────────────────────────────────┐
/// │ ░░░░░░░░░ semi-transparent overlay ░░░░░░░░ │
/// │ ░░░░░   ┌───────────────────────┐   ░░░░░░ │
/// │ ░░░░░   │        PAUSED         │   ░░░░░░ │
/// │ ░░░░░   │  P resume · Esc menu  │   ░░░░░░ │
/// │ ░░░░░   └───────────────────────┘   ░░░░░░ │
/// └─────────────────────────────────────────────┘
/// ```
pub(super) fn setup_pause_menu(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.60)),
            ZIndex(200),
            PauseMenuRoot,
        ))
        .with_children(|overlay| {
            overlay
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(36.0)),
                        row_gap: Val::Px(14.0),
                        border: UiRect::all(Val::Px(2.0)),
                        min_width: Val::Px(280.0),
                        ..default()
                    },
                    BackgroundColor(card_bg()),
                    BorderColor::all(card_border()),
                ))
                .with_children(|card| {
                    card.spawn(label("PAUSED", 38.0, title_color()));
                    card.spawn(label("P resume  ·  Esc menu", 14.0, subtitle_color()));
                });
        });
}
