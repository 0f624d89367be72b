use bevy::prelude::*;

pub(super) fn title_color() -> Color {
    Color::srgb(0.95, 0.88, 0.45)
}
pub(super) fn subtitle_color() -> Color {
    Color::srgb(0.55, 0.55, 0.65)
}
pub(super) fn hint_color() -> Color {
    Color::srgb(0.38, 0.38, 0.45)
}
pub(super) fn selected_color() -> Color {
    Color::srgb(0.2, 1.0, 0.3)
}
pub(super) fn option_color() -> Color {
    Color::WHITE
}
pub(super) fn card_bg() -> Color {
    Color::srgb(0.04, 0.04, 0.07)
}
pub(super) fn card_border() -> Color {
    Color::srgb(0.30, 0.30, 0.46)
}

pub(super) fn spacer(parent: &mut ChildSpawnerCommands<'_>, px: f32) {
    parent.spawn(Node {
        height: Val::Px(px),
        ..default()
    });
}

/// Plain text line in the default font.
pub(super) fn label(text: impl Into<String>, size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

/// Full-screen flex column centring its children.
pub(super) fn fullscreen_column() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        flex_direction: FlexDirection::Column,
        position_type: PositionType::Absolute,
        left: Val::Px(0.0),
        top: Val::Px(0.0),
        ..default()
    }
}

/// Despawn every entity tagged `T`.
pub(super) fn despawn_with<T: Component>(mut commands: Commands, roots: Query<Entity, With<T>>) {
    for entity in roots.iter() {
        commands.entity(entity).despawn();
    }
}
