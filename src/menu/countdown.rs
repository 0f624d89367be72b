use super::*;

/// Caption for `elapsed_ms` into a countdown lasting `total_ms`: the three
/// words split it evenly.
pub fn countdown_label(elapsed_ms: u64, total_ms: u64) -> &'static str {
    let third = (total_ms / 3).max(1);
    match elapsed_ms / third {
        0 => "Ready",
        1 => "Set",
        _ => "Go",
    }
}

pub(super) fn setup_countdown(
    mut commands: Commands,
    time: Res<Time<Real>>,
    config: Res<RaceConfig>,
    mut session: ResMut<RaceSession>,
) {
    let now = time.elapsed().as_millis() as u64;
    session.countdown_ends_ms = Some(now + config.countdown_ms);
    info!(
        "Race start: {} laps, {} AI, countdown {} ms",
        session.target_laps, session.ai_count, config.countdown_ms
    );

    commands
        .spawn((fullscreen_column(), ZIndex(150), CountdownRoot))
        .with_children(|root| {
            root.spawn((label("Ready", 96.0, title_color()), CountdownText));
        });
}

/// Update the caption and release the cars once the countdown has run out.
pub(super) fn countdown_system(
    time: Res<Time<Real>>,
    config: Res<RaceConfig>,
    session: Res<RaceSession>,
    mut captions: Query<&mut Text, With<CountdownText>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(ends) = session.countdown_ends_ms else {
        return;
    };
    let now = time.elapsed().as_millis() as u64;
    if now >= ends {
        next_state.set(GameState::Racing);
        return;
    }
    let elapsed = config.countdown_ms.saturating_sub(ends - now);
    let caption = countdown_label(elapsed, config.countdown_ms);
    for mut text in captions.iter_mut() {
        if text.0 != caption {
            text.0 = caption.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_words_one_second_each() {
        assert_eq!(countdown_label(0, 3000), "Ready");
        assert_eq!(countdown_label(999, 3000), "Ready");
        assert_eq!(countdown_label(1000, 3000), "Set");
        assert_eq!(countdown_label(2500, 3000), "Go");
    }
}
