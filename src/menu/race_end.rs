use super::*;
use crate::race::{format_lap_time, standings};
use crate::track::Track;

/// Spawn the results table: position, driver, best lap and average lap, each
/// row in the driver's livery.
pub(super) fn setup_race_end(
    mut commands: Commands,
    cars: Query<&Car>,
    track: Res<Track>,
    session: Res<RaceSession>,
) {
    let order = standings(cars.iter(), &track);
    let headline = match &session.winner {
        Some(name) => format!("{name} wins!"),
        None => "Race over".to_string(),
    };

    commands
        .spawn((
            fullscreen_column(),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            ZIndex(200),
            RaceEndRoot,
        ))
        .with_children(|root| {
            root.spawn(label(headline, 48.0, title_color()));
            spacer(root, 28.0);
            root.spawn(label(
                format!("{:>3}  {:<10} {:>10} {:>10}", "Pos", "Driver", "Best", "Average"),
                20.0,
                subtitle_color(),
            ));
            spacer(root, 6.0);
            for (i, car) in order.iter().enumerate() {
                let timer = &car.vehicle.lap;
                root.spawn(label(
                    format!(
                        "{:>3}  {:<10} {:>10} {:>10}",
                        i + 1,
                        car.name,
                        format_lap_time(timer.best_lap_ms),
                        format_lap_time(timer.average_lap_ms()),
                    ),
                    20.0,
                    car.livery,
                ));
            }
            spacer(root, 28.0);
            root.spawn(label("Enter to continue", 14.0, hint_color()));
        });
}
