//! Camera, bitmap assets and sprite placement.
//!
//! The simulation works in screen pixels (+Y down, origin top-left); Bevy's
//! 2D camera is centred with +Y up.  [`screen_to_world`] is the only place the
//! two meet.
//!
//! Both bitmaps are decoded synchronously at startup because their alpha
//! channels become collision masks before the first tick.  A missing or
//! undecodable file is replaced by a placeholder shape and a warning.

use crate::config::RaceConfig;
use crate::constants::{PLACEHOLDER_CAR_HEIGHT, PLACEHOLDER_CAR_WIDTH, PLACEHOLDER_TRACK_BORDER};
use crate::error::{RaceError, RaceResult};
use crate::mask::{CollisionMask, ALPHA_THRESHOLD};
use crate::race::Car;
use crate::track::Track;
use bevy::asset::RenderAssetUsages;
use bevy::image::{CompressedImageFormats, ImageSampler, ImageType};
use bevy::prelude::*;
use bevy::render::render_resource::TextureFormat;
use std::path::Path;
use std::sync::Arc;

pub const CAR_IMAGE_PATH: &str = "assets/car.png";
pub const TRACK_IMAGE_PATH: &str = "assets/track.png";

/// Edge length of one square of the chequered start/finish line.
const CHECKER_SIZE: f32 = 10.0;

/// Decoded car sprite shared by every car.
#[derive(Resource, Debug, Clone)]
pub struct RaceAssets {
    /// `None` when the placeholder rectangle is in use.
    pub car_image: Option<Handle<Image>>,
    /// Unrotated car mask; every car rotates its own copy.
    pub car_mask: Arc<CollisionMask>,
}

/// Marker for the track background and start line sprites.
#[derive(Component)]
pub struct TrackSprite;

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Screen pixel (+Y down, origin top-left) to world units (+Y up, centred).
#[inline]
pub fn screen_to_world(screen: Vec2, display: Vec2) -> Vec2 {
    Vec2::new(screen.x - display.x / 2.0, display.y / 2.0 - screen.y)
}

/// Read and decode a PNG.
pub fn load_bitmap(path: impl AsRef<Path>) -> RaceResult<Image> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| RaceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Image::from_buffer(
        &bytes,
        ImageType::Extension("png"),
        CompressedImageFormats::NONE,
        true,
        ImageSampler::Default,
        RenderAssetUsages::default(),
    )
    .map_err(|e| RaceError::AssetDecode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Solid wherever the image's alpha is above [`ALPHA_THRESHOLD`].
///
/// Decoded PNGs are RGBA8, so the pixel buffer is read directly; other
/// formats go through per-pixel colour lookup.
pub fn mask_from_image(image: &Image) -> CollisionMask {
    let (width, height) = (image.width(), image.height());
    let rgba8 = matches!(
        image.texture_descriptor.format,
        TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb
    );
    if rgba8 {
        if let Some(mask) = image
            .data
            .as_deref()
            .and_then(|data| CollisionMask::from_rgba8(width, height, data))
        {
            return mask;
        }
    }

    let threshold = f32::from(ALPHA_THRESHOLD) / 255.0;
    let mut mask = CollisionMask::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let solid = image
                .get_color_at(x, y)
                .is_ok_and(|color| color.alpha() > threshold);
            if solid {
                mask.set(x, y, true);
            }
        }
    }
    mask
}

/// Startup system: decode both bitmaps, build the [`Track`] and
/// [`RaceAssets`] resources and spawn the static track sprites.
pub fn setup_race_assets(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    config: Res<RaceConfig>,
) {
    let display = config.display_size();

    let track = match load_bitmap(TRACK_IMAGE_PATH) {
        Ok(image) => {
            let walls = mask_from_image(&image).scaled(config.display_width, config.display_height);
            commands.spawn((
                Sprite {
                    image: images.add(image),
                    custom_size: Some(display),
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 0.0),
                TrackSprite,
            ));
            Track::with_reference_layout(walls)
        }
        Err(e) => {
            warn!("{e}; drawing placeholder track");
            spawn_placeholder_walls(&mut commands, display);
            Track::placeholder(config.display_width, config.display_height)
        }
    };

    let assets = match load_bitmap(CAR_IMAGE_PATH) {
        Ok(image) => {
            let car_mask = Arc::new(mask_from_image(&image));
            RaceAssets {
                car_image: Some(images.add(image)),
                car_mask,
            }
        }
        Err(e) => {
            warn!("{e}; using placeholder car");
            RaceAssets {
                car_image: None,
                car_mask: Arc::new(CollisionMask::filled(
                    PLACEHOLDER_CAR_WIDTH,
                    PLACEHOLDER_CAR_HEIGHT,
                )),
            }
        }
    };

    spawn_start_line(&mut commands, &track, display);
    info!(
        "Track ready: {} waypoints, car mask {}x{}",
        track.waypoints().len(),
        assets.car_mask.width(),
        assets.car_mask.height()
    );
    commands.insert_resource(track);
    commands.insert_resource(assets);
}

fn spawn_placeholder_walls(commands: &mut Commands, display: Vec2) {
    let t = PLACEHOLDER_TRACK_BORDER as f32;
    let wall = Color::srgb(0.35, 0.35, 0.38);
    let bands = [
        (Vec2::new(display.x / 2.0, t / 2.0), Vec2::new(display.x, t)),
        (Vec2::new(display.x / 2.0, display.y - t / 2.0), Vec2::new(display.x, t)),
        (Vec2::new(t / 2.0, display.y / 2.0), Vec2::new(t, display.y)),
        (Vec2::new(display.x - t / 2.0, display.y / 2.0), Vec2::new(t, display.y)),
    ];
    for (centre, size) in bands {
        commands.spawn((
            Sprite::from_color(wall, size),
            Transform::from_translation(screen_to_world(centre, display).extend(0.0)),
            TrackSprite,
        ));
    }
}

/// Chequered squares filling the start/finish zone.
fn spawn_start_line(commands: &mut Commands, track: &Track, display: Vec2) {
    let zone = track.start_zone();
    let cols = (zone.width() / CHECKER_SIZE).ceil() as u32;
    let rows = (zone.height() / CHECKER_SIZE).ceil() as u32;
    for row in 0..rows {
        for col in 0..cols {
            let color = if (row + col) % 2 == 0 {
                Color::WHITE
            } else {
                Color::BLACK
            };
            let corner = zone.min + Vec2::new(col as f32, row as f32) * CHECKER_SIZE;
            let size = (zone.max - corner).min(Vec2::splat(CHECKER_SIZE));
            let centre = corner + size / 2.0;
            commands.spawn((
                Sprite::from_color(color, size),
                Transform::from_translation(screen_to_world(centre, display).extend(0.5)),
                TrackSprite,
            ));
        }
    }
}

/// Sprite bundle for a freshly spawned car.
pub fn car_sprite(assets: &RaceAssets, livery: Color) -> Sprite {
    match &assets.car_image {
        Some(image) => Sprite {
            image: image.clone(),
            color: livery,
            ..default()
        },
        None => Sprite::from_color(
            livery,
            Vec2::new(PLACEHOLDER_CAR_WIDTH as f32, PLACEHOLDER_CAR_HEIGHT as f32),
        ),
    }
}

/// Mirror every car's position and heading into its transform.
pub fn sync_car_sprites(config: Res<RaceConfig>, mut cars: Query<(&Car, &mut Transform)>) {
    let display = config.display_size();
    for (car, mut transform) in cars.iter_mut() {
        let world = screen_to_world(car.vehicle.position, display);
        transform.translation = world.extend(1.0 + car.slot as f32 * 0.01);
        transform.rotation = Quat::from_rotation_z(car.vehicle.heading.to_radians());
    }
}
