//! Centralised racing and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::RaceConfig::default`] is built from these values; a
//! `assets/race.toml` file can override any subset at startup.
//!
//! ## Units
//!
//! The simulation advances one fixed tick at a time (60 Hz), so every speed is
//! in **pixels per tick** and every rate in **units per tick**.  Positions are
//! screen pixels with +Y pointing down; headings are degrees with 0 facing +X
//! and positive angles turning counter-clockwise on screen.

// ── Timing ────────────────────────────────────────────────────────────────────

/// Fixed simulation rate.  All per-tick constants below assume this value.
pub const TICK_HZ: f64 = 60.0;

/// Length of the pre-race countdown ("Ready", "Set", "Go").
pub const COUNTDOWN_MS: u64 = 3000;

// ── Display ───────────────────────────────────────────────────────────────────

/// Reference resolution the track layout (waypoints, start line, grid) is
/// authored in.  Everything is scaled to the actual display size at startup.
pub const REFERENCE_WIDTH: f32 = 1920.0;
pub const REFERENCE_HEIGHT: f32 = 1080.0;

/// Default window size (matches the reference resolution).
pub const DISPLAY_WIDTH: u32 = 1920;
pub const DISPLAY_HEIGHT: u32 = 1080;

// ── Damage ────────────────────────────────────────────────────────────────────

/// Master switch for damage accrual and debuffs.
pub const DAMAGE_ENABLED: bool = true;

/// Damage added every tick a car's mask overlaps the wall mask.
///
/// At 60 Hz, 0.101 ≈ 6 damage per second of wall contact.
pub const WALL_DAMAGE_PER_TICK: f32 = 0.101;

/// Damage added to both cars for every tick their masks overlap.
pub const CAR_COLLISION_DAMAGE: f32 = 0.101;

/// Hard ceiling on accumulated damage.
pub const MAX_DAMAGE: f32 = 100.0;

/// Damage levels at which the next debuff step kicks in (ascending).
pub const DEBUFF_THRESHOLDS: [f32; 5] = [5.0, 10.0, 15.0, 20.0, 25.0];

/// Multiplier applied to thrust, max speed and turn rate once damage reaches
/// the matching entry of [`DEBUFF_THRESHOLDS`].
pub const DEBUFF_FACTORS: [f32; 5] = [0.99, 0.98, 0.97, 0.96, 0.95];

// ── Healing ───────────────────────────────────────────────────────────────────

/// Master switch for passive damage decay and the clean-lap bonus.
pub const HEALING_ENABLED: bool = false;

/// Passive damage recovery per tick while healing is enabled.
pub const DAMAGE_RECOVERY_PER_TICK: f32 = 0.1;

/// Damage removed when a lap is completed without taking any damage.
pub const CLEAN_LAP_BONUS_RECOVERY: f32 = 10.0;

// ── Player tuning ─────────────────────────────────────────────────────────────

pub const PLAYER_THRUST: f32 = 0.12;
/// Velocity retained per tick (0.97–0.995 feels right).
pub const PLAYER_DRAG: f32 = 0.991;
pub const PLAYER_MAX_SPEED: f32 = 21.0;
/// Degrees per tick at full lock and zero speed.
pub const PLAYER_BASE_TURN_RATE: f32 = 5.0;
/// How strongly speed reduces turning; lower keeps high-speed turns sharp.
pub const PLAYER_TURN_SPEED_FACTOR: f32 = 0.08;
/// Fraction of the remaining steering error closed each tick (0.2–0.6).
pub const PLAYER_STEER_RESPONSE: f32 = 0.4;
pub const PLAYER_GRIP_FACTOR: f32 = 1.5;
/// ± fraction applied to every tuning value at race start.
pub const PLAYER_RANDOMNESS: f32 = 0.003;

// ── AI tuning (defaults for every AI slot) ────────────────────────────────────

pub const AI_THRUST: f32 = 0.12;
pub const AI_DRAGS: [f32; MAX_AI_CARS] = [0.993, 0.993, 0.992, 0.992, 0.991, 0.991, 0.991];
pub const AI_MAX_SPEED: f32 = 22.5;
pub const AI_BASE_TURN_RATE: f32 = 4.0;
pub const AI_TURN_SPEED_FACTOR: f32 = 0.1;
pub const AI_STEER_RESPONSE: f32 = 0.4;
pub const AI_GRIP_FACTOR: f32 = 1.5;
pub const AI_RANDOMNESS: f32 = 0.003;

/// Number of AI slots the grid and the tuning table provide.
pub const MAX_AI_CARS: usize = 7;

// ── Vehicle dynamics ──────────────────────────────────────────────────────────

/// Below this speed the velocity is snapped onto the heading (no sliding).
pub const LOW_SPEED_THRESHOLD: f32 = 2.0;

/// Fraction of the velocity/heading misalignment removed per tick above
/// [`LOW_SPEED_THRESHOLD`].
pub const ALIGN_STRENGTH: f32 = 0.05;

/// Placeholder car sprite size used when `car.png` is missing.
pub const PLACEHOLDER_CAR_WIDTH: u32 = 50;
pub const PLACEHOLDER_CAR_HEIGHT: u32 = 30;

/// Wall thickness of the placeholder track drawn when `track.png` is missing.
pub const PLACEHOLDER_TRACK_BORDER: u32 = 50;

// ── AI behaviour ──────────────────────────────────────────────────────────────

/// A waypoint counts as reached inside this radius (pixels).  Also the
/// distance over which the target speed blends into the next waypoint's.
pub const WAYPOINT_CAPTURE_RADIUS: f32 = 150.0;

/// Maximum heading change toward the waypoint bearing per tick (degrees).
pub const AI_STEERING_RATE: f32 = 2.5;

/// Half-range of the per-car horizontal racing-line offset (pixels).
pub const AI_LINE_OFFSET_RANGE: f32 = 20.0;

/// Other cars closer than this push the AI heading away (pixels).
pub const AI_AVOID_RADIUS: f32 = 80.0;

/// Degrees of avoidance steer at zero distance.
pub const AI_AVOID_STRENGTH: f32 = 4.0;

/// Wall-sensing ray length (pixels) and sampling step.
pub const AI_RAY_LOOKAHEAD: f32 = 60.0;
pub const AI_RAY_STEP: f32 = 1.0;

/// Angle of the two side rays relative to the heading (degrees).
pub const AI_RAY_SPREAD: f32 = 30.0;

/// Degrees of wall-avoidance steer when a side ray hits at zero distance.
pub const AI_WALL_STEER_STRENGTH: f32 = 3.0;

/// Braking impulse applied when more than [`AI_OVERSPEED_RATIO`] over target.
pub const AI_BRAKE_STRENGTH: f32 = 0.3;
pub const AI_OVERSPEED_RATIO: f32 = 1.1;
/// Below this fraction of the target speed the AI floors the throttle.
pub const AI_UNDERSPEED_RATIO: f32 = 0.9;

// ── Collision response ────────────────────────────────────────────────────────

/// `speed_limit` is set to this on wall contact and never drops below it.
pub const WALL_SPEED_LIMIT: f32 = 0.1;
/// Per-tick `speed_limit` recovery while clear of the wall.
pub const SPEED_LIMIT_RECOVERY: f32 = 0.02;

/// Grip lost per tick of wall contact and its floor.
pub const GRIP_LOSS_PER_TICK: f32 = 0.05;
pub const MIN_GRIP: f32 = 0.3;
/// Per-tick grip recovery while clear of the wall.
pub const GRIP_RECOVERY: f32 = 0.03;

/// Nominal car diameter used to measure car-to-car overlap depth (pixels).
pub const CAR_DIAMETER: f32 = 40.0;

/// Fraction of the relative normal velocity exchanged on car contact.
pub const CAR_BOUNCINESS: f32 = 0.8;

/// `speed_limit` lost per car contact and the floor it is clamped to.
pub const CAR_CONTACT_SPEED_PENALTY: f32 = 0.15;
pub const CAR_CONTACT_SPEED_FLOOR: f32 = 0.4;

// ── Session ───────────────────────────────────────────────────────────────────

/// Lap-count selector: starting value, step and minimum.
pub const DEFAULT_RACE_LAPS: u32 = 5;
pub const LAP_STEP: u32 = 5;
pub const MIN_RACE_LAPS: u32 = 5;

/// AI opponents selected by default.
pub const DEFAULT_AI_COUNT: usize = 3;

/// Heading every car starts the race with (facing -X, toward the line).
pub const GRID_HEADING: f32 = 180.0;

// ── HUD ───────────────────────────────────────────────────────────────────────

pub const HUD_FONT_SIZE: f32 = 20.0;
