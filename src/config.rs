//! Runtime race configuration loaded from `assets/race.toml`.
//!
//! [`RaceConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  `main` reads `assets/race.toml` before the app is
//! built (the window size comes from it) and overwrites the defaults with any
//! values present in the file.  Missing keys fall back to the compile-time
//! defaults, so a minimal TOML can override just the values you care about.
//!
//! The config is immutable once a session starts: systems only ever take
//! `Res<RaceConfig>`.
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/race.toml`.
//! 2. Restart the game; no recompilation required.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `RaceConfig::default()`.

use crate::constants::*;
use crate::damage::DebuffTable;
use crate::error::{
    validate_fraction, validate_non_negative, validate_positive, validate_unit_interval, RaceError,
    RaceResult,
};
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/race.toml";

/// Physics tuning for one car.
///
/// Every value is perturbed by `± randomness` once at race start (see
/// [`crate::vehicle::Vehicle::spawn`]) and then stays fixed for the race.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarTuning {
    pub thrust: f32,
    pub drag: f32,
    pub max_speed: f32,
    pub base_turn_rate: f32,
    pub turn_speed_factor: f32,
    pub steer_response: f32,
    pub grip_factor: f32,
    pub randomness: f32,
}

impl CarTuning {
    /// Compiled defaults for the human car.
    pub fn player() -> Self {
        Self {
            thrust: PLAYER_THRUST,
            drag: PLAYER_DRAG,
            max_speed: PLAYER_MAX_SPEED,
            base_turn_rate: PLAYER_BASE_TURN_RATE,
            turn_speed_factor: PLAYER_TURN_SPEED_FACTOR,
            steer_response: PLAYER_STEER_RESPONSE,
            grip_factor: PLAYER_GRIP_FACTOR,
            randomness: PLAYER_RANDOMNESS,
        }
    }

    /// Compiled defaults for AI slot `slot` (0-based).
    pub fn ai(slot: usize) -> Self {
        Self {
            thrust: AI_THRUST,
            drag: AI_DRAGS[slot.min(MAX_AI_CARS - 1)],
            max_speed: AI_MAX_SPEED,
            base_turn_rate: AI_BASE_TURN_RATE,
            turn_speed_factor: AI_TURN_SPEED_FACTOR,
            steer_response: AI_STEER_RESPONSE,
            grip_factor: AI_GRIP_FACTOR,
            randomness: AI_RANDOMNESS,
        }
    }

    fn validate(&self, prefix: &str) -> RaceResult<()> {
        validate_positive(&format!("{prefix}.thrust"), self.thrust)?;
        validate_unit_interval(&format!("{prefix}.drag"), self.drag)?;
        validate_positive(&format!("{prefix}.max_speed"), self.max_speed)?;
        validate_positive(&format!("{prefix}.base_turn_rate"), self.base_turn_rate)?;
        if self.turn_speed_factor < 0.0 {
            return Err(RaceError::InvalidConfig {
                name: format!("{prefix}.turn_speed_factor"),
                expected: "a value >= 0",
            });
        }
        validate_unit_interval(&format!("{prefix}.steer_response"), self.steer_response)?;
        validate_positive(&format!("{prefix}.grip_factor"), self.grip_factor)?;
        validate_fraction(&format!("{prefix}.randomness"), self.randomness)
    }
}

impl Default for CarTuning {
    fn default() -> Self {
        Self::player()
    }
}

/// Runtime-tunable race configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/race.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    // ── Display ──────────────────────────────────────────────────────────────
    pub display_width: u32,
    pub display_height: u32,
    pub fullscreen: bool,

    // ── Damage ───────────────────────────────────────────────────────────────
    pub damage_enabled: bool,
    pub wall_damage_per_tick: f32,
    pub car_collision_damage: f32,
    pub debuff_thresholds: Vec<f32>,
    pub debuff_factors: Vec<f32>,

    // ── Healing ──────────────────────────────────────────────────────────────
    pub healing_enabled: bool,
    pub damage_recovery_per_tick: f32,
    pub clean_lap_bonus_recovery: f32,

    // ── Cars ─────────────────────────────────────────────────────────────────
    pub player: CarTuning,
    /// One entry per AI slot; slots beyond the list reuse the compiled default.
    pub ai: Vec<CarTuning>,
    pub ai_names: Vec<String>,
    pub player_name: String,

    // ── Vehicle dynamics ─────────────────────────────────────────────────────
    pub low_speed_threshold: f32,
    pub align_strength: f32,

    // ── AI behaviour ─────────────────────────────────────────────────────────
    pub waypoint_capture_radius: f32,
    pub ai_steering_rate: f32,
    pub ai_line_offset_range: f32,
    pub ai_avoid_radius: f32,
    pub ai_avoid_strength: f32,
    /// Clamp on the summed avoidance steer per tick.  `None` keeps the
    /// classic unbounded behaviour, which can make packs of AI cars twitchy.
    pub ai_max_avoidance_per_tick: Option<f32>,
    pub ai_ray_lookahead: f32,
    pub ai_ray_step: f32,
    pub ai_ray_spread: f32,
    pub ai_wall_steer_strength: f32,
    pub ai_brake_strength: f32,
    pub ai_overspeed_ratio: f32,
    pub ai_underspeed_ratio: f32,

    // ── Collision response ───────────────────────────────────────────────────
    pub wall_speed_limit: f32,
    pub speed_limit_recovery: f32,
    pub grip_loss_per_tick: f32,
    pub min_grip: f32,
    pub grip_recovery: f32,
    pub car_diameter: f32,
    pub car_bounciness: f32,
    pub car_contact_speed_penalty: f32,
    pub car_contact_speed_floor: f32,

    // ── Session ──────────────────────────────────────────────────────────────
    pub countdown_ms: u64,
    pub default_race_laps: u32,
    pub lap_step: u32,
    pub min_race_laps: u32,
    pub default_ai_count: usize,

    // ── HUD ──────────────────────────────────────────────────────────────────
    pub hud_font_size: f32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            // Display
            display_width: DISPLAY_WIDTH,
            display_height: DISPLAY_HEIGHT,
            fullscreen: false,
            // Damage
            damage_enabled: DAMAGE_ENABLED,
            wall_damage_per_tick: WALL_DAMAGE_PER_TICK,
            car_collision_damage: CAR_COLLISION_DAMAGE,
            debuff_thresholds: DEBUFF_THRESHOLDS.to_vec(),
            debuff_factors: DEBUFF_FACTORS.to_vec(),
            // Healing
            healing_enabled: HEALING_ENABLED,
            damage_recovery_per_tick: DAMAGE_RECOVERY_PER_TICK,
            clean_lap_bonus_recovery: CLEAN_LAP_BONUS_RECOVERY,
            // Cars
            player: CarTuning::player(),
            ai: (0..MAX_AI_CARS).map(CarTuning::ai).collect(),
            ai_names: ["Davo", "Leo", "Ekky", "Nuge", "Podz", "Nursey", "Kappy"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            player_name: "Marlowe".to_string(),
            // Vehicle dynamics
            low_speed_threshold: LOW_SPEED_THRESHOLD,
            align_strength: ALIGN_STRENGTH,
            // AI behaviour
            waypoint_capture_radius: WAYPOINT_CAPTURE_RADIUS,
            ai_steering_rate: AI_STEERING_RATE,
            ai_line_offset_range: AI_LINE_OFFSET_RANGE,
            ai_avoid_radius: AI_AVOID_RADIUS,
            ai_avoid_strength: AI_AVOID_STRENGTH,
            ai_max_avoidance_per_tick: None,
            ai_ray_lookahead: AI_RAY_LOOKAHEAD,
            ai_ray_step: AI_RAY_STEP,
            ai_ray_spread: AI_RAY_SPREAD,
            ai_wall_steer_strength: AI_WALL_STEER_STRENGTH,
            ai_brake_strength: AI_BRAKE_STRENGTH,
            ai_overspeed_ratio: AI_OVERSPEED_RATIO,
            ai_underspeed_ratio: AI_UNDERSPEED_RATIO,
            // Collision response
            wall_speed_limit: WALL_SPEED_LIMIT,
            speed_limit_recovery: SPEED_LIMIT_RECOVERY,
            grip_loss_per_tick: GRIP_LOSS_PER_TICK,
            min_grip: MIN_GRIP,
            grip_recovery: GRIP_RECOVERY,
            car_diameter: CAR_DIAMETER,
            car_bounciness: CAR_BOUNCINESS,
            car_contact_speed_penalty: CAR_CONTACT_SPEED_PENALTY,
            car_contact_speed_floor: CAR_CONTACT_SPEED_FLOOR,
            // Session
            countdown_ms: COUNTDOWN_MS,
            default_race_laps: DEFAULT_RACE_LAPS,
            lap_step: LAP_STEP,
            min_race_laps: MIN_RACE_LAPS,
            default_ai_count: DEFAULT_AI_COUNT,
            // HUD
            hud_font_size: HUD_FONT_SIZE,
        }
    }
}

impl RaceConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> RaceResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| RaceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|err| match err {
            RaceError::ConfigParse { source, .. } => RaceError::ConfigParse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate config text.  Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> RaceResult<Self> {
        let config: Self = toml::from_str(contents).map_err(|source| RaceError::ConfigParse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, falling back to compiled defaults.
    ///
    /// A missing file is not an error.  A malformed or invalid file is
    /// reported through the returned [`ConfigSource`] so it can be logged
    /// once logging is up.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, ConfigSource) {
        let path = path.as_ref();
        if !path.exists() {
            return (Self::default(), ConfigSource::Defaults);
        }
        match Self::load(path) {
            Ok(config) => (config, ConfigSource::File(path.display().to_string())),
            Err(e) => (Self::default(), ConfigSource::Rejected(e.to_string())),
        }
    }

    /// Check every value the simulation divides by, clamps with, or indexes.
    pub fn validate(&self) -> RaceResult<()> {
        if self.display_width == 0 || self.display_height == 0 {
            return Err(RaceError::InvalidConfig {
                name: "display_width/display_height".to_string(),
                expected: "non-zero dimensions",
            });
        }
        self.player.validate("player")?;
        for (i, tuning) in self.ai.iter().enumerate() {
            tuning.validate(&format!("ai[{i}]"))?;
        }
        self.debuff_table()?;
        validate_positive("waypoint_capture_radius", self.waypoint_capture_radius)?;
        validate_positive("ai_avoid_radius", self.ai_avoid_radius)?;
        validate_positive("ai_ray_lookahead", self.ai_ray_lookahead)?;
        validate_positive("ai_ray_step", self.ai_ray_step)?;
        validate_positive("car_diameter", self.car_diameter)?;
        for (name, value) in [
            ("wall_damage_per_tick", self.wall_damage_per_tick),
            ("car_collision_damage", self.car_collision_damage),
            ("damage_recovery_per_tick", self.damage_recovery_per_tick),
            ("speed_limit_recovery", self.speed_limit_recovery),
            ("grip_loss_per_tick", self.grip_loss_per_tick),
            ("grip_recovery", self.grip_recovery),
            ("car_contact_speed_penalty", self.car_contact_speed_penalty),
        ] {
            validate_non_negative(name, value)?;
        }
        if let Some(max) = self.ai_max_avoidance_per_tick {
            validate_positive("ai_max_avoidance_per_tick", max)?;
        }
        if !(0.1..=1.0).contains(&self.wall_speed_limit) {
            return Err(RaceError::InvalidConfig {
                name: "wall_speed_limit".to_string(),
                expected: "a value in [0.1, 1.0]",
            });
        }
        if !(self.wall_speed_limit..=1.0).contains(&self.car_contact_speed_floor) {
            return Err(RaceError::InvalidConfig {
                name: "car_contact_speed_floor".to_string(),
                expected: "a value in [wall_speed_limit, 1.0]",
            });
        }
        if !(0.3..=1.0).contains(&self.min_grip) {
            return Err(RaceError::InvalidConfig {
                name: "min_grip".to_string(),
                expected: "a value in [0.3, 1.0]",
            });
        }
        if self.lap_step == 0 || self.min_race_laps == 0 {
            return Err(RaceError::InvalidConfig {
                name: "lap_step/min_race_laps".to_string(),
                expected: "values >= 1",
            });
        }
        Ok(())
    }

    /// Build the damage→debuff lookup from the two parallel lists.
    pub fn debuff_table(&self) -> RaceResult<DebuffTable> {
        DebuffTable::new(self.debuff_thresholds.clone(), self.debuff_factors.clone())
    }

    /// Tuning for AI slot `slot`, falling back to the compiled default.
    pub fn ai_tuning(&self, slot: usize) -> CarTuning {
        self.ai.get(slot).copied().unwrap_or_else(|| CarTuning::ai(slot))
    }

    /// Display name for AI slot `slot`.
    pub fn ai_name(&self, slot: usize) -> String {
        self.ai_names
            .get(slot)
            .cloned()
            .unwrap_or_else(|| format!("CPU {}", slot + 1))
    }

    /// Display size as floats.
    pub fn display_size(&self) -> Vec2 {
        Vec2::new(self.display_width as f32, self.display_height as f32)
    }
}

/// Where the active [`RaceConfig`] came from; logged once at startup.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No config file present; compiled defaults in use.
    Defaults,
    /// Loaded from the given path.
    File(String),
    /// A file was present but rejected; compiled defaults in use.
    Rejected(String),
}

/// Startup system: report which config is in effect.
pub fn log_config_source(source: Res<ConfigSource>, config: Res<RaceConfig>) {
    match source.as_ref() {
        ConfigSource::Defaults => {
            info!("No {CONFIG_PATH} found; using compiled defaults");
        }
        ConfigSource::File(path) => {
            info!(
                "Loaded race config from {path} (damage: {}, healing: {}, {} AI tunings)",
                config.damage_enabled,
                config.healing_enabled,
                config.ai.len()
            );
        }
        ConfigSource::Rejected(reason) => {
            warn!("{reason}; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(RaceConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_damage_and_recovery_rates_are_rejected() {
        let negative_wall_damage = RaceConfig {
            wall_damage_per_tick: -0.1,
            ..RaceConfig::default()
        };
        let err = negative_wall_damage.validate().unwrap_err();
        assert!(err.to_string().contains("wall_damage_per_tick"), "got: {err}");

        let negative_grip_loss = RaceConfig {
            grip_loss_per_tick: -0.05,
            ..RaceConfig::default()
        };
        assert!(negative_grip_loss.validate().is_err());

        let no_healing = RaceConfig {
            damage_recovery_per_tick: 0.0,
            car_collision_damage: 0.0,
            ..RaceConfig::default()
        };
        assert!(no_healing.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = RaceConfig::from_toml_str(
            r#"
            wall_damage_per_tick = 0.2
            healing_enabled = true

            [player]
            max_speed = 18.0
            "#,
        )
        .unwrap();

        assert!((config.wall_damage_per_tick - 0.2).abs() < 1e-6);
        assert!(config.healing_enabled);
        assert!((config.player.max_speed - 18.0).abs() < 1e-6);
        // Untouched player keys come from the player defaults.
        assert!((config.player.thrust - PLAYER_THRUST).abs() < 1e-6);
        assert_eq!(config.ai.len(), MAX_AI_CARS);
        assert_eq!(config.ai_max_avoidance_per_tick, None);
    }

    #[test]
    fn avoidance_clamp_is_optional() {
        let config = RaceConfig::from_toml_str("ai_max_avoidance_per_tick = 6.0").unwrap();
        assert_eq!(config.ai_max_avoidance_per_tick, Some(6.0));
    }

    #[test]
    fn mismatched_debuff_lists_are_rejected() {
        let result = RaceConfig::from_toml_str(
            r#"
            debuff_thresholds = [5.0, 10.0]
            debuff_factors = [0.9]
            "#,
        );
        assert!(matches!(result, Err(RaceError::InvalidConfig { .. })));
    }

    #[test]
    fn drag_above_one_is_rejected() {
        let result = RaceConfig::from_toml_str("[player]\ndrag = 1.2");
        assert!(matches!(result, Err(RaceError::InvalidConfig { .. })));
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let result = RaceConfig::from_toml_str("damage_enabled = \"yes\"");
        assert!(matches!(result, Err(RaceError::ConfigParse { .. })));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let (config, source) = RaceConfig::load_or_default("does/not/exist.toml");
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config.display_width, DISPLAY_WIDTH);
    }

    #[test]
    fn ai_slots_beyond_the_table_use_compiled_defaults() {
        let config = RaceConfig {
            ai: Vec::new(),
            ..Default::default()
        };
        assert_eq!(config.ai_tuning(3), CarTuning::ai(3));
        assert_eq!(config.ai_name(20), "CPU 21");
    }
}
