//! Race-specific error types.
//!
//! Nothing in the race loop is fatal: every error here is produced at startup
//! (config or asset loading) and handled by falling back to compiled defaults
//! or placeholder shapes.  Loaders return these types so the fallback decision
//! stays with the caller.
//!
//! ## Usage
//!
//! ```rust
//! use sprint::error::{validate_unit_interval, RaceResult};
//!
//! fn check(drag: f32) -> RaceResult<()> {
//!     validate_unit_interval("player.drag", drag)?;
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Top-level error enum for the racing game.
#[derive(Debug)]
pub enum RaceError {
    /// An asset or config file could not be read from disk.
    Io {
        /// Path that was being read.
        path: String,
        source: std::io::Error,
    },

    /// A bitmap was read but could not be decoded into pixels.
    AssetDecode {
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// The TOML config file is malformed or has wrongly typed keys.
    ConfigParse { path: String, source: toml::de::Error },

    /// A config value is outside the range the simulation can work with.
    InvalidConfig {
        /// Dotted name of the offending key.
        name: String,
        /// Human-readable description of what was expected.
        expected: &'static str,
    },
}

impl fmt::Display for RaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceError::Io { path, source } => write!(f, "failed to read '{}': {}", path, source),
            RaceError::AssetDecode { path, reason } => {
                write!(f, "failed to decode image '{}': {}", path, reason)
            }
            RaceError::ConfigParse { path, source } => {
                write!(f, "failed to parse '{}': {}", path, source)
            }
            RaceError::InvalidConfig { name, expected } => {
                write!(f, "config value '{}' is invalid: expected {}", name, expected)
            }
        }
    }
}

impl std::error::Error for RaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RaceError::Io { source, .. } => Some(source),
            RaceError::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias: a `Result` using `RaceError` as the error type.
pub type RaceResult<T> = Result<T, RaceError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is strictly positive and finite.
pub fn validate_positive(name: &str, value: f32) -> RaceResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RaceError::InvalidConfig {
            name: name.to_string(),
            expected: "a finite value > 0",
        })
    }
}

/// Returns an error unless `value` is zero or positive and finite.
pub fn validate_non_negative(name: &str, value: f32) -> RaceResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RaceError::InvalidConfig {
            name: name.to_string(),
            expected: "a finite value >= 0",
        })
    }
}

/// Returns an error unless `value` lies in `(0.0, 1.0]`.
///
/// Used for drag (a drag of exactly 1.0 means no slowdown, anything above
/// makes cars accelerate on their own) and debuff factors.
pub fn validate_unit_interval(name: &str, value: f32) -> RaceResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(RaceError::InvalidConfig {
            name: name.to_string(),
            expected: "a value in (0.0, 1.0]",
        })
    }
}

/// Returns an error unless `value` lies in `[0.0, 1.0)`.
pub fn validate_fraction(name: &str, value: f32) -> RaceResult<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(RaceError::InvalidConfig {
            name: name.to_string(),
            expected: "a value in [0.0, 1.0)",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_interval_rejects_zero_and_above_one() {
        assert!(validate_unit_interval("drag", 0.0).is_err());
        assert!(validate_unit_interval("drag", 1.01).is_err());
        assert!(validate_unit_interval("drag", 1.0).is_ok());
        assert!(validate_unit_interval("drag", 0.991).is_ok());
    }

    #[test]
    fn positive_rejects_nan() {
        assert!(validate_positive("thrust", f32::NAN).is_err());
        assert!(validate_positive("thrust", -1.0).is_err());
        assert!(validate_positive("thrust", 0.12).is_ok());
    }

    #[test]
    fn non_negative_accepts_zero_only_at_the_bound() {
        assert!(validate_non_negative("wall_damage_per_tick", 0.0).is_ok());
        assert!(validate_non_negative("wall_damage_per_tick", 0.1).is_ok());
        assert!(validate_non_negative("wall_damage_per_tick", -0.1).is_err());
        assert!(validate_non_negative("wall_damage_per_tick", f32::INFINITY).is_err());
    }

    #[test]
    fn invalid_config_message_names_the_key() {
        let err = validate_fraction("player.randomness", 1.5).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("player.randomness"), "got: {msg}");
    }
}
