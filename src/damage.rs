//! Stepped damage → performance debuff lookup.

use crate::constants::{DEBUFF_FACTORS, DEBUFF_THRESHOLDS, MAX_DAMAGE};
use crate::error::{validate_unit_interval, RaceError, RaceResult};
use bevy::prelude::Resource;

/// Maps accumulated damage to a multiplier applied to thrust, max speed and
/// turn rate alike.
///
/// Damage below the first threshold costs nothing; from `thresholds[i]` up to
/// the next threshold the factor is `factors[i]`.  The last factor applies to
/// everything above the last threshold.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DebuffTable {
    thresholds: Vec<f32>,
    factors: Vec<f32>,
}

impl DebuffTable {
    /// Build a table, rejecting unsorted thresholds or factors outside (0, 1].
    pub fn new(thresholds: Vec<f32>, factors: Vec<f32>) -> RaceResult<Self> {
        if thresholds.len() != factors.len() {
            return Err(RaceError::InvalidConfig {
                name: "debuff_thresholds/debuff_factors".to_string(),
                expected: "two lists of equal length",
            });
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RaceError::InvalidConfig {
                name: "debuff_thresholds".to_string(),
                expected: "strictly ascending values",
            });
        }
        for (i, factor) in factors.iter().enumerate() {
            validate_unit_interval(&format!("debuff_factors[{i}]"), *factor)?;
        }
        Ok(Self {
            thresholds,
            factors,
        })
    }

    /// Multiplier for the given damage level.
    pub fn factor(&self, damage: f32) -> f32 {
        self.thresholds
            .iter()
            .zip(&self.factors)
            .take_while(|(threshold, _)| damage >= **threshold)
            .last()
            .map_or(1.0, |(_, factor)| *factor)
    }
}

impl Default for DebuffTable {
    fn default() -> Self {
        Self {
            thresholds: DEBUFF_THRESHOLDS.to_vec(),
            factors: DEBUFF_FACTORS.to_vec(),
        }
    }
}

/// Add `amount` to `damage`, capped at [`MAX_DAMAGE`].
#[inline]
pub fn accrue(damage: f32, amount: f32) -> f32 {
    (damage + amount).min(MAX_DAMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undamaged_car_has_no_penalty() {
        let table = DebuffTable::default();
        assert_eq!(table.factor(0.0), 1.0);
        assert_eq!(table.factor(4.99), 1.0);
    }

    #[test]
    fn factor_steps_at_each_threshold() {
        let table = DebuffTable::default();
        assert_eq!(table.factor(5.0), 0.99);
        assert_eq!(table.factor(9.9), 0.99);
        assert_eq!(table.factor(10.0), 0.98);
        assert_eq!(table.factor(19.0), 0.97);
        assert_eq!(table.factor(24.0), 0.96);
        assert_eq!(table.factor(25.0), 0.95);
        assert_eq!(table.factor(100.0), 0.95);
    }

    #[test]
    fn empty_table_never_penalises() {
        let table = DebuffTable::new(Vec::new(), Vec::new()).unwrap();
        assert_eq!(table.factor(100.0), 1.0);
    }

    #[test]
    fn unsorted_thresholds_are_rejected() {
        assert!(DebuffTable::new(vec![10.0, 5.0], vec![0.9, 0.8]).is_err());
    }

    #[test]
    fn accrue_caps_at_max() {
        assert_eq!(accrue(99.95, 0.101), MAX_DAMAGE);
        assert!((accrue(1.0, 0.5) - 1.5).abs() < 1e-6);
    }
}
