//! Player-adjustable tuning and preferences
//!
//! Persisted as JSON separately from the high score.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::consts::CRAFT_THRUST;
use crate::error::{SettingsError, StorageError};
use crate::persistence::KeyValueStore;

/// Accepted obstacle speed multipliers
pub const OBSTACLE_SPEED_RANGE: RangeInclusive<f32> = 0.1..=5.0;
/// Accepted craft thrust values (units per tick squared)
pub const CRAFT_THRUST_RANGE: RangeInclusive<f32> = 0.01..=1.0;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Multiplier on every obstacle's base speed
    pub obstacle_speed: f32,
    /// Craft acceleration per tick while thrusting
    pub craft_thrust: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            obstacle_speed: 1.0,
            craft_thrust: CRAFT_THRUST,
            master_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    pub const STORAGE_KEY: &'static str = "asteroid_shooter_settings";

    /// Parse a user-entered obstacle speed multiplier
    pub fn parse_obstacle_speed(input: &str) -> Result<f32, SettingsError> {
        parse_in_range("obstacle_speed", input, OBSTACLE_SPEED_RANGE)
    }

    /// Parse a user-entered craft thrust
    pub fn parse_craft_thrust(input: &str) -> Result<f32, SettingsError> {
        parse_in_range("craft_thrust", input, CRAFT_THRUST_RANGE)
    }

    /// Volume actually sent to the audio host
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Load from `store`, falling back to defaults on any failure
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings.sanitized()
                }
                Err(e) => {
                    log::warn!("Stored settings malformed ({}), using defaults", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Replace out-of-range tuning with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !OBSTACLE_SPEED_RANGE.contains(&self.obstacle_speed) {
            self.obstacle_speed = defaults.obstacle_speed;
        }
        if !CRAFT_THRUST_RANGE.contains(&self.craft_thrust) {
            self.craft_thrust = defaults.craft_thrust;
        }
        if !self.master_volume.is_finite() {
            self.master_volume = defaults.master_volume;
        }
        self
    }
}

fn parse_in_range(
    field: &'static str,
    input: &str,
    range: RangeInclusive<f32>,
) -> Result<f32, SettingsError> {
    let value: f32 = input
        .trim()
        .parse()
        .map_err(|_| SettingsError::NotANumber {
            field,
            input: input.to_string(),
        })?;
    // NaN fails `contains`
    if !range.contains(&value) {
        return Err(SettingsError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(value)
}
