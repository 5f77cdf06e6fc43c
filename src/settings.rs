//! Field size and speed, persisted as JSON.

use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FieldInt;

pub const WIDTH_RANGE: RangeInclusive<FieldInt> = 23..=200;
pub const HEIGHT_RANGE: RangeInclusive<FieldInt> = 13..=100;
pub const SPEED_RANGE: RangeInclusive<u8> = 1..=9;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not access settings file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("field width {0} is outside {min}..={max}", min = WIDTH_RANGE.start(), max = WIDTH_RANGE.end())]
    Width(FieldInt),
    #[error("field height {0} is outside {min}..={max}", min = HEIGHT_RANGE.start(), max = HEIGHT_RANGE.end())]
    Height(FieldInt),
    #[error("speed {0} is outside {min}..={max}", min = SPEED_RANGE.start(), max = SPEED_RANGE.end())]
    Speed(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Field width in cells
    pub width: FieldInt,
    /// Field height in cells
    pub height: FieldInt,
    /// 1 (slowest) to 9 (fastest)
    pub speed: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self { width: 40, height: 20, speed: 5 }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !WIDTH_RANGE.contains(&self.width) {
            return Err(SettingsError::Width(self.width));
        }
        if !HEIGHT_RANGE.contains(&self.height) {
            return Err(SettingsError::Height(self.height));
        }
        if !SPEED_RANGE.contains(&self.speed) {
            return Err(SettingsError::Speed(self.speed));
        }
        Ok(())
    }

    /// Time between two ticks: 20ms per step below the top speed of 10.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(20 * (10 - self.speed.min(9)) as u64)
    }

    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("no settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
