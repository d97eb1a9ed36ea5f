//! Metronome configuration, loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sound::Sound;
use crate::tempo::TempoRange;

/// Startup settings for a `Metronome`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetronomeConfig {
    /// Inclusive supported tempo range. `min` is the tempo the baseline
    /// assets were recorded at.
    pub tempo_range: TempoRange,
    pub default_tempo: u32,
    pub default_sound: Sound,
}

impl Default for MetronomeConfig {
    fn default() -> Self {
        MetronomeConfig {
            tempo_range: TempoRange::default(),
            default_tempo: 100,
            default_sound: Sound::default(),
        }
    }
}

impl MetronomeConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MetronomeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let range = self.tempo_range;
        if range.min == 0 {
            return Err(Error::InvalidConfig("tempo range minimum must be at least 1".into()));
        }
        if range.min > range.max {
            return Err(Error::InvalidConfig(format!(
                "tempo range {}..={} is empty",
                range.min, range.max
            )));
        }
        if !range.contains(self.default_tempo) {
            return Err(Error::InvalidConfig(format!(
                "default tempo {} is outside {}..={}",
                self.default_tempo, range.min, range.max
            )));
        }
        Ok(())
    }
}
