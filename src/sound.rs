//! Built-in metronome sounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A selectable click sound. Each maps to one bundled `.aif` asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sound {
    #[default]
    Rimshot,
    BassDrum,
    Clap,
    Cowbell,
    HiHat,
    Hjonk,
    JackSlap,
    Laugh,
}

impl Sound {
    pub const ALL: [Sound; 8] = [
        Sound::Rimshot,
        Sound::BassDrum,
        Sound::Clap,
        Sound::Cowbell,
        Sound::HiHat,
        Sound::Hjonk,
        Sound::JackSlap,
        Sound::Laugh,
    ];

    /// Name shown in the picker. Also the asset's file stem.
    pub fn display_name(&self) -> &'static str {
        match self {
            Sound::Rimshot => "Rimshot",
            Sound::BassDrum => "Bass drum",
            Sound::Clap => "Clap",
            Sound::Cowbell => "Cowbell",
            Sound::HiHat => "Hi-hat",
            Sound::Hjonk => "Hjonk",
            Sound::JackSlap => "Jack slap",
            Sound::Laugh => "LAUGH!",
        }
    }

    /// Stable identifier, matching the serde representation.
    pub fn id(&self) -> &'static str {
        match self {
            Sound::Rimshot => "rimshot",
            Sound::BassDrum => "bass-drum",
            Sound::Clap => "clap",
            Sound::Cowbell => "cowbell",
            Sound::HiHat => "hi-hat",
            Sound::Hjonk => "hjonk",
            Sound::JackSlap => "jack-slap",
            Sound::Laugh => "laugh",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.aif", self.display_name())
    }
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Accepts either the id (`"hi-hat"`) or the display name (`"Hi-hat"`).
impl FromStr for Sound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sound::ALL
            .into_iter()
            .find(|sound| sound.id() == s || sound.display_name() == s)
            .ok_or_else(|| format!("unknown sound '{s}'"))
    }
}
