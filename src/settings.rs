//! Game settings and preferences
//!
//! Persisted as a small pretty-printed JSON file next to the executable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default settings file name
pub const DEFAULT_FILE: &str = "GameSettings.json";

/// Game speed presets
///
/// Stored as its index (0, 1, 2); names are accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(into = "u8", try_from = "SpeedRepr")]
pub enum GameSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl GameSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameSpeed::Slow => "Slow",
            GameSpeed::Normal => "Normal",
            GameSpeed::Fast => "Fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(GameSpeed::Slow),
            "normal" | "norm" => Some(GameSpeed::Normal),
            "fast" => Some(GameSpeed::Fast),
            _ => None,
        }
    }

    /// Distance per second covered by a speed-1.0 mover
    pub fn units_per_second(&self) -> f32 {
        match self {
            GameSpeed::Slow => 128.0,
            GameSpeed::Normal => 256.0,
            GameSpeed::Fast => 512.0,
        }
    }

    /// Factor applied to every timer (2.0 = twice as fast)
    pub fn multiplier(&self) -> f32 {
        self.units_per_second() / GameSpeed::Normal.units_per_second()
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(GameSpeed::Slow),
            1 => Some(GameSpeed::Normal),
            2 => Some(GameSpeed::Fast),
            _ => None,
        }
    }
}

impl From<GameSpeed> for u8 {
    fn from(speed: GameSpeed) -> u8 {
        match speed {
            GameSpeed::Slow => 0,
            GameSpeed::Normal => 1,
            GameSpeed::Fast => 2,
        }
    }
}

/// On-disk forms of [`GameSpeed`]
#[derive(Deserialize)]
#[serde(untagged)]
enum SpeedRepr {
    Index(u8),
    Name(String),
}

impl TryFrom<SpeedRepr> for GameSpeed {
    type Error = String;

    fn try_from(repr: SpeedRepr) -> Result<Self, Self::Error> {
        match repr {
            SpeedRepr::Index(index) => {
                GameSpeed::from_index(index).ok_or_else(|| format!("unknown game speed {index}"))
            }
            SpeedRepr::Name(name) => {
                GameSpeed::from_str(&name).ok_or_else(|| format!("unknown game speed '{name}'"))
            }
        }
    }
}

/// Failure reading or writing the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Speed of every mover and timer
    #[serde(rename = "GameSpeed")]
    pub game_speed: GameSpeed,
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = serde_json::from_str(&json).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to the defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load_from(path).unwrap_or_else(|err| {
            log::warn!("{err}; using default settings");
            Self::default()
        })
    }

    /// Write settings to `path` as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_speed_values() {
        assert_eq!(GameSpeed::Slow.units_per_second(), 128.0);
        assert_eq!(GameSpeed::Normal.units_per_second(), 256.0);
        assert_eq!(GameSpeed::Fast.units_per_second(), 512.0);
        assert_eq!(GameSpeed::Fast.multiplier(), 2.0);
        assert_eq!(GameSpeed::Slow.multiplier(), 0.5);
    }

    #[test]
    fn test_game_speed_from_str() {
        assert_eq!(GameSpeed::from_str("FAST"), Some(GameSpeed::Fast));
        assert_eq!(GameSpeed::from_str("slow"), Some(GameSpeed::Slow));
        assert_eq!(GameSpeed::from_str("ludicrous"), None);
        for speed in [GameSpeed::Slow, GameSpeed::Normal, GameSpeed::Fast] {
            assert_eq!(GameSpeed::from_str(speed.as_str()), Some(speed));
        }
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path().join(DEFAULT_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.game_speed, GameSpeed::Normal);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILE);
        let settings = Settings {
            game_speed: GameSpeed::Fast,
        };
        settings.save_to(&path).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"GameSpeed\": 2"));
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILE);
        fs::write(&path, "{}").unwrap();
        assert_eq!(Settings::load_from(&path).unwrap().game_speed, GameSpeed::Normal);
    }

    #[test]
    fn test_reads_index_and_name_forms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILE);

        fs::write(&path, r#"{"GameSpeed": 2}"#).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap().game_speed, GameSpeed::Fast);

        fs::write(&path, r#"{"GameSpeed": 0}"#).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap().game_speed, GameSpeed::Slow);

        fs::write(&path, r#"{"GameSpeed": "Fast"}"#).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap().game_speed, GameSpeed::Fast);
    }

    #[test]
    fn test_unknown_speed_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILE);
        fs::write(&path, r#"{"GameSpeed": 7}"#).unwrap();
        assert!(matches!(Settings::load_from(&path), Err(SettingsError::Json { .. })));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILE);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Settings::load_from(&path), Err(SettingsError::Json { .. })));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
