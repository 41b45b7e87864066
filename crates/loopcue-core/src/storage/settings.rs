//! TOML-based application settings.
//!
//! Persists:
//! - The profile bank (label, repetition time, first-cycle time)
//! - Alternate-mode loop/first durations
//! - The special profile index and its two phase pairs
//! - Hotkey identifiers and enable flags
//! - The UI language tag
//!
//! Settings are stored at `~/.config/loopcue/settings.toml`. Hotkey strings
//! and the language tag are opaque here: they are stored for the hosting
//! front end and never interpreted by the engine.
//!
//! Every field falls back to a documented default when missing, so a
//! partially populated file never blocks startup. Defaulting and value
//! normalization are logged at `warn`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::data_dir;
use crate::error::SettingsError;
use crate::preset::{
    AlternateTimes, PhasePair, PresetConfig, Profile, DEFAULT_ALTERNATE_FIRST_SECS,
    DEFAULT_ALTERNATE_LOOP_SECS, DEFAULT_FIRST_SECS,
};

/// First-cycle value written by older releases; migrated to the current
/// default on load.
const LEGACY_FIRST_SECS: f64 = 6.0;

/// Application settings.
///
/// Serialized to/from TOML at `~/.config/loopcue/settings.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_start_hotkey")]
    pub start_hotkey: String,
    #[serde(default = "default_true")]
    pub start_hotkey_enabled: bool,
    #[serde(default = "default_alternate_hotkey")]
    pub alternate_hotkey: String,
    #[serde(default = "default_true")]
    pub alternate_hotkey_enabled: bool,
    #[serde(default = "default_alternate_loop_time")]
    pub alternate_loop_time: f64,
    #[serde(default = "default_alternate_first_time")]
    pub alternate_first_time: f64,
    /// Index of the phase-alternating profile in `profiles`.
    #[serde(default = "default_special_profile")]
    pub special_profile: usize,
    /// Phase pair for the special profile in Normal mode.
    #[serde(default = "default_start_phases")]
    pub start_phases: [f64; 2],
    /// Phase pair for the special profile in Alternate mode.
    #[serde(default = "default_alternate_phases")]
    pub alternate_phases: [f64; 2],
    #[serde(default = "default_profiles")]
    pub profiles: Vec<Profile>,
}

// Default functions
fn default_language() -> String {
    "en".into()
}
fn default_start_hotkey() -> String {
    "f9".into()
}
fn default_alternate_hotkey() -> String {
    "f8".into()
}
fn default_true() -> bool {
    true
}
fn default_alternate_loop_time() -> f64 {
    DEFAULT_ALTERNATE_LOOP_SECS
}
fn default_alternate_first_time() -> f64 {
    DEFAULT_ALTERNATE_FIRST_SECS
}
fn default_special_profile() -> usize {
    PresetConfig::default().special_index
}
fn default_start_phases() -> [f64; 2] {
    PresetConfig::default().start_phases.0
}
fn default_alternate_phases() -> [f64; 2] {
    PresetConfig::default().alt_phases.0
}
fn default_profiles() -> Vec<Profile> {
    PresetConfig::default().profiles
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: default_language(),
            start_hotkey: default_start_hotkey(),
            start_hotkey_enabled: true,
            alternate_hotkey: default_alternate_hotkey(),
            alternate_hotkey_enabled: true,
            alternate_loop_time: default_alternate_loop_time(),
            alternate_first_time: default_alternate_first_time(),
            special_profile: default_special_profile(),
            start_phases: default_start_phases(),
            alternate_phases: default_alternate_phases(),
            profiles: default_profiles(),
        }
    }
}

impl Settings {
    fn path() -> Result<PathBuf, SettingsError> {
        Ok(data_dir()?.join("settings.toml"))
    }

    /// The on-disk location of the settings file.
    pub fn file_path() -> Result<PathBuf, SettingsError> {
        Self::path()
    }

    /// Load from disk, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if the default settings cannot be written.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::path()?;
        if !path.exists() {
            warn!(path = %path.display(), "settings file missing, writing defaults");
            let settings = Self::default();
            settings.save_to(&path)?;
            return Ok(settings);
        }
        Self::load_from(&path)
    }

    /// Load from disk, returning defaults on any error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default settings");
            Self::default()
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get a settings value as a display string by dot-separated key.
    /// Array elements are addressed numerically, e.g. `profiles.0.time`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = match current {
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a settings value by dot-separated key and persist the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be coerced
    /// into the field's type, or the file cannot be written.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| invalid_value(key, value, e.to_string()))?;
        set_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid_value(key, value, e.to_string()))?;
        self.save()
    }

    /// Build the preset snapshot the engine consumes, normalizing values:
    /// negative durations clamp to zero and the legacy 6.00 first-cycle
    /// default migrates to the current 5.00.
    pub fn preset_config(&self) -> PresetConfig {
        let profiles = self
            .profiles
            .iter()
            .map(|p| {
                let mut first_secs = p.first_secs;
                if (first_secs - LEGACY_FIRST_SECS).abs() < 1e-9 {
                    warn!(label = %p.label, "migrating legacy first-cycle time 6.00 to 5.00");
                    first_secs = DEFAULT_FIRST_SECS;
                }
                Profile::new(
                    p.label.clone(),
                    non_negative("time", p.loop_secs),
                    non_negative("first_time", first_secs),
                )
            })
            .collect();
        PresetConfig {
            profiles,
            special_index: self.special_profile,
            start_phases: PhasePair([
                non_negative("start_phases", self.start_phases[0]),
                non_negative("start_phases", self.start_phases[1]),
            ]),
            alt_phases: PhasePair([
                non_negative("alternate_phases", self.alternate_phases[0]),
                non_negative("alternate_phases", self.alternate_phases[1]),
            ]),
            alternate: AlternateTimes {
                loop_secs: non_negative("alternate_loop_time", self.alternate_loop_time),
                first_secs: non_negative("alternate_first_time", self.alternate_first_time),
            },
        }
    }
}

fn non_negative(key: &str, value: f64) -> f64 {
    if value < 0.0 {
        warn!(key, value, "negative duration normalized to zero");
        0.0
    } else {
        value
    }
}

fn invalid_value(key: &str, value: &str, message: String) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.into(),
        value: value.into(),
        message,
    }
}

/// Walk `root` along the dot-separated `key` and replace the leaf with
/// `value`, coerced into the leaf's existing JSON type.
fn set_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), SettingsError> {
    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(SettingsError::UnknownKey(key.into()));
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        let slot = match current {
            serde_json::Value::Array(items) => {
                let index = part
                    .parse::<usize>()
                    .map_err(|_| SettingsError::UnknownKey(key.into()))?;
                items.get_mut(index)
            }
            serde_json::Value::Object(map) => map.get_mut(part),
            _ => None,
        };
        let slot = slot.ok_or_else(|| SettingsError::UnknownKey(key.into()))?;

        if is_leaf {
            *slot = coerce_like(slot, key, value)?;
            return Ok(());
        }
        current = slot;
    }

    Err(SettingsError::UnknownKey(key.into()))
}

fn coerce_like(
    existing: &serde_json::Value,
    key: &str,
    value: &str,
) -> Result<serde_json::Value, SettingsError> {
    let coerced = match existing {
        serde_json::Value::Bool(_) => serde_json::Value::Bool(
            value
                .parse::<bool>()
                .map_err(|e| invalid_value(key, value, e.to_string()))?,
        ),
        serde_json::Value::Number(_) => {
            if let Ok(n) = value.parse::<u64>() {
                serde_json::Value::Number(n.into())
            } else {
                let n = value
                    .parse::<f64>()
                    .map_err(|e| invalid_value(key, value, e.to_string()))?;
                serde_json::Number::from_f64(n)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| invalid_value(key, value, "not a finite number".into()))?
            }
        }
        serde_json::Value::Object(_) | serde_json::Value::Array(_) => serde_json::from_str(value)
            .map_err(|e| invalid_value(key, value, e.to_string()))?,
        _ => serde_json::Value::String(value.into()),
    };
    Ok(coerced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_roundtrip() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn profiles_roundtrip_exactly() {
        let mut settings = Settings::default();
        settings.profiles = vec![
            Profile::new("Alpha", 19.15, 5.0),
            Profile::new("ベータ", 42.42, 3.25),
        ];
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.profiles, settings.profiles);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Settings = toml::from_str("language = \"ja\"\n").unwrap();
        assert_eq!(parsed.language, "ja");
        assert_eq!(parsed.start_hotkey, "f9");
        assert_eq!(parsed.alternate_loop_time, DEFAULT_ALTERNATE_LOOP_SECS);
        assert_eq!(parsed.profiles.len(), 3);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let parsed: Settings = toml::from_str("").unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn save_and_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut settings = Settings::default();
        settings.profiles[0].loop_secs = 77.25;
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn preset_config_clamps_negative_durations() {
        let mut settings = Settings::default();
        settings.profiles[0].loop_secs = -3.0;
        settings.alternate_first_time = -1.0;
        settings.start_phases = [-5.0, 12.0];
        let presets = settings.preset_config();
        assert_eq!(presets.profiles[0].loop_secs, 0.0);
        assert_eq!(presets.alternate.first_secs, 0.0);
        assert_eq!(presets.start_phases.0, [0.0, 12.0]);
    }

    #[test]
    fn preset_config_migrates_legacy_first_time() {
        let mut settings = Settings::default();
        settings.profiles[1].first_secs = 6.0;
        let presets = settings.preset_config();
        assert_eq!(presets.profiles[1].first_secs, 5.0);
    }

    #[test]
    fn get_supports_dot_path_and_indices() {
        let settings = Settings::default();
        assert_eq!(settings.get("language").as_deref(), Some("en"));
        assert_eq!(settings.get("start_hotkey_enabled").as_deref(), Some("true"));
        assert_eq!(settings.get("profiles.0.label").as_deref(), Some("Quick"));
        assert_eq!(settings.get("profiles.0.time").as_deref(), Some("30.0"));
        assert!(settings.get("profiles.9.time").is_none());
        assert!(settings.get("no_such_key").is_none());
    }

    #[test]
    fn set_value_by_path_updates_scalars() {
        let mut json = serde_json::to_value(Settings::default()).unwrap();
        set_value_by_path(&mut json, "alternate_loop_time", "21.5").unwrap();
        assert_eq!(json["alternate_loop_time"], 21.5);
        set_value_by_path(&mut json, "start_hotkey_enabled", "false").unwrap();
        assert_eq!(json["start_hotkey_enabled"], false);
        set_value_by_path(&mut json, "profiles.1.label", "Renamed").unwrap();
        assert_eq!(json["profiles"][1]["label"], "Renamed");
    }

    #[test]
    fn set_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Settings::default()).unwrap();
        assert!(matches!(
            set_value_by_path(&mut json, "nonexistent", "1"),
            Err(SettingsError::UnknownKey(_))
        ));
        assert!(matches!(
            set_value_by_path(&mut json, "profiles.nine.time", "1"),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_value_by_path_rejects_bad_coercion() {
        let mut json = serde_json::to_value(Settings::default()).unwrap();
        assert!(matches!(
            set_value_by_path(&mut json, "alternate_loop_time", "fast"),
            Err(SettingsError::InvalidValue { .. })
        ));
    }
}
