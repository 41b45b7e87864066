//! Countdown profiles and the preset bank consumed by the engine.
//!
//! A [`PresetConfig`] is an immutable snapshot: the engine reads it when a
//! run starts and at every loop rollover, and never mutates it. Edits flow
//! through the settings layer while no countdown is running.

use serde::{Deserialize, Serialize};

/// Default first-cycle duration for ordinary profiles, in seconds.
pub const DEFAULT_FIRST_SECS: f64 = 5.0;

/// Default alternate-mode repetition duration, in seconds.
pub const DEFAULT_ALTERNATE_LOOP_SECS: f64 = 19.15;

/// Default alternate-mode first-cycle duration, in seconds.
pub const DEFAULT_ALTERNATE_FIRST_SECS: f64 = 5.0;

/// A single countdown profile.
///
/// `loop_secs` drives every repetition after the first; `first_secs` only
/// the opening cycle of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub label: String,
    /// Repetition duration in seconds. Serialized as `time`.
    #[serde(rename = "time")]
    pub loop_secs: f64,
    /// First-cycle duration in seconds. Serialized as `first_time`.
    #[serde(rename = "first_time", default = "default_first_secs")]
    pub first_secs: f64,
}

fn default_first_secs() -> f64 {
    DEFAULT_FIRST_SECS
}

impl Profile {
    pub fn new(label: impl Into<String>, loop_secs: f64, first_secs: f64) -> Self {
        Self {
            label: label.into(),
            loop_secs,
            first_secs,
        }
    }
}

/// Two alternating durations applied by loop parity: even loop counts take
/// index 0, odd loop counts index 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhasePair(pub [f64; 2]);

impl PhasePair {
    /// Duration for the loop numbered `loop_count` (1-based, `>= 2`).
    pub fn for_loop(&self, loop_count: u32) -> f64 {
        if loop_count % 2 == 0 {
            self.0[0]
        } else {
            self.0[1]
        }
    }
}

/// Global alternate-mode durations, independent of the profile bank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlternateTimes {
    pub loop_secs: f64,
    pub first_secs: f64,
}

impl Default for AlternateTimes {
    fn default() -> Self {
        Self {
            loop_secs: DEFAULT_ALTERNATE_LOOP_SECS,
            first_secs: DEFAULT_ALTERNATE_FIRST_SECS,
        }
    }
}

/// Immutable snapshot of every configured countdown profile, plus the
/// special profile's phase pairs and the alternate-mode times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetConfig {
    pub profiles: Vec<Profile>,
    /// Index of the phase-alternating profile within `profiles`.
    pub special_index: usize,
    /// Phase pair used by the special profile in Normal mode.
    pub start_phases: PhasePair,
    /// Phase pair used by the special profile in Alternate mode.
    pub alt_phases: PhasePair,
    pub alternate: AlternateTimes,
}

impl PresetConfig {
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profile(&self, index: usize) -> Option<&Profile> {
        self.profiles.get(index)
    }

    /// Whether `index` names the phase-alternating profile.
    pub fn is_special(&self, index: usize) -> bool {
        index == self.special_index && index < self.profiles.len()
    }

    /// The profile armed on startup: the third slot when the bank holds at
    /// least three profiles, else the first.
    pub fn default_profile_index(&self) -> usize {
        if self.profiles.len() >= 3 {
            2
        } else {
            0
        }
    }
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            profiles: vec![
                Profile::new("Quick", 30.0, DEFAULT_FIRST_SECS),
                Profile::new("Standard", 45.0, DEFAULT_FIRST_SECS),
                Profile::new("Extended", 60.0, DEFAULT_FIRST_SECS),
            ],
            special_index: 2,
            start_phases: PhasePair([20.0, 40.0]),
            alt_phases: PhasePair([15.0, 25.0]),
            alternate: AlternateTimes::default(),
        }
    }
}
