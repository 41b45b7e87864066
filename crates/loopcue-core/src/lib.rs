//! # Loopcue Core Library
//!
//! Core logic for Loopcue, a repeating precision countdown with fixed
//! threshold cues and live latency correction. The engine is CLI-first:
//! every operation is available through the `loopcue` binary, and any
//! front end is a thin renderer over the same event stream.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine. The caller supplies
//!   fixed-size time steps via `tick(dt)`; the engine owns remaining time,
//!   loop counting and one-shot threshold flags, and emits events.
//! - **Phase Resolver**: pure mapping from (presets, mode, loop number) to
//!   the duration of the loop about to start.
//! - **Cue Resolver**: pure mapping from (profile kind, mode, loop number)
//!   to the warning cue and visual state for the ~5 s band.
//! - **Storage**: TOML-based settings holding the profile bank, alternate
//!   durations, phase pairs and opaque hotkey identifiers.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: the countdown state machine
//! - [`PresetConfig`]: immutable profile snapshot consumed by the engine
//! - [`Settings`]: persisted configuration
//! - [`Event`]: everything the engine tells the outside world

pub mod error;
pub mod events;
pub mod preset;
pub mod storage;
pub mod timer;

pub use error::{CoreError, EngineError, SettingsError};
pub use events::Event;
pub use preset::{AlternateTimes, PhasePair, PresetConfig, Profile};
pub use storage::Settings;
pub use timer::{Cue, FiredFlags, Mode, TimerEngine, TimerState, VisualState};
